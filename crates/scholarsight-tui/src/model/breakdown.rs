use std::ops::RangeInclusive;

use scholarsight_core::{Explanation, SectionBody};

/// Prefix drawn in front of the first row of a list item.
pub const BULLET: &str = "• ";
/// Indent for wrapped rows of a list item.
pub const BULLET_INDENT: &str = "  ";

const MIN_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Text,
    Bullet,
    BulletContinuation,
    Blank,
}

/// One display row of the laid-out breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownLine {
    pub kind: LineKind,
    /// Row text without bullet prefix or indent.
    pub text: String,
    /// Paragraph, list item or title this row was wrapped from.
    pub block: usize,
    /// Whitespace separated this row from the previous row of its block.
    /// False when the wrap fell after a hyphen or inside a long word.
    pub space_before: bool,
}

impl BreakdownLine {
    fn blank(block: usize) -> Self {
        Self {
            kind: LineKind::Blank,
            text: String::new(),
            block,
            space_before: false,
        }
    }

    /// Text as it appears on screen, prefix included.
    pub fn display(&self) -> String {
        match self.kind {
            LineKind::Bullet => format!("{BULLET}{}", self.text),
            LineKind::BulletContinuation => format!("{BULLET_INDENT}{}", self.text),
            _ => self.text.clone(),
        }
    }
}

/// Lay out the seven sections as wrapped rows, `width` columns wide.
pub fn layout(explanation: &Explanation, width: usize) -> Vec<BreakdownLine> {
    let width = width.max(MIN_WIDTH);
    let item_width = width - BULLET.chars().count();
    let mut lines = Vec::new();
    let mut block = 0;

    for (i, section) in explanation.sections().iter().enumerate() {
        if i > 0 {
            lines.push(BreakdownLine::blank(block));
        }
        block += 1;
        push_wrapped(&mut lines, section.title, width, block, LineKind::Title, LineKind::Title);

        match section.body {
            SectionBody::Text(text) => {
                for paragraph in text.split('\n').filter(|p| !p.trim().is_empty()) {
                    block += 1;
                    push_wrapped(&mut lines, paragraph, width, block, LineKind::Text, LineKind::Text);
                }
            }
            SectionBody::List(items) => {
                for item in items {
                    block += 1;
                    push_wrapped(
                        &mut lines,
                        item,
                        item_width,
                        block,
                        LineKind::Bullet,
                        LineKind::BulletContinuation,
                    );
                }
            }
        }
    }
    lines
}

fn push_wrapped(
    lines: &mut Vec<BreakdownLine>,
    text: &str,
    width: usize,
    block: usize,
    first: LineKind,
    rest: LineKind,
) {
    let text = text.trim();
    let options = textwrap::Options::new(width).word_splitter(textwrap::WordSplitter::NoHyphenation);
    let rows = textwrap::wrap(text, options);
    if rows.is_empty() {
        lines.push(BreakdownLine {
            kind: first,
            text: String::new(),
            block,
            space_before: false,
        });
        return;
    }

    // Rows are slices of the source in order; the gap before each one tells
    // whether the break consumed whitespace.
    let mut pos = 0;
    for (i, row) in rows.into_iter().enumerate() {
        let space_before = match text[pos..].find(row.as_ref()) {
            Some(offset) => {
                pos += offset + row.len();
                offset > 0
            }
            None => true,
        };
        lines.push(BreakdownLine {
            kind: if i == 0 { first } else { rest },
            text: row.into_owned(),
            block,
            space_before: i > 0 && space_before,
        });
    }
}

/// Text covered by a row selection. Rows wrapped from the same block are
/// rejoined the way they were split, separate blocks with newlines.
pub fn selection_text(lines: &[BreakdownLine], rows: RangeInclusive<usize>) -> String {
    let mut out = String::new();
    let mut last_block = None;
    for line in lines.iter().skip(*rows.start()).take(rows.end() + 1 - rows.start()) {
        if line.kind == LineKind::Blank || line.text.is_empty() {
            continue;
        }
        match last_block {
            Some(block) if block == line.block => {
                if line.space_before {
                    out.push(' ');
                }
            }
            Some(_) => out.push('\n'),
            None => {}
        }
        out.push_str(&line.text);
        last_block = Some(line.block);
    }
    out
}
