use std::fmt::Write;

use owo_colors::OwoColorize;

use scholarsight_core::{Explanation, SectionBody};

fn heading(title: &str, color: bool) -> String {
    if color {
        title.cyan().bold().to_string()
    } else {
        title.to_string()
    }
}

/// Format the seven sections as plain text, lists numbered in response order.
pub fn explanation(explanation: &Explanation, color: bool) -> String {
    let mut out = String::new();
    for (i, section) in explanation.sections().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", heading(section.title, color));
        match section.body {
            SectionBody::Text(text) => {
                for line in text.lines() {
                    let _ = writeln!(out, "  {line}");
                }
            }
            SectionBody::List(items) => {
                for (n, item) in items.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {item}", n + 1);
                }
            }
        }
    }
    out
}

pub fn simplified(text: &str, color: bool) -> String {
    format!("{}\n{}\n", heading("Simplified Version", color), text.trim_end())
}
