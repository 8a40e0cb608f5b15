pub mod breakdown;
pub mod help;
pub mod modal;
pub mod upload;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Focus};

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Rows taken by the header and footer bars.
pub const CHROME_ROWS: u16 = 2;

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "…" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Widths of the upload and breakdown panes for a terminal `total` columns wide.
pub fn pane_widths(total: u16) -> (u16, u16) {
    let upload = ((u32::from(total) * 2 / 5) as u16).clamp(24, 48).min(total);
    (upload, total - upload)
}

/// Columns available for breakdown text inside its bordered pane.
pub fn breakdown_text_width(total: u16) -> usize {
    let (_, breakdown) = pane_widths(total);
    // two border columns plus one column of padding on each side
    breakdown.saturating_sub(4) as usize
}

/// Rows available for breakdown text inside its bordered pane.
pub fn breakdown_text_rows(total_height: u16) -> usize {
    total_height.saturating_sub(CHROME_ROWS + 2) as usize
}

/// Render the header, both panes and the footer.
pub fn render_frame(f: &mut Frame, app: &App) {
    let area = f.area();
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(0),    // panes
        Constraint::Length(1), // footer
    ])
    .split(area);

    let (upload_width, _) = pane_widths(area.width);
    let panes = Layout::horizontal([Constraint::Length(upload_width), Constraint::Min(0)])
        .split(chunks[1]);

    render_header(f, chunks[0], app);
    upload::render(f, panes[0], app);
    breakdown::render(f, panes[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let header = Line::from(vec![
        Span::styled(" SCHOLARSIGHT ", theme.header_style()),
        Span::styled(
            " Upload a research paper and get a structured breakdown",
            Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let hints = if app.session.rephrase().is_some() {
        " j/k:scroll  Esc:close"
    } else if app.selection_start.is_some() {
        " j/k:extend  Enter:simplify  Esc:cancel  v:clear"
    } else {
        match app.focus {
            Focus::Upload => " o:open  d:remove  Enter:explain  Tab:breakdown  ?:help  q:quit",
            Focus::Breakdown => " j/k:move  v:select  e:explain  Tab:upload  ?:help  q:quit",
        }
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(hints, app.theme.footer_style()))),
        area,
    );
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}
