use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use scholarsight_core::format_file_size;

use crate::app::{App, Focus};
use crate::theme::Theme;
use crate::view::{centered_rect, spinner_char, truncate};

/// Render the upload pane: drop zone, submit button and notices.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Upload;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(" Upload Your Paper ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Min(5),    // drop zone
        Constraint::Length(3), // button
        Constraint::Length(4), // notice
    ])
    .split(inner);

    render_drop_zone(f, chunks[0], app);
    render_button(f, chunks[1], app);

    if let Some(notice) = &app.notice {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            notice.as_str(),
            theme.error_style(),
        )))
        .wrap(Wrap { trim: true });
        f.render_widget(paragraph, chunks[2]);
    }
}

fn render_drop_zone(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let width = area.width.saturating_sub(4) as usize;

    let lines = match app.session.file() {
        Some(file) => vec![
            Line::from(""),
            Line::from(Span::styled(
                truncate(file.name(), width),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format_file_size(file.size()),
                Style::default().fg(theme.dim),
            )),
            Line::from(""),
            Line::from(Span::styled("d: remove  o: replace", Style::default().fg(theme.dim))),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Drag & drop a PDF here",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "or press o to choose a file",
                Style::default().fg(theme.dim),
            )),
        ],
    };

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.dim)),
        );
    f.render_widget(paragraph, area);
}

fn render_button(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let (label, style) = if app.session.analysis().is_loading() {
        (
            format!("{} Analyzing...", spinner_char(app.tick)),
            Style::default().fg(theme.dim),
        )
    } else if app.session.can_submit() {
        ("Explain Paper".to_string(), theme.popup_style())
    } else {
        ("Explain Paper".to_string(), Style::default().fg(theme.dim))
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(label, style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    f.render_widget(paragraph, area);
}

/// Render the open-file prompt as a centered popup.
pub fn render_prompt(f: &mut Frame, input: &str, theme: &Theme) {
    let area = f.area();
    let width = area.width.saturating_sub(4).min(70);
    let popup = centered_rect(width, 3, area);

    // keep the tail visible when the path is longer than the box
    let visible = width.saturating_sub(3) as usize;
    let count = input.chars().count();
    let shown: String = input.chars().skip(count.saturating_sub(visible)).collect();

    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(shown, Style::default().fg(theme.text)),
        Span::styled("▏", Style::default().fg(theme.accent)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" Open PDF ")
            .title_bottom(" Enter:open  Esc:cancel "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
