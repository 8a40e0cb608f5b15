use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::App;
use crate::view::{centered_rect, spinner_char};

/// Render the simplified-explanation modal over the whole screen.
pub fn render(f: &mut Frame, app: &App) {
    let Some(session) = app.session.rephrase() else {
        return;
    };
    let theme = &app.theme;
    let area = f.area();
    let popup = centered_rect(
        area.width.saturating_sub(4).min(84),
        area.height.saturating_sub(2).min(24),
        area,
    );

    let heading = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let quoted = Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC);
    let mut lines = vec![Line::from(Span::styled("Original Text", heading))];
    lines.extend(
        session
            .original_text
            .lines()
            .map(|l| Line::from(Span::styled(l, quoted))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Simplified Version", heading)));

    if session.loading {
        lines.push(Line::from(Span::styled(
            format!("{} Simplifying...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )));
    } else if let Some(error) = &session.error {
        lines.push(Line::from(Span::styled(error.as_str(), theme.error_style())));
    } else if let Some(result) = &session.result {
        lines.extend(
            result
                .lines()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text)))),
        );
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent))
                .title(" ✦ Simplified Explanation ")
                .title_bottom(" j/k:scroll  Esc:close ")
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.modal_scroll, 0));

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
