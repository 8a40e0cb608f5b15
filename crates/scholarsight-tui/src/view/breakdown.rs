use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use scholarsight_core::AnalysisState;

use crate::app::{App, Focus};
use crate::view::spinner_char;

const POPUP_LABEL: &str = " ✦ Simplify  Enter ";

/// Render the breakdown pane for the current analysis state.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(app.focus == Focus::Breakdown))
        .title(" Structured Breakdown ")
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.session.analysis() {
        AnalysisState::Idle => render_placeholder(
            f,
            inner,
            app,
            "Explanation Awaits",
            "Your simplified paper breakdown will appear here.",
            false,
        ),
        AnalysisState::Loading => render_placeholder(
            f,
            inner,
            app,
            "Analyzing Paper",
            "The AI is reading and structuring the content...",
            true,
        ),
        AnalysisState::Error(message) => render_error(f, inner, app, message),
        AnalysisState::Success(_) => {
            render_lines(f, inner, app);
            render_popup(f, inner, app);
        }
    }
}

fn render_placeholder(
    f: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    detail: &str,
    spinning: bool,
) {
    let theme = &app.theme;
    let top = area.height.saturating_sub(4) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
    if spinning {
        lines.push(Line::from(Span::styled(
            spinner_char(app.tick).to_string(),
            Style::default().fg(theme.spinner),
        )));
    }
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        detail.to_string(),
        Style::default().fg(theme.dim),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_error(f: &mut Frame, area: Rect, app: &App, message: &str) {
    let theme = &app.theme;
    let top = area.height.saturating_sub(4) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        "An Error Occurred",
        theme.error_style().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(message.to_string(), theme.error_style())));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_lines(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let selection = app.selection();
    let show_cursor = app.focus == Focus::Breakdown;

    let lines: Vec<Line> = app
        .lines
        .iter()
        .enumerate()
        .skip(app.scroll)
        .take(area.height as usize)
        .map(|(i, line)| {
            let mut style = theme.line_style(line.kind);
            if selection.is_some_and(|(start, end)| (start..=end).contains(&i)) {
                style = style.patch(theme.selection_style());
            } else if show_cursor && i == app.cursor {
                style = style.patch(theme.highlight_style());
            }
            // pad so the highlight spans the full row
            let text = format!("{:<width$}", line.display(), width = area.width as usize);
            Line::from(Span::styled(text, style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

/// Draw the Simplify popup just above the selection, or below it when the
/// selection starts on the first visible row.
fn render_popup(f: &mut Frame, area: Rect, app: &App) {
    let Some(popup) = app.session.popup() else {
        return;
    };
    let Some((_, end)) = app.selection() else {
        return;
    };
    let start = popup.anchor.y as usize;
    let width = (POPUP_LABEL.chars().count() as u16).min(area.width);

    let row = if start > app.scroll {
        start - app.scroll - 1
    } else {
        end.saturating_sub(app.scroll) + 1
    };
    if row >= area.height as usize {
        return;
    }

    let rect = Rect {
        x: area.x + popup.anchor.x.min(area.width.saturating_sub(width)),
        y: area.y + row as u16,
        width,
        height: 1,
    };
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(POPUP_LABEL, app.theme.popup_style()))),
        rect,
    );
}
