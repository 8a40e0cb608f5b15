use std::path::PathBuf;

use scholarsight_core::{
    AnalysisTicket, Anchor, PaperFile, RephraseTicket, SessionState, ValidationError,
};

use crate::action::Action;
use crate::input::InputMode;
use crate::model::breakdown::{self, BreakdownLine};
use crate::theme::Theme;
use crate::tui_event::BackendEvent;
use crate::view;

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Upload,
    Breakdown,
}

/// Work the event loop must start on behalf of the app.
#[derive(Debug)]
pub enum Effect {
    Analyze(AnalysisTicket),
    Rephrase(RephraseTicket),
}

/// Main application state.
pub struct App {
    pub session: SessionState,
    pub focus: Focus,
    /// Contents of the open-file prompt, when it is shown.
    pub path_input: Option<String>,
    /// Feedback for a rejected file, shown under the upload button.
    pub notice: Option<String>,
    /// Breakdown laid out for the current pane width.
    pub lines: Vec<BreakdownLine>,
    pub cursor: usize,
    /// Row where visual selection started.
    pub selection_start: Option<usize>,
    pub scroll: usize,
    pub modal_scroll: u16,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    pub show_help: bool,
    /// Height of the breakdown text area (set on resize, used for scrolling).
    pub visible_rows: usize,
    pub wrap_width: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            session: SessionState::new(),
            focus: Focus::Upload,
            path_input: None,
            notice: None,
            lines: Vec::new(),
            cursor: 0,
            selection_start: None,
            scroll: 0,
            modal_scroll: 0,
            tick: 0,
            theme: Theme::slate(),
            should_quit: false,
            show_help: false,
            visible_rows: 20,
            wrap_width: 60,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        if self.path_input.is_some() && !self.show_help {
            InputMode::Text
        } else {
            InputMode::Normal
        }
    }

    /// Selected row range, in layout order.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection_start
            .map(|start| (start.min(self.cursor), start.max(self.cursor)))
    }

    /// Process an action and update state. Returns work to start, if any.
    pub fn update(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::ForceQuit => {
                self.should_quit = true;
                return None;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return None;
            }
            Action::Resize(w, h) => {
                self.resize(w, h);
                return None;
            }
            _ => {}
        }

        // When help overlay is shown, only allow a few actions through
        if self.show_help {
            match action {
                Action::Quit => self.should_quit = true,
                Action::ToggleHelp | Action::Cancel => self.show_help = false,
                _ => {}
            }
            return None;
        }

        if self.path_input.is_some() {
            self.update_prompt(action);
            return None;
        }

        if self.session.rephrase().is_some() {
            self.update_modal(action);
            return None;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.show_help = true,
            Action::SwitchFocus => {
                self.focus = match self.focus {
                    Focus::Upload => Focus::Breakdown,
                    Focus::Breakdown => Focus::Upload,
                };
                self.clear_selection();
            }
            Action::OpenPathPrompt => self.path_input = Some(String::new()),
            Action::Paste(text) => self.open_path(&text),
            Action::RemoveFile => {
                if self.session.clear_file() {
                    self.notice = None;
                }
            }
            Action::Submit => return self.submit(),
            Action::Confirm => match self.focus {
                Focus::Upload => return self.submit(),
                Focus::Breakdown => {
                    let ticket = self.session.confirm_rephrase()?;
                    self.selection_start = None;
                    self.modal_scroll = 0;
                    tracing::info!(chars = ticket.text.chars().count(), "simplifying selection");
                    return Some(Effect::Rephrase(ticket));
                }
            },
            Action::Cancel => {
                self.notice = None;
                self.clear_selection();
            }
            Action::ToggleSelect => {
                if self.focus == Focus::Breakdown && !self.lines.is_empty() {
                    if self.selection_start.is_some() {
                        self.clear_selection();
                    } else {
                        self.selection_start = Some(self.cursor);
                        self.sync_selection();
                    }
                }
            }
            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            Action::PageDown => self.move_cursor(self.visible_rows.max(1) as isize),
            Action::PageUp => self.move_cursor(-(self.visible_rows.max(1) as isize)),
            Action::GoTop => self.move_cursor(isize::MIN / 2),
            Action::GoBottom => self.move_cursor(isize::MAX / 2),
            _ => {}
        }
        None
    }

    /// Apply a backend completion. Stale completions leave the state untouched.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::AnalysisFinished { generation, result } => {
                let succeeded = result.is_ok();
                if self.session.finish_analysis(generation, result) {
                    self.cursor = 0;
                    self.scroll = 0;
                    self.relayout();
                    if succeeded {
                        self.focus = Focus::Breakdown;
                    }
                }
            }
            BackendEvent::RephraseFinished { generation, result } => {
                self.session.finish_rephrase(generation, result);
            }
        }
    }

    fn update_prompt(&mut self, action: Action) {
        let Some(input) = self.path_input.as_mut() else {
            return;
        };
        match action {
            Action::InputChar(c) => input.push(c),
            Action::InputBackspace => {
                input.pop();
            }
            Action::Paste(text) => input.push_str(text.trim_end_matches(['\r', '\n'])),
            Action::Cancel => self.path_input = None,
            Action::Confirm => {
                if let Some(input) = self.path_input.take() {
                    self.open_path(&input);
                }
            }
            _ => {}
        }
    }

    fn update_modal(&mut self, action: Action) {
        match action {
            Action::Quit | Action::Cancel | Action::Confirm => {
                self.session.close_rephrase();
                self.modal_scroll = 0;
            }
            Action::MoveDown => self.modal_scroll = self.modal_scroll.saturating_add(1),
            Action::MoveUp => self.modal_scroll = self.modal_scroll.saturating_sub(1),
            Action::PageDown => self.modal_scroll = self.modal_scroll.saturating_add(10),
            Action::PageUp => self.modal_scroll = self.modal_scroll.saturating_sub(10),
            Action::GoTop => self.modal_scroll = 0,
            _ => {}
        }
    }

    fn submit(&mut self) -> Option<Effect> {
        match self.session.submit() {
            Ok(ticket) => {
                tracing::info!(file = ticket.file.name(), "analysis requested");
                self.notice = None;
                self.lines.clear();
                self.cursor = 0;
                self.scroll = 0;
                self.selection_start = None;
                Some(Effect::Analyze(ticket))
            }
            // shown as the breakdown pane's error state
            Err(ValidationError::NoFile) => {
                self.lines.clear();
                self.selection_start = None;
                None
            }
            Err(_) => None,
        }
    }

    fn open_path(&mut self, raw: &str) {
        let Some(path) = parse_dropped_path(raw) else {
            return;
        };
        let file = match PaperFile::from_path(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot open file");
                self.notice = Some(format!("Could not open {}: {e}", path.display()));
                return;
            }
        };
        match self.session.set_file(file) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "paper selected");
                self.notice = None;
            }
            Err(ValidationError::Busy) => {
                self.notice = Some("Wait for the current analysis to finish.".to_string());
            }
            Err(e) => {
                tracing::info!(path = %path.display(), "rejected non-PDF file");
                self.notice = Some(e.to_string());
            }
        }
    }

    fn resize(&mut self, w: u16, h: u16) {
        self.visible_rows = view::breakdown_text_rows(h);
        let width = view::breakdown_text_width(w);
        if width != self.wrap_width {
            self.wrap_width = width;
            self.relayout();
        }
        self.ensure_cursor_visible();
    }

    fn relayout(&mut self) {
        self.lines = match self.session.analysis().explanation() {
            Some(explanation) => breakdown::layout(explanation, self.wrap_width),
            None => Vec::new(),
        };
        self.cursor = self.cursor.min(self.lines.len().saturating_sub(1));
        self.clear_selection();
        self.ensure_cursor_visible();
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.focus != Focus::Breakdown || self.lines.is_empty() {
            return;
        }
        let last = self.lines.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.ensure_cursor_visible();
        if self.selection_start.is_some() {
            self.sync_selection();
        }
    }

    fn ensure_cursor_visible(&mut self) {
        let rows = self.visible_rows.max(1);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + rows {
            self.scroll = self.cursor + 1 - rows;
        }
    }

    fn sync_selection(&mut self) {
        let Some((start, end)) = self.selection() else {
            self.session.dismiss_popup();
            return;
        };
        let text = breakdown::selection_text(&self.lines, start..=end);
        let anchor = Anchor {
            x: 0,
            y: u16::try_from(start).unwrap_or(u16::MAX),
        };
        self.session.select_text(&text, anchor);
    }

    fn clear_selection(&mut self) {
        self.selection_start = None;
        self.session.dismiss_popup();
    }

    /// Render the current state.
    pub fn view(&self, f: &mut ratatui::Frame) {
        view::render_frame(f, self);

        if let Some(input) = &self.path_input {
            view::upload::render_prompt(f, input, &self.theme);
        }
        if self.session.rephrase().is_some() {
            view::modal::render(f, self);
        }
        if self.show_help {
            view::help::render(f, &self.theme);
        }
    }
}

/// Turn pasted or typed text into a path.
///
/// Terminals paste dropped files as a plain, shell-quoted or backslash-escaped
/// path, or as a `file://` URI. Only the first non-empty line is used.
pub fn parse_dropped_path(raw: &str) -> Option<PathBuf> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let unquoted = line
        .strip_prefix('\'')
        .and_then(|l| l.strip_suffix('\''))
        .or_else(|| line.strip_prefix('"').and_then(|l| l.strip_suffix('"')))
        .unwrap_or(line);

    let path = match unquoted.strip_prefix("file://") {
        Some(rest) => file_uri_path(rest),
        None => unquoted.replace("\\ ", " "),
    };
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Some(home.join(rest));
        }
    }
    Some(PathBuf::from(path))
}

/// Path part of a `file://` URI, with an optional `localhost` host dropped.
fn file_uri_path(rest: &str) -> String {
    let rest = rest
        .strip_prefix("localhost")
        .filter(|r| r.starts_with('/'))
        .unwrap_or(rest);
    match urlencoding::decode(rest) {
        Ok(path) => path.into_owned(),
        Err(_) => rest.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use scholarsight_core::{AnalysisError, Explanation, NO_FILE_MESSAGE, NOT_PDF_MESSAGE};

    use super::*;

    fn sample() -> Explanation {
        Explanation {
            simple_explanation: "A short, readable summary of the whole paper.".into(),
            methodology: "Controlled experiments.".into(),
            datasets: "ImageNet".into(),
            algorithms: "SGD".into(),
            key_contributions: vec!["Faster training".into()],
            potential_applications: vec!["Vision".into()],
            reference_helper: "Start with the ResNet paper.".into(),
        }
    }

    fn temp_file(suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(b"%PDF-1.7").unwrap();
        file
    }

    fn app_with_pdf() -> (App, tempfile::NamedTempFile) {
        let pdf = temp_file(".pdf");
        let mut app = App::new();
        app.update(Action::Resize(100, 30));
        app.update(Action::Paste(pdf.path().display().to_string()));
        assert!(app.session.file().is_some());
        (app, pdf)
    }

    fn analyzed() -> (App, tempfile::NamedTempFile) {
        let (mut app, pdf) = app_with_pdf();
        let Some(Effect::Analyze(ticket)) = app.update(Action::Submit) else {
            panic!("expected an analysis effect");
        };
        app.handle_backend_event(BackendEvent::AnalysisFinished {
            generation: ticket.generation,
            result: Ok(sample()),
        });
        (app, pdf)
    }

    #[test]
    fn dropping_a_non_pdf_shows_a_notice() {
        let txt = temp_file(".txt");
        let mut app = App::new();
        app.update(Action::Paste(format!("'{}'\n", txt.path().display())));
        assert!(app.session.file().is_none());
        assert_eq!(app.notice.as_deref(), Some(NOT_PDF_MESSAGE));
    }

    #[test]
    fn missing_file_sets_notice() {
        let mut app = App::new();
        app.update(Action::Paste("/definitely/not/here.pdf".into()));
        assert!(app.session.file().is_none());
        assert!(app.notice.as_deref().unwrap().starts_with("Could not open"));
    }

    #[test]
    fn path_prompt_opens_file() {
        let pdf = temp_file(".pdf");
        let mut app = App::new();
        app.update(Action::OpenPathPrompt);
        assert_eq!(app.input_mode(), InputMode::Text);
        for c in pdf.path().display().to_string().chars() {
            app.update(Action::InputChar(c));
        }
        app.update(Action::Confirm);
        assert!(app.path_input.is_none());
        assert!(app.session.file().is_some());
    }

    #[test]
    fn submit_without_file_shows_error() {
        let mut app = App::new();
        assert!(app.update(Action::Submit).is_none());
        assert_eq!(app.session.analysis().error(), Some(NO_FILE_MESSAGE));
    }

    #[test]
    fn successful_analysis_lays_out_breakdown() {
        let (app, _pdf) = analyzed();
        assert_eq!(app.focus, Focus::Breakdown);
        assert_eq!(app.lines[0].text, "Simple Explanation");
        assert!(app.lines.iter().all(|l| l.display().chars().count() <= app.wrap_width));
    }

    #[test]
    fn submit_while_loading_is_ignored() {
        let (mut app, _pdf) = app_with_pdf();
        assert!(app.update(Action::Submit).is_some());
        assert!(app.update(Action::Submit).is_none());
        assert!(app.session.analysis().is_loading());
    }

    #[test]
    fn stale_analysis_is_dropped() {
        let (mut app, _pdf) = app_with_pdf();
        let Some(Effect::Analyze(first)) = app.update(Action::Submit) else {
            panic!("expected an analysis effect");
        };
        app.handle_backend_event(BackendEvent::AnalysisFinished {
            generation: first.generation,
            result: Err(AnalysisError::ExplanationFailed),
        });
        let Some(Effect::Analyze(_second)) = app.update(Action::Submit) else {
            panic!("expected an analysis effect");
        };
        app.handle_backend_event(BackendEvent::AnalysisFinished {
            generation: first.generation,
            result: Ok(sample()),
        });
        assert!(app.session.analysis().is_loading());
        assert!(app.lines.is_empty());
    }

    #[test]
    fn selection_opens_popup_and_rephrase() {
        let (mut app, _pdf) = analyzed();
        app.update(Action::ToggleSelect);
        let popup = app.session.popup().unwrap();
        assert_eq!(popup.text, "Simple Explanation");

        let Some(Effect::Rephrase(ticket)) = app.update(Action::Confirm) else {
            panic!("expected a rephrase effect");
        };
        assert_eq!(ticket.text, "Simple Explanation");
        assert!(app.session.popup().is_none());
        assert!(app.session.rephrase().unwrap().loading);

        app.handle_backend_event(BackendEvent::RephraseFinished {
            generation: ticket.generation,
            result: Ok("Plain words.".into()),
        });
        assert_eq!(
            app.session.rephrase().unwrap().result.as_deref(),
            Some("Plain words.")
        );
        app.update(Action::Cancel);
        assert!(app.session.rephrase().is_none());
    }

    #[test]
    fn short_selection_has_no_popup() {
        let (mut app, _pdf) = analyzed();
        let row = app.lines.iter().position(|l| l.text == "SGD").unwrap();
        app.cursor = row;
        app.update(Action::ToggleSelect);
        assert!(app.session.popup().is_none());
        app.update(Action::MoveDown);
        app.update(Action::MoveDown);
        assert!(app.session.popup().is_none());
        app.update(Action::MoveDown);
        assert_eq!(
            app.session.popup().unwrap().text,
            "SGD\nDatasets\nImageNet"
        );
    }

    #[test]
    fn closed_modal_ignores_late_result() {
        let (mut app, _pdf) = analyzed();
        app.update(Action::ToggleSelect);
        let Some(Effect::Rephrase(ticket)) = app.update(Action::Confirm) else {
            panic!("expected a rephrase effect");
        };
        app.update(Action::Cancel);
        app.handle_backend_event(BackendEvent::RephraseFinished {
            generation: ticket.generation,
            result: Ok("late".into()),
        });
        assert!(app.session.rephrase().is_none());
    }

    #[test]
    fn dropped_path_forms() {
        assert_eq!(
            parse_dropped_path("'/tmp/my paper.pdf'"),
            Some(PathBuf::from("/tmp/my paper.pdf"))
        );
        assert_eq!(
            parse_dropped_path("/tmp/my\\ paper.pdf\n"),
            Some(PathBuf::from("/tmp/my paper.pdf"))
        );
        assert_eq!(
            parse_dropped_path("file:///tmp/my%20paper.pdf"),
            Some(PathBuf::from("/tmp/my paper.pdf"))
        );
        assert_eq!(
            parse_dropped_path("file://localhost/tmp/paper.pdf"),
            Some(PathBuf::from("/tmp/paper.pdf"))
        );
        assert_eq!(
            parse_dropped_path("'file://localhost/tmp/r%C3%A9sum%C3%A9%20v2.pdf'"),
            Some(PathBuf::from("/tmp/résumé v2.pdf"))
        );
        assert_eq!(parse_dropped_path("  \n "), None);
    }
}
