use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;

/// How key presses are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// A text prompt has focus; printable keys are typed.
    Text,
}

/// Map a crossterm terminal event to a TUI action.
pub fn map_event(event: &Event, mode: InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match mode {
            InputMode::Normal => map_key(key),
            InputMode::Text => map_text_key(key),
        },
        Event::Paste(text) => Action::Paste(text.clone()),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key(key: &KeyEvent) -> Action {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::ForceQuit;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Tab | KeyCode::BackTab => Action::SwitchFocus,
        KeyCode::Char('g') => Action::GoTop,
        KeyCode::Char('G') => Action::GoBottom,
        KeyCode::Char('o') => Action::OpenPathPrompt,
        KeyCode::Char('e') => Action::Submit,
        KeyCode::Char('v') => Action::ToggleSelect,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
        KeyCode::Char('d') | KeyCode::Delete => Action::RemoveFile,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Home => Action::GoTop,
        KeyCode::End => Action::GoBottom,
        _ => Action::None,
    }
}

fn map_text_key(key: &KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::ForceQuit;
    }

    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputChar(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn normal_mode_keys() {
        let none = KeyModifiers::NONE;
        assert_eq!(map_event(&press(KeyCode::Char('q'), none), InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&press(KeyCode::Char('d'), none), InputMode::Normal), Action::RemoveFile);
        assert_eq!(
            map_event(&press(KeyCode::Char('d'), KeyModifiers::CONTROL), InputMode::Normal),
            Action::PageDown
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('c'), KeyModifiers::CONTROL), InputMode::Normal),
            Action::ForceQuit
        );
    }

    #[test]
    fn text_mode_types_characters() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            map_event(&press(KeyCode::Char('q'), none), InputMode::Text),
            Action::InputChar('q')
        );
        assert_eq!(
            map_event(&press(KeyCode::Backspace, none), InputMode::Text),
            Action::InputBackspace
        );
        assert_eq!(map_event(&press(KeyCode::Enter, none), InputMode::Text), Action::Confirm);
    }

    #[test]
    fn paste_is_forwarded_in_both_modes() {
        let event = Event::Paste("/tmp/paper.pdf".into());
        assert_eq!(
            map_event(&event, InputMode::Normal),
            Action::Paste("/tmp/paper.pdf".into())
        );
        assert_eq!(
            map_event(&event, InputMode::Text),
            Action::Paste("/tmp/paper.pdf".into())
        );
    }
}
