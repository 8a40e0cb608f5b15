/// Actions that the TUI can process, mapped from keyboard input or internal events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ForceQuit,
    Confirm,
    Cancel,
    SwitchFocus,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    OpenPathPrompt,
    Submit,
    RemoveFile,
    ToggleSelect,
    ToggleHelp,
    /// A character typed into the path prompt.
    InputChar(char),
    InputBackspace,
    /// Bracketed paste. Terminals deliver drag-and-dropped files this way.
    Paste(String),
    Tick,
    Resize(u16, u16),
    None,
}
