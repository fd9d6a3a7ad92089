use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys the list host reacts to. Everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKey {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Reset,
    Quit,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(HostKey),
    Resize { width: u16, height: u16 },
}

impl From<KeyEvent> for HostKey {
    fn from(event: KeyEvent) -> Self {
        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            return HostKey::Quit;
        }
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => HostKey::Up,
            KeyCode::Down | KeyCode::Char('j') => HostKey::Down,
            KeyCode::PageUp => HostKey::PageUp,
            KeyCode::PageDown | KeyCode::Char(' ') => HostKey::PageDown,
            KeyCode::Home => HostKey::Home,
            KeyCode::End => HostKey::End,
            KeyCode::Char('r') => HostKey::Reset,
            KeyCode::Char('q') | KeyCode::Esc => HostKey::Quit,
            _ => HostKey::Other,
        }
    }
}
