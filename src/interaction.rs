use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Move(Direction),
    Reveal,
    Flag,
    Quit
}

/// Maps a key press to a game action. Releases and unbound keys map to `None`.
pub fn action_from_key(key: &KeyEvent) -> Option<ActionType> {
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {}
        KeyEventKind::Release => return None
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(ActionType::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(ActionType::Quit),
        KeyCode::Up => Some(ActionType::Move(Direction::Up)),
        KeyCode::Down => Some(ActionType::Move(Direction::Down)),
        KeyCode::Left => Some(ActionType::Move(Direction::Left)),
        KeyCode::Right => Some(ActionType::Move(Direction::Right)),
        KeyCode::Enter => Some(ActionType::Reveal),
        KeyCode::Char(' ') => Some(ActionType::Flag),
        _ => None
    }
}
