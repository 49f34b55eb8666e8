use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Prompt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Start a position lookup for the checked stops
    Navigate,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Char, Down, Enter, Esc, Up};

    // Global quit shortcut
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if let Some(Prompt::LocationPermission) = app.prompt {
        match key.code {
            Char('y' | 'Y') => app.answer_permission(true),
            Char('n' | 'N') | Esc => app.answer_permission(false),
            _ => {}
        }
        return Action::None;
    }

    app.status = None;
    let mut action = Action::None;

    match key.code {
        Char('q') => action = Action::Quit,
        Up | Char('k') if key.modifiers.contains(KeyModifiers::SHIFT) => app.shift_current(true),
        Down | Char('j') if key.modifiers.contains(KeyModifiers::SHIFT) => {
            app.shift_current(false);
        }
        Char('K') => app.shift_current(true),
        Char('J') => app.shift_current(false),
        Up | Char('k') => app.move_cursor_up(),
        Down | Char('j') => app.move_cursor_down(),
        Enter | Char(' ') => app.toggle_current(),
        Char('d') => app.deliver_current(),
        Char('n') => action = Action::Navigate,
        Char('l') => app.toggle_list(),
        Char('p') => app.toggle_permission(),
        Char('+' | '=') => app.controller.display_mut().zoom_by(1.0),
        Char('-') => app.controller.display_mut().zoom_by(-1.0),
        _ => {}
    }
    action
}
