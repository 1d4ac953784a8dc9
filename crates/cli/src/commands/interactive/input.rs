use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Screen, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run the selected task with the form inputs
    Submit,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Down, Enter, Esc, Tab, Up};

    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.screen {
        Screen::TaskSelect => match key.code {
            Char('q') | Esc => Action::Quit,
            Up | Char('k') => {
                app.task_index = app.task_index.saturating_sub(1);
                Action::None
            }
            Down | Char('j') => {
                if app.task_index + 1 < Task::ALL.len() {
                    app.task_index += 1;
                }
                Action::None
            }
            Enter | Char(' ') => match app.selected_task() {
                Task::Quit => Action::Quit,
                _ => {
                    app.open_selected_task();
                    // Forms without inputs run straight away
                    if app.inputs.is_empty() {
                        Action::Submit
                    } else {
                        Action::None
                    }
                }
            },
            _ => Action::None,
        },

        Screen::Form => match key.code {
            Esc => {
                app.back_to_tasks();
                Action::None
            }
            Enter => Action::Submit,
            Tab | Down => {
                app.next_field();
                Action::None
            }
            BackTab | Up => {
                app.previous_field();
                Action::None
            }
            Backspace => {
                if let Some(input) = app.current_input_mut() {
                    input.pop();
                }
                Action::None
            }
            Char(character)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                if let Some(input) = app.current_input_mut() {
                    input.push(character);
                }
                Action::None
            }
            _ => Action::None,
        },
    }
}
