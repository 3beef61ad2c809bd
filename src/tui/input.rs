use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode, Popup};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Clear any transient status message on keypress
    app.status_message = None;
    app.status_is_error = false;

    match app.mode {
        Mode::Input => handle_input_mode(app, key),
        Mode::Browse => handle_browse(app, key),
        Mode::Edit => handle_edit(app, key),
    }
}

fn handle_input_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => submit_input(app),
        KeyCode::Esc => {
            app.mode = Mode::Browse;
        }
        // Arrow keys blur the input field and start navigating
        KeyCode::Down => {
            app.mode = Mode::Browse;
            move_down(app);
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => {
            app.input.push(c);
        }
        _ => {}
    }
}

fn handle_browse(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Tab => {
            app.popup = match app.popup {
                Popup::Notes => Popup::Todos,
                Popup::Todos => Popup::Notes,
            };
            app.show_completed = false;
            app.reset_selection();
        }
        KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Esc => {
            app.mode = Mode::Input;
        }
        KeyCode::Down | KeyCode::Char('j') => move_down(app),
        KeyCode::Up | KeyCode::Char('k') => move_up(app),
        KeyCode::Enter | KeyCode::Char('x') => activate(app),
        KeyCode::Char('e') => start_edit(app),
        KeyCode::Char('d') => delete_selected(app),
        KeyCode::Char('v') => {
            app.show_completed = !app.show_completed;
            app.reset_selection();
        }
        _ => {}
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    let board = match app.popup {
        Popup::Notes => &mut app.notes,
        Popup::Todos => &mut app.todos,
    };
    match key.code {
        KeyCode::Enter => {
            match board.save_edit() {
                Ok(Some(_)) => app.set_status("saved"),
                Ok(None) => {}
                Err(e) => app.set_error(e.to_string()),
            }
            app.mode = Mode::Browse;
        }
        KeyCode::Esc => {
            board.cancel_edit();
            app.mode = Mode::Browse;
        }
        KeyCode::Backspace => {
            if let Some(buffer) = board.edit_buffer_mut() {
                buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(buffer) = board.edit_buffer_mut() {
                buffer.push(c);
            }
        }
        _ => {}
    }
}

fn submit_input(app: &mut App) {
    let text = app.input.clone();
    let result = match app.popup {
        Popup::Notes => app.notes.create(&text),
        Popup::Todos => app.todos.create(&text),
    };
    match result {
        Ok(Some(_)) => {
            app.input.clear();
            app.sync_cursors();
        }
        // Empty input: guarded no-op, keep the buffer as typed
        Ok(None) => {}
        Err(e) => app.set_error(e.to_string()),
    }
}

fn move_down(app: &mut App) {
    let len = app.visible_len();
    match app.popup {
        Popup::Todos => app.todo_cursor.move_down(len),
        Popup::Notes => {
            if len > 0 && app.notes_cursor + 1 < len {
                app.notes_cursor += 1;
            }
        }
    }
}

fn move_up(app: &mut App) {
    match app.popup {
        Popup::Todos => {
            app.todo_cursor.move_up();
            // Leaving the list returns focus to the input field
            if app.todo_cursor.index().is_none() {
                app.mode = Mode::Input;
            }
        }
        Popup::Notes => {
            app.notes_cursor = app.notes_cursor.saturating_sub(1);
        }
    }
}

/// Enter on a selected row: toggle completion in the active view,
/// restore in the completed view.
fn activate(app: &mut App) {
    let Some(id) = app.selected_id() else {
        return;
    };
    let restore = app.show_completed;
    let result = match app.popup {
        Popup::Notes if restore => app.notes.restore(&id),
        Popup::Notes => app.notes.toggle_complete(&id),
        Popup::Todos if restore => app.todos.restore(&id),
        Popup::Todos => app.todos.toggle_complete(&id),
    };
    match result {
        Ok(()) => app.sync_cursors(),
        Err(e) => app.set_error(e.to_string()),
    }
}

fn start_edit(app: &mut App) {
    // Only the note popup offers editing, and only on active items
    if app.popup != Popup::Notes || app.show_completed {
        return;
    }
    let Some(id) = app.selected_id() else {
        return;
    };
    match app.notes.start_edit(&id) {
        Ok(()) => app.mode = Mode::Edit,
        Err(e) => app.set_error(e.to_string()),
    }
}

fn delete_selected(app: &mut App) {
    if app.show_completed {
        return;
    }
    let Some(id) = app.selected_id() else {
        return;
    };
    if app.current_board().delete_pending(&id) {
        // Control is disabled while a delete is in flight
        return;
    }
    let result = match app.popup {
        Popup::Notes => app.rt.block_on(app.notes.delete(&id)),
        Popup::Todos => app.rt.block_on(app.todos.delete(&id)),
    };
    match result {
        Ok(item) => {
            app.set_status(format!("deleted \"{}\"", item.title()));
            app.sync_cursors();
        }
        // Failed submission: the item stays visible for a retry
        Err(e) => app.set_error(e.to_string()),
    }
}
