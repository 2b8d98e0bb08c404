//! Pure update function for the TEA (The Elm Architecture) pattern.
//!
//! The update function takes a model and a message, mutates the model,
//! and returns a list of commands to execute. All I/O happens in the
//! returned commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::TaskStatus;
use crate::board::{Board, MoveRequest, Position};
use crate::{tlog, tlog_debug, tlog_warn};

use super::command::Command;
use super::message::Message;
use super::model::{Model, Notification, NotificationLevel, Route, TaskField, TaskForm};

/// Helper to set an error notification and mark model as dirty.
fn set_error(model: &mut Model, message: String) {
    tlog_warn!("UI Error: {}", message);
    model.notification = Some(Notification {
        level: NotificationLevel::Error,
        message,
    });
    model.dirty = true;
}

fn set_info(model: &mut Model, message: String) {
    model.notification = Some(Notification {
        level: NotificationLevel::Info,
        message,
    });
    model.dirty = true;
}

/// Pure update function: Model + Message → Commands
pub fn update(model: &mut Model, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::Key(key) => {
            model.notification = None; // Clear notification on any key press
            model.dirty = true; // Keyboard input always triggers render
            match model.route {
                Route::Login | Route::Register => update_auth_screen(model, key, &mut cmds),
                Route::Board => {
                    if model.task_form.is_some() {
                        update_task_form(model, key, &mut cmds);
                    } else if model.grabbed.is_some() {
                        update_grab_mode(model, key, &mut cmds);
                    } else {
                        update_board_mode(model, key, &mut cmds);
                    }
                }
            }
        }

        Message::Resize(_, _) => {
            model.dirty = true; // Resize triggers re-render
        }

        // Auth completions
        Message::LoggedIn(user) => {
            tlog!(
                "Message::LoggedIn user={:?}",
                user.as_ref().map(|u| u.username.as_str())
            );
            model.auth_form.reset(Route::Login);
            // The token is already stored by the time this arrives, so
            // the guard would pass; skip re-reading the session flag.
            model.route = Route::Board;
            model.loading = true;
            model.dirty = true;
            cmds.push(Command::FetchUsers);
            cmds.push(Command::FetchTasks);
        }

        Message::Registered(user) => {
            tlog!(
                "Message::Registered user={:?}",
                user.as_ref().map(|u| u.username.as_str())
            );
            model.auth_form.reset(Route::Login);
            model.route = Route::Board;
            model.loading = true;
            set_info(model, "Account created".to_string());
            cmds.push(Command::FetchUsers);
            cmds.push(Command::FetchTasks);
        }

        Message::AuthFailed(err) => {
            tlog_warn!("Message::AuthFailed err={}", err);
            model.auth_form.submitting = false;
            model.auth_form.error = Some(err);
            model.dirty = true;
        }

        Message::LoggedOut => {
            tlog!("Message::LoggedOut");
            reset_to_login(model, Route::Login);
            set_info(model, "Logged out".to_string());
        }

        Message::SessionExpired => {
            tlog_warn!("Message::SessionExpired");
            reset_to_login(model, Route::Login);
            set_error(model, "Session expired. Log in again.".to_string());
        }

        // Data completions
        Message::TasksLoaded(tasks) => {
            tlog_debug!("Message::TasksLoaded count={}", tasks.len());
            // A reload invalidates any in-flight grab origin.
            model.grabbed = None;
            model.board = Board::from_tasks(tasks);
            model.clamp_selection();
            model.loading = false;
            model.dirty = true;
        }

        Message::TasksLoadFailed(err) => {
            model.loading = false;
            set_error(model, format!("Failed to load tasks: {}", err));
        }

        Message::UsersLoaded(users) => {
            tlog_debug!("Message::UsersLoaded count={}", users.len());
            model.users = users;
            model.dirty = true;
        }

        Message::UsersLoadFailed(err) => {
            set_error(model, format!("Failed to load users: {}", err));
        }

        // Mutation completions: every mutation is followed by a full
        // re-fetch rather than an incremental merge.
        Message::TaskCreated(task) => {
            tlog_debug!("Message::TaskCreated id={}", task.id);
            set_info(model, "Task created".to_string());
            model.loading = true;
            cmds.push(Command::FetchTasks);
        }

        Message::TaskUpdated(task) => {
            tlog_debug!("Message::TaskUpdated id={}", task.id);
            set_info(model, "Task updated".to_string());
            model.loading = true;
            cmds.push(Command::FetchTasks);
        }

        Message::TaskSaveFailed(err) => {
            set_error(model, format!("Failed to save task: {}", err));
        }

        Message::TaskMoved(id) => {
            tlog_debug!("Message::TaskMoved id={}", id);
            model.loading = true;
            cmds.push(Command::FetchTasks);
        }

        // The optimistic move stays in place; the next refresh is
        // authoritative.
        Message::TaskMoveFailed(err) => {
            set_error(model, format!("Failed to move task: {}", err));
        }
    }

    cmds
}

fn reset_to_login(model: &mut Model, route: Route) {
    model.board = Board::default();
    model.users.clear();
    model.selected = (0, 0);
    model.grabbed = None;
    model.task_form = None;
    model.loading = false;
    model.auth_form.reset(route);
    model.route = route;
    model.dirty = true;
}

fn update_auth_screen(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    // Ctrl-r toggles between the login and register screens.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('r') = key.code {
            let target = match model.route {
                Route::Login => Route::Register,
                _ => Route::Login,
            };
            model.navigate(target);
            model.auth_form.reset(target);
        }
        return;
    }

    match key.code {
        KeyCode::Enter => {
            if model.auth_form.submitting {
                return;
            }
            match model.auth_form.validate(model.route) {
                Ok(()) => {
                    model.auth_form.submitting = true;
                    model.auth_form.error = None;
                    cmds.push(match model.route {
                        Route::Register => Command::Register(crate::api::RegisterPayload {
                            username: model.auth_form.username.clone(),
                            email: model.auth_form.email.clone(),
                            password: model.auth_form.password.clone(),
                        }),
                        _ => Command::Login(crate::api::LoginPayload {
                            username: model.auth_form.username.clone(),
                            password: model.auth_form.password.clone(),
                        }),
                    });
                }
                Err(msg) => {
                    model.auth_form.error = Some(msg);
                }
            }
        }

        KeyCode::Tab => {
            model.auth_form.focus = model.auth_form.focus.next(model.route);
        }

        KeyCode::Esc => {
            cmds.push(Command::Quit);
        }

        KeyCode::Backspace => {
            let focus = model.auth_form.focus;
            model.auth_form.value_mut(focus).pop();
        }

        KeyCode::Char(c) => {
            let focus = model.auth_form.focus;
            model.auth_form.value_mut(focus).push(c);
        }

        _ => {}
    }
}

fn update_board_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    let (col, row) = model.selected;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let len = model.board.column_len(col);
            if len > 0 {
                model.selected = (col, (row + 1) % len);
            }
        }

        KeyCode::Char('k') | KeyCode::Up => {
            let len = model.board.column_len(col);
            if len > 0 {
                model.selected = (col, row.checked_sub(1).unwrap_or(len - 1));
            }
        }

        KeyCode::Char('h') | KeyCode::Left => {
            model.selected = (col.checked_sub(1).unwrap_or(crate::board::COLUMN_COUNT - 1), row);
            model.clamp_selection();
        }

        KeyCode::Char('l') | KeyCode::Right => {
            model.selected = ((col + 1) % crate::board::COLUMN_COUNT, row);
            model.clamp_selection();
        }

        KeyCode::Char('n') => {
            model.task_form = Some(TaskForm::create(TaskStatus::ALL[col]));
        }

        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(task) = model.selected_task().cloned() {
                model.task_form = Some(TaskForm::edit(&task, &model.users));
            }
        }

        KeyCode::Char(' ') => {
            if model.selected_task().is_some() {
                model.grabbed = Some(model.selected);
            }
        }

        KeyCode::Char('r') => {
            model.loading = true;
            cmds.push(Command::FetchTasks);
        }

        KeyCode::Char('L') => {
            cmds.push(Command::Logout);
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            cmds.push(Command::Quit);
        }

        KeyCode::Char('?') => {
            model.show_keymap = !model.show_keymap;
        }

        _ => {}
    }
}

/// While a task is grabbed, movement keys carry it across the board
/// (the keyboard analogue of a drag). The board mutates optimistically;
/// nothing is sent until the drop.
fn update_grab_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    let (col, row) = model.selected;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if row + 1 < model.board.column_len(col) {
                carry(model, (col, row + 1));
            }
        }

        KeyCode::Char('k') | KeyCode::Up => {
            if row > 0 {
                carry(model, (col, row - 1));
            }
        }

        KeyCode::Char('h') | KeyCode::Left => {
            if col > 0 {
                carry(model, (col - 1, row));
            }
        }

        KeyCode::Char('l') | KeyCode::Right => {
            if col + 1 < crate::board::COLUMN_COUNT {
                carry(model, (col + 1, row));
            }
        }

        // Drop. An identity drop issues no request.
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(origin) = model.grabbed.take() {
                let target = model.selected;
                if target != origin {
                    if let Some(task) = model.board.task_at(target) {
                        let request = MoveRequest {
                            id: task.id,
                            body: crate::api::TaskMove {
                                status: TaskStatus::ALL[target.0],
                                ordering: target.1 as i64,
                            },
                        };
                        tlog_debug!(
                            "Drop id={} status={:?} ordering={}",
                            request.id,
                            request.body.status,
                            request.body.ordering
                        );
                        cmds.push(Command::MoveTask(request));
                    }
                }
            }
        }

        // Cancel: put the task back where it was grabbed.
        KeyCode::Esc => {
            if let Some(origin) = model.grabbed.take() {
                let _ = model.board.move_task(model.selected, origin);
                model.selected = origin;
            }
        }

        _ => {}
    }
}

/// Apply one step of a carry, keeping the cursor on the moved task.
fn carry(model: &mut Model, target: Position) {
    if let Some(req) = model.board.move_task(model.selected, target) {
        model.selected = (target.0, req.body.ordering as usize);
    }
}

fn update_task_form(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    let Some(form) = model.task_form.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Enter => match form.validate(&model.users) {
            Ok(payload) => {
                let cmd = match form.editing {
                    Some(id) => Command::UpdateTask { id, payload },
                    None => Command::CreateTask(payload),
                };
                model.task_form = None;
                cmds.push(cmd);
            }
            Err(msg) => {
                form.error = Some(msg);
            }
        },

        KeyCode::Tab => {
            form.focus = form.focus.next();
        }

        KeyCode::BackTab => {
            form.focus = form.focus.prev();
        }

        KeyCode::Esc => {
            model.task_form = None;
        }

        KeyCode::Backspace => match form.focus {
            TaskField::Title => {
                form.title.pop();
            }
            TaskField::Description => {
                form.description.pop();
            }
            TaskField::DueDate => {
                form.due_date.pop();
            }
            TaskField::Priority | TaskField::Assignee => {}
        },

        KeyCode::Right => match form.focus {
            TaskField::Priority => form.priority = form.priority.next(),
            TaskField::Assignee => form.cycle_assignee(model.users.len()),
            _ => {}
        },

        KeyCode::Left => {
            if form.focus == TaskField::Priority {
                form.priority = form.priority.prev();
            }
        }

        KeyCode::Char(c) => match form.focus {
            TaskField::Title => form.title.push(c),
            TaskField::Description => form.description.push(c),
            TaskField::DueDate => form.due_date.push(c),
            TaskField::Priority => {
                if c == ' ' {
                    form.priority = form.priority.next();
                }
            }
            TaskField::Assignee => {
                if c == ' ' {
                    form.cycle_assignee(model.users.len());
                }
            }
        },

        _ => {}
    }
}
