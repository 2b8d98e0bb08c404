//! Board navigation, drag and drop, and task form flows.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskdeck::api::{TaskMove, TaskStatus};
use taskdeck::tea::{update, Command, Message, Model};

use crate::fixtures::{authenticated_model, task, user};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn press(model: &mut Model, code: KeyCode) -> Vec<Command> {
    update(model, Message::Key(key(code)))
}

fn type_str(model: &mut Model, s: &str) {
    for c in s.chars() {
        press(model, KeyCode::Char(c));
    }
}

/// Board with two Todo tasks, one In Progress task, and two users.
fn seeded_model() -> Model {
    let mut model = authenticated_model();
    update(&mut model, Message::UsersLoaded(vec![user(10, "ana"), user(11, "bo")]));
    update(
        &mut model,
        Message::TasksLoaded(vec![
            task(1, "write draft", TaskStatus::Todo, 0),
            task(2, "review notes", TaskStatus::Todo, 1),
            task(3, "ship build", TaskStatus::InProgress, 0),
        ]),
    );
    model
}

/// Test: Tasks partition into columns sorted by ordering
#[test]
fn test_board_partition() {
    let model = seeded_model();
    let todo: Vec<i64> = model.board.column(0).iter().map(|t| t.id).collect();
    assert_eq!(todo, vec![1, 2]);
    assert_eq!(model.board.column_len(1), 1);
    assert_eq!(model.board.column_len(2), 0);
}

/// Test: Full drag and drop across columns
/// Given a grabbed task carried two columns right
/// When it is dropped
/// Then one PATCH-shaped command is issued and the board already
/// reflects the move
#[test]
fn test_drag_drop_to_done() {
    let mut model = seeded_model();

    press(&mut model, KeyCode::Char(' '));
    press(&mut model, KeyCode::Char('l'));
    press(&mut model, KeyCode::Char('l'));
    let cmds = press(&mut model, KeyCode::Char(' '));

    match cmds.as_slice() {
        [Command::MoveTask(req)] => {
            assert_eq!(req.id, 1);
            assert_eq!(
                req.body,
                TaskMove {
                    status: TaskStatus::Done,
                    ordering: 0
                }
            );
        }
        other => panic!("Expected a single MoveTask command, got {:?}", other),
    }

    assert_eq!(model.board.column(2)[0].id, 1);
    assert_eq!(model.board.column(2)[0].status, TaskStatus::Done);
    assert_eq!(model.board.column_len(0), 1);

    // The server acks, the client re-fetches, and the authoritative
    // list matches what is already on screen.
    let cmds = update(&mut model, Message::TaskMoved(1));
    assert!(cmds.contains(&Command::FetchTasks));
    update(
        &mut model,
        Message::TasksLoaded(vec![
            task(2, "review notes", TaskStatus::Todo, 0),
            task(3, "ship build", TaskStatus::InProgress, 0),
            task(1, "write draft", TaskStatus::Done, 0),
        ]),
    );
    assert_eq!(model.board.column(2)[0].id, 1);
}

/// Test: Reorder within a column sends the new row as ordering
#[test]
fn test_reorder_within_column() {
    let mut model = seeded_model();

    press(&mut model, KeyCode::Char(' '));
    press(&mut model, KeyCode::Char('j'));
    let cmds = press(&mut model, KeyCode::Enter);

    match cmds.as_slice() {
        [Command::MoveTask(req)] => {
            assert_eq!(req.id, 1);
            assert_eq!(req.body.status, TaskStatus::Todo);
            assert_eq!(req.body.ordering, 1);
        }
        other => panic!("Expected a single MoveTask command, got {:?}", other),
    }
}

/// Test: A carry cancelled with Esc leaves the board untouched
#[test]
fn test_cancelled_carry_is_silent() {
    let mut model = seeded_model();

    press(&mut model, KeyCode::Char(' '));
    press(&mut model, KeyCode::Char('l'));
    press(&mut model, KeyCode::Char('j'));
    let cmds = press(&mut model, KeyCode::Esc);

    assert!(cmds.is_empty());
    let todo: Vec<i64> = model.board.column(0).iter().map(|t| t.id).collect();
    assert_eq!(todo, vec![1, 2]);
    assert_eq!(model.board.column_len(1), 1);
    assert_eq!(model.selected, (0, 0));
}

/// Test: A refresh arriving mid-carry cancels the grab
#[test]
fn test_refresh_mid_carry_cancels_grab() {
    let mut model = seeded_model();

    press(&mut model, KeyCode::Char(' '));
    press(&mut model, KeyCode::Char('l'));
    update(
        &mut model,
        Message::TasksLoaded(vec![task(5, "fresh", TaskStatus::Todo, 0)]),
    );

    assert!(model.grabbed.is_none());
    // The drop key now lands in normal mode against an empty column.
    let cmds = press(&mut model, KeyCode::Char(' '));
    assert!(cmds.is_empty());
    assert!(model.grabbed.is_none());
}

/// Test: Create flow end to end
/// Given the form opened over the In Progress column
/// When it is filled and saved
/// Then the create payload carries the column status and the chosen
/// assignee, and the ack triggers a re-fetch
#[test]
fn test_create_task_flow() {
    let mut model = seeded_model();
    model.selected = (1, 0);

    press(&mut model, KeyCode::Char('n'));
    type_str(&mut model, "new card");
    press(&mut model, KeyCode::Tab);
    type_str(&mut model, "details");
    press(&mut model, KeyCode::Tab); // priority
    press(&mut model, KeyCode::Tab); // due date
    type_str(&mut model, "2026-09-15");
    press(&mut model, KeyCode::Tab); // assignee
    press(&mut model, KeyCode::Char(' '));
    let cmds = press(&mut model, KeyCode::Enter);

    match cmds.as_slice() {
        [Command::CreateTask(payload)] => {
            assert_eq!(payload.title, "new card");
            assert_eq!(payload.status, TaskStatus::InProgress);
            assert_eq!(payload.assigned_to_id, Some(10));
            let due = payload.due_date.expect("due date set");
            assert_eq!(due.format("%Y-%m-%d %H:%M").to_string(), "2026-09-15 00:00");
        }
        other => panic!("Expected a single CreateTask command, got {:?}", other),
    }
    assert!(model.task_form.is_none());

    let cmds = update(&mut model, Message::TaskCreated(task(9, "new card", TaskStatus::InProgress, 1)));
    assert!(cmds.contains(&Command::FetchTasks));
}

/// Test: Edit flow issues a full update for the same id
#[test]
fn test_edit_task_flow() {
    let mut model = seeded_model();

    press(&mut model, KeyCode::Char('e'));
    {
        let form = model.task_form.as_mut().expect("form open");
        assert_eq!(form.editing, Some(1));
        form.assignee = Some(1);
    }
    type_str(&mut model, " v2");
    let cmds = press(&mut model, KeyCode::Enter);

    match cmds.as_slice() {
        [Command::UpdateTask { id, payload }] => {
            assert_eq!(*id, 1);
            assert_eq!(payload.title, "write draft v2");
            assert_eq!(payload.assigned_to_id, Some(11));
        }
        other => panic!("Expected a single UpdateTask command, got {:?}", other),
    }
}

/// Test: An invalid due date blocks the save with a field error
#[test]
fn test_bad_due_date_blocks_save() {
    let mut model = seeded_model();

    press(&mut model, KeyCode::Char('n'));
    type_str(&mut model, "title");
    press(&mut model, KeyCode::Tab);
    type_str(&mut model, "desc");
    press(&mut model, KeyCode::Tab);
    press(&mut model, KeyCode::Tab);
    type_str(&mut model, "next week");
    press(&mut model, KeyCode::Tab);
    press(&mut model, KeyCode::Char(' '));
    let cmds = press(&mut model, KeyCode::Enter);

    assert!(cmds.is_empty());
    assert_eq!(
        model.task_form.as_ref().unwrap().error.as_deref(),
        Some("Due date must be YYYY-MM-DD")
    );
}

/// Test: Manual refresh re-fetches without touching the board
#[test]
fn test_manual_refresh() {
    let mut model = seeded_model();
    let cmds = press(&mut model, KeyCode::Char('r'));
    assert_eq!(cmds, vec![Command::FetchTasks]);
    assert!(model.loading);
    assert_eq!(model.board.total(), 3);
}
