//! Login, register, logout, and token persistence flows.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskdeck::session::SessionStore;
use taskdeck::tea::{update, Command, Message, Route};

use crate::fixtures::{unauthenticated_model, user, StateDir};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn type_str(model: &mut taskdeck::tea::Model, s: &str) {
    for c in s.chars() {
        update(model, Message::Key(key(KeyCode::Char(c))));
    }
}

/// Test: Full login flow
/// Given credentials typed into the login form
/// When the login completes
/// Then the client lands on the board and starts the initial sync
#[test]
fn test_login_flow_reaches_board() {
    let mut model = unauthenticated_model();
    assert_eq!(model.route, Route::Login);

    type_str(&mut model, "ana");
    update(&mut model, Message::Key(key(KeyCode::Tab)));
    type_str(&mut model, "secret");
    let cmds = update(&mut model, Message::Key(key(KeyCode::Enter)));
    assert!(matches!(cmds.as_slice(), [Command::Login(_)]));

    let cmds = update(&mut model, Message::LoggedIn(Some(user(1, "ana"))));
    assert_eq!(model.route, Route::Board);
    assert!(cmds.contains(&Command::FetchTasks));
    assert!(cmds.contains(&Command::FetchUsers));
}

/// Test: Rejected login
/// Given a login the backend rejects
/// When AuthFailed arrives
/// Then the form shows the flattened error and stays on the login screen
#[test]
fn test_rejected_login_stays_on_login() {
    let mut model = unauthenticated_model();
    type_str(&mut model, "ana");
    update(&mut model, Message::Key(key(KeyCode::Tab)));
    type_str(&mut model, "wrong");
    update(&mut model, Message::Key(key(KeyCode::Enter)));

    let cmds = update(
        &mut model,
        Message::AuthFailed("Authentication failed. Try again.".to_string()),
    );
    assert!(cmds.is_empty());
    assert_eq!(model.route, Route::Login);
    assert!(!model.auth_form.submitting);
    assert_eq!(
        model.auth_form.error.as_deref(),
        Some("Authentication failed. Try again.")
    );

    // The error clears as soon as typing resumes.
    type_str(&mut model, "x");
    assert!(model.notification.is_none());
}

/// Test: Register flow
/// Given the register screen reached via Ctrl-r
/// When the form is completed and submitted
/// Then a Register command carries all three fields
#[test]
fn test_register_flow() {
    let mut model = unauthenticated_model();
    update(
        &mut model,
        Message::Key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
    );
    assert_eq!(model.route, Route::Register);

    type_str(&mut model, "ana@example.com");
    update(&mut model, Message::Key(key(KeyCode::Tab)));
    type_str(&mut model, "ana");
    update(&mut model, Message::Key(key(KeyCode::Tab)));
    type_str(&mut model, "secret");
    let cmds = update(&mut model, Message::Key(key(KeyCode::Enter)));

    match cmds.as_slice() {
        [Command::Register(payload)] => {
            assert_eq!(payload.username, "ana");
            assert_eq!(payload.email, "ana@example.com");
            assert_eq!(payload.password, "secret");
        }
        other => panic!("Expected a single Register command, got {:?}", other),
    }

    let cmds = update(&mut model, Message::Registered(Some(user(1, "ana"))));
    assert_eq!(model.route, Route::Board);
    assert!(cmds.contains(&Command::FetchTasks));
}

/// Test: Token persistence
/// Given a token written by one store
/// When a fresh store loads from the same directory
/// Then the session is still authenticated
#[test]
fn test_token_survives_restart() {
    let dir = StateDir::new();

    let store = SessionStore::load().expect("load in empty dir");
    assert!(!store.is_authenticated());

    store.set_token("opaque-jwt").expect("set token");
    assert!(dir.token_path().exists());

    let reloaded = SessionStore::load().expect("reload");
    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.token().as_deref(), Some("opaque-jwt"));
}

/// Test: Logout clears the stored token
#[test]
fn test_logout_clears_stored_token() {
    let dir = StateDir::new();

    let store = SessionStore::load().expect("load");
    store.set_token("opaque-jwt").expect("set token");
    store.clear();

    assert!(!dir.token_path().exists());
    assert!(!store.is_authenticated());

    let reloaded = SessionStore::load().expect("reload");
    assert!(!reloaded.is_authenticated());
}

/// Test: The auth flag is observable
/// Given a subscriber on the session store
/// When the token is set and cleared
/// Then the watch channel sees both transitions
#[test]
fn test_session_flag_transitions() {
    let _dir = StateDir::new();

    let store = SessionStore::load().expect("load");
    let mut rx = store.subscribe();
    assert!(!*rx.borrow_and_update());

    store.set_token("tok").expect("set token");
    assert!(rx.has_changed().unwrap());
    assert!(*rx.borrow_and_update());

    store.clear();
    assert!(rx.has_changed().unwrap());
    assert!(!*rx.borrow_and_update());
}

/// Test: Session expiry mid-session
/// Given an authenticated model on the board
/// When a 401 surfaces as SessionExpired
/// Then the client lands on login with the board cleared
#[test]
fn test_session_expiry_returns_to_login() {
    let mut model = crate::fixtures::authenticated_model();
    update(
        &mut model,
        Message::TasksLoaded(vec![crate::fixtures::task(
            1,
            "only",
            taskdeck::api::TaskStatus::Todo,
            0,
        )]),
    );
    assert_eq!(model.board.total(), 1);

    update(&mut model, Message::SessionExpired);
    assert_eq!(model.route, Route::Login);
    assert_eq!(model.board.total(), 0);
    assert!(model.users.is_empty());
}
