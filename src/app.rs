use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossterm::event::{self, Event};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Error;
use crate::render::RenderState;
use crate::session::SessionStore;
use crate::tea::{update, Command, Message, Model, Route};
use crate::{tlog_debug, tlog_error, Result};

const MAX_BG_MESSAGES: usize = 50;

pub struct LogicThread;

impl LogicThread {
    pub fn run(config: Config, state_tx: Sender<RenderState>, shutdown: Arc<AtomicBool>) -> Result<()> {
        Runtime::new()?.block_on(Self::run_async(config, state_tx, shutdown))
    }

    async fn run_async(
        config: Config,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        let session = Arc::new(SessionStore::load()?);
        let client = Arc::new(ApiClient::new(config.effective_base_url(), session.clone()));
        tlog_debug!(
            "LogicThread::run_async base_url={} authenticated={}",
            client.base_url(),
            session.is_authenticated()
        );

        let mut model = Model::new(config, session);
        let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Message>();

        // A valid stored token lands straight on the board; start the
        // initial sync immediately.
        if model.route == Route::Board {
            model.loading = true;
            execute_command(&mut model, Command::FetchUsers, &client, &msg_tx).await;
            execute_command(&mut model, Command::FetchTasks, &client, &msg_tx).await;
        }

        send_state(&state_tx, &model);

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            // Keyboard input (priority)
            while event::poll(Duration::ZERO)? {
                let msg = match event::read()? {
                    Event::Key(key) => Message::Key(key),
                    Event::Resize(w, h) => Message::Resize(w, h),
                    _ => continue,
                };

                for cmd in update(&mut model, msg) {
                    if execute_command(&mut model, cmd, &client, &msg_tx).await {
                        shutdown.store(true, Ordering::Relaxed);
                        return Ok(());
                    }
                }

                if model.dirty {
                    send_state(&state_tx, &model);
                    model.dirty = false;
                }
            }

            // Background messages (bounded)
            for _ in 0..MAX_BG_MESSAGES {
                let Ok(msg) = msg_rx.try_recv() else { break };
                for cmd in update(&mut model, msg) {
                    if execute_command(&mut model, cmd, &client, &msg_tx).await {
                        shutdown.store(true, Ordering::Relaxed);
                        return Ok(());
                    }
                }
            }

            if model.dirty {
                send_state(&state_tx, &model);
                model.dirty = false;
            }

            tokio::time::sleep(Duration::from_micros(500)).await;
        }

        Ok(())
    }
}

/// Execute a command, spawning network calls onto the runtime. Returns
/// true when the application should quit.
async fn execute_command(
    model: &mut Model,
    cmd: Command,
    client: &Arc<ApiClient>,
    msg_tx: &mpsc::UnboundedSender<Message>,
) -> bool {
    match cmd {
        Command::Login(payload) => {
            tlog_debug!("Command::Login username={}", payload.username);
            let client = client.clone();
            let tx = msg_tx.clone();
            tokio::spawn(async move {
                match client.login(&payload).await {
                    Ok(auth) => {
                        let _ = tx.send(Message::LoggedIn(auth.user));
                    }
                    Err(e) => {
                        tlog_error!("Login failed: {}", e);
                        let _ = tx.send(Message::AuthFailed(e.to_string()));
                    }
                }
            });
        }

        Command::Register(payload) => {
            tlog_debug!("Command::Register username={}", payload.username);
            let client = client.clone();
            let tx = msg_tx.clone();
            tokio::spawn(async move {
                match client.register(&payload).await {
                    Ok(auth) => {
                        let _ = tx.send(Message::Registered(auth.user));
                    }
                    Err(e) => {
                        tlog_error!("Register failed: {}", e);
                        let _ = tx.send(Message::AuthFailed(e.to_string()));
                    }
                }
            });
        }

        Command::Logout => {
            tlog_debug!("Command::Logout");
            model.session.clear();
            let _ = msg_tx.send(Message::LoggedOut);
        }

        Command::FetchTasks => {
            let client = client.clone();
            let tx = msg_tx.clone();
            tokio::spawn(async move {
                let msg = match client.tasks().await {
                    Ok(tasks) => Message::TasksLoaded(tasks),
                    Err(e) => fetch_failure(e, Message::TasksLoadFailed),
                };
                let _ = tx.send(msg);
            });
        }

        Command::FetchUsers => {
            let client = client.clone();
            let tx = msg_tx.clone();
            tokio::spawn(async move {
                let msg = match client.users().await {
                    Ok(users) => Message::UsersLoaded(users),
                    Err(e) => fetch_failure(e, Message::UsersLoadFailed),
                };
                let _ = tx.send(msg);
            });
        }

        Command::CreateTask(payload) => {
            tlog_debug!("Command::CreateTask title={}", payload.title);
            let client = client.clone();
            let tx = msg_tx.clone();
            tokio::spawn(async move {
                let msg = match client.create_task(&payload).await {
                    Ok(task) => Message::TaskCreated(task),
                    Err(e) => fetch_failure(e, Message::TaskSaveFailed),
                };
                let _ = tx.send(msg);
            });
        }

        Command::UpdateTask { id, payload } => {
            tlog_debug!("Command::UpdateTask id={}", id);
            let client = client.clone();
            let tx = msg_tx.clone();
            tokio::spawn(async move {
                let msg = match client.update_task(id, &payload).await {
                    Ok(task) => Message::TaskUpdated(task),
                    Err(e) => fetch_failure(e, Message::TaskSaveFailed),
                };
                let _ = tx.send(msg);
            });
        }

        Command::MoveTask(request) => {
            tlog_debug!(
                "Command::MoveTask id={} ordering={}",
                request.id,
                request.body.ordering
            );
            let client = client.clone();
            let tx = msg_tx.clone();
            tokio::spawn(async move {
                let msg = match client.move_task(request.id, request.body).await {
                    Ok(_) => Message::TaskMoved(request.id),
                    Err(e) => fetch_failure(e, Message::TaskMoveFailed),
                };
                let _ = tx.send(msg);
            });
        }

        Command::Quit => {
            tlog_debug!("Command::Quit");
            return true;
        }
    }

    false
}

/// An expired token beats any other failure shape: the client has
/// already cleared the session by the time this error surfaces.
fn fetch_failure(err: Error, wrap: fn(String) -> Message) -> Message {
    match err {
        Error::Unauthorized => Message::SessionExpired,
        other => wrap(other.to_string()),
    }
}

fn send_state(state_tx: &Sender<RenderState>, model: &Model) {
    let _ = state_tx.try_send(model.snapshot());
}
