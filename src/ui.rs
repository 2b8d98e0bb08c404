//! Terminal UI rendering for the taskdeck TUI.
//!
//! Design philosophy carried over from the rest of the codebase:
//! - Minimal chrome: no box drawing, no decorative labels
//! - Whitespace as structure: position and spacing create hierarchy
//! - Grayscale palette; selection uses REVERSED to adapt to the theme
//!
//! This module renders from RenderState (immutable snapshot) - it never
//! mutates application state. This enables the decoupled game loop.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::api::{TaskPriority, TaskStatus};
use crate::board::COLUMN_COUNT;
use crate::render::{RenderState, TaskView};
use crate::tea::{AuthField, AuthForm, Notification, NotificationLevel, Route, TaskField, TaskForm};

// Color tokens (selection uses REVERSED modifier to adapt to terminal theme)
const COLOR_TEXT_DIMMED: Color = Color::Gray;
const COLOR_TEXT_MUTED: Color = Color::DarkGray;
const COLOR_SEPARATOR: Color = Color::White;

// Priority color coding for faster visual parsing (uses terminal palette)
const COLOR_PRIORITY_HIGH: Color = Color::Red;
const COLOR_PRIORITY_NORMAL: Color = Color::Gray;
const COLOR_PRIORITY_LOW: Color = Color::DarkGray;

// Layout constants
const FORM_WIDTH: u16 = 52;
const AUTH_WIDTH: u16 = 44;

// -----------------------------------------------------------------------------
// Context-sensitive keymap system
// -----------------------------------------------------------------------------

/// Context for determining which keybindings to display.
/// Derived from RenderState - this is the "view model" for the statusbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapContext {
    /// Login or register screen
    Auth,
    /// Normal board browsing
    Board { has_selection: bool },
    /// A task is grabbed and being carried
    Grabbing,
    /// The task form is open
    Form,
}

impl KeymapContext {
    /// Derive keymap context from render state.
    pub fn from_render_state(state: &RenderState) -> Self {
        match state.route {
            Route::Login | Route::Register => KeymapContext::Auth,
            Route::Board => {
                if state.task_form.is_some() {
                    KeymapContext::Form
                } else if state.grabbed {
                    KeymapContext::Grabbing
                } else {
                    let (col, row) = state.selected;
                    let has_selection = state
                        .columns
                        .get(col)
                        .is_some_and(|column| row < column.len());
                    KeymapContext::Board { has_selection }
                }
            }
        }
    }
}

/// A single keybinding entry for display.
struct Keybinding(&'static str, &'static str);

/// A group of related keybindings (separated by │).
struct KeybindingGroup(Vec<Keybinding>);

/// Get keybindings for a given context.
fn keybindings_for_context(ctx: KeymapContext) -> Vec<KeybindingGroup> {
    match ctx {
        KeymapContext::Auth => vec![KeybindingGroup(vec![
            Keybinding("Tab", "next field"),
            Keybinding("Enter", "submit"),
            Keybinding("Ctrl-r", "switch"),
            Keybinding("Esc", "quit"),
        ])],
        KeymapContext::Board { has_selection } => {
            let task_actions = if has_selection {
                vec![
                    Keybinding("n", "new"),
                    Keybinding("e", "edit"),
                    Keybinding("Space", "grab"),
                ]
            } else {
                vec![Keybinding("n", "new")]
            };
            vec![
                KeybindingGroup(vec![Keybinding("hjkl", "move")]),
                KeybindingGroup(task_actions),
                KeybindingGroup(vec![
                    Keybinding("r", "refresh"),
                    Keybinding("L", "logout"),
                    Keybinding("q", "quit"),
                ]),
            ]
        }
        KeymapContext::Grabbing => vec![KeybindingGroup(vec![
            Keybinding("hjkl", "carry"),
            Keybinding("Space", "drop"),
            Keybinding("Esc", "cancel"),
        ])],
        KeymapContext::Form => vec![KeybindingGroup(vec![
            Keybinding("Tab", "next field"),
            Keybinding("Space", "cycle"),
            Keybinding("Enter", "save"),
            Keybinding("Esc", "cancel"),
        ])],
    }
}

/// Main render function - entry point for all UI drawing.
/// Takes an immutable RenderState snapshot.
pub fn draw(frame: &mut Frame, state: &RenderState) {
    match state.route {
        Route::Login | Route::Register => render_auth_screen(frame, state),
        Route::Board => render_board(frame, state),
    }

    if let Some(ref form) = state.task_form {
        render_task_form(frame, form, &state.usernames, frame.area());
    }

    if let Some(ref notification) = state.notification {
        render_notification(frame, notification, frame.area());
    }
}

// -----------------------------------------------------------------------------
// Auth screens
// -----------------------------------------------------------------------------

fn render_auth_screen(frame: &mut Frame, state: &RenderState) {
    let area = centered_rect(frame.area(), AUTH_WIDTH, 12);

    let title = match state.route {
        Route::Register => "taskdeck · create account",
        _ => "taskdeck · sign in",
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());

    let fields: &[AuthField] = match state.route {
        Route::Register => &[AuthField::Email, AuthField::Username, AuthField::Password],
        _ => &[AuthField::Username, AuthField::Password],
    };
    for field in fields {
        lines.push(auth_field_line(&state.auth_form, *field));
    }

    lines.push(Line::default());
    if state.auth_form.submitting {
        lines.push(Line::from(Span::styled(
            "Signing in…",
            Style::default().fg(COLOR_TEXT_DIMMED),
        )));
    } else if let Some(ref err) = state.auth_form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        let hint = match state.route {
            Route::Register => "Ctrl-r to sign in instead",
            _ => "Ctrl-r to create an account",
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(COLOR_TEXT_MUTED),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
    render_statusbar(frame, state, bottom_line(frame.area()));
}

fn auth_field_line(form: &AuthForm, field: AuthField) -> Line<'static> {
    let focused = form.focus == field;
    let value = match field {
        AuthField::Username => form.username.clone(),
        AuthField::Email => form.email.clone(),
        AuthField::Password => "*".repeat(form.password.chars().count()),
    };
    field_line(field.label(), value, focused, 10)
}

// -----------------------------------------------------------------------------
// Board
// -----------------------------------------------------------------------------

fn render_board(frame: &mut Frame, state: &RenderState) {
    let area = frame.area();
    if area.height < 4 {
        render_statusbar(frame, state, bottom_line(area));
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, state, chunks[0]);
    render_separator(frame, chunks[1]);

    let columns = Layout::horizontal([Constraint::Ratio(1, 3); COLUMN_COUNT]).split(chunks[2]);
    for (col, column_area) in columns.iter().enumerate() {
        render_column(frame, state, col, *column_area);
    }

    render_statusbar(frame, state, chunks[3]);
}

/// Top line: app name, backend base URL, loading indicator.
fn render_header(frame: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![
        Span::styled("taskdeck", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", state.base_url),
            Style::default().fg(COLOR_TEXT_MUTED),
        ),
    ];
    if state.loading {
        spans.push(Span::styled(
            "  syncing…",
            Style::default().fg(COLOR_TEXT_DIMMED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_separator(frame: &mut Frame, area: Rect) {
    let solid = "─".repeat(area.width as usize);
    let line = Line::from(Span::styled(solid, Style::default().fg(COLOR_SEPARATOR)));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_column(frame: &mut Frame, state: &RenderState, col: usize, area: Rect) {
    let tasks = &state.columns[col];
    let width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(" {} ({})", TaskStatus::ALL[col].label(), tasks.len()),
        Style::default().fg(COLOR_TEXT_DIMMED),
    )));
    lines.push(Line::default());

    for (row, task) in tasks.iter().enumerate() {
        let selected = state.selected == (col, row);
        let carried = selected && state.grabbed;
        lines.push(card_title_line(task, selected, carried, width));
        lines.push(card_meta_line(task, width));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn card_title_line(task: &TaskView, selected: bool, carried: bool, width: usize) -> Line<'static> {
    let marker = if carried { "≡ " } else { "  " };
    let title = truncate(&task.title, width.saturating_sub(2));
    let mut style = Style::default();
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if carried {
        style = style.add_modifier(Modifier::BOLD);
    }
    Line::from(Span::styled(format!("{}{}", marker, title), style))
}

fn card_meta_line(task: &TaskView, width: usize) -> Line<'static> {
    let mut meta = task.priority.label().to_lowercase();
    if let Some(ref due) = task.due_date {
        meta.push_str(&format!(" · {}", due));
    }
    if let Some(ref assignee) = task.assignee {
        meta.push_str(&format!(" · {}", assignee));
    }
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            truncate(&meta, width.saturating_sub(2)),
            Style::default().fg(priority_color(task.priority)),
        ),
    ])
}

fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::High => COLOR_PRIORITY_HIGH,
        TaskPriority::Normal => COLOR_PRIORITY_NORMAL,
        TaskPriority::Low => COLOR_PRIORITY_LOW,
    }
}

// -----------------------------------------------------------------------------
// Task form overlay
// -----------------------------------------------------------------------------

fn render_task_form(frame: &mut Frame, form: &TaskForm, usernames: &[String], area: Rect) {
    let overlay = centered_rect(area, FORM_WIDTH, 12);
    frame.render_widget(Clear, overlay);

    let title = if form.editing.is_some() {
        "Edit task"
    } else {
        "New task"
    };

    let assignee = form
        .assignee
        .and_then(|i| usernames.get(i))
        .cloned()
        .unwrap_or_else(|| "(unassigned)".to_string());

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    lines.push(task_field_line(form, TaskField::Title, form.title.clone()));
    lines.push(task_field_line(
        form,
        TaskField::Description,
        form.description.clone(),
    ));
    lines.push(task_field_line(
        form,
        TaskField::Priority,
        form.priority.label().to_string(),
    ));
    lines.push(task_field_line(form, TaskField::DueDate, form.due_date.clone()));
    lines.push(task_field_line(form, TaskField::Assignee, assignee));
    lines.push(Line::default());

    if let Some(ref err) = form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines), overlay);
}

fn task_field_line(form: &TaskForm, field: TaskField, value: String) -> Line<'static> {
    field_line(field.label(), value, form.focus == field, 12)
}

// -----------------------------------------------------------------------------
// Shared chrome
// -----------------------------------------------------------------------------

/// A label + value row. The focused row gets a cursor block and bright text.
fn field_line(label: &str, value: String, focused: bool, label_width: usize) -> Line<'static> {
    let label_style = if focused {
        Style::default()
    } else {
        Style::default().fg(COLOR_TEXT_MUTED)
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = label_width), label_style),
        Span::raw(value),
        Span::styled(cursor.to_string(), Style::default().fg(COLOR_TEXT_DIMMED)),
    ])
}

/// Render keybindings legend for the bottom line.
/// When show_keymap is false: Shows just "?" (grayed out)
/// When show_keymap is true: Shows "? │ <full keymap legend>" with bright "?"
fn render_statusbar(frame: &mut Frame, state: &RenderState, area: Rect) {
    let ctx = KeymapContext::from_render_state(state);
    let groups = keybindings_for_context(ctx);

    let key_style = Style::default().fg(COLOR_TEXT_DIMMED);
    let desc_style = Style::default().fg(COLOR_TEXT_MUTED);
    let sep_style = Style::default().fg(COLOR_TEXT_MUTED);

    let mut spans: Vec<Span> = Vec::new();

    let help_style = if state.show_keymap {
        Style::default()
    } else {
        Style::default().fg(COLOR_TEXT_MUTED)
    };
    spans.push(Span::styled("?", help_style));

    if state.show_keymap {
        for group in groups.iter() {
            if group.0.is_empty() {
                continue;
            }
            spans.push(Span::styled(" │ ", sep_style));
            for (key_idx, keybinding) in group.0.iter().enumerate() {
                if key_idx > 0 {
                    spans.push(Span::styled(" • ", sep_style));
                }
                spans.push(Span::styled(keybinding.0, key_style));
                spans.push(Span::styled(format!(" {}", keybinding.1), desc_style));
            }
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render notification as a one-line overlay at the bottom of the area.
/// - Error: Red text with "Error:" prefix and bold styling
/// - Info: Green text without prefix
fn render_notification(frame: &mut Frame, notification: &Notification, area: Rect) {
    let notification_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, notification_area);

    let line = match notification.level {
        NotificationLevel::Error => Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                notification.message.clone(),
                Style::default().fg(Color::Red),
            ),
        ]),
        NotificationLevel::Info => Line::from(Span::styled(
            notification.message.clone(),
            Style::default().fg(Color::Green),
        )),
    };

    frame.render_widget(Paragraph::new(line), notification_area);
}

// Helper functions

fn bottom_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{}~", truncated)
    }
}
