//! Pure board logic: partitioning tasks into status columns and
//! computing moves.
//!
//! The board is a view over the last-fetched task list. Moves are
//! applied to it optimistically; the server's answer is never merged
//! back, the next full re-fetch replaces everything.

use crate::api::{Task, TaskMove, TaskStatus};

/// Number of board columns, one per status.
pub const COLUMN_COUNT: usize = 3;

/// The in-memory kanban board: one task vector per status, each sorted
/// ascending by ordering (ties broken by id for determinism).
#[derive(Debug, Clone, Default)]
pub struct Board {
    columns: [Vec<Task>; COLUMN_COUNT],
}

/// A position on the board.
pub type Position = (usize, usize);

/// A computed move: which task, and the patch body for the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub id: i64,
    pub body: TaskMove,
}

impl Board {
    /// Partition a fetched task list into columns.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut columns: [Vec<Task>; COLUMN_COUNT] = Default::default();
        for task in tasks {
            columns[task.status.column()].push(task);
        }
        for column in &mut columns {
            column.sort_by_key(|t| (t.ordering, t.id));
        }
        Self { columns }
    }

    pub fn column(&self, idx: usize) -> &[Task] {
        &self.columns[idx]
    }

    pub fn column_len(&self, idx: usize) -> usize {
        self.columns[idx].len()
    }

    pub fn task_at(&self, pos: Position) -> Option<&Task> {
        self.columns.get(pos.0).and_then(|c| c.get(pos.1))
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Move a task from one position to another, mutating the board
    /// optimistically. Returns the patch to send, or None when the move
    /// is an identity (same position) or `from` does not exist.
    ///
    /// Same-column moves are remove-at/insert-at reorders; cross-column
    /// moves transfer the task and rewrite its status. The new ordering
    /// is simply the drop index, matching what the backend expects.
    pub fn move_task(&mut self, from: Position, to: Position) -> Option<MoveRequest> {
        let (from_col, from_row) = from;
        let (to_col, mut to_row) = to;
        if from_col >= COLUMN_COUNT || to_col >= COLUMN_COUNT {
            return None;
        }
        if from_row >= self.columns[from_col].len() {
            return None;
        }
        if from == to {
            return None;
        }

        let mut task = self.columns[from_col].remove(from_row);
        to_row = to_row.min(self.columns[to_col].len());
        let status = TaskStatus::ALL[to_col];
        task.status = status;

        let id = task.id;
        self.columns[to_col].insert(to_row, task);

        Some(MoveRequest {
            id,
            body: TaskMove {
                status,
                ordering: to_row as i64,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64, status: TaskStatus, ordering: i64) -> Task {
        let now = Utc::now();
        Task {
            id,
            title: format!("task-{}", id),
            description: String::new(),
            status,
            priority: Default::default(),
            due_date: None,
            created_by: None,
            assigned_to: None,
            ordering,
            created_at: now,
            updated_at: now,
        }
    }

    fn board() -> Board {
        Board::from_tasks(vec![
            task(1, TaskStatus::Todo, 0),
            task(2, TaskStatus::Todo, 1),
            task(3, TaskStatus::Todo, 2),
            task(4, TaskStatus::InProgress, 0),
            task(5, TaskStatus::Done, 0),
        ])
    }

    #[test]
    fn test_partition_by_status() {
        let b = board();
        assert_eq!(b.column_len(0), 3);
        assert_eq!(b.column_len(1), 1);
        assert_eq!(b.column_len(2), 1);
        assert_eq!(b.total(), 5);
    }

    #[test]
    fn test_partition_sorts_by_ordering_then_id() {
        let b = Board::from_tasks(vec![
            task(9, TaskStatus::Todo, 2),
            task(3, TaskStatus::Todo, 0),
            task(7, TaskStatus::Todo, 0),
            task(5, TaskStatus::Todo, 1),
        ]);
        let ids: Vec<i64> = b.column(0).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 7, 5, 9]);
    }

    #[test]
    fn test_same_column_reorder() {
        let mut b = board();
        let req = b.move_task((0, 0), (0, 2)).unwrap();
        assert_eq!(req.id, 1);
        assert_eq!(req.body.status, TaskStatus::Todo);
        assert_eq!(req.body.ordering, 2);
        let ids: Vec<i64> = b.column(0).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_cross_column_move_changes_status() {
        let mut b = board();
        let req = b.move_task((0, 1), (2, 0)).unwrap();
        assert_eq!(req.id, 2);
        assert_eq!(req.body.status, TaskStatus::Done);
        assert_eq!(req.body.ordering, 0);
        assert_eq!(b.column_len(0), 2);
        assert_eq!(b.column_len(2), 2);
        assert_eq!(b.column(2)[0].id, 2);
        assert_eq!(b.column(2)[0].status, TaskStatus::Done);
    }

    #[test]
    fn test_identity_move_is_none() {
        let mut b = board();
        assert!(b.move_task((0, 1), (0, 1)).is_none());
        assert_eq!(b.column_len(0), 3);
    }

    #[test]
    fn test_drop_index_clamped_to_target_len() {
        let mut b = board();
        let req = b.move_task((0, 0), (1, 99)).unwrap();
        // Target column had one task, so the clamped drop index is 1.
        assert_eq!(req.body.ordering, 1);
        assert_eq!(b.column(1)[1].id, 1);
    }

    #[test]
    fn test_move_from_missing_position_is_none() {
        let mut b = board();
        assert!(b.move_task((1, 5), (0, 0)).is_none());
        assert!(b.move_task((7, 0), (0, 0)).is_none());
    }

    #[test]
    fn test_move_into_empty_board_column() {
        let mut b = Board::from_tasks(vec![task(1, TaskStatus::Todo, 0)]);
        let req = b.move_task((0, 0), (2, 0)).unwrap();
        assert_eq!(req.body.status, TaskStatus::Done);
        assert_eq!(req.body.ordering, 0);
        assert_eq!(b.column_len(0), 0);
        assert_eq!(b.column_len(2), 1);
    }
}
