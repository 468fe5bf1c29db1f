use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A task owned by a member, optionally assigned to another member.
#[derive(Debug, Clone)]
pub struct Todo {
    pub id: ID,
    pub owner_id: ID,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub due_ts: Option<i64>,
    pub completed_at: Option<i64>,
    pub assignee_id: Option<ID>,
    pub created: i64,
    pub updated: i64,
}

impl Todo {
    pub fn set_status(&mut self, status: TodoStatus, now: i64) {
        self.completed_at = match status {
            TodoStatus::Done => self.completed_at.or(Some(now)),
            _ => None,
        };
        self.status = status;
    }
}

impl Entity for Todo {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Open,
    InProgress,
    Done,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn completion_timestamp_follows_status() {
        let mut todo = Todo {
            id: Default::default(),
            owner_id: Default::default(),
            title: "Bestille lokale".into(),
            description: String::new(),
            status: TodoStatus::Open,
            due_ts: None,
            completed_at: None,
            assignee_id: None,
            created: 0,
            updated: 0,
        };

        todo.set_status(TodoStatus::Done, 50);
        assert_eq!(todo.completed_at, Some(50));

        // Completing again keeps the first timestamp
        todo.set_status(TodoStatus::Done, 99);
        assert_eq!(todo.completed_at, Some(50));

        todo.set_status(TodoStatus::Open, 120);
        assert_eq!(todo.completed_at, None);
    }
}
