//! # To-do Models
//!
//! A small personal to-do list that lives next to the city-rights records.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::check_len;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub subject: String,
    pub description: String,
    /// Refreshed on every save
    pub start_time: DateTime<Utc>,
    /// Refreshed on every save
    pub end_time: DateTime<Utc>,
    pub done: bool,
    /// Send a reminder at the start time
    pub reminder: bool,
}

impl Todo {
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            subject: subject.into(),
            description: description.into(),
            start_time: now,
            end_time: now,
            done: false,
            reminder: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("todo", "subject", &self.subject, 100)
    }

    /// Marks the record as saved now.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.start_time = now;
        self.end_time = now;
    }
}

/// The todo picked at some moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub id: Uuid,
    pub selected: Option<DateTime<Utc>>,
    pub todo: Option<String>,
}

impl Selection {
    pub fn new(todo: Option<String>) -> Self {
        Self { id: Uuid::now_v7(), selected: Some(Utc::now()), todo }
    }

    pub fn validate(&self) -> Result<()> {
        match &self.todo {
            Some(todo) => check_len("selection", "todo", todo, 100),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub id: Uuid,
    pub todo: Option<String>,
    pub rank: i32,
}

impl History {
    pub fn new(todo: Option<String>, rank: i32) -> Self {
        Self { id: Uuid::now_v7(), todo, rank }
    }

    pub fn validate(&self) -> Result<()> {
        match &self.todo {
            Some(todo) => check_len("history", "todo", todo, 100),
            None => Ok(()),
        }
    }
}

/// A named slot of the day that todos are planned into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeblock {
    pub id: Uuid,
    pub name: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub todo_ids: Vec<Uuid>,
}

impl Timeblock {
    /// A block covering the whole day.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            start: NaiveTime::MIN,
            end: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
            todo_ids: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("timeblock", "name", &self.name, 50)
    }
}

/// A timeblock with its planned todos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeblockPlan {
    pub timeblock: Timeblock,
    pub todos: Vec<Todo>,
}
