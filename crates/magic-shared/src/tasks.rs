//! The five daily MAGIC tasks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five daily task categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Manifest,
    Art,
    Goal,
    Inspire,
    /// Shown as "Courage" in the app
    Connect,
}

impl Task {
    pub const ALL: [Task; 5] = [Task::Manifest, Task::Art, Task::Goal, Task::Inspire, Task::Connect];

    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Manifest => "manifest",
            Task::Art => "art",
            Task::Goal => "goal",
            Task::Inspire => "inspire",
            Task::Connect => "connect",
        }
    }

    /// Display label used by the app
    pub fn label(&self) -> &'static str {
        match self {
            Task::Manifest => "Manifest",
            Task::Art => "Art",
            Task::Goal => "Goal",
            Task::Inspire => "Inspire",
            Task::Connect => "Courage",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion of each task for a single day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSet {
    pub manifest: bool,
    pub art: bool,
    pub goal: bool,
    pub inspire: bool,
    pub connect: bool,
}

impl TaskSet {
    pub fn get(&self, task: Task) -> bool {
        match task {
            Task::Manifest => self.manifest,
            Task::Art => self.art,
            Task::Goal => self.goal,
            Task::Inspire => self.inspire,
            Task::Connect => self.connect,
        }
    }

    /// Any of the five tasks is done
    pub fn any(&self) -> bool {
        Task::ALL.iter().any(|t| self.get(*t))
    }

    /// Number of tasks done (0-5)
    pub fn count(&self) -> usize {
        Task::ALL.iter().filter(|t| self.get(**t)).count()
    }

    pub fn all(&self) -> bool {
        self.count() == Task::ALL.len()
    }

    pub fn completed(&self) -> Vec<Task> {
        Task::ALL.iter().copied().filter(|t| self.get(*t)).collect()
    }
}
