//! Command Centre task list: filters, ordering, and due-date groups.

use crate::priority::{DueStatus, Priority};
use chrono::{DateTime, Utc};
use keel_core::RecordId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A task in the Command Centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Row identifier
    pub id: RecordId,
    /// Title
    pub title: String,
    /// Priority
    #[serde(default)]
    pub priority: Priority,
    /// Deadline
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,
    /// Related CRM record name
    #[serde(default)]
    pub related_to: Option<String>,
}

impl TaskItem {
    /// Due status at `now`.
    #[must_use]
    pub fn due_status(&self, now: DateTime<Utc>) -> DueStatus {
        DueStatus::of(self.due_at, now)
    }
}

/// Task list tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    /// Every open task
    #[default]
    All,
    /// Open tasks due today
    Today,
    /// Open tasks past due
    Overdue,
    /// Open tasks due after today
    Upcoming,
    /// Done tasks
    Completed,
}

impl TaskFilter {
    /// Every tab, in display order.
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Today,
        Self::Overdue,
        Self::Upcoming,
        Self::Completed,
    ];

    /// Tab label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Today => "Today",
            Self::Overdue => "Overdue",
            Self::Upcoming => "Upcoming",
            Self::Completed => "Completed",
        }
    }

    /// Whether `task` belongs on this tab at `now`.
    #[must_use]
    pub fn matches(&self, task: &TaskItem, now: DateTime<Utc>) -> bool {
        if *self == Self::Completed {
            return task.completed;
        }
        if task.completed {
            return false;
        }
        match (self, task.due_status(now)) {
            (Self::All, _)
            | (Self::Today, DueStatus::DueToday)
            | (Self::Overdue, DueStatus::Overdue)
            | (Self::Upcoming, DueStatus::DueSoon(_) | DueStatus::Upcoming) => true,
            _ => false,
        }
    }
}

/// Tasks on a tab, in list order.
#[must_use]
pub fn filter_tasks(tasks: &[TaskItem], filter: TaskFilter, now: DateTime<Utc>) -> Vec<TaskItem> {
    let mut matching: Vec<TaskItem> = tasks
        .iter()
        .filter(|t| filter.matches(t, now))
        .cloned()
        .collect();
    sort_tasks(&mut matching);
    matching
}

/// Badge count for each tab.
#[must_use]
pub fn count_by_filter(tasks: &[TaskItem], now: DateTime<Utc>) -> Vec<(TaskFilter, usize)> {
    TaskFilter::ALL
        .iter()
        .map(|f| (*f, tasks.iter().filter(|t| f.matches(t, now)).count()))
        .collect()
}

fn compare_due(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Open before done, then by priority, then earliest due first with
/// undated tasks last, then by title.
pub fn sort_tasks(tasks: &mut [TaskItem]) {
    tasks.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then(a.priority.cmp(&b.priority))
            .then_with(|| compare_due(a.due_at, b.due_at))
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Section of the grouped task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueGroup {
    /// Past due
    Overdue,
    /// Due today
    Today,
    /// Due within a few days
    Soon,
    /// Due later
    Later,
    /// No due date
    NoDueDate,
}

impl DueGroup {
    fn of(status: DueStatus) -> Self {
        match status {
            DueStatus::Overdue => Self::Overdue,
            DueStatus::DueToday => Self::Today,
            DueStatus::DueSoon(_) => Self::Soon,
            DueStatus::Upcoming => Self::Later,
            DueStatus::None => Self::NoDueDate,
        }
    }

    /// Section heading.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::Today => "Today",
            Self::Soon => "Next few days",
            Self::Later => "Later",
            Self::NoDueDate => "No due date",
        }
    }
}

/// Open tasks grouped by due status. Empty groups are omitted; groups
/// appear most pressing first and tasks inside follow [`sort_tasks`].
#[must_use]
pub fn group_by_due_status(
    tasks: &[TaskItem],
    now: DateTime<Utc>,
) -> Vec<(DueGroup, Vec<TaskItem>)> {
    let mut open: Vec<TaskItem> = tasks.iter().filter(|t| !t.completed).cloned().collect();
    sort_tasks(&mut open);

    let mut groups: Vec<(DueGroup, Vec<TaskItem>)> = Vec::new();
    for task in open {
        let group = DueGroup::of(task.due_status(now));
        match groups.iter_mut().find(|(g, _)| *g == group) {
            Some((_, members)) => members.push(task),
            None => groups.push((group, vec![task])),
        }
    }
    groups.sort_by_key(|(group, _)| *group);
    groups
}
