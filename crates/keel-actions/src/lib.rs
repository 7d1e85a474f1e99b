//! Keel Actions - AI-suggested actions, Command Centre tasks, and copilot
//! replies.
//!
//! Raw action rows from the backend are parsed into typed
//! [`ActionDetails`] variants before anything renders them. A row with an
//! unknown `action_type` or a missing required field is an
//! [`ActionParseError`], so cards never show blank recipients or subjects.
//!
//! ```rust,ignore
//! use keel_actions::{display_actions, RawAction};
//!
//! let rows: Vec<RawAction> = backend.rpc("list_pending_actions", &params).await?;
//! let (cards, rejected) = display_actions(&rows, chrono::Utc::now());
//! ```
//!
//! The sidebar badge reads from a [`PendingCountPoller`], which refetches
//! on an interval and publishes through a `tokio::sync::watch` channel.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod action;
pub mod copilot;
pub mod display;
pub mod error;
pub mod pending;
pub mod priority;
pub mod tasks;

pub use action::{parse_action, Action, ActionDetails, ActionKind, ActionStatus, EntityRef, RawAction};
pub use copilot::{ConfirmationStatus, ContactSummary, CopilotResponse, StageSummary, TaskSummary};
pub use display::{display, display_actions, extract_details, to_display_action, DetailLine, DisplayAction};
pub use error::{ActionError, ActionParseError, Result};
pub use pending::{
    PendingCountCache, PendingCountPoller, PendingCountService, PendingCountSource,
    RpcPendingCountSource,
};
pub use priority::{parse_timestamp, relative_age, DueStatus, Priority, DUE_SOON_DAYS};
pub use tasks::{
    count_by_filter, filter_tasks, group_by_due_status, sort_tasks, DueGroup, TaskFilter, TaskItem,
};
