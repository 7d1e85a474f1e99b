//! Keel Interaction - small stateful primitives behind user input.
//!
//! - [`debounce`] - delay dispatch of search-as-you-type input
//! - [`confirm`] - type-the-name confirmation for destructive actions
//! - [`notify`] - transient notices (toasts) raised by operations
//! - [`transcript`] - meeting transcript parsing and search

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod confirm;
pub mod debounce;
pub mod notify;
pub mod transcript;

pub use confirm::{ConfirmError, DeleteConfirmation};
pub use debounce::Debouncer;
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use transcript::{parse_transcript, search_transcript, TranscriptMatch, Utterance};
