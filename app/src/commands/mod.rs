//! Command handlers exposed to the shells.
//!
//! Every handler takes the shared [`AppState`](crate::state::AppState) and
//! returns `Result<_, CommandError>` so failures serialize the same way.

pub mod actions;
pub mod organization;
pub mod prospect;
