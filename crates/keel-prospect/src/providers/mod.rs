//! Search service implementations.

pub mod common;
pub mod edge;

pub use edge::HttpSearchService;
