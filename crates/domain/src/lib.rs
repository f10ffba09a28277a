//! Shared domain types for the Stride conversation core.
//!
//! Pure data and small pure functions only: the error type, dynamic
//! parameter values, tool-call shapes, conversation messages, stream events,
//! calendar-day normalization, and the workspace configuration. Nothing in
//! this crate performs I/O.

pub mod calendar;
pub mod config;
pub mod error;
pub mod message;
pub mod stream;
pub mod tool;
pub mod value;

pub use error::{Error, Result};
