//! Client for the remote audio cleanup service.
//!
//! The service works as an upload/process/poll/download cycle: request a
//! signed upload slot, PUT the file, submit an edit naming the cleanup
//! operation, poll the edit until it completes, then download the result.
//! This crate drives that cycle and nothing else; which operation to run is
//! the caller's choice via [`vibe_models::CleanupOp`].

pub mod client;
pub mod error;

pub use client::{CleanupClient, CleanupConfig};
pub use error::{CleanupError, CleanupResult};
