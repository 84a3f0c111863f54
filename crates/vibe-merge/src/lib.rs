//! Media merge pipeline.
//!
//! Takes an ordered set of local audio or video files of a single kind,
//! publishes each one to the remote media store, composes an ordered splice
//! of the published resources, and fetches the materialized result to a
//! local path. The store does the actual transformation; this crate only
//! orchestrates which resources get combined and in what order.

pub mod compose;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod validate;

pub use compose::build_composition;
pub use error::{MergeError, MergeResult};
pub use identity::assign_identifiers;
pub use pipeline::MergePipeline;
pub use validate::{validate_inputs, ValidatedInputs};
