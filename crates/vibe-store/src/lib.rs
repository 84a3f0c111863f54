//! Remote media store client.
//!
//! This crate provides:
//! - Signed multipart publishing of local files as addressable resources
//! - Pure splice-locator URL construction for ordered concatenation
//! - Streamed, atomic download of materialized results

pub mod client;
pub mod error;
pub mod locator;

pub use client::{PublishedResource, StoreClient, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use locator::splice_url;
