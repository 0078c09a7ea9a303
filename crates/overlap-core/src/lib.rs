//! overlap-core
//!
//! Shared vocabulary of the overlap workspace: documents and corpora, the
//! result records produced by the matchers and the aggregator, the error
//! taxonomy, the scorer capability traits, and configuration loading.

pub mod config;
pub mod corpus;
pub mod error;
pub mod input;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
