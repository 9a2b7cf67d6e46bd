//! Core orchestration components
//!
//! This module contains the request/response lifecycle for QA-T conversations.

mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::{Orchestrator, SendOutcome, Snapshot, REQUEST_TIMEOUT};
