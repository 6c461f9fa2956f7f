//! Attempt submission: look up the test, score the answers, hand the result to storage.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AttemptId, AttemptRecord, AttemptSubmission, AttemptSummaryView};
pub use repository::{AttemptRepository, RepositoryError};
pub use router::attempt_router;
pub use service::{AttemptService, AttemptServiceError};
