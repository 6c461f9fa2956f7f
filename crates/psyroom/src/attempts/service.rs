use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::domain::{AttemptId, AttemptRecord, AttemptSubmission};
use super::repository::{AttemptRepository, RepositoryError};
use crate::catalog::{CatalogError, TestCatalog, TestSummary};
use crate::interpretation::{build_prompt, InterpretationPrompt};
use crate::scoring::{ResultDetails, ScoringEngine, ScoringError, TestDefinition, TestId};

/// Service composing the test catalog, scoring engine and attempt repository.
pub struct AttemptService<C, R> {
    catalog: Arc<C>,
    repository: Arc<R>,
}

static ATTEMPT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_attempt_id() -> AttemptId {
    let id = ATTEMPT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AttemptId(format!("att-{id:06}"))
}

impl<C, R> AttemptService<C, R>
where
    C: TestCatalog + 'static,
    R: AttemptRepository + 'static,
{
    pub fn new(catalog: Arc<C>, repository: Arc<R>) -> Self {
        Self {
            catalog,
            repository,
        }
    }

    pub fn tests(&self) -> Result<Vec<TestSummary>, AttemptServiceError> {
        Ok(self.catalog.summaries()?)
    }

    pub fn definition(
        &self,
        test_id: &TestId,
    ) -> Result<Arc<TestDefinition>, AttemptServiceError> {
        self.catalog
            .definition(test_id)?
            .ok_or_else(|| AttemptServiceError::UnknownTest(test_id.clone()))
    }

    /// Score a submission and persist the result.
    pub fn submit(
        &self,
        submission: AttemptSubmission,
    ) -> Result<AttemptRecord, AttemptServiceError> {
        let AttemptSubmission {
            test_id,
            respondent,
            answers,
        } = submission;

        let definition = self.definition(&test_id)?;
        let result = ScoringEngine::new(&definition).score(&answers)?;
        let attempt_id = next_attempt_id();

        if !result.ignored_entries().is_empty() {
            warn!(
                test = %test_id,
                attempt = %attempt_id.0,
                ignored = ?result.ignored_entries(),
                "answers referenced entries the test does not declare"
            );
        }
        if let ResultDetails::SplitPoint {
            skipped_questions, ..
        } = &result.details
        {
            if !skipped_questions.is_empty() {
                warn!(
                    test = %test_id,
                    attempt = %attempt_id.0,
                    skipped = ?skipped_questions,
                    "allocations exceeded the question budget"
                );
            }
        }

        let record = AttemptRecord {
            attempt_id,
            test_id,
            respondent,
            submitted_at: Utc::now(),
            result,
        };

        let stored = self.repository.insert(record)?;
        debug!(
            attempt = %stored.attempt_id.0,
            test = %stored.test_id,
            kind = %stored.result.kind(),
            total = stored.result.total,
            "attempt scored"
        );
        Ok(stored)
    }

    /// Fetch a stored attempt for API responses.
    pub fn get(&self, attempt_id: &AttemptId) -> Result<AttemptRecord, AttemptServiceError> {
        let record = self
            .repository
            .fetch(attempt_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<AttemptRecord>, AttemptServiceError> {
        Ok(self.repository.recent(limit)?)
    }

    /// Build the text-generation prompt for a stored attempt.
    pub fn interpretation_prompt(
        &self,
        attempt_id: &AttemptId,
    ) -> Result<InterpretationPrompt, AttemptServiceError> {
        let record = self.get(attempt_id)?;
        let definition = self.definition(&record.test_id)?;
        Ok(build_prompt(&definition, &record.result))
    }
}

/// Error raised by the attempt service.
#[derive(Debug, thiserror::Error)]
pub enum AttemptServiceError {
    #[error("unknown test '{0}'")]
    UnknownTest(TestId),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
