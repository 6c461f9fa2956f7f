use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{AnswerSet, InstrumentKind, ScoreResult, TestId};

/// Identifier wrapper for scored attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub String);

/// Payload a respondent (or a facilitator on their behalf) submits for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptSubmission {
    pub test_id: TestId,
    #[serde(default)]
    pub respondent: Option<String>,
    pub answers: AnswerSet,
}

/// Stored attempt; the result is kept exactly as the engine produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt_id: AttemptId,
    pub test_id: TestId,
    pub respondent: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub result: ScoreResult,
}

impl AttemptRecord {
    pub fn summary_view(&self) -> AttemptSummaryView {
        AttemptSummaryView {
            attempt_id: self.attempt_id.clone(),
            test_id: self.test_id.clone(),
            kind: self.result.kind(),
            submitted_at: self.submitted_at,
            total: self.result.total,
            leading: self
                .result
                .top()
                .map(|row| row.label.clone()),
            ignored_entries: self.result.ignored_entries().len(),
        }
    }
}

/// Compact representation returned right after submission.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptSummaryView {
    pub attempt_id: AttemptId,
    pub test_id: TestId,
    pub kind: InstrumentKind,
    pub submitted_at: DateTime<Utc>,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading: Option<String>,
    pub ignored_entries: usize,
}
