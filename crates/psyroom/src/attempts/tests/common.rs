use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::attempts::domain::{AttemptId, AttemptRecord, AttemptSubmission};
use crate::attempts::repository::{AttemptRepository, RepositoryError};
use crate::attempts::{attempt_router, AttemptService};
use crate::catalog::StaticCatalog;
use crate::scoring::{AnswerSet, ColorAnswers, ColorPartAnswers, Tag, TestId};

pub(super) fn catalog() -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::builtin().expect("builtin catalog is valid"))
}

pub(super) fn work_style_submission() -> AttemptSubmission {
    AttemptSubmission {
        test_id: TestId::from("work-style"),
        respondent: Some("participant-7".to_string()),
        answers: AnswerSet::ForcedPair {
            chosen: ["pioneer", "pioneer", "analyst", "connector", "pioneer"]
                .into_iter()
                .map(Tag::from)
                .collect(),
        },
    }
}

pub(super) fn stale_work_style_submission() -> AttemptSubmission {
    let mut submission = work_style_submission();
    if let AnswerSet::ForcedPair { chosen } = &mut submission.answers {
        chosen.push(Tag::from("retired-tag"));
    }
    submission
}

pub(super) fn motivation_submission(left_points: Vec<u32>) -> AttemptSubmission {
    AttemptSubmission {
        test_id: TestId::from("motivation-cards"),
        respondent: None,
        answers: AnswerSet::SplitPoint { left_points },
    }
}

pub(super) fn color_submission() -> AttemptSubmission {
    AttemptSubmission {
        test_id: TestId::from("color-type"),
        respondent: Some("participant-9".to_string()),
        answers: AnswerSet::ColorType(ColorAnswers {
            part_a: ColorPartAnswers {
                choice: Some("ac1".to_string()),
                ranking: vec!["ar1".to_string(), "ar2".to_string(), "ar3".to_string()],
                selection: vec!["as1".to_string(), "as2".to_string(), "as4".to_string()],
            },
            part_b: ColorPartAnswers {
                choice: Some("bc1".to_string()),
                ranking: vec!["br1".to_string(), "br3".to_string(), "br2".to_string()],
                selection: vec!["bs1".to_string(), "bs2".to_string(), "bs7".to_string()],
            },
        }),
    }
}

pub(super) fn build_service() -> (
    AttemptService<StaticCatalog, MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AttemptService::new(catalog(), repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AttemptId, AttemptRecord>>>,
}

impl AttemptRepository for MemoryRepository {
    fn insert(&self, record: AttemptRecord) -> Result<AttemptRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.attempt_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.attempt_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AttemptId) -> Result<Option<AttemptRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<AttemptRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<AttemptRecord> = guard.values().cloned().collect();
        records.sort_by(|left, right| right.submitted_at.cmp(&left.submitted_at));
        records.truncate(limit);
        Ok(records)
    }
}

pub(super) struct ConflictRepository;

impl AttemptRepository for ConflictRepository {
    fn insert(&self, _record: AttemptRecord) -> Result<AttemptRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &AttemptId) -> Result<Option<AttemptRecord>, RepositoryError> {
        Ok(None)
    }

    fn recent(&self, _limit: usize) -> Result<Vec<AttemptRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl AttemptRepository for UnavailableRepository {
    fn insert(&self, _record: AttemptRecord) -> Result<AttemptRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AttemptId) -> Result<Option<AttemptRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<AttemptRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: AttemptService<StaticCatalog, MemoryRepository>,
) -> axum::Router {
    attempt_router(Arc::new(service))
}
