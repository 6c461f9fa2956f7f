//! End-to-end attempt flows through the public service facade and HTTP router.

mod common {
    use std::sync::{Arc, Mutex};

    use psyroom::attempts::{
        AttemptId, AttemptRecord, AttemptRepository, AttemptService, RepositoryError,
    };
    use psyroom::catalog::StaticCatalog;

    #[derive(Default)]
    pub(super) struct VecRepository {
        pub(super) records: Mutex<Vec<AttemptRecord>>,
    }

    impl AttemptRepository for VecRepository {
        fn insert(&self, record: AttemptRecord) -> Result<AttemptRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            if guard
                .iter()
                .any(|existing| existing.attempt_id == record.attempt_id)
            {
                return Err(RepositoryError::Conflict);
            }
            guard.push(record.clone());
            Ok(record)
        }

        fn fetch(&self, id: &AttemptId) -> Result<Option<AttemptRecord>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.iter().find(|record| &record.attempt_id == id).cloned())
        }

        fn recent(&self, limit: usize) -> Result<Vec<AttemptRecord>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.iter().rev().take(limit).cloned().collect())
        }
    }

    pub(super) fn service() -> (
        Arc<AttemptService<StaticCatalog, VecRepository>>,
        Arc<VecRepository>,
    ) {
        let catalog = Arc::new(StaticCatalog::builtin().expect("builtin catalog"));
        let repository = Arc::new(VecRepository::default());
        let service = Arc::new(AttemptService::new(catalog, repository.clone()));
        (service, repository)
    }
}

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::service;
use psyroom::attempts::{attempt_router, AttemptSubmission};
use psyroom::import::AnswerSheetImporter;
use psyroom::interpretation::build_prompt;
use psyroom::scoring::{ColorCategory, DominanceScenario, ResultDetails, TestId};
use tower::ServiceExt;

#[test]
fn imported_color_sheet_scores_every_respondent() {
    let (service, repository) = service();
    let definition = service
        .definition(&TestId::from("color-type"))
        .expect("color test present");
    let data = include_bytes!("data/color_type_answers.csv");

    let sheets =
        AnswerSheetImporter::from_reader(&data[..], &definition).expect("answer sheet imports");
    assert_eq!(sheets.len(), 3);

    let records: Vec<_> = sheets
        .into_iter()
        .map(|sheet| {
            service
                .submit(AttemptSubmission {
                    test_id: definition.id.clone(),
                    respondent: Some(sheet.respondent),
                    answers: sheet.answers,
                })
                .expect("sheet scores")
        })
        .collect();

    let scenarios: Vec<_> = records
        .iter()
        .map(|record| match &record.result.details {
            ResultDetails::ColorType { dominance, .. } => dominance.clone(),
            other => panic!("unexpected details: {other:?}"),
        })
        .collect();

    assert_eq!(records[0].result.total, 36);
    assert_eq!(scenarios[0].scenario, DominanceScenario::Single);
    assert_eq!(scenarios[0].leading, vec![ColorCategory::Red]);

    assert_eq!(records[1].result.total, 36);
    assert_eq!(scenarios[1].scenario, DominanceScenario::Pair);
    assert!(scenarios[1].close_pair);
    assert_eq!(
        scenarios[1].leading,
        vec![ColorCategory::Green, ColorCategory::Blue]
    );
    assert_eq!(scenarios[1].non_influential, vec![ColorCategory::Red]);

    assert_eq!(records[2].result.total, 8);
    assert_eq!(scenarios[2].scenario, DominanceScenario::Flat);
    assert_eq!(
        records[2].result.ignored_entries().to_vec(),
        vec!["a.selection:as9".to_string()]
    );

    assert_eq!(
        repository
            .records
            .lock()
            .expect("repository mutex poisoned")
            .len(),
        3
    );

    let prompt = build_prompt(&definition, &records[1].result);
    assert!(prompt.user.contains("Two closely matched leading types: Green, Blue."));
    assert!(prompt.user.contains("Non-influential: Red."));
}

#[test]
fn recent_attempts_come_back_newest_first() {
    let (service, _) = service();
    let data = "respondent,q1,q2,q3\nAda,pioneer,analyst,pioneer\nGrace,caretaker,,\n";
    let definition = service
        .definition(&TestId::from("work-style"))
        .expect("work-style present");

    for sheet in AnswerSheetImporter::from_reader(data.as_bytes(), &definition).expect("imports")
    {
        service
            .submit(AttemptSubmission {
                test_id: definition.id.clone(),
                respondent: Some(sheet.respondent),
                answers: sheet.answers,
            })
            .expect("scores");
    }

    let recent = service.recent(10).expect("recent attempts");
    let respondents: Vec<_> = recent
        .iter()
        .map(|record| record.respondent.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(respondents, vec!["Grace", "Ada"]);
    assert_eq!(recent[0].summary_view().leading.as_deref(), Some("Caretaker"));
    assert_eq!(recent[0].result.total, 1);
}

#[tokio::test]
async fn catalog_listing_is_served_over_http() {
    let (service, _) = service();
    let response = attempt_router(service)
        .oneshot(
            Request::builder()
                .uri("/api/v1/tests")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
    let kinds: Vec<_> = payload
        .as_array()
        .expect("array of summaries")
        .iter()
        .map(|summary| summary["kind"].as_str().expect("kind").to_string())
        .collect();
    assert_eq!(kinds, vec!["forced_pair", "split_point", "color_type"]);
}
