use crate::infra::{load_catalog, InMemoryAttemptRepository};
use clap::Args;
use psyroom::attempts::{AttemptRecord, AttemptService, AttemptSubmission};
use psyroom::catalog::{StaticCatalog, TestCatalog};
use psyroom::config::AppConfig;
use psyroom::error::AppError;
use psyroom::import::AnswerSheetImporter;
use psyroom::scoring::{
    AnswerSet, ColorAnswers, ColorCategory, ColorPartAnswers, ResultDetails, Tag, TestDefinition,
    TestId,
};
use std::path::PathBuf;
use std::sync::Arc;

type CliAttemptService = AttemptService<StaticCatalog, InMemoryAttemptRepository>;

#[derive(Args, Debug, Default)]
pub(crate) struct TestsListArgs {
    /// Load test definitions from a JSON file instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Test identifier, as printed by `tests list`
    #[arg(long)]
    pub(crate) test: String,
    /// CSV answer sheet, one respondent per row
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Load test definitions from a JSON file instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the stored attempts as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the interpretation prompts in the demo output.
    #[arg(long)]
    pub(crate) skip_prompts: bool,
}

pub(crate) fn list_tests(args: TestsListArgs) -> Result<(), AppError> {
    let catalog = open_catalog(args.catalog)?;
    let summaries = catalog.summaries()?;

    println!("{} test(s) available", summaries.len());
    for summary in summaries {
        println!("- {} [{}] {}", summary.id, summary.kind, summary.title);
        if !summary.description.is_empty() {
            println!("  {}", summary.description);
        }
    }
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        test,
        answers,
        catalog,
        json,
    } = args;

    let service = attempt_service(open_catalog(catalog)?);
    let definition = service.definition(&TestId(test))?;
    let sheets = AnswerSheetImporter::from_path(&answers, &definition)?;

    let mut records = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let record = service.submit(AttemptSubmission {
            test_id: definition.id.clone(),
            respondent: Some(sheet.respondent),
            answers: sheet.answers,
        })?;
        records.push(record);
    }

    if json {
        let payload = serde_json::to_string_pretty(&records).map_err(std::io::Error::from)?;
        println!("{payload}");
        return Ok(());
    }

    println!(
        "Scored {} answer sheet(s) for {} from {}",
        records.len(),
        definition.title,
        answers.display()
    );
    for record in &records {
        render_attempt(&definition, record);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { skip_prompts } = args;

    println!("Psyroom scoring demo");
    let service = attempt_service(StaticCatalog::builtin()?);

    for submission in demo_submissions() {
        let definition = service.definition(&submission.test_id)?;
        let record = match service.submit(submission) {
            Ok(record) => record,
            Err(err) => {
                println!("  Submission rejected: {}", err);
                continue;
            }
        };
        render_attempt(&definition, &record);

        if skip_prompts {
            continue;
        }
        match service.interpretation_prompt(&record.attempt_id) {
            Ok(prompt) => println!("  Interpretation prompt:\n{}", indent(&prompt.user, 4)),
            Err(err) => println!("  Interpretation prompt unavailable: {}", err),
        }
    }

    println!("\nRecent attempts");
    for record in service.recent(5)? {
        let view = record.summary_view();
        println!(
            "- {} {} [{}] total {} | leading {}",
            view.attempt_id.0,
            view.test_id,
            view.kind,
            view.total,
            view.leading.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn open_catalog(path: Option<PathBuf>) -> Result<StaticCatalog, AppError> {
    let path = match path {
        Some(path) => Some(path),
        None => AppConfig::load()?.catalog.path,
    };
    Ok(load_catalog(path.as_deref())?)
}

fn attempt_service(catalog: StaticCatalog) -> CliAttemptService {
    AttemptService::new(
        Arc::new(catalog),
        Arc::new(InMemoryAttemptRepository::default()),
    )
}

pub(crate) fn render_attempt(definition: &TestDefinition, record: &AttemptRecord) {
    let result = &record.result;
    println!(
        "\n{} | {} | {}",
        record.attempt_id.0,
        record.respondent.as_deref().unwrap_or("anonymous"),
        definition.title
    );
    println!("Total: {}", result.total);
    for (position, row) in result.ranked.iter().enumerate() {
        println!(
            "  {}. {:<22} {:>3} {:>4}% {}",
            position + 1,
            row.label,
            row.count,
            row.percent,
            row.level.label()
        );
    }

    match &result.details {
        ResultDetails::ForcedPair { .. } => {}
        ResultDetails::SplitPoint {
            groups,
            skipped_questions,
            ..
        } => {
            for group in groups {
                println!("  {}: {} / {}", group.label, group.total, group.maximum);
            }
            if !skipped_questions.is_empty() {
                println!("  Skipped questions (over budget): {:?}", skipped_questions);
            }
        }
        ResultDetails::ColorType { dominance, .. } => {
            println!(
                "  Dominance: {}{} | leading {}",
                dominance.scenario.label(),
                if dominance.close_pair { " (close)" } else { "" },
                join_colors(&dominance.leading)
            );
            if !dominance.non_influential.is_empty() {
                println!(
                    "  Non-influential: {}",
                    join_colors(&dominance.non_influential)
                );
            }
        }
    }

    let ignored = result.ignored_entries();
    if !ignored.is_empty() {
        println!("  Ignored entries: {}", ignored.join(", "));
    }
}

fn join_colors(categories: &[ColorCategory]) -> String {
    categories
        .iter()
        .map(|category| category.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn indent(text: &str, width: usize) -> String {
    let padding = " ".repeat(width);
    text.lines()
        .map(|line| format!("{padding}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn demo_submissions() -> Vec<AttemptSubmission> {
    let ids = |prefix: &str, values: &[&str]| -> Vec<String> {
        values.iter().map(|value| format!("{prefix}{value}")).collect()
    };

    vec![
        AttemptSubmission {
            test_id: TestId::from("work-style"),
            respondent: Some("demo-participant".to_string()),
            answers: AnswerSet::ForcedPair {
                chosen: [
                    "pioneer", "analyst", "pioneer", "connector", "organizer", "pioneer",
                    "analyst", "pioneer", "caretaker", "analyst",
                ]
                .into_iter()
                .map(Tag::from)
                .collect(),
            },
        },
        AttemptSubmission {
            test_id: TestId::from("motivation-cards"),
            respondent: Some("demo-participant".to_string()),
            answers: AnswerSet::SplitPoint {
                left_points: vec![4, 3, 2, 4, 1, 3, 2, 2, 1, 3, 2, 1, 4, 3, 2],
            },
        },
        AttemptSubmission {
            test_id: TestId::from("color-type"),
            respondent: Some("demo-participant".to_string()),
            answers: AnswerSet::ColorType(ColorAnswers {
                part_a: ColorPartAnswers {
                    choice: Some("ac3".to_string()),
                    ranking: ids("ar", &["3", "1", "2"]),
                    selection: ids("as", &["7", "2", "8"]),
                },
                part_b: ColorPartAnswers {
                    choice: Some("bc1".to_string()),
                    ranking: ids("br", &["3", "1", "2"]),
                    selection: ids("bs", &["7", "1", "4"]),
                },
            }),
        },
    ]
}
