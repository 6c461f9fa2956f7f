//! Prompt text handed to the external text-generation service.

use serde::Serialize;

use crate::scoring::{
    ColorCategory, DominanceProfile, DominanceScenario, ResultDetails, ScoreResult,
    TestDefinition,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpretationPrompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_PROMPT: &str = "You are a facilitator explaining psychometric test results to a \
participant. Be concrete and supportive, avoid clinical language, and only describe the \
categories you are told are active.";

const CLOSING_INSTRUCTION: &str =
    "Write a short interpretation for the participant based only on the data above.";

pub fn build_prompt(definition: &TestDefinition, result: &ScoreResult) -> InterpretationPrompt {
    let mut lines = vec![format!("Test: {}", definition.title)];

    match &result.details {
        ResultDetails::ForcedPair { .. } => {
            lines.push(format!("Answers counted: {}", result.total));
            lines.extend(ranking_lines(result, false));
        }
        ResultDetails::SplitPoint { groups, .. } => {
            lines.extend(ranking_lines(result, true));
            if !groups.is_empty() {
                lines.push("Groups:".to_string());
                lines.extend(groups.iter().map(|group| {
                    format!("- {}: {} / {}", group.label, group.total, group.maximum)
                }));
            }
        }
        ResultDetails::ColorType {
            base, dominance, ..
        } => {
            lines.push(format!(
                "Totals: red {}, green {}, blue {}",
                base.red, base.green, base.blue
            ));
            lines.extend(dominance_lines(dominance));
        }
    }

    lines.push(CLOSING_INSTRUCTION.to_string());

    InterpretationPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user: lines.join("\n"),
    }
}

fn ranking_lines(result: &ScoreResult, with_counts: bool) -> Vec<String> {
    let mut lines = vec!["Ranking:".to_string()];
    for row in &result.ranked {
        let line = if with_counts {
            format!(
                "- {}: {} points, {}% ({})",
                row.label,
                row.count,
                row.percent,
                row.level.label()
            )
        } else {
            format!("- {}: {}% ({})", row.label, row.percent, row.level.label())
        };
        lines.push(line);
    }
    lines
}

fn dominance_lines(profile: &DominanceProfile) -> Vec<String> {
    let leading = join_labels(&profile.leading);
    let mut lines = vec![match profile.scenario {
        DominanceScenario::Single => format!("Dominant type: {leading}."),
        DominanceScenario::Pair if profile.close_pair => {
            format!("Two closely matched leading types: {leading}.")
        }
        DominanceScenario::Pair => format!("Two leading types, the first clearly ahead: {leading}."),
        DominanceScenario::Triple => format!("Three leading types within a narrow margin: {leading}."),
        DominanceScenario::Triad => {
            format!("Balanced profile, all three types lead jointly: {leading}.")
        }
        DominanceScenario::Flat => {
            format!("No type reaches the influence threshold; {leading} is the nominal leader only.")
        }
    }];

    if !profile.non_influential.is_empty() {
        lines.push(format!(
            "Non-influential: {}. Do not describe these as active contributors.",
            join_labels(&profile.non_influential)
        ));
    }
    lines
}

fn join_labels(categories: &[ColorCategory]) -> String {
    categories
        .iter()
        .map(|category| category.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StaticCatalog, TestCatalog};
    use crate::scoring::{
        color, AnswerSet, ColorTotals, DominanceRules, ScoringEngine, Tag, TestId,
    };

    fn definition(id: &str) -> std::sync::Arc<TestDefinition> {
        StaticCatalog::builtin()
            .expect("builtin catalog")
            .definition(&TestId::from(id))
            .expect("lookup")
            .expect("definition present")
    }

    #[test]
    fn forced_pair_prompt_lists_ranking_with_levels() {
        let definition = definition("work-style");
        let answers = AnswerSet::ForcedPair {
            chosen: vec![Tag::from("pioneer"), Tag::from("pioneer"), Tag::from("analyst")],
        };
        let result = ScoringEngine::new(&definition)
            .score(&answers)
            .expect("scores");

        let prompt = build_prompt(&definition, &result);

        assert!(prompt.user.contains("Work style preferences"));
        assert!(prompt.user.contains("- Pioneer: 67% (strong)"));
        assert!(prompt.user.contains("- Caretaker: 0% (weak)"));
    }

    #[test]
    fn split_point_prompt_is_one_fact_per_line() {
        let definition = definition("motivation-cards");
        let answers = AnswerSet::SplitPoint {
            left_points: vec![4, 3, 2, 4, 1, 3, 2, 2, 1, 3, 2, 1, 4, 3, 2],
        };
        let result = ScoringEngine::new(&definition)
            .score(&answers)
            .expect("scores");

        let prompt = build_prompt(&definition, &result);
        let lines: Vec<&str> = prompt.user.lines().collect();

        assert_eq!(lines.first(), Some(&"Test: Motivation cards"));
        assert_eq!(lines.get(1), Some(&"Ranking:"));
        assert_eq!(lines.last(), Some(&CLOSING_INSTRUCTION));
        assert!(!prompt.user.ends_with('\n'));
        assert!(lines.iter().all(|line| !line.is_empty()));

        let groups_at = lines
            .iter()
            .position(|line| *line == "Groups:")
            .expect("groups section");
        assert_eq!(groups_at, 2 + result.ranked.len());
        assert!(lines[groups_at + 1].starts_with("- Hygiene factors: "));
    }

    #[test]
    fn color_prompt_names_non_influential_categories() {
        let profile = color::classify(&ColorTotals::new(20, 8, 4), &DominanceRules::default());

        let lines = dominance_lines(&profile);

        assert_eq!(
            lines,
            vec![
                "Dominant type: Red.".to_string(),
                "Non-influential: Green, Blue. Do not describe these as active contributors."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn close_pair_is_described_differently_from_a_distant_pair() {
        let rules = DominanceRules::default();
        let close = dominance_lines(&color::classify(&ColorTotals::new(15, 14, 7), &rules));
        let distant = dominance_lines(&color::classify(&ColorTotals::new(21, 14, 1), &rules));

        assert!(close[0].contains("closely matched"));
        assert!(distant[0].contains("clearly ahead"));
    }
}
