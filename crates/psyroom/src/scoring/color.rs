//! Color-type instrument: six sub-answers distribute points across red, green and blue,
//! then [`classify`] decides which categories drive the interpretation.

use serde::{Deserialize, Serialize};

use super::definition::{
    ColorCategory, ColorOption, ColorPart, ColorPoints, ColorTypeSpec, DominanceRules, Tag,
};
use super::ranking::{percent_of, rank_rows, RankedRow};
use super::result::{ColorTotals, ResultDetails, ScoreResult};

/// Answers for both parts of the color instrument, referencing option ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorAnswers {
    pub part_a: ColorPartAnswers,
    pub part_b: ColorPartAnswers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPartAnswers {
    #[serde(default)]
    pub choice: Option<String>,
    #[serde(default)]
    pub ranking: Vec<String>,
    #[serde(default)]
    pub selection: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominanceScenario {
    Single,
    Pair,
    Triple,
    Triad,
    Flat,
}

impl DominanceScenario {
    pub const fn label(self) -> &'static str {
        match self {
            DominanceScenario::Single => "single",
            DominanceScenario::Pair => "pair",
            DominanceScenario::Triple => "triple",
            DominanceScenario::Triad => "triad",
            DominanceScenario::Flat => "flat",
        }
    }
}

/// Which categories lead the profile and which must stay out of the interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominanceProfile {
    pub scenario: DominanceScenario,
    pub leading: Vec<ColorCategory>,
    pub influencing: Vec<ColorCategory>,
    pub non_influential: Vec<ColorCategory>,
    /// Top two influencing categories are within `close_gap_max` of each other.
    pub close_pair: bool,
}

pub fn score(spec: &ColorTypeSpec, answers: &ColorAnswers) -> ScoreResult {
    let mut ignored = Vec::new();
    let part_a = score_part("a", &spec.part_a, &answers.part_a, &spec.points, &mut ignored);
    let part_b = score_part("b", &spec.part_b, &answers.part_b, &spec.points, &mut ignored);
    let base = part_a.combined(&part_b);
    let total = base.total();

    let rows = ColorCategory::ALL
        .iter()
        .map(|category| {
            let count = base.get(*category);
            let percent = percent_of(count, total);
            RankedRow {
                tag: Tag::from(category.tag()),
                label: category.label().to_string(),
                count,
                percent,
                level: spec.thresholds.level(percent),
            }
        })
        .collect();

    let ranked = rank_rows(rows, |row| row.count);
    let dominance = classify(&base, &spec.dominance);

    ScoreResult::assemble(
        total,
        ranked,
        ResultDetails::ColorType {
            base,
            part_a,
            part_b,
            dominance,
            ignored,
        },
    )
}

fn score_part(
    key: &str,
    part: &ColorPart,
    answers: &ColorPartAnswers,
    points: &ColorPoints,
    ignored: &mut Vec<String>,
) -> ColorTotals {
    let mut totals = ColorTotals::default();

    if let Some(choice) = &answers.choice {
        match find_option(&part.choice, choice) {
            Some(option) => totals.add(option.color, points.single_choice),
            None => ignored.push(format!("{key}.choice:{choice}")),
        }
    }

    let mut weights = points.ranking.iter().copied();
    let mut ranked: Vec<&str> = Vec::new();
    for id in &answers.ranking {
        let weighted = find_option(&part.ranking, id)
            .filter(|_| !ranked.contains(&id.as_str()))
            .and_then(|option| weights.next().map(|weight| (option, weight)));
        match weighted {
            Some((option, weight)) => {
                totals.add(option.color, weight);
                ranked.push(id);
            }
            None => ignored.push(format!("{key}.ranking:{id}")),
        }
    }

    let mut selected: Vec<&str> = Vec::new();
    for id in &answers.selection {
        let option = find_option(&part.selection, id).filter(|_| {
            !selected.contains(&id.as_str()) && selected.len() < points.selection_size
        });
        match option {
            Some(option) => {
                totals.add(option.color, points.selection);
                selected.push(id);
            }
            None => ignored.push(format!("{key}.selection:{id}")),
        }
    }

    totals
}

fn find_option<'a>(options: &'a [ColorOption], id: &str) -> Option<&'a ColorOption> {
    options.iter().find(|option| option.id == id)
}

/// Classify final category totals into a dominance scenario.
///
/// Total over any three counts: the triad override is checked first, then only categories
/// at or above `influence_min` count as influencing. With none influencing, the highest
/// count becomes the nominal leader of a `Flat` profile.
pub fn classify(totals: &ColorTotals, rules: &DominanceRules) -> DominanceProfile {
    let mut ordered: Vec<(ColorCategory, u32)> = ColorCategory::ALL
        .iter()
        .map(|category| (*category, totals.get(*category)))
        .collect();
    ordered.sort_by(|left, right| right.1.cmp(&left.1));

    let triad = rules.triad_min..=rules.triad_max;
    if ordered.iter().all(|(_, count)| triad.contains(count)) {
        let all: Vec<ColorCategory> = ordered.iter().map(|(category, _)| *category).collect();
        return DominanceProfile {
            scenario: DominanceScenario::Triad,
            leading: all.clone(),
            influencing: all,
            non_influential: Vec::new(),
            close_pair: false,
        };
    }

    let (influencing, below): (Vec<_>, Vec<_>) = ordered
        .iter()
        .copied()
        .partition(|(_, count)| *count >= rules.influence_min);
    let categories = |entries: &[(ColorCategory, u32)]| -> Vec<ColorCategory> {
        entries.iter().map(|(category, _)| *category).collect()
    };
    let non_influential = categories(&below);

    match influencing.as_slice() {
        [] => DominanceProfile {
            scenario: DominanceScenario::Flat,
            leading: vec![ordered[0].0],
            influencing: Vec::new(),
            non_influential: categories(&ordered[1..]),
            close_pair: false,
        },
        [(only, _)] => DominanceProfile {
            scenario: DominanceScenario::Single,
            leading: vec![*only],
            influencing: vec![*only],
            non_influential,
            close_pair: false,
        },
        [(first, first_count), (second, second_count), rest @ ..] => {
            let close_pair = first_count - second_count <= rules.close_gap_max;
            let third = rest.first().filter(|(_, third_count)| {
                close_pair && second_count - third_count <= rules.close_gap_max
            });

            let (scenario, leading) = match third {
                Some((third, _)) => (DominanceScenario::Triple, vec![*first, *second, *third]),
                None => (DominanceScenario::Pair, vec![*first, *second]),
            };

            DominanceProfile {
                scenario,
                leading,
                influencing: categories(&influencing),
                non_influential,
                close_pair,
            }
        }
    }
}
