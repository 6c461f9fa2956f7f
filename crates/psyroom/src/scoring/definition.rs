use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::levels::{LevelScheme, PercentThresholds};

/// Identifier wrapper for catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(pub String);

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Short identifier for a scoring category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub String);

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A declared category together with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSpec {
    pub tag: Tag,
    pub label: String,
}

/// Immutable description of a test, loaded once per request before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub id: TestId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub instrument: Instrument,
}

impl TestDefinition {
    pub fn kind(&self) -> InstrumentKind {
        self.instrument.kind()
    }

    /// Internal consistency checks run by the catalog when definitions are loaded.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        match &self.instrument {
            Instrument::ForcedPair(spec) => spec.validate(),
            Instrument::SplitPoint(spec) => spec.validate(),
            Instrument::ColorType(spec) => spec.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instrument {
    ForcedPair(ForcedPairSpec),
    SplitPoint(SplitPointSpec),
    ColorType(ColorTypeSpec),
}

impl Instrument {
    pub fn kind(&self) -> InstrumentKind {
        match self {
            Instrument::ForcedPair(_) => InstrumentKind::ForcedPair,
            Instrument::SplitPoint(_) => InstrumentKind::SplitPoint,
            Instrument::ColorType(_) => InstrumentKind::ColorType,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    ForcedPair,
    SplitPoint,
    ColorType,
}

impl InstrumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            InstrumentKind::ForcedPair => "forced_pair",
            InstrumentKind::SplitPoint => "split_point",
            InstrumentKind::ColorType => "color_type",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One question per pair of statements; the respondent picks one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcedPairSpec {
    pub tags: Vec<TagSpec>,
    pub thresholds: PercentThresholds,
    #[serde(default)]
    pub questions: Vec<PairQuestion>,
}

impl ForcedPairSpec {
    fn validate(&self) -> Result<(), DefinitionError> {
        ensure_unique_tags(&self.tags)?;
        self.thresholds.validate()?;

        for (index, question) in self.questions.iter().enumerate() {
            for statement in [&question.a, &question.b] {
                if !self.tags.iter().any(|spec| spec.tag == statement.tag) {
                    return Err(DefinitionError::UndeclaredTag {
                        question: index + 1,
                        tag: statement.tag.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairQuestion {
    pub a: Statement,
    pub b: Statement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub tag: Tag,
    pub text: String,
}

/// Questions that split a point budget between two factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPointSpec {
    pub factors: Vec<TagSpec>,
    pub questions: Vec<SplitQuestion>,
    #[serde(default = "default_max_points")]
    pub default_max_points: u32,
    pub levels: LevelScheme,
    #[serde(default)]
    pub groups: Vec<FactorGroup>,
}

fn default_max_points() -> u32 {
    5
}

impl SplitPointSpec {
    fn validate(&self) -> Result<(), DefinitionError> {
        ensure_unique_tags(&self.factors)?;
        self.levels.validate()?;

        for (index, question) in self.questions.iter().enumerate() {
            if question.max_points(self.default_max_points) == 0 {
                return Err(DefinitionError::ZeroMaxPoints {
                    question: index + 1,
                });
            }
            for side in [&question.left, &question.right] {
                if !self.factors.iter().any(|spec| spec.tag == side.factor) {
                    return Err(DefinitionError::UndeclaredTag {
                        question: index + 1,
                        tag: side.factor.clone(),
                    });
                }
            }
        }

        self.check_budgets()?;

        for group in &self.groups {
            if let Some(member) = group
                .members
                .iter()
                .find(|member| !self.factors.iter().any(|spec| &spec.tag == *member))
            {
                return Err(DefinitionError::UndeclaredGroupMember {
                    group: group.key.clone(),
                    tag: member.clone(),
                });
            }
        }

        Ok(())
    }

    /// Factor maxima and the whole-test budget must fit in `u32`.
    fn check_budgets(&self) -> Result<(), DefinitionError> {
        let overflow = |subject: String| DefinitionError::BudgetOverflow { subject };
        let mut maxima = vec![0u32; self.factors.len()];
        let mut total = 0u32;

        for question in &self.questions {
            let max_points = question.max_points(self.default_max_points);
            total = total
                .checked_add(max_points)
                .ok_or_else(|| overflow("the whole test".to_string()))?;
            for side in [&question.left, &question.right] {
                let Some(index) = self.factors.iter().position(|spec| spec.tag == side.factor)
                else {
                    continue;
                };
                maxima[index] = maxima[index]
                    .checked_add(max_points)
                    .ok_or_else(|| overflow(format!("factor '{}'", side.factor)))?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitQuestion {
    pub left: FactorStatement,
    pub right: FactorStatement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<u32>,
}

impl SplitQuestion {
    pub fn max_points(&self, default: u32) -> u32 {
        self.max_points.unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorStatement {
    pub factor: Tag,
    #[serde(default)]
    pub text: String,
}

/// Named reduction over member factors, reported alongside the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorGroup {
    pub key: String,
    pub label: String,
    pub members: Vec<Tag>,
}

/// The three categories of the color-type instrument, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCategory {
    Red,
    Green,
    Blue,
}

impl ColorCategory {
    pub const ALL: [ColorCategory; 3] = [
        ColorCategory::Red,
        ColorCategory::Green,
        ColorCategory::Blue,
    ];

    pub const fn tag(self) -> &'static str {
        match self {
            ColorCategory::Red => "red",
            ColorCategory::Green => "green",
            ColorCategory::Blue => "blue",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ColorCategory::Red => "Red",
            ColorCategory::Green => "Green",
            ColorCategory::Blue => "Blue",
        }
    }
}

impl fmt::Display for ColorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Two-part color instrument. Each part holds a single choice, a ranking and a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTypeSpec {
    pub part_a: ColorPart,
    pub part_b: ColorPart,
    #[serde(default)]
    pub points: ColorPoints,
    pub thresholds: PercentThresholds,
    #[serde(default)]
    pub dominance: DominanceRules,
}

impl ColorTypeSpec {
    /// Points distributed by a complete answer across both parts.
    pub fn full_total(&self) -> u32 {
        self.points.per_part().saturating_mul(2)
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        self.thresholds.validate()?;
        self.points
            .checked_per_part()
            .and_then(|per_part| per_part.checked_mul(2))
            .ok_or_else(|| DefinitionError::BudgetOverflow {
                subject: "color points".to_string(),
            })?;
        self.dominance.validate()?;
        self.part_a.validate("a")?;
        self.part_b.validate("b")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPart {
    #[serde(default)]
    pub prompt: String,
    pub choice: Vec<ColorOption>,
    pub ranking: Vec<ColorOption>,
    pub selection: Vec<ColorOption>,
}

impl ColorPart {
    fn validate(&self, part: &str) -> Result<(), DefinitionError> {
        for (section, options) in [
            ("choice", &self.choice),
            ("ranking", &self.ranking),
            ("selection", &self.selection),
        ] {
            if options.is_empty() {
                return Err(DefinitionError::EmptyColorSection {
                    part: part.to_string(),
                    section,
                });
            }
            let mut seen = BTreeSet::new();
            for option in options {
                if !seen.insert(option.id.as_str()) {
                    return Err(DefinitionError::DuplicateOption {
                        part: part.to_string(),
                        id: option.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub id: String,
    pub color: ColorCategory,
    #[serde(default)]
    pub text: String,
}

/// Weights awarded per sub-answer of a color part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPoints {
    pub single_choice: u32,
    pub ranking: Vec<u32>,
    pub selection: u32,
    pub selection_size: usize,
}

impl ColorPoints {
    pub fn per_part(&self) -> u32 {
        self.checked_per_part().unwrap_or(u32::MAX)
    }

    /// `None` when a complete part would not fit in `u32`.
    pub fn checked_per_part(&self) -> Option<u32> {
        let selection_size = u32::try_from(self.selection_size).ok()?;
        let ranking = self
            .ranking
            .iter()
            .try_fold(0u32, |sum, weight| sum.checked_add(*weight))?;
        self.selection
            .checked_mul(selection_size)?
            .checked_add(ranking)?
            .checked_add(self.single_choice)
    }
}

impl Default for ColorPoints {
    fn default() -> Self {
        Self {
            single_choice: 6,
            ranking: vec![3, 2, 1],
            selection: 2,
            selection_size: 3,
        }
    }
}

/// Cutpoints used by the dominance classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominanceRules {
    pub influence_min: u32,
    pub close_gap_max: u32,
    pub triad_min: u32,
    pub triad_max: u32,
}

impl DominanceRules {
    fn validate(&self) -> Result<(), DefinitionError> {
        if self.triad_min <= self.triad_max {
            Ok(())
        } else {
            Err(DefinitionError::InvalidTriadRange {
                triad_min: self.triad_min,
                triad_max: self.triad_max,
            })
        }
    }
}

impl Default for DominanceRules {
    fn default() -> Self {
        Self {
            influence_min: 13,
            close_gap_max: 3,
            triad_min: 10,
            triad_max: 13,
        }
    }
}

fn ensure_unique_tags(tags: &[TagSpec]) -> Result<(), DefinitionError> {
    if tags.is_empty() {
        return Err(DefinitionError::NoCategories);
    }
    let mut seen = BTreeSet::new();
    for spec in tags {
        if !seen.insert(&spec.tag) {
            return Err(DefinitionError::DuplicateTag(spec.tag.clone()));
        }
    }
    Ok(())
}

/// Reasons a test definition is rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("thresholds must satisfy 0 <= weak ({weak_at_or_below}) < strong ({strong_at_or_above}) <= 100")]
    InvalidPercentThresholds {
        strong_at_or_above: u8,
        weak_at_or_below: u8,
    },
    #[error("scale cutpoints must satisfy low ({low_max}) < mid ({mid_max}) < max ({scale_max})")]
    InvalidScaleThresholds {
        scale_max: u32,
        low_max: u32,
        mid_max: u32,
    },
    #[error("triad range {triad_min}..={triad_max} is empty")]
    InvalidTriadRange { triad_min: u32, triad_max: u32 },
    #[error("at least one category must be declared")]
    NoCategories,
    #[error("category '{0}' is declared more than once")]
    DuplicateTag(Tag),
    #[error("question {question} references undeclared category '{tag}'")]
    UndeclaredTag { question: usize, tag: Tag },
    #[error("group '{group}' references undeclared factor '{tag}'")]
    UndeclaredGroupMember { group: String, tag: Tag },
    #[error("question {question} has a zero point budget")]
    ZeroMaxPoints { question: usize },
    #[error("color part {part} has no {section} options")]
    EmptyColorSection { part: String, section: &'static str },
    #[error("color part {part} declares option '{id}' twice")]
    DuplicateOption { part: String, id: String },
    #[error("point budget for {subject} does not fit in 32 bits")]
    BudgetOverflow { subject: String },
}
