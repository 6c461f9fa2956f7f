//! Scoring engine for the forced-pair, split-point and color-type instruments.
//!
//! Every scorer is a pure function of a [`TestDefinition`] and an [`AnswerSet`]; nothing is
//! cached between calls, so scoring can run concurrently without coordination.

pub mod color;
pub mod definition;
pub mod forced_pair;
pub mod levels;
pub mod ranking;
pub mod result;
pub mod split_points;

#[cfg(test)]
mod tests;

pub use color::{ColorAnswers, ColorPartAnswers, DominanceProfile, DominanceScenario};
pub use definition::{
    ColorCategory, ColorOption, ColorPart, ColorPoints, ColorTypeSpec, DefinitionError,
    DominanceRules, FactorGroup, FactorStatement, ForcedPairSpec, Instrument, InstrumentKind,
    PairQuestion, SplitPointSpec, SplitQuestion, Statement, Tag, TagSpec, TestDefinition, TestId,
};
pub use levels::{Level, LevelScheme, PercentThresholds, ScaleThresholds};
pub use ranking::RankedRow;
pub use result::{ColorTotals, GroupScore, ResultDetails, ScoreResult};

use serde::{Deserialize, Serialize};

/// Raw answers as deserialized from a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerSet {
    ForcedPair { chosen: Vec<Tag> },
    SplitPoint { left_points: Vec<u32> },
    ColorType(ColorAnswers),
}

impl AnswerSet {
    pub fn kind(&self) -> InstrumentKind {
        match self {
            AnswerSet::ForcedPair { .. } => InstrumentKind::ForcedPair,
            AnswerSet::SplitPoint { .. } => InstrumentKind::SplitPoint,
            AnswerSet::ColorType(_) => InstrumentKind::ColorType,
        }
    }
}

/// Dispatches answers to the scorer matching the definition's instrument.
pub struct ScoringEngine<'a> {
    definition: &'a TestDefinition,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(definition: &'a TestDefinition) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &'a TestDefinition {
        self.definition
    }

    pub fn score(&self, answers: &AnswerSet) -> Result<ScoreResult, ScoringError> {
        match (&self.definition.instrument, answers) {
            (Instrument::ForcedPair(spec), AnswerSet::ForcedPair { chosen }) => {
                Ok(forced_pair::score(spec, chosen))
            }
            (Instrument::SplitPoint(spec), AnswerSet::SplitPoint { left_points }) => {
                Ok(split_points::score(spec, left_points))
            }
            (Instrument::ColorType(spec), AnswerSet::ColorType(color_answers)) => {
                Ok(color::score(spec, color_answers))
            }
            (instrument, answers) => Err(ScoringError::AnswerKindMismatch {
                test_id: self.definition.id.clone(),
                expected: instrument.kind(),
                received: answers.kind(),
            }),
        }
    }
}

/// Raised when answers do not fit the instrument they were submitted to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("test '{test_id}' expects {expected} answers, received {received}")]
    AnswerKindMismatch {
        test_id: TestId,
        expected: InstrumentKind,
        received: InstrumentKind,
    },
}
