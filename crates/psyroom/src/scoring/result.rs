use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::color::DominanceProfile;
use super::definition::{ColorCategory, InstrumentKind, Tag};
use super::ranking::RankedRow;

/// Output of a scoring call. Callers persist it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total: u32,
    pub counts: BTreeMap<Tag, u32>,
    pub percents: BTreeMap<Tag, u8>,
    pub ranked: Vec<RankedRow>,
    #[serde(flatten)]
    pub details: ResultDetails,
}

impl ScoreResult {
    pub(crate) fn assemble(total: u32, ranked: Vec<RankedRow>, details: ResultDetails) -> Self {
        let counts = ranked
            .iter()
            .map(|row| (row.tag.clone(), row.count))
            .collect();
        let percents = ranked
            .iter()
            .map(|row| (row.tag.clone(), row.percent))
            .collect();

        Self {
            total,
            counts,
            percents,
            ranked,
            details,
        }
    }

    pub fn kind(&self) -> InstrumentKind {
        match self.details {
            ResultDetails::ForcedPair { .. } => InstrumentKind::ForcedPair,
            ResultDetails::SplitPoint { .. } => InstrumentKind::SplitPoint,
            ResultDetails::ColorType { .. } => InstrumentKind::ColorType,
        }
    }

    /// Answer entries that were dropped while scoring.
    pub fn ignored_entries(&self) -> &[String] {
        match &self.details {
            ResultDetails::ForcedPair { ignored } | ResultDetails::ColorType { ignored, .. } => {
                ignored
            }
            ResultDetails::SplitPoint { .. } => &[],
        }
    }

    pub fn top(&self) -> Option<&RankedRow> {
        self.ranked.first()
    }
}

/// Instrument-specific part of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultDetails {
    ForcedPair {
        ignored: Vec<String>,
    },
    SplitPoint {
        maxima: BTreeMap<Tag, u32>,
        normalized: BTreeMap<Tag, u32>,
        groups: Vec<GroupScore>,
        skipped_questions: Vec<usize>,
    },
    ColorType {
        base: ColorTotals,
        part_a: ColorTotals,
        part_b: ColorTotals,
        dominance: DominanceProfile,
        ignored: Vec<String>,
    },
}

/// Sum of member factors' normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupScore {
    pub key: String,
    pub label: String,
    pub total: u32,
    pub maximum: u32,
}

/// Raw points per color category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTotals {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl ColorTotals {
    pub fn new(red: u32, green: u32, blue: u32) -> Self {
        Self { red, green, blue }
    }

    pub fn get(&self, category: ColorCategory) -> u32 {
        match category {
            ColorCategory::Red => self.red,
            ColorCategory::Green => self.green,
            ColorCategory::Blue => self.blue,
        }
    }

    pub fn add(&mut self, category: ColorCategory, points: u32) {
        match category {
            ColorCategory::Red => self.red = self.red.saturating_add(points),
            ColorCategory::Green => self.green = self.green.saturating_add(points),
            ColorCategory::Blue => self.blue = self.blue.saturating_add(points),
        }
    }

    pub fn total(&self) -> u32 {
        self.red.saturating_add(self.green).saturating_add(self.blue)
    }

    pub fn combined(&self, other: &ColorTotals) -> ColorTotals {
        ColorTotals {
            red: self.red.saturating_add(other.red),
            green: self.green.saturating_add(other.green),
            blue: self.blue.saturating_add(other.blue),
        }
    }
}
