//! Bulk import of paper answer sheets exported as CSV.
//!
//! The first column names the respondent; the remaining columns are answer cells in
//! question order. Color-type sheets use fourteen cells: for part A then part B, one
//! choice, three ranking cells and three selection cells.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::scoring::{
    AnswerSet, ColorAnswers, ColorPartAnswers, InstrumentKind, Tag, TestDefinition,
};

use parser::SheetRow;

const COLOR_PART_CELLS: usize = 7;

#[derive(Debug)]
pub enum AnswerImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingRespondent { line: u64 },
    /// Blank split-point cell followed by further allocations on the same row.
    MissingAllocation { line: u64, column: usize },
    InvalidPoints { line: u64, column: usize, value: String },
}

impl std::fmt::Display for AnswerImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerImportError::Io(err) => write!(f, "failed to read answer sheet: {}", err),
            AnswerImportError::Csv(err) => write!(f, "invalid answer sheet CSV: {}", err),
            AnswerImportError::MissingRespondent { line } => {
                write!(f, "line {} has no respondent name", line)
            }
            AnswerImportError::MissingAllocation { line, column } => write!(
                f,
                "line {} column {}: blank point allocation before later answers",
                line, column
            ),
            AnswerImportError::InvalidPoints {
                line,
                column,
                value,
            } => write!(
                f,
                "line {} column {}: '{}' is not a point allocation",
                line, column, value
            ),
        }
    }
}

impl std::error::Error for AnswerImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnswerImportError::Io(err) => Some(err),
            AnswerImportError::Csv(err) => Some(err),
            AnswerImportError::MissingRespondent { .. }
            | AnswerImportError::MissingAllocation { .. }
            | AnswerImportError::InvalidPoints { .. } => None,
        }
    }
}

impl From<std::io::Error> for AnswerImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AnswerImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A respondent's answers ready for the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    pub respondent: String,
    pub answers: AnswerSet,
}

pub struct AnswerSheetImporter;

impl AnswerSheetImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        definition: &TestDefinition,
    ) -> Result<Vec<AnswerSheet>, AnswerImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, definition)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        definition: &TestDefinition,
    ) -> Result<Vec<AnswerSheet>, AnswerImportError> {
        let kind = definition.kind();
        parser::parse_rows(reader)?
            .into_iter()
            .map(|row| sheet_from_row(kind, row))
            .collect()
    }
}

fn sheet_from_row(kind: InstrumentKind, row: SheetRow) -> Result<AnswerSheet, AnswerImportError> {
    if row.respondent.is_empty() {
        return Err(AnswerImportError::MissingRespondent { line: row.line });
    }

    let answers = match kind {
        InstrumentKind::ForcedPair => AnswerSet::ForcedPair {
            chosen: row
                .cells
                .iter()
                .filter(|cell| !cell.is_empty())
                .map(|cell| Tag(cell.clone()))
                .collect(),
        },
        InstrumentKind::SplitPoint => AnswerSet::SplitPoint {
            left_points: split_points(&row)?,
        },
        InstrumentKind::ColorType => AnswerSet::ColorType(ColorAnswers {
            part_a: color_part(&row.cells, 0),
            part_b: color_part(&row.cells, COLOR_PART_CELLS),
        }),
    };

    Ok(AnswerSheet {
        respondent: row.respondent,
        answers,
    })
}

/// Trailing blanks are dropped by the parser and leave their questions unanswered.
/// A blank between allocations cannot be expressed positionally and is rejected.
fn split_points(row: &SheetRow) -> Result<Vec<u32>, AnswerImportError> {
    row.cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            if cell.is_empty() {
                return Err(AnswerImportError::MissingAllocation {
                    line: row.line,
                    column: index + 2,
                });
            }
            cell.parse::<u32>()
                .map_err(|_| AnswerImportError::InvalidPoints {
                    line: row.line,
                    column: index + 2,
                    value: cell.clone(),
                })
        })
        .collect()
}

fn color_part(cells: &[String], offset: usize) -> ColorPartAnswers {
    let cell = |index: usize| {
        cells
            .get(offset + index)
            .filter(|value| !value.is_empty())
            .cloned()
    };

    ColorPartAnswers {
        choice: cell(0),
        ranking: (1..4).filter_map(cell).collect(),
        selection: (4..7).filter_map(cell).collect(),
    }
}
