use std::collections::BTreeMap;

use super::definition::{SplitPointSpec, Tag};
use super::ranking::{percent_of, rank_rows, RankedRow};
use super::result::{GroupScore, ResultDetails, ScoreResult};

/// Split a question's budget, returning `(left, right)` or `None` when `left` overspends it.
pub fn complement(left: u32, max_points: u32) -> Option<(u32, u32)> {
    max_points
        .checked_sub(left)
        .map(|right| (left, right))
}

/// Accumulate left allocations and their complements per factor.
///
/// `left_points[i]` answers `spec.questions[i]`. Extra allocations are ignored and
/// over-budget allocations skip their question. Each factor is measured against the sum of
/// budgets of every question that references it.
pub fn score(spec: &SplitPointSpec, left_points: &[u32]) -> ScoreResult {
    let factor_count = spec.factors.len();
    let mut points = vec![0u32; factor_count];
    let mut maxima = vec![0u32; factor_count];
    let mut skipped_questions = Vec::new();
    let mut total = 0u32;

    let position = |tag: &Tag| spec.factors.iter().position(|factor| &factor.tag == tag);

    for (index, question) in spec.questions.iter().enumerate() {
        let (Some(left_index), Some(right_index)) =
            (position(&question.left.factor), position(&question.right.factor))
        else {
            continue;
        };

        let max_points = question.max_points(spec.default_max_points);
        maxima[left_index] = maxima[left_index].saturating_add(max_points);
        maxima[right_index] = maxima[right_index].saturating_add(max_points);

        let Some(&allocated) = left_points.get(index) else {
            continue;
        };

        match complement(allocated, max_points) {
            Some((left, right)) => {
                points[left_index] = points[left_index].saturating_add(left);
                points[right_index] = points[right_index].saturating_add(right);
                total = total.saturating_add(max_points);
            }
            None => skipped_questions.push(index + 1),
        }
    }

    let mut normalized = BTreeMap::new();
    let rows = spec
        .factors
        .iter()
        .enumerate()
        .map(|(index, factor)| {
            let value = spec.levels.normalize(points[index], maxima[index]);
            normalized.insert(factor.tag.clone(), value);
            RankedRow {
                tag: factor.tag.clone(),
                label: factor.label.clone(),
                count: points[index],
                percent: percent_of(points[index], maxima[index]),
                level: spec.levels.level(value),
            }
        })
        .collect::<Vec<_>>();

    let groups = spec
        .groups
        .iter()
        .map(|group| {
            let members: Vec<u32> = group
                .members
                .iter()
                .filter_map(|member| normalized.get(member).copied())
                .collect();
            let member_count = u32::try_from(members.len()).unwrap_or(u32::MAX);
            GroupScore {
                key: group.key.clone(),
                label: group.label.clone(),
                total: members
                    .iter()
                    .fold(0u32, |sum, value| sum.saturating_add(*value)),
                maximum: member_count.saturating_mul(spec.levels.scale_max()),
            }
        })
        .collect();

    let maxima = spec
        .factors
        .iter()
        .zip(&maxima)
        .map(|(factor, maximum)| (factor.tag.clone(), *maximum))
        .collect();

    let ranked = rank_rows(rows, |row| {
        normalized.get(&row.tag).copied().unwrap_or_default()
    });

    ScoreResult::assemble(
        total,
        ranked,
        ResultDetails::SplitPoint {
            maxima,
            normalized,
            groups,
            skipped_questions,
        },
    )
}
