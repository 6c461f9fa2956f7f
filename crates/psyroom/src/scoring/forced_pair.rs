use super::definition::{ForcedPairSpec, Tag};
use super::ranking::{percent_of, rank_rows, RankedRow};
use super::result::{ResultDetails, ScoreResult};

/// Count chosen tags against the declared tag set.
///
/// Tags missing from the definition are dropped and reported in `ignored`. The percentage
/// base is the number of submitted answers, not the number of questions.
pub fn score(spec: &ForcedPairSpec, chosen: &[Tag]) -> ScoreResult {
    let mut counts = vec![0u32; spec.tags.len()];
    let mut ignored = Vec::new();

    for tag in chosen {
        match spec.tags.iter().position(|declared| &declared.tag == tag) {
            Some(index) => counts[index] += 1,
            None => ignored.push(tag.0.clone()),
        }
    }

    let total = u32::try_from(chosen.len()).unwrap_or(u32::MAX);
    let rows = spec
        .tags
        .iter()
        .zip(counts)
        .map(|(declared, count)| {
            let percent = percent_of(count, total);
            RankedRow {
                tag: declared.tag.clone(),
                label: declared.label.clone(),
                count,
                percent,
                level: spec.thresholds.level(percent),
            }
        })
        .collect();

    let ranked = rank_rows(rows, |row| u32::from(row.percent));
    ScoreResult::assemble(total, ranked, ResultDetails::ForcedPair { ignored })
}
