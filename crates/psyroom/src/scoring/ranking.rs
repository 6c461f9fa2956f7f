use serde::{Deserialize, Serialize};

use super::definition::Tag;
use super::levels::Level;

/// One category in a scored result, ordered by [`rank_rows`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRow {
    pub tag: Tag,
    pub label: String,
    pub count: u32,
    pub percent: u8,
    pub level: Level,
}

/// Integer percentage of `part` against `whole`, rounded half away from zero.
///
/// A zero `whole` is treated as one so empty submissions produce zero instead of failing.
pub fn percent_of(part: u32, whole: u32) -> u8 {
    let percent = ratio_on_scale(part, whole, 100).min(100);
    u8::try_from(percent).unwrap_or(100)
}

pub(crate) fn ratio_on_scale(part: u32, whole: u32, scale: u32) -> u32 {
    let whole = u64::from(whole.max(1));
    let scaled = (u64::from(part) * u64::from(scale) + whole / 2) / whole;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Sort rows descending by `key`. The sort is stable, so ties keep declaration order.
pub fn rank_rows<F>(mut rows: Vec<RankedRow>, key: F) -> Vec<RankedRow>
where
    F: Fn(&RankedRow) -> u32,
{
    rows.sort_by(|left, right| key(right).cmp(&key(left)));
    rows
}
