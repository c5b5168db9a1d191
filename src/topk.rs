//! Top-K selection with deterministic tie-breaks, so results are identical
//! for any worker count, merge order, and hash-map iteration order.

use ahash::AHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use time::Date;

/// One row of the daily report: the day's most active author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayTopAuthor {
    pub date: Date,
    pub username: String,
    pub count: u64,
}

/// Top `k` entries of a flat counter, count descending, ties broken by
/// entity ascending. Uses a bounded min-heap so huge key sets (mentions)
/// never materialize a full sorted copy.
pub fn top_k_flat(counts: AHashMap<String, u64>, k: usize) -> Vec<(String, u64)> {
    if k == 0 {
        return Vec::new();
    }
    // Min-heap of the k best; the root is the current worst (lowest count,
    // then lexicographically largest entity).
    let mut heap: BinaryHeap<Reverse<(u64, Reverse<String>)>> = BinaryHeap::with_capacity(k + 1);
    for (entity, count) in counts {
        heap.push(Reverse((count, Reverse(entity))));
        if heap.len() > k {
            heap.pop();
        }
    }
    let mut out: Vec<(String, u64)> = heap
        .into_iter()
        .map(|Reverse((count, Reverse(entity)))| (entity, count))
        .collect();
    out.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Daily report: per day, the single author with the most tweets (ties: the
/// lexicographically smallest username), then the top `k` days by that
/// author's count descending, ties broken by date ascending.
pub fn top_k_daily(counts: AHashMap<Date, AHashMap<String, u64>>, k: usize) -> Vec<DayTopAuthor> {
    let mut winners: Vec<DayTopAuthor> = counts
        .into_iter()
        .filter_map(|(date, users)| {
            let mut best: Option<(String, u64)> = None;
            for (username, count) in users {
                let better = match &best {
                    None => true,
                    Some((bu, bc)) => count > *bc || (count == *bc && username < *bu),
                };
                if better {
                    best = Some((username, count));
                }
            }
            best.map(|(username, count)| DayTopAuthor { date, username, count })
        })
        .collect();
    winners.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.date.cmp(&b.date)));
    winners.truncate(k);
    winners
}
