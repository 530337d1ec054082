//! Folding worker partial tables into the global table

use crate::worker::{WorkerOutput, WorkerStats};
use brc_core::StatsTable;

/// Merge partial tables into one.
///
/// The fold is a pointwise min/max/sum/count per key, which is commutative
/// and associative: the result is the same for any worker count, chunk
/// layout or completion order.
pub fn merge_partials<I>(partials: I) -> StatsTable
where
    I: IntoIterator<Item = StatsTable>,
{
    partials
        .into_iter()
        .fold(StatsTable::new(), |mut global, partial| {
            global.merge(partial);
            global
        })
}

/// Merge finished worker outputs, also summing their counters.
///
/// Must only be called after every worker has been joined.
pub fn merge_outputs<I>(outputs: I) -> (StatsTable, WorkerStats)
where
    I: IntoIterator<Item = WorkerOutput>,
{
    let mut totals = WorkerStats::default();
    let table = merge_partials(outputs.into_iter().map(|output| {
        totals.absorb(&output.stats);
        output.table
    }));
    (table, totals)
}
