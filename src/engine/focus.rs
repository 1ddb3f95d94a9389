//! Focus-corpus selection: the remediation subset of a pool.
//!
//! Derives a bounded subset of historically difficult items from the
//! performance ledger. Pure and deterministic: identical `(ledger, pool)`
//! inputs always produce the same subset, with ties broken by pool order.
//! The subset is recomputed on demand, never cached across ledger changes.

use crate::config::limits;
use crate::corpus::{Item, ItemPool};
use crate::ledger::PerformanceLedger;

/// Select the focus corpus for a pool given the current ledger.
///
/// Items whose error rate strictly exceeds `FOCUS_ERROR_THRESHOLD` (with
/// at least `MIN_ATTEMPTS_FOR_EVAL` attempts) are taken first, by rate
/// descending, capped at `MAX_FOCUS_SIZE`. If fewer than `MIN_FOCUS_SIZE`
/// qualify, the list is completed with the least-mastered remaining items;
/// items with too few attempts rank last. A pool smaller than
/// `MIN_FOCUS_SIZE` is returned whole.
pub fn select_focus_corpus(ledger: &PerformanceLedger, pool: &ItemPool) -> Vec<Item> {
    if pool.len() < limits::MIN_FOCUS_SIZE {
        return pool.items().to_vec();
    }

    // Rate per item, in pool order; None marks too few attempts.
    let rated: Vec<(&Item, Option<f64>)> = pool
        .items()
        .iter()
        .map(|item| (item, ledger.error_rate(&item.id)))
        .collect();

    let mut eligible: Vec<(&Item, f64)> = rated
        .iter()
        .filter_map(|&(item, rate)| rate.map(|r| (item, r)))
        .filter(|&(_, rate)| rate > limits::FOCUS_ERROR_THRESHOLD)
        .collect();
    // Stable sort keeps pool order for equal rates.
    eligible.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    eligible.truncate(limits::MAX_FOCUS_SIZE);

    let mut focus: Vec<Item> = eligible.iter().map(|&(item, _)| item.clone()).collect();
    if focus.len() >= limits::MIN_FOCUS_SIZE {
        return focus;
    }

    // Complete with the least-mastered remaining items; unevaluated items
    // sort last.
    let mut rest: Vec<(&Item, f64)> = rated
        .iter()
        .filter(|(item, _)| !focus.iter().any(|f| f.id == item.id))
        .map(|&(item, rate)| (item, rate.unwrap_or(f64::NEG_INFINITY)))
        .collect();
    rest.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (item, _) in rest {
        if focus.len() >= limits::MIN_FOCUS_SIZE {
            break;
        }
        focus.push(item.clone());
    }
    focus
}
