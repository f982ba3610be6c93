//! Cancellation guard.
//!
//! Walks the table from the highest genus down. Whenever the next entry has
//! the opposite sign of the one above it, the upper value is split into exact
//! halves that are re-inserted one exponent step at a time until the last
//! fragment shares the lower entry's exponent; that fragment and the lower
//! entry are then combined exactly. After a full pass every entry carries the
//! sign of the top entry, so the final reduction adds like-signed terms only.

use super::genus::Genus;
use super::table::BucketTable;
use crate::float::ExactFloat;

/// Events allowed per genus slot before the guard gives up.
pub const DEFAULT_EVENTS_PER_SLOT: usize = 16;

/// Bookkeeping from one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Sign changes that were resolved.
    pub events: usize,
    /// Halved fragments re-inserted across all events.
    pub fragments: usize,
    /// The event cap was hit; remaining sign changes were left in place.
    pub capped: bool,
}

/// Upper bound on resolved sign changes within a single sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepLimit {
    pub max_events: usize,
}

impl SweepLimit {
    pub fn for_type<F: ExactFloat>() -> Self {
        Self {
            max_events: F::GENUS_SLOTS * DEFAULT_EVENTS_PER_SLOT,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            max_events: usize::MAX,
        }
    }
}

/// Run the cancellation guard over `table`.
pub fn sweep<F: ExactFloat>(table: &mut BucketTable<F>, limit: SweepLimit) -> SweepReport {
    let mut report = SweepReport::default();
    let Some(mut upper) = table.highest() else {
        return report;
    };

    while let Some(lower) = table.next_below(upper) {
        let (Some(prev), Some(cur)) = (table.get(upper), table.get(lower)) else {
            unreachable!("occupied genus without a value");
        };
        if prev.is_sign_negative() == cur.is_sign_negative() {
            upper = lower;
            continue;
        }

        if report.events == limit.max_events {
            log::warn!(
                "cancellation guard stopped after {} events with {} entries left",
                report.events,
                table.len()
            );
            report.capped = true;
            return report;
        }

        table.take(upper);
        table.take(lower);
        let (fragments, settled) = redistribute(table, prev, cur, lower);
        report.fragments += fragments;
        report.events += 1;

        // Everything above the highest settled genus still shares one sign,
        // so the walk resumes at the first entry above it.
        let touched = settled.map_or(upper, |genus| genus.max(upper));
        match table.next_above(touched).or_else(|| table.highest()) {
            Some(genus) => upper = genus,
            None => return report,
        }
    }
    report
}

/// Spread `prev` down to the exponent of `cur` and fold it in.
///
/// The inserted fragments plus the final remainder always sum to `prev`
/// exactly. Returns the number of fragments inserted and the highest genus
/// any insertion settled in.
fn redistribute<F: ExactFloat>(
    table: &mut BucketTable<F>,
    prev: F,
    cur: F,
    cur_genus: Genus,
) -> (usize, Option<Genus>) {
    let half = F::pow2(-1);
    let floor = cur_genus.class();
    let mut remainder = prev;
    let mut fragments = 0;
    let mut settled = None;

    loop {
        let fragment = remainder * half;
        // Halving is exact until the subnormal range drops a bit.
        if fragment == F::zero() || fragment + fragment != remainder {
            break;
        }
        if Genus::of(fragment).class() < floor {
            break;
        }
        settled = settled.max(table.insert(fragment));
        remainder = fragment;
        fragments += 1;
    }

    log::trace!(
        "split {prev:e} into {fragments} halves above genus {}, folding {remainder:e} into {cur:e}",
        cur_genus.id()
    );
    settled = settled.max(table.insert(cur + remainder));
    (fragments, settled)
}
