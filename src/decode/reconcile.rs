//! Row-count reconciliation across group families.
//!
//! Field groups for a single invoice line arrive as siblings across many
//! distinct tag families. A partially-filled document — a platform bug,
//! or a submitter leaving a field blank so its group is never emitted —
//! must be caught here, before assembly, rather than silently producing
//! a short invoice.

use std::collections::BTreeSet;

use super::store::RowStore;
use crate::core::BillingError;

/// Determine the common row count across every group family present in
/// the store.
///
/// Policy: all per-type population counts must be equal. An empty store
/// is [`BillingError::NoData`]; two or more distinct counts fail with
/// [`BillingError::RowCountMismatch`], whose message names the actual
/// mismatched families rather than just the sizes. On success the count
/// is always ≥ 1.
pub fn reconciled_row_count(store: &RowStore) -> Result<usize, BillingError> {
    let population = store.population();
    if population.is_empty() {
        return Err(BillingError::NoData);
    }

    let sizes: BTreeSet<usize> = population.values().copied().collect();
    if sizes.len() == 1 {
        // Non-empty set, single member.
        return Ok(sizes.into_iter().next().unwrap_or(0));
    }

    let details = population
        .iter()
        .map(|(group_type, count)| format!("{}={count}", group_type.name()))
        .collect::<Vec<_>>()
        .join(", ");
    Err(BillingError::RowCountMismatch {
        observed_sizes: sizes.into_iter().collect(),
        details,
    })
}
