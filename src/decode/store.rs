//! Row-indexed storage for populated groups.

use std::collections::BTreeMap;

use super::registry::{
    ActivityAccount, ArticleAccount, Computation, CostCenterAccount, DepartmentAccount, RowGroup,
    RowGroupType, SubAccount, VatRate,
};

/// Mapping from `(RowGroupType, row index)` to the populated group.
///
/// One store exists per decode operation. It is filled during the
/// document walk, read by the reconciler and the assembler, and then
/// discarded; it is never mutated after decoding finishes and never
/// shared between invocations.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    groups: BTreeMap<(RowGroupType, u32), RowGroup>,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a populated group at `(type, index)`. A later insertion at
    /// the same key overwrites (last-write-wins); well-formed input never
    /// produces duplicates, so this is not separately validated.
    pub fn insert(&mut self, index: u32, group: RowGroup) {
        self.groups.insert((group.group_type(), index), group);
    }

    pub fn get(&self, group_type: RowGroupType, index: u32) -> Option<&RowGroup> {
        self.groups.get(&(group_type, index))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Number of distinct row indices populated per type present in the
    /// store. Types with no occurrences are absent from the result.
    pub fn population(&self) -> BTreeMap<RowGroupType, usize> {
        let mut counts = BTreeMap::new();
        for (group_type, _) in self.groups.keys() {
            *counts.entry(*group_type).or_insert(0) += 1;
        }
        counts
    }

    // Typed accessors for the groups the assembler consumes. A lookup
    // miss is an absent group, not an error.

    pub fn computation(&self, index: u32) -> Option<&Computation> {
        match self.get(RowGroupType::Computation, index) {
            Some(RowGroup::Computation(g)) => Some(g),
            _ => None,
        }
    }

    pub fn cost_center_account(&self, index: u32) -> Option<&CostCenterAccount> {
        match self.get(RowGroupType::CostCenterAccount, index) {
            Some(RowGroup::CostCenterAccount(g)) => Some(g),
            _ => None,
        }
    }

    pub fn sub_account(&self, index: u32) -> Option<&SubAccount> {
        match self.get(RowGroupType::SubAccount, index) {
            Some(RowGroup::SubAccount(g)) => Some(g),
            _ => None,
        }
    }

    pub fn department_account(&self, index: u32) -> Option<&DepartmentAccount> {
        match self.get(RowGroupType::DepartmentAccount, index) {
            Some(RowGroup::DepartmentAccount(g)) => Some(g),
            _ => None,
        }
    }

    pub fn activity_account(&self, index: u32) -> Option<&ActivityAccount> {
        match self.get(RowGroupType::ActivityAccount, index) {
            Some(RowGroup::ActivityAccount(g)) => Some(g),
            _ => None,
        }
    }

    pub fn article_account(&self, index: u32) -> Option<&ArticleAccount> {
        match self.get(RowGroupType::ArticleAccount, index) {
            Some(RowGroup::ArticleAccount(g)) => Some(g),
            _ => None,
        }
    }

    pub fn vat_rate(&self, index: u32) -> Option<&VatRate> {
        match self.get(RowGroupType::VatRate, index) {
            Some(RowGroup::VatRate(g)) => Some(g),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_counts_indices_per_type() {
        let mut store = RowStore::new();
        let mut comp = RowGroupType::Computation.new_group();
        comp.set("text", "rad 1");
        store.insert(1, comp);
        store.insert(2, RowGroupType::Computation.new_group());
        store.insert(1, RowGroupType::VatRate.new_group());

        let population = store.population();
        assert_eq!(population.get(&RowGroupType::Computation), Some(&2));
        assert_eq!(population.get(&RowGroupType::VatRate), Some(&1));
        assert_eq!(population.get(&RowGroupType::Summation), None);
    }

    #[test]
    fn later_insert_at_same_key_wins() {
        let mut store = RowStore::new();
        let mut first = RowGroupType::VatRate.new_group();
        first.set("vatRate", "12");
        store.insert(1, first);
        let mut second = RowGroupType::VatRate.new_group();
        second.set("vatRate", "25");
        store.insert(1, second);

        assert_eq!(store.len(), 1);
        assert_eq!(store.vat_rate(1).unwrap().vat_rate.as_deref(), Some("25"));
    }

    #[test]
    fn typed_accessors_miss_on_wrong_index() {
        let mut store = RowStore::new();
        store.insert(1, RowGroupType::Computation.new_group());
        assert!(store.computation(1).is_some());
        assert!(store.computation(2).is_none());
        assert!(store.vat_rate(1).is_none());
    }
}
