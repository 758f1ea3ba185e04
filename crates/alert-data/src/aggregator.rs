//! Grouping of table rows by region.

use std::collections::HashMap;

use alert_core::models::{Row, Table};

// ── RegionGroup ───────────────────────────────────────────────────────────────

/// All rows of one region, in file order.
#[derive(Debug, Clone)]
pub struct RegionGroup<'a> {
    pub region: &'a str,
    pub rows: Vec<&'a Row>,
}

impl<'a> RegionGroup<'a> {
    fn new(region: &'a str) -> Self {
        Self {
            region,
            rows: Vec::new(),
        }
    }

    /// Sum of young-bracket counts.
    pub fn young_sum(&self) -> i64 {
        saturating_sum(self.rows.iter().map(|r| r.young_bracket_count))
    }

    /// Sum of older-bracket counts.
    pub fn older_sum(&self) -> i64 {
        saturating_sum(self.rows.iter().map(|r| r.older_bracket_count))
    }

    /// Sum of both brackets.
    pub fn total_updates(&self) -> i64 {
        saturating_sum(self.rows.iter().map(|r| r.total_updates()))
    }

    /// The second-to-last and last observations, or `None` with fewer than two.
    pub fn last_two(&self) -> Option<(&'a Row, &'a Row)> {
        match self.rows.as_slice() {
            [.., prev, last] => Some((*prev, *last)),
            _ => None,
        }
    }
}

/// Sums clamp at the `i64` bounds instead of overflowing.
fn saturating_sum(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0, i64::saturating_add)
}

// ── RegionAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups table rows by region.
pub struct RegionAggregator;

impl RegionAggregator {
    /// Group rows by region.
    ///
    /// Groups appear in the order their region is first seen; rows keep
    /// their table order inside each group.
    pub fn group_by_region(table: &Table) -> Vec<RegionGroup<'_>> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<RegionGroup<'_>> = Vec::new();

        for row in table.rows() {
            let slot = *index.entry(row.region.as_str()).or_insert_with(|| {
                groups.push(RegionGroup::new(row.region.as_str()));
                groups.len() - 1
            });
            groups[slot].rows.push(row);
        }

        debug_assert!(groups
            .iter()
            .all(|g| g.rows.windows(2).all(|w| w[0].ordinal < w[1].ordinal)));

        groups
    }

    /// Sorted list of distinct regions.
    pub fn regions(table: &Table) -> Vec<String> {
        let mut regions: Vec<String> = Self::group_by_region(table)
            .into_iter()
            .map(|g| g.region.to_string())
            .collect();
        regions.sort();
        regions
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, i64, i64)]) -> Table {
        Table::new(
            rows.iter()
                .map(|(region, young, older)| Row::new(*region, *young, *older))
                .collect(),
        )
    }

    #[test]
    fn test_group_by_region_first_seen_order() {
        let t = table(&[("B", 1, 0), ("A", 2, 0), ("B", 3, 0), ("C", 4, 0)]);
        let groups = RegionAggregator::group_by_region(&t);

        let regions: Vec<&str> = groups.iter().map(|g| g.region).collect();
        assert_eq!(regions, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_group_by_region_preserves_row_order() {
        let t = table(&[("B", 1, 0), ("A", 2, 0), ("B", 3, 0), ("B", 5, 0)]);
        let groups = RegionAggregator::group_by_region(&t);

        let values: Vec<i64> = groups[0].rows.iter().map(|r| r.young_bracket_count).collect();
        assert_eq!(values, vec![1, 3, 5]);
    }

    #[test]
    fn test_group_by_region_empty_table() {
        assert!(RegionAggregator::group_by_region(&Table::empty()).is_empty());
    }

    #[test]
    fn test_group_sums() {
        let t = table(&[("A", 10, 1), ("A", 15, 2)]);
        let groups = RegionAggregator::group_by_region(&t);

        assert_eq!(groups[0].young_sum(), 25);
        assert_eq!(groups[0].older_sum(), 3);
        assert_eq!(groups[0].total_updates(), 28);
    }

    #[test]
    fn test_group_sums_saturate() {
        let t = table(&[("A", i64::MAX, i64::MAX), ("A", 1, 1), ("B", i64::MIN, -1)]);
        let groups = RegionAggregator::group_by_region(&t);

        assert_eq!(groups[0].young_sum(), i64::MAX);
        assert_eq!(groups[0].older_sum(), i64::MAX);
        assert_eq!(groups[0].total_updates(), i64::MAX);
        assert_eq!(groups[1].total_updates(), i64::MIN);
    }

    #[test]
    fn test_last_two_picks_final_pair() {
        let t = table(&[("A", 1, 0), ("A", 2, 0), ("A", 3, 0)]);
        let groups = RegionAggregator::group_by_region(&t);

        let (prev, last) = groups[0].last_two().unwrap();
        assert_eq!(prev.young_bracket_count, 2);
        assert_eq!(last.young_bracket_count, 3);
    }

    #[test]
    fn test_last_two_single_row_is_none() {
        let t = table(&[("A", 1, 0)]);
        let groups = RegionAggregator::group_by_region(&t);
        assert!(groups[0].last_two().is_none());
    }

    #[test]
    fn test_regions_sorted_distinct() {
        let t = table(&[("Goa", 1, 0), ("Bihar", 2, 0), ("Goa", 3, 0)]);
        assert_eq!(
            RegionAggregator::regions(&t),
            vec!["Bihar".to_string(), "Goa".to_string()]
        );
    }
}
