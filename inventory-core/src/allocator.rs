//! Inventory-number assignment.
//!
//! The allocator works on a snapshot: the identifiers known to the store
//! plus every non-blank identifier already present in the batch. Each
//! minted identifier is added to that working set before the next record is
//! processed, so one call never hands out the same identifier twice.

use chrono::Datelike;
use log::{debug, info};
use std::collections::{HashMap, HashSet};

use crate::policy::{self, Decimal, NumberingPolicy};
use crate::record::AssetRecord;

/// Fills blank inventory numbers according to a [`NumberingPolicy`].
#[derive(Clone, Debug)]
pub struct IdentifierAllocator {
    policy: NumberingPolicy,
    current_year: i32,
}

impl IdentifierAllocator {
    pub fn new(policy: NumberingPolicy) -> Self {
        Self {
            policy,
            current_year: chrono::Local::now().year(),
        }
    }

    /// Year used for year-coded numbers when the invoice date has none.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn policy(&self) -> NumberingPolicy {
        self.policy
    }

    /// Returns `records` in the same order with every blank inventory number
    /// replaced. Non-blank numbers are kept verbatim, even when they collide
    /// with `existing`.
    pub fn assign(
        &self,
        mut records: Vec<AssetRecord>,
        existing: &HashSet<String>,
    ) -> Vec<AssetRecord> {
        let mut working: HashSet<String> = existing
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        working.extend(
            records
                .iter()
                .filter(|r| r.has_identifier())
                .map(|r| r.identifier().to_string()),
        );

        let mut minted = 0usize;
        match self.policy {
            NumberingPolicy::Sequential { start } => {
                // `start - 1` joins the maximum so the first mint is `start`.
                let floor = start.checked_sub(1).map(Decimal::from);
                let mut last = working
                    .iter()
                    .filter_map(|s| policy::sequential_value(s))
                    .chain(floor)
                    .max();
                for rec in records.iter_mut().filter(|r| !r.has_identifier()) {
                    let next = last
                        .as_ref()
                        .map_or_else(|| Decimal::from(start), Decimal::succ);
                    let id = next.to_string();
                    debug!("minted inventory number {id}");
                    working.insert(id.clone());
                    rec.inventory_number = id;
                    last = Some(next);
                    minted += 1;
                }
            }
            NumberingPolicy::YearCoded => {
                // Per-year counters, filled lazily from the working set.
                let mut counters: HashMap<String, Decimal> = HashMap::new();
                for rec in records.iter_mut().filter(|r| !r.has_identifier()) {
                    let year = policy::year_from_date(&rec.invoice_date)
                        .map(str::to_string)
                        .unwrap_or_else(|| self.current_year.to_string());
                    let counter = counters
                        .entry(year.clone())
                        .or_insert_with(|| max_counter_for_year(&working, &year));
                    *counter = counter.succ();
                    let id = policy::format_year_coded(&year, counter);
                    debug!("minted inventory number {id}");
                    working.insert(id.clone());
                    rec.inventory_number = id;
                    minted += 1;
                }
            }
        }
        if minted > 0 {
            info!(
                "assigned {minted} inventory number(s) to a batch of {}",
                records.len()
            );
        }
        records
    }
}

fn max_counter_for_year(working: &HashSet<String>, year: &str) -> Decimal {
    working
        .iter()
        .filter_map(|s| policy::year_coded_parts(s))
        .filter(|(y, _)| *y == year)
        .map(|(_, n)| n)
        .max()
        .unwrap_or_else(Decimal::zero)
}

/// Assign with the local current year as the year-coded fallback.
pub fn assign(
    records: Vec<AssetRecord>,
    policy: NumberingPolicy,
    existing: &HashSet<String>,
) -> Vec<AssetRecord> {
    IdentifierAllocator::new(policy).assign(records, existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(date: &str) -> AssetRecord {
        AssetRecord {
            invoice_date: date.to_string(),
            ..Default::default()
        }
    }

    fn with_id(id: &str) -> AssetRecord {
        AssetRecord {
            inventory_number: id.to_string(),
            ..Default::default()
        }
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn ids(records: &[AssetRecord]) -> Vec<&str> {
        records.iter().map(|r| r.inventory_number.as_str()).collect()
    }

    #[test]
    fn sequential_starts_at_start() {
        let out = assign(
            vec![blank("")],
            NumberingPolicy::Sequential { start: 1_000_001 },
            &HashSet::new(),
        );
        assert_eq!(ids(&out), ["1000001"]);
    }

    #[test]
    fn sequential_continues_after_existing_max() {
        let out = assign(
            vec![blank("")],
            NumberingPolicy::Sequential { start: 1_000_001 },
            &set(&["5", "1000007"]),
        );
        assert_eq!(ids(&out), ["1000008"]);
    }

    #[test]
    fn sequential_ignores_non_numeric_existing() {
        let out = assign(
            vec![blank("")],
            NumberingPolicy::Sequential { start: 10 },
            &set(&["INV-2024-900", "12a", " 15 "]),
        );
        assert_eq!(ids(&out), ["16"]);
    }

    #[test]
    fn sequential_batch_mints_distinct_increasing() {
        let records = vec![blank(""), with_id("1000003"), blank(""), blank("")];
        let out = assign(
            records,
            NumberingPolicy::Sequential { start: 1_000_001 },
            &HashSet::new(),
        );
        assert_eq!(ids(&out), ["1000004", "1000003", "1000005", "1000006"]);
    }

    #[test]
    fn year_coded_continues_counter() {
        let out = IdentifierAllocator::new(NumberingPolicy::YearCoded)
            .with_current_year(2025)
            .assign(vec![blank("03.04.2024")], &set(&["INV-2024-001"]));
        assert_eq!(ids(&out), ["INV-2024-002"]);
    }

    #[test]
    fn year_coded_falls_back_to_current_year() {
        let out = IdentifierAllocator::new(NumberingPolicy::YearCoded)
            .with_current_year(2025)
            .assign(vec![blank("")], &HashSet::new());
        assert_eq!(ids(&out), ["INV-2025-001"]);
    }

    #[test]
    fn year_coded_counters_are_independent() {
        let existing = set(&["INV-2023-041", "INV-2024-007"]);
        let out = IdentifierAllocator::new(NumberingPolicy::YearCoded)
            .with_current_year(2025)
            .assign(
                vec![blank("2024-01-02"), blank("5.6.2023"), blank("2024-02-03")],
                &existing,
            );
        assert_eq!(ids(&out), ["INV-2024-008", "INV-2023-042", "INV-2024-009"]);
    }

    #[test]
    fn year_coded_sees_batch_identifiers() {
        let records = vec![with_id("INV-2024-010"), blank("01.01.2024")];
        let out = IdentifierAllocator::new(NumberingPolicy::YearCoded)
            .with_current_year(2025)
            .assign(records, &HashSet::new());
        assert_eq!(ids(&out), ["INV-2024-010", "INV-2024-011"]);
    }

    #[test]
    fn non_blank_identifiers_kept_verbatim() {
        let records = vec![with_id(" 42 "), with_id("1000001")];
        let out = assign(
            records,
            NumberingPolicy::Sequential { start: 1 },
            &set(&["1000001"]),
        );
        assert_eq!(ids(&out), [" 42 ", "1000001"]);
    }

    #[test]
    fn minted_identifiers_never_collide_with_existing() {
        let existing = set(&["1", "2", "3", "INV-2024-001"]);
        let records: Vec<_> = (0..50).map(|_| blank("")).collect();
        let out = assign(records, NumberingPolicy::Sequential { start: 1 }, &existing);
        let mut seen = existing.clone();
        for rec in &out {
            assert!(seen.insert(rec.inventory_number.clone()));
        }
    }

    #[test]
    fn sequential_continues_past_u64_max() {
        let out = assign(
            vec![blank(""), blank("")],
            NumberingPolicy::Sequential { start: 1 },
            &set(&["18446744073709551615"]),
        );
        assert_eq!(ids(&out), ["18446744073709551616", "18446744073709551617"]);
    }

    #[test]
    fn sequential_respects_identifiers_wider_than_u64() {
        let out = assign(
            vec![blank("")],
            NumberingPolicy::Sequential { start: 1_000_001 },
            &set(&["99999999999999999999", "1000007"]),
        );
        assert_eq!(ids(&out), ["100000000000000000000"]);
    }

    #[test]
    fn sequential_leading_zeros_compare_by_value() {
        let out = assign(
            vec![blank("")],
            NumberingPolicy::Sequential { start: 1 },
            &set(&["0009", "12"]),
        );
        assert_eq!(ids(&out), ["13"]);
    }

    #[test]
    fn sequential_start_zero_mints_zero_first() {
        let out = assign(
            vec![blank(""), blank("")],
            NumberingPolicy::Sequential { start: 0 },
            &HashSet::new(),
        );
        assert_eq!(ids(&out), ["0", "1"]);
    }

    #[test]
    fn year_coded_counter_wider_than_u64() {
        let existing = set(&["INV-2024-99999999999999999999", "INV-2024-005"]);
        let out = IdentifierAllocator::new(NumberingPolicy::YearCoded)
            .with_current_year(2025)
            .assign(vec![blank("2024-06-01")], &existing);
        assert_eq!(ids(&out), ["INV-2024-100000000000000000000"]);
    }

    #[test]
    fn year_coded_counter_at_u64_max_does_not_overflow() {
        let out = IdentifierAllocator::new(NumberingPolicy::YearCoded)
            .with_current_year(2025)
            .assign(
                vec![blank("01.02.2024")],
                &set(&["INV-2024-18446744073709551615"]),
            );
        assert_eq!(ids(&out), ["INV-2024-18446744073709551616"]);
    }
}
