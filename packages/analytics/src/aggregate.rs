//! Frequency aggregation over a crime collection.

use std::collections::HashMap;

use guardian_crime_models::{AreaStatistics, CategoryCount, CrimeRecord, MonthCount, OutcomeCount};

/// Insertion-ordered counter.
///
/// Keys keep the position at which they were first seen, so a stable
/// sort by count leaves ties in first-encountered order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FrequencyCounter {
    /// Empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count for `key`.
    pub fn add(&mut self, key: &str) {
        if let Some(&i) = self.index.get(key) {
            self.entries[i].1 += 1;
        } else {
            self.index.insert(key.to_string(), self.entries.len());
            self.entries.push((key.to_string(), 1));
        }
    }

    /// Count for `key`, zero if never seen.
    #[must_use]
    pub fn get(&self, key: &str) -> u64 {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Entries in first-encountered order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), *n))
    }

    /// Entries by descending count; ties keep first-encountered order.
    #[must_use]
    pub fn into_sorted_by_count(self) -> Vec<(String, u64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// Entries by descending key (string order).
    #[must_use]
    pub fn into_sorted_by_key_desc(self) -> Vec<(String, u64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries
    }
}

impl<'a> FromIterator<&'a str> for FrequencyCounter {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counter = Self::new();
        for key in iter {
            counter.add(key);
        }
        counter
    }
}

/// Counts crimes per category.
#[must_use]
pub fn count_categories(crimes: &[CrimeRecord]) -> FrequencyCounter {
    crimes.iter().map(|c| c.category.as_str()).collect()
}

/// Builds [`AreaStatistics`] for `crimes`.
///
/// Months are ordered by descending string comparison, which is
/// reverse-chronological only for `YYYY-MM` values. Records without an
/// outcome do not contribute to the outcome breakdown.
#[must_use]
pub fn compute_area_statistics(crimes: &[CrimeRecord]) -> AreaStatistics {
    let mut categories = FrequencyCounter::new();
    let mut outcomes = FrequencyCounter::new();
    let mut months = FrequencyCounter::new();

    for crime in crimes {
        categories.add(&crime.category);
        if let Some(outcome) = crime.outcome() {
            outcomes.add(outcome);
        }
        months.add(&crime.month);
    }

    AreaStatistics {
        total_crimes: crimes.len() as u64,
        categories: categories
            .into_sorted_by_count()
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect(),
        outcomes: outcomes
            .into_sorted_by_count()
            .into_iter()
            .map(|(outcome, count)| OutcomeCount { outcome, count })
            .collect(),
        monthly_trends: months
            .into_sorted_by_key_desc()
            .into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use guardian_crime_models::{CrimeLocation, OutcomeStatus, Street};

    use super::*;

    pub fn crime(category: &str, street: &str, month: &str, outcome: Option<&str>) -> CrimeRecord {
        CrimeRecord {
            category: category.to_string(),
            location: CrimeLocation {
                latitude: 51.5,
                longitude: -0.1,
                street: Street {
                    name: street.to_string(),
                },
            },
            month: month.to_string(),
            outcome_status: outcome.map(|o| OutcomeStatus {
                category: o.to_string(),
            }),
        }
    }

    #[test]
    fn empty_input_gives_empty_statistics() {
        let stats = compute_area_statistics(&[]);
        assert_eq!(stats, AreaStatistics::default());
    }

    #[test]
    fn counts_and_sorts_categories_by_frequency() {
        let crimes = vec![
            crime("shoplifting", "A", "2024-01", None),
            crime("burglary", "A", "2024-01", None),
            crime("burglary", "B", "2024-01", None),
            crime("robbery", "C", "2024-01", None),
            crime("burglary", "C", "2024-01", None),
        ];
        let stats = compute_area_statistics(&crimes);
        assert_eq!(stats.total_crimes, 5);
        let cats: Vec<(&str, u64)> = stats
            .categories
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(
            cats,
            vec![("burglary", 3), ("shoplifting", 1), ("robbery", 1)]
        );
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let crimes = vec![
            crime("drugs", "A", "2024-01", None),
            crime("arson", "A", "2024-01", None),
            crime("theft", "A", "2024-01", None),
            crime("arson", "A", "2024-01", None),
            crime("drugs", "A", "2024-01", None),
        ];
        let stats = compute_area_statistics(&crimes);
        let cats: Vec<&str> = stats.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(cats, vec!["drugs", "arson", "theft"]);
    }

    #[test]
    fn outcomes_skip_records_without_status() {
        let crimes = vec![
            crime("burglary", "A", "2024-01", Some("Under investigation")),
            crime("burglary", "A", "2024-01", None),
            crime("burglary", "A", "2024-01", Some("Unable to prosecute suspect")),
            crime("burglary", "A", "2024-01", Some("Unable to prosecute suspect")),
        ];
        let stats = compute_area_statistics(&crimes);
        assert_eq!(
            stats.outcomes,
            vec![
                OutcomeCount {
                    outcome: "Unable to prosecute suspect".to_string(),
                    count: 2,
                },
                OutcomeCount {
                    outcome: "Under investigation".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn months_sort_most_recent_first() {
        let crimes = vec![
            crime("burglary", "A", "2023-11", None),
            crime("burglary", "A", "2024-02", None),
            crime("burglary", "A", "2023-12", None),
            crime("burglary", "A", "2024-02", None),
            crime("burglary", "A", "2024-01", None),
        ];
        let stats = compute_area_statistics(&crimes);
        let months: Vec<&str> = stats.monthly_trends.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2024-02", "2024-01", "2023-12", "2023-11"]);
        assert_eq!(stats.monthly_trends[0].count, 2);
    }

    #[test]
    fn breakdowns_are_non_increasing() {
        let categories = ["a", "b", "c", "d", "e"];
        let outcomes = ["x", "y", "z"];
        let crimes: Vec<CrimeRecord> = (0..60_usize)
            .map(|i| {
                crime(
                    categories[(i * i + 3 * i) % categories.len()],
                    "S",
                    &format!("2023-{:02}", i % 12 + 1),
                    (i % 4 != 0).then(|| outcomes[(i * 7) % outcomes.len()]),
                )
            })
            .collect();

        let stats = compute_area_statistics(&crimes);

        assert_eq!(stats.total_crimes, 60);
        assert!(stats.categories.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(stats.outcomes.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(stats.monthly_trends.windows(2).all(|w| w[0].month >= w[1].month));
        assert_eq!(
            stats.categories.iter().map(|c| c.count).sum::<u64>(),
            stats.total_crimes
        );
    }

    #[test]
    fn counter_reports_zero_for_unknown_keys() {
        let counter: FrequencyCounter = ["a", "b", "a"].into_iter().collect();
        assert_eq!(counter.get("a"), 2);
        assert_eq!(counter.get("b"), 1);
        assert_eq!(counter.get("c"), 0);
        assert_eq!(counter.total(), 3);
        assert_eq!(counter.iter().collect::<Vec<_>>(), vec![("a", 2), ("b", 1)]);
    }
}
