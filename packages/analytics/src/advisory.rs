//! Rule-based "safe route" advice.
//!
//! No path is computed. The advice is a fixed set of tips plus the
//! streets where high-frequency categories were reported.

use std::collections::HashSet;

use guardian_crime_models::{CrimeRecord, PLACEHOLDER_STREET_NAME, RouteAdvisory};

use crate::aggregate::count_categories;

/// A category is "high-crime" when it has more incidents than this.
pub const HIGH_CRIME_THRESHOLD: u64 = 5;

/// Maximum number of streets listed in [`RouteAdvisory::avoid_areas`].
pub const MAX_AVOID_AREAS: usize = 5;

/// Category-specific tips are added when the category has more incidents
/// than this.
pub const CATEGORY_TIP_THRESHOLD: u64 = 3;

/// Suggested travel windows. police.uk has no time-of-day data, so these
/// are static.
pub const SAFE_TIMES: [&str; 3] = ["06:00-09:00", "12:00-14:00", "16:00-18:00"];

/// Tips included in every advisory.
pub const BASE_RECOMMENDATIONS: [&str; 5] = [
    "Stick to well-lit main roads when possible",
    "Travel in groups, especially during evening hours",
    "Stay alert and aware of your surroundings",
    "Keep valuables out of sight",
    "Use main transportation routes rather than back streets",
];

/// Added when `vehicle-crime` exceeds [`CATEGORY_TIP_THRESHOLD`].
pub const VEHICLE_CRIME_TIP: &str = "Use secure parking areas and remove all items from vehicle";

/// Added when `burglary` exceeds [`CATEGORY_TIP_THRESHOLD`].
pub const BURGLARY_TIP: &str = "Ensure properties are well-secured before leaving";

/// Builds a [`RouteAdvisory`] from `crimes`. Never fails; an empty input
/// yields no avoid-areas and only the base tips.
#[must_use]
pub fn generate_safe_route_recommendations(crimes: &[CrimeRecord]) -> RouteAdvisory {
    let counts = count_categories(crimes);

    let high_crime: HashSet<&str> = counts
        .iter()
        .filter(|&(_, n)| n > HIGH_CRIME_THRESHOLD)
        .map(|(category, _)| category)
        .collect();

    let mut seen = HashSet::new();
    let avoid_areas: Vec<String> = crimes
        .iter()
        .filter(|c| high_crime.contains(c.category.as_str()))
        .map(CrimeRecord::street_name)
        .filter(|name| !name.is_empty() && *name != PLACEHOLDER_STREET_NAME)
        .filter(|name| seen.insert(*name))
        .take(MAX_AVOID_AREAS)
        .map(String::from)
        .collect();

    let mut recommendations: Vec<String> =
        BASE_RECOMMENDATIONS.iter().map(|s| (*s).to_string()).collect();

    if counts.get("vehicle-crime") > CATEGORY_TIP_THRESHOLD {
        recommendations.push(VEHICLE_CRIME_TIP.to_string());
    }

    if counts.get("burglary") > CATEGORY_TIP_THRESHOLD {
        recommendations.push(BURGLARY_TIP.to_string());
    }

    RouteAdvisory {
        avoid_areas,
        safe_times: SAFE_TIMES.iter().map(|s| (*s).to_string()).collect(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::crime;

    fn repeat(n: usize, category: &str, street: &str) -> Vec<CrimeRecord> {
        (0..n).map(|_| crime(category, street, "2024-01", None)).collect()
    }

    #[test]
    fn empty_input_gives_base_advice() {
        let advisory = generate_safe_route_recommendations(&[]);
        assert!(advisory.avoid_areas.is_empty());
        assert_eq!(advisory.safe_times, SAFE_TIMES);
        assert_eq!(advisory.recommendations, BASE_RECOMMENDATIONS);
    }

    #[test]
    fn high_street_and_elm_road_example() {
        let mut crimes = repeat(6, "vehicle-crime", "High Street");
        crimes.extend(repeat(6, "burglary", "Elm Road"));

        let advisory = generate_safe_route_recommendations(&crimes);

        assert_eq!(advisory.avoid_areas, vec!["High Street", "Elm Road"]);
        assert!(advisory.recommendations.contains(&VEHICLE_CRIME_TIP.to_string()));
        assert!(advisory.recommendations.contains(&BURGLARY_TIP.to_string()));
        assert_eq!(advisory.recommendations.len(), BASE_RECOMMENDATIONS.len() + 2);
    }

    #[test]
    fn threshold_is_strictly_greater_than_five() {
        let crimes = repeat(5, "robbery", "Mill Lane");
        assert!(generate_safe_route_recommendations(&crimes).avoid_areas.is_empty());

        let crimes = repeat(6, "robbery", "Mill Lane");
        assert_eq!(
            generate_safe_route_recommendations(&crimes).avoid_areas,
            vec!["Mill Lane"]
        );
    }

    #[test]
    fn only_high_crime_categories_contribute_streets() {
        let mut crimes = repeat(6, "anti-social-behaviour", "Station Road");
        crimes.extend(repeat(2, "shoplifting", "Market Square"));

        let advisory = generate_safe_route_recommendations(&crimes);

        assert_eq!(advisory.avoid_areas, vec!["Station Road"]);
    }

    #[test]
    fn skips_empty_and_placeholder_street_names() {
        let mut crimes = repeat(3, "violent-crime", "");
        crimes.extend(repeat(3, "violent-crime", PLACEHOLDER_STREET_NAME));
        crimes.extend(repeat(1, "violent-crime", "On or near Park Lane"));

        let advisory = generate_safe_route_recommendations(&crimes);

        assert_eq!(advisory.avoid_areas, vec!["On or near Park Lane"]);
    }

    #[test]
    fn avoid_areas_capped_at_five_in_first_seen_order() {
        let streets = ["A Road", "B Road", "C Road", "D Road", "E Road", "F Road", "G Road"];
        let crimes: Vec<CrimeRecord> = streets
            .iter()
            .chain(streets.iter())
            .map(|s| crime("violent-crime", s, "2024-01", None))
            .collect();

        let advisory = generate_safe_route_recommendations(&crimes);

        assert_eq!(
            advisory.avoid_areas,
            vec!["A Road", "B Road", "C Road", "D Road", "E Road"]
        );
    }

    #[test]
    fn avoid_areas_have_no_duplicates() {
        let mut crimes = Vec::new();
        for street in ["X Street", "Y Street", "X Street", "Z Street", "Y Street", "X Street"] {
            crimes.push(crime("burglary", street, "2024-01", None));
        }
        let advisory = generate_safe_route_recommendations(&crimes);
        assert_eq!(advisory.avoid_areas, vec!["X Street", "Y Street", "Z Street"]);
    }

    #[test]
    fn category_tips_follow_counts_exactly() {
        for n in 0..8 {
            let crimes = repeat(n, "vehicle-crime", "Some Street");
            let advisory = generate_safe_route_recommendations(&crimes);
            let occurrences = advisory
                .recommendations
                .iter()
                .filter(|r| *r == VEHICLE_CRIME_TIP)
                .count();
            assert_eq!(occurrences, usize::from(n > 3), "vehicle-crime count {n}");
            assert!(!advisory.recommendations.contains(&BURGLARY_TIP.to_string()));
        }
    }

    #[test]
    fn burglary_tip_follows_counts_exactly() {
        for n in 0..8 {
            let crimes = repeat(n, "burglary", "Some Street");
            let advisory = generate_safe_route_recommendations(&crimes);
            let occurrences = advisory
                .recommendations
                .iter()
                .filter(|r| *r == BURGLARY_TIP)
                .count();
            assert_eq!(occurrences, usize::from(n > 3), "burglary count {n}");
            assert!(!advisory.recommendations.contains(&VEHICLE_CRIME_TIP.to_string()));
        }
    }

    #[test]
    fn safe_times_are_constant() {
        let crimes = repeat(40, "burglary", "Elm Road");
        assert_eq!(
            generate_safe_route_recommendations(&crimes).safe_times,
            vec!["06:00-09:00", "12:00-14:00", "16:00-18:00"]
        );
    }
}
