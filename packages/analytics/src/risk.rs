//! Per-incident risk bands and category safety tips.

use guardian_crime_models::{CrimeRecord, RiskLevel};

use crate::aggregate::{FrequencyCounter, count_categories};

/// Share (percent) of all incidents above which a category is `Danger`.
pub const DANGER_SHARE_PERCENT: f64 = 20.0;

/// Share (percent) of all incidents above which a category is `Caution`.
pub const CAUTION_SHARE_PERCENT: f64 = 10.0;

/// Category frequencies for an area, used to band individual incidents.
#[derive(Debug, Clone)]
pub struct RiskProfile {
    counts: FrequencyCounter,
    total: u64,
}

impl RiskProfile {
    /// Builds a profile from every incident in the area.
    #[must_use]
    pub fn new(crimes: &[CrimeRecord]) -> Self {
        let counts = count_categories(crimes);
        let total = counts.total();
        Self { counts, total }
    }

    /// Risk band for incidents of `category`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn level_for(&self, category: &str) -> RiskLevel {
        if self.total == 0 {
            return RiskLevel::Safe;
        }
        let share = self.counts.get(category) as f64 / self.total as f64 * 100.0;
        if share > DANGER_SHARE_PERCENT {
            RiskLevel::Danger
        } else if share > CAUTION_SHARE_PERCENT {
            RiskLevel::Caution
        } else {
            RiskLevel::Safe
        }
    }
}

/// Risk band of `crime` relative to `all` incidents in its area.
#[must_use]
pub fn risk_level(crime: &CrimeRecord, all: &[CrimeRecord]) -> RiskLevel {
    RiskProfile::new(all).level_for(&crime.category)
}

/// Safety tip shown alongside an incident of `category`.
#[must_use]
pub fn safety_tip(category: &str) -> &'static str {
    match category {
        "anti-social-behaviour" => "Stay in well-lit areas and travel in groups when possible.",
        "burglary" => {
            "Ensure your property is well-secured and consider installing security cameras."
        }
        "robbery" => "Stay alert and avoid displaying valuable items in public.",
        "vehicle-crime" => "Park in well-lit areas and don't leave valuables visible in your car.",
        "violent-crime" => "Avoid known trouble spots and stay aware of your surroundings.",
        _ => "Stay vigilant and report any suspicious activity to authorities.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::crime;

    fn area(mix: &[(&str, usize)]) -> Vec<CrimeRecord> {
        mix.iter()
            .flat_map(|&(category, n)| (0..n).map(move |_| crime(category, "S", "2024-01", None)))
            .collect()
    }

    #[test]
    fn bands_by_category_share() {
        // 30% / 15% / 10% / 45%
        let crimes = area(&[("burglary", 6), ("robbery", 3), ("drugs", 2), ("other-theft", 9)]);
        let profile = RiskProfile::new(&crimes);
        assert_eq!(profile.level_for("burglary"), RiskLevel::Danger);
        assert_eq!(profile.level_for("robbery"), RiskLevel::Caution);
        assert_eq!(profile.level_for("drugs"), RiskLevel::Safe);
        assert_eq!(profile.level_for("other-theft"), RiskLevel::Danger);
    }

    #[test]
    fn exactly_twenty_percent_is_caution() {
        let crimes = area(&[("burglary", 1), ("shoplifting", 4)]);
        assert_eq!(risk_level(&crimes[0], &crimes), RiskLevel::Caution);
    }

    #[test]
    fn empty_area_is_safe() {
        let profile = RiskProfile::new(&[]);
        assert_eq!(profile.level_for("burglary"), RiskLevel::Safe);
    }

    #[test]
    fn unknown_category_uses_general_tip() {
        assert_eq!(safety_tip("bicycle-theft"), safety_tip("other-crime"));
        assert_ne!(safety_tip("burglary"), safety_tip("other-crime"));
    }
}
