//! Plain-text rendering of session results.

use guardian_analytics::risk::safety_tip;
use guardian_crime_models::{AreaStatistics, RiskLevel, RouteAdvisory, category_label};
use guardian_session::{DATA_UNAVAILABLE_NOTICE, DataAvailability, SessionSnapshot};

/// Incidents listed before the rest are summarized as a count.
const MAX_LISTED_CRIMES: usize = 20;

const TOP_CATEGORIES: usize = 5;
const RECENT_MONTHS: usize = 3;
const TOP_OUTCOMES: usize = 5;

const fn risk_marker(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Safe => "[safe]   ",
        RiskLevel::Caution => "[caution]",
        RiskLevel::Danger => "[danger] ",
    }
}

pub fn print_search(snapshot: &SessionSnapshot) {
    if let Some(summary) = snapshot.summary() {
        println!("{summary}");
    }
    println!("Map centre: {}", snapshot.center);
    if snapshot.availability == DataAvailability::Unavailable {
        println!("{DATA_UNAVAILABLE_NOTICE}");
        return;
    }
    println!();

    for crime in snapshot.crimes.iter().take(MAX_LISTED_CRIMES) {
        println!(
            "{} {:<28} {} ({})",
            risk_marker(snapshot.risk_level(crime)),
            category_label(&crime.category),
            crime.street_name(),
            crime.month,
        );
        println!("            Outcome: {}", crime.outcome_label());
        println!("            Tip: {}", safety_tip(&crime.category));
    }
    if snapshot.crimes.len() > MAX_LISTED_CRIMES {
        println!("... and {} more", snapshot.crimes.len() - MAX_LISTED_CRIMES);
    }

    if let Some(stats) = &snapshot.statistics {
        println!();
        print_statistics(stats);
    }
}

pub fn print_statistics(stats: &AreaStatistics) {
    println!("Area statistics ({} crimes)", stats.total_crimes);

    println!("  Top categories:");
    for c in stats.top_categories(TOP_CATEGORIES) {
        println!("    {:<30} {}", category_label(&c.category), c.count);
    }

    println!("  Recent months:");
    for m in stats.recent_months(RECENT_MONTHS) {
        println!("    {:<30} {}", m.month, m.count);
    }

    println!("  Outcomes:");
    for o in stats.top_outcomes(TOP_OUTCOMES) {
        println!("    {:<30} {}", o.outcome, o.count);
    }
}

fn advisory_intro(crime_count: usize) -> String {
    format!("Based on {crime_count} recent incidents in this area")
}

pub fn print_advisory(advisory: &RouteAdvisory, crime_count: usize) {
    println!("Safe route recommendations");
    println!("{}", advisory_intro(crime_count));

    if advisory.avoid_areas.is_empty() {
        println!("  No high-crime streets to avoid.");
    } else {
        println!("  Areas to avoid:");
        for area in &advisory.avoid_areas {
            println!("    - {area}");
        }
    }

    println!("  Safer travel times:");
    for window in &advisory.safe_times {
        println!("    - {window}");
    }

    println!("  Recommendations:");
    for tip in &advisory.recommendations {
        println!("    - {tip}");
    }
}
