use super::types::SurveySummary;

const FEATURED_NAMES: [&str; 2] = ["kepuasan masyarakat", "kepuasan layanan"];

pub const DEFAULT_SUMMARY_DESCRIPTION: &str = "Click to fill in this survey";

/// The public-satisfaction survey promoted above the list, if one exists.
pub fn featured(surveys: &[SurveySummary]) -> Option<&SurveySummary> {
    FEATURED_NAMES.iter().find_map(|needle| {
        surveys
            .iter()
            .find(|s| s.name.to_lowercase().contains(needle))
    })
}

pub fn summary_description(survey: &SurveySummary) -> &str {
    survey
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_SUMMARY_DESCRIPTION)
}
