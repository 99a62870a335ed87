//! Narrative text templates and placeholder filling

pub(crate) const AGREEMENT_HEADLINES: &[&str] = &[
    "Models agree on {condition} through {end_day}",
    "Consistent {condition} expected through {end_day}",
];

pub(crate) const DISAGREEMENT_TEMPERATURE_HEADLINES: &[&str] = &[
    "Models disagree on temperatures for {day}",
    "Temperature outlook for {day} is split between models",
];

pub(crate) const DISAGREEMENT_PRECIPITATION_HEADLINES: &[&str] = &[
    "Models split on precipitation for {day}",
    "Precipitation for {day} remains uncertain",
];

pub(crate) const DISAGREEMENT_GENERAL_HEADLINES: &[&str] = &[
    "Forecast uncertain as models diverge",
    "Models offer mixed signals for the days ahead",
];

pub(crate) const TRANSITION_ARRIVING_HEADLINES: &[&str] = &[
    "{condition} arriving {day} {period}",
    "{condition} moving in {day} {period}",
];

pub(crate) const TRANSITION_CLEARING_HEADLINES: &[&str] = &[
    "{condition} clearing by {day}",
    "Drier weather returns by {day}",
];

pub(crate) const NO_DATA_HEADLINE: &str = "Not enough model data for a consensus outlook";

pub(crate) const AGREEMENT_TEMPERATURE_BODY: &str =
    "Daytime highs between {low}°C and {high}°C.";
pub(crate) const TEMPERATURE_SPREAD_BODY: &str =
    "Forecast highs for {day} range from {min}°C to {max}°C across models.";
pub(crate) const PRECIPITATION_SPREAD_BODY: &str =
    "Precipitation totals for {day} range from {min} mm to {max} mm across models.";
pub(crate) const HIGH_CONFIDENCE_BODY: &str = "Forecast confidence is high.";
pub(crate) const MEDIUM_CONFIDENCE_BODY: &str = "Forecast confidence is moderate.";
pub(crate) const LOW_CONFIDENCE_BODY: &str = "Forecast confidence is low.";

pub(crate) const UNCERTAINTY_ALERT: &str =
    "Forecasts {horizon} or more days out carry greater uncertainty.";
pub(crate) const LOW_CONFIDENCE_ALERT: &str =
    "Low model agreement: treat this forecast with caution.";

pub(crate) const WARMER_NOTE: &str = "{model} runs {difference}°C warmer than consensus {day}.";
pub(crate) const COOLER_NOTE: &str = "{model} runs {difference}°C cooler than consensus {day}.";
pub(crate) const WETTER_NOTE: &str =
    "{model} is wetter than consensus {day} ({value} mm vs {mean} mm).";
pub(crate) const DRIER_NOTE: &str =
    "{model} is drier than consensus {day} ({value} mm vs {mean} mm).";

/// Pick the template to use from a set of variants.
///
/// Always the first one, so the same forecast always reads the same.
#[must_use]
pub fn select_template(templates: &[&'static str]) -> &'static str {
    templates.first().copied().unwrap_or_default()
}

/// Replace every `{name}` with its value.
///
/// Placeholders without a value, and braces that do not form a placeholder,
/// are copied through unchanged.
#[must_use]
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) => {
                let name = &after_open[..close];
                match values.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => filled.push_str(value),
                    None => filled.push_str(&rest[open..open + close + 2]),
                }
                rest = &after_open[close + 1..];
            }
            None => {
                filled.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    filled.push_str(rest);
    filled
}

/// Uppercase the first character
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
