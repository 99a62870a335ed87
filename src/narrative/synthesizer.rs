//! Narrative synthesizer
//!
//! Turns an aggregated forecast into a headline, a body, alerts and notes on
//! models that stray from the consensus. Text comes from fixed templates and
//! the same input always yields the same narrative.

use super::classify::{NarrativeType, classify};
use super::templates::{
    AGREEMENT_HEADLINES, AGREEMENT_TEMPERATURE_BODY, COOLER_NOTE, DISAGREEMENT_GENERAL_HEADLINES,
    DISAGREEMENT_PRECIPITATION_HEADLINES, DISAGREEMENT_TEMPERATURE_HEADLINES, DRIER_NOTE,
    HIGH_CONFIDENCE_BODY, LOW_CONFIDENCE_ALERT, LOW_CONFIDENCE_BODY, MEDIUM_CONFIDENCE_BODY,
    NO_DATA_HEADLINE, PRECIPITATION_SPREAD_BODY, TEMPERATURE_SPREAD_BODY,
    TRANSITION_ARRIVING_HEADLINES, TRANSITION_CLEARING_HEADLINES, UNCERTAINTY_ALERT, WARMER_NOTE,
    WETTER_NOTE, capitalize, fill_template, select_template,
};
use crate::config::NarrativeSettings;
use crate::consensus::confidence::average_score;
use crate::models::{
    AggregatedDailyForecast, AggregatedForecast, ConditionCategory, ConfidenceLevel,
    ConfidenceTier, WeatherCode,
};
use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Z-score above which a model gets a note
const MODEL_NOTE_Z_THRESHOLD: f64 = 2.0;
/// First-day temperature spread (°C) that makes temperature the headline disagreement
const TEMPERATURE_DISAGREEMENT_SPREAD: f64 = 3.0;
/// First-day precipitation spread (mm) that makes precipitation the headline disagreement
const PRECIPITATION_DISAGREEMENT_SPREAD: f64 = 2.0;

/// Human-readable summary of an aggregated forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeSummary {
    pub headline: String,
    pub body: String,
    pub alerts: Vec<String>,
    pub model_notes: Vec<String>,
}

/// Builds narratives with a fixed set of settings
#[derive(Debug, Clone, Copy, Default)]
pub struct NarrativeBuilder {
    settings: NarrativeSettings,
}

impl NarrativeBuilder {
    #[must_use]
    pub fn new(settings: NarrativeSettings) -> Self {
        Self { settings }
    }

    /// Average confidence used for classification: the mean of the supplied
    /// list, or the forecast's overall confidence when no list is given
    #[must_use]
    pub fn average_confidence(
        forecast: &AggregatedForecast,
        confidences: Option<&[ConfidenceLevel]>,
    ) -> f64 {
        confidences
            .and_then(average_score)
            .unwrap_or_else(|| forecast.overall_confidence.score())
    }

    #[must_use]
    pub fn classify(
        &self,
        forecast: &AggregatedForecast,
        confidences: Option<&[ConfidenceLevel]>,
    ) -> NarrativeType {
        classify(
            forecast,
            Self::average_confidence(forecast, confidences),
            self.settings.low_confidence_threshold,
        )
    }

    /// Build the narrative for a forecast and its per-period confidences
    #[instrument(skip_all, fields(days = forecast.daily().len()))]
    #[must_use]
    pub fn build(
        &self,
        forecast: &AggregatedForecast,
        confidences: Option<&[ConfidenceLevel]>,
    ) -> NarrativeSummary {
        let average = Self::average_confidence(forecast, confidences);
        let kind = classify(forecast, average, self.settings.low_confidence_threshold);
        debug!(%kind, average_confidence = average, "Classified forecast narrative");

        let reference = forecast.generated_at.date_naive();
        let headline = match kind {
            NarrativeType::Agreement => agreement_headline(forecast, reference),
            NarrativeType::Disagreement => disagreement_headline(forecast, reference),
            NarrativeType::Transition => transition_headline(forecast, reference),
        };

        NarrativeSummary {
            headline,
            body: self.body(forecast, kind, confidences.map(|_| average), reference),
            alerts: self.alerts(forecast, average, reference),
            model_notes: model_notes(forecast, reference),
        }
    }

    fn body(
        &self,
        forecast: &AggregatedForecast,
        kind: NarrativeType,
        average_confidence: Option<f64>,
        reference: NaiveDate,
    ) -> String {
        let mut sentences = Vec::new();

        match kind {
            NarrativeType::Agreement => {
                if let Some(sentence) = agreement_temperature_sentence(forecast) {
                    sentences.push(sentence);
                }
            }
            NarrativeType::Disagreement => {
                let first = forecast.daily().first();
                if let Some(first) = first.filter(|day| day.ranges.temperature_max.spread() > 0.0) {
                    let range = first.ranges.temperature_max;
                    sentences.push(fill_template(
                        TEMPERATURE_SPREAD_BODY,
                        &[
                            ("day", &day_label(first.date, reference)),
                            ("min", &format!("{:.0}", range.min)),
                            ("max", &format!("{:.0}", range.max)),
                        ],
                    ));
                }
            }
            NarrativeType::Transition => {
                let changed = first_changed_day(forecast.daily());
                if let Some(day) = changed.filter(|day| day.ranges.precipitation.spread() > 0.0) {
                    let range = day.ranges.precipitation;
                    sentences.push(fill_template(
                        PRECIPITATION_SPREAD_BODY,
                        &[
                            ("day", &day_label(day.date, reference)),
                            ("min", &format!("{:.1}", range.min)),
                            ("max", &format!("{:.1}", range.max)),
                        ],
                    ));
                }
            }
        }

        if let Some(average) = average_confidence {
            let sentence = match ConfidenceTier::for_score(average) {
                ConfidenceTier::High => HIGH_CONFIDENCE_BODY,
                ConfidenceTier::Medium => MEDIUM_CONFIDENCE_BODY,
                ConfidenceTier::Low => LOW_CONFIDENCE_BODY,
            };
            sentences.push(sentence.to_string());
        }

        sentences.join(" ")
    }

    fn alerts(
        &self,
        forecast: &AggregatedForecast,
        average_confidence: f64,
        reference: NaiveDate,
    ) -> Vec<String> {
        let mut alerts = Vec::new();

        if let Some(last) = forecast.daily().last() {
            let lead_days = (last.date - reference).num_days();
            if lead_days >= i64::from(self.settings.uncertainty_horizon_days) {
                alerts.push(fill_template(
                    UNCERTAINTY_ALERT,
                    &[("horizon", &self.settings.uncertainty_horizon_days.to_string())],
                ));
            }
        }

        if average_confidence < self.settings.low_confidence_threshold {
            alerts.push(LOW_CONFIDENCE_ALERT.to_string());
        }

        alerts
    }
}

/// Build a narrative with the default settings
#[must_use]
pub fn build_narrative(
    forecast: &AggregatedForecast,
    confidences: Option<&[ConfidenceLevel]>,
) -> NarrativeSummary {
    NarrativeBuilder::default().build(forecast, confidences)
}

fn agreement_headline(forecast: &AggregatedForecast, reference: NaiveDate) -> String {
    let (codes, end_day) = if let Some(last) = forecast.daily().last() {
        let codes: Vec<WeatherCode> = forecast
            .daily()
            .iter()
            .map(|day| day.forecast.weather_code)
            .collect();
        (codes, day_label(last.date, reference))
    } else if let Some(last) = forecast.hourly().last() {
        let codes: Vec<WeatherCode> = forecast
            .hourly()
            .iter()
            .map(|hour| hour.metrics.weather_code)
            .collect();
        (codes, day_label(last.timestamp.date_naive(), reference))
    } else {
        return NO_DATA_HEADLINE.to_string();
    };

    let Some(condition) = dominant_condition(&codes) else {
        return NO_DATA_HEADLINE.to_string();
    };

    fill_template(
        select_template(AGREEMENT_HEADLINES),
        &[("condition", condition.phrase()), ("end_day", &end_day)],
    )
}

fn disagreement_headline(forecast: &AggregatedForecast, reference: NaiveDate) -> String {
    let Some(first) = forecast.daily().first() else {
        return select_template(DISAGREEMENT_GENERAL_HEADLINES).to_string();
    };
    let day = day_label(first.date, reference);

    let templates = if first.consensus.temperature.range >= TEMPERATURE_DISAGREEMENT_SPREAD {
        DISAGREEMENT_TEMPERATURE_HEADLINES
    } else if first.consensus.precipitation.range >= PRECIPITATION_DISAGREEMENT_SPREAD {
        DISAGREEMENT_PRECIPITATION_HEADLINES
    } else {
        DISAGREEMENT_GENERAL_HEADLINES
    };

    fill_template(select_template(templates), &[("day", &day)])
}

fn transition_headline(forecast: &AggregatedForecast, reference: NaiveDate) -> String {
    let daily = forecast.daily();
    let (Some(first), Some(changed)) = (daily.first(), first_changed_day(daily)) else {
        return agreement_headline(forecast, reference);
    };
    let day = day_label(changed.date, reference);

    if first.forecast.weather_code.is_wet() {
        let condition = capitalize(first.forecast.weather_code.category().phrase());
        fill_template(
            select_template(TRANSITION_CLEARING_HEADLINES),
            &[("condition", &condition), ("day", &day)],
        )
    } else {
        let condition = capitalize(changed.forecast.weather_code.category().phrase());
        let period = wet_period(forecast, changed.date).unwrap_or_default();
        fill_template(
            select_template(TRANSITION_ARRIVING_HEADLINES),
            &[("condition", &condition), ("day", &day), ("period", period)],
        )
        .trim_end()
        .to_string()
    }
}

fn agreement_temperature_sentence(forecast: &AggregatedForecast) -> Option<String> {
    let highs: Vec<f64> = forecast
        .daily()
        .iter()
        .map(|day| day.forecast.temperature_max.value())
        .collect();
    if highs.is_empty() {
        return None;
    }
    let low = highs.iter().copied().fold(f64::INFINITY, f64::min);
    let high = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(fill_template(
        AGREEMENT_TEMPERATURE_BODY,
        &[
            ("low", &format!("{low:.0}")),
            ("high", &format!("{high:.0}")),
        ],
    ))
}

/// Notes on every outlier model whose temperature or precipitation z-score
/// exceeds the note threshold, day by day
fn model_notes(forecast: &AggregatedForecast, reference: NaiveDate) -> Vec<String> {
    let mut notes = Vec::new();

    for day in forecast.daily() {
        let label = day_phrase(day.date, reference);
        for model in &day.consensus.outlier_models {
            let Some(reading) = forecast
                .model_forecast(model)
                .and_then(|model_forecast| model_forecast.daily_on(day.date))
            else {
                continue;
            };
            let name = model.display_name();

            let temperature = reading.temperature_max.value();
            let z = day.consensus.temperature.z_score(temperature);
            if z.abs() > MODEL_NOTE_Z_THRESHOLD {
                let template = if z > 0.0 { WARMER_NOTE } else { COOLER_NOTE };
                let difference = (temperature - day.consensus.temperature.mean).abs();
                notes.push(fill_template(
                    template,
                    &[
                        ("model", name),
                        ("difference", &format!("{difference:.1}")),
                        ("day", &label),
                    ],
                ));
            }

            let precipitation = reading.precipitation_sum.value();
            let z = day.consensus.precipitation.z_score(precipitation);
            if z.abs() > MODEL_NOTE_Z_THRESHOLD {
                let template = if z > 0.0 { WETTER_NOTE } else { DRIER_NOTE };
                notes.push(fill_template(
                    template,
                    &[
                        ("model", name),
                        ("day", &label),
                        ("value", &format!("{precipitation:.1}")),
                        ("mean", &format!("{:.1}", day.consensus.precipitation.mean)),
                    ],
                ));
            }
        }
    }

    notes
}

/// First day whose dry/wet state differs from the first day
fn first_changed_day(daily: &[AggregatedDailyForecast]) -> Option<&AggregatedDailyForecast> {
    let first_wet = daily.first()?.forecast.weather_code.is_wet();
    daily
        .iter()
        .skip(1)
        .find(|day| day.forecast.weather_code.is_wet() != first_wet)
}

/// Most frequent condition; ties go to the condition seen first
fn dominant_condition(codes: &[WeatherCode]) -> Option<ConditionCategory> {
    let mut counts: HashMap<ConditionCategory, usize> = HashMap::new();
    let mut order: Vec<ConditionCategory> = Vec::new();
    for code in codes {
        let category = code.category();
        let count = counts.entry(category).or_insert(0);
        if *count == 0 {
            order.push(category);
        }
        *count += 1;
    }

    let mut best: Option<(ConditionCategory, usize)> = None;
    for category in order {
        let count = counts[&category];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category)
}

/// Part of the day in which the first wet hour of `date` falls
fn wet_period(forecast: &AggregatedForecast, date: NaiveDate) -> Option<&'static str> {
    forecast
        .hourly()
        .iter()
        .find(|hour| hour.timestamp.date_naive() == date && hour.metrics.weather_code.is_wet())
        .map(|hour| match hour.timestamp.hour() {
            5..=11 => "morning",
            12..=16 => "afternoon",
            17..=20 => "evening",
            _ => "overnight",
        })
}

/// Day label usable after a noun: "today", "tomorrow" or "on Thursday"
fn day_phrase(date: NaiveDate, reference: NaiveDate) -> String {
    match (date - reference).num_days() {
        0 | 1 => day_label(date, reference),
        _ => format!("on {}", weekday_name(date.weekday())),
    }
}

/// "today", "tomorrow" or the weekday name, relative to `reference`
fn day_label(date: NaiveDate, reference: NaiveDate) -> String {
    match (date - reference).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        _ => weekday_name(date.weekday()).to_string(),
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::aggregate;
    use crate::models::{
        Coordinates, DailyForecast, ForecastModel, HourlyReading, ModelForecast, WeatherMetrics,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Generation time: Monday 2024-06-03 00:00 UTC
    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()
    }

    /// A model forecast with one daily entry per `(high, precipitation, code)`
    fn model(model: ForecastModel, days: &[(f64, f64, u8)]) -> ModelForecast {
        let start = generated_at();
        ModelForecast {
            model,
            coordinates: Coordinates::new(52.5, 13.4),
            generated_at: start,
            valid_from: start,
            valid_to: start + Duration::days(days.len() as i64),
            hourly: Vec::new(),
            daily: days
                .iter()
                .enumerate()
                .map(|(offset, &(high, precipitation, code))| {
                    DailyForecast::basic(
                        start.date_naive() + Duration::days(offset as i64),
                        high,
                        high - 8.0,
                        precipitation,
                        5.0,
                        code,
                    )
                    .unwrap()
                })
                .collect(),
        }
    }

    fn levels(scores: &[f64]) -> Vec<ConfidenceLevel> {
        scores
            .iter()
            .map(|score| ConfidenceLevel::from_score(*score).unwrap())
            .collect()
    }

    const MODELS: [ForecastModel; 3] = [ForecastModel::Ecmwf, ForecastModel::Gfs, ForecastModel::Icon];

    fn consensus_of(days: &[(f64, f64, u8)]) -> AggregatedForecast {
        aggregate(MODELS.into_iter().map(|m| model(m, days)).collect()).unwrap()
    }

    #[test]
    fn test_agreement_headline() {
        let forecast = consensus_of(&[(22.0, 0.0, 0), (23.0, 0.0, 1), (21.0, 0.0, 3)]);
        let narrative = build_narrative(&forecast, Some(levels(&[0.9, 0.9, 0.9]).as_slice()));

        // Mon, Tue, Wed: two clear days and one cloudy day
        assert_eq!(narrative.headline, "Models agree on clear skies through Wednesday");
        assert_eq!(
            narrative.body,
            "Daytime highs between 21°C and 23°C. Forecast confidence is high."
        );
        assert!(narrative.alerts.is_empty());
        assert!(narrative.model_notes.is_empty());
    }

    #[test]
    fn test_low_confidence_is_disagreement_regardless_of_weather() {
        let forecast = consensus_of(&[(22.0, 0.0, 0), (18.0, 8.0, 63)]);
        let confidences = levels(&[0.3, 0.3]);
        let builder = NarrativeBuilder::default();

        assert_eq!(
            builder.classify(&forecast, Some(confidences.as_slice())),
            NarrativeType::Disagreement
        );
        let narrative = builder.build(&forecast, Some(confidences.as_slice()));
        assert_eq!(narrative.headline, "Forecast uncertain as models diverge");
        assert!(narrative.body.ends_with("Forecast confidence is low."));
        assert!(narrative.alerts.contains(&LOW_CONFIDENCE_ALERT.to_string()));
    }

    #[test]
    fn test_disagreement_headline_on_temperature_spread() {
        let forecast = aggregate(vec![
            model(ForecastModel::Ecmwf, &[(18.0, 0.0, 0)]),
            model(ForecastModel::Gfs, &[(24.0, 0.0, 0)]),
            model(ForecastModel::Icon, &[(21.0, 0.0, 0)]),
        ])
        .unwrap();
        let narrative = build_narrative(&forecast, Some(levels(&[0.2]).as_slice()));

        assert_eq!(narrative.headline, "Models disagree on temperatures for today");
        assert!(narrative
            .body
            .starts_with("Forecast highs for today range from 18°C to 24°C across models."));
    }

    #[test]
    fn test_disagreement_headline_on_precipitation_spread() {
        let forecast = aggregate(vec![
            model(ForecastModel::Ecmwf, &[(20.0, 0.0, 61)]),
            model(ForecastModel::Gfs, &[(20.0, 6.0, 61)]),
        ])
        .unwrap();
        let narrative = build_narrative(&forecast, Some(levels(&[0.2]).as_slice()));
        assert_eq!(narrative.headline, "Models split on precipitation for today");
    }

    #[test]
    fn test_transition_rain_arriving() {
        let mut forecasts: Vec<ModelForecast> = MODELS
            .into_iter()
            .zip([4.0, 6.0, 8.0])
            .map(|(m, rain)| model(m, &[(22.0, 0.0, 1), (21.0, 0.0, 2), (17.0, rain, 63)]))
            .collect();
        // Rain starts mid-afternoon on Wednesday
        let wet_hour = Utc.with_ymd_and_hms(2024, 6, 5, 14, 0, 0).unwrap();
        for forecast in &mut forecasts {
            forecast.hourly.push(HourlyReading {
                timestamp: wet_hour,
                metrics: WeatherMetrics::basic(17.0, 2.0, 5.0, 63).unwrap(),
            });
        }

        let forecast = aggregate(forecasts).unwrap();
        let builder = NarrativeBuilder::default();
        assert_eq!(builder.classify(&forecast, None), NarrativeType::Transition);

        let narrative = builder.build(&forecast, None);
        assert_eq!(narrative.headline, "Rain arriving Wednesday afternoon");
        assert_eq!(
            narrative.body,
            "Precipitation totals for Wednesday range from 4.0 mm to 8.0 mm across models."
        );
    }

    #[test]
    fn test_transition_body_omits_spread_when_models_match() {
        let forecast = consensus_of(&[(22.0, 0.0, 1), (21.0, 0.0, 2), (17.0, 6.0, 63)]);
        let narrative = build_narrative(&forecast, None);

        assert_eq!(narrative.headline, "Rain arriving Wednesday");
        assert!(narrative.body.is_empty());
    }

    #[test]
    fn test_disagreement_body_omits_spread_when_models_match() {
        let days: Vec<(f64, f64, u8)> = (0..7).map(|_| (20.0, 0.0, 0)).collect();
        let forecast = consensus_of(&days);
        let narrative = build_narrative(&forecast, Some(levels(&[0.3; 7]).as_slice()));

        assert_eq!(narrative.headline, "Forecast uncertain as models diverge");
        assert_eq!(narrative.body, "Forecast confidence is low.");
    }

    #[test]
    fn test_transition_without_hourly_data_drops_period() {
        let forecast = consensus_of(&[(22.0, 0.0, 0), (18.0, 5.0, 61)]);
        let narrative = build_narrative(&forecast, None);
        assert_eq!(narrative.headline, "Rain arriving tomorrow");
    }

    #[test]
    fn test_transition_clearing() {
        let forecast = consensus_of(&[(15.0, 4.0, 61), (16.0, 3.0, 80), (20.0, 0.0, 0)]);
        let narrative = build_narrative(&forecast, Some(levels(&[0.8, 0.8, 0.8]).as_slice()));
        assert_eq!(narrative.headline, "Rain clearing by Wednesday");
    }

    #[test]
    fn test_uncertainty_alert_for_long_range() {
        let days: Vec<(f64, f64, u8)> = (0..7).map(|_| (20.0, 0.0, 0)).collect();
        let forecast = consensus_of(&days);
        let narrative = build_narrative(&forecast, None);

        assert_eq!(
            narrative.alerts,
            vec!["Forecasts 5 or more days out carry greater uncertainty.".to_string()]
        );
        // No confidence list, no confidence sentence
        assert!(!narrative.body.contains("confidence"));
    }

    #[test]
    fn test_model_notes_for_outliers() {
        let mut forecasts: Vec<ModelForecast> = [
            ForecastModel::Ecmwf,
            ForecastModel::Icon,
            ForecastModel::MeteoFrance,
            ForecastModel::Ukmo,
            ForecastModel::Jma,
            ForecastModel::Gem,
            ForecastModel::Other("HRRR".to_string()),
        ]
        .into_iter()
        .map(|m| model(m, &[(20.0, 1.0, 61)]))
        .collect();
        forecasts.push(model(ForecastModel::Gfs, &[(28.0, 1.0, 61)]));

        let forecast = aggregate(forecasts).unwrap();
        assert_eq!(forecast.daily()[0].consensus.outlier_models, vec![ForecastModel::Gfs]);

        let narrative = build_narrative(&forecast, None);
        assert_eq!(
            narrative.model_notes,
            vec!["GFS runs 7.0°C warmer than consensus today.".to_string()]
        );
    }

    #[test]
    fn test_empty_forecast_headline() {
        let mut bare = model(ForecastModel::Icon, &[]);
        bare.daily.clear();
        let forecast = aggregate(vec![bare]).unwrap();
        let narrative = build_narrative(&forecast, Some(&[][..]));

        assert_eq!(narrative.headline, NO_DATA_HEADLINE);
        // Empty list falls back to the neutral overall confidence
        assert_eq!(narrative.body, "Forecast confidence is moderate.");
    }

    #[test]
    fn test_dominant_condition_tie_goes_to_first_seen() {
        let codes = [
            WeatherCode::new(61).unwrap(),
            WeatherCode::new(0).unwrap(),
            WeatherCode::new(0).unwrap(),
            WeatherCode::new(63).unwrap(),
        ];
        assert_eq!(dominant_condition(&codes), Some(ConditionCategory::Rain));
        assert_eq!(dominant_condition(&[]), None);
    }

    #[test]
    fn test_day_labels() {
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(day_label(monday, monday), "today");
        assert_eq!(day_label(monday.succ_opt().unwrap(), monday), "tomorrow");
        assert_eq!(day_label(monday + Duration::days(3), monday), "Thursday");
        assert_eq!(day_phrase(monday, monday), "today");
        assert_eq!(day_phrase(monday + Duration::days(3), monday), "on Thursday");
    }
}
