//! Undercut Dash: a Yew front end for an undercut prediction API.
//!
//! The library half holds everything that does not need a browser: the wire
//! model, the selection state machine, request sequencing and the display
//! formatting. The binary wires it to the DOM.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub mod api;
pub mod config;
pub mod error;
pub mod requests;
pub mod state;

pub use error::{ApiError, LapRangeError, ValidationError};

/// One race weekend of a season, as listed by `/events/{year}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceEvent {
    #[serde(rename = "RoundNumber")]
    pub round_number: u32,
    #[serde(rename = "EventName")]
    pub event_name: String,
}

/// A driver's place in the running order at a given lap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub position: u32,
    pub driver: String,
    pub team: String,
    #[serde(default)]
    pub gap: Option<String>,
    #[serde(default)]
    pub compound: String,
}

/// A lap the backend suggests pitting on, with its undercut probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedLap {
    pub lap: u32,
    pub probability: f64,
}

/// Outcome of a single undercut prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub success: bool,
    pub probability: f64,
    pub confidence: String,
}

/// Body of `POST /predict`. Year and round travel as the selector strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub year: String,
    pub round_num: String,
    pub lap_number: u32,
    pub chaser: String,
    pub defender: String,
}

/// Body of `POST /best-timing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingRequest {
    pub year: String,
    pub round_num: String,
    pub chaser: String,
    pub defender: String,
}

/// Inclusive bounds of the lap slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapRange {
    pub min: u32,
    pub max: u32,
}

impl LapRange {
    /// Build the slider range from the laps the backend has data for.
    /// Laps below 1 (formation lap, pre-race samples) are ignored.
    pub fn from_laps(laps: &[i64]) -> Result<LapRange, LapRangeError> {
        if laps.is_empty() {
            return Err(LapRangeError::NoLaps);
        }

        let mut valid = laps
            .iter()
            .filter(|&&lap| lap >= 1)
            .filter_map(|&lap| u32::try_from(lap).ok());

        let first = valid.next().ok_or(LapRangeError::NoValidLaps)?;
        let (min, max) = valid.fold((first, first), |(lo, hi), lap| (lo.min(lap), hi.max(lap)));
        Ok(LapRange { min, max })
    }

    /// Lap the slider starts on after a race is loaded.
    pub fn initial(&self) -> u32 {
        self.min
    }

    pub fn contains(&self, lap: u32) -> bool {
        (self.min..=self.max).contains(&lap)
    }
}

/// Order recommendations by probability, highest first. Ties keep the
/// backend's order.
pub fn sort_by_probability(laps: &mut [RecommendedLap]) {
    laps.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });
}

/// `0.6234` -> `"62.3%"`.
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Gap to the car ahead, `--` for the leader or missing timing.
pub fn format_gap(gap: Option<&str>) -> &str {
    match gap {
        Some(g) if !g.trim().is_empty() => g,
        _ => "--",
    }
}

/// Label of a race option, e.g. `"5. Miami Grand Prix"`.
pub fn event_label(event: &RaceEvent) -> String {
    format!("{}. {}", event.round_number, event.event_name)
}

/// Label of a driver option, e.g. `"VER (P1)"`.
pub fn driver_label(standing: &Standing) -> String {
    format!("{} (P{})", standing.driver, standing.position)
}
