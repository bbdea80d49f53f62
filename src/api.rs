//! HTTP client for the prediction backend.
//!
//! Every call resolves to `Result<_, ApiError>`; the caller decides how a
//! failure is shown. Empty lists in a successful body are not errors.

use crate::config::api_base;
use crate::{ApiError, Prediction, PredictRequest, RaceEvent, RecommendedLap, Standing, TimingRequest};
use gloo_net::http::{Request, Response};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The five backend endpoints, used to pick failure wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Events,
    Laps,
    Standings,
    Predict,
    BestTiming,
}

impl Endpoint {
    /// Shown when the request failed in transit or the body was unreadable.
    pub fn transport_fallback(self) -> &'static str {
        match self {
            Endpoint::Events => "Failed to load races",
            Endpoint::Laps => "Failed to load lap data",
            Endpoint::Standings => "Failed to load driver standings",
            Endpoint::Predict => "Failed to get prediction",
            Endpoint::BestTiming => "Failed to get best timing",
        }
    }

    /// Shown when the server rejected the request without saying why.
    pub fn rejection_fallback(self) -> &'static str {
        match self {
            Endpoint::Predict => "Prediction failed",
            other => other.transport_fallback(),
        }
    }
}

pub fn events_url(year: &str) -> String {
    format!("{}/events/{}", api_base(), year)
}

pub fn laps_url(year: &str, round: &str) -> String {
    format!("{}/laps/{}/{}", api_base(), year, round)
}

pub fn standings_url(year: &str, round: &str, lap: u32) -> String {
    format!("{}/standings/{}/{}/{}", api_base(), year, round, lap)
}

pub fn predict_url() -> String {
    format!("{}/predict", api_base())
}

pub fn best_timing_url() -> String {
    format!("{}/best-timing", api_base())
}

#[derive(Deserialize)]
struct EventsBody {
    #[serde(default)]
    events: Vec<RaceEvent>,
}

#[derive(Deserialize)]
struct LapsBody {
    #[serde(default)]
    laps: Vec<i64>,
}

#[derive(Deserialize)]
struct StandingsBody {
    #[serde(default)]
    standings: Vec<Standing>,
}

/// Older backends answer with `laps`, newer ones with `recommended_laps`.
#[derive(Deserialize)]
struct TimingBody {
    recommended_laps: Option<Vec<RecommendedLap>>,
    laps: Option<Vec<RecommendedLap>>,
}

impl TimingBody {
    fn into_laps(self) -> Vec<RecommendedLap> {
        self.recommended_laps.or(self.laps).unwrap_or_default()
    }
}

/// Turn a response into `T`, mapping non-2xx statuses to `ApiError::Rejected`.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        warn!("{} answered {}: {}", resp.url(), status, body.trim());
        return Err(ApiError::rejected(status, &body));
    }
    resp.json::<T>().await.map_err(ApiError::decode)
}

async fn get<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let resp = Request::get(url).send().await.map_err(ApiError::network)?;
    decode(resp).await
}

async fn post<B: serde::Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, ApiError> {
    let resp = Request::post(url)
        .json(body)
        .map_err(ApiError::network)?
        .send()
        .await
        .map_err(ApiError::network)?;
    decode(resp).await
}

pub async fn fetch_events(year: &str) -> Result<Vec<RaceEvent>, ApiError> {
    info!("Loading events for {}...", year);
    let body: EventsBody = get(&events_url(year)).await?;
    Ok(body.events)
}

pub async fn fetch_laps(year: &str, round: &str) -> Result<Vec<i64>, ApiError> {
    info!("Loading laps for {} Round {}...", year, round);
    let body: LapsBody = get(&laps_url(year, round)).await?;
    Ok(body.laps)
}

pub async fn fetch_standings(year: &str, round: &str, lap: u32) -> Result<Vec<Standing>, ApiError> {
    info!("Loading standings for {} Round {} Lap {}...", year, round, lap);
    let body: StandingsBody = get(&standings_url(year, round, lap)).await?;
    Ok(body.standings)
}

pub async fn predict(request: &PredictRequest) -> Result<Prediction, ApiError> {
    info!(
        "Predicting undercut {} on {} at lap {}",
        request.chaser, request.defender, request.lap_number
    );
    post(&predict_url(), request).await
}

pub async fn best_timing(request: &TimingRequest) -> Result<Vec<RecommendedLap>, ApiError> {
    info!("Requesting best undercut timing {} on {}", request.chaser, request.defender);
    let body: TimingBody = post(&best_timing_url(), request).await?;
    Ok(body.into_laps())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_backend_routes() {
        assert_eq!(events_url("2023"), "/api/events/2023");
        assert_eq!(laps_url("2023", "5"), "/api/laps/2023/5");
        assert_eq!(standings_url("2023", "5", 17), "/api/standings/2023/5/17");
        assert_eq!(predict_url(), "/api/predict");
        assert_eq!(best_timing_url(), "/api/best-timing");
    }

    #[test]
    fn missing_lists_decode_as_empty() {
        let events: EventsBody = serde_json::from_str("{}").unwrap();
        assert!(events.events.is_empty());
        let laps: LapsBody = serde_json::from_str(r#"{"laps": []}"#).unwrap();
        assert!(laps.laps.is_empty());
        let standings: StandingsBody = serde_json::from_str("{}").unwrap();
        assert!(standings.standings.is_empty());
    }

    #[test]
    fn timing_body_prefers_recommended_laps() {
        let body: TimingBody = serde_json::from_str(
            r#"{"recommended_laps": [{"lap": 14, "probability": 0.7}], "laps": [{"lap": 3, "probability": 0.2}]}"#,
        )
        .unwrap();
        assert_eq!(body.into_laps(), vec![RecommendedLap { lap: 14, probability: 0.7 }]);

        let body: TimingBody =
            serde_json::from_str(r#"{"laps": [{"lap": 3, "probability": 0.2}]}"#).unwrap();
        assert_eq!(body.into_laps(), vec![RecommendedLap { lap: 3, probability: 0.2 }]);

        let body: TimingBody = serde_json::from_str("{}").unwrap();
        assert!(body.into_laps().is_empty());
    }

    #[test]
    fn predict_fallbacks_differ_by_failure_kind() {
        assert_eq!(Endpoint::Predict.rejection_fallback(), "Prediction failed");
        assert_eq!(Endpoint::Predict.transport_fallback(), "Failed to get prediction");
        assert_eq!(Endpoint::Laps.rejection_fallback(), "Failed to load lap data");
    }
}
