//! Controller state and the actions that drive it.
//!
//! `UndercutState` is the single source of truth for the page. User input and
//! finished requests both arrive as `Action`s; `apply` is pure, which keeps
//! the whole flow testable without a browser. The view reads the state and
//! the binary turns actions into requests.

use crate::{
    sort_by_probability, ApiError, LapRange, PredictRequest, Prediction, RaceEvent,
    RecommendedLap, Standing, TimingRequest, ValidationError,
};
use crate::api::Endpoint;
use log::{debug, warn};
use std::rc::Rc;
use yew::functional::Reducible;

/// What the user has chosen so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub year: Option<String>,
    pub round: Option<String>,
    pub lap: Option<u32>,
    pub chaser: Option<String>,
    pub defender: Option<String>,
}

impl Selection {
    pub fn drivers_chosen(&self) -> bool {
        self.chaser.is_some() && self.defender.is_some()
    }

    /// Whether `driver` fills either slot.
    pub fn is_picked(&self, driver: &str) -> bool {
        self.chaser.as_deref() == Some(driver) || self.defender.as_deref() == Some(driver)
    }

    /// Fill the chaser slot first, then the defender. Once both are taken the
    /// defender is the slot that gets replaced. Picking the current chaser
    /// again changes nothing.
    pub fn pick_driver(&mut self, driver: String) {
        if self.chaser.is_none() {
            self.chaser = Some(driver);
        } else if self.chaser.as_deref() == Some(driver.as_str()) {
            debug!("{} is already the chaser, ignoring pick", driver);
        } else {
            self.defender = Some(driver);
        }
    }

    fn validated_drivers(&self) -> Result<(String, String), ValidationError> {
        match (&self.chaser, &self.defender) {
            (Some(chaser), Some(defender)) if chaser == defender => Err(ValidationError::SameDriver),
            (Some(chaser), Some(defender)) => Ok((chaser.clone(), defender.clone())),
            _ => Err(ValidationError::MissingDrivers),
        }
    }

    /// Body for `POST /predict`, or the reason it cannot be sent yet.
    pub fn prediction_request(&self) -> Result<PredictRequest, ValidationError> {
        let (Some(year), Some(round), Some(lap)) = (&self.year, &self.round, self.lap) else {
            return Err(ValidationError::MissingRaceContext);
        };
        let (chaser, defender) = self.validated_drivers()?;
        Ok(PredictRequest {
            year: year.clone(),
            round_num: round.clone(),
            lap_number: lap,
            chaser,
            defender,
        })
    }

    /// Body for `POST /best-timing`. The lap is not needed here.
    pub fn timing_request(&self) -> Result<TimingRequest, ValidationError> {
        let (Some(year), Some(round)) = (&self.year, &self.round) else {
            return Err(ValidationError::MissingSeasonContext);
        };
        let (chaser, defender) = self.validated_drivers()?;
        Ok(TimingRequest {
            year: year.clone(),
            round_num: round.clone(),
            chaser,
            defender,
        })
    }
}

/// Outstanding requests, one flag per endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loading {
    pub events: bool,
    pub laps: bool,
    pub standings: bool,
    pub prediction: bool,
    pub timing: bool,
}

impl Loading {
    pub fn any(&self) -> bool {
        self.events || self.laps || self.standings || self.prediction || self.timing
    }
}

/// A transient message. The id lets a dismissal timer check it is still
/// looking at the message it was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
}

#[derive(Debug)]
pub enum Action {
    SelectYear(Option<String>),
    EventsLoaded(Result<Vec<RaceEvent>, ApiError>),
    SelectRound(Option<String>),
    LapsLoaded(Result<Vec<i64>, ApiError>),
    SetLap(u32),
    StandingsRequested,
    StandingsLoaded(Result<Vec<Standing>, ApiError>),
    PickDriver(String),
    SetChaser(Option<String>),
    SetDefender(Option<String>),
    PredictionRequested,
    PredictionLoaded(Result<Prediction, ApiError>),
    TimingRequested,
    TimingLoaded(Result<Vec<RecommendedLap>, ApiError>),
    SelectRecommendedLap(u32),
    ShowError(String),
    DismissError(u64),
    DismissToast(u64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndercutState {
    pub selection: Selection,
    pub events: Rc<Vec<RaceEvent>>,
    pub lap_range: Option<LapRange>,
    /// `None` until a race is loaded; `Some(empty)` when the backend had none.
    pub standings: Option<Rc<Vec<Standing>>>,
    pub recommended: Rc<Vec<RecommendedLap>>,
    pub recommended_visible: bool,
    pub prediction: Option<Prediction>,
    pub loading: Loading,
    pub error: Option<Notice>,
    pub toast: Option<Notice>,
    next_notice: u64,
}

impl Reducible for UndercutState {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

impl UndercutState {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SelectYear(year) => {
                self.reset_below_year();
                self.loading.events = year.is_some();
                self.selection.year = year;
            }
            Action::EventsLoaded(result) => {
                self.loading.events = false;
                match result {
                    Ok(events) if events.is_empty() => {
                        self.show_error("No races found for this year".to_string());
                    }
                    Ok(events) => self.events = Rc::new(events),
                    Err(e) => self.fail(Endpoint::Events, &e),
                }
            }
            Action::SelectRound(round) => {
                self.reset_below_round();
                self.loading.laps = round.is_some() && self.selection.year.is_some();
                self.selection.round = round;
            }
            Action::LapsLoaded(result) => {
                self.loading.laps = false;
                if self.selection.round.is_none() {
                    debug!("Ignoring laps that arrived after the race was cleared");
                    return;
                }
                let laps = match result {
                    Ok(laps) => laps,
                    Err(e) => return self.fail(Endpoint::Laps, &e),
                };
                match LapRange::from_laps(&laps) {
                    Ok(range) => {
                        self.lap_range = Some(range);
                        self.selection.lap = Some(range.initial());
                        self.recommended = Rc::default();
                    }
                    Err(e) => self.show_error(e.to_string()),
                }
            }
            Action::SetLap(lap) => self.selection.lap = Some(lap),
            Action::StandingsRequested => self.loading.standings = true,
            Action::StandingsLoaded(result) => {
                self.loading.standings = false;
                match result {
                    Ok(standings) => self.standings = Some(Rc::new(standings)),
                    Err(e) => self.fail(Endpoint::Standings, &e),
                }
            }
            Action::PickDriver(driver) => self.selection.pick_driver(driver),
            Action::SetChaser(driver) => self.selection.chaser = driver,
            Action::SetDefender(driver) => self.selection.defender = driver,
            Action::PredictionRequested => self.loading.prediction = true,
            Action::PredictionLoaded(result) => {
                self.loading.prediction = false;
                match result {
                    Ok(prediction) => self.prediction = Some(prediction),
                    Err(e) => self.fail(Endpoint::Predict, &e),
                }
            }
            Action::TimingRequested => self.loading.timing = true,
            Action::TimingLoaded(result) => {
                self.loading.timing = false;
                match result {
                    Ok(mut laps) => {
                        sort_by_probability(&mut laps);
                        self.recommended = Rc::new(laps);
                        self.recommended_visible = true;
                    }
                    Err(e) => self.fail(Endpoint::BestTiming, &e),
                }
            }
            Action::SelectRecommendedLap(lap) => {
                if !self.lap_in_range(lap) {
                    warn!("Recommended lap {} is outside the slider range {:?}", lap, self.lap_range);
                    return;
                }
                self.selection.lap = Some(lap);
                self.recommended_visible = false;
                let id = self.notice_id();
                self.toast = Some(Notice {
                    id,
                    message: format!("Selected Lap {} for undercut analysis", lap),
                });
            }
            Action::ShowError(message) => self.show_error(message),
            Action::DismissError(id) => {
                if self.error.as_ref().is_some_and(|n| n.id == id) {
                    self.error = None;
                }
            }
            Action::DismissToast(id) => {
                if self.toast.as_ref().is_some_and(|n| n.id == id) {
                    self.toast = None;
                }
            }
        }
    }

    fn notice_id(&mut self) -> u64 {
        self.next_notice += 1;
        self.next_notice
    }

    /// Replace whatever banner is showing with `message`.
    fn show_error(&mut self, message: String) {
        let id = self.notice_id();
        self.error = Some(Notice { id, message });
    }

    fn fail(&mut self, endpoint: Endpoint, err: &ApiError) {
        warn!("{:?} request failed: {}", endpoint, err);
        self.show_error(err.user_message(endpoint));
    }

    fn reset_below_year(&mut self) {
        self.selection.round = None;
        self.events = Rc::default();
        self.loading.events = false;
        self.loading.laps = false;
        self.reset_below_round();
    }

    fn reset_below_round(&mut self) {
        self.selection.lap = None;
        self.selection.chaser = None;
        self.selection.defender = None;
        self.lap_range = None;
        self.standings = None;
        self.recommended = Rc::default();
        self.recommended_visible = false;
        self.prediction = None;
        self.loading.standings = false;
        self.loading.prediction = false;
        self.loading.timing = false;
    }

    pub fn race_select_enabled(&self) -> bool {
        !self.loading.events && !self.events.is_empty()
    }

    pub fn slider_enabled(&self) -> bool {
        self.lap_range.is_some()
    }

    pub fn driver_selects_enabled(&self) -> bool {
        self.standings.as_ref().is_some_and(|s| !s.is_empty())
    }

    pub fn predict_enabled(&self) -> bool {
        self.selection.drivers_chosen() && !self.loading.prediction
    }

    pub fn timing_enabled(&self) -> bool {
        self.selection.drivers_chosen() && !self.loading.timing
    }

    /// Whether the current lap is one the backend recommended.
    pub fn lap_is_recommended(&self) -> bool {
        self.selection
            .lap
            .is_some_and(|lap| self.recommended.iter().any(|r| r.lap == lap))
    }

    /// Whether `lap` can be shown on the slider for the loaded race.
    pub fn lap_in_range(&self, lap: u32) -> bool {
        self.lap_range.is_some_and(|range| range.contains(lap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(position: u32, driver: &str) -> Standing {
        Standing {
            position,
            driver: driver.into(),
            team: "Team".into(),
            gap: None,
            compound: "SOFT".into(),
        }
    }

    fn race_loaded() -> UndercutState {
        let mut state = UndercutState::default();
        state.apply(Action::SelectYear(Some("2023".into())));
        state.apply(Action::EventsLoaded(Ok(vec![RaceEvent {
            round_number: 5,
            event_name: "Miami Grand Prix".into(),
        }])));
        state.apply(Action::SelectRound(Some("5".into())));
        state.apply(Action::LapsLoaded(Ok((1..=57).collect())));
        state.apply(Action::StandingsRequested);
        state.apply(Action::StandingsLoaded(Ok(vec![
            standing(1, "VER"),
            standing(2, "PER"),
            standing(3, "ALO"),
        ])));
        state
    }

    #[test]
    fn pick_fills_chaser_then_defender_then_replaces_defender() {
        let mut sel = Selection::default();
        sel.pick_driver("VER".into());
        assert_eq!(sel.chaser.as_deref(), Some("VER"));
        assert_eq!(sel.defender, None);

        sel.pick_driver("PER".into());
        assert_eq!(sel.defender.as_deref(), Some("PER"));

        sel.pick_driver("ALO".into());
        assert_eq!(sel.chaser.as_deref(), Some("VER"));
        assert_eq!(sel.defender.as_deref(), Some("ALO"));
    }

    #[test]
    fn picking_the_chaser_again_is_ignored() {
        let mut sel = Selection::default();
        sel.pick_driver("VER".into());
        sel.pick_driver("VER".into());
        assert_eq!(sel.defender, None);

        sel.pick_driver("PER".into());
        sel.pick_driver("VER".into());
        assert_eq!(sel.defender.as_deref(), Some("PER"));
    }

    #[test]
    fn same_driver_is_refused() {
        let sel = Selection {
            year: Some("2023".into()),
            round: Some("5".into()),
            lap: Some(12),
            chaser: Some("VER".into()),
            defender: Some("VER".into()),
        };
        let err = sel.prediction_request().unwrap_err();
        assert_eq!(err.to_string(), "Chaser and defender must be different drivers");
        assert_eq!(sel.timing_request(), Err(ValidationError::SameDriver));
    }

    #[test]
    fn missing_fields_are_refused() {
        let mut sel = Selection {
            year: Some("2023".into()),
            round: Some("5".into()),
            lap: None,
            chaser: Some("HAM".into()),
            defender: Some("RUS".into()),
        };
        assert_eq!(sel.prediction_request(), Err(ValidationError::MissingRaceContext));
        // timing does not need a lap
        assert!(sel.timing_request().is_ok());

        sel.lap = Some(20);
        sel.defender = None;
        assert_eq!(sel.prediction_request(), Err(ValidationError::MissingDrivers));
        assert_eq!(sel.timing_request(), Err(ValidationError::MissingDrivers));

        sel.round = None;
        assert_eq!(sel.timing_request(), Err(ValidationError::MissingSeasonContext));
    }

    #[test]
    fn prediction_request_carries_selection() {
        let sel = Selection {
            year: Some("2023".into()),
            round: Some("5".into()),
            lap: Some(21),
            chaser: Some("HAM".into()),
            defender: Some("RUS".into()),
        };
        let req = sel.prediction_request().unwrap();
        assert_eq!(req.lap_number, 21);
        assert_eq!(req.round_num, "5");
        assert_eq!(req.chaser, "HAM");
    }

    #[test]
    fn empty_event_list_raises_error_and_keeps_race_select_disabled() {
        let mut state = UndercutState::default();
        state.apply(Action::SelectYear(Some("2031".into())));
        assert!(state.loading.events);
        state.apply(Action::EventsLoaded(Ok(vec![])));

        assert!(!state.loading.events);
        assert!(state.events.is_empty());
        assert!(!state.race_select_enabled());
        assert_eq!(state.error.unwrap().message, "No races found for this year");
    }

    #[test]
    fn laps_set_slider_bounds_and_initial_lap() {
        let state = race_loaded();
        assert_eq!(state.lap_range, Some(LapRange { min: 1, max: 57 }));
        assert_eq!(state.selection.lap, Some(1));
        assert!(state.slider_enabled());
        assert!(!state.loading.any());
    }

    #[test]
    fn laps_below_one_leave_slider_disabled() {
        let mut state = UndercutState::default();
        state.apply(Action::SelectYear(Some("2023".into())));
        state.apply(Action::SelectRound(Some("5".into())));
        state.apply(Action::LapsLoaded(Ok(vec![0, -1])));

        assert!(!state.slider_enabled());
        assert_eq!(state.selection.lap, None);
        assert_eq!(
            state.error.unwrap().message,
            "No valid lap data available (all laps are below 1)"
        );
    }

    #[test]
    fn buttons_enable_only_with_both_drivers() {
        let mut state = race_loaded();
        assert!(!state.predict_enabled());
        state.apply(Action::PickDriver("VER".into()));
        assert!(!state.predict_enabled());
        assert!(!state.timing_enabled());
        state.apply(Action::PickDriver("PER".into()));
        assert!(state.predict_enabled());
        assert!(state.timing_enabled());

        state.apply(Action::PredictionRequested);
        assert!(!state.predict_enabled());
        assert!(state.timing_enabled());

        state.apply(Action::SetDefender(None));
        assert!(!state.timing_enabled());
    }

    #[test]
    fn round_change_resets_downstream() {
        let mut state = race_loaded();
        state.apply(Action::PickDriver("VER".into()));
        state.apply(Action::PickDriver("PER".into()));
        state.apply(Action::TimingLoaded(Ok(vec![RecommendedLap { lap: 12, probability: 0.5 }])));
        state.apply(Action::PredictionRequested);

        state.apply(Action::SelectRound(Some("6".into())));

        assert_eq!(state.selection.year.as_deref(), Some("2023"));
        assert_eq!(state.selection.round.as_deref(), Some("6"));
        assert_eq!(state.selection.chaser, None);
        assert_eq!(state.selection.defender, None);
        assert_eq!(state.selection.lap, None);
        assert!(state.recommended.is_empty());
        assert!(state.standings.is_none());
        assert!(!state.loading.prediction);
        assert!(state.loading.laps);
        assert!(!state.events.is_empty());
    }

    #[test]
    fn failures_clear_loading_and_show_banner() {
        let mut state = race_loaded();
        state.apply(Action::PickDriver("VER".into()));
        state.apply(Action::PickDriver("PER".into()));

        state.apply(Action::PredictionRequested);
        state.apply(Action::PredictionLoaded(Err(ApiError::rejected(
            500,
            r#"{"error": "Model not loaded"}"#,
        ))));
        assert!(!state.loading.prediction);
        assert_eq!(state.error.as_ref().unwrap().message, "Model not loaded");

        state.apply(Action::TimingRequested);
        state.apply(Action::TimingLoaded(Err(ApiError::network("offline"))));
        assert!(!state.loading.timing);
        assert_eq!(state.error.as_ref().unwrap().message, "Failed to get best timing");

        state.apply(Action::StandingsRequested);
        state.apply(Action::StandingsLoaded(Err(ApiError::network("offline"))));
        assert!(!state.loading.any());
        // the previous snapshot survives a failed refresh
        assert_eq!(state.standings.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn new_error_replaces_old_and_stale_dismissal_is_ignored() {
        let mut state = UndercutState::default();
        state.apply(Action::ShowError("first".into()));
        let first = state.error.clone().unwrap();
        state.apply(Action::ShowError("second".into()));
        let second = state.error.clone().unwrap();
        assert_ne!(first.id, second.id);

        state.apply(Action::DismissError(first.id));
        assert_eq!(state.error.as_ref(), Some(&second));

        state.apply(Action::DismissError(second.id));
        assert_eq!(state.error, None);
    }

    #[test]
    fn recommendations_sort_and_highlight_lap() {
        let mut state = race_loaded();
        state.apply(Action::TimingRequested);
        state.apply(Action::TimingLoaded(Ok(vec![
            RecommendedLap { lap: 14, probability: 0.31 },
            RecommendedLap { lap: 19, probability: 0.82 },
            RecommendedLap { lap: 16, probability: 0.57 },
        ])));
        assert!(state.recommended_visible);
        let order: Vec<u32> = state.recommended.iter().map(|r| r.lap).collect();
        assert_eq!(order, vec![19, 16, 14]);
        assert!(!state.lap_is_recommended());

        state.apply(Action::SelectRecommendedLap(16));
        assert_eq!(state.selection.lap, Some(16));
        assert!(state.lap_is_recommended());
        assert!(!state.recommended_visible);
        let toast = state.toast.clone().unwrap();
        assert_eq!(toast.message, "Selected Lap 16 for undercut analysis");

        state.apply(Action::DismissToast(toast.id));
        assert_eq!(state.toast, None);
    }

    #[test]
    fn laps_for_a_cleared_race_are_ignored() {
        let mut state = UndercutState::default();
        state.apply(Action::SelectYear(Some("2023".into())));
        state.apply(Action::SelectRound(Some("5".into())));
        state.apply(Action::SelectRound(None));
        state.apply(Action::LapsLoaded(Ok((1..=57).collect())));

        assert_eq!(state.lap_range, None);
        assert_eq!(state.selection.lap, None);
        assert!(!state.slider_enabled());
        assert!(!state.loading.laps);
    }

    #[test]
    fn recommendation_outside_the_slider_is_ignored() {
        let mut state = race_loaded();
        state.apply(Action::SetLap(9));
        state.apply(Action::TimingLoaded(Ok(vec![
            RecommendedLap { lap: 63, probability: 0.9 },
            RecommendedLap { lap: 0, probability: 0.4 },
        ])));

        state.apply(Action::SelectRecommendedLap(63));
        state.apply(Action::SelectRecommendedLap(0));

        assert_eq!(state.selection.lap, Some(9));
        assert!(state.recommended_visible);
        assert_eq!(state.toast, None);
        assert!(state.lap_in_range(57));
        assert!(!state.lap_in_range(58));
    }

    #[test]
    fn picked_drivers_are_marked() {
        let mut state = race_loaded();
        state.apply(Action::PickDriver("ALO".into()));
        assert!(state.selection.is_picked("ALO"));
        assert!(!state.selection.is_picked("VER"));
        state.apply(Action::PickDriver("VER".into()));
        assert!(state.selection.is_picked("VER"));
    }

    #[test]
    fn clearing_year_issues_nothing() {
        let mut state = race_loaded();
        state.apply(Action::SelectYear(None));
        assert_eq!(state, UndercutState::default());
        assert!(!state.loading.any());
    }
}
