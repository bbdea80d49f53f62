//! Main module for the Undercut Dash application using Yew.
//! Wires UI components, the controller state and request side effects.

use log::{debug, warn};
use std::rc::Rc;
use undercut_dash::{
    api,
    config::{ERROR_BANNER_MS, PREDICT_LABEL, PREDICT_TIMING_LABEL, TOAST_MS},
    requests::RequestTracker,
    state::{Action, UndercutState},
    LapRange,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

mod components;
mod hooks;
mod utils;

use components::{
    DriverSlot, ErrorBanner, EventSelect, LapSlider, PredictButton, PredictionCard,
    RecommendedLaps, StandingsList, Toast, YearSelect,
};
use hooks::use_auto_dismiss;
use utils::scroll_into_view;

type StateHandle = UseReducerHandle<UndercutState>;

// ──────────────────────────────────────────────────────────────────────────────
// Request helpers

/// Fetch the running order at `lap` and hand it to the reducer, unless a newer
/// standings request has been issued in the meantime.
fn load_standings(state: StateHandle, tracker: Rc<RequestTracker>, year: String, round: String, lap: u32) {
    state.dispatch(Action::StandingsRequested);
    let ticket = tracker.standings.issue();
    spawn_local(async move {
        let result = api::fetch_standings(&year, &round, lap).await;
        if let Some(result) = tracker.standings.admit(ticket, result) {
            state.dispatch(Action::StandingsLoaded(result));
        } else {
            debug!("Dropping stale standings for lap {}", lap);
        }
    });
}

/// Standings for the lap the selection currently points at, if a race is chosen.
fn reload_standings(state: &StateHandle, tracker: &Rc<RequestTracker>, lap: u32) {
    let selection = &state.selection;
    if let (Some(year), Some(round)) = (selection.year.clone(), selection.round.clone()) {
        load_standings(state.clone(), tracker.clone(), year, round, lap);
    }
}

// ──────────────────────────────────────────────────────────────────────────────

/// Root component: owns the controller state and turns user input into requests.
#[function_component(App)]
fn app() -> Html {
    let state = use_reducer(UndercutState::default);
    let tracker = use_memo((), |_| RequestTracker::default());

    let on_year = {
        let state = state.clone();
        let tracker = tracker.clone();
        Callback::from(move |year: Option<String>| {
            tracker.on_year_change();
            state.dispatch(Action::SelectYear(year.clone()));
            let Some(year) = year else {
                return;
            };
            let ticket = tracker.events.issue();
            let state = state.clone();
            let tracker = tracker.clone();
            spawn_local(async move {
                let result = api::fetch_events(&year).await;
                if let Some(result) = tracker.events.admit(ticket, result) {
                    state.dispatch(Action::EventsLoaded(result));
                } else {
                    debug!("Dropping stale events for {}", year);
                }
            });
        })
    };

    let on_round = {
        let state = state.clone();
        let tracker = tracker.clone();
        Callback::from(move |round: Option<String>| {
            tracker.on_round_change();
            state.dispatch(Action::SelectRound(round.clone()));
            let (Some(year), Some(round)) = (state.selection.year.clone(), round) else {
                return;
            };
            let ticket = tracker.laps.issue();
            let state = state.clone();
            let tracker = tracker.clone();
            spawn_local(async move {
                let result = api::fetch_laps(&year, &round).await;
                let Some(result) = tracker.laps.admit(ticket, result) else {
                    debug!("Dropping stale laps for {} Round {}", year, round);
                    return;
                };
                let first_lap = result
                    .as_ref()
                    .ok()
                    .and_then(|laps| LapRange::from_laps(laps).ok())
                    .map(|range| range.initial());
                state.dispatch(Action::LapsLoaded(result));
                if let Some(lap) = first_lap {
                    load_standings(state, tracker, year, round, lap);
                }
            });
        })
    };

    let on_lap = {
        let state = state.clone();
        let tracker = tracker.clone();
        Callback::from(move |lap: u32| {
            state.dispatch(Action::SetLap(lap));
            reload_standings(&state, &tracker, lap);
        })
    };

    let on_pick = {
        let state = state.clone();
        Callback::from(move |driver: String| state.dispatch(Action::PickDriver(driver)))
    };
    let on_chaser = {
        let state = state.clone();
        Callback::from(move |driver: Option<String>| state.dispatch(Action::SetChaser(driver)))
    };
    let on_defender = {
        let state = state.clone();
        Callback::from(move |driver: Option<String>| state.dispatch(Action::SetDefender(driver)))
    };

    let on_predict = {
        let state = state.clone();
        let tracker = tracker.clone();
        Callback::from(move |_: ()| {
            let request = match state.selection.prediction_request() {
                Ok(request) => request,
                Err(e) => {
                    warn!("Prediction refused: {}", e);
                    state.dispatch(Action::ShowError(e.to_string()));
                    return;
                }
            };
            state.dispatch(Action::PredictionRequested);
            let ticket = tracker.prediction.issue();
            let state = state.clone();
            let tracker = tracker.clone();
            spawn_local(async move {
                let result = api::predict(&request).await;
                if let Some(result) = tracker.prediction.admit(ticket, result) {
                    state.dispatch(Action::PredictionLoaded(result));
                } else {
                    debug!("Dropping stale prediction");
                }
            });
        })
    };

    let on_predict_timing = {
        let state = state.clone();
        let tracker = tracker.clone();
        Callback::from(move |_: ()| {
            let request = match state.selection.timing_request() {
                Ok(request) => request,
                Err(e) => {
                    warn!("Timing request refused: {}", e);
                    state.dispatch(Action::ShowError(e.to_string()));
                    return;
                }
            };
            state.dispatch(Action::TimingRequested);
            let ticket = tracker.timing.issue();
            let state = state.clone();
            let tracker = tracker.clone();
            spawn_local(async move {
                let result = api::best_timing(&request).await;
                if let Some(result) = tracker.timing.admit(ticket, result) {
                    state.dispatch(Action::TimingLoaded(result));
                } else {
                    debug!("Dropping stale timing recommendation");
                }
            });
        })
    };

    let on_recommended = {
        let state = state.clone();
        let tracker = tracker.clone();
        Callback::from(move |lap: u32| {
            state.dispatch(Action::SelectRecommendedLap(lap));
            if state.lap_in_range(lap) {
                reload_standings(&state, &tracker, lap);
            }
        })
    };

    let on_dismiss_error = {
        let state = state.clone();
        Callback::from(move |id: u64| state.dispatch(Action::DismissError(id)))
    };
    let on_dismiss_toast = {
        let state = state.clone();
        Callback::from(move |id: u64| state.dispatch(Action::DismissToast(id)))
    };

    use_auto_dismiss(state.error.as_ref().map(|n| n.id), ERROR_BANNER_MS, on_dismiss_error.clone());
    use_auto_dismiss(state.toast.as_ref().map(|n| n.id), TOAST_MS, on_dismiss_toast);

    // Bring fresh results into view once they are rendered
    use_effect_with(state.prediction.clone(), |prediction| {
        if prediction.is_some() {
            scroll_into_view("predictionResult");
        }
    });
    use_effect_with((state.recommended.clone(), state.recommended_visible), |(_, visible)| {
        if *visible {
            scroll_into_view("recommendedLaps");
        }
    });

    let selection = &state.selection;
    let current_lap = selection.lap.unwrap_or(1);

    html! {
        <div class="app-container" aria-busy={state.loading.any().to_string()}>
            <header class="app-header">
                <h1>{ "Undercut Predictor" }</h1>
            </header>

            <main class="main-grid">
                <section class="left-panel card">
                    <h2>{ "Race Selection" }</h2>
                    <YearSelect selected={selection.year.clone()} onchange={on_year} />
                    <EventSelect
                        events={state.events.clone()}
                        selected={selection.round.clone()}
                        loading={state.loading.events}
                        enabled={state.race_select_enabled()}
                        onchange={on_round}
                    />
                    <LapSlider
                        range={state.lap_range}
                        lap={selection.lap}
                        best={state.lap_is_recommended()}
                        oninput={on_lap}
                    />
                </section>

                <section class="middle-panel">
                    <ErrorBanner notice={state.error.clone()} ondismiss={on_dismiss_error} />

                    <div class="card">
                        <h2>
                            { "Standings at Lap " }
                            <span id="currentLapDisplay">{ current_lap }</span>
                        </h2>
                        <StandingsList
                            standings={state.standings.clone()}
                            selection={selection.clone()}
                            loading={state.loading.laps || state.loading.standings}
                            onpick={on_pick}
                        />
                    </div>

                    <div class="card">
                        <h2>{ "Driver Selection" }</h2>
                        <div class="driver-boxes">
                            <DriverSlot
                                box_id="chaserBox"
                                select_id="chaserSelect"
                                title="Chaser"
                                placeholder="Select Chaser"
                                standings={state.standings.clone()}
                                selected={selection.chaser.clone()}
                                enabled={state.driver_selects_enabled()}
                                onchange={on_chaser}
                            />
                            <DriverSlot
                                box_id="defenderBox"
                                select_id="defenderSelect"
                                title="Defender"
                                placeholder="Select Defender"
                                standings={state.standings.clone()}
                                selected={selection.defender.clone()}
                                enabled={state.driver_selects_enabled()}
                                onchange={on_defender}
                            />
                        </div>
                    </div>

                    <Toast notice={state.toast.clone()} />

                    <div class="card actions">
                        <PredictButton
                            id="predictBtn"
                            label={PREDICT_LABEL}
                            loading={state.loading.prediction}
                            enabled={state.predict_enabled()}
                            onclick={on_predict}
                        />
                        <PredictButton
                            id="predictTimingBtn"
                            label={PREDICT_TIMING_LABEL}
                            loading={state.loading.timing}
                            enabled={state.timing_enabled()}
                            onclick={on_predict_timing}
                        />
                    </div>
                </section>

                <section class="right-panel card">
                    <h2>{ "Prediction" }</h2>
                    <PredictionCard prediction={state.prediction.clone()} />
                    <RecommendedLaps
                        laps={state.recommended.clone()}
                        visible={state.recommended_visible}
                        onselect={on_recommended}
                    />
                </section>
            </main>
        </div>
    }
}

/// Entry point: sets up panic reporting and console logging, then mounts the app.
fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    yew::Renderer::<App>::new().render();
}
