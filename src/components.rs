//! Pure Yew view components for the undercut dashboard.
//!
//! Every component here renders from props only. The element ids are the
//! ones the page stylesheet and any external scripts rely on.

use crate::utils::{selected_value, slider_value};
use std::rc::Rc;
use undercut_dash::config::seasons;
use crate::hooks::use_select_value;
use undercut_dash::state::{Notice, Selection};
use undercut_dash::{
    driver_label, event_label, format_gap, format_probability, LapRange, Prediction, RaceEvent,
    RecommendedLap, Standing,
};
use yew::prelude::*;

fn spinner() -> Html {
    html! { <div class="spinner"></div> }
}

fn empty_state(icon: &'static str, message: &'static str) -> Html {
    html! {
        <div class="empty-state">
            <i class={classes!("fas", icon)}></i>
            <p>{ message }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct YearSelectProps {
    pub selected: Option<String>,
    pub onchange: Callback<Option<String>>,
}

#[function_component(YearSelect)]
pub fn year_select(props: &YearSelectProps) -> Html {
    let onchange = props.onchange.reform(|e: Event| selected_value(&e));
    let select_ref = use_select_value(props.selected.clone());
    html! {
        <div class="form-group">
            <label for="yearSelect">{ "Season" }</label>
            <select id="yearSelect" ref={select_ref} {onchange}>
                <option value="" selected={props.selected.is_none()}>{ "Select Year" }</option>
                { for seasons().map(|year| {
                    let value = year.to_string();
                    let selected = props.selected.as_deref() == Some(value.as_str());
                    html! { <option value={value.clone()} {selected}>{ value }</option> }
                }) }
            </select>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EventSelectProps {
    pub events: Rc<Vec<RaceEvent>>,
    pub selected: Option<String>,
    pub loading: bool,
    pub enabled: bool,
    pub onchange: Callback<Option<String>>,
}

#[function_component(EventSelect)]
pub fn event_select(props: &EventSelectProps) -> Html {
    let onchange = props.onchange.reform(|e: Event| selected_value(&e));
    let select_ref = use_select_value(props.selected.clone());
    html! {
        <div class="form-group">
            <label for="eventSelect">{ "Race" }</label>
            <select id="eventSelect" ref={select_ref} disabled={!props.enabled} {onchange}>
                if props.loading {
                    <option value="">{ "Loading..." }</option>
                } else {
                    <>
                        <option value="" selected={props.selected.is_none()}>{ "Select Race" }</option>
                        { for props.events.iter().map(|event| {
                            let value = event.round_number.to_string();
                            let selected = props.selected.as_deref() == Some(value.as_str());
                            html! { <option {value} {selected}>{ event_label(event) }</option> }
                        }) }
                    </>
                }
            </select>
        </div>
    }
}

/// Lap slider with its value label. The label turns `best-lap` when the lap
/// is one of the recommended pit laps.
#[derive(Properties, PartialEq)]
pub struct LapSliderProps {
    pub range: Option<LapRange>,
    pub lap: Option<u32>,
    pub best: bool,
    pub oninput: Callback<u32>,
}

#[function_component(LapSlider)]
pub fn lap_slider(props: &LapSliderProps) -> Html {
    let range = props.range.unwrap_or(LapRange { min: 1, max: 1 });
    let lap = props.lap.unwrap_or(range.min);
    let oninput = {
        let cb = props.oninput.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(lap) = slider_value(&e) {
                cb.emit(lap);
            }
        })
    };

    html! {
        <div class="form-group">
            <label for="lapSlider">
                { "Lap: " }
                <span id="lapValue" class={classes!(props.best.then_some("best-lap"))}>{ lap }</span>
            </label>
            <input type="range"
                id="lapSlider"
                min={range.min.to_string()}
                max={range.max.to_string()}
                step="1"
                value={lap.to_string()}
                disabled={props.range.is_none()}
                {oninput}
            />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StandingsListProps {
    /// `None` before any race has been loaded.
    pub standings: Option<Rc<Vec<Standing>>>,
    pub selection: Selection,
    pub loading: bool,
    pub onpick: Callback<String>,
}

#[function_component(StandingsList)]
pub fn standings_list(props: &StandingsListProps) -> Html {
    let body = if props.loading {
        html! { <div class="loading-spinner">{ spinner() }</div> }
    } else {
        match &props.standings {
            None => empty_state("fa-flag-checkered", "Select a race and lap to see standings"),
            Some(list) if list.is_empty() => {
                empty_state("fa-exclamation-triangle", "No standings data available")
            }
            Some(list) => list
                .iter()
                .map(|standing| {
                    let picked = props.selection.is_picked(&standing.driver);
                    let onclick = {
                        let driver = standing.driver.clone();
                        props.onpick.reform(move |_: MouseEvent| driver.clone())
                    };
                    html! {
                        <div key={standing.driver.clone()}
                            class={classes!("standing-item", picked.then_some("selected"))}
                            {onclick}
                        >
                            <div class="position">{ standing.position }</div>
                            <div class="driver-info">
                                <div class="driver-code">{ &standing.driver }</div>
                                <div class="driver-team">{ &standing.team }</div>
                            </div>
                            <div class="gap-time">{ format_gap(standing.gap.as_deref()).to_string() }</div>
                            <div class={classes!("tyre-compound", format!("tyre-{}", standing.compound))}>
                                { &standing.compound }
                            </div>
                        </div>
                    }
                })
                .collect::<Html>(),
        }
    };

    html! {
        <div id="standingsList" class={classes!("standings-list", props.loading.then_some("loading-overlay"))}>
            { body }
        </div>
    }
}

/// One of the two driver boxes: a title and a select listing the current
/// running order.
#[derive(Properties, PartialEq)]
pub struct DriverSlotProps {
    pub box_id: AttrValue,
    pub select_id: AttrValue,
    pub title: AttrValue,
    pub placeholder: AttrValue,
    pub standings: Option<Rc<Vec<Standing>>>,
    pub selected: Option<String>,
    pub enabled: bool,
    pub onchange: Callback<Option<String>>,
}

#[function_component(DriverSlot)]
pub fn driver_slot(props: &DriverSlotProps) -> Html {
    let onchange = props.onchange.reform(|e: Event| selected_value(&e));
    let select_ref = use_select_value(props.selected.clone());
    let options = props
        .standings
        .iter()
        .flat_map(|list| list.iter())
        .map(|standing| {
            let selected = props.selected.as_deref() == Some(standing.driver.as_str());
            html! {
                <option value={standing.driver.clone()} {selected}>{ driver_label(standing) }</option>
            }
        })
        .collect::<Html>();

    html! {
        <div id={props.box_id.clone()}
            class={classes!("driver-box", props.selected.is_some().then_some("active"))}
        >
            <label for={props.select_id.clone()}>{ props.title.to_string() }</label>
            <select id={props.select_id.clone()} ref={select_ref} disabled={!props.enabled} {onchange}>
                <option value="" selected={props.selected.is_none()}>{ props.placeholder.to_string() }</option>
                { options }
            </select>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PredictButtonProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub loading: bool,
    pub enabled: bool,
    pub onclick: Callback<()>,
}

#[function_component(PredictButton)]
pub fn predict_button(props: &PredictButtonProps) -> Html {
    let onclick = props.onclick.reform(|_: MouseEvent| ());
    html! {
        <button id={props.id.clone()}
            class={classes!("btn-primary", props.loading.then_some("loading"))}
            disabled={!props.enabled}
            {onclick}
        >
            if props.loading { { spinner() } } else { { props.label.to_string() } }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct PredictionCardProps {
    pub prediction: Option<Prediction>,
}

#[function_component(PredictionCard)]
pub fn prediction_card(props: &PredictionCardProps) -> Html {
    let Some(prediction) = &props.prediction else {
        return html! { <div id="predictionResult" style="display: none"></div> };
    };
    let (label, class) = if prediction.success {
        ("SUCCESS", "success")
    } else {
        ("FAIL", "fail")
    };

    html! {
        <div id="predictionResult" class="prediction-result" style="display: block">
            <div id="successBadge" class={classes!("success-badge", class)}>{ label }</div>
            <div id="probabilityValue" class="probability-value">
                { format_probability(prediction.probability) }
            </div>
            <div id="confidenceBadge" class="confidence-badge">
                { format!("{} Confidence", prediction.confidence) }
            </div>
        </div>
    }
}

/// Recommended pit laps, best first. Clicking a row or its button picks the lap.
#[derive(Properties, PartialEq)]
pub struct RecommendedLapsProps {
    pub laps: Rc<Vec<RecommendedLap>>,
    pub visible: bool,
    pub onselect: Callback<u32>,
}

#[function_component(RecommendedLaps)]
pub fn recommended_laps(props: &RecommendedLapsProps) -> Html {
    let display = if props.visible { "display: block" } else { "display: none" };

    let list = if props.laps.is_empty() {
        empty_state("fa-chart-line", "No timing recommendations available")
    } else {
        props
            .laps
            .iter()
            .map(|rec| render_recommended_lap(rec, &props.onselect))
            .collect::<Html>()
    };

    html! {
        <div id="recommendedLaps" class="recommended-laps" style={display}>
            <h3>{ "Recommended Pit Laps" }</h3>
            <div id="recommendedLapsList">{ list }</div>
        </div>
    }
}

fn render_recommended_lap(rec: &RecommendedLap, onselect: &Callback<u32>) -> Html {
    let lap = rec.lap;
    let probability = format_probability(rec.probability);
    let on_item = onselect.reform(move |_: MouseEvent| lap);
    let on_button = {
        let onselect = onselect.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            onselect.emit(lap);
        })
    };

    html! {
        <div key={lap} class="recommended-lap-item" onclick={on_item}>
            <div class="recommended-lap-info">
                <div class="recommended-lap-number">{ format!("Lap {}", lap) }</div>
                <div class="recommended-lap-probability">
                    <div class="probability-bar">
                        <div class="probability-fill" style={format!("width: {}", probability)}></div>
                    </div>
                    <span>{ probability }</span>
                </div>
            </div>
            <div class="recommended-lap-actions">
                <button class="select-lap-btn" data-lap={lap.to_string()} onclick={on_button}>
                    <i class="fas fa-sliders-h"></i>
                    { " Select Lap" }
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub notice: Option<Notice>,
    pub ondismiss: Callback<u64>,
}

#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let Some(notice) = &props.notice else {
        return html! {};
    };
    let id = notice.id;
    let onclick = props.ondismiss.reform(move |_: MouseEvent| id);

    html! {
        <div class="error-message" role="alert">
            <i class="fas fa-exclamation-circle"></i>
            { " " }{ &notice.message }
            <button class="dismiss" aria-label="Dismiss" {onclick}>{ "×" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub notice: Option<Notice>,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    match &props.notice {
        Some(notice) => html! {
            <div class="timing-success-message">
                <i class="fas fa-check-circle"></i>
                <span>{ &notice.message }</span>
            </div>
        },
        None => html! {},
    }
}
