use gloo_timers::callback::Timeout;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

/// Fire `on_expire` with the notice id `delay_ms` after a notice appears.
///
/// The timer is tied to the id: a newer notice, or the notice going away,
/// drops the pending `Timeout`, which cancels it.
#[hook]
pub fn use_auto_dismiss(notice_id: Option<u64>, delay_ms: u32, on_expire: Callback<u64>) {
    use_effect_with(notice_id, move |id| {
        let timer = (*id).map(|id| Timeout::new(delay_ms, move || on_expire.emit(id)));
        move || drop(timer)
    });
}

/// Keep a `<select>` showing `value` after every render.
///
/// The `selected` attribute stops steering an option once the user has
/// touched the control, so the element's `value` is set directly. An empty
/// string lands on the placeholder option.
#[hook]
pub fn use_select_value(value: Option<String>) -> NodeRef {
    let node = use_node_ref();
    {
        let node = node.clone();
        use_effect(move || {
            if let Some(select) = node.cast::<HtmlSelectElement>() {
                select.set_value(value.as_deref().unwrap_or(""));
            }
        });
    }
    node
}
