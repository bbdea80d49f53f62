use web_sys::{HtmlInputElement, HtmlSelectElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};
use yew::prelude::*;

/// Value of a `<select>` after a change; the empty placeholder option maps to `None`.
pub fn selected_value(e: &Event) -> Option<String> {
    let select: HtmlSelectElement = e.target_unchecked_into();
    let value = select.value();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Current lap of a range input, `None` if the browser hands back garbage.
pub fn slider_value(e: &InputEvent) -> Option<u32> {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value().parse().ok()
}

/// Smoothly bring the element with `id` into view, if it is on the page.
pub fn scroll_into_view(id: &str) {
    let Some(element) = gloo_utils::document().get_element_by_id(id) else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Nearest);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}
