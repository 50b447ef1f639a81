use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

use crate::model::Theme;

/// Height of the fixed header, compensated for when scrolling to anchors.
const SCROLL_OFFSET_PX: f64 = 80.0;
const SHADOW_THRESHOLD_PX: f64 = 10.0;

#[derive(Properties, PartialEq, Clone)]
pub struct HeaderProps {
    pub theme: Theme,
    pub on_toggle_theme: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let shadowed = use_state_eq(|| false);

    // Shadow once the page scrolls past the threshold. The listener and its
    // state live and die with this component.
    {
        let shadowed = shadowed.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let scroll_cb = {
                let window = window.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    let current = window.page_y_offset().unwrap_or(0.0);
                    shadowed.set(current > SHADOW_THRESHOLD_PX);
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("scroll", scroll_cb.as_ref().unchecked_ref())
                .ok();
            move || {
                let _ = window.remove_event_listener_with_callback(
                    "scroll",
                    scroll_cb.as_ref().unchecked_ref(),
                );
            }
        });
    }

    let toggle_cb = {
        let cb = props.on_toggle_theme.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let nav_link = |target: &'static str, label: &'static str| -> Html {
        let onclick = Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            smooth_scroll_to(target);
        });
        html! { <a href={format!("#{}", target)} {onclick}>{ label }</a> }
    };

    let header_style = if *shadowed {
        "box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);"
    } else {
        "box-shadow: none;"
    };
    let theme_label = match props.theme {
        Theme::Light => "🌙",
        Theme::Dark => "☀",
    };

    html! {
        <header class="header" style={header_style}>
            <div class="header__inner">
                <span class="header__brand">{"Field Notes"}</span>
                <nav class="header__nav">
                    { nav_link("gallery", "Gallery") }
                    { nav_link("about", "About") }
                    { nav_link("contact", "Contact") }
                </nav>
                <button
                    id="theme-toggle"
                    class="header__theme-toggle"
                    onclick={toggle_cb}
                    title="Toggle theme"
                >
                    { theme_label }
                </button>
            </div>
        </header>
    }
}

/// Scroll smoothly to the element with `id`, compensating for the fixed
/// header sitting above the page content.
fn smooth_scroll_to(id: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(target) = window.document().and_then(|d| d.get_element_by_id(id)) else {
        return;
    };
    let rect = target.get_bounding_client_rect();
    let page_offset = window.page_y_offset().unwrap_or(0.0);
    let options = ScrollToOptions::new();
    options.set_top(rect.top() + page_offset - SCROLL_OFFSET_PX);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}
