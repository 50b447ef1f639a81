use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

use super::{gallery::Gallery, header::Header, lightbox::Lightbox};
use crate::model::{PREFS_STORAGE_KEY, SiteAction, SitePrefs, SiteState, Theme, default_gallery};

#[function_component(App)]
pub fn app() -> Html {
    let site = use_reducer(SiteState::default);
    let items = use_memo((), |_| default_gallery());
    let selected = use_state(|| None::<usize>);

    // Initial theme: a persisted preference wins, otherwise the system
    // preference. A live system change still overrides the session.
    {
        let site = site.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let stored: Option<Theme> = window
                .local_storage()
                .ok()
                .flatten()
                .and_then(|store| store.get_item(PREFS_STORAGE_KEY).ok().flatten())
                .and_then(|raw| serde_json::from_str::<SitePrefs>(&raw).ok())
                .and_then(|prefs| prefs.theme);
            let query = window
                .match_media("(prefers-color-scheme: dark)")
                .ok()
                .flatten();
            let initial = stored.unwrap_or_else(|| {
                Theme::from_system(query.as_ref().map(|q| q.matches()).unwrap_or(false))
            });
            site.dispatch(SiteAction::SetTheme(initial));

            let change_cb = {
                let site = site.clone();
                Closure::wrap(Box::new(move |e: web_sys::MediaQueryListEvent| {
                    site.dispatch(SiteAction::SetTheme(Theme::from_system(e.matches())));
                }) as Box<dyn FnMut(_)>)
            };
            if let Some(q) = &query {
                let _ = q
                    .add_event_listener_with_callback("change", change_cb.as_ref().unchecked_ref());
            }
            move || {
                if let Some(q) = &query {
                    let _ = q.remove_event_listener_with_callback(
                        "change",
                        change_cb.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    // Apply the active theme to <body> and persist it.
    {
        let theme = site.theme;
        use_effect_with(theme, move |theme| {
            if let Some(body) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.body())
            {
                let class_list = body.class_list();
                match theme.body_class() {
                    Some(class) => {
                        let _ = class_list.add_1(class);
                    }
                    None => {
                        let _ = class_list.remove_1("dark-theme");
                    }
                }
            }
            if let Some(store) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
                let prefs = SitePrefs {
                    theme: Some(*theme),
                };
                if let Ok(raw) = serde_json::to_string(&prefs) {
                    let _ = store.set_item(PREFS_STORAGE_KEY, &raw);
                }
            }
            || ()
        });
    }

    let on_select = {
        let selected = selected.clone();
        Callback::from(move |index: usize| selected.set(Some(index)))
    };
    let on_close = {
        let selected = selected.clone();
        Callback::from(move |_| selected.set(None))
    };
    let on_toggle_theme = {
        let site = site.clone();
        Callback::from(move |_| site.dispatch(SiteAction::ToggleTheme))
    };

    html! {
        <>
            <Header theme={site.theme} on_toggle_theme={on_toggle_theme} />
            <main>
                <section id="about" class="about">
                    <h1>{"Field Notes"}</h1>
                    <p>{"A season of small journeys, photographed along the way. \
                        Click any picture to view it full size, scroll or pinch \
                        to zoom, and drag to look around."}</p>
                </section>
                <Gallery items={items.clone()} on_select={on_select} />
                <section id="contact" class="contact">
                    <h2>{"Contact"}</h2>
                    <p>{"prints@fieldnotes.example"}</p>
                </section>
            </main>
            <Lightbox items={items.clone()} selected={*selected} on_close={on_close} />
        </>
    }
}
