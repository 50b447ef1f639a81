use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent, WheelEvent,
};
use yew::Reducible;
use yew::prelude::*;

use crate::model::GalleryItem;
use crate::state::{ContainerSize, ViewerSession};
use crate::util::{clog, now_ms};

/// Forces a re-render after session mutations that change the markup
/// (open/close, navigation). Gesture mutations skip it and patch the image
/// style directly.
#[derive(PartialEq)]
struct Revision(u32);

impl Reducible for Revision {
    type Action = ();

    fn reduce(self: Rc<Self>, _action: ()) -> Rc<Self> {
        Rc::new(Revision(self.0.wrapping_add(1)))
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct LightboxProps {
    pub items: Rc<Vec<GalleryItem>>,
    /// Index the host wants open, or `None` for closed. Navigation inside
    /// the overlay moves the session without touching this.
    pub selected: Option<usize>,
    pub on_close: Callback<()>,
}

fn touch_points(e: &TouchEvent) -> Vec<(f64, f64)> {
    let list = e.touches();
    let mut points = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(touch) = list.item(i) {
            points.push((touch.client_x() as f64, touch.client_y() as f64));
        }
    }
    points
}

#[function_component(Lightbox)]
pub fn lightbox(props: &LightboxProps) -> Html {
    let container_ref = use_node_ref();
    let image_ref = use_node_ref();
    let session = use_mut_ref(ViewerSession::default);
    let revision = use_reducer(|| Revision(0));
    // Current render-step closure, shared with effects and callbacks the
    // same way the listeners share it.
    let apply_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let raf_id = use_mut_ref(|| None::<i32>);

    // Mount: wire every listener once, build the render step and the
    // momentum loop, tear it all down on unmount.
    {
        let container_ref = container_ref.clone();
        let image_ref = image_ref.clone();
        let session = session.clone();
        let revision = revision.clone();
        let apply_ref_setup = apply_ref.clone();
        let raf_id_setup = raf_id.clone();
        let on_close = props.on_close.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let document = window.document().expect("document");
            let container: HtmlElement = container_ref
                .cast::<HtmlElement>()
                .expect("container_ref not attached to the image container");
            let image: HtmlElement = image_ref
                .cast::<HtmlElement>()
                .expect("image_ref not attached to the modal image");

            // Render step: push the session's transform onto the image and
            // keep the magnified marker class in sync.
            let apply: Rc<dyn Fn()> = {
                let session = session.clone();
                let image = image.clone();
                Rc::new(move || {
                    let s = session.borrow();
                    let _ = image.style().set_property("transform", &s.transform());
                    let class_list = image.class_list();
                    if s.is_magnified() {
                        let _ = class_list.add_1("zoomed");
                    } else {
                        let _ = class_list.remove_1("zoomed");
                    }
                })
            };
            *apply_ref_setup.borrow_mut() = Some(apply.clone());

            // Pan bounds depend on the live container size, so measure on
            // every step rather than caching.
            let measure = {
                let container = container.clone();
                move || -> ContainerSize {
                    let rect = container.get_bounding_client_rect();
                    ContainerSize {
                        width: rect.width(),
                        height: rect.height(),
                    }
                }
            };

            // Momentum loop: a single self-rescheduling animation-frame
            // closure. Each firing is gated on the session's own flag, so a
            // frame left pending by a cancelled run lands as a no-op (or is
            // adopted by a newer run armed before it fired).
            let momentum_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
                Rc::new(RefCell::new(None));
            {
                let session = session.clone();
                let apply = apply.clone();
                let measure = measure.clone();
                let window_loop = window.clone();
                let raf_id = raf_id_setup.clone();
                let momentum_cb_inner = momentum_cb.clone();
                *momentum_cb.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    let keep_going = session.borrow_mut().momentum_step(measure());
                    apply();
                    if keep_going {
                        if let Ok(id) = window_loop.request_animation_frame(
                            momentum_cb_inner
                                .borrow()
                                .as_ref()
                                .unwrap()
                                .as_ref()
                                .unchecked_ref(),
                        ) {
                            *raf_id.borrow_mut() = Some(id);
                        }
                    } else {
                        *raf_id.borrow_mut() = None;
                    }
                })
                    as Box<dyn FnMut()>));
            }

            let start_momentum: Rc<dyn Fn()> = {
                let session = session.clone();
                let window = window.clone();
                let raf_id = raf_id_setup.clone();
                let momentum_cb = momentum_cb.clone();
                Rc::new(move || {
                    if !session.borrow_mut().begin_momentum() {
                        return;
                    }
                    if raf_id.borrow().is_some() {
                        // A pending frame from the previous run picks this
                        // run up.
                        return;
                    }
                    if let Ok(id) = window.request_animation_frame(
                        momentum_cb
                            .borrow()
                            .as_ref()
                            .unwrap()
                            .as_ref()
                            .unchecked_ref(),
                    ) {
                        *raf_id.borrow_mut() = Some(id);
                    }
                })
            };

            // Wheel zoom on the image container.
            let wheel_cb = {
                let session = session.clone();
                let apply = apply.clone();
                Closure::wrap(Box::new(move |e: WheelEvent| {
                    e.prevent_default();
                    session.borrow_mut().wheel_zoom(e.delta_y());
                    apply();
                }) as Box<dyn FnMut(_)>)
            };
            container
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .unwrap();

            // Mouse pan: press on the image, move/release anywhere.
            let mousedown_cb = {
                let session = session.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let started = session.borrow_mut().pan_start(
                        e.client_x() as f64,
                        e.client_y() as f64,
                        now_ms(),
                    );
                    if started {
                        e.prevent_default();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            image
                .add_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref())
                .unwrap();

            let mousemove_cb = {
                let session = session.clone();
                let apply = apply.clone();
                let measure = measure.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let moved = session.borrow_mut().pan_move(
                        e.client_x() as f64,
                        e.client_y() as f64,
                        now_ms(),
                        measure(),
                    );
                    if moved {
                        e.prevent_default();
                        apply();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            document
                .add_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref())
                .unwrap();

            let mouseup_cb = {
                let session = session.clone();
                let start_momentum = start_momentum.clone();
                Closure::wrap(Box::new(move |_e: MouseEvent| {
                    if session.borrow_mut().pan_end() {
                        start_momentum();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            document
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .unwrap();

            // Touch: non-passive so claimed gestures can suppress scrolling.
            let touch_opts = AddEventListenerOptions::new();
            touch_opts.set_passive(false);

            let touchstart_cb = {
                let session = session.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if session
                        .borrow_mut()
                        .touch_start(&touch_points(&e), now_ms())
                    {
                        e.prevent_default();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            image
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "touchstart",
                    touchstart_cb.as_ref().unchecked_ref(),
                    &touch_opts,
                )
                .unwrap();

            let touchmove_cb = {
                let session = session.clone();
                let apply = apply.clone();
                let measure = measure.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let handled =
                        session
                            .borrow_mut()
                            .touch_move(&touch_points(&e), now_ms(), measure());
                    if handled {
                        e.prevent_default();
                        apply();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            document
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "touchmove",
                    touchmove_cb.as_ref().unchecked_ref(),
                    &touch_opts,
                )
                .unwrap();

            let touchend_cb = {
                let session = session.clone();
                let start_momentum = start_momentum.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if session.borrow_mut().touch_end(&touch_points(&e), now_ms()) {
                        start_momentum();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            document
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "touchend",
                    touchend_cb.as_ref().unchecked_ref(),
                    &touch_opts,
                )
                .unwrap();

            // Keyboard: Escape closes, arrows navigate, only while open.
            let keydown_cb = {
                let session = session.clone();
                let revision = revision.clone();
                let apply = apply.clone();
                let on_close = on_close.clone();
                Closure::wrap(Box::new(move |e: KeyboardEvent| {
                    if !session.borrow().is_open() {
                        return;
                    }
                    match e.key().as_str() {
                        "Escape" => {
                            session.borrow_mut().close();
                            apply();
                            revision.dispatch(());
                            on_close.emit(());
                        }
                        "ArrowLeft" => {
                            e.prevent_default();
                            if session.borrow_mut().previous() {
                                apply();
                                revision.dispatch(());
                            }
                        }
                        "ArrowRight" => {
                            e.prevent_default();
                            if session.borrow_mut().next() {
                                apply();
                                revision.dispatch(());
                            }
                        }
                        _ => {}
                    }
                }) as Box<dyn FnMut(_)>)
            };
            document
                .add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref())
                .ok();

            // Cleanup
            let window_clone = window.clone();
            let document_clone = document.clone();
            move || {
                let _ = container.remove_event_listener_with_callback(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                );
                let _ = image.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = document_clone.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = document_clone.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                let _ = image.remove_event_listener_with_callback(
                    "touchstart",
                    touchstart_cb.as_ref().unchecked_ref(),
                );
                let _ = document_clone.remove_event_listener_with_callback(
                    "touchmove",
                    touchmove_cb.as_ref().unchecked_ref(),
                );
                let _ = document_clone.remove_event_listener_with_callback(
                    "touchend",
                    touchend_cb.as_ref().unchecked_ref(),
                );
                let _ = document_clone.remove_event_listener_with_callback(
                    "keydown",
                    keydown_cb.as_ref().unchecked_ref(),
                );
                if let Some(id) = raf_id_setup.borrow_mut().take() {
                    let _ = window_clone.cancel_animation_frame(id);
                }
                let _keep_alive = (
                    &wheel_cb,
                    &mousedown_cb,
                    &mousemove_cb,
                    &mouseup_cb,
                    &touchstart_cb,
                    &touchmove_cb,
                    &touchend_cb,
                    &keydown_cb,
                );
            }
        });
    }

    // Follow the host's selection: open or close the session, re-render the
    // transform, and lock page scroll while the overlay is up.
    {
        let session = session.clone();
        let revision = revision.clone();
        let apply_ref = apply_ref.clone();
        let item_count = props.items.len();
        use_effect_with(props.selected, move |selected| {
            {
                let mut s = session.borrow_mut();
                match *selected {
                    Some(index) => {
                        if s.open(index, item_count) {
                            clog(&format!("lightbox: open image {}", index));
                        }
                    }
                    None => {
                        if s.is_open() {
                            clog("lightbox: closed");
                        }
                        s.close();
                    }
                }
            }
            if let Some(apply) = &*apply_ref.borrow() {
                apply();
            }
            if let Some(body) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.body())
            {
                let overflow = if selected.is_some() { "hidden" } else { "auto" };
                let _ = body.style().set_property("overflow", overflow);
            }
            revision.dispatch(());
            || ()
        });
    }

    let show_prev = {
        let session = session.clone();
        let revision = revision.clone();
        let apply_ref = apply_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if session.borrow_mut().previous() {
                if let Some(apply) = &*apply_ref.borrow() {
                    apply();
                }
                revision.dispatch(());
            }
        })
    };
    let show_next = {
        let session = session.clone();
        let revision = revision.clone();
        let apply_ref = apply_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if session.borrow_mut().next() {
                if let Some(apply) = &*apply_ref.borrow() {
                    apply();
                }
                revision.dispatch(());
            }
        })
    };
    let request_close = {
        let session = session.clone();
        let revision = revision.clone();
        let apply_ref = apply_ref.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            session.borrow_mut().close();
            if let Some(apply) = &*apply_ref.borrow() {
                apply();
            }
            revision.dispatch(());
            on_close.emit(());
        })
    };

    let s = session.borrow();
    let current = s.current_index.and_then(|i| props.items.get(i));
    html! {
        <div id="image-modal" class={classes!("modal", s.is_open().then_some("active"))}>
            <div class="modal__overlay" onclick={request_close.clone()}></div>
            <div class="modal__content">
                <button class="modal__close" onclick={request_close} title="Close">{"×"}</button>
                <button
                    class="modal__nav modal__nav--prev"
                    disabled={s.at_first()}
                    onclick={show_prev}
                >{"‹"}</button>
                <div class="modal__image-container" ref={container_ref}>
                    <img
                        id="modal-image"
                        class="modal__image"
                        ref={image_ref}
                        src={current.map(|item| item.src.clone()).unwrap_or_default()}
                        alt={current.map(|item| item.alt.clone()).unwrap_or_default()}
                    />
                </div>
                <button
                    class="modal__nav modal__nav--next"
                    disabled={s.at_last()}
                    onclick={show_next}
                >{"›"}</button>
            </div>
        </div>
    }
}
