//! DOM side of the wheel: Yew state setters for the declarative parts and direct
//! style writes for the rotation, which Yew never renders.

use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use topic_wheel::config::IDLE_TRANSITION_SEC;
use topic_wheel::controller::{SpinCompletion, WheelView};
use topic_wheel::utils::{rotate_css, spin_frame_styles, transition_css};
use topic_wheel::Presenter;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlElement, TransitionEvent};
use yew::{NodeRef, UseStateSetter};

type TransitionListener = Closure<dyn FnMut(TransitionEvent)>;

pub struct DomPresenter {
    wheel: NodeRef,
    view: UseStateSetter<Rc<WheelView>>,
    status: UseStateSetter<String>,
    trigger: UseStateSetter<bool>,
    transition_listener: RefCell<Option<TransitionListener>>,
}

impl DomPresenter {
    pub fn new(
        wheel: NodeRef,
        view: UseStateSetter<Rc<WheelView>>,
        status: UseStateSetter<String>,
        trigger: UseStateSetter<bool>,
    ) -> Self {
        Self {
            wheel,
            view,
            status,
            trigger,
            transition_listener: RefCell::new(None),
        }
    }

    fn wheel_element(&self) -> Option<HtmlElement> {
        self.wheel.cast::<HtmlElement>()
    }

    /// Rendered width of the wheel in px, if it is mounted.
    pub fn wheel_diameter(&self) -> Option<f64> {
        self.wheel_element().map(|el| el.offset_width() as f64)
    }

    fn detach_listener(&self) {
        let Some(listener) = self.transition_listener.borrow_mut().take() else {
            return;
        };
        if let Some(wheel) = self.wheel_element() {
            let _ = wheel
                .remove_event_listener_with_callback("transitionend", listener.as_ref().unchecked_ref());
        }
    }
}

/// Run `f` on the next animation frame.
fn next_frame(f: impl FnOnce() + 'static) {
    let frame = Closure::once_into_js(f);
    if gloo_utils::window()
        .request_animation_frame(frame.unchecked_ref::<js_sys::Function>())
        .is_err()
    {
        warn!("requestAnimationFrame unavailable");
    }
}

impl Presenter for DomPresenter {
    fn render(&self, view: &WheelView) {
        self.view.set(Rc::new(view.clone()));
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        self.trigger.set(enabled);
    }

    fn set_status_text(&self, text: &str) {
        self.status.set(text.to_string());
    }

    fn animate_rotation(&self, from_deg: f64, to_deg: f64, duration_secs: f64) -> SpinCompletion {
        let Some(wheel) = self.wheel_element() else {
            warn!("Wheel element is not mounted, landing without animation");
            return SpinCompletion::ready();
        };
        self.detach_listener();

        let (signal, completion) = SpinCompletion::pair();
        let own_target: EventTarget = wheel.clone().into();
        let listener = TransitionListener::new(move |event: TransitionEvent| {
            // transitions on the labels bubble up here too
            let from_wheel = event.target().is_some_and(|t| t == own_target);
            if from_wheel && event.property_name() == "transform" && signal.fire() {
                debug!("Wheel transition finished");
            }
        });
        if let Err(e) =
            wheel.add_event_listener_with_callback("transitionend", listener.as_ref().unchecked_ref())
        {
            warn!("Could not listen for transitionend: {:?}", e);
            return SpinCompletion::ready();
        }
        *self.transition_listener.borrow_mut() = Some(listener);

        debug!("Animating {:.2}° → {:.2}° over {:.1}s", from_deg, to_deg, duration_secs);
        // runs after any idle transition a previous snap queued for this frame
        let styles = spin_frame_styles(to_deg, duration_secs);
        next_frame(move || {
            let style = wheel.style();
            for (property, value) in &styles {
                let _ = style.set_property(property, value);
            }
        });

        completion
    }

    fn snap_rotation(&self, deg: f64) {
        self.detach_listener();
        let Some(wheel) = self.wheel_element() else {
            return;
        };
        let style = wheel.style();
        let _ = style.set_property("transition", "none");
        let _ = style.set_property("transform", &rotate_css(deg));
        // force a style flush so the jump is applied before transitions come back
        let _ = wheel.offset_width();
        next_frame(move || {
            let _ = wheel
                .style()
                .set_property("transition", &transition_css(IDLE_TRANSITION_SEC));
        });
    }
}
