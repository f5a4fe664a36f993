//! Main module for the Topic Wheel application using Yew.
//! Wires the spin controller, the DOM presenter and the view components.

use gloo_timers::callback::Timeout;
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use topic_wheel::config::{RESIZE_DEBOUNCE_MS, TOPICS_CSV};
use topic_wheel::controller::WheelView;
use topic_wheel::{read_topics_from_csv_string, run_spin, Presenter, SpinController, TopicRegistry};
use yew::prelude::*;

mod components;
mod hooks;
mod presenter;

use components::{HistoryPanel, Legend, WheelFace};
use hooks::use_window_resize;
use presenter::DomPresenter;

fn load_registry() -> TopicRegistry {
    let registry = read_topics_from_csv_string(TOPICS_CSV).unwrap_or_else(|e| {
        warn!("Falling back to an empty wheel: {}", e);
        TopicRegistry::default()
    });
    if registry.is_empty() {
        warn!("No topics configured, the wheel starts exhausted");
    }
    registry
}

/// Measure the wheel and redraw if its size changed.
fn relayout(controller: &RefCell<SpinController>, presenter: &DomPresenter) {
    let Some(diameter) = presenter.wheel_diameter() else {
        return;
    };
    if controller.borrow_mut().resize(diameter).is_some() {
        debug!("Wheel resized to {}px", diameter);
        let view = controller.borrow().view();
        presenter.render(&view);
    }
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring state, effects, and UI elements.
#[function_component(Main)]
fn main_component() -> Html {
    let controller: Rc<RefCell<SpinController>> =
        use_mut_ref(|| SpinController::new(load_registry()));

    let view = {
        let controller = controller.clone();
        use_state(move || Rc::new(controller.borrow().view()))
    };
    let status = {
        let controller = controller.clone();
        use_state(move || controller.borrow().status_text().to_string())
    };
    let trigger_enabled = {
        let controller = controller.clone();
        use_state(move || controller.borrow().trigger_enabled())
    };
    let wheel_ref = use_node_ref();
    // Pending resize measurement; replacing it cancels the previous one
    let resize_timer = use_mut_ref(|| None::<Timeout>);

    let presenter = {
        let wheel_ref = wheel_ref.clone();
        let view = view.setter();
        let status = status.setter();
        let trigger_enabled = trigger_enabled.setter();
        use_memo((), move |_| DomPresenter::new(wheel_ref, view, status, trigger_enabled))
    };

    // Measure the wheel once it is mounted
    {
        let controller = controller.clone();
        let presenter = presenter.clone();
        use_effect_with((), move |_| {
            relayout(&controller, &presenter);
        });
    }

    {
        let controller = controller.clone();
        let presenter = presenter.clone();
        let on_resize = Callback::from(move |_: ()| {
            let controller = controller.clone();
            let presenter = presenter.clone();
            let handle = Timeout::new(RESIZE_DEBOUNCE_MS, move || relayout(&controller, &presenter));
            *resize_timer.borrow_mut() = Some(handle);
        });
        use_window_resize(on_resize);
    }

    let on_spin = {
        let controller = controller.clone();
        let presenter = presenter.clone();
        Callback::from(move |_: MouseEvent| {
            let controller = controller.clone();
            let presenter = presenter.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let mut rng = rand::rng();
                if let Err(e) = run_spin(&controller, &*presenter, &mut rng).await {
                    debug!("Spin not started: {}", e);
                }
            });
        })
    };

    let disabled = !*trigger_enabled;
    let view: Rc<WheelView> = (*view).clone();

    html! {
        <div class="container">
            <h1>{ "Topic Wheel" }</h1>
            <div class="wheel-area">
                <div class="wheel-wrap">
                    <div class="pointer" aria-hidden="true"></div>
                    <div class="wheel" ref={wheel_ref}>
                        <WheelFace view={view.clone()} />
                    </div>
                </div>
                <div class="controls">
                    <button class="btn-primary spin-button"
                        onclick={on_spin}
                        disabled={disabled}
                        aria-disabled={disabled.to_string()}
                    >
                        { "Spin" }
                    </button>
                    <p class="status" aria-live="polite">{ (*status).clone() }</p>
                </div>
            </div>
            <div class="side-panels">
                <Legend view={view.clone()} />
                <HistoryPanel view={view} />
            </div>
        </div>
    }
}

/// Entry point: initializes Yew renderer for the Main component.
fn main() {
    // Set the panic hook to log detailed errors to the console
    console_error_panic_hook::set_once();
    yew::Renderer::<Main>::new().render();
}
