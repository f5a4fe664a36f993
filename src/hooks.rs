use wasm_bindgen::prelude::*;
use web_sys::Event;
use yew::prelude::*;

/// Emit `on_resize` whenever the browser window is resized, for the lifetime of the component.
#[hook]
pub fn use_window_resize(on_resize: Callback<()>) {
    use_effect_with((), move |_| {
        let window = gloo_utils::window();
        let listener = Closure::<dyn FnMut(Event)>::new(move |_: Event| on_resize.emit(()));
        let registered = window
            .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            .is_ok();

        // Remove the listener before the closure is dropped
        move || {
            if registered {
                let _ = window
                    .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
            }
            drop(listener);
        }
    });
}
