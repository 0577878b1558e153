//! Location picker modal backed by the Google Maps JS API.
//!
//! SYSTEM CONTEXT
//! ==============
//! The maps script is loaded by the HTML shell. When the modal opens it
//! builds a map centred on [`DEFAULT_CENTER`] and reports the first click
//! through `on_pick`, then closes itself after [`CLOSE_DELAY_MS`]. If the
//! script never loaded, a latitude/longitude form is shown instead.

#[cfg(test)]
#[path = "map_modal_test.rs"]
mod map_modal_test;

use leptos::prelude::*;

use crate::net::error::ValidationError;
use crate::net::types::Coordinates;

/// Initial map centre (latitude, longitude).
pub const DEFAULT_CENTER: (f64, f64) = (17.3526, 78.5555);
pub const DEFAULT_ZOOM: u32 = 10;
/// Delay between a pick and the modal closing.
pub const CLOSE_DELAY_MS: u32 = 500;

/// Parse the fallback form's text inputs.
///
/// # Errors
///
/// [`ValidationError::InvalidCoordinates`] for non-numeric or out-of-range input.
pub fn parse_manual(latitude: &str, longitude: &str) -> Result<Coordinates, ValidationError> {
    let lat = latitude.trim().parse::<f64>().map_err(|_| ValidationError::InvalidCoordinates)?;
    let lng = longitude.trim().parse::<f64>().map_err(|_| ValidationError::InvalidCoordinates)?;
    Coordinates::new(lat, lng)
}

#[component]
pub fn MapModal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_pick: Callback<Coordinates>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let map_ref = NodeRef::<leptos::html::Div>::new();
    let maps_unavailable = RwSignal::new(false);
    let lat_input = RwSignal::new(String::new());
    let lng_input = RwSignal::new(String::new());
    let manual_error = RwSignal::new(None::<ValidationError>);

    let pick = move |coords: Coordinates| {
        on_pick.run(coords);
        #[cfg(feature = "hydrate")]
        gloo_timers::callback::Timeout::new(CLOSE_DELAY_MS, move || on_close.run(())).forget();
        #[cfg(not(feature = "hydrate"))]
        on_close.run(());
    };

    #[cfg(feature = "hydrate")]
    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        let Some(container) = map_ref.get() else {
            return;
        };
        let mounted = mount_map(&container, move |lat, lng| match Coordinates::new(lat, lng) {
            Ok(coords) => pick(coords),
            Err(e) => log::warn!("map returned unusable location: {e}"),
        });
        if let Err(e) = mounted {
            log::warn!("google maps unavailable: {e:?}");
            maps_unavailable.set(true);
        }
    });

    let on_manual = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match parse_manual(&lat_input.get(), &lng_input.get()) {
            Ok(coords) => {
                manual_error.set(None);
                pick(coords);
            }
            Err(e) => manual_error.set(Some(e)),
        }
    };

    view! {
        <Show when=move || open.get()>
            <div class="modal-backdrop" on:click=move |_| on_close.run(())>
                <div class="modal" on:click=|ev| ev.stop_propagation()>
                    <header class="modal__header">
                        <h2>"Select Location"</h2>
                        <button class="modal__close" aria-label="Close" on:click=move |_| on_close.run(())>
                            "×"
                        </button>
                    </header>
                    <div class="map-canvas" node_ref=map_ref class:hidden=move || maps_unavailable.get()></div>
                    <Show when=move || maps_unavailable.get()>
                        <form class="manual-location" on:submit=on_manual>
                            <p>"The map could not be loaded. Enter a location instead."</p>
                            <input
                                type="text"
                                inputmode="decimal"
                                placeholder="Latitude"
                                prop:value=move || lat_input.get()
                                on:input=move |ev| lat_input.set(event_target_value(&ev))
                            />
                            <input
                                type="text"
                                inputmode="decimal"
                                placeholder="Longitude"
                                prop:value=move || lng_input.get()
                                on:input=move |ev| lng_input.set(event_target_value(&ev))
                            />
                            <button type="submit" class="button">"Use Location"</button>
                            <Show when=move || manual_error.get().is_some()>
                                <p class="field-error">
                                    {move || manual_error.get().map(ValidationError::message)}
                                </p>
                            </Show>
                        </form>
                    </Show>
                </div>
            </div>
        </Show>
    }
}

/// Build a `google.maps.Map` in `container` and forward clicks as (lat, lng).
#[cfg(feature = "hydrate")]
fn mount_map(
    container: &web_sys::HtmlDivElement,
    on_click: impl Fn(f64, f64) + 'static,
) -> Result<(), wasm_bindgen::JsValue> {
    use js_sys::{Array, Function, Object, Reflect};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let google = Reflect::get(&window, &JsValue::from_str("google"))?;
    if google.is_undefined() {
        return Err(JsValue::from_str("maps script not loaded"));
    }
    let maps = Reflect::get(&google, &JsValue::from_str("maps"))?;
    let map_ctor: Function = Reflect::get(&maps, &JsValue::from_str("Map"))?.dyn_into()?;

    let center = Object::new();
    Reflect::set(&center, &JsValue::from_str("lat"), &JsValue::from_f64(DEFAULT_CENTER.0))?;
    Reflect::set(&center, &JsValue::from_str("lng"), &JsValue::from_f64(DEFAULT_CENTER.1))?;
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("center"), &center)?;
    Reflect::set(&options, &JsValue::from_str("zoom"), &JsValue::from(DEFAULT_ZOOM))?;

    let map = Reflect::construct(&map_ctor, &Array::of2(container, &options))?;
    let add_listener: Function = Reflect::get(&map, &JsValue::from_str("addListener"))?.dyn_into()?;
    let listener = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
        if let Some((lat, lng)) = clicked_lat_lng(&event) {
            on_click(lat, lng);
        }
    });
    add_listener.call2(&map, &JsValue::from_str("click"), listener.as_ref())?;
    // The map owns the listener for the rest of the page's life.
    listener.forget();
    Ok(())
}

#[cfg(feature = "hydrate")]
fn clicked_lat_lng(event: &wasm_bindgen::JsValue) -> Option<(f64, f64)> {
    use js_sys::{Function, Reflect};
    use wasm_bindgen::{JsCast, JsValue};

    let lat_lng = Reflect::get(event, &JsValue::from_str("latLng")).ok()?;
    let read = |name: &str| -> Option<f64> {
        let f: Function = Reflect::get(&lat_lng, &JsValue::from_str(name)).ok()?.dyn_into().ok()?;
        f.call0(&lat_lng).ok()?.as_f64()
    };
    Some((read("lat")?, read("lng")?))
}
