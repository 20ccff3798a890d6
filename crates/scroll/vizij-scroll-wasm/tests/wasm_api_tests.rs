#![cfg(target_arch = "wasm32")]
use js_sys::Function;
use serde::Serialize;
use serde_json::{json, Value};
use serde_wasm_bindgen as swb;
use vizij_scroll_wasm::{
    abi_version, preset_names, resolve_reveal, VizijCounter, VizijProgressRing, VizijRipple,
    VizijScroll,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Plain JS objects (not `Map`s), as a page would pass them.
fn js(v: Value) -> JsValue {
    v.serialize(&swb::Serializer::json_compatible()).unwrap()
}

fn num(v: &Value) -> Option<f64> {
    v.as_f64()
}

fn rect_fn(x: f32, y: f32, w: f32, h: f32) -> Function {
    Function::new_no_args(&format!(
        "return {{ x: {x}, y: {y}, width: {w}, height: {h} }};"
    ))
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults_and_rejects_bad_config() {
    assert!(VizijScroll::new(JsValue::UNDEFINED, false).is_ok());
    assert!(VizijScroll::new(js(json!({ "quiet_ms": -1.0 })), false).is_err());
}

#[wasm_bindgen_test]
fn reveal_round_trip_through_frame() {
    let mut fx = VizijScroll::new(JsValue::NULL, false).unwrap();
    let el = fx
        .observe(rect_fn(0.0, 100.0, 200.0, 200.0), js(json!("once")), None)
        .unwrap();
    fx.reveal(js(json!("fadeUp")), el, JsValue::UNDEFINED).unwrap();

    let viewport = js(json!({ "x": 0, "y": 0, "width": 800, "height": 600 }));
    let out: Value = swb::from_value(fx.frame(0.0, viewport.clone()).unwrap()).unwrap();
    assert_eq!(num(&out["changes"][0]["element"]), Some(el as f64));
    assert_eq!(num(&out["changes"][0]["style"]["opacity"]), Some(0.0));
    assert!(fx.is_animating(100.0));

    let out: Value = swb::from_value(fx.frame(700.0, viewport).unwrap()).unwrap();
    assert_eq!(num(&out["changes"][0]["style"]["opacity"]), Some(1.0));
    assert!(!fx.is_animating(700.0));
}

#[wasm_bindgen_test]
fn unknown_preset_is_an_error() {
    let mut fx = VizijScroll::new(JsValue::NULL, false).unwrap();
    assert!(fx
        .add_reveal_group(js(json!("wobble")), JsValue::UNDEFINED)
        .is_err());
}

#[wasm_bindgen_test]
fn scroll_state_reflects_on_scroll() {
    let mut fx = VizijScroll::new(JsValue::NULL, false).unwrap();
    assert!(!fx.on_scroll(0.0, JsValue::NULL).unwrap());
    assert!(fx.on_scroll(1.0, js(json!({ "offset": 320.0 }))).unwrap());
    let state: Value = swb::from_value(fx.scroll_state().unwrap()).unwrap();
    assert_eq!(num(&state["offset"]), Some(320.0));
    assert_eq!(state["is_active"], json!(true));
}

#[wasm_bindgen_test]
fn stateless_helpers() {
    assert!(preset_names().contains(&"fade-up".to_string()));
    let style: Value =
        swb::from_value(resolve_reveal(js(json!("fade-in")), None, true).unwrap()).unwrap();
    assert_eq!(num(&style["opacity"]), Some(1.0));
}

#[wasm_bindgen_test]
fn widgets() {
    let mut counter = VizijCounter::new(0.0, 42.0, 1000.0);
    counter.start(0.0);
    assert_eq!(counter.sample(1000.0, false), 42.0);

    let mut ring = VizijProgressRing::new(js(json!("speedometer")), JsValue::UNDEFINED).unwrap();
    ring.set_target(100.0);
    assert_eq!(ring.tick(false), 10.0);

    let mut ripple = VizijRipple::new(None);
    let bounds = js(json!({ "x": 0, "y": 0, "width": 100, "height": 40 }));
    let id = ripple.press(10.0, 10.0, bounds.clone(), 0.0, false).unwrap();
    assert_eq!(ripple.prune(600.0), vec![id]);
    assert!(ripple.press(10.0, 10.0, bounds, 0.0, true).is_none());
}
