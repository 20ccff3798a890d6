use js_sys::{Function, Reflect};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_scroll_core::{
    reveal, AnimatedCounter, ArcKind, BoundsProvider, Config, DescriptorSource, ElementId,
    GroupId, MagneticButton, NoScroll, ObservationMode, Outputs, ParallaxBinding, Point, Preset,
    ProgressRing, Rect, RevealSignal, RevealTrigger, RippleButton, ScrollFx, ScrollFxError,
    ScrollMetrics, TypewriterId,
};

#[wasm_bindgen]
pub struct VizijScroll {
    core: ScrollFx,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn core_error(context: &str, e: ScrollFxError) -> JsError {
    JsError::new(&format!("{context} error: {e}"))
}

fn number_field(obj: &JsValue, key: &str) -> Option<f32> {
    Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .map(|n| n as f32)
}

/// Read `{x, y, width, height}` from a plain object or a `DOMRect`.
/// Getter-backed properties are read through `Reflect`, which serde cannot see.
fn read_rect(v: &JsValue) -> Option<Rect> {
    if jsvalue_is_undefined_or_null(v) {
        return None;
    }
    Some(Rect::new(
        number_field(v, "x")?,
        number_field(v, "y")?,
        number_field(v, "width")?,
        number_field(v, "height")?,
    ))
}

/// Bounds supplied by a JS callback, typically
/// `() => el.getBoundingClientRect()`. A throw or a null result means the
/// element has no layout yet.
struct JsBounds {
    f: Function,
}

impl BoundsProvider for JsBounds {
    fn bounds(&self) -> Option<Rect> {
        match self.f.call0(&JsValue::UNDEFINED) {
            Ok(val) => read_rect(&val),
            Err(_) => None,
        }
    }
}

fn parse_mode(mode: JsValue) -> Result<ObservationMode, JsError> {
    if jsvalue_is_undefined_or_null(&mode) {
        return Ok(ObservationMode::default());
    }
    swb::from_value(mode).map_err(|e| JsError::new(&format!("observation mode error: {e}")))
}

fn parse_source(source: JsValue) -> Result<DescriptorSource, JsError> {
    if jsvalue_is_undefined_or_null(&source) {
        return Err(JsError::new("descriptor is null/undefined"));
    }
    swb::from_value(source).map_err(|e| JsError::new(&format!("descriptor parse error: {e}")))
}

fn parse_trigger(trigger: JsValue, fallback: ElementId) -> Result<RevealTrigger, JsError> {
    if jsvalue_is_undefined_or_null(&trigger) {
        return Ok(RevealTrigger::Element(fallback));
    }
    swb::from_value(trigger).map_err(|e| JsError::new(&format!("trigger parse error: {e}")))
}

fn to_js<T: serde::Serialize>(context: &str, value: &T) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{context} error: {e}")))
}

#[wasm_bindgen]
impl VizijScroll {
    /// Create a coordinator. Pass a JSON config object or undefined/null for
    /// defaults, plus the current `prefers-reduced-motion` match.
    /// Example:
    ///   new VizijScroll({ throttle_ms: 16 }, matchMedia("(prefers-reduced-motion: reduce)").matches)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, reduced_motion: bool) -> Result<VizijScroll, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let core = ScrollFx::new(cfg, reduced_motion).map_err(|e| core_error("config", e))?;
        Ok(VizijScroll { core })
    }

    /// Forward a media-query change. Takes effect on the next `frame`.
    #[wasm_bindgen(js_name = set_reduced_motion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.core.set_reduced_motion(reduced);
    }

    #[wasm_bindgen(js_name = is_reduced_motion)]
    pub fn is_reduced_motion(&self) -> bool {
        self.core.is_reduced_motion()
    }

    /// Feed one raw scroll event. `metrics` is
    /// `{ offset, viewport_height?, content_height? }`, or null when the host
    /// has no scrollable viewport. Returns true if state was recomputed.
    #[wasm_bindgen(js_name = on_scroll)]
    pub fn on_scroll(&mut self, now: f64, metrics: JsValue) -> Result<bool, JsError> {
        if jsvalue_is_undefined_or_null(&metrics) {
            return Ok(self.core.on_scroll(now, &NoScroll));
        }
        let m: ScrollMetrics = swb::from_value(metrics)
            .map_err(|e| JsError::new(&format!("scroll metrics error: {e}")))?;
        Ok(self.core.on_scroll(now, &m))
    }

    /// Current scroll state as `{ offset, direction, velocity, is_active, progress }`.
    #[wasm_bindgen(js_name = scroll_state)]
    pub fn scroll_state(&self) -> Result<JsValue, JsError> {
        to_js("scroll state", &self.core.scroll_state())
    }

    /// Earliest time a pending timer needs a frame, or undefined.
    #[wasm_bindgen(js_name = next_deadline)]
    pub fn next_deadline(&mut self) -> Option<f64> {
        self.core.next_deadline()
    }

    /// True while a reveal transition or typewriter is still running.
    #[wasm_bindgen(js_name = is_animating)]
    pub fn is_animating(&self, now: f64) -> bool {
        self.core.is_animating(now)
    }

    /// Observe an element. `bounds` is called on every frame and must return
    /// a rect-like object or null. `mode` is "once" (default) or "repeating".
    /// Returns an element id (u32).
    #[wasm_bindgen]
    pub fn observe(
        &mut self,
        bounds: Function,
        mode: JsValue,
        threshold: Option<f32>,
    ) -> Result<u32, JsError> {
        let mode = parse_mode(mode)?;
        let id = self
            .core
            .observe(Box::new(JsBounds { f: bounds }), mode, threshold)
            .map_err(|e| core_error("observe", e))?;
        Ok(id.0)
    }

    /// Forget an element and everything attached to it.
    #[wasm_bindgen(js_name = remove_element)]
    pub fn remove_element(&mut self, element: u32) -> bool {
        self.core.remove_element(ElementId(element))
    }

    /// Create a reveal group from a preset name (`"fade-up"`, `"fadeUp"`), a
    /// preset with overrides, or a literal descriptor. Returns a group id.
    #[wasm_bindgen(js_name = add_reveal_group)]
    pub fn add_reveal_group(&mut self, source: JsValue, mode: JsValue) -> Result<u32, JsError> {
        let source = parse_source(source)?;
        let mode = parse_mode(mode)?;
        let id = self
            .core
            .add_reveal_group(&source, mode)
            .map_err(|e| core_error("add_reveal_group", e))?;
        Ok(id.0)
    }

    /// Append a child to a group. `trigger` defaults to the element's own
    /// visibility; `{ "scroll-progress": 0.5 }` fires on page progress instead.
    /// Returns the child's stagger index.
    #[wasm_bindgen(js_name = add_reveal_child)]
    pub fn add_reveal_child(
        &mut self,
        group: u32,
        element: u32,
        trigger: JsValue,
    ) -> Result<u32, JsError> {
        let element = ElementId(element);
        let trigger = parse_trigger(trigger, element)?;
        let index = self
            .core
            .add_reveal_child(GroupId(group), element, trigger)
            .map_err(|e| core_error("add_reveal_child", e))?;
        Ok(index as u32)
    }

    /// One-element reveal shorthand. Returns the new group id.
    #[wasm_bindgen]
    pub fn reveal(&mut self, source: JsValue, element: u32, mode: JsValue) -> Result<u32, JsError> {
        let source = parse_source(source)?;
        let mode = parse_mode(mode)?;
        let id = self
            .core
            .reveal(&source, ElementId(element), mode)
            .map_err(|e| core_error("reveal", e))?;
        Ok(id.0)
    }

    #[wasm_bindgen(js_name = remove_reveal_group)]
    pub fn remove_reveal_group(&mut self, group: u32) -> bool {
        self.core.remove_reveal_group(GroupId(group))
    }

    /// Bind a parallax background: `{ element, speed_factor, overlay?: { color?, opacity } }`.
    #[wasm_bindgen(js_name = add_parallax)]
    pub fn add_parallax(&mut self, binding: JsValue) -> Result<u32, JsError> {
        let binding: ParallaxBinding = swb::from_value(binding)
            .map_err(|e| JsError::new(&format!("parallax binding error: {e}")))?;
        let id = self
            .core
            .add_parallax(binding)
            .map_err(|e| core_error("add_parallax", e))?;
        Ok(id.0)
    }

    #[wasm_bindgen(js_name = remove_parallax)]
    pub fn remove_parallax(&mut self, binding: u32) -> bool {
        self.core
            .remove_parallax(vizij_scroll_core::BindingId(binding))
    }

    /// Typewriter started by `trigger` (`{ "element": id }` or
    /// `{ "scroll-progress": p }`). Returns a typewriter id.
    #[wasm_bindgen(js_name = add_typewriter)]
    pub fn add_typewriter(
        &mut self,
        text: String,
        interval_ms: f64,
        trigger: JsValue,
    ) -> Result<u32, JsError> {
        let trigger: RevealTrigger = swb::from_value(trigger)
            .map_err(|e| JsError::new(&format!("trigger parse error: {e}")))?;
        let id = self
            .core
            .add_typewriter(text, interval_ms, trigger)
            .map_err(|e| core_error("add_typewriter", e))?;
        Ok(id.0)
    }

    #[wasm_bindgen(js_name = cancel_typewriter)]
    pub fn cancel_typewriter(&mut self, id: u32) -> bool {
        self.core.cancel_typewriter(TypewriterId(id))
    }

    /// Whether the typewriter is still typing (hosts show a caret meanwhile).
    #[wasm_bindgen(js_name = is_typing)]
    pub fn is_typing(&self, id: u32) -> bool {
        self.core
            .typewriter(TypewriterId(id))
            .is_some_and(|t| t.is_typing())
    }

    #[wasm_bindgen(js_name = start_monitor)]
    pub fn start_monitor(&mut self, now: f64) {
        self.core.start_monitor(now);
    }

    #[wasm_bindgen(js_name = stop_monitor)]
    pub fn stop_monitor(&mut self) {
        self.core.stop_monitor();
    }

    #[wasm_bindgen]
    pub fn fps(&self) -> Option<u32> {
        self.core.fps()
    }

    /// Run one animation frame. `viewport` is a rect-like object or null.
    /// Returns Outputs JSON with only what changed this frame.
    #[wasm_bindgen]
    pub fn frame(&mut self, now: f64, viewport: JsValue) -> Result<JsValue, JsError> {
        let viewport = read_rect(&viewport);
        let out: &Outputs = self.core.frame(now, viewport);
        to_js("outputs", out)
    }

    /// Cancel timers and typewriters ahead of page teardown.
    #[wasm_bindgen]
    pub fn shutdown(&mut self) {
        self.core.shutdown();
    }
}

/// Style for a single unstaggered reveal. `visible_for_ms` is undefined
/// while the element has not been seen.
#[wasm_bindgen(js_name = resolve_reveal)]
pub fn resolve_reveal(
    source: JsValue,
    visible_for_ms: Option<f64>,
    reduced_motion: bool,
) -> Result<JsValue, JsError> {
    let source = parse_source(source)?;
    let signal = match visible_for_ms {
        Some(ms) => RevealSignal::VisibleFor(ms),
        None => RevealSignal::NotVisible,
    };
    let style = reveal::resolve(&source, signal, reduced_motion)
        .map_err(|e| core_error("resolve_reveal", e))?;
    to_js("style", &style)
}

/// Canonical names of the built-in presets.
#[wasm_bindgen(js_name = preset_names)]
pub fn preset_names() -> Vec<String> {
    Preset::all().map(|p| p.name().to_string()).collect()
}

#[wasm_bindgen]
pub struct VizijCounter {
    inner: AnimatedCounter,
}

#[wasm_bindgen]
impl VizijCounter {
    #[wasm_bindgen(constructor)]
    pub fn new(from: f64, target: f64, duration_ms: f64) -> VizijCounter {
        VizijCounter {
            inner: AnimatedCounter::from_value(from as i64, target as i64, duration_ms),
        }
    }

    pub fn start(&mut self, now: f64) {
        self.inner.start(now);
    }

    pub fn retarget(&mut self, target: f64, now: f64) {
        self.inner.retarget(target as i64, now);
    }

    pub fn sample(&mut self, now: f64, reduced_motion: bool) -> f64 {
        self.inner.sample(now, reduced_motion) as f64
    }

    #[wasm_bindgen(js_name = is_done)]
    pub fn is_done(&self, now: f64) -> bool {
        self.inner.is_done(now)
    }
}

#[wasm_bindgen]
pub struct VizijProgressRing {
    inner: ProgressRing,
}

#[wasm_bindgen]
impl VizijProgressRing {
    /// `kind` is "ring" (default) or "speedometer".
    #[wasm_bindgen(constructor)]
    pub fn new(kind: JsValue, config: JsValue) -> Result<VizijProgressRing, JsError> {
        let kind: ArcKind = if jsvalue_is_undefined_or_null(&kind) {
            ArcKind::default()
        } else {
            swb::from_value(kind).map_err(|e| JsError::new(&format!("arc kind error: {e}")))?
        };
        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        Ok(VizijProgressRing {
            inner: ProgressRing::new(kind, &cfg),
        })
    }

    #[wasm_bindgen(js_name = set_target)]
    pub fn set_target(&mut self, percent: f32) {
        self.inner.set_target(percent);
    }

    pub fn tick(&mut self, reduced_motion: bool) -> f32 {
        self.inner.tick(reduced_motion)
    }

    pub fn value(&self) -> f32 {
        self.inner.value()
    }

    #[wasm_bindgen(js_name = is_settled)]
    pub fn is_settled(&self) -> bool {
        self.inner.is_settled()
    }

    #[wasm_bindgen(js_name = sweep_degrees)]
    pub fn sweep_degrees(&self) -> f32 {
        self.inner.sweep_degrees()
    }

    #[wasm_bindgen(js_name = dash_offset)]
    pub fn dash_offset(&self, arc_length: f32) -> f32 {
        self.inner.dash_offset(arc_length)
    }
}

#[wasm_bindgen]
pub struct VizijRipple {
    inner: RippleButton,
}

#[wasm_bindgen]
impl VizijRipple {
    #[wasm_bindgen(constructor)]
    pub fn new(decay_ms: Option<f64>) -> VizijRipple {
        let decay = decay_ms.unwrap_or(Config::default().ripple_decay_ms);
        VizijRipple {
            inner: RippleButton::with_decay(decay),
        }
    }

    /// Record a press. Returns the ripple id, or undefined under reduced motion
    /// or when `bounds` is not rect-like.
    pub fn press(
        &mut self,
        x: f32,
        y: f32,
        bounds: JsValue,
        now: f64,
        reduced_motion: bool,
    ) -> Option<u32> {
        let bounds = read_rect(&bounds)?;
        self.inner
            .press(Point::new(x, y), bounds, now, reduced_motion)
    }

    /// Ids of ripples that expired by `now`.
    pub fn prune(&mut self, now: f64) -> Vec<u32> {
        self.inner.prune(now)
    }

    pub fn active(&self) -> Result<JsValue, JsError> {
        to_js("ripples", &self.inner.active())
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

#[wasm_bindgen]
pub struct VizijMagnetic {
    inner: MagneticButton,
}

#[wasm_bindgen]
impl VizijMagnetic {
    #[wasm_bindgen(constructor)]
    pub fn new(strength: Option<f32>) -> VizijMagnetic {
        let strength = strength.unwrap_or(Config::default().magnetic_strength);
        VizijMagnetic {
            inner: MagneticButton::new(strength),
        }
    }

    /// Returns the new `{ x, y }` offset.
    #[wasm_bindgen(js_name = pointer_move)]
    pub fn pointer_move(
        &mut self,
        x: f32,
        y: f32,
        bounds: JsValue,
        reduced_motion: bool,
    ) -> Result<JsValue, JsError> {
        let bounds = read_rect(&bounds).ok_or_else(|| JsError::new("bounds must be rect-like"))?;
        let offset = self
            .inner
            .pointer_move(Point::new(x, y), bounds, reduced_motion);
        to_js("offset", &offset)
    }

    #[wasm_bindgen(js_name = pointer_leave)]
    pub fn pointer_leave(&mut self) -> Result<JsValue, JsError> {
        to_js("offset", &self.inner.pointer_leave())
    }

    pub fn css(&self) -> String {
        self.inner.to_css()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
