//! Coordinator owning every scroll-effect component.
//!
//! The host calls `on_scroll` from its scroll listener and `frame` once per
//! animation frame. `frame` runs the pipeline in a fixed order:
//! gate → scroll timers → visibility → reveals → typewriters → parallax →
//! frame-rate monitor, and returns only what changed.

use hashbrown::HashMap;

use crate::config::Config;
use crate::error::{Result, ScrollFxError};
use crate::geometry::Rect;
use crate::ids::{BindingId, ElementId, GroupId, IdAllocator, SubscriptionId, TypewriterId};
use crate::motion::MotionGate;
use crate::outputs::{FxEvent, Outputs};
use crate::parallax::{ParallaxBinding, ParallaxEngine};
use crate::perf::PerformanceMonitor;
use crate::preset::DescriptorSource;
use crate::reveal::{RevealScheduler, RevealTrigger, Signals};
use crate::scroll::{ScrollPublisher, ScrollSource, ScrollState, ScrollSubscriber};
use crate::typewriter::Typewriter;
use crate::visibility::{BoundsProvider, ObservationMode, VisibilityController};

#[derive(Debug)]
struct TypewriterEntry {
    typewriter: Typewriter,
    trigger: RevealTrigger,
    finished: bool,
}

#[derive(Debug)]
pub struct ScrollFx {
    cfg: Config,
    gate: MotionGate,
    scroll: ScrollPublisher,
    last_scroll: ScrollState,
    visibility: VisibilityController,
    reveals: RevealScheduler,
    parallax: ParallaxEngine,
    ids: IdAllocator,
    typewriters: HashMap<TypewriterId, TypewriterEntry>,
    typewriter_order: Vec<TypewriterId>,
    perf: PerformanceMonitor,
    outputs: Outputs,
}

impl ScrollFx {
    /// Create a coordinator. `reduced_motion` is the preference read at startup.
    pub fn new(cfg: Config, reduced_motion: bool) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            gate: MotionGate::new(reduced_motion),
            scroll: ScrollPublisher::new(&cfg),
            last_scroll: ScrollState::STATIC,
            visibility: VisibilityController::new(),
            reveals: RevealScheduler::new(),
            parallax: ParallaxEngine::new(&cfg),
            ids: IdAllocator::new(),
            typewriters: HashMap::new(),
            typewriter_order: Vec::new(),
            perf: PerformanceMonitor::new(cfg.fps_window_ms),
            outputs: Outputs::default(),
            cfg,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn scroll(&self) -> &ScrollPublisher {
        &self.scroll
    }

    pub fn visibility(&self) -> &VisibilityController {
        &self.visibility
    }

    pub fn reveals(&self) -> &RevealScheduler {
        &self.reveals
    }

    pub fn parallax(&self) -> &ParallaxEngine {
        &self.parallax
    }

    pub fn gate(&self) -> &MotionGate {
        &self.gate
    }

    pub fn is_reduced_motion(&self) -> bool {
        self.gate.is_reduced()
    }

    /// Queue a reduced-motion preference change; applied on the next frame.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.gate.notify_change(reduced);
    }

    // --- scroll -----------------------------------------------------------

    pub fn on_scroll(&mut self, now: f64, source: &dyn ScrollSource) -> bool {
        self.scroll.sample(now, source)
    }

    pub fn subscribe_scroll(&mut self, subscriber: ScrollSubscriber) -> SubscriptionId {
        self.scroll.subscribe(subscriber)
    }

    pub fn unsubscribe_scroll(&mut self, id: SubscriptionId) -> bool {
        self.scroll.unsubscribe(id)
    }

    /// Earliest time a timer needs `frame` to run even without new input.
    pub fn next_deadline(&mut self) -> Option<f64> {
        self.scroll.next_deadline()
    }

    // --- elements ---------------------------------------------------------

    /// Track an element. `threshold` falls back to `Config::default_threshold`.
    pub fn observe(
        &mut self,
        bounds: Box<dyn BoundsProvider>,
        mode: ObservationMode,
        threshold: Option<f32>,
    ) -> Result<ElementId> {
        let threshold = threshold.unwrap_or(self.cfg.default_threshold);
        self.visibility.register(bounds, mode, threshold)
    }

    /// Tear down everything attached to `element`: observation, reveal
    /// children, parallax bindings and typewriters it triggers.
    pub fn remove_element(&mut self, element: ElementId) -> bool {
        let known = self.visibility.unregister(element);
        self.reveals.remove_element(element);
        self.parallax.remove_element(element);
        let doomed: Vec<TypewriterId> = self
            .typewriter_order
            .iter()
            .copied()
            .filter(|id| {
                self.typewriters
                    .get(id)
                    .is_some_and(|e| e.trigger == RevealTrigger::Element(element))
            })
            .collect();
        for id in doomed {
            self.cancel_typewriter(id);
        }
        known
    }

    fn require_element(&self, element: ElementId) -> Result<()> {
        if self.visibility.contains(element) {
            Ok(())
        } else {
            Err(ScrollFxError::UnknownElement { id: element.0 })
        }
    }

    fn require_trigger(&self, trigger: RevealTrigger) -> Result<()> {
        match trigger {
            RevealTrigger::Element(id) => self.require_element(id),
            RevealTrigger::ScrollProgress(p) if !(0.0..=1.0).contains(&p) => {
                Err(ScrollFxError::InvalidThreshold { value: p })
            }
            RevealTrigger::ScrollProgress(_) => Ok(()),
        }
    }

    // --- reveals ----------------------------------------------------------

    pub fn add_reveal_group(
        &mut self,
        source: &DescriptorSource,
        mode: ObservationMode,
    ) -> Result<GroupId> {
        self.reveals.add_group(source, mode)
    }

    pub fn add_reveal_child(
        &mut self,
        group: GroupId,
        element: ElementId,
        trigger: RevealTrigger,
    ) -> Result<usize> {
        self.require_trigger(trigger)?;
        self.reveals.add_child(group, element, trigger)
    }

    /// Single-element reveal triggered by the element's own visibility.
    pub fn reveal(
        &mut self,
        source: &DescriptorSource,
        element: ElementId,
        mode: ObservationMode,
    ) -> Result<GroupId> {
        self.require_element(element)?;
        let group = self.reveals.add_group(source, mode)?;
        self.reveals
            .add_child(group, element, RevealTrigger::Element(element))?;
        Ok(group)
    }

    pub fn remove_reveal_group(&mut self, group: GroupId) -> bool {
        self.reveals.remove_group(group)
    }

    // --- parallax ---------------------------------------------------------

    pub fn add_parallax(&mut self, binding: ParallaxBinding) -> Result<BindingId> {
        self.require_element(binding.element)?;
        self.parallax.bind(binding)
    }

    pub fn remove_parallax(&mut self, id: BindingId) -> bool {
        self.parallax.unbind(id)
    }

    // --- typewriters ------------------------------------------------------

    pub fn add_typewriter(
        &mut self,
        text: impl Into<String>,
        interval_ms: f64,
        trigger: RevealTrigger,
    ) -> Result<TypewriterId> {
        self.require_trigger(trigger)?;
        let typewriter = Typewriter::new(text, interval_ms)?;
        let id = self.ids.alloc_typewriter();
        self.typewriters.insert(
            id,
            TypewriterEntry {
                typewriter,
                trigger,
                finished: false,
            },
        );
        self.typewriter_order.push(id);
        Ok(id)
    }

    /// Stop and forget a typewriter; nothing more is emitted for it.
    pub fn cancel_typewriter(&mut self, id: TypewriterId) -> bool {
        self.typewriter_order.retain(|t| *t != id);
        match self.typewriters.remove(&id) {
            Some(mut entry) => {
                entry.typewriter.cancel();
                log::debug!("typewriter {} cancelled", id.0);
                true
            }
            None => false,
        }
    }

    pub fn typewriter(&self, id: TypewriterId) -> Option<&Typewriter> {
        self.typewriters.get(&id).map(|e| &e.typewriter)
    }

    // --- performance ------------------------------------------------------

    pub fn start_monitor(&mut self, now: f64) {
        self.perf.start(now);
    }

    pub fn stop_monitor(&mut self) {
        self.perf.stop();
    }

    pub fn fps(&self) -> Option<u32> {
        self.perf.fps()
    }

    /// True while any reveal is mid-transition or a typewriter is typing.
    /// Hosts can stop requesting frames once this and `next_deadline` go quiet.
    pub fn is_animating(&self, now: f64) -> bool {
        self.reveals.is_animating(now)
            || self
                .typewriters
                .values()
                .any(|e| e.typewriter.is_typing())
    }

    fn blur_enabled(&self) -> bool {
        match self.cfg.degrade_blur_below_fps {
            Some(threshold) => !self.perf.below(threshold),
            None => true,
        }
    }

    // --- frame ------------------------------------------------------------

    /// Run one animation frame at `now` against the host `viewport`
    /// (`None` when the host has none).
    pub fn frame(&mut self, now: f64, viewport: Option<Rect>) -> &Outputs {
        self.outputs.clear();

        if let Some(reduced) = self.gate.apply_pending() {
            self.outputs
                .push_event(FxEvent::ReducedMotionChanged { reduced });
        }
        let reduced = self.gate.is_reduced();

        for state in self.scroll.poll(now) {
            if !state.is_active {
                self.outputs
                    .push_event(FxEvent::ScrollIdle { offset: state.offset });
            }
        }
        let scroll = self.scroll.state();
        if scroll != self.last_scroll {
            self.last_scroll = scroll;
            self.outputs.scroll = Some(scroll);
        }

        for change in self.visibility.recompute(viewport) {
            self.outputs.push_event(FxEvent::VisibilityChanged {
                element: change.element,
                state: change.state,
            });
        }

        let signals = Signals {
            visibility: &self.visibility,
            scroll,
        };
        self.reveals
            .update(now, &signals, reduced, &mut self.outputs);

        for id in &self.typewriter_order {
            let Some(entry) = self.typewriters.get_mut(id) else {
                continue;
            };
            let fired = match entry.trigger {
                RevealTrigger::Element(el) => self.visibility.is_visible(el),
                RevealTrigger::ScrollProgress(at) => scroll.progress >= at,
            };
            if fired {
                entry.typewriter.start(now);
            }
            if let Some(text) = entry.typewriter.poll(now, reduced) {
                self.outputs.push_event(FxEvent::TypewriterAdvanced {
                    id: *id,
                    text: text.to_string(),
                });
            }
            if !entry.finished && entry.typewriter.is_finished() {
                entry.finished = true;
                self.outputs
                    .push_event(FxEvent::TypewriterFinished { id: *id });
            }
        }

        let blur_enabled = self.blur_enabled();
        let visibility = &self.visibility;
        self.parallax.update(
            &scroll,
            reduced,
            blur_enabled,
            |el| visibility.is_visible(el),
            &mut self.outputs,
        );

        if let Some(fps) = self.perf.frame(now) {
            self.outputs.push_event(FxEvent::FrameRateReport { fps });
            if let Some(threshold) = self.cfg.degrade_blur_below_fps {
                if (fps as f32) < threshold {
                    log::warn!("frame rate {fps} below {threshold}; parallax blur disabled");
                }
            }
        }

        &self.outputs
    }

    /// Cancel timers, typewriters and subscriptions ahead of page teardown.
    pub fn shutdown(&mut self) {
        self.scroll.shutdown();
        for entry in self.typewriters.values_mut() {
            entry.typewriter.cancel();
        }
        self.typewriters.clear();
        self.typewriter_order.clear();
        self.perf.stop();
        self.outputs.clear();
    }
}
