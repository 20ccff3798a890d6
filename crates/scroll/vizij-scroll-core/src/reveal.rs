//! Reveal animation scheduler.
//!
//! A group shares one descriptor across N children. Each child is triggered by
//! its own signal (an element's visibility or a scroll-progress threshold);
//! its delay depends only on its registration index, so staggering is stable
//! whatever order the signals arrive in.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrollFxError};
use crate::ids::{ElementId, GroupId, IdAllocator};
use crate::outputs::{FxEvent, Outputs};
use crate::preset::{AnimationDescriptor, DescriptorSource};
use crate::scroll::ScrollState;
use crate::style::Style;
use crate::visibility::{ObservationMode, VisibilityController};

/// What fires a child's reveal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealTrigger {
    /// Visibility signal of a registered element.
    Element(ElementId),
    /// Page scroll progress reaching the given fraction.
    ScrollProgress(f32),
}

/// Trigger inputs sampled once per frame.
#[derive(Clone, Copy)]
pub struct Signals<'a> {
    pub visibility: &'a VisibilityController,
    pub scroll: ScrollState,
}

impl Signals<'_> {
    fn fired(&self, trigger: RevealTrigger) -> bool {
        match trigger {
            RevealTrigger::Element(id) => self.visibility.is_visible(id),
            RevealTrigger::ScrollProgress(at) => self.scroll.progress >= at,
        }
    }
}

/// Visibility input for a one-shot resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealSignal {
    NotVisible,
    /// Visible since `elapsed_ms` ago.
    VisibleFor(f64),
}

/// Style to apply right now for a single, unstaggered reveal.
pub fn resolve(source: &DescriptorSource, signal: RevealSignal, reduced: bool) -> Result<Style> {
    let desc = source.resolve()?;
    if reduced {
        return Ok(desc.final_style);
    }
    Ok(match signal {
        RevealSignal::NotVisible => desc.initial,
        RevealSignal::VisibleFor(elapsed) => desc.style_at(elapsed, desc.delay_ms),
    })
}

#[derive(Debug)]
struct RevealChild {
    element: ElementId,
    trigger: RevealTrigger,
    index: usize,
    triggered_at: Option<f64>,
    completed: bool,
    applied: Option<Style>,
}

#[derive(Debug)]
struct RevealGroup {
    descriptor: AnimationDescriptor,
    mode: ObservationMode,
    children: Vec<RevealChild>,
    next_index: usize,
}

#[derive(Debug, Default)]
pub struct RevealScheduler {
    ids: IdAllocator,
    groups: HashMap<GroupId, RevealGroup>,
    order: Vec<GroupId>,
}

impl RevealScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group from a preset name or literal descriptor.
    /// `Repeating` groups re-hide when their signal drops; `Once` groups never do.
    pub fn add_group(
        &mut self,
        source: &DescriptorSource,
        mode: ObservationMode,
    ) -> Result<GroupId> {
        let descriptor = source.resolve()?;
        let id = self.ids.alloc_group();
        self.groups.insert(
            id,
            RevealGroup {
                descriptor,
                mode,
                children: Vec::new(),
                next_index: 0,
            },
        );
        self.order.push(id);
        Ok(id)
    }

    /// Append a child. Returns its stagger index (registration order).
    pub fn add_child(
        &mut self,
        group: GroupId,
        element: ElementId,
        trigger: RevealTrigger,
    ) -> Result<usize> {
        let g = self
            .groups
            .get_mut(&group)
            .ok_or(ScrollFxError::UnknownGroup { id: group.0 })?;
        let index = g.next_index;
        g.next_index += 1;
        g.children.push(RevealChild {
            element,
            trigger,
            index,
            triggered_at: None,
            completed: false,
            applied: None,
        });
        Ok(index)
    }

    pub fn remove_group(&mut self, group: GroupId) -> bool {
        self.order.retain(|g| *g != group);
        self.groups.remove(&group).is_some()
    }

    /// Drop every child styling `element` or triggered by it. Surviving
    /// children keep their stagger index.
    pub fn remove_element(&mut self, element: ElementId) -> usize {
        let mut removed = 0;
        for g in self.groups.values_mut() {
            let before = g.children.len();
            g.children.retain(|c| {
                c.element != element && c.trigger != RevealTrigger::Element(element)
            });
            removed += before - g.children.len();
        }
        removed
    }

    pub fn descriptor(&self, group: GroupId) -> Option<&AnimationDescriptor> {
        self.groups.get(&group).map(|g| &g.descriptor)
    }

    /// Effective delay of every child, in registration order.
    pub fn delays(&self, group: GroupId) -> Option<Vec<f64>> {
        self.groups.get(&group).map(|g| {
            g.children
                .iter()
                .map(|c| g.descriptor.delay_for(c.index))
                .collect()
        })
    }

    pub fn is_triggered(&self, group: GroupId, element: ElementId) -> bool {
        self.groups.get(&group).is_some_and(|g| {
            g.children
                .iter()
                .any(|c| c.element == element && c.triggered_at.is_some())
        })
    }

    /// Style a child would get at `now`, without mutating anything.
    pub fn style_of(
        &self,
        group: GroupId,
        element: ElementId,
        now: f64,
        reduced: bool,
    ) -> Option<Style> {
        let g = self.groups.get(&group)?;
        let c = g.children.iter().find(|c| c.element == element)?;
        Some(child_style(&g.descriptor, c, now, reduced))
    }

    /// True while any triggered child is still mid-transition.
    pub fn is_animating(&self, now: f64) -> bool {
        self.groups.values().any(|g| {
            g.children.iter().any(|c| match c.triggered_at {
                Some(at) => {
                    let settle = g.descriptor.settles_at(g.descriptor.delay_for(c.index));
                    !c.completed && now - at < settle
                }
                None => false,
            })
        })
    }

    /// Advance every child to `now`, pushing changed styles and lifecycle events.
    pub fn update(&mut self, now: f64, signals: &Signals<'_>, reduced: bool, out: &mut Outputs) {
        for gid in &self.order {
            let Some(g) = self.groups.get_mut(gid) else {
                continue;
            };
            let desc = &g.descriptor;
            for c in g.children.iter_mut() {
                let fired = signals.fired(c.trigger);
                match (c.triggered_at, fired) {
                    (None, true) => {
                        c.triggered_at = Some(now);
                        c.completed = false;
                        out.push_event(FxEvent::RevealStarted {
                            group: *gid,
                            element: c.element,
                        });
                    }
                    (Some(_), false) if g.mode == ObservationMode::Repeating => {
                        c.triggered_at = None;
                        c.completed = false;
                        out.push_event(FxEvent::RevealReset {
                            group: *gid,
                            element: c.element,
                        });
                    }
                    _ => {}
                }

                let style = child_style(desc, c, now, reduced);
                if c.applied != Some(style) {
                    c.applied = Some(style);
                    out.push_change(c.element, style);
                }

                if let Some(at) = c.triggered_at {
                    let settle = if reduced {
                        0.0
                    } else {
                        desc.settles_at(desc.delay_for(c.index))
                    };
                    if !c.completed && now - at >= settle {
                        c.completed = true;
                        out.push_event(FxEvent::RevealCompleted {
                            group: *gid,
                            element: c.element,
                        });
                    }
                }
            }
        }
    }
}

fn child_style(desc: &AnimationDescriptor, c: &RevealChild, now: f64, reduced: bool) -> Style {
    if reduced {
        return desc.final_style;
    }
    match c.triggered_at {
        None => desc.initial,
        Some(at) => desc.style_at(now - at, desc.delay_for(c.index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::preset::Preset;

    fn signals(vis: &VisibilityController, progress: f32) -> Signals<'_> {
        Signals {
            visibility: vis,
            scroll: ScrollState {
                progress,
                ..ScrollState::STATIC
            },
        }
    }

    #[test]
    fn resolve_hidden_then_final() {
        let src = DescriptorSource::from(Preset::FadeUp);
        let hidden = resolve(&src, RevealSignal::NotVisible, false).unwrap();
        assert_eq!(hidden.opacity, 0.0);
        let done = resolve(&src, RevealSignal::VisibleFor(10_000.0), false).unwrap();
        assert_eq!(done, Style::IDENTITY);
        let reduced = resolve(&src, RevealSignal::NotVisible, true).unwrap();
        assert_eq!(reduced, Style::IDENTITY);
        let unknown = DescriptorSource::Named("nope".into());
        assert!(resolve(&unknown, RevealSignal::NotVisible, false).is_err());
    }

    #[test]
    fn scroll_progress_trigger() {
        let vis = VisibilityController::new();
        let mut sched = RevealScheduler::new();
        let g = sched
            .add_group(&Preset::FadeIn.into(), ObservationMode::Once)
            .unwrap();
        let el = ElementId(7);
        sched
            .add_child(g, el, RevealTrigger::ScrollProgress(0.5))
            .unwrap();

        let mut out = Outputs::default();
        sched.update(0.0, &signals(&vis, 0.2), false, &mut out);
        assert_eq!(out.changes.len(), 1);
        assert_eq!(out.changes[0].style.opacity, 0.0);
        assert!(out.events.is_empty());

        out.clear();
        sched.update(16.0, &signals(&vis, 0.6), false, &mut out);
        assert!(matches!(out.events[0], FxEvent::RevealStarted { .. }));
        assert!(sched.is_triggered(g, el));

        // Once-mode: dropping below the threshold does not re-hide.
        out.clear();
        sched.update(2000.0, &signals(&vis, 0.0), false, &mut out);
        assert_eq!(sched.style_of(g, el, 2000.0, false), Some(Style::IDENTITY));
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, FxEvent::RevealCompleted { .. })));
    }

    #[test]
    fn unchanged_style_is_not_reemitted() {
        let vis = VisibilityController::new();
        let mut sched = RevealScheduler::new();
        let g = sched
            .add_group(&Preset::FadeIn.into(), ObservationMode::Once)
            .unwrap();
        sched
            .add_child(g, ElementId(1), RevealTrigger::ScrollProgress(0.9))
            .unwrap();
        let mut out = Outputs::default();
        sched.update(0.0, &signals(&vis, 0.0), false, &mut out);
        out.clear();
        sched.update(16.0, &signals(&vis, 0.0), false, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_group_is_an_error() {
        let mut sched = RevealScheduler::new();
        let err = sched
            .add_child(GroupId(3), ElementId(0), RevealTrigger::ScrollProgress(0.0))
            .unwrap_err();
        assert_eq!(err, ScrollFxError::UnknownGroup { id: 3 });
    }

    #[test]
    fn remove_element_drops_children() {
        let mut vis = VisibilityController::new();
        let el = vis
            .register(
                Box::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
                ObservationMode::Once,
                0.0,
            )
            .unwrap();
        let mut sched = RevealScheduler::new();
        let g = sched
            .add_group(&Preset::FadeIn.into(), ObservationMode::Once)
            .unwrap();
        sched.add_child(g, el, RevealTrigger::Element(el)).unwrap();
        assert_eq!(sched.remove_element(el), 1);
        assert_eq!(sched.delays(g), Some(vec![]));
    }
}
