use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::animation::timers::{TimerEvent, TimerHandle, Timers};
use crate::animation::tween::{
    Cue, Prop, Props, TimelineSpec, TweenEngine, TweenEvent, TweenHandle, TweenSpec,
};
use crate::foundation::core::{ElementRef, ElementRole};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::math::{TIME_EPSILON, lerp, local_progress};
use crate::render::boundary::{Priority, RenderBoundary, StyleValue};
use crate::scroll::region::{RegionSpec, ScrollObserver};
use crate::stage::coordinator::StageEvent;

const ALL_ROLES: [ElementRole; 7] = [
    ElementRole::PillWrapper,
    ElementRole::DefaultCaption,
    ElementRole::DynamicCaption,
    ElementRole::Mockup,
    ElementRole::DeviceSection,
    ElementRole::MainSection,
    ElementRole::Spacer,
];

/// Render-tree state of one simulated element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimElement {
    /// `display` is not `none`.
    pub display: bool,
    /// Class list.
    pub classes: BTreeSet<String>,
    /// Inline styles by property name.
    pub styles: BTreeMap<String, (StyleValue, Priority)>,
    /// Number of `set_style` calls that reached this element.
    pub style_writes: usize,
    /// Text content.
    pub text: String,
    /// Engine-managed property values.
    pub props: BTreeMap<Prop, f64>,
    /// Layout height in px used when no `HeightVh` value is set.
    pub height_px: f64,
}

/// One entry of the launch log.
#[derive(Clone, Debug, PartialEq)]
pub struct Launch {
    /// Handle returned to the caller.
    pub handle: TweenHandle,
    /// Simulated time of the launch.
    pub at_secs: f64,
    /// Every cue the timeline can emit.
    pub cues: Vec<Cue>,
}

#[derive(Debug)]
struct LiveStep {
    at_secs: f64,
    spec: TweenSpec,
    from: Option<Props>,
    done: bool,
}

#[derive(Debug)]
struct LiveTimeline {
    handle: TweenHandle,
    steps: Vec<LiveStep>,
    on_complete: Option<Cue>,
    elapsed: f64,
    duration: f64,
}

#[derive(Debug)]
struct PendingTimer {
    handle: TimerHandle,
    due_secs: f64,
    cue: Cue,
}

/// Deterministic in-memory host: a tween engine, timers, a render tree and a scroll
/// observer driven by explicit time steps.
///
/// Callbacks produced by [`SimBackend::step`] are queued and handed out one at a time by
/// [`SimBackend::next_event`]; cancelling a tween or timer also drops its queued callbacks.
#[derive(Debug)]
pub struct SimBackend {
    roles: BTreeMap<ElementRole, ElementRef>,
    elements: BTreeMap<ElementRef, SimElement>,
    timelines: Vec<LiveTimeline>,
    timers: Vec<PendingTimer>,
    outbox: VecDeque<StageEvent>,
    regions: Vec<RegionSpec>,
    launches: Vec<Launch>,
    viewport_width: f64,
    viewport_height: f64,
    now_secs: f64,
    next_handle: u64,
    fail_writes: bool,
}

impl SimBackend {
    /// A page with every role present.
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self::with_roles(&ALL_ROLES, viewport_width, viewport_height)
    }

    /// A page containing only `roles`.
    pub fn with_roles(roles: &[ElementRole], viewport_width: f64, viewport_height: f64) -> Self {
        let mut out = Self {
            roles: BTreeMap::new(),
            elements: BTreeMap::new(),
            timelines: Vec::new(),
            timers: Vec::new(),
            outbox: VecDeque::new(),
            regions: Vec::new(),
            launches: Vec::new(),
            viewport_width,
            viewport_height,
            now_secs: 0.0,
            next_handle: 1,
            fail_writes: false,
        };
        for (i, role) in roles.iter().enumerate() {
            let el = ElementRef(i as u32);
            out.roles.insert(*role, el);
            out.elements.insert(
                el,
                SimElement {
                    display: true,
                    ..SimElement::default()
                },
            );
        }
        out
    }

    /// Remove `role` from the page.
    pub fn without(mut self, role: ElementRole) -> Self {
        if let Some(el) = self.roles.remove(&role) {
            self.elements.remove(&el);
        }
        self
    }

    /// Simulated time in seconds.
    pub fn now_secs(&self) -> f64 {
        self.now_secs
    }

    /// Element playing `role`.
    pub fn element(&self, role: ElementRole) -> Option<&SimElement> {
        self.roles.get(&role).and_then(|el| self.elements.get(el))
    }

    /// Engine value of `prop` on `role`'s element.
    pub fn prop(&self, role: ElementRole, prop: Prop) -> f64 {
        self.roles
            .get(&role)
            .map_or_else(|| default_prop(prop), |el| self.get(*el, prop))
    }

    /// Inline style `name` on `role`'s element.
    pub fn style(&self, role: ElementRole, name: &str) -> Option<StyleValue> {
        self.element(role)
            .and_then(|e| e.styles.get(name))
            .map(|(v, _)| *v)
    }

    /// Priority of inline style `name` on `role`'s element.
    pub fn style_priority(&self, role: ElementRole, name: &str) -> Option<Priority> {
        self.element(role)
            .and_then(|e| e.styles.get(name))
            .map(|(_, p)| *p)
    }

    /// Whether `role`'s element carries `class`.
    pub fn has_class(&self, role: ElementRole, class: &str) -> bool {
        self.element(role).is_some_and(|e| e.classes.contains(class))
    }

    /// Rendered opacity of `role`'s element.
    pub fn opacity(&self, role: ElementRole) -> f64 {
        self.roles
            .get(&role)
            .and_then(|el| self.computed_opacity(*el).ok())
            .unwrap_or(0.0)
    }

    /// Registered scroll regions, in registration order.
    pub fn regions(&self) -> &[RegionSpec] {
        &self.regions
    }

    /// Every timeline launched so far.
    pub fn launches(&self) -> &[Launch] {
        &self.launches
    }

    /// Number of launched timelines able to emit `cue`.
    pub fn launch_count(&self, cue: Cue) -> usize {
        self.launches.iter().filter(|l| l.cues.contains(&cue)).count()
    }

    /// Number of timelines still running.
    pub fn live_timelines(&self) -> usize {
        self.timelines.len()
    }

    /// Number of timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Change the viewport width (the host reports the resize separately).
    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    /// Make every render write fail until switched off again.
    pub fn fail_render_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Overwrite an engine value behind the stage's back (simulates external drift).
    pub fn poke(&mut self, role: ElementRole, prop: Prop, value: f64) {
        if let Some(el) = self.roles.get(&role).copied() {
            self.set(el, &Props::new().with(prop, value));
        }
    }

    /// Advance time by `dt` seconds, queueing the callbacks it produces.
    pub fn step(&mut self, dt: f64) {
        self.now_secs += dt;

        let mut finished = Vec::new();
        for (i, tl) in self.timelines.iter_mut().enumerate() {
            tl.elapsed += dt;
            advance_timeline(tl, &mut self.elements, &mut self.outbox);
            if tl.elapsed + TIME_EPSILON >= tl.duration && tl.steps.iter().all(|s| s.done) {
                if let Some(cue) = tl.on_complete {
                    self.outbox.push_back(StageEvent::Tween(TweenEvent {
                        handle: tl.handle,
                        cue,
                    }));
                }
                finished.push(i);
            }
        }
        for i in finished.into_iter().rev() {
            self.timelines.remove(i);
        }

        let now = self.now_secs;
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|t| t.due_secs <= now + TIME_EPSILON);
        self.timers = pending;
        due.sort_by(|a, b| a.due_secs.total_cmp(&b.due_secs).then(a.handle.cmp(&b.handle)));
        for t in due {
            self.outbox.push_back(StageEvent::Timer(TimerEvent {
                handle: t.handle,
                cue: t.cue,
            }));
        }
    }

    /// Next queued callback, in production order.
    pub fn next_event(&mut self) -> Option<StageEvent> {
        self.outbox.pop_front()
    }

    fn next_handle(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }

    fn element_mut(&mut self, el: ElementRef) -> StageResult<&mut SimElement> {
        if self.fail_writes {
            return Err(StageError::collaborator("render write rejected"));
        }
        self.elements
            .get_mut(&el)
            .ok_or_else(|| StageError::collaborator(format!("unknown element {}", el.0)))
    }

    fn element_ref(&self, el: ElementRef) -> StageResult<&SimElement> {
        self.elements
            .get(&el)
            .ok_or_else(|| StageError::collaborator(format!("unknown element {}", el.0)))
    }
}

fn default_prop(prop: Prop) -> f64 {
    match prop {
        Prop::Y => 0.0,
        Prop::Opacity | Prop::Scale | Prop::CaptionOpacity => 1.0,
        Prop::HeightVh => 100.0,
    }
}

fn read_prop(elements: &BTreeMap<ElementRef, SimElement>, el: ElementRef, prop: Prop) -> f64 {
    elements
        .get(&el)
        .and_then(|e| e.props.get(&prop).copied())
        .unwrap_or_else(|| default_prop(prop))
}

fn advance_timeline(
    tl: &mut LiveTimeline,
    elements: &mut BTreeMap<ElementRef, SimElement>,
    outbox: &mut VecDeque<StageEvent>,
) {
    let handle = tl.handle;
    let emit = |outbox: &mut VecDeque<StageEvent>, cue: Option<Cue>| {
        if let Some(cue) = cue {
            outbox.push_back(StageEvent::Tween(TweenEvent { handle, cue }));
        }
    };

    for step in tl.steps.iter_mut() {
        if step.done || tl.elapsed + TIME_EPSILON < step.at_secs {
            continue;
        }
        if step.from.is_none() {
            // Start values are captured when the step begins, not when it is scheduled.
            let mut from = Props::new();
            for (prop, _) in step.spec.to.iter() {
                let v = step
                    .spec
                    .from
                    .as_ref()
                    .and_then(|f| f.get(prop))
                    .unwrap_or_else(|| read_prop(&*elements, step.spec.target, prop));
                from.insert(prop, v);
            }
            step.from = Some(from);
            emit(outbox, step.spec.on_start);
        }

        let local = local_progress(tl.elapsed, step.at_secs, step.spec.duration_secs);
        let eased = step.spec.ease.apply(local);
        if let (Some(from), Some(el)) = (&step.from, elements.get_mut(&step.spec.target)) {
            for (prop, to) in step.spec.to.iter() {
                let start = from.get(prop).unwrap_or(to);
                el.props.insert(prop, lerp(start, to, eased));
            }
        }
        emit(outbox, step.spec.on_update);
        if local >= 1.0 - TIME_EPSILON {
            step.done = true;
            emit(outbox, step.spec.on_complete);
        }
    }
}

impl TweenEngine for SimBackend {
    fn sequence(&mut self, spec: TimelineSpec) -> TweenHandle {
        let handle = TweenHandle(self.next_handle());
        let duration = spec.duration_secs();

        let mut cues: Vec<Cue> = spec.on_complete.into_iter().collect();
        for s in &spec.steps {
            let t = &s.tween;
            cues.extend([t.on_start, t.on_update, t.on_complete].into_iter().flatten());
        }
        self.launches.push(Launch {
            handle,
            at_secs: self.now_secs,
            cues,
        });

        let mut steps: Vec<LiveStep> = spec
            .steps
            .into_iter()
            .map(|s| LiveStep {
                at_secs: s.at_secs,
                spec: s.tween,
                from: None,
                done: false,
            })
            .collect();
        steps.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));

        self.timelines.push(LiveTimeline {
            handle,
            steps,
            on_complete: spec.on_complete,
            elapsed: 0.0,
            duration,
        });
        tracing::trace!(handle = handle.0, duration, "sim timeline launched");
        handle
    }

    fn cancel(&mut self, handle: TweenHandle) {
        self.timelines.retain(|tl| tl.handle != handle);
        self.outbox
            .retain(|ev| !matches!(ev, StageEvent::Tween(t) if t.handle == handle));
    }

    fn progress(&self, handle: TweenHandle) -> Option<f64> {
        self.timelines
            .iter()
            .find(|tl| tl.handle == handle)
            .map(|tl| {
                if tl.duration <= TIME_EPSILON {
                    1.0
                } else {
                    (tl.elapsed / tl.duration).clamp(0.0, 1.0)
                }
            })
    }

    fn set(&mut self, target: ElementRef, props: &Props) {
        if let Some(el) = self.elements.get_mut(&target) {
            for (prop, v) in props.iter() {
                el.props.insert(prop, v);
            }
        }
    }

    fn get(&self, target: ElementRef, prop: Prop) -> f64 {
        read_prop(&self.elements, target, prop)
    }
}

impl Timers for SimBackend {
    fn schedule(&mut self, delay_secs: f64, cue: Cue) -> TimerHandle {
        let handle = TimerHandle(self.next_handle());
        self.timers.push(PendingTimer {
            handle,
            due_secs: self.now_secs + delay_secs.max(0.0),
            cue,
        });
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
        self.outbox
            .retain(|ev| !matches!(ev, StageEvent::Timer(t) if t.handle == handle));
    }
}

impl RenderBoundary for SimBackend {
    fn resolve(&self, role: ElementRole) -> Option<ElementRef> {
        self.roles.get(&role).copied()
    }

    fn set_style(
        &mut self,
        el: ElementRef,
        name: &str,
        value: StyleValue,
        priority: Priority,
    ) -> StageResult<()> {
        let e = self.element_mut(el)?;
        e.styles.insert(name.to_owned(), (value, priority));
        e.style_writes += 1;
        Ok(())
    }

    fn clear_style(&mut self, el: ElementRef, name: &str) -> StageResult<()> {
        self.element_mut(el)?.styles.remove(name);
        Ok(())
    }

    fn bounding_height(&self, el: ElementRef) -> StageResult<f64> {
        let e = self.element_ref(el)?;
        Ok(e.props
            .get(&Prop::HeightVh)
            .map_or(e.height_px, |vh| vh * self.viewport_height / 100.0))
    }

    fn set_display(&mut self, el: ElementRef, visible: bool) -> StageResult<()> {
        self.element_mut(el)?.display = visible;
        Ok(())
    }

    fn toggle_class(&mut self, el: ElementRef, name: &str, on: bool) -> StageResult<()> {
        let e = self.element_mut(el)?;
        if on {
            e.classes.insert(name.to_owned());
        } else {
            e.classes.remove(name);
        }
        Ok(())
    }

    fn computed_opacity(&self, el: ElementRef) -> StageResult<f64> {
        let e = self.element_ref(el)?;
        if let Some((StyleValue::Number(v), _)) = e.styles.get("opacity") {
            return Ok(*v);
        }
        Ok(e.props
            .get(&Prop::Opacity)
            .copied()
            .unwrap_or_else(|| default_prop(Prop::Opacity)))
    }

    fn set_text(&mut self, el: ElementRef, text: &str) -> StageResult<()> {
        self.element_mut(el)?.text = text.to_owned();
        Ok(())
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }
}

impl ScrollObserver for SimBackend {
    fn register(&mut self, spec: RegionSpec) {
        tracing::debug!(region = ?spec.id, trigger = ?spec.trigger, "sim region registered");
        self.regions.push(spec);
    }
}
