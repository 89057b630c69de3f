use smallvec::SmallVec;

use crate::animation::ease::Ease;
use crate::foundation::core::ElementRef;

/// Numeric properties the tween engine interpolates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Prop {
    /// Vertical translation in px (engine-managed transform).
    Y,
    /// Element opacity.
    Opacity,
    /// Uniform scale factor.
    Scale,
    /// Height in viewport-height units.
    HeightVh,
    /// Opacity of the caption text inside the dynamic caption slot.
    CaptionOpacity,
}

/// A small ordered property set; later writes of the same property win.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props(SmallVec<[(Prop, f64); 4]>);

impl Props {
    /// An empty property set (used by pure timing sub-tweens).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, prop: Prop, value: f64) -> Self {
        self.insert(prop, value);
        self
    }

    /// Insert or overwrite `prop`.
    pub fn insert(&mut self, prop: Prop, value: f64) {
        match self.0.iter_mut().find(|(p, _)| *p == prop) {
            Some(slot) => slot.1 = value,
            None => self.0.push((prop, value)),
        }
    }

    /// Value of `prop`, if present.
    pub fn get(&self, prop: Prop) -> Option<f64> {
        self.0.iter().find(|(p, _)| *p == prop).map(|(_, v)| *v)
    }

    /// Iterate over `(prop, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Prop, f64)> + '_ {
        self.0.iter().copied()
    }

    /// Whether the set holds no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Tag attached to a tween or timer and echoed back in its event.
///
/// The stage routes events to the owning controller by cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Pill Y sub-tween of the rise finished.
    RiseLifted,
    /// Pill width sub-tween of the rise started.
    ExpandStart,
    /// Whole rise timeline finished.
    RiseComplete,
    /// Whole disappear timeline finished.
    DisappearComplete,
    /// Safety re-issue of the forced default-text request.
    ForceDefaultRetry,
    /// Caption slot fade-out finished.
    TextFadeOut,
    /// Caption slot fade-in finished.
    TextFadeIn,
    /// Dynamic caption text fade-out finished.
    CaptionFadeOut,
    /// Dynamic caption text fade-in finished.
    CaptionFadeIn,
    /// Forced default-text override expired.
    ForceDefaultRelease,
    /// Delay before the device section height reduction elapsed.
    MockupHeightStart,
    /// Device section height tween advanced a frame.
    MockupHeightStep,
    /// Device section height tween finished.
    MockupHeightDone,
    /// Resize debounce window elapsed.
    ResizeSettled,
}

/// One tween: interpolate `target` toward `to` over `duration_secs`.
///
/// When `from` is `None` the engine captures the current values at the moment the tween
/// starts.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenSpec {
    /// Element being animated.
    pub target: ElementRef,
    /// Explicit start values.
    pub from: Option<Props>,
    /// End values.
    pub to: Props,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Easing curve.
    pub ease: Ease,
    /// Cue emitted when the tween starts.
    pub on_start: Option<Cue>,
    /// Cue emitted after every engine frame in which the tween advanced.
    pub on_update: Option<Cue>,
    /// Cue emitted when the tween finishes.
    pub on_complete: Option<Cue>,
}

impl TweenSpec {
    /// A `to`-tween with no cues.
    pub fn to(target: ElementRef, to: Props, duration_secs: f64, ease: Ease) -> Self {
        Self {
            target,
            from: None,
            to,
            duration_secs,
            ease,
            on_start: None,
            on_update: None,
            on_complete: None,
        }
    }

    /// Set explicit start values.
    pub fn starting_at(mut self, from: Props) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the start cue.
    pub fn on_start(mut self, cue: Cue) -> Self {
        self.on_start = Some(cue);
        self
    }

    /// Set the per-frame cue.
    pub fn on_update(mut self, cue: Cue) -> Self {
        self.on_update = Some(cue);
        self
    }

    /// Set the completion cue.
    pub fn on_complete(mut self, cue: Cue) -> Self {
        self.on_complete = Some(cue);
        self
    }
}

/// A tween placed at an explicit time offset inside a timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineStep {
    /// Start offset in seconds from the timeline start.
    pub at_secs: f64,
    /// The tween.
    pub tween: TweenSpec,
}

/// Several tweens composed at explicit offsets behind one cancellable handle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineSpec {
    /// Steps, in any order.
    pub steps: Vec<TimelineStep>,
    /// Cue emitted when the timeline finishes.
    pub on_complete: Option<Cue>,
}

impl TimelineSpec {
    /// A timeline made of a single tween at offset 0.
    pub fn single(tween: TweenSpec) -> Self {
        Self {
            steps: vec![TimelineStep {
                at_secs: 0.0,
                tween,
            }],
            on_complete: None,
        }
    }

    /// Append a step at `at_secs`.
    pub fn at(mut self, at_secs: f64, tween: TweenSpec) -> Self {
        self.steps.push(TimelineStep { at_secs, tween });
        self
    }

    /// Set the completion cue.
    pub fn on_complete(mut self, cue: Cue) -> Self {
        self.on_complete = Some(cue);
        self
    }

    /// Total length: the latest step end.
    pub fn duration_secs(&self) -> f64 {
        self.steps
            .iter()
            .map(|s| s.at_secs + s.tween.duration_secs)
            .fold(0.0, f64::max)
    }
}

/// Handle of a running tween or timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenHandle(pub u64);

/// Cue delivered by the tween engine back into the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenEvent {
    /// Timeline that produced the cue.
    pub handle: TweenHandle,
    /// The cue.
    pub cue: Cue,
}

/// Black-box tween service.
///
/// Cancellation contract: after `cancel(h)` returns, no further event carrying `h` is
/// delivered, including its completion cue.
pub trait TweenEngine {
    /// Start a timeline and return its handle.
    fn sequence(&mut self, spec: TimelineSpec) -> TweenHandle;

    /// Start a single tween.
    fn animate(&mut self, spec: TweenSpec) -> TweenHandle {
        self.sequence(TimelineSpec::single(spec))
    }

    /// Stop a timeline immediately. Unknown or finished handles are ignored.
    fn cancel(&mut self, handle: TweenHandle);

    /// Normalized progress of a live timeline, `None` once finished or cancelled.
    fn progress(&self, handle: TweenHandle) -> Option<f64>;

    /// Write properties immediately, bypassing any tween.
    fn set(&mut self, target: ElementRef, props: &Props);

    /// Read the engine's current value of `prop`.
    fn get(&self, target: ElementRef, prop: Prop) -> f64;
}
