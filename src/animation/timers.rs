use crate::animation::tween::Cue;

/// Handle of a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

/// Timer expiry delivered back into the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerEvent {
    /// Timer that fired.
    pub handle: TimerHandle,
    /// Cue given at scheduling time.
    pub cue: Cue,
}

/// Real-time one-shot timers, independent of scroll delivery.
pub trait Timers {
    /// Fire `cue` once after `delay_secs`.
    fn schedule(&mut self, delay_secs: f64, cue: Cue) -> TimerHandle;

    /// Drop a pending timer. Fired or unknown handles are ignored.
    fn cancel_timer(&mut self, handle: TimerHandle);
}
