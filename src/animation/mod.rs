pub(crate) mod ease;
pub(crate) mod timers;
pub(crate) mod tween;
