use crate::animation::timers::Timers;
use crate::animation::tween::TweenEngine;
use crate::render::boundary::RenderBoundary;
use crate::scroll::region::ScrollObserver;

/// Everything the stage needs from its host: tweens, timers, style access and scroll
/// registration.
///
/// Implemented automatically for any type providing the four collaborator traits.
pub trait Backend: TweenEngine + Timers + RenderBoundary + ScrollObserver {}

impl<T> Backend for T where T: TweenEngine + Timers + RenderBoundary + ScrollObserver {}
