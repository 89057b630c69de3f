use smallvec::SmallVec;

/// Cross-controller requests. Controllers post them; the stage drains and routes them so
/// that no controller holds a reference to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Signal {
    /// Switch captions to Default through the forced path.
    ForceDefaultText,
    /// Drop the forced default-text override now.
    ReleaseForcedDefault,
    /// Layout height may have changed; recompute the spacer.
    SpacerRecompute,
    /// Pin the spacer to an animated section height in px.
    SpacerFollow(f64),
}

#[derive(Debug, Default)]
pub(crate) struct SignalBus {
    queue: SmallVec<[Signal; 4]>,
}

impl SignalBus {
    pub(crate) fn post(&mut self, signal: Signal) {
        self.queue.push(signal);
    }

    /// Take everything posted so far, in posting order.
    pub(crate) fn drain(&mut self) -> SmallVec<[Signal; 4]> {
        std::mem::take(&mut self.queue)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
