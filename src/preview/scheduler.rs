/// Handle for one scheduled recomposition, handed to the host's frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTicket(pub u64);

/// Counters describing how requests were coalesced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Calls to [`PreviewScheduler::request`].
    pub requested: u64,
    /// Pending requests superseded by a newer one.
    pub cancelled: u64,
    /// Frames that actually ran a recomposition.
    pub fired: u64,
}

/// Coalesces bursts of preview requests into at most one recomposition per frame.
///
/// Each request cancels the pending one and reschedules. Hosts either pass the returned
/// ticket back through [`PreviewScheduler::fire`] from their frame callback, or call
/// [`PreviewScheduler::take_due`] once per processing tick.
#[derive(Clone, Debug, Default)]
pub struct PreviewScheduler {
    pending: Option<FrameTicket>,
    next: u64,
    stats: SchedulerStats,
}

impl PreviewScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) -> FrameTicket {
        if self.pending.take().is_some() {
            self.stats.cancelled += 1;
        }
        let ticket = FrameTicket(self.next);
        self.next += 1;
        self.pending = Some(ticket);
        self.stats.requested += 1;
        ticket
    }

    /// Frame callback for `ticket`. Returns `true` if the recomposition should run; stale
    /// tickets from cancelled requests return `false`.
    pub fn fire(&mut self, ticket: FrameTicket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        self.stats.fired += 1;
        true
    }

    /// Headless tick: consume the pending request, if any.
    pub fn take_due(&mut self) -> bool {
        match self.pending {
            Some(ticket) => self.fire(ticket),
            None => false,
        }
    }

    /// Drop any pending request without running it.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.stats.cancelled += 1;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}
