//! Request sequencing.
//!
//! Each endpoint hands out monotonically increasing tickets. A response is
//! applied only while its ticket is still the newest one for its endpoint, so
//! an answer for a lap or race the user already moved away from is dropped
//! instead of overwriting the current view.

use std::cell::Cell;
use std::rc::Rc;

/// Proof of issue for one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Ticket counter for one endpoint. Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    latest: Rc<Cell<u64>>,
}

impl Sequence {
    pub fn issue(&self) -> Ticket {
        let next = self.latest.get().wrapping_add(1);
        self.latest.set(next);
        Ticket(next)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.get() == ticket.0
    }

    /// Hand `result` back only if `ticket` is still the newest one.
    pub fn admit<T>(&self, ticket: Ticket, result: T) -> Option<T> {
        self.is_current(ticket).then_some(result)
    }

    /// Make every ticket issued so far stale.
    pub fn invalidate(&self) {
        self.latest.set(self.latest.get().wrapping_add(1));
    }
}

/// One sequence per backend endpoint.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    pub events: Sequence,
    pub laps: Sequence,
    pub standings: Sequence,
    pub prediction: Sequence,
    pub timing: Sequence,
}

impl RequestTracker {
    /// A new season makes every outstanding answer irrelevant.
    pub fn on_year_change(&self) {
        self.events.invalidate();
        self.on_round_change();
    }

    /// A new race keeps the event list but nothing below it. Clearing the race
    /// issues no fresh laps request, so the old one has to go stale here.
    pub fn on_round_change(&self) {
        self.laps.invalidate();
        self.standings.invalidate();
        self.prediction.invalidate();
        self.timing.invalidate();
    }
}
