use tokio_util::sync::CancellationToken;

/// Identifies one issued request. Responses carry it back so the session can
/// tell the live request from superseded ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct TicketCounter {
    last: u64,
}

impl TicketCounter {
    pub fn next(&mut self) -> Ticket {
        self.last = self.last.wrapping_add(1);
        Ticket(self.last)
    }
}

/// The single live request of a pipeline.
#[derive(Debug)]
pub struct InFlight {
    ticket: Ticket,
    cancel: CancellationToken,
}

impl InFlight {
    pub fn new(ticket: Ticket) -> Self {
        Self {
            ticket,
            cancel: CancellationToken::new(),
        }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// True while `ticket` names this request and it has not been aborted.
    pub fn accepts(&self, ticket: Ticket) -> bool {
        self.ticket == ticket && !self.cancel.is_cancelled()
    }

    pub fn abort(self) {
        self.cancel.cancel();
    }
}

/// A request the host must start: payload plus the ticket and token to run it
/// under.
#[derive(Debug, Clone)]
pub struct PendingRequest<T> {
    pub ticket: Ticket,
    pub cancel: CancellationToken,
    pub payload: T,
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/assist/ticket.rs"]
mod tests;
