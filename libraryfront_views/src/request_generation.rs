#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Tracks the latest load started by a view, so a response that arrives after
/// a newer load began can be told apart and dropped
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: u64,
}

impl RequestGeneration {
    pub fn begin(&mut self) -> LoadTicket {
        self.current += 1;
        LoadTicket(self.current)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.current
    }
}
