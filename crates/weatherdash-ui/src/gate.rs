//! Request generations.
//!
//! Each state slot stamps its outgoing requests with an increasing
//! generation. A response is admitted only if nothing newer has been
//! committed to that slot yet, so a slow reply from an earlier tick can never
//! overwrite a result from a later one.

/// Identifier of one issued request within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

#[derive(Debug, Default)]
pub struct RequestGate {
    issued: u64,
    committed: u64,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new request.
    pub fn issue(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// Record `generation` as committed if it is newer than the last commit.
    pub fn admit(&mut self, generation: Generation) -> bool {
        if generation.0 > self.committed {
            self.committed = generation.0;
            true
        } else {
            false
        }
    }
}
