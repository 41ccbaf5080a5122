//! Routing outcome counters.

use serde::{Deserialize, Serialize};

/// Where a docked ship gets sent after inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    /// Through the gates into the city.
    City,
    /// Turned away, back out to sea.
    Out,
}

/// Running tally of routing decisions.
///
/// Legitimate cargo belongs in the city; contraband belongs back out at
/// sea. Any other pairing is a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub successes: u32,
    pub failures: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one routing decision. Returns whether it was a success.
    pub fn record(&mut self, nice_content: bool, destination: Destination) -> bool {
        let success = matches!(
            (nice_content, destination),
            (true, Destination::City) | (false, Destination::Out)
        );
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        success
    }

    pub fn total(&self) -> u32 {
        self.successes + self.failures
    }
}
