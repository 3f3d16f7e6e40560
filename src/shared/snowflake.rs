//! Snowflake ID Generator
//!
//! Time-ordered unique ID generation for users, chats and messages.
//! IDs from one generator are strictly increasing, also across threads,
//! which keeps message ids sortable by acceptance order.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Custom epoch (2024-01-01T00:00:00.000Z)
const MESSENGER_EPOCH: u64 = 1704067200000;

/// Sequence is 12 bits: 4096 ids per millisecond per machine.
const SEQUENCE_MASK: u64 = 0xFFF;

/// Snowflake ID generator
pub struct SnowflakeGenerator {
    machine_id: u64,
    /// (last timestamp, sequence), updated as one unit so two callers can
    /// never observe the same timestamp/sequence window.
    state: Mutex<(u64, u64)>,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator
    pub fn new(machine_id: u64) -> Self {
        Self {
            machine_id: machine_id & 0x3FF, // 10 bits
            state: Mutex::new((0, 0)),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock().expect("snowflake state poisoned");
        let (last, seq) = *state;

        // Never step backwards, even if the wall clock does.
        let mut timestamp = Self::current_timestamp().max(last);

        let sequence = if timestamp == last {
            let next = (seq + 1) & SEQUENCE_MASK;
            if next == 0 {
                // Sequence exhausted for this millisecond; spin to the next.
                while timestamp <= last {
                    timestamp = Self::current_timestamp();
                }
            }
            next
        } else {
            0
        };

        *state = (timestamp, sequence);

        let id = ((timestamp - MESSENGER_EPOCH) << 22) | (self.machine_id << 12) | sequence;

        id as i64
    }

    /// Get current timestamp in milliseconds
    fn current_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_millis() as u64
    }
}

/// Extract the creation timestamp (millis since Unix epoch) from an ID
pub fn extract_timestamp(snowflake: i64) -> u64 {
    ((snowflake as u64) >> 22) + MESSENGER_EPOCH
}
