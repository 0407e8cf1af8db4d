use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Custom epoch: 2025-01-01T00:00:00Z in milliseconds since Unix epoch.
const RELAY_EPOCH_MS: u64 = 1_735_689_600_000;

const WORKER_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// Largest worker id accepted by [`SnowflakeGenerator::new`].
pub const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;

struct State {
    last_ms: u64,
    sequence: u64,
}

/// 64-bit snowflake generator used to identify live connections.
///
/// Layout (MSB → LSB):
/// - Bits 63–22: Timestamp (42 bits), ms since the relay epoch
/// - Bits 21–12: Worker ID (10 bits)
/// - Bits 11–0:  Sequence (12 bits), per-ms counter
///
/// Ids from one generator are strictly increasing, so sorting by id gives
/// the order in which connections were accepted.
pub struct SnowflakeGenerator {
    worker_id: u64,
    state: Mutex<State>,
}

impl SnowflakeGenerator {
    pub fn new(worker_id: u16) -> Self {
        assert!(
            worker_id <= MAX_WORKER_ID,
            "worker_id must fit in {WORKER_BITS} bits"
        );
        Self {
            worker_id: worker_id as u64,
            state: Mutex::new(State {
                last_ms: 0,
                sequence: 0,
            }),
        }
    }

    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();

        // A clock that steps backwards keeps counting on the last observed ms.
        let mut now_ms = current_ms().max(state.last_ms);

        if now_ms == state.last_ms {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // Sequence exhausted for this millisecond.
                while now_ms <= state.last_ms {
                    std::hint::spin_loop();
                    now_ms = current_ms();
                }
            }
        } else {
            state.sequence = 0;
        }

        state.last_ms = now_ms;

        let ts = now_ms - RELAY_EPOCH_MS;
        let id = (ts << (WORKER_BITS + SEQUENCE_BITS))
            | (self.worker_id << SEQUENCE_BITS)
            | state.sequence;

        id as i64
    }
}

fn current_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Wall-clock time at which a snowflake was generated.
pub fn snowflake_timestamp(id: i64) -> DateTime<Utc> {
    let ms = ((id as u64) >> (WORKER_BITS + SEQUENCE_BITS)) + RELAY_EPOCH_MS;
    DateTime::from_timestamp_millis(ms as i64).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_unique_ids() {
        let gen = SnowflakeGenerator::new(0);
        let mut ids = HashSet::new();
        for _ in 0..10_000 {
            let id = gen.generate();
            assert!(ids.insert(id), "duplicate snowflake: {id}");
        }
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let gen = SnowflakeGenerator::new(3);
        let mut prev = 0i64;
        for _ in 0..1_000 {
            let id = gen.generate();
            assert!(id > prev, "not monotonic: {prev} >= {id}");
            prev = id;
        }
    }

    #[test]
    fn timestamp_lies_within_generation_window() {
        let gen = SnowflakeGenerator::new(0);
        let before = Utc::now().timestamp_millis();
        let id = gen.generate();
        let after = Utc::now().timestamp_millis();

        let extracted = snowflake_timestamp(id).timestamp_millis();
        assert!(
            extracted >= before && extracted <= after,
            "extracted={extracted}, before={before}, after={after}"
        );
    }

    #[test]
    #[should_panic(expected = "worker_id must fit")]
    fn rejects_oversized_worker_id() {
        SnowflakeGenerator::new(MAX_WORKER_ID + 1);
    }
}
