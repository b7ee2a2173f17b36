use std::time::Duration;

pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

/// Exponential backoff schedule.
///
/// The delay before retry `attempt` (zero-based) is `min * factor^attempt`,
/// capped at `max`. With `jitter` the delay is drawn from `[min, delay]`
/// using a generator seeded by `jitter_seed` and the attempt number, so a given
/// seed always yields the same schedule. Without a seed every call draws a
/// fresh one.
#[derive(Clone, Debug, PartialEq)]
pub struct Backoff {
    pub min: Duration,
    pub max: Duration,
    pub factor: f64,
    pub jitter: bool,
    pub jitter_seed: Option<u64>,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_BACKOFF,
            max: DEFAULT_MAX_BACKOFF,
            factor: DEFAULT_BACKOFF_FACTOR,
            jitter: false,
            jitter_seed: None,
        }
    }
}

impl Backoff {
    pub fn duration_for(&self, attempt: u32) -> Duration {
        if self.min >= self.max {
            return self.max;
        }

        let factor = if self.factor.is_finite() && self.factor > 0.0 {
            self.factor
        } else {
            DEFAULT_BACKOFF_FACTOR
        };
        let min = self.min.as_secs_f64();
        let mut delay = min * factor.powf(f64::from(attempt));
        if self.jitter {
            let seed = self.jitter_seed.unwrap_or_else(rand::random);
            delay = min + jitter_unit(attempt, seed) * (delay - min);
        }

        // NaN and overflow both land here.
        if !delay.is_finite() || delay >= self.max.as_secs_f64() {
            return self.max;
        }
        Duration::from_secs_f64(delay.max(0.0))
    }
}

/// Uniform value in `[0, 1]` derived from `(seed, attempt)`.
fn jitter_unit(attempt: u32, seed: u64) -> f64 {
    let mut x = seed ^ (u64::from(attempt) << 32) ^ 0x9E37_79B9_7F4A_7C15;
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    let r = x.wrapping_mul(0x2545_F491_4F6C_DD1D);
    (r as f64) / (u64::MAX as f64)
}
