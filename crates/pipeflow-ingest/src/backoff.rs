//! Retry-delay policy between failed submissions
//!
//! The loop driver retries indefinitely; this only decides how long to
//! wait before the next attempt. The fixed policy reproduces the classic
//! simulator behavior (flat 10 s); exponential and jittered are available
//! for deployments where many simulated devices share one ingest API.

use pipeflow_core::config::ScheduleSettings;
use rand::Rng;
use std::time::Duration;

/// Exponential doubling is capped at this many shifts to keep the
/// multiplier in u32 range.
const MAX_DOUBLINGS: u32 = 16;

/// Delay schedule between failed submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Same delay after every failure
    Fixed { delay: Duration },

    /// Delay doubles per consecutive failure, capped
    Exponential { initial: Duration, max: Duration },

    /// Exponential cap with a uniform draw over [initial, current]
    Jittered { initial: Duration, max: Duration },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Fixed {
            delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Build the policy selected by the schedule settings
    pub fn from_settings(settings: &ScheduleSettings) -> Self {
        let initial = Duration::from_secs(settings.retry_delay_secs);
        let max = Duration::from_secs(settings.retry_max_delay_secs.max(settings.retry_delay_secs));

        match settings.retry.to_lowercase().as_str() {
            "exponential" => RetryPolicy::Exponential { initial, max },
            "jittered" => RetryPolicy::Jittered { initial, max },
            _ => RetryPolicy::Fixed { delay: initial },
        }
    }

    /// Delay before the next attempt after `consecutive_failures` failed
    /// submissions in a row (0 = the streak just started).
    pub fn delay(&self, consecutive_failures: u32) -> Duration {
        match self {
            RetryPolicy::Fixed { delay } => *delay,
            RetryPolicy::Exponential { initial, max } => {
                doubled(*initial, *max, consecutive_failures)
            }
            RetryPolicy::Jittered { initial, max } => {
                let cap = doubled(*initial, *max, consecutive_failures);
                let lo = initial.as_millis() as u64;
                let hi = (cap.as_millis() as u64).max(lo);
                Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
            }
        }
    }
}

fn doubled(initial: Duration, max: Duration, failures: u32) -> Duration {
    let multiplier = 1u32 << failures.min(MAX_DOUBLINGS);
    initial.saturating_mul(multiplier).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_default_is_fixed_ten_seconds() {
        assert_eq!(RetryPolicy::default(), RetryPolicy::Fixed { delay: secs(10) });
    }

    #[test]
    fn test_fixed_is_constant() {
        let policy = RetryPolicy::Fixed { delay: secs(10) };
        for failures in [0, 1, 5, 100] {
            assert_eq!(policy.delay(failures), secs(10));
        }
    }

    #[test]
    fn test_exponential_doubles_and_caps() {
        let policy = RetryPolicy::Exponential {
            initial: secs(2),
            max: secs(30),
        };
        assert_eq!(policy.delay(0), secs(2));
        assert_eq!(policy.delay(1), secs(4));
        assert_eq!(policy.delay(2), secs(8));
        assert_eq!(policy.delay(3), secs(16));
        assert_eq!(policy.delay(4), secs(30));
        assert_eq!(policy.delay(64), secs(30));
    }

    #[test]
    fn test_jittered_stays_in_bounds() {
        let policy = RetryPolicy::Jittered {
            initial: secs(2),
            max: secs(30),
        };
        for failures in 0..8 {
            for _ in 0..100 {
                let delay = policy.delay(failures);
                assert!(delay >= secs(2));
                assert!(delay <= secs(30));
            }
        }
    }

    #[test]
    fn test_from_settings() {
        let mut settings = ScheduleSettings::default();
        assert_eq!(
            RetryPolicy::from_settings(&settings),
            RetryPolicy::Fixed { delay: secs(10) }
        );

        settings.retry = "exponential".to_string();
        settings.retry_delay_secs = 5;
        settings.retry_max_delay_secs = 40;
        assert_eq!(
            RetryPolicy::from_settings(&settings),
            RetryPolicy::Exponential {
                initial: secs(5),
                max: secs(40),
            }
        );

        settings.retry = "Jittered".to_string();
        assert_eq!(
            RetryPolicy::from_settings(&settings),
            RetryPolicy::Jittered {
                initial: secs(5),
                max: secs(40),
            }
        );
    }

    #[test]
    fn test_from_settings_cap_never_below_initial() {
        let mut settings = ScheduleSettings::default();
        settings.retry = "exponential".to_string();
        settings.retry_delay_secs = 20;
        settings.retry_max_delay_secs = 5;

        let policy = RetryPolicy::from_settings(&settings);
        assert_eq!(policy.delay(0), secs(20));
        assert_eq!(policy.delay(10), secs(20));
    }
}
