use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};

/// Delay until the first minute boundary that is a multiple of
/// `interval_minutes` past the hour.
///
/// With a 5 minute interval at 14:03:22 this is 98 seconds (14:05:00).
/// Sitting exactly on a boundary collapses to zero, i.e. an immediate fire,
/// as does being a few seconds past one.
pub fn initial_aligned_delay(now: DateTime<Utc>, interval_minutes: u32) -> Duration {
    let minutes_until_next =
        (interval_minutes - now.minute() % interval_minutes) % interval_minutes;
    let secs = i64::from(minutes_until_next) * 60 - i64::from(now.second());

    Duration::from_millis(secs.max(0) as u64 * 1000)
}

/// Delay until the next boundary strictly after `now`. Unlike
/// [`initial_aligned_delay`] this never returns zero: on a boundary it
/// targets the following one, a full interval away.
pub fn next_aligned_delay(now: DateTime<Utc>, interval_minutes: u32) -> Duration {
    let cycle_ms = i64::from(interval_minutes) * 60_000;
    let elapsed_ms = i64::from(now.minute() % interval_minutes) * 60_000
        + i64::from(now.second()) * 1000
        + i64::from(now.timestamp_subsec_millis());

    Duration::from_millis((cycle_ms - elapsed_ms).max(0) as u64)
}

/// Sleep until the next clock-aligned tick. Re-derives alignment from the
/// wall clock every call, so timer jitter never accumulates into drift.
pub async fn sleep_until_aligned(interval_minutes: u32) {
    let delay = next_aligned_delay(Utc::now(), interval_minutes);

    tracing::debug!(
        next_tick_in_secs = delay.as_secs(),
        "sleeping until next aligned tick"
    );

    tokio::time::sleep(delay).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, min, sec).unwrap()
    }

    #[test]
    fn initial_delay_reaches_the_next_boundary() {
        // 14:03:22 with a 5 minute interval -> 14:05:00
        assert_eq!(
            initial_aligned_delay(at(14, 3, 22), 5),
            Duration::from_secs(98)
        );
        // 14:07:00 with a 10 minute interval -> 14:10:00
        assert_eq!(
            initial_aligned_delay(at(14, 7, 0), 10),
            Duration::from_secs(180)
        );
    }

    #[test]
    fn initial_delay_on_exact_boundary_is_zero() {
        assert_eq!(initial_aligned_delay(at(14, 5, 0), 5), Duration::ZERO);
        assert_eq!(initial_aligned_delay(at(14, 0, 0), 15), Duration::ZERO);
    }

    #[test]
    fn initial_delay_just_past_boundary_clamps_to_zero() {
        // 14:05:30 would compute to -30s; the scheduler fires immediately.
        assert_eq!(initial_aligned_delay(at(14, 5, 30), 5), Duration::ZERO);
    }

    #[test]
    fn initial_delay_is_bounded_and_lands_on_the_grid() {
        for interval in [5u32, 10, 15, 30] {
            for minute in 0..60 {
                for second in [0u32, 1, 29, 59] {
                    let t = at(9, minute, second);
                    let delay = initial_aligned_delay(t, interval);

                    assert!(delay < Duration::from_secs(u64::from(interval) * 60));

                    if minute % interval == 0 && second > 0 {
                        // Clamped case: fires immediately instead of
                        // waiting out a whole interval.
                        assert_eq!(delay, Duration::ZERO);
                    } else {
                        let fire = t + chrono::Duration::from_std(delay).unwrap();
                        assert_eq!(fire.minute() % interval, 0, "at {t}");
                        assert_eq!(fire.second(), 0, "at {t}");
                    }
                }
            }
        }
    }

    #[test]
    fn next_delay_is_strictly_positive() {
        for interval in [5u32, 10, 15] {
            for minute in 0..60 {
                for second in [0u32, 30, 59] {
                    let t = at(21, minute, second);
                    let delay = next_aligned_delay(t, interval);

                    assert!(delay > Duration::ZERO);
                    assert!(delay <= Duration::from_secs(u64::from(interval) * 60));

                    let fire = t + chrono::Duration::from_std(delay).unwrap();
                    assert_eq!(fire.minute() % interval, 0, "at {t}");
                    assert_eq!(fire.second(), 0, "at {t}");
                }
            }
        }
    }

    #[test]
    fn next_delay_on_boundary_is_a_full_interval() {
        assert_eq!(
            next_aligned_delay(at(14, 5, 0), 5),
            Duration::from_secs(300)
        );
    }
}
