use chrono::{DateTime, Duration, Utc};

/// Time passed from `start` to `now`, clamped at zero when the clock moved backwards.
pub fn elapsed_between(start: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - start).max(Duration::zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_never_negative() {
        let now = Utc::now();
        assert_eq!(elapsed_between(now, now - Duration::seconds(5)), Duration::zero());
        assert_eq!(
            elapsed_between(now - Duration::minutes(2), now),
            Duration::minutes(2)
        );
    }
}
