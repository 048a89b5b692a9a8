use shoutout_types::Shoutout;

/// How long a shoutout stays live, in milliseconds.
pub const TTL_MS: i64 = 60 * 60 * 1000;

/// A shoutout is live while its age is strictly below the TTL.
pub fn is_live(shoutout: &Shoutout, now: i64) -> bool {
    shoutout.age_ms(now) < TTL_MS
}

/// Live subset of `all`, in input order.
pub fn filter_live(all: &[Shoutout], now: i64) -> Vec<Shoutout> {
    all.iter().filter(|s| is_live(s, now)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoutout_types::NewShoutout;
    use uuid::Uuid;

    const NOW: i64 = 1_707_900_000_000;

    fn at(created_at: i64) -> Shoutout {
        NewShoutout {
            sender: "A".into(),
            recipient: "B".into(),
            message: "hi".into(),
            image: None,
            frame: "code".into(),
        }
        .into_shoutout(Uuid::new_v4(), created_at)
    }

    #[test]
    fn boundary_is_not_live() {
        assert!(is_live(&at(NOW - TTL_MS + 1), NOW));
        assert!(!is_live(&at(NOW - TTL_MS), NOW));
        assert!(!is_live(&at(NOW - TTL_MS - 1), NOW));
    }

    #[test]
    fn fresh_and_future_entries_are_live() {
        assert!(is_live(&at(NOW), NOW));
        assert!(is_live(&at(NOW + 5_000), NOW));
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        assert!(!is_live(&at(i64::MIN), NOW));
        assert!(is_live(&at(i64::MAX), NOW));
        assert!(!is_live(&at(i64::MIN), i64::MAX));
        assert!(is_live(&at(i64::MAX), i64::MIN));
    }

    #[test]
    fn filter_preserves_order() {
        let all = vec![at(NOW - 10), at(NOW - 3_700_000), at(NOW - 60_000), at(NOW - 1)];
        let live = filter_live(&all, NOW);
        assert_eq!(live, vec![all[0].clone(), all[2].clone(), all[3].clone()]);
    }

    #[test]
    fn filter_is_idempotent() {
        let all: Vec<_> = (0..20).map(|i| at(NOW - i * 400_000)).collect();
        let once = filter_live(&all, NOW);
        let twice = filter_live(&once, NOW);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 9); // ages 0 .. 3_200_000
    }
}
