//! Property tests for the Kaplan–Meier estimator.

use pipeline_survival_core::{estimate, KaplanMeier, PipelineRecord};
use proptest::prelude::*;

fn record() -> impl Strategy<Value = PipelineRecord> {
    // Whole units keep ties common, like weekly deal data.
    (0u32..60, any::<bool>()).prop_map(|(d, e)| PipelineRecord::new(d as f64, e))
}

fn records() -> impl Strategy<Value = Vec<PipelineRecord>> {
    prop::collection::vec(record(), 1..80)
}

proptest! {
    #[test]
    fn starts_at_origin(records in records()) {
        let curve = estimate(&records).unwrap();
        let first = &curve.points()[0];
        prop_assert_eq!(first.time, 0.0);
        prop_assert_eq!(first.survival, 1.0);
    }

    #[test]
    fn non_increasing_and_bounded(records in records()) {
        let curve = estimate(&records).unwrap();
        for pair in curve.points().windows(2) {
            prop_assert!(pair[1].survival <= pair[0].survival);
            prop_assert!(pair[1].time >= pair[0].time);
        }
        for p in curve.points() {
            prop_assert!((0.0..=1.0).contains(&p.survival));
        }
        // Only the origin may share its time with the next step.
        for pair in curve.points()[1..].windows(2) {
            prop_assert!(pair[1].time > pair[0].time);
        }
    }

    #[test]
    fn order_invariant(records in records(), seed in any::<u64>()) {
        let mut shuffled = records.clone();
        // Deterministic Fisher-Yates driven by the seed.
        let mut state = seed | 1;
        for i in (1..shuffled.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            shuffled.swap(i, j);
        }
        prop_assert_eq!(estimate(&records).unwrap(), estimate(&shuffled).unwrap());
    }

    #[test]
    fn idempotent(records in records()) {
        let estimator = KaplanMeier::new().with_confidence(0.95);
        prop_assert_eq!(estimator.fit(&records).unwrap(), estimator.fit(&records).unwrap());
    }

    #[test]
    fn all_censored_is_flat(durations in prop::collection::vec(0u32..60, 1..50)) {
        let records: Vec<_> = durations
            .iter()
            .map(|&d| PipelineRecord::censored(d as f64))
            .collect();
        let curve = estimate(&records).unwrap();
        prop_assert!(curve.points().iter().all(|p| p.survival == 1.0));
        let max = durations.iter().copied().max().unwrap() as f64;
        prop_assert_eq!(curve.last_time(), max);
    }

    #[test]
    fn risk_set_accounts_for_every_record(records in records()) {
        let curve = estimate(&records).unwrap();
        let events: usize = curve.points().iter().map(|p| p.events).sum();
        let censored: usize = curve.points().iter().map(|p| p.censored).sum();
        prop_assert_eq!(events + censored, records.len());
        prop_assert_eq!(curve.points()[0].at_risk, records.len());
    }

    #[test]
    fn bands_bracket_estimate(records in records()) {
        let curve = KaplanMeier::new().with_confidence(0.95).fit(&records).unwrap();
        for p in curve.points() {
            let band = p.confidence.unwrap();
            prop_assert!(band.lower <= p.survival + 1e-9);
            prop_assert!(band.upper + 1e-9 >= p.survival);
            prop_assert!(band.lower >= 0.0 && band.upper <= 1.0);
        }
    }
}
