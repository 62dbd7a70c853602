use chrono::Days;
use concord::{SeriesRequest, ViewOptions};
use proptest::prelude::*;

use crate::helpers::{BODY_WEIGHT, body_weight_concord, d};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn merged_points_stay_inside_requested_range(offset in 0u64..16, len in 0u64..16) {
        let start = d(2023, 12, 30) + Days::new(offset);
        let end = start + Days::new(len);
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let view = rt.block_on(async {
            let concord = body_weight_concord();
            let req = SeriesRequest::try_from_range(BODY_WEIGHT, start, end).unwrap();
            concord.merged_view(&req, &ViewOptions::default()).await
        });
        // Ranges that miss every fixture date still merge: providers answer with empty series.
        let view = view.unwrap();
        prop_assert!(view.points.iter().all(|p| p.date >= start && p.date <= end));
        prop_assert!(view.points.windows(2).all(|w| w[0].date < w[1].date));
        let fixture_days = start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| *day >= d(2024, 1, 1) && *day <= d(2024, 1, 14))
            .count();
        prop_assert_eq!(view.points.len(), fixture_days);
    }
}
