use concord::{
    ConcordError, CorrelationStatus, FusionMethod, MergeMethod, ResolutionPolicy, SeriesRequest,
    SourceId, UserMergePreference, ViewOptions,
};
use concord_mock::fixtures::LB_TO_KG;

use crate::helpers::{
    BODY_WEIGHT, MANUAL, RESTING_HR, SCALE, WEARABLE, body_weight_concord, builder, d, fixture,
    scripted,
};

#[tokio::test]
async fn merged_view_over_fixtures() {
    let concord = body_weight_concord();
    let view = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &ViewOptions::default())
        .await
        .expect("merged view");

    assert_eq!(view.merge_group, BODY_WEIGHT);
    assert_eq!(view.points.len(), 14);
    assert!(view.warnings.is_empty());

    let first = view.point(d(2024, 1, 1)).unwrap();
    assert_eq!(first.method, MergeMethod::Priority);
    assert_eq!(first.chosen_source.as_str(), SCALE);
    assert_eq!(
        first.contributing_sources,
        vec![SourceId::from(SCALE), SourceId::from(WEARABLE), SourceId::from(MANUAL)]
    );
    let fifth = view.point(d(2024, 1, 5)).unwrap();
    assert_eq!(fifth.method, MergeMethod::SingleSource);
    assert_eq!(fifth.value, 70.4);

    let pairs: Vec<(&str, &str)> = view
        .correlations
        .iter()
        .map(|c| (c.source_a.as_str(), c.source_b.as_str()))
        .collect();
    assert_eq!(pairs, vec![(SCALE, WEARABLE), (SCALE, MANUAL), (WEARABLE, MANUAL)]);

    let sw = view.correlation(SCALE, WEARABLE).unwrap();
    assert_eq!(sw.n, 12);
    assert_eq!(sw.status, CorrelationStatus::Computed);
    assert!(sw.pearson.is_some() && sw.icc.is_some() && sw.p_value.is_some());

    let sm = view.correlation(SCALE, MANUAL).unwrap();
    assert_eq!(sm.n, 3);
    assert!(sm.is_insufficient());

    let stamp = sw.computed_at.expect("stamped");
    assert!(view.correlations.iter().all(|c| c.computed_at == Some(stamp)));
}

#[tokio::test]
async fn fused_view_uses_median() {
    let concord = body_weight_concord();
    let opts = ViewOptions::new(ResolutionPolicy::Fuse(FusionMethod::Median));
    let view = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &opts)
        .await
        .unwrap();
    let first = view.point(d(2024, 1, 1)).unwrap();
    assert!((first.value - 155.0 * LB_TO_KG).abs() < 1e-9);
    assert_eq!(first.method, MergeMethod::Fused(FusionMethod::Median));
    assert_eq!(first.chosen_source.as_str(), SCALE);
}

#[tokio::test]
async fn stored_preferences_drive_resolution() {
    let concord = body_weight_concord();
    let pref = UserMergePreference {
        preferred_source: Some(SourceId::from(WEARABLE)),
        disagreement_threshold_pct: Some(0.1),
        ..UserMergePreference::default()
    };
    let opts = ViewOptions::try_from_preference(&pref).unwrap();
    let view = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &opts)
        .await
        .unwrap();
    let first = view.point(d(2024, 1, 1)).unwrap();
    assert_eq!(first.chosen_source.as_str(), WEARABLE);
    // 70.2 vs 70.5 is about 0.43% of the merged value.
    assert!(first.disagreement);
}

#[tokio::test]
async fn range_is_forwarded_to_providers() {
    let concord = body_weight_concord();
    let req = SeriesRequest::try_from_range(BODY_WEIGHT, d(2024, 1, 3), d(2024, 1, 5)).unwrap();
    let view = concord.merged_view(&req, &ViewOptions::default()).await.unwrap();
    let dates: Vec<_> = view.points.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![d(2024, 1, 3), d(2024, 1, 4), d(2024, 1, 5)]);
}

#[tokio::test]
async fn unknown_group_is_not_found() {
    let concord = body_weight_concord();
    let err = concord
        .merged_view(&SeriesRequest::new("sleep_hours"), &ViewOptions::default())
        .await
        .expect_err("should error");
    assert!(matches!(err, ConcordError::NotFound { .. }));
}

#[tokio::test]
async fn inverted_range_is_invalid_arg() {
    let concord = body_weight_concord();
    let req = SeriesRequest {
        group: BODY_WEIGHT.to_string(),
        start: Some(d(2024, 2, 1)),
        end: Some(d(2024, 1, 1)),
    };
    let err = concord
        .merged_view(&req, &ViewOptions::default())
        .await
        .expect_err("should error");
    assert!(matches!(err, ConcordError::InvalidArg(_)));
}

#[tokio::test]
async fn group_without_registered_provider_is_not_found() {
    let concord = body_weight_concord();
    let err = concord
        .merged_view(&SeriesRequest::new(RESTING_HR), &ViewOptions::default())
        .await
        .expect_err("should error");
    assert!(matches!(err, ConcordError::NotFound { .. }));
}

#[tokio::test]
async fn unmapped_providers_are_not_called() {
    let (stray, ctl) = scripted("thermometer");
    let concord = builder()
        .with_provider(fixture(SCALE))
        .with_provider(stray)
        .build()
        .unwrap();
    concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &ViewOptions::default())
        .await
        .unwrap();
    assert_eq!(ctl.call_count().await, 0);
}
