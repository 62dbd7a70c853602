use std::time::Duration;

use concord::{
    ConcordError, GroupDefinition, MergeGroup, SeriesRequest, SourceMapping, ViewOptions,
};
use concord_mock::{MockBehavior, fixtures::LB_TO_KG};

use crate::helpers::{BODY_WEIGHT, SCALE, WEARABLE, builder, d, daily, scripted};

const SCALE_KG: [f64; 12] = [
    70.2, 70.0, 69.9, 70.1, 70.4, 70.3, 70.0, 69.8, 69.7, 69.9, 70.0, 70.2,
];
const WEARABLE_LB: [f64; 12] = [
    155.0, 154.6, 154.3, 154.8, 155.4, 155.2, 154.5, 154.0, 153.8, 154.2, 154.5, 155.0,
];

/// Body weight served by the scale and the wearable only, so there is one pair.
fn two_source_body_weight() -> GroupDefinition {
    GroupDefinition::new(
        MergeGroup::new(BODY_WEIGHT, "Body weight", "kg"),
        vec![
            SourceMapping::new(BODY_WEIGHT, SCALE, "kg", 1),
            SourceMapping::new(BODY_WEIGHT, WEARABLE, "lb", 2).with_conversion(LB_TO_KG, 0.0),
        ],
    )
}

async fn scripted_concord(ttl: Duration) -> (concord::Concord, concord_mock::DynamicMockController) {
    let (concord, s_ctl, _) = scripted_pair(ttl).await;
    (concord, s_ctl)
}

async fn scripted_pair(
    ttl: Duration,
) -> (
    concord::Concord,
    concord_mock::DynamicMockController,
    concord_mock::DynamicMockController,
) {
    let (scale, s_ctl) = scripted(SCALE);
    let (wearable, w_ctl) = scripted(WEARABLE);
    s_ctl
        .set_behavior(BODY_WEIGHT, MockBehavior::Return(daily(SCALE, &SCALE_KG)))
        .await;
    w_ctl
        .set_behavior(BODY_WEIGHT, MockBehavior::Return(daily(WEARABLE, &WEARABLE_LB)))
        .await;
    let concord = builder()
        .with_group(two_source_body_weight())
        .with_provider(scale)
        .with_provider(wearable)
        .cache_ttl(ttl)
        .build()
        .unwrap();
    (concord, s_ctl, w_ctl)
}

#[tokio::test]
async fn correlation_report_is_cached_per_range() {
    let (concord, ctl) = scripted_concord(Duration::from_secs(60)).await;
    let req = SeriesRequest::new(BODY_WEIGHT);

    let first = concord.correlation_report(&req).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].source_a.as_str(), SCALE);
    assert_eq!(first[0].source_b.as_str(), WEARABLE);
    assert_eq!(first[0].n, 12);
    assert_eq!(ctl.call_count().await, 1);

    let second = concord.correlation_report(&req).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(ctl.call_count().await, 1, "second call served from cache");

    let narrower = SeriesRequest::try_from_range(BODY_WEIGHT, d(2024, 1, 1), d(2024, 1, 6)).unwrap();
    let third = concord.correlation_report(&narrower).await.unwrap();
    assert_eq!(third[0].n, 6);
    assert_eq!(ctl.call_count().await, 2);
}

#[tokio::test]
async fn merged_view_refreshes_cache() {
    let (concord, ctl) = scripted_concord(Duration::from_secs(60)).await;
    let req = SeriesRequest::new(BODY_WEIGHT);

    let view = concord
        .merged_view(&req, &ViewOptions::default())
        .await
        .unwrap();
    let report = concord.correlation_report(&req).await.unwrap();
    assert_eq!(report, view.correlations);
    assert_eq!(ctl.call_count().await, 1);

    // Recomputing always fetches and restamps.
    let again = concord
        .merged_view(&req, &ViewOptions::default())
        .await
        .unwrap();
    assert_eq!(ctl.call_count().await, 2);
    let cached = concord.correlation_report(&req).await.unwrap();
    assert_eq!(cached, again.correlations);
}

#[tokio::test]
async fn invalidate_forces_recompute() {
    let (concord, ctl) = scripted_concord(Duration::from_secs(60)).await;
    let req = SeriesRequest::new(BODY_WEIGHT);
    concord.correlation_report(&req).await.unwrap();
    concord.invalidate(&req).await;
    concord.correlation_report(&req).await.unwrap();
    assert_eq!(ctl.call_count().await, 2);
}

#[tokio::test]
async fn expired_entries_are_recomputed() {
    let (concord, ctl) = scripted_concord(Duration::from_millis(20)).await;
    let req = SeriesRequest::new(BODY_WEIGHT);
    concord.correlation_report(&req).await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    concord.correlation_report(&req).await.unwrap();
    assert_eq!(ctl.call_count().await, 2);
}

#[tokio::test]
async fn partial_report_is_not_cached() {
    let (concord, s_ctl, w_ctl) = scripted_pair(Duration::from_secs(60)).await;
    w_ctl
        .set_behavior(BODY_WEIGHT, MockBehavior::Fail(ConcordError::Other("down".into())))
        .await;
    let req = SeriesRequest::new(BODY_WEIGHT);

    let degraded = concord.correlation_report(&req).await.unwrap();
    assert_eq!(degraded[0].n, 0);
    assert_eq!(w_ctl.call_count().await, 1);

    w_ctl
        .set_behavior(BODY_WEIGHT, MockBehavior::Return(daily(WEARABLE, &WEARABLE_LB)))
        .await;
    let recovered = concord.correlation_report(&req).await.unwrap();
    assert_eq!(recovered[0].n, 12);
    assert_eq!(w_ctl.call_count().await, 2, "recomputed after the provider recovered");

    concord.correlation_report(&req).await.unwrap();
    assert_eq!(s_ctl.call_count().await, 2, "complete report served from cache");
}

#[tokio::test]
async fn partial_merged_view_keeps_earlier_complete_report() {
    let (concord, _s_ctl, w_ctl) = scripted_pair(Duration::from_secs(60)).await;
    let req = SeriesRequest::new(BODY_WEIGHT);
    let complete = concord.correlation_report(&req).await.unwrap();

    w_ctl.set_behavior(BODY_WEIGHT, MockBehavior::Hang).await;
    let view = concord
        .merged_view(&req, &ViewOptions::default())
        .await
        .unwrap();
    assert!(matches!(
        view.warnings.as_slice(),
        [ConcordError::ProviderTimeout { .. }]
    ));
    assert_eq!(concord.correlation_report(&req).await.unwrap(), complete);
}
