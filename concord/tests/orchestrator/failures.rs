use std::time::Duration;

use concord::{ConcordError, SeriesRequest, ViewOptions};
use concord_mock::MockBehavior;

use crate::helpers::{BODY_WEIGHT, MANUAL, SCALE, WEARABLE, builder, daily, fixture, scripted};

#[tokio::test]
async fn failing_provider_becomes_warning() {
    let (wearable, ctl) = scripted(WEARABLE);
    ctl.set_behavior(BODY_WEIGHT, MockBehavior::Fail(ConcordError::Other("boom".into())))
        .await;
    let concord = builder()
        .with_provider(fixture(SCALE))
        .with_provider(wearable)
        .with_provider(fixture(MANUAL))
        .build()
        .unwrap();

    let view = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &ViewOptions::default())
        .await
        .expect("partial view");
    assert_eq!(view.points.len(), 14);
    match view.warnings.as_slice() {
        [ConcordError::Provider { source_id, msg }] => {
            assert_eq!(source_id, WEARABLE);
            assert!(msg.contains("boom"));
        }
        other => panic!("unexpected warnings: {other:?}"),
    }
    // The failed source still has a (empty) pair row.
    assert_eq!(view.correlation(SCALE, WEARABLE).unwrap().n, 0);
}

#[tokio::test]
async fn hanging_provider_times_out_into_warning() {
    let (wearable, ctl) = scripted(WEARABLE);
    ctl.set_behavior(BODY_WEIGHT, MockBehavior::Hang).await;
    let concord = builder()
        .with_provider(fixture(SCALE))
        .with_provider(wearable)
        .build()
        .unwrap();

    let view = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &ViewOptions::default())
        .await
        .expect("partial view");
    assert!(matches!(
        view.warnings.as_slice(),
        [ConcordError::ProviderTimeout { source_id }] if source_id == WEARABLE
    ));
    assert_eq!(view.points.len(), 14);
}

#[tokio::test]
async fn all_providers_timed_out() {
    let (scale, s_ctl) = scripted(SCALE);
    let (wearable, w_ctl) = scripted(WEARABLE);
    s_ctl.set_behavior(BODY_WEIGHT, MockBehavior::Hang).await;
    w_ctl.set_behavior(BODY_WEIGHT, MockBehavior::Hang).await;
    let concord = builder()
        .with_provider(scale)
        .with_provider(wearable)
        .build()
        .unwrap();

    let err = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &ViewOptions::default())
        .await
        .expect_err("should error");
    assert!(matches!(err, ConcordError::AllProvidersTimedOut { group } if group == BODY_WEIGHT));
}

#[tokio::test]
async fn all_providers_failed_keeps_each_error() {
    let (scale, s_ctl) = scripted(SCALE);
    let (wearable, w_ctl) = scripted(WEARABLE);
    s_ctl.set_behavior(BODY_WEIGHT, MockBehavior::Fail(ConcordError::provider(SCALE, "503")))
        .await;
    w_ctl.set_behavior(BODY_WEIGHT, MockBehavior::Hang).await;
    let concord = builder()
        .with_provider(scale)
        .with_provider(wearable)
        .build()
        .unwrap();

    let err = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &ViewOptions::default())
        .await
        .expect_err("should error");
    let flat = err.flatten();
    assert_eq!(flat.len(), 2);
    assert!(flat.iter().any(|e| matches!(e, ConcordError::Provider { .. })));
    assert!(flat.iter().any(|e| matches!(e, ConcordError::ProviderTimeout { .. })));
}

#[tokio::test]
async fn all_providers_not_found_is_not_found() {
    // Unscripted dynamic providers answer NotFound.
    let (scale, _s_ctl) = scripted(SCALE);
    let (wearable, _w_ctl) = scripted(WEARABLE);
    let concord = builder()
        .with_provider(scale)
        .with_provider(wearable)
        .build()
        .unwrap();

    let err = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &ViewOptions::default())
        .await
        .expect_err("should error");
    assert!(matches!(err, ConcordError::NotFound { .. }));
    assert!(!err.is_actionable());
}

#[tokio::test]
async fn request_deadline_discards_partial_results() {
    let (wearable, ctl) = scripted(WEARABLE);
    ctl.set_behavior(BODY_WEIGHT, MockBehavior::Hang).await;
    let concord = builder()
        .with_provider(fixture(SCALE))
        .with_provider(wearable)
        .provider_timeout(Duration::from_secs(5))
        .request_timeout(Duration::from_millis(30))
        .build()
        .unwrap();

    let err = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &ViewOptions::default())
        .await
        .expect_err("should error");
    assert!(matches!(err, ConcordError::RequestTimeout { group } if group == BODY_WEIGHT));
}

#[tokio::test]
async fn empty_success_still_merges() {
    let (scale, s_ctl) = scripted(SCALE);
    let (wearable, w_ctl) = scripted(WEARABLE);
    s_ctl.set_behavior(BODY_WEIGHT, MockBehavior::Return(vec![])).await;
    w_ctl.set_behavior(BODY_WEIGHT, MockBehavior::Return(daily(WEARABLE, &[154.0, 155.0])))
        .await;
    let concord = builder()
        .with_provider(scale)
        .with_provider(wearable)
        .build()
        .unwrap();

    let view = concord
        .merged_view(&SeriesRequest::new(BODY_WEIGHT), &ViewOptions::default())
        .await
        .unwrap();
    assert_eq!(view.points.len(), 2);
    assert!(view.points.iter().all(|p| p.chosen_source.as_str() == WEARABLE));
    assert!(view.warnings.is_empty());
}
