use std::time::Duration;

use concord::{
    Concord, ConcordError, DEFAULT_PROVIDER_TIMEOUT, GroupDefinition, MergeGroup, SourceMapping,
};

use crate::helpers::{BODY_WEIGHT, SCALE, WEARABLE, builder, fixture};

#[test]
fn build_without_providers_is_invalid_arg() {
    let err = Concord::builder().build().err().expect("should error");
    assert!(matches!(err, ConcordError::InvalidArg(_)));
}

#[test]
fn duplicate_provider_source_is_rejected() {
    let err = builder()
        .with_provider(fixture(SCALE))
        .with_provider(fixture(SCALE))
        .build()
        .err()
        .expect("should error");
    assert!(err.is_configuration());
}

#[test]
fn invalid_group_is_rejected_at_build() {
    let bad = GroupDefinition::new(
        MergeGroup::new("body_temp", "Body temperature", "C"),
        vec![SourceMapping::new("", "thermo", "F", 1).with_conversion(0.0, 0.0)],
    );
    let err = builder()
        .with_provider(fixture(SCALE))
        .with_group(bad)
        .build()
        .err()
        .expect("should error");
    assert!(err.is_configuration());
}

#[test]
fn defaults_and_overrides() {
    let c = Concord::builder()
        .with_provider(fixture(SCALE))
        .build()
        .unwrap();
    assert_eq!(c.config().provider_timeout, DEFAULT_PROVIDER_TIMEOUT);
    assert!(c.config().request_timeout.is_none());
    assert!(c.catalog().groups.is_empty());

    let c = builder()
        .with_provider(fixture(SCALE))
        .request_timeout(Duration::from_secs(1))
        .cache_capacity(8)
        .cache_ttl(Duration::from_secs(30))
        .build()
        .unwrap();
    assert_eq!(c.config().request_timeout, Some(Duration::from_secs(1)));
    assert_eq!(c.config().cache_capacity, 8);
    assert_eq!(c.config().cache_ttl, Duration::from_secs(30));
}

#[test]
fn with_group_replaces_catalog_entry() {
    let replacement = GroupDefinition::new(
        MergeGroup::new(BODY_WEIGHT, "Weight", "lb"),
        vec![SourceMapping::new("", WEARABLE, "lb", 1)],
    );
    let c = builder()
        .with_provider(fixture(WEARABLE))
        .with_group(replacement)
        .build()
        .unwrap();
    let def = c.catalog().get(BODY_WEIGHT).unwrap();
    assert_eq!(def.group.canonical_unit, "lb");
    assert_eq!(def.sources.len(), 1);
    assert!(c.catalog().get("resting_hr").is_some());
}
