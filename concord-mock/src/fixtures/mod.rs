use chrono::NaiveDate;
use concord_core::{
    CorrelationSettings, GroupCatalog, GroupDefinition, MergeGroup, RawObservation, SourceMapping,
};

mod body_weight;
mod resting_hr;

/// Pounds to kilograms.
pub const LB_TO_KG: f64 = 0.453_592_37;

/// Fixture series for a `(group, source)` pair, if one exists.
#[must_use]
pub fn series(group: &str, source: &str) -> Option<Vec<RawObservation>> {
    let rows = match group {
        "body_weight" => body_weight::by_source(source)?,
        "resting_hr" => resting_hr::by_source(source)?,
        _ => return None,
    };
    Some(build(source, rows))
}

/// Catalog describing every fixture group and its mappings.
#[must_use]
pub fn catalog() -> GroupCatalog {
    let mut catalog = GroupCatalog::default();
    catalog.insert(GroupDefinition::new(
        MergeGroup::new("body_weight", "Body weight", "kg").with_category("body"),
        vec![
            SourceMapping::new("", "scale_api", "kg", 1).with_accuracy(99.5),
            SourceMapping::new("", "wearable_api", "lb", 2)
                .with_conversion(LB_TO_KG, 0.0)
                .with_accuracy(97.0),
            SourceMapping::new("", "manual", "kg", 3).with_accuracy(95.0),
        ],
    ));
    catalog.insert(GroupDefinition::new(
        MergeGroup::new("resting_hr", "Resting heart rate", "bpm")
            .with_category("heart")
            .with_correlation(CorrelationSettings {
                enabled: true,
                min_data_points: Some(5),
                window_days: None,
            }),
        vec![
            SourceMapping::new("", "chest_strap", "bpm", 1).with_accuracy(99.0),
            SourceMapping::new("", "watch", "bpm", 2).with_accuracy(95.0),
        ],
    ));
    catalog
}

fn build(source: &str, rows: &[(&str, f64)]) -> Vec<RawObservation> {
    rows.iter()
        .filter_map(|&(date, value)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
            Some(RawObservation::new(source, date, value))
        })
        .collect()
}
