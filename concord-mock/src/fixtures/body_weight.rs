// Daily weigh-ins over two weeks. The wearable reports in pounds and skips two days.
pub fn by_source(s: &str) -> Option<&'static [(&'static str, f64)]> {
    match s {
        "scale_api" => Some(&[
            ("2024-01-01", 70.2),
            ("2024-01-02", 70.0),
            ("2024-01-03", 69.9),
            ("2024-01-04", 70.1),
            ("2024-01-05", 70.4),
            ("2024-01-06", 70.3),
            ("2024-01-07", 70.0),
            ("2024-01-08", 69.8),
            ("2024-01-09", 69.7),
            ("2024-01-10", 69.9),
            ("2024-01-11", 70.0),
            ("2024-01-12", 70.2),
            ("2024-01-13", 70.1),
            ("2024-01-14", 69.9),
        ]),
        "wearable_api" => Some(&[
            ("2024-01-01", 155.0),
            ("2024-01-02", 154.6),
            ("2024-01-03", 154.3),
            ("2024-01-04", 154.8),
            ("2024-01-06", 155.2),
            ("2024-01-07", 154.5),
            ("2024-01-08", 154.0),
            ("2024-01-10", 154.2),
            ("2024-01-11", 154.5),
            ("2024-01-12", 155.0),
            ("2024-01-13", 154.8),
            ("2024-01-14", 154.3),
        ]),
        "manual" => Some(&[
            ("2024-01-01", 70.5),
            ("2024-01-07", 70.1),
            ("2024-01-14", 70.0),
        ]),
        _ => None,
    }
}
