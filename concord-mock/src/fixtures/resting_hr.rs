pub fn by_source(s: &str) -> Option<&'static [(&'static str, f64)]> {
    match s {
        "chest_strap" => Some(&[
            ("2024-01-01", 58.0),
            ("2024-01-02", 57.0),
            ("2024-01-03", 59.0),
            ("2024-01-04", 60.0),
            ("2024-01-05", 56.0),
            ("2024-01-06", 58.0),
            ("2024-01-07", 57.0),
            ("2024-01-08", 61.0),
            ("2024-01-09", 59.0),
            ("2024-01-10", 58.0),
        ]),
        "watch" => Some(&[
            ("2024-01-01", 60.0),
            ("2024-01-02", 58.0),
            ("2024-01-03", 60.0),
            ("2024-01-04", 62.0),
            ("2024-01-05", 57.0),
            ("2024-01-06", 59.0),
            ("2024-01-07", 59.0),
            ("2024-01-08", 63.0),
            ("2024-01-09", 60.0),
            ("2024-01-10", 59.0),
        ]),
        _ => None,
    }
}
