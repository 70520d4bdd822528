use cattle_api::Prediction;

/// Predictions whose locations include `home`, in their original order.
///
/// Matching is case-insensitive on trimmed names. Without a home location
/// nothing matches. The input is never modified.
pub fn filter_by_location(predictions: &[Prediction], home: Option<&str>) -> Vec<Prediction> {
    let Some(home) = home.map(str::trim).filter(|h| !h.is_empty()) else {
        return Vec::new();
    };
    let home = home.to_lowercase();

    predictions
        .iter()
        .filter(|prediction| {
            prediction
                .location
                .iter()
                .any(|location| location.trim().to_lowercase() == home)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(breed: &str, locations: &[&str]) -> Prediction {
        Prediction {
            breed_id: Some(format!("id-{}", breed.to_lowercase())),
            breed: Some(breed.to_string()),
            accuracy: Some(0.5),
            location: locations.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn breeds(predictions: &[Prediction]) -> Vec<&str> {
        predictions.iter().filter_map(|p| p.breed.as_deref()).collect()
    }

    #[test]
    fn test_keeps_matching_breeds_only() {
        let batch = vec![prediction("Gir", &["Odisha"]), prediction("Murrah", &["Punjab"])];
        let original = batch.clone();

        let filtered = filter_by_location(&batch, Some("Odisha"));
        assert_eq!(filtered, vec![prediction("Gir", &["Odisha"])]);
        assert_eq!(batch, original);
    }

    #[test]
    fn test_case_insensitive_and_order_preserving() {
        let batch = vec![
            prediction("Sahiwal", &["Punjab", "ODISHA"]),
            prediction("Murrah", &["Haryana"]),
            prediction("Gir", &[" odisha "]),
        ];

        let filtered = filter_by_location(&batch, Some("Odisha"));
        assert_eq!(breeds(&filtered), ["Sahiwal", "Gir"]);
    }

    #[test]
    fn test_idempotent() {
        let batch = vec![
            prediction("Gir", &["Odisha"]),
            prediction("Murrah", &["Punjab"]),
            prediction("Binjharpuri", &["Odisha", "Bihar"]),
        ];

        let once = filter_by_location(&batch, Some("odisha"));
        let twice = filter_by_location(&once, Some("odisha"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_home_location_yields_nothing() {
        let batch = vec![prediction("Gir", &["Odisha"])];
        assert!(filter_by_location(&batch, None).is_empty());
        assert!(filter_by_location(&batch, Some("  ")).is_empty());
    }

    #[test]
    fn test_partial_names_do_not_match() {
        let batch = vec![prediction("Gir", &["North Odisha"])];
        assert!(filter_by_location(&batch, Some("Odisha")).is_empty());
    }
}
