use heritage_core::models::LngLat;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// All reasons joined for logging
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.location, e.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validate an optional entity location
pub fn validate_location(location: Option<&LngLat>) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let Some(location) = location else {
        result.add_error("location".to_string(), "No geo location".to_string());
        return result;
    };

    // Check for NaN or infinite coordinates
    if !location.lng.is_finite() || !location.lat.is_finite() {
        result.add_error(
            format!("LngLat({}, {})", location.lng, location.lat),
            "Coordinates must be finite".to_string(),
        );
        return result;
    }

    if !(-180.0..=180.0).contains(&location.lng) {
        result.add_error(
            format!("LngLat({}, {})", location.lng, location.lat),
            "Longitude must be within [-180, 180]".to_string(),
        );
    }

    if !(-90.0..=90.0).contains(&location.lat) {
        result.add_error(
            format!("LngLat({}, {})", location.lng, location.lat),
            "Latitude must be within [-90, 90]".to_string(),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_location() {
        let result = validate_location(Some(&LngLat::new(35.51, 33.89)));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_location() {
        let result = validate_location(None);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].reason, "No geo location");
    }

    #[test]
    fn test_non_finite_location() {
        let result = validate_location(Some(&LngLat::new(f64::INFINITY, 33.89)));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_both_ranges_reported() {
        let result = validate_location(Some(&LngLat::new(190.0, -95.0)));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.summary().contains("Longitude"));
        assert!(result.summary().contains("Latitude"));
    }
}
