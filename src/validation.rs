// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Advisory input checks for forms.
//!
//! These guards run before submission. The persistence layer does not
//! repeat them.

use crate::models::HealthLogInput;
use crate::units::{HeightUnit, WeightUnit};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const MAX_STEPS: i64 = 100_000;
pub const MIN_HEART_RATE: i64 = 30;
pub const MAX_HEART_RATE: i64 = 250;
pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const MAX_WATER_ML: f64 = 10_000.0;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_AGE: u32 = 13;
pub const MAX_AGE: u32 = 120;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Outcome of a multi-rule check. Never an error; callers display `errors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Range-check the fields present on a log. Absent fields are skipped.
pub fn validate_health_log(log: &HealthLogInput) -> ValidationResult {
    let mut errors = Vec::new();

    if let Some(steps) = log.steps {
        if steps < 0 {
            errors.push("Steps cannot be negative".to_string());
        }
        if steps > MAX_STEPS {
            errors.push("Steps seems unrealistic (max 100,000)".to_string());
        }
    }

    if let Some(heart_rate) = log.heart_rate {
        if !(MIN_HEART_RATE..=MAX_HEART_RATE).contains(&heart_rate) {
            errors.push("Heart rate must be between 30-250 BPM".to_string());
        }
    }

    if let Some(sleep) = log.sleep_duration {
        if !(0.0..=MAX_SLEEP_HOURS).contains(&sleep) {
            errors.push("Sleep duration must be between 0-24 hours".to_string());
        }
    }

    if log.calories_consumed.is_some_and(|c| c < 0.0) {
        errors.push("Calories consumed cannot be negative".to_string());
    }

    if log.calories_burned.is_some_and(|c| c < 0.0) {
        errors.push("Calories burned cannot be negative".to_string());
    }

    if log
        .water_intake
        .is_some_and(|w| !(0.0..=MAX_WATER_ML).contains(&w))
    {
        errors.push("Water intake must be between 0-10,000 ml".to_string());
    }

    ValidationResult::from_errors(errors)
}

/// Basic `local@domain.tld` shape check.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

/// Password strength: length, upper, lower and digit. No symbol rule.
pub fn validate_password(password: &str) -> ValidationResult {
    let mut errors = Vec::new();

    // Length in UTF-16 units, as the mobile client measures it
    if password.encode_utf16().count() < MIN_PASSWORD_LENGTH {
        errors.push("Password must be at least 8 characters".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }

    ValidationResult::from_errors(errors)
}

pub fn validate_age(age: u32) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&age)
}

/// Height bounds: 50-300 cm, or 20-120 total inches.
pub fn validate_height(height: f64, unit: HeightUnit) -> bool {
    match unit {
        HeightUnit::Cm => (50.0..=300.0).contains(&height),
        HeightUnit::FtIn => (20.0..=120.0).contains(&height),
    }
}

/// Weight bounds: 20-300 kg, or 44-660 lbs.
pub fn validate_weight(weight: f64, unit: WeightUnit) -> bool {
    match unit {
        WeightUnit::Kg => (20.0..=300.0).contains(&weight),
        WeightUnit::Lbs => (44.0..=660.0).contains(&weight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_log() {
        let log = HealthLogInput {
            steps: Some(8_000),
            heart_rate: Some(65),
            sleep_duration: Some(7.5),
            calories_consumed: Some(2_100.0),
            calories_burned: Some(400.0),
            water_intake: Some(2_000.0),
            ..Default::default()
        };

        let result = validate_health_log(&log);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_absent_fields_skipped() {
        let result = validate_health_log(&HealthLogInput::default());
        assert!(result.is_valid);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let log = HealthLogInput {
            steps: Some(MAX_STEPS),
            heart_rate: Some(MIN_HEART_RATE),
            sleep_duration: Some(24.0),
            calories_consumed: Some(0.0),
            water_intake: Some(10_000.0),
            ..Default::default()
        };
        assert!(validate_health_log(&log).is_valid);

        let log = HealthLogInput {
            heart_rate: Some(MAX_HEART_RATE),
            sleep_duration: Some(0.0),
            water_intake: Some(0.0),
            steps: Some(0),
            ..Default::default()
        };
        assert!(validate_health_log(&log).is_valid);
    }

    #[test]
    fn test_one_error_per_bad_field() {
        let log = HealthLogInput {
            steps: Some(-5),
            heart_rate: Some(300),
            sleep_duration: Some(25.0),
            calories_consumed: Some(-1.0),
            calories_burned: Some(-1.0),
            water_intake: Some(10_001.0),
            ..Default::default()
        };

        let result = validate_health_log(&log);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                "Steps cannot be negative",
                "Heart rate must be between 30-250 BPM",
                "Sleep duration must be between 0-24 hours",
                "Calories consumed cannot be negative",
                "Calories burned cannot be negative",
                "Water intake must be between 0-10,000 ml",
            ]
        );
    }

    #[test]
    fn test_too_many_steps() {
        let log = HealthLogInput {
            steps: Some(100_001),
            ..Default::default()
        };
        let result = validate_health_log(&log);
        assert_eq!(result.errors, vec!["Steps seems unrealistic (max 100,000)"]);
    }

    #[test]
    fn test_heart_rate_below_range() {
        let log = HealthLogInput {
            heart_rate: Some(29),
            ..Default::default()
        };
        assert_eq!(validate_health_log(&log).errors.len(), 1);
    }

    #[test]
    fn test_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last+tag@sub.example.co"));
        assert!(!validate_email("user@example"));
        assert!(!validate_email("user example@example.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@@example.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Passw0rdOk").is_valid);

        let result = validate_password("short");
        assert_eq!(
            result.errors,
            vec![
                "Password must be at least 8 characters",
                "Password must contain at least one uppercase letter",
                "Password must contain at least one number",
            ]
        );

        let result = validate_password("ALLUPPERCASE1");
        assert_eq!(
            result.errors,
            vec!["Password must contain at least one lowercase letter"]
        );
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        // Each emoji is a surrogate pair, so this is 9 units long
        assert!(validate_password("Aa1\u{1F600}\u{1F600}\u{1F600}").is_valid);
        assert!(!validate_password("Aa1\u{1F600}\u{1F600}").is_valid);
    }

    #[test]
    fn test_age_bounds() {
        assert!(!validate_age(12));
        assert!(validate_age(13));
        assert!(validate_age(120));
        assert!(!validate_age(121));
    }

    #[test]
    fn test_height_bounds() {
        assert!(validate_height(50.0, HeightUnit::Cm));
        assert!(validate_height(300.0, HeightUnit::Cm));
        assert!(!validate_height(49.9, HeightUnit::Cm));
        assert!(validate_height(20.0, HeightUnit::FtIn));
        assert!(!validate_height(121.0, HeightUnit::FtIn));
    }

    #[test]
    fn test_weight_bounds() {
        assert!(validate_weight(20.0, WeightUnit::Kg));
        assert!(!validate_weight(301.0, WeightUnit::Kg));
        assert!(validate_weight(44.0, WeightUnit::Lbs));
        assert!(validate_weight(660.0, WeightUnit::Lbs));
        assert!(!validate_weight(43.0, WeightUnit::Lbs));
    }
}
