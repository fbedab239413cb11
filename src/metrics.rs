// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived health metrics: BMI, calorie and water targets, goal progress.
//!
//! All functions are pure. Inputs are assumed to have passed
//! [`crate::validation`]; a non-positive height makes BMI meaningless.

use crate::models::{Gender, HealthLog};
use crate::units::HeightUnit;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const COLOR_WARNING: &str = "#FFA500";
pub const COLOR_SUCCESS: &str = "#50C878";
pub const COLOR_ERROR: &str = "#FF6B6B";

/// Lower bound of the normal band (inclusive).
pub const BMI_NORMAL_MIN: f64 = 18.5;
/// Lower bound of the overweight band (inclusive).
pub const BMI_OVERWEIGHT_MIN: f64 = 25.0;
/// Lower bound of the obese band (inclusive).
pub const BMI_OBESE_MIN: f64 = 30.0;

/// Milliliters of water per kilogram of body weight.
const WATER_ML_PER_KG: f64 = 35.0;

/// Body mass index, rounded to one decimal place.
///
/// `height` is interpreted by `height_unit` (centimeters, or total inches
/// for feet-inches).
pub fn calculate_bmi(weight_kg: f64, height: f64, height_unit: HeightUnit) -> f64 {
    let meters = height_unit.to_meters(height);
    let bmi = weight_kg / (meters * meters);
    (bmi * 10.0).round() / 10.0
}

/// BMI band. Each band includes its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < BMI_NORMAL_MIN {
            BmiCategory::Underweight
        } else if bmi < BMI_OVERWEIGHT_MIN {
            BmiCategory::Normal
        } else if bmi < BMI_OBESE_MIN {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Display color for the band.
    pub fn color(self) -> &'static str {
        match self {
            BmiCategory::Underweight | BmiCategory::Overweight => COLOR_WARNING,
            BmiCategory::Normal => COLOR_SUCCESS,
            BmiCategory::Obese => COLOR_ERROR,
        }
    }
}

pub fn get_bmi_category(bmi: f64) -> &'static str {
    BmiCategory::from_bmi(bmi).label()
}

pub fn get_bmi_color(bmi: f64) -> &'static str {
    BmiCategory::from_bmi(bmi).color()
}

/// Activity level used to scale basal metabolic rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (little or no exercise)",
            ActivityLevel::Light => "Light (exercise 1-3 days/week)",
            ActivityLevel::Moderate => "Moderate (exercise 3-5 days/week)",
            ActivityLevel::Active => "Active (exercise 6-7 days/week)",
            ActivityLevel::VeryActive => "Very Active (intense exercise daily)",
        }
    }
}

/// Daily calorie need from the Mifflin-St Jeor equation.
///
/// Only `Gender::Male` uses the male constant; every other value uses the
/// female one. A missing activity level means moderate.
pub fn calculate_daily_calories(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    activity_level: Option<ActivityLevel>,
) -> i64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    let bmr = match gender {
        Gender::Male => base + 5.0,
        _ => base - 161.0,
    };

    (bmr * activity_level.unwrap_or_default().multiplier()).round() as i64
}

/// Recommended daily water intake in milliliters.
pub fn calculate_water_intake(weight_kg: f64) -> i64 {
    (weight_kg * WATER_ML_PER_KG).round() as i64
}

/// Percentage of `target` reached, rounded half-up and capped at 100.
///
/// A zero target yields 0. Negative progress is not clamped.
pub fn get_percentage(current: f64, target: f64) -> i64 {
    if target == 0.0 {
        return 0;
    }
    let pct = (current / target * 100.0 + 0.5).floor() as i64;
    pct.min(100)
}

/// Default daily targets shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthTargets {
    pub steps: f64,
    pub calories_burned: f64,
    pub calories_consumed: f64,
    /// Milliliters
    pub water_intake: f64,
    /// Hours
    pub sleep_duration: f64,
    pub heart_rate_min: i64,
    pub heart_rate_max: i64,
}

impl Default for HealthTargets {
    fn default() -> Self {
        Self {
            steps: 10_000.0,
            calories_burned: 500.0,
            calories_consumed: 2_000.0,
            water_intake: 2_500.0,
            sleep_duration: 8.0,
            heart_rate_min: 60,
            heart_rate_max: 100,
        }
    }
}

/// Per-metric progress of one day's log against the targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProgress {
    pub steps: i64,
    pub calories_burned: i64,
    pub calories_consumed: i64,
    pub water_intake: i64,
    pub sleep_duration: i64,
    pub heart_rate_in_range: bool,
}

impl TargetProgress {
    pub fn from_log(log: &HealthLog, targets: &HealthTargets) -> Self {
        Self {
            steps: get_percentage(log.steps as f64, targets.steps),
            calories_burned: get_percentage(log.calories_burned, targets.calories_burned),
            calories_consumed: get_percentage(log.calories_consumed, targets.calories_consumed),
            water_intake: get_percentage(log.water_intake, targets.water_intake),
            sleep_duration: get_percentage(log.sleep_duration, targets.sleep_duration),
            heart_rate_in_range: (targets.heart_rate_min..=targets.heart_rate_max)
                .contains(&log.heart_rate),
        }
    }
}
