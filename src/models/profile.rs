// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User profile model and its partial-update form.

use crate::metrics::calculate_bmi;
use crate::units::{HeightUnit, WeightUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Gender as recorded at onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    #[serde(rename = "prefer-not-to-say")]
    Unspecified,
}

/// User profile stored in Firestore.
///
/// Stored at: `users/{uid}/profile/main`
///
/// Documents may be partial (the profile is built up through merge writes),
/// so every field falls back to its default when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    /// Owning user (also the parent document ID)
    pub uid: String,
    /// Display name
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// Height in `height_unit` (total inches for feet-inches)
    pub height: f64,
    /// Weight in `weight_unit`
    pub weight: f64,
    pub height_unit: HeightUnit,
    pub weight_unit: WeightUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// IANA timezone name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Empty profile for a user, the base every merge write lands on.
    pub fn empty(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            ..Default::default()
        }
    }

    /// Current BMI, interpreting height and weight by their unit fields.
    ///
    /// `None` when the profile does not yet carry a usable height or weight.
    pub fn bmi(&self) -> Option<f64> {
        if self.height <= 0.0 || self.weight <= 0.0 {
            return None;
        }
        Some(calculate_bmi(
            self.weight_unit.to_kg(self.weight),
            self.height,
            self.height_unit,
        ))
    }
}

/// Partial profile update. Present fields overwrite, absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_unit: Option<HeightUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<WeightUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl UserProfilePatch {
    /// Apply the present fields onto `profile`.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(gender) = self.gender {
            profile.gender = gender;
        }
        if let Some(height) = self.height {
            profile.height = height;
        }
        if let Some(weight) = self.weight {
            profile.weight = weight;
        }
        if let Some(unit) = self.height_unit {
            profile.height_unit = unit;
        }
        if let Some(unit) = self.weight_unit {
            profile.weight_unit = unit;
        }
        if let Some(url) = &self.avatar_url {
            profile.avatar_url = Some(url.clone());
        }
        if let Some(tz) = &self.timezone {
            profile.timezone = Some(tz.clone());
        }
    }

    /// Stored field names this patch touches.
    ///
    /// Used as the Firestore update mask, so it must match the serialized
    /// (camelCase) names on [`UserProfile`].
    pub fn field_mask(&self) -> Vec<&'static str> {
        let fields = [
            ("name", self.name.is_some()),
            ("age", self.age.is_some()),
            ("gender", self.gender.is_some()),
            ("height", self.height.is_some()),
            ("weight", self.weight.is_some()),
            ("heightUnit", self.height_unit.is_some()),
            ("weightUnit", self.weight_unit.is_some()),
            ("avatarUrl", self.avatar_url.is_some()),
            ("timezone", self.timezone.is_some()),
        ];

        fields
            .into_iter()
            .filter_map(|(name, present)| present.then_some(name))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.field_mask().is_empty()
    }
}
