// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Measurement units and conversions.
//!
//! Heights entered as feet and inches are stored as total inches, so
//! `HeightUnit::FtIn` values are always inches.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const KG_PER_LB: f64 = 0.453_592_37;
pub const CM_PER_INCH: f64 = 2.54;
pub const METERS_PER_INCH: f64 = 0.0254;
pub const ML_PER_LITER: f64 = 1000.0;
pub const ML_PER_FL_OZ: f64 = 29.5735;
pub const ML_PER_CUP: f64 = 240.0;

/// Unit a profile height is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub enum HeightUnit {
    #[default]
    #[serde(rename = "cm")]
    Cm,
    /// Feet and inches, stored as total inches.
    #[serde(rename = "ft-in")]
    FtIn,
}

impl HeightUnit {
    /// Convert a height in this unit to meters.
    pub fn to_meters(self, height: f64) -> f64 {
        match self {
            HeightUnit::Cm => height / 100.0,
            HeightUnit::FtIn => height * METERS_PER_INCH,
        }
    }

    /// Convert a height in this unit to centimeters.
    pub fn to_cm(self, height: f64) -> f64 {
        match self {
            HeightUnit::Cm => height,
            HeightUnit::FtIn => inches_to_cm(height),
        }
    }
}

/// Unit a profile weight is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert a weight in this unit to kilograms.
    pub fn to_kg(self, weight: f64) -> f64 {
        match self {
            WeightUnit::Kg => weight,
            WeightUnit::Lbs => lbs_to_kg(weight),
        }
    }
}

/// Units offered for water intake entry. Logs always store milliliters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "mobile/src/generated/")
)]
pub enum WaterUnit {
    #[default]
    #[serde(rename = "ml")]
    Ml,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "oz")]
    Oz,
    #[serde(rename = "cups")]
    Cups,
}

impl WaterUnit {
    fn ml_per_unit(self) -> f64 {
        match self {
            WaterUnit::Ml => 1.0,
            WaterUnit::L => ML_PER_LITER,
            WaterUnit::Oz => ML_PER_FL_OZ,
            WaterUnit::Cups => ML_PER_CUP,
        }
    }

    /// Convert an amount in this unit to milliliters.
    pub fn to_ml(self, amount: f64) -> f64 {
        amount * self.ml_per_unit()
    }

    /// Convert milliliters to this unit.
    pub fn from_ml(self, ml: f64) -> f64 {
        ml / self.ml_per_unit()
    }
}

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

pub fn kg_to_lbs(kg: f64) -> f64 {
    kg / KG_PER_LB
}

pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

/// Combine a feet + inches entry into total inches.
pub fn feet_inches_to_inches(feet: u32, inches: f64) -> f64 {
    f64::from(feet) * 12.0 + inches
}

/// Split total inches into whole feet and remaining inches.
pub fn inches_to_feet_inches(total_inches: f64) -> (u32, f64) {
    let feet = (total_inches / 12.0).floor().max(0.0);
    (feet as u32, total_inches - feet * 12.0)
}
