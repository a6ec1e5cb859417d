//! Input validation and clamping
//!
//! Each physical quantity has a fixed inclusive range. Callers choose
//! between silently clamping (`clamp_*`), checking (`is_valid_*`) or
//! rejecting with a field-scoped error (`validate_*`). The calculators in
//! [`crate::metrics`] and [`crate::solver`] never apply these rules.

use std::fmt;

use crate::models::DEFAULT_WEIGHT_KG;

pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 200.0;
pub const MIN_SPEED_KMH: f64 = 1.0;
pub const MAX_SPEED_KMH: f64 = 20.0;
pub const MIN_INCLINE_PERCENT: f64 = 0.0;
pub const MAX_INCLINE_PERCENT: f64 = 25.0;
pub const MIN_TIME_MINUTES: f64 = 1.0;
pub const MAX_TIME_MINUTES: f64 = 120.0;

/// Largest seconds value in a set's minutes:seconds duration
pub const MAX_SET_SECONDS: u32 = 59;

/// Clamp into `[min, max]`; NaN maps to `min`
fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

// ============================================================================
// Clamp / Predicate Pairs
// ============================================================================

pub fn clamp_weight(weight_kg: f64) -> f64 {
    clamp_range(weight_kg, MIN_WEIGHT_KG, MAX_WEIGHT_KG)
}

pub fn is_valid_weight(weight_kg: f64) -> bool {
    in_range(weight_kg, MIN_WEIGHT_KG, MAX_WEIGHT_KG)
}

/// Weight used for calculations: the entered weight when valid, else
/// [`DEFAULT_WEIGHT_KG`]
pub fn effective_weight(weight_kg: f64) -> f64 {
    if is_valid_weight(weight_kg) {
        weight_kg
    } else {
        DEFAULT_WEIGHT_KG
    }
}

pub fn clamp_speed(speed_kmh: f64) -> f64 {
    clamp_range(speed_kmh, MIN_SPEED_KMH, MAX_SPEED_KMH)
}

pub fn is_valid_speed(speed_kmh: f64) -> bool {
    in_range(speed_kmh, MIN_SPEED_KMH, MAX_SPEED_KMH)
}

pub fn clamp_incline(incline_percent: f64) -> f64 {
    clamp_range(incline_percent, MIN_INCLINE_PERCENT, MAX_INCLINE_PERCENT)
}

pub fn is_valid_incline(incline_percent: f64) -> bool {
    in_range(incline_percent, MIN_INCLINE_PERCENT, MAX_INCLINE_PERCENT)
}

pub fn clamp_time(time_minutes: f64) -> f64 {
    clamp_range(time_minutes, MIN_TIME_MINUTES, MAX_TIME_MINUTES)
}

pub fn is_valid_time(time_minutes: f64) -> bool {
    in_range(time_minutes, MIN_TIME_MINUTES, MAX_TIME_MINUTES)
}

// ============================================================================
// Set Editor Rules
// ============================================================================

/// Incline as entered on a set: whole percent, clamped
pub fn clamp_set_incline(incline_percent: f64) -> f64 {
    clamp_incline(incline_percent).round()
}

/// Minutes field of a set: whole minutes in [0, 120]
pub fn clamp_set_minutes(minutes: f64) -> u32 {
    if minutes.is_nan() {
        return 0;
    }
    minutes.round().clamp(0.0, MAX_TIME_MINUTES) as u32
}

/// Seconds field of a set: whole seconds in [0, 59]
pub fn clamp_set_seconds(seconds: f64) -> u32 {
    if seconds.is_nan() {
        return 0;
    }
    seconds.round().clamp(0.0, MAX_SET_SECONDS as f64) as u32
}

/// Body weight as entered: 0.1 kg resolution, clamped
pub fn normalize_weight_entry(weight_kg: f64) -> f64 {
    clamp_weight((weight_kg * 10.0).round() / 10.0)
}

// ============================================================================
// Rejecting Validators
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" | "weight_kg" => "Body Weight",
        "speed" | "speed_kmh" => "Speed",
        "incline" | "incline_percent" => "Incline",
        "time" | "time_minutes" | "duration_minutes" => "Duration",
        "time_seconds" => "Seconds",
        "target_calories" => "Target Calories",
        "target_calories_per_minute" => "Target Calories/Min",
        "deficit" | "deficit_kcal" => "Calorie Deficit",
        "date" => "Date",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for ValidationError {}

fn validate_range(field: &str, value: f64, min: f64, max: f64, unit: &str) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a valid number"));
    }
    if !in_range(value, min, max) {
        return Err(ValidationError::new(
            field,
            &format!("must be between {min} and {max} {unit}"),
        ));
    }
    Ok(())
}

pub fn validate_weight(weight_kg: f64) -> Result<(), ValidationError> {
    validate_range("weight", weight_kg, MIN_WEIGHT_KG, MAX_WEIGHT_KG, "kg")
}

pub fn validate_speed(speed_kmh: f64) -> Result<(), ValidationError> {
    validate_range("speed", speed_kmh, MIN_SPEED_KMH, MAX_SPEED_KMH, "km/h")
}

pub fn validate_incline(incline_percent: f64) -> Result<(), ValidationError> {
    validate_range("incline", incline_percent, MIN_INCLINE_PERCENT, MAX_INCLINE_PERCENT, "%")
}

pub fn validate_time(time_minutes: f64) -> Result<(), ValidationError> {
    validate_range("time", time_minutes, MIN_TIME_MINUTES, MAX_TIME_MINUTES, "minutes")
}

/// Goal targets must be positive finite numbers
pub fn validate_target(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a valid number"));
    }
    if value <= 0.0 {
        return Err(ValidationError::new(field, "must be greater than zero"));
    }
    Ok(())
}

/// A deficit may be negative (a surplus day) but must be a number
pub fn validate_deficit(deficit_kcal: f64) -> Result<(), ValidationError> {
    if !deficit_kcal.is_finite() {
        return Err(ValidationError::new("deficit", "must be a valid number"));
    }
    Ok(())
}
