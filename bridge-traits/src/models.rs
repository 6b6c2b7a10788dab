//! Payloads returned by the health SDK.
//!
//! The vendor schemas are large and versioned independently of this bridge.
//! Each model types the handful of fields the core reasons about and keeps
//! everything else in a flattened `extra` map, so unknown fields survive a
//! decode/encode cycle unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Free-form fields not modelled explicitly.
pub type Extra = Map<String, Value>;

/// Time window and provenance shared by every historical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Owner of a data payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Envelope returned by the historical getters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPayload<T> {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<TerraUser>,
    pub data: Vec<T>,
}

impl<T> DataPayload<T> {
    pub fn new(kind: impl Into<String>, data: Vec<T>) -> Self {
        Self {
            kind: Some(kind.into()),
            user: None,
            data,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyData {
    pub metadata: DataMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glucose_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityData {
    pub metadata: DataMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyData {
    pub metadata: DataMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionData {
    pub metadata: DataMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meals: Vec<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepData {
    pub metadata: DataMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_durations_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenstruationData {
    pub metadata: DataMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menstruation_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthletePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<TerraUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athlete: Option<AthleteData>,
}

/// One glucose point read from a CGM sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSample {
    pub timestamp: String,
    pub value: f64,
}

/// Result of an NFC scan of a glucose sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlucoseReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Vec<GlucoseSample>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Result of activating a new glucose sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorActivation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedWorkoutMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub workout_type: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Structured workout plan shared with the platform's workout scheduler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedWorkout {
    pub metadata: PlannedWorkoutMetadata,
    #[serde(default)]
    pub steps: Vec<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}
