//! Health SDK Collaborator Contract
//!
//! The native health SDK (HealthKit/Freestyle Libre integration, vendor
//! backend sync, authorisation UI) lives outside this workspace. Hosts wrap it
//! in [`HealthSdk`] and [`HealthSession`] so the core can drive it without
//! knowing how data is acquired.
//!
//! ## Callbacks
//!
//! The SDK reports background health updates through a process-wide handler
//! registered with [`HealthSdk::set_update_handler`]. The handler may be
//! invoked from any SDK thread, so it is a plain synchronous closure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    ActivityData, AthletePayload, BodyData, DailyData, DataPayload, GlucoseReading,
    MenstruationData, NutritionData, PlannedWorkout, SensorActivation, SleepData,
};

/// External data source the SDK can connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Connection {
    /// Apple Health (HealthKit)
    AppleHealth,
    /// Abbott Freestyle Libre continuous glucose monitor
    FreestyleLibre,
}

/// Granular read permission requested when a connection is initialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    WorkoutType,
    ActivitySummary,
    Location,
    Calories,
    Steps,
    HeartRate,
    HeartRateVariability,
    #[serde(rename = "VO2MAX")]
    Vo2Max,
    Height,
    ActiveDurations,
    Weight,
    FlightsClimbed,
    Bmi,
    BodyFat,
    ExerciseDistance,
    Gender,
    DateOfBirth,
    BasalEnergyBurned,
    SwimmingSummary,
    RestingHeartRate,
    BloodPressure,
    BloodGlucose,
    BodyTemperature,
    Mindfulness,
    LeanBodyMass,
    OxygenSaturation,
    SleepAnalysis,
    RespiratoryRate,
    NutritionSodium,
    NutritionProtein,
    NutritionCarbohydrates,
    NutritionFibre,
    NutritionFatTotal,
    NutritionSugar,
    NutritionVitaminC,
    NutritionVitaminA,
    NutritionCalories,
    NutritionWater,
    NutritionCholesterol,
    Menstruation,
    Speed,
    Power,
    Electrocardiogram,
}

/// Category tag attached to a background health update.
///
/// Tags the bridge does not recognise are carried verbatim in `Other` so
/// newer SDK releases never break delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    Steps,
    HeartRate,
    HeartRateVariability,
    RestingHeartRate,
    Calories,
    Distance,
    ActiveMinutes,
    BloodGlucose,
    OxygenSaturation,
    Other(String),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Steps => "STEPS",
            DataType::HeartRate => "HEART_RATE",
            DataType::HeartRateVariability => "HEART_RATE_VARIABILITY",
            DataType::RestingHeartRate => "RESTING_HEART_RATE",
            DataType::Calories => "CALORIES",
            DataType::Distance => "DISTANCE",
            DataType::ActiveMinutes => "ACTIVE_MINUTES",
            DataType::BloodGlucose => "BLOOD_GLUCOSE",
            DataType::OxygenSaturation => "OXYGEN_SATURATION",
            DataType::Other(raw) => raw,
        }
    }
}

impl From<&str> for DataType {
    fn from(raw: &str) -> Self {
        match raw {
            "STEPS" => DataType::Steps,
            "HEART_RATE" => DataType::HeartRate,
            "HEART_RATE_VARIABILITY" => DataType::HeartRateVariability,
            "RESTING_HEART_RATE" => DataType::RestingHeartRate,
            "CALORIES" => DataType::Calories,
            "DISTANCE" => DataType::Distance,
            "ACTIVE_MINUTES" => DataType::ActiveMinutes,
            "BLOOD_GLUCOSE" => DataType::BloodGlucose,
            "OXYGEN_SATURATION" => DataType::OxygenSaturation,
            other => DataType::Other(other.to_string()),
        }
    }
}

impl From<String> for DataType {
    fn from(raw: String) -> Self {
        DataType::from(raw.as_str())
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.as_str().to_string()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One measurement inside a [`HealthUpdate`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSample {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Background update produced by the SDK's data collector.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthUpdate {
    pub data_type: DataType,
    pub samples: Vec<UpdateSample>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl HealthUpdate {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            samples: Vec::new(),
            last_updated: None,
        }
    }

    pub fn with_sample(mut self, value: f64, timestamp: DateTime<Utc>) -> Self {
        self.samples.push(UpdateSample { value, timestamp });
        self
    }

    pub fn with_last_updated(mut self, last_updated: DateTime<Utc>) -> Self {
        self.last_updated = Some(last_updated);
        self
    }
}

/// Inclusive query window for historical getters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Successful getter completion: the SDK's own success flag plus the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub success: bool,
    pub data: Option<T>,
}

impl<T> Fetched<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Error kinds reported by the SDK.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("HealthKit unavailable")]
    HealthKitUnavailable,
    #[error("service unavailable")]
    ServiceUnavailable,
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("invalid user id")]
    InvalidUserId,
    #[error("invalid dev id")]
    InvalidDevId,
    #[error("forbidden")]
    Forbidden,
    #[error("bad request")]
    BadRequest,
    #[error("unknown opcode")]
    UnknownOpcode,
    #[error("unexpected error")]
    UnexpectedError,
    #[error("NFC error")]
    NfcError,
    #[error("sensor expired")]
    SensorExpired,
    #[error("sensor reading failed")]
    SensorReadingFailed,
    #[error("no internet")]
    NoInternet,
    #[error("user limits reached")]
    UserLimitsReached,
    #[error("incorrect dev id")]
    IncorrectDevId,
    #[error("invalid token")]
    InvalidToken,
    #[error("HealthKit authorization error")]
    HealthKitAuthorizationError,
    #[error("unsupported resource")]
    UnsupportedResource,
    /// Kind introduced by an SDK release this bridge does not know about.
    #[error("unrecognised SDK error: {0}")]
    Other(String),
}

pub type SdkResult<T> = std::result::Result<T, SdkError>;

/// Process-wide update callback.
pub type UpdateHandler = Arc<dyn Fn(HealthUpdate) + Send + Sync>;

/// Entry point into the native SDK.
#[async_trait]
pub trait HealthSdk: Send + Sync {
    /// Authenticate the developer and build a session handle.
    async fn create_session(
        &self,
        dev_id: String,
        reference_id: String,
    ) -> SdkResult<Arc<dyn HealthSession>>;

    /// Install the handler invoked for every background update. Replaces any
    /// previously installed handler.
    fn set_update_handler(&self, handler: UpdateHandler);
}

/// Authenticated SDK handle.
#[async_trait]
pub trait HealthSession: Send + Sync {
    async fn init_connection(
        &self,
        connection: Connection,
        token: String,
        permissions: BTreeSet<Permission>,
        scheduler_on: bool,
    ) -> SdkResult<bool>;

    /// User identifier stored for an initialised connection.
    fn get_user_id(&self, connection: Connection) -> Option<String>;

    async fn get_body(
        &self,
        connection: Connection,
        range: DateRange,
        to_webhook: bool,
    ) -> SdkResult<Fetched<DataPayload<BodyData>>>;

    async fn get_activity(
        &self,
        connection: Connection,
        range: DateRange,
        to_webhook: bool,
    ) -> SdkResult<Fetched<DataPayload<ActivityData>>>;

    async fn get_daily(
        &self,
        connection: Connection,
        range: DateRange,
        to_webhook: bool,
    ) -> SdkResult<Fetched<DataPayload<DailyData>>>;

    async fn get_nutrition(
        &self,
        connection: Connection,
        range: DateRange,
        to_webhook: bool,
    ) -> SdkResult<Fetched<DataPayload<NutritionData>>>;

    async fn get_sleep(
        &self,
        connection: Connection,
        range: DateRange,
        to_webhook: bool,
    ) -> SdkResult<Fetched<DataPayload<SleepData>>>;

    async fn get_menstruation(
        &self,
        connection: Connection,
        range: DateRange,
        to_webhook: bool,
    ) -> SdkResult<Fetched<DataPayload<MenstruationData>>>;

    async fn get_athlete(
        &self,
        connection: Connection,
        to_webhook: bool,
    ) -> SdkResult<Fetched<AthletePayload>>;

    /// Scan the attached glucose sensor.
    async fn read_glucose_data(&self) -> GlucoseReading;

    /// Activate a new glucose sensor.
    async fn activate_sensor(&self) -> SensorActivation;

    async fn get_planned_workouts(&self, connection: Connection)
        -> SdkResult<Vec<PlannedWorkout>>;

    async fn post_planned_workout(
        &self,
        connection: Connection,
        workout: PlannedWorkout,
    ) -> SdkResult<bool>;

    async fn delete_planned_workout(&self, connection: Connection, id: Uuid) -> SdkResult<bool>;

    async fn mark_planned_workout_complete(
        &self,
        connection: Connection,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> SdkResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_round_trips_known_and_unknown_tags() {
        assert_eq!(DataType::from("STEPS"), DataType::Steps);
        assert_eq!(DataType::HeartRate.as_str(), "HEART_RATE");

        let custom = DataType::from("WALKING_ASYMMETRY");
        assert_eq!(custom, DataType::Other("WALKING_ASYMMETRY".to_string()));
        assert_eq!(custom.to_string(), "WALKING_ASYMMETRY");
    }

    #[test]
    fn test_data_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&DataType::Calories).unwrap();
        assert_eq!(json, "\"CALORIES\"");

        let parsed: DataType = serde_json::from_str("\"DISTANCE\"").unwrap();
        assert_eq!(parsed, DataType::Distance);
    }

    #[test]
    fn test_connection_serde_names() {
        assert_eq!(
            serde_json::to_string(&Connection::AppleHealth).unwrap(),
            "\"APPLE_HEALTH\""
        );
        assert_eq!(
            serde_json::to_string(&Permission::Vo2Max).unwrap(),
            "\"VO2MAX\""
        );
    }

    #[test]
    fn test_health_update_builder() {
        let at = Utc::now();
        let update = HealthUpdate::new(DataType::Steps)
            .with_sample(120.0, at)
            .with_sample(80.0, at)
            .with_last_updated(at);

        assert_eq!(update.samples.len(), 2);
        assert_eq!(update.samples[1].value, 80.0);
        assert_eq!(update.last_updated, Some(at));
    }
}
