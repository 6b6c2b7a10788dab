//! Connection/Permission Translator
//!
//! Maps the wire identifiers sent by the application to SDK enumerations.
//! Every function here is total: unknown strings yield `None` (or are dropped
//! from a set), never an error.

use bridge_traits::health::{Connection, Permission};
use std::collections::BTreeSet;
use tracing::debug;

const CONNECTIONS: &[(&str, Connection)] = &[
    ("APPLE_HEALTH", Connection::AppleHealth),
    ("FREESTYLE_LIBRE", Connection::FreestyleLibre),
];

const PERMISSIONS: &[(&str, Permission)] = &[
    ("WORKOUT_TYPES", Permission::WorkoutType),
    ("ACTIVITY_SUMMARY", Permission::ActivitySummary),
    ("LOCATION", Permission::Location),
    ("CALORIES", Permission::Calories),
    ("STEPS", Permission::Steps),
    ("HEART_RATE", Permission::HeartRate),
    ("HEART_RATE_VARIABILITY", Permission::HeartRateVariability),
    ("VO2MAX", Permission::Vo2Max),
    ("HEIGHT", Permission::Height),
    ("ACTIVE_DURATIONS", Permission::ActiveDurations),
    ("WEIGHT", Permission::Weight),
    ("FLIGHTS_CLIMBED", Permission::FlightsClimbed),
    ("BMI", Permission::Bmi),
    ("BODY_FAT", Permission::BodyFat),
    ("EXERCISE_DISTANCE", Permission::ExerciseDistance),
    ("GENDER", Permission::Gender),
    ("DATE_OF_BIRTH", Permission::DateOfBirth),
    ("BASAL_ENERGY_BURNED", Permission::BasalEnergyBurned),
    ("SWIMMING_SUMMARY", Permission::SwimmingSummary),
    ("RESTING_HEART_RATE", Permission::RestingHeartRate),
    ("BLOOD_PRESSURE", Permission::BloodPressure),
    ("BLOOD_GLUCOSE", Permission::BloodGlucose),
    ("BODY_TEMPERATURE", Permission::BodyTemperature),
    ("MINDFULNESS", Permission::Mindfulness),
    ("LEAN_BODY_MASS", Permission::LeanBodyMass),
    ("OXYGEN_SATURATION", Permission::OxygenSaturation),
    ("SLEEP_ANALYSIS", Permission::SleepAnalysis),
    ("RESPIRATORY_RATE", Permission::RespiratoryRate),
    ("NUTRITION_SODIUM", Permission::NutritionSodium),
    ("NUTRITION_PROTEIN", Permission::NutritionProtein),
    ("NUTRITION_CARBOHYDRATES", Permission::NutritionCarbohydrates),
    ("NUTRITION_FIBRE", Permission::NutritionFibre),
    ("NUTRITION_FAT_TOTAL", Permission::NutritionFatTotal),
    ("NUTRITION_SUGAR", Permission::NutritionSugar),
    ("NUTRITION_VITAMIN_C", Permission::NutritionVitaminC),
    ("NUTRITION_VITAMIN_A", Permission::NutritionVitaminA),
    ("NUTRITION_CALORIES", Permission::NutritionCalories),
    ("NUTRITION_WATER", Permission::NutritionWater),
    ("NUTRITION_CHOLESTEROL", Permission::NutritionCholesterol),
    ("MENSTRUATION", Permission::Menstruation),
    ("SPEED", Permission::Speed),
    ("POWER", Permission::Power),
    ("ELECTROCARDIOGRAM", Permission::Electrocardiogram),
];

pub fn parse_connection(raw: &str) -> Option<Connection> {
    let found = CONNECTIONS
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, connection)| *connection);
    if found.is_none() {
        debug!(connection = raw, "Passed invalid connection");
    }
    found
}

pub fn parse_permission(raw: &str) -> Option<Permission> {
    PERMISSIONS
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, permission)| *permission)
}

/// Build the requested permission set, skipping names that do not match.
pub fn parse_permission_set<S: AsRef<str>>(raw: &[S]) -> BTreeSet<Permission> {
    raw.iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let parsed = parse_permission(name);
            if parsed.is_none() {
                debug!(permission = name, "Dropping unrecognised permission");
            }
            parsed
        })
        .collect()
}

pub fn connection_name(connection: Connection) -> &'static str {
    CONNECTIONS
        .iter()
        .find(|(_, c)| *c == connection)
        .map(|(name, _)| *name)
        .unwrap_or("UNKNOWN")
}

pub fn permission_name(permission: Permission) -> &'static str {
    PERMISSIONS
        .iter()
        .find(|(_, p)| *p == permission)
        .map(|(name, _)| *name)
        .unwrap_or("UNKNOWN")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connection() {
        assert_eq!(parse_connection("APPLE_HEALTH"), Some(Connection::AppleHealth));
        assert_eq!(
            parse_connection("FREESTYLE_LIBRE"),
            Some(Connection::FreestyleLibre)
        );
        assert_eq!(parse_connection("bogus"), None);
        assert_eq!(parse_connection("apple_health"), None);
        assert_eq!(parse_connection(""), None);
    }

    #[test]
    fn test_workout_types_maps_to_singular_variant() {
        assert_eq!(parse_permission("WORKOUT_TYPES"), Some(Permission::WorkoutType));
        assert_eq!(parse_permission("WORKOUT_TYPE"), None);
        assert_eq!(permission_name(Permission::WorkoutType), "WORKOUT_TYPES");
    }

    #[test]
    fn test_permission_set_drops_unknown_entries() {
        let set = parse_permission_set(&["STEPS", "bogus", "HEART_RATE", "STEPS"]);
        let expected: BTreeSet<_> = [Permission::Steps, Permission::HeartRate].into();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_empty_permission_set() {
        let empty: [&str; 0] = [];
        assert!(parse_permission_set(&empty).is_empty());
    }

    #[test]
    fn test_every_permission_name_round_trips() {
        assert_eq!(PERMISSIONS.len(), 43);
        for (name, permission) in PERMISSIONS {
            assert_eq!(parse_permission(name), Some(*permission));
            assert_eq!(permission_name(*permission), *name);
        }
    }

    #[test]
    fn test_connection_names_round_trip() {
        for connection in [Connection::AppleHealth, Connection::FreestyleLibre] {
            assert_eq!(parse_connection(connection_name(connection)), Some(connection));
        }
    }
}
