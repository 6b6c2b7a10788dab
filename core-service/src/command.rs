//! Command decoding
//!
//! Every method accepted on the channel has a typed argument schema. Decoding
//! validates presence and type of each field (and date syntax) before the
//! dispatcher touches any state.
//!
//! Connection names and workout identifiers stay as raw strings here; the
//! dispatcher checks them in a fixed order so error precedence is stable.

use crate::error::DispatchError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Historical data category served by the date-range getters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Body,
    Activity,
    Daily,
    Nutrition,
    Sleep,
    Menstruation,
}

impl DataKind {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Body => "getBody",
            Self::Activity => "getActivity",
            Self::Daily => "getDaily",
            Self::Nutrition => "getNutrition",
            Self::Sleep => "getSleep",
            Self::Menstruation => "getMenstruation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Activity => "activity",
            Self::Daily => "daily",
            Self::Nutrition => "nutrition",
            Self::Sleep => "sleep",
            Self::Menstruation => "menstruation",
        }
    }

    fn from_method(method: &str) -> Option<Self> {
        [
            Self::Body,
            Self::Activity,
            Self::Daily,
            Self::Nutrition,
            Self::Sleep,
            Self::Menstruation,
        ]
        .into_iter()
        .find(|kind| kind.method() == method)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    TestFunction {
        text: String,
    },
    GetBackgroundHealthEvents,
    InitTerra {
        dev_id: String,
        reference_id: String,
    },
    GetUserId {
        connection: String,
    },
    InitConnection {
        connection: String,
        token: String,
        scheduler_on: bool,
        permissions: Vec<String>,
    },
    GetData {
        kind: DataKind,
        connection: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        to_webhook: bool,
    },
    GetAthlete {
        connection: String,
        to_webhook: bool,
    },
    ReadGlucoseData,
    ActivateGlucoseSensor,
    GetPlannedWorkouts {
        connection: String,
    },
    PostPlannedWorkout {
        connection: String,
        payload: String,
    },
    DeletePlannedWorkout {
        connection: String,
        workout_id: String,
    },
    CompletePlannedWorkout {
        connection: String,
        workout_id: String,
        at: DateTime<Utc>,
    },
}

#[derive(Deserialize)]
struct TestFunctionArgs {
    text: String,
}

#[derive(Deserialize)]
struct InitTerraArgs {
    #[serde(rename = "devID")]
    dev_id: String,
    #[serde(rename = "referenceID")]
    reference_id: String,
}

#[derive(Deserialize)]
struct ConnectionArgs {
    connection: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitConnectionArgs {
    connection: String,
    token: String,
    scheduler_on: bool,
    custom_permissions: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeArgs {
    connection: String,
    start_date: String,
    end_date: String,
    to_webhook: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AthleteArgs {
    connection: String,
    to_webhook: bool,
}

#[derive(Deserialize)]
struct PostWorkoutArgs {
    connection: String,
    payload: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutIdArgs {
    connection: String,
    workout_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteWorkoutArgs {
    connection: String,
    workout_id: String,
    at: String,
}

impl Command {
    /// Decode a method call. `Ok(None)` means the method is unknown.
    pub fn decode(method: &str, args: Value) -> Result<Option<Self>, DispatchError> {
        if let Some(kind) = DataKind::from_method(method) {
            let args: RangeArgs = parse_args(args)?;
            return Ok(Some(Self::GetData {
                kind,
                connection: args.connection,
                start: parse_date("startDate", &args.start_date)?,
                end: parse_date("endDate", &args.end_date)?,
                to_webhook: args.to_webhook,
            }));
        }

        let command = match method {
            "testFunction" => {
                let args: TestFunctionArgs = parse_args(args)?;
                Self::TestFunction { text: args.text }
            }
            "getBackgroundHealthEvents" => Self::GetBackgroundHealthEvents,
            "initTerra" => {
                let args: InitTerraArgs = parse_args(args)?;
                Self::InitTerra {
                    dev_id: args.dev_id,
                    reference_id: args.reference_id,
                }
            }
            "getUserId" => {
                let args: ConnectionArgs = parse_args(args)?;
                Self::GetUserId {
                    connection: args.connection,
                }
            }
            "initConnection" => {
                let args: InitConnectionArgs = parse_args(args)?;
                Self::InitConnection {
                    connection: args.connection,
                    token: args.token,
                    scheduler_on: args.scheduler_on,
                    permissions: args.custom_permissions,
                }
            }
            "getAthlete" => {
                let args: AthleteArgs = parse_args(args)?;
                Self::GetAthlete {
                    connection: args.connection,
                    to_webhook: args.to_webhook,
                }
            }
            "readGlucoseData" => Self::ReadGlucoseData,
            "activateGlucoseSensor" => Self::ActivateGlucoseSensor,
            "getPlannedWorkouts" => {
                let args: ConnectionArgs = parse_args(args)?;
                Self::GetPlannedWorkouts {
                    connection: args.connection,
                }
            }
            "postPlannedWorkout" => {
                let args: PostWorkoutArgs = parse_args(args)?;
                Self::PostPlannedWorkout {
                    connection: args.connection,
                    payload: args.payload,
                }
            }
            "deletePlannedWorkout" => {
                let args: WorkoutIdArgs = parse_args(args)?;
                Self::DeletePlannedWorkout {
                    connection: args.connection,
                    workout_id: args.workout_id,
                }
            }
            "completePlannedWorkout" => {
                let args: CompleteWorkoutArgs = parse_args(args)?;
                Self::CompletePlannedWorkout {
                    connection: args.connection,
                    workout_id: args.workout_id,
                    at: parse_date("at", &args.at)?,
                }
            }
            _ => return Ok(None),
        };

        Ok(Some(command))
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, DispatchError> {
    // Hosts send `null` for calls without arguments.
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| DispatchError::InvalidArguments(e.to_string()))
}

/// Parse an ISO-8601 timestamp that carries fractional seconds,
/// e.g. `2024-01-01T00:00:00.000Z`.
pub fn parse_date(key: &str, value: &str) -> Result<DateTime<Utc>, DispatchError> {
    let invalid = || DispatchError::InvalidDate {
        key: key.to_string(),
        value: value.to_string(),
    };

    let parsed = DateTime::parse_from_rfc3339(value).map_err(|_| invalid())?;
    if value.get(19..20) != Some(".") {
        return Err(invalid());
    }
    Ok(parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_decode_init_terra() {
        let command = Command::decode(
            "initTerra",
            json!({"devID": "dev-1", "referenceID": "ref-1"}),
        )
        .unwrap();
        assert_eq!(
            command,
            Some(Command::InitTerra {
                dev_id: "dev-1".into(),
                reference_id: "ref-1".into()
            })
        );
    }

    #[test]
    fn test_missing_argument_names_key() {
        let err = Command::decode("initTerra", json!({"devID": "dev-1"})).unwrap_err();
        assert_eq!(err.code(), "Invalid Arguments");
        assert!(err.to_string().contains("referenceID"));
    }

    #[test]
    fn test_mistyped_argument() {
        let err = Command::decode(
            "getAthlete",
            json!({"connection": "APPLE_HEALTH", "toWebhook": "yes"}),
        )
        .unwrap_err();
        assert_eq!(err.code(), "Invalid Arguments");
    }

    #[test]
    fn test_decode_range_getter() {
        let command = Command::decode(
            "getSleep",
            json!({
                "connection": "APPLE_HEALTH",
                "startDate": "2024-01-01T00:00:00.000Z",
                "endDate": "2024-01-02T12:30:00.250+02:00",
                "toWebhook": false,
            }),
        )
        .unwrap()
        .unwrap();

        let Command::GetData {
            kind, start, end, ..
        } = command
        else {
            panic!("expected GetData");
        };
        assert_eq!(kind, DataKind::Sleep);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap()
                + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_date_without_fraction_is_rejected() {
        let err = Command::decode(
            "getBody",
            json!({
                "connection": "APPLE_HEALTH",
                "startDate": "2024-01-01T00:00:00Z",
                "endDate": "2024-01-02T00:00:00.000Z",
                "toWebhook": false,
            }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DispatchError::InvalidDate {
                key: "startDate".into(),
                value: "2024-01-01T00:00:00Z".into()
            }
        );
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        assert!(parse_date("at", "01/02/2024").is_err());
        assert!(parse_date("at", "").is_err());
    }

    #[test]
    fn test_argument_free_commands_accept_null() {
        assert_eq!(
            Command::decode("readGlucoseData", Value::Null).unwrap(),
            Some(Command::ReadGlucoseData)
        );
        assert_eq!(
            Command::decode("getBackgroundHealthEvents", json!({})).unwrap(),
            Some(Command::GetBackgroundHealthEvents)
        );
    }

    #[test]
    fn test_unknown_method() {
        assert_eq!(Command::decode("getEverything", json!({})).unwrap(), None);
    }

    #[test]
    fn test_permissions_are_kept_raw() {
        let command = Command::decode(
            "initConnection",
            json!({
                "connection": "APPLE_HEALTH",
                "token": "t",
                "schedulerOn": true,
                "customPermissions": ["STEPS", "bogus"],
            }),
        )
        .unwrap()
        .unwrap();
        assert!(matches!(
            command,
            Command::InitConnection { ref permissions, scheduler_on: true, .. }
                if permissions == &vec!["STEPS".to_string(), "bogus".to_string()]
        ));
    }
}
