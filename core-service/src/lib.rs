//! Core service façade for the health bridge.
//!
//! [`BridgeService`] is the single state object behind the host's method
//! channel. It owns the SDK session slot, the background event buffer and the
//! live event channel, and turns every method call into exactly one
//! [`MethodResponse`].
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//! use core_service::BridgeService;
//! use serde_json::json;
//!
//! let config = BridgeConfig::builder().build()?;
//! let service = BridgeService::new(config, sdk)?;
//!
//! let reply = service
//!     .handle("initTerra", json!({"devID": "dev", "referenceID": "user-1"}))
//!     .await;
//! ```

pub mod command;
pub mod error;
pub mod response;

pub use command::{Command, DataKind};
pub use error::{CoreError, DispatchError, Result};
pub use response::MethodResponse;

use std::sync::Arc;

use bridge_traits::events::EventSink;
use bridge_traits::health::{
    Connection, DateRange, Fetched, HealthSdk, HealthSession, SdkResult,
};
use bridge_traits::models::PlannedWorkout;
use core_health::{
    codec, parse_connection, parse_permission_set, BackgroundEventBuffer, UpdateRouter,
};
use core_runtime::config::{BridgeConfig, EncodeFailurePolicy};
use core_runtime::events::LiveEventChannel;
use core_runtime::logging::{abbreviate_id, redact_if_sensitive};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const PLANNED_WORKOUT: &str = "getter for type: plannedWorkout";

/// Top-level controller for one bridge registration.
pub struct BridgeService {
    config: BridgeConfig,
    sdk: Arc<dyn HealthSdk>,
    session: RwLock<Option<Arc<dyn HealthSession>>>,
    router: Arc<UpdateRouter>,
    runtime: Handle,
}

impl BridgeService {
    /// Build the service and register the update handler with the SDK.
    ///
    /// Must be called inside a tokio runtime; the runtime is kept to drive
    /// `handle_with` calls and the update pump.
    pub fn new(config: BridgeConfig, sdk: Arc<dyn HealthSdk>) -> Result<Arc<Self>> {
        config.validate()?;

        let runtime = Handle::try_current().map_err(|_| {
            CoreError::InitializationFailed("BridgeService requires a tokio runtime".to_string())
        })?;

        let buffer = Arc::new(BackgroundEventBuffer::from_config(&config));
        let channel = Arc::new(LiveEventChannel::new());
        let router = Arc::new(UpdateRouter::new(buffer, channel));

        sdk.set_update_handler(router.spawn_pump()?);

        info!(
            platform = config.platform.platform_name(),
            capacity = config.background_event_capacity,
            "Health bridge registered"
        );

        Ok(Arc::new(Self {
            config,
            sdk,
            session: RwLock::new(None),
            router,
            runtime,
        }))
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn buffer(&self) -> &Arc<BackgroundEventBuffer> {
        self.router.buffer()
    }

    pub fn event_channel(&self) -> &Arc<LiveEventChannel> {
        self.router.channel()
    }

    /// Subscriber for live health updates; replaces any current one.
    pub fn attach_event_sink(&self, sink: Arc<dyn EventSink>) {
        self.router.channel().attach(sink);
    }

    pub fn detach_event_sink(&self) {
        self.router.channel().detach();
    }

    pub async fn is_initialised(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Drop the session and the live subscriber. Buffered events are kept.
    pub async fn teardown(&self) {
        self.session.write().await.take();
        self.detach_event_sink();
        info!("Health bridge torn down");
    }

    /// Handle one method call.
    #[instrument(skip(self, args))]
    pub async fn handle(&self, method: &str, args: Value) -> MethodResponse {
        let command = match Command::decode(method, args) {
            Ok(Some(command)) => command,
            Ok(None) => {
                warn!("Method not implemented");
                return MethodResponse::NotImplemented;
            }
            Err(err) => {
                debug!(code = err.code(), error = %err, "Rejected method arguments");
                return err.into();
            }
        };

        match self.execute(command).await {
            Ok(value) => MethodResponse::Success(value),
            Err(err) => {
                debug!(code = err.code(), error = %err, "Method failed before reaching the SDK");
                err.into()
            }
        }
    }

    /// Callback form of [`handle`](Self::handle): returns immediately and
    /// invokes `reply` exactly once from the runtime.
    pub fn handle_with<F>(self: &Arc<Self>, method: impl Into<String>, args: Value, reply: F)
    where
        F: FnOnce(MethodResponse) + Send + 'static,
    {
        let service = Arc::clone(self);
        let method = method.into();
        self.runtime.spawn(async move {
            let response = service.handle(&method, args).await;
            reply(response);
        });
    }

    async fn execute(&self, command: Command) -> std::result::Result<Value, DispatchError> {
        match command {
            Command::TestFunction { text } => Ok(Value::String(text)),
            Command::GetBackgroundHealthEvents => Ok(self.drain_background_events().await),
            Command::InitTerra {
                dev_id,
                reference_id,
            } => Ok(self.init_terra(dev_id, reference_id).await),
            Command::InitConnection {
                connection,
                token,
                scheduler_on,
                permissions,
            } => {
                let connection = require_connection(&connection, "initConnection")?;
                let session = self.session().await?;
                let permissions = parse_permission_set(&permissions);
                debug!(
                    ?connection,
                    token = %redact_if_sensitive("token", &token),
                    permissions = permissions.len(),
                    scheduler_on,
                    "Initialising connection"
                );
                let outcome = session
                    .init_connection(connection, token, permissions, scheduler_on)
                    .await;
                Ok(codec::status_envelope(outcome))
            }
            Command::GetUserId { connection } => {
                let connection = require_connection(&connection, "getUserId")?;
                let session = self.session().await?;
                Ok(json!({ "success": true, "userId": session.get_user_id(connection) }))
            }
            Command::GetData {
                kind,
                connection,
                start,
                end,
                to_webhook,
            } => {
                let operation = format!("getter for type: {}", kind.label());
                let connection = require_connection(&connection, &operation)?;
                let session = self.session().await?;
                let range = DateRange::new(start, end);
                Ok(self
                    .fetch_data(session.as_ref(), kind, connection, range, to_webhook)
                    .await)
            }
            Command::GetAthlete {
                connection,
                to_webhook,
            } => {
                let connection = require_connection(&connection, "getter for type: athlete")?;
                let session = self.session().await?;
                Ok(self.fetched_envelope(session.get_athlete(connection, to_webhook).await))
            }
            Command::ReadGlucoseData => {
                let session = self.session().await?;
                Ok(codec::encode_optional(&session.read_glucose_data().await))
            }
            Command::ActivateGlucoseSensor => {
                let session = self.session().await?;
                Ok(codec::encode_optional(&session.activate_sensor().await))
            }
            Command::GetPlannedWorkouts { connection } => {
                let connection = require_connection(&connection, PLANNED_WORKOUT)?;
                let session = self.session().await?;
                self.require_planned_workouts()?;
                Ok(match session.get_planned_workouts(connection).await {
                    // A list that cannot be encoded is always reported as a failure.
                    Ok(workouts) => {
                        codec::data_envelope(true, &workouts, EncodeFailurePolicy::ForceFailure)
                    }
                    Err(err) => codec::sdk_error_envelope(&err),
                })
            }
            Command::PostPlannedWorkout {
                connection,
                payload,
            } => {
                let connection = require_connection(&connection, PLANNED_WORKOUT)?;
                let session = self.session().await?;
                self.require_planned_workouts()?;
                let workout: PlannedWorkout = serde_json::from_str(&payload).map_err(|e| {
                    DispatchError::PlannedWorkoutPayload {
                        reason: e.to_string(),
                        payload: payload.clone(),
                    }
                })?;
                Ok(codec::status_envelope(
                    session.post_planned_workout(connection, workout).await,
                ))
            }
            Command::DeletePlannedWorkout {
                connection,
                workout_id,
            } => {
                let connection = require_connection(&connection, PLANNED_WORKOUT)?;
                let session = self.session().await?;
                let id = require_uuid(&workout_id)?;
                self.require_planned_workouts()?;
                Ok(codec::status_envelope(
                    session.delete_planned_workout(connection, id).await,
                ))
            }
            Command::CompletePlannedWorkout {
                connection,
                workout_id,
                at,
            } => {
                let connection = require_connection(&connection, PLANNED_WORKOUT)?;
                let session = self.session().await?;
                let id = require_uuid(&workout_id)?;
                self.require_planned_workouts()?;
                Ok(codec::status_envelope(
                    session
                        .mark_planned_workout_complete(connection, id, at)
                        .await,
                ))
            }
        }
    }

    async fn init_terra(&self, dev_id: String, reference_id: String) -> Value {
        debug!(
            dev_id = %redact_if_sensitive("dev_id", &dev_id),
            reference_id = %abbreviate_id(&reference_id),
            "Creating SDK session"
        );

        match self.sdk.create_session(dev_id, reference_id).await {
            Ok(session) => {
                let replaced = self.session.write().await.replace(session).is_some();
                info!(replaced, "SDK session initialised");
                json!({ "success": true })
            }
            Err(err) => {
                warn!(error = %err, "SDK session creation failed; keeping previous session");
                json!({ "success": false, "error": codec::map_error(&err) })
            }
        }
    }

    async fn drain_background_events(&self) -> Value {
        let text = match self.router.buffer().read_and_clear().await {
            Ok(events) => {
                info!(count = events.len(), "Returning background health events");
                serde_json::to_string(&events).unwrap_or_else(|err| {
                    error!(error = %err, "Failed to encode background events");
                    "[]".to_string()
                })
            }
            Err(err) => {
                error!(error = %err, "Failed to read background events");
                "[]".to_string()
            }
        };
        Value::String(text)
    }

    async fn fetch_data(
        &self,
        session: &dyn HealthSession,
        kind: DataKind,
        connection: Connection,
        range: DateRange,
        to_webhook: bool,
    ) -> Value {
        match kind {
            DataKind::Body => {
                self.fetched_envelope(session.get_body(connection, range, to_webhook).await)
            }
            DataKind::Activity => {
                self.fetched_envelope(session.get_activity(connection, range, to_webhook).await)
            }
            DataKind::Daily => {
                self.fetched_envelope(session.get_daily(connection, range, to_webhook).await)
            }
            DataKind::Nutrition => {
                self.fetched_envelope(session.get_nutrition(connection, range, to_webhook).await)
            }
            DataKind::Sleep => {
                self.fetched_envelope(session.get_sleep(connection, range, to_webhook).await)
            }
            DataKind::Menstruation => self.fetched_envelope(
                session
                    .get_menstruation(connection, range, to_webhook)
                    .await,
            ),
        }
    }

    fn fetched_envelope<T: Serialize>(&self, result: SdkResult<Fetched<T>>) -> Value {
        match result {
            Ok(fetched) => codec::data_envelope(
                fetched.success,
                &fetched.data,
                self.config.encode_failure_policy,
            ),
            Err(err) => {
                debug!(error = %err, "SDK getter failed");
                codec::sdk_error_envelope(&err)
            }
        }
    }

    async fn session(&self) -> std::result::Result<Arc<dyn HealthSession>, DispatchError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(DispatchError::NotInitialised)
    }

    fn require_planned_workouts(&self) -> std::result::Result<(), DispatchError> {
        if self.config.supports_planned_workouts() {
            Ok(())
        } else {
            Err(DispatchError::PlatformVersion {
                min: self.config.planned_workouts_min_version.to_string(),
            })
        }
    }
}

fn require_connection(
    raw: &str,
    operation: &str,
) -> std::result::Result<Connection, DispatchError> {
    parse_connection(raw).ok_or_else(|| DispatchError::ConnectionType {
        operation: operation.to_string(),
    })
}

fn require_uuid(raw: &str) -> std::result::Result<Uuid, DispatchError> {
    Uuid::parse_str(raw).map_err(|_| DispatchError::InvalidUuid)
}
