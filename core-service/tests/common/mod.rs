//! Shared fixtures: mockall doubles for the SDK plus a service builder.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_desktop::SqliteSettingsStore;
use bridge_traits::health::{
    Connection, DateRange, Fetched, HealthSdk, HealthSession, Permission, SdkResult,
    UpdateHandler,
};
use bridge_traits::models::{
    ActivityData, AthletePayload, BodyData, DailyData, DataPayload, GlucoseReading,
    MenstruationData, NutritionData, PlannedWorkout, SensorActivation, SleepData,
};
use bridge_traits::platform::{PlatformCapabilities, PlatformVersion};
use chrono::{DateTime, Utc};
use core_runtime::config::{BridgeConfig, BridgeConfigBuilder};
use core_service::BridgeService;
use mockall::mock;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

mock! {
    pub Session {}

    #[async_trait]
    impl HealthSession for Session {
        async fn init_connection(
            &self,
            connection: Connection,
            token: String,
            permissions: BTreeSet<Permission>,
            scheduler_on: bool,
        ) -> SdkResult<bool>;
        fn get_user_id(&self, connection: Connection) -> Option<String>;
        async fn get_body(&self, connection: Connection, range: DateRange, to_webhook: bool) -> SdkResult<Fetched<DataPayload<BodyData>>>;
        async fn get_activity(&self, connection: Connection, range: DateRange, to_webhook: bool) -> SdkResult<Fetched<DataPayload<ActivityData>>>;
        async fn get_daily(&self, connection: Connection, range: DateRange, to_webhook: bool) -> SdkResult<Fetched<DataPayload<DailyData>>>;
        async fn get_nutrition(&self, connection: Connection, range: DateRange, to_webhook: bool) -> SdkResult<Fetched<DataPayload<NutritionData>>>;
        async fn get_sleep(&self, connection: Connection, range: DateRange, to_webhook: bool) -> SdkResult<Fetched<DataPayload<SleepData>>>;
        async fn get_menstruation(&self, connection: Connection, range: DateRange, to_webhook: bool) -> SdkResult<Fetched<DataPayload<MenstruationData>>>;
        async fn get_athlete(&self, connection: Connection, to_webhook: bool) -> SdkResult<Fetched<AthletePayload>>;
        async fn read_glucose_data(&self) -> GlucoseReading;
        async fn activate_sensor(&self) -> SensorActivation;
        async fn get_planned_workouts(&self, connection: Connection) -> SdkResult<Vec<PlannedWorkout>>;
        async fn post_planned_workout(&self, connection: Connection, workout: PlannedWorkout) -> SdkResult<bool>;
        async fn delete_planned_workout(&self, connection: Connection, id: Uuid) -> SdkResult<bool>;
        async fn mark_planned_workout_complete(&self, connection: Connection, id: Uuid, at: DateTime<Utc>) -> SdkResult<bool>;
    }
}

mock! {
    pub Sdk {}

    #[async_trait]
    impl HealthSdk for Sdk {
        async fn create_session(&self, dev_id: String, reference_id: String) -> SdkResult<Arc<dyn HealthSession>>;
        fn set_update_handler(&self, handler: UpdateHandler);
    }
}

pub struct Ios(pub PlatformVersion);

impl PlatformCapabilities for Ios {
    fn platform_name(&self) -> &str {
        "iOS"
    }

    fn os_version(&self) -> PlatformVersion {
        self.0
    }
}

/// Slot the mock SDK stores its registered update handler in.
pub type HandlerSlot = Arc<Mutex<Option<UpdateHandler>>>;

/// SDK that hands out `session` for every `initTerra` and records the handler.
pub fn sdk_with_session(session: MockSession) -> (MockSdk, HandlerSlot) {
    let session: Arc<dyn HealthSession> = Arc::new(session);
    let mut sdk = MockSdk::new();
    sdk.expect_create_session()
        .returning(move |_, _| Ok(Arc::clone(&session)));
    let slot = record_handler(&mut sdk);
    (sdk, slot)
}

pub fn record_handler(sdk: &mut MockSdk) -> HandlerSlot {
    let slot: HandlerSlot = Arc::new(Mutex::new(None));
    let recorder = Arc::clone(&slot);
    sdk.expect_set_update_handler()
        .times(1)
        .returning(move |handler| {
            *recorder.lock().unwrap() = Some(handler);
        });
    slot
}

pub async fn config_builder(version: PlatformVersion) -> BridgeConfigBuilder {
    let store = SqliteSettingsStore::in_memory().await.unwrap();
    BridgeConfig::builder()
        .settings_store(Arc::new(store))
        .platform(Arc::new(Ios(version)))
}

pub async fn service_with(sdk: MockSdk) -> Arc<BridgeService> {
    let config = config_builder(PlatformVersion::new(17, 0))
        .await
        .build()
        .unwrap();
    BridgeService::new(config, Arc::new(sdk)).unwrap()
}

/// Service whose session was already created through `initTerra`.
pub async fn initialised_service(session: MockSession) -> Arc<BridgeService> {
    let (sdk, _) = sdk_with_session(session);
    let service = service_with(sdk).await;
    let reply = service
        .handle(
            "initTerra",
            serde_json::json!({"devID": "dev", "referenceID": "ref"}),
        )
        .await;
    assert!(reply.is_success());
    service
}
