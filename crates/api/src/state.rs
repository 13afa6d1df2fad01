use std::sync::Arc;

use infra::repos::{AvailabilityStore, BookingRepo, GroundCatalog};

use crate::auth::{AuthConfig, SessionClient};
use crate::config::AppConfig;
use crate::services::{BookingService, Clock, ScheduleViewer, SystemClock};

#[derive(Clone)]
pub struct AppState {
    auth_config: AuthConfig,
    bookings: BookingService,
    schedule: ScheduleViewer,
    session_client: SessionClient,
}

impl AppState {
    pub fn new(config: &AppConfig, catalog: GroundCatalog, clock: Arc<dyn Clock>) -> Self {
        let catalog = Arc::new(catalog);
        let booking_repo = Arc::new(BookingRepo::new());
        let availability = Arc::new(AvailabilityStore::new());

        Self {
            auth_config: config.auth.clone(),
            bookings: BookingService::new(
                catalog.clone(),
                availability,
                booking_repo.clone(),
                clock.clone(),
            ),
            schedule: ScheduleViewer::new(catalog, booking_repo, clock),
            session_client: SessionClient::new(&config.auth),
        }
    }

    /// Production wiring: catalog from config, host-local calendar.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let catalog = config.load_catalog()?;
        tracing::info!("Loaded {} grounds", catalog.len());
        Ok(Self::new(config, catalog, Arc::new(SystemClock)))
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth_config
    }

    pub fn bookings(&self) -> &BookingService {
        &self.bookings
    }

    pub fn schedule(&self) -> &ScheduleViewer {
        &self.schedule
    }

    pub fn session_client(&self) -> &SessionClient {
        &self.session_client
    }
}
