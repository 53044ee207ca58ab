//! Client session: the looked-up list, the status line and the UI event flows
//!
//! A [`Session`] is cheap to clone; clones share state, so independent
//! operations can run side by side. Nothing serializes them: each completed
//! add-location prepends on its own, in completion order.

use super::geolocation::{GeolocationError, Geolocator, Position};
use super::proxy::WeatherSource;
use super::store::WeatherList;
use super::view::{DetailView, Renderer, StatusMessage, format_temp_celsius, summary_cards};
use crate::SkycastError;
use crate::config::ClientConfig;
use crate::models::{Locator, RecordId, WeatherRecord};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

/// Input events the session reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Search box submitted
    Search(String),
    /// "Use my location" pressed
    UseLocation,
    /// A card was selected
    ShowDetail(RecordId),
    /// Detail view dismissed
    HideDetail,
}

/// Tunables for a session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub default_city: String,
    pub message_timeout: Duration,
    pub high_low_window: usize,
}

impl From<&ClientConfig> for SessionSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            default_city: config.default_city.clone(),
            message_timeout: Duration::from_millis(config.message_timeout_ms),
            high_low_window: config.high_low_window,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

#[derive(Default)]
struct StatusSlot {
    generation: u64,
    current: Option<StatusMessage>,
}

struct Inner {
    source: Arc<dyn WeatherSource>,
    geolocator: Arc<dyn Geolocator>,
    renderer: Arc<dyn Renderer>,
    settings: SessionSettings,
    list: RwLock<WeatherList>,
    status: Mutex<StatusSlot>,
    loading: AtomicUsize,
}

/// Keeps the loading indicator on while alive
struct LoadingGuard {
    inner: Arc<Inner>,
}

impl LoadingGuard {
    fn begin(inner: &Arc<Inner>) -> Self {
        if inner.loading.fetch_add(1, Ordering::SeqCst) == 0 {
            inner.renderer.set_loading(true);
        }
        Self {
            inner: Arc::clone(inner),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if self.inner.loading.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.renderer.set_loading(false);
        }
    }
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        geolocator: Arc<dyn Geolocator>,
        renderer: Arc<dyn Renderer>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                geolocator,
                renderer,
                settings,
                list: RwLock::new(WeatherList::new()),
                status: Mutex::new(StatusSlot::default()),
                loading: AtomicUsize::new(0),
            }),
        }
    }

    /// Snapshot of the records, newest first
    pub async fn records(&self) -> Vec<WeatherRecord> {
        self.inner.list.read().await.iter().cloned().collect()
    }

    /// Id of the record at a displayed position (0-based)
    pub async fn id_at(&self, position: usize) -> Option<RecordId> {
        self.inner.list.read().await.id_at(position)
    }

    /// Message currently in the status slot
    pub async fn status(&self) -> Option<StatusMessage> {
        self.inner.status.lock().await.current.clone()
    }

    /// Whether any add-location operation is in flight
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst) > 0
    }

    /// Startup: use the device position when there is one, else the default city
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<RecordId, SkycastError> {
        match self.inner.geolocator.current_position().await {
            Ok(position) => self.add_location_by_position(position).await,
            Err(e) => {
                debug!("No position at startup ({}), using default city", e);
                self.add_default_city().await
            }
        }
    }

    /// React to one UI event
    pub async fn dispatch(&self, event: UiEvent) {
        match event {
            UiEvent::Search(text) => {
                let city = text.trim();
                if city.is_empty() {
                    self.show_status(StatusMessage::error("Please enter a city name"))
                        .await;
                } else {
                    let _ = self.add_location(Locator::city(city)).await;
                }
            }
            UiEvent::UseLocation => self.use_location().await,
            UiEvent::ShowDetail(id) => {
                if let Some(detail) = self.show_detail(id).await {
                    self.inner.renderer.render_detail(&detail);
                }
            }
            UiEvent::HideDetail => self.inner.renderer.hide_detail(),
        }
    }

    async fn use_location(&self) {
        let position = {
            let _loading = LoadingGuard::begin(&self.inner);
            self.inner.geolocator.current_position().await
        };

        match position {
            Ok(position) => {
                let _ = self.add_location_by_position(position).await;
            }
            Err(GeolocationError::Unsupported) => {
                self.show_status(StatusMessage::error("Geolocation not supported"))
                    .await;
            }
            Err(e) => {
                debug!("Geolocation failed: {}", e);
                self.show_status(StatusMessage::info(
                    "Unable to get location. Using default city.",
                ))
                .await;
                let _ = self.add_default_city().await;
            }
        }
    }

    /// Fetch, merge and prepend one location.
    ///
    /// On failure the error is shown in the status slot and returned.
    #[instrument(skip(self), fields(location = %locator))]
    pub async fn add_location(&self, locator: Locator) -> Result<RecordId, SkycastError> {
        let _loading = LoadingGuard::begin(&self.inner);
        self.clear_status().await;

        let record = match self.fetch_merged(&locator).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to add location: {}", e);
                self.show_status(StatusMessage::error(e.user_message())).await;
                return Err(e);
            }
        };

        let message = format!(
            "Added {} - {}",
            record.name(),
            format_temp_celsius(record.temperature())
        );
        let id = self.inner.list.write().await.prepend(record);
        info!("{}", message);

        self.render_list().await;
        self.show_status(StatusMessage::success(message)).await;
        Ok(id)
    }

    /// Geolocation path: coordinates first, default city if that fails
    pub async fn add_location_by_position(
        &self,
        position: Position,
    ) -> Result<RecordId, SkycastError> {
        let locator = Locator::coordinates(position.latitude, position.longitude);
        match self.add_location(locator).await {
            Ok(id) => Ok(id),
            Err(_) => self.add_default_city().await,
        }
    }

    /// The single fallback used when no usable position exists
    pub async fn add_default_city(&self) -> Result<RecordId, SkycastError> {
        let city = self.inner.settings.default_city.clone();
        self.add_location(Locator::city(city)).await
    }

    /// Detail view for `id`, `None` when no such record exists
    pub async fn show_detail(&self, id: RecordId) -> Option<DetailView> {
        self.inner.list.read().await.get(id).map(DetailView::from)
    }

    async fn fetch_merged(&self, locator: &Locator) -> Result<WeatherRecord, SkycastError> {
        let source = &self.inner.source;
        let (current, forecast) = futures::try_join!(
            source.fetch_current(locator),
            source.fetch_forecast(locator)
        )?;
        Ok(WeatherRecord::merge(current, forecast))
    }

    /// Re-render the list view
    pub async fn render_list(&self) {
        let cards = {
            let list = self.inner.list.read().await;
            summary_cards(&list, self.inner.settings.high_low_window)
        };
        self.inner.renderer.render_list(&cards);
    }

    async fn clear_status(&self) {
        let mut slot = self.inner.status.lock().await;
        slot.generation += 1;
        if slot.current.take().is_some() {
            self.inner.renderer.show_status(None);
        }
    }

    /// Show `message` and hide it again after the configured delay,
    /// unless something newer replaced it in the meantime.
    async fn show_status(&self, message: StatusMessage) {
        let generation = {
            let mut slot = self.inner.status.lock().await;
            slot.generation += 1;
            self.inner.renderer.show_status(Some(&message));
            slot.current = Some(message);
            slot.generation
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.settings.message_timeout).await;
            let mut slot = inner.status.lock().await;
            if slot.generation == generation && slot.current.take().is_some() {
                inner.renderer.show_status(None);
            }
        });
    }
}
