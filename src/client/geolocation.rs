//! Device position lookup used by the "my location" flows

use async_trait::async_trait;
use thiserror::Error;

/// A resolved device position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeolocationError {
    #[error("Geolocation not supported")]
    Unsupported,

    #[error("Location permission denied")]
    Denied,
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// Always answers with the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        Ok(self.0)
    }
}

/// No positioning available on this host
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}
