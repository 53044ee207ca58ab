//! Client module
//!
//! Fetches current conditions and forecasts through the proxy, merges them
//! per location, keeps the session's list of looked-up places and renders
//! summary and detail views.

pub mod geolocation;
pub mod proxy;
pub mod session;
pub mod store;
pub mod view;

pub use geolocation::{FixedPosition, GeolocationError, Geolocator, NoGeolocation, Position};
pub use proxy::{ProxyClient, WeatherSource};
pub use session::{Session, SessionSettings, UiEvent};
pub use store::WeatherList;
pub use view::{DetailView, Renderer, StatusKind, StatusMessage, SummaryCard, TerminalRenderer};
