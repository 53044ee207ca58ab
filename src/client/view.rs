//! Summary/detail view models and the formatting helpers behind them

use super::store::WeatherList;
use crate::models::{RecordId, WeatherRecord, calculate_high_low};
use chrono::{DateTime, FixedOffset, Utc};
use std::io::Write;
use std::sync::Mutex;

/// Round to the nearest integer, halves going up (`-2.5` becomes `-2`)
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Temperature as shown on cards, e.g. `18°`
#[must_use]
pub fn format_temp(value: f64) -> String {
    format!("{}°", round_half_up(value))
}

/// Temperature with unit, e.g. `18°C`
#[must_use]
pub fn format_temp_celsius(value: f64) -> String {
    format!("{}°C", round_half_up(value))
}

fn local_time(timestamp: i64, utc_offset_secs: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(utc_offset_secs).or_else(|| FixedOffset::east_opt(0))?;
    DateTime::from_timestamp(timestamp, 0).map(|utc: DateTime<Utc>| utc.with_timezone(&offset))
}

/// 24-hour `HH:MM` at the location's UTC offset
#[must_use]
pub fn format_time(timestamp: i64, utc_offset_secs: i32) -> String {
    local_time(timestamp, utc_offset_secs)
        .map_or_else(|| "--:--".to_string(), |t| t.format("%H:%M").to_string())
}

/// Short date and time, e.g. `Oct 19, 14:05`
#[must_use]
pub fn format_date(timestamp: i64, utc_offset_secs: i32) -> String {
    local_time(timestamp, utc_offset_secs).map_or_else(
        || "unknown".to_string(),
        |t| t.format("%b %-d, %H:%M").to_string(),
    )
}

/// Upper-case the first character, leave the rest alone
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One entry of the list view
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub id: RecordId,
    pub name: String,
    pub time: String,
    pub temperature: String,
    pub description: String,
    pub high: String,
    pub low: String,
}

impl SummaryCard {
    #[must_use]
    pub fn from_record(record: &WeatherRecord, window: usize) -> Self {
        let current = &record.current;
        let high_low = calculate_high_low(&record.forecast, window);

        // Zero means "no forecast figure"; use the observation's own range.
        let high = fallback_if_zero(high_low.high, current.main.temp_max);
        let low = fallback_if_zero(high_low.low, current.main.temp_min);

        Self {
            id: record.id,
            name: current.name.clone(),
            time: format_time(current.dt, current.timezone),
            temperature: format_temp(current.main.temp),
            description: capitalize_first(current.description()),
            high: format_temp(high),
            low: format_temp(low),
        }
    }
}

fn fallback_if_zero(value: f64, fallback: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        fallback
    } else {
        value
    }
}

/// Cards for every record, in list order
#[must_use]
pub fn summary_cards(list: &WeatherList, window: usize) -> Vec<SummaryCard> {
    list.iter()
        .map(|record| SummaryCard::from_record(record, window))
        .collect()
}

/// Full field set of one record, formatted for display
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: RecordId,
    pub city: String,
    pub temperature: String,
    pub description: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub visibility: String,
    pub clouds: String,
    pub sunrise: String,
    pub sunset: String,
    pub updated: String,
}

impl From<&WeatherRecord> for DetailView {
    fn from(record: &WeatherRecord) -> Self {
        let current = &record.current;
        let offset = current.timezone;

        Self {
            id: record.id,
            city: current.name.clone(),
            temperature: format_temp_celsius(current.main.temp),
            description: capitalize_first(current.description()),
            feels_like: format!("Feels like {}", format_temp_celsius(current.main.feels_like)),
            humidity: format!("{}%", current.main.humidity),
            wind: format!("{:.2} m/s", current.wind.speed),
            pressure: format!("{} hPa", current.main.pressure),
            visibility: current
                .visibility
                .map_or_else(|| "n/a".to_string(), |metres| format!("{:.1} km", metres / 1000.0)),
            clouds: format!("{}%", current.clouds.all),
            sunrise: format_time(current.sys.sunrise, offset),
            sunset: format_time(current.sys.sunset, offset),
            updated: format!("Last updated: {}", format_date(current.dt, offset)),
        }
    }
}

/// Severity of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Info,
    Error,
}

/// The single transient message slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success<S: Into<String>>(text: S) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn info<S: Into<String>>(text: S) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error<S: Into<String>>(text: S) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Output side of the UI. Implementations must tolerate calls from
/// concurrently running operations.
pub trait Renderer: Send + Sync {
    fn render_list(&self, cards: &[SummaryCard]);
    fn render_detail(&self, detail: &DetailView);
    fn hide_detail(&self);
    fn set_loading(&self, loading: bool);
    fn show_status(&self, status: Option<&StatusMessage>);
}

/// Plain-text renderer writing to any `Write` sink (stdout by default)
pub struct TerminalRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalRenderer<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render_list(&self, cards: &[SummaryCard]) {
        let mut text = String::new();
        if cards.is_empty() {
            text.push_str("No locations yet. Try `search <city>`.\n");
        }
        for (position, card) in cards.iter().enumerate() {
            text.push_str(&format!(
                "[{}] {:<24} {:>5}  {:>5}  H {} L {}\n    {}\n",
                position + 1,
                card.name,
                card.time,
                card.temperature,
                card.high,
                card.low,
                card.description,
            ));
        }
        self.write(&text);
    }

    fn render_detail(&self, detail: &DetailView) {
        self.write(&format!(
            "== {} ==\n{}  {}\n{}\nHumidity:   {}\nWind:       {}\nPressure:   {}\nVisibility: {}\nClouds:     {}\nSunrise:    {}\nSunset:     {}\n{}\n",
            detail.city,
            detail.temperature,
            detail.description,
            detail.feels_like,
            detail.humidity,
            detail.wind,
            detail.pressure,
            detail.visibility,
            detail.clouds,
            detail.sunrise,
            detail.sunset,
            detail.updated,
        ));
    }

    fn hide_detail(&self) {}

    fn set_loading(&self, loading: bool) {
        if loading {
            self.write("Loading...\n");
        }
    }

    fn show_status(&self, status: Option<&StatusMessage>) {
        if let Some(status) = status {
            let prefix = match status.kind {
                StatusKind::Success => "ok",
                StatusKind::Info => "info",
                StatusKind::Error => "error",
            };
            self.write(&format!("[{prefix}] {}\n", status.text));
        }
    }
}
