// Core structs: PriceSeries, PriceChange, Article, errors
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// One trading session as returned by the market-data provider.
/// The close stays as text until the calculator parses it.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyBar {
    #[serde(rename = "4. close")]
    pub close: String,
}

/// Daily closes keyed by trading date.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    bars: BTreeMap<NaiveDate, DailyBar>,
}

impl PriceSeries {
    pub fn new(bars: BTreeMap<NaiveDate, DailyBar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Entries ordered newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = (&NaiveDate, &DailyBar)> {
        self.bars.iter().rev()
    }
}

impl FromIterator<(NaiveDate, DailyBar)> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, DailyBar)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn glyph(&self) -> &'static str {
        match self {
            Direction::Up => "📈",
            Direction::Down => "📉",
            Direction::Flat => "➡️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub percent_change: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Article {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    pub body: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("market data request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("market data endpoint responded with status {status}")]
    Status { status: u16 },

    #[error("unexpected market data payload: {0}")]
    Schema(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("need at least two closes, got {0}")]
    InsufficientData(usize),

    #[error("close on {date} is not a number: {value:?}")]
    Parse { date: NaiveDate, value: String },

    #[error("latest close on {0} is zero")]
    ZeroClose(NaiveDate),
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("news endpoint responded with status {status}")]
    Status { status: u16 },
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("message send failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("messaging API responded [{status}]: {body}")]
    Api { status: u16, body: String },
}
