use crate::model::{CalcError, DailyBar, Direction, PriceChange, PriceSeries};
use crate::utils::round_to;
use chrono::NaiveDate;
use tracing::info;

/// Trait defining the interface for the price change calculator.
pub trait ChangeCalculator {
    fn compute_change(&self, series: &PriceSeries) -> Result<PriceChange, CalcError>;
}

pub struct ChangeCalculatorImpl;

impl ChangeCalculatorImpl {
    pub fn new() -> Self {
        Self
    }
}

impl ChangeCalculator for ChangeCalculatorImpl {
    /// Percent change of the latest close against the session before it,
    /// expressed relative to the latest close and rounded to 2 places.
    fn compute_change(&self, series: &PriceSeries) -> Result<PriceChange, CalcError> {
        let mut latest_two = series.newest_first();
        let (Some(latest), Some(previous)) = (latest_two.next(), latest_two.next()) else {
            return Err(CalcError::InsufficientData(series.len()));
        };

        let latest_close = parse_close(latest)?;
        let previous_close = parse_close(previous)?;
        if latest_close == 0.0 {
            return Err(CalcError::ZeroClose(*latest.0));
        }

        let difference = latest_close - previous_close;
        let percent_change = round_to(difference / latest_close * 100.0, 2);

        let direction = if difference > 0.0 {
            Direction::Up
        } else if difference < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        };

        info!(
            "Close {} on {} vs {} on {}: {}%",
            latest_close, latest.0, previous_close, previous.0, percent_change
        );

        Ok(PriceChange {
            percent_change,
            direction,
        })
    }
}

fn parse_close((date, bar): (&NaiveDate, &DailyBar)) -> Result<f64, CalcError> {
    bar.close
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|close| close.is_finite())
        .ok_or_else(|| CalcError::Parse {
            date: *date,
            value: bar.close.clone(),
        })
}
