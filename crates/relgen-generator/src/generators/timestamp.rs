//! DATE and TIMESTAMP column strategy.

use crate::distributions::{Distribution, DistributionError, UniformInt};
use crate::random::RandomSource;
use chrono::{DateTime, NaiveDateTime};
use relgen_core::GeneratedValue;

/// Seconds in a 365-day year.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Whether values render as a calendar date or a full timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    Date,
    Timestamp,
}

/// Uniform second offset in `[0, years · SECONDS_PER_YEAR]` after `start`.
#[derive(Debug, Clone)]
pub struct TemporalColumn {
    kind: TemporalKind,
    start_ts: i64,
    offsets: UniformInt,
}

impl TemporalColumn {
    pub fn new(
        kind: TemporalKind,
        start: NaiveDateTime,
        years: u32,
    ) -> Result<Self, DistributionError> {
        let span = u64::from(years) * SECONDS_PER_YEAR;
        let start_ts = start.and_utc().timestamp();

        let end_ts = i64::try_from(span)
            .ok()
            .and_then(|span| start_ts.checked_add(span))
            .filter(|end| DateTime::from_timestamp(*end, 0).is_some());
        if end_ts.is_none() {
            return Err(DistributionError::InvalidParameter(format!(
                "{years} years after {start} is out of range"
            )));
        }

        Ok(Self {
            kind,
            start_ts,
            offsets: UniformInt::new(0, span)?,
        })
    }

    pub fn next_value(
        &mut self,
        source: &mut RandomSource,
    ) -> Result<GeneratedValue, DistributionError> {
        let offset = self.offsets.next(source)?;
        // Bounded by the end instant checked in `new`.
        let instant = DateTime::from_timestamp(self.start_ts + offset as i64, 0)
            .ok_or_else(|| {
                DistributionError::InvalidParameter(format!("offset {offset} is out of range"))
            })?
            .naive_utc();

        Ok(match self.kind {
            TemporalKind::Date => GeneratedValue::Date(instant.date()),
            TemporalKind::Timestamp => GeneratedValue::Timestamp(instant),
        })
    }
}
