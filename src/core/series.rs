use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::interval::RecordingInterval;
use crate::core::types::{DateRange, ValueRange};
use crate::error::{GraphError, GraphResult};

/// One recorded observation.
///
/// `quality` is an opaque host-supplied flag carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: i64,
    pub value: f64,
    pub quality: Option<u32>,
}

impl Sample {
    #[must_use]
    pub fn new(time: i64, value: f64) -> Self {
        Self {
            time,
            value,
            quality: None,
        }
    }

    #[must_use]
    pub fn missing(time: i64) -> Self {
        Self {
            time,
            value: f64::NAN,
            quality: None,
        }
    }

    #[must_use]
    pub fn is_missing(self) -> bool {
        !self.value.is_finite()
    }
}

/// An ordered, time-indexed value sequence with declared interval and units.
///
/// The engine only reads series; hosts own them and hand in `Arc` references
/// through position-aligned slot lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    name: String,
    units: String,
    interval: RecordingInterval,
    period: DateRange,
    samples: Vec<Sample>,
    enabled: bool,
}

impl TimeSeries {
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        interval: RecordingInterval,
        samples: Vec<Sample>,
    ) -> GraphResult<Self> {
        let name = name.into();
        if samples.is_empty() {
            return Err(GraphError::EmptyOrMissingData(name));
        }
        for pair in samples.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(GraphError::InvalidData(format!(
                    "series `{name}` samples must be strictly increasing in time"
                )));
            }
        }
        let period = DateRange::new(
            samples[0].time,
            samples[samples.len() - 1].time,
        );
        Ok(Self {
            name,
            units: units.into(),
            interval,
            period,
            samples,
            enabled: true,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn units(&self) -> &str {
        &self.units
    }

    #[must_use]
    pub fn interval(&self) -> RecordingInterval {
        self.interval
    }

    #[must_use]
    pub fn period(&self) -> DateRange {
        self.period
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Contiguous slice of samples whose time falls inside `period`.
    #[must_use]
    pub fn samples_in(&self, period: DateRange) -> &[Sample] {
        let start = self.samples.partition_point(|s| s.time < period.start);
        let end = self.samples.partition_point(|s| s.time <= period.end);
        &self.samples[start..end]
    }

    /// Value extent over non-missing samples inside `period`.
    #[must_use]
    pub fn value_extent_in(&self, period: DateRange) -> Option<ValueRange> {
        let mut extent: Option<ValueRange> = None;
        for sample in self.samples_in(period) {
            if sample.is_missing() {
                continue;
            }
            extent = Some(match extent {
                Some(range) => range.include(sample.value),
                None => ValueRange::new(sample.value, sample.value),
            });
        }
        extent
    }
}

pub type SeriesRef = Arc<TimeSeries>;

/// One position in an axis binding.
///
/// Disabled or absent series keep their slot as `None` so per-index style
/// lookups in the host configuration stay aligned; slot lists are never
/// compacted.
pub type SeriesSlot = Option<SeriesRef>;

/// The ordered series slots bound to one value axis.
#[derive(Debug, Clone, Default)]
pub struct AxisBinding {
    slots: Vec<SeriesSlot>,
}

impl AxisBinding {
    #[must_use]
    pub fn new(slots: Vec<SeriesSlot>) -> Self {
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[SeriesSlot] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots carrying an enabled series, with their original position.
    pub fn active(&self) -> impl Iterator<Item = (usize, &SeriesRef)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Some(series) if series.is_enabled() => Some((index, series)),
                _ => None,
            })
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn push(&mut self, slot: SeriesSlot) {
        self.slots.push(slot);
    }

    /// Replaces a slot in place, keeping positions of the others.
    pub fn set_slot(&mut self, index: usize, slot: SeriesSlot) -> GraphResult<()> {
        let len = self.slots.len();
        let entry = self.slots.get_mut(index).ok_or_else(|| {
            GraphError::InvalidData(format!("slot index {index} out of range (len {len})"))
        })?;
        *entry = slot;
        Ok(())
    }

    /// Toggles the enabled flag of the series in `index` without moving it.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> GraphResult<()> {
        let len = self.slots.len();
        let entry = self.slots.get_mut(index).ok_or_else(|| {
            GraphError::InvalidData(format!("slot index {index} out of range (len {len})"))
        })?;
        if let Some(series) = entry {
            Arc::make_mut(series).set_enabled(enabled);
        }
        Ok(())
    }

    /// Union date period over enabled series, regardless of values.
    #[must_use]
    pub fn union_period(&self) -> Option<DateRange> {
        let mut period: Option<DateRange> = None;
        for (_, series) in self.active() {
            period = Some(match period {
                Some(current) => current.union(series.period()),
                None => series.period(),
            });
        }
        period
    }
}
