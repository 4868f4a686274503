use smallvec::SmallVec;

use serde::{Deserialize, Serialize};

use crate::core::line_series::gap_limit;
use crate::core::scale::RegionTransform;
use crate::core::series::{Sample, TimeSeries};
use crate::core::types::DateRange;
use crate::error::{GraphError, GraphResult};

/// Rolling point-buffer capacity; hitting it flushes the current polygon
/// and continues from the boundary point so fills stay contiguous.
pub const AREA_BUFFER_CAPACITY: usize = 64;

/// Deterministic geometry for an area-filled series: one closed polygon per
/// uninterrupted, same-signed stretch of data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaGeometry {
    pub polygons: Vec<Vec<(f64, f64)>>,
}

impl AreaGeometry {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Projects a series into baseline-closed fill polygons.
///
/// The point buffer is flushed on a missing value, a sign change relative to
/// the baseline, a time gap beyond the allowed threshold, or buffer
/// capacity. Every polygon closes against the baseline and explicitly
/// repeats its first baseline vertex so consumers need no implicit closure
/// rules.
#[must_use]
pub fn project_area(
    series: &TimeSeries,
    transform: RegionTransform,
    period: DateRange,
    baseline: f64,
    allowed_gap_seconds: Option<i64>,
) -> AreaGeometry {
    let allowed_gap = gap_limit(series, allowed_gap_seconds);
    let baseline_px = transform.baseline_px(baseline);
    let mut geometry = AreaGeometry::default();
    let mut buffer: SmallVec<[(f64, f64); AREA_BUFFER_CAPACITY]> = SmallVec::new();
    let mut last: Option<(i64, bool)> = None;

    for sample in series.samples_in(period) {
        if sample.is_missing() {
            flush_polygon(&mut geometry, &mut buffer, baseline_px);
            last = None;
            continue;
        }
        let above = sample.value >= baseline;
        if let Some((previous_time, previous_above)) = last {
            let gap_broken = allowed_gap
                .map(|limit| sample.time - previous_time > limit)
                .unwrap_or(false);
            if gap_broken {
                flush_polygon(&mut geometry, &mut buffer, baseline_px);
            } else if previous_above != above {
                flush_polygon(&mut geometry, &mut buffer, baseline_px);
            } else if buffer.len() >= AREA_BUFFER_CAPACITY {
                let boundary = *buffer.last().expect("buffer at capacity is non-empty");
                flush_polygon(&mut geometry, &mut buffer, baseline_px);
                buffer.push(boundary);
            }
        }
        buffer.push(transform.to_px(sample.time as f64, sample.value));
        last = Some((sample.time, above));
    }
    flush_polygon(&mut geometry, &mut buffer, baseline_px);
    geometry
}

fn flush_polygon(
    geometry: &mut AreaGeometry,
    buffer: &mut SmallVec<[(f64, f64); AREA_BUFFER_CAPACITY]>,
    baseline_px: f64,
) {
    if buffer.len() >= 2 {
        let first_x = buffer[0].0;
        let last_x = buffer[buffer.len() - 1].0;
        let mut polygon = Vec::with_capacity(buffer.len() + 3);
        polygon.push((first_x, baseline_px));
        polygon.extend(buffer.iter().copied());
        polygon.push((last_x, baseline_px));
        polygon.push((first_x, baseline_px));
        geometry.polygons.push(polygon);
    }
    buffer.clear();
}

/// Synthesizes the cumulative stack for stacked-area rendering.
///
/// Returned series `k` carries the sum of sources `0..=k` on the first
/// source's timeline, clipped to the period common to all sources. A
/// timestamp any source cannot answer (absent or missing) is missing in
/// every stack level at and above it, which keeps the stack boundaries
/// consistent.
pub fn derive_stacked(sources: &[&TimeSeries]) -> GraphResult<Vec<TimeSeries>> {
    let Some(first) = sources.first() else {
        return Err(GraphError::EmptyOrMissingData("stacked area".to_owned()));
    };
    let mut common = first.period();
    for source in &sources[1..] {
        common = common
            .intersect(source.period())
            .ok_or_else(|| GraphError::EmptyOrMissingData("stacked area".to_owned()))?;
    }

    let timeline: Vec<i64> = first
        .samples_in(common)
        .iter()
        .map(|sample| sample.time)
        .collect();
    if timeline.is_empty() {
        return Err(GraphError::EmptyOrMissingData("stacked area".to_owned()));
    }

    let mut running = vec![0.0_f64; timeline.len()];
    let mut dead = vec![false; timeline.len()];
    let mut derived = Vec::with_capacity(sources.len());

    for source in sources {
        for (slot, &time) in timeline.iter().enumerate() {
            if dead[slot] {
                continue;
            }
            match value_at(source, time) {
                Some(value) => running[slot] += value,
                None => dead[slot] = true,
            }
        }
        let samples: Vec<Sample> = timeline
            .iter()
            .zip(running.iter().zip(dead.iter()))
            .map(|(&time, (&total, &is_dead))| {
                if is_dead {
                    Sample::missing(time)
                } else {
                    Sample::new(time, total)
                }
            })
            .collect();
        derived.push(TimeSeries::new(
            source.name(),
            source.units(),
            source.interval(),
            samples,
        )?);
    }
    Ok(derived)
}

fn value_at(series: &TimeSeries, time: i64) -> Option<f64> {
    let samples = series.samples();
    let index = samples.partition_point(|sample| sample.time < time);
    let sample = samples.get(index)?;
    (sample.time == time && !sample.is_missing()).then_some(sample.value)
}

#[cfg(test)]
mod tests {
    use super::{AREA_BUFFER_CAPACITY, derive_stacked, project_area};
    use crate::core::interval::{CalendarStep, CalendarUnit, RecordingInterval};
    use crate::core::scale::RegionTransform;
    use crate::core::series::{Sample, TimeSeries};
    use crate::core::types::{DataRect, DateRange, DeviceRect};

    fn series(values: &[f64]) -> TimeSeries {
        let samples = values
            .iter()
            .enumerate()
            .map(|(index, &v)| Sample::new(index as i64 * 60, v))
            .collect();
        TimeSeries::new(
            "area",
            "CFS",
            RecordingInterval::Regular(
                CalendarStep::new(CalendarUnit::Minute, 1).expect("step"),
            ),
            samples,
        )
        .expect("valid series")
    }

    fn transform(minutes: f64) -> RegionTransform {
        RegionTransform::new(
            DeviceRect::new(0.0, 0.0, 600.0, 200.0),
            DataRect::new(0.0, minutes * 60.0, -10.0, 10.0),
        )
        .expect("valid transform")
    }

    #[test]
    fn sign_change_splits_the_fill() {
        let s = series(&[2.0, 3.0, -1.0, -4.0]);
        let geometry = project_area(&s, transform(4.0), DateRange::new(0, 240), 0.0, None);
        assert_eq!(geometry.polygons.len(), 2);
    }

    #[test]
    fn polygons_close_against_the_baseline() {
        let s = series(&[2.0, 3.0]);
        let geometry = project_area(&s, transform(2.0), DateRange::new(0, 120), 0.0, None);
        let polygon = &geometry.polygons[0];
        let baseline_y = polygon[0].1;
        assert_eq!(polygon[polygon.len() - 1], polygon[0]);
        assert_eq!(polygon[polygon.len() - 2].1, baseline_y);
    }

    #[test]
    fn capacity_flush_keeps_fills_contiguous() {
        let values: Vec<f64> = (0..AREA_BUFFER_CAPACITY + 10).map(|_| 5.0).collect();
        let s = series(&values);
        let minutes = values.len() as f64;
        let geometry = project_area(
            &s,
            transform(minutes),
            DateRange::new(0, values.len() as i64 * 60),
            0.0,
            None,
        );
        assert!(geometry.polygons.len() >= 2);
        for pair in geometry.polygons.windows(2) {
            // Second data vertex of the next polygon repeats the last data
            // vertex of the previous one.
            let previous_last = pair[0][pair[0].len() - 3];
            let next_first = pair[1][1];
            assert_eq!(previous_last, next_first);
        }
    }

    #[test]
    fn stack_is_cumulative_at_shared_timestamps() {
        let a = series(&[1.0, 2.0, 3.0]);
        let b = series(&[10.0, 20.0, 30.0]);
        let derived = derive_stacked(&[&a, &b]).expect("stack");
        assert_eq!(derived.len(), 2);
        let top = derived[1].samples();
        assert_eq!(top[0].value, 11.0);
        assert_eq!(top[1].value, 22.0);
        assert_eq!(top[2].value, 33.0);
    }

    #[test]
    fn missing_source_value_poisons_levels_above() {
        let a = series(&[1.0, f64::NAN, 3.0]);
        let b = series(&[10.0, 20.0, 30.0]);
        let derived = derive_stacked(&[&a, &b]).expect("stack");
        assert!(derived[0].samples()[1].is_missing());
        assert!(derived[1].samples()[1].is_missing());
        assert_eq!(derived[1].samples()[2].value, 33.0);
    }
}
