//! tsgraph: adaptive time-series plotting engine.
//!
//! The crate turns already-materialized time series into backend-agnostic
//! draw primitives. It owns the three hard parts of that job:
//!
//! - axis extents and "nice" tick labels for linear, logarithmic, and
//!   calendar-granularity date axes, searched under pixel-space and measured
//!   label-size constraints;
//! - a single-pass screen-space layout that partitions a canvas into titles,
//!   axis strips, legends, and plot areas from measured text extents;
//! - per-encoding geometry projection (line, step, bar, area, stacked area,
//!   scatter with regression overlay, duration, period-of-record, raster)
//!   with gap handling and unit-compatibility gating.
//!
//! Statistics (regression, duration curves), text measurement, styling, and
//! actual drawing are consumed through narrow traits so the engine stays
//! headless and deterministic.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{GraphController, GraphEngineConfig};
pub use error::{GraphError, GraphResult};
