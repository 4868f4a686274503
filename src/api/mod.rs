pub mod analysis;
pub mod axes;
pub mod config;
pub mod controller;
pub mod date_labels;
pub mod labels;
pub mod layout;
pub mod legend;
pub mod limits;
pub mod pipeline;
pub mod symbol_table;
pub mod text;

pub use analysis::{AnalysisProvider, AnalysisResults, NullAnalysis, RegressionResult};
pub use axes::XTicks;
pub use config::{
    AxisConfig, AxisScaleKind, Encoding, GraphEngineConfig, LegendPosition, MemoryStyles,
    StyleLookup, UnitsPolicy,
};
pub use controller::{CycleCache, GraphController, RenderContext, RenderReport};
pub use date_labels::{DateTickSet, find_date_labels, granularity_for_span};
pub use labels::{
    TickSet, endpoint_labels, find_linear_labels, find_log_labels, integer_labels, ordinal_labels,
};
pub use layout::{LayoutInputs, LayoutRegion, RegionId, RegionTree, layout};
pub use legend::LegendEntry;
pub use limits::{
    AxisLimits, ExactUnits, LimitOverrides, LimitsMode, LimitsRequest, UnitsChecker,
    compute_axis_limits,
};
pub use pipeline::{RenderWarning, SeriesStyle};
pub use symbol_table::{SymbolRow, SymbolTable};
pub use text::{FixedCellMetrics, FontSpec, TextMetrics, TextSize};
