//! River-aware contour partition of a hex grid.
//!
//! Rivers run along hex edges. [`RiverContourCache::build`] turns the river
//! edges of a [`HexGrid`] into traced rivers, gives every cell edge a contour
//! polyline, and answers which cell or river a plane point belongs to, with
//! blend weights for the neighbouring cells.

mod cache;
pub mod classification;
pub mod config;
pub mod contour;
pub mod direction;
pub mod geometry;
pub mod grid;
pub mod land_contours;
pub mod metrics;
pub mod rationalizer;
pub mod river_contours;
pub mod river_sections;
pub mod river_tracer;

use std::sync::Arc;

use bevy::prelude::*;

pub use cache::{
    rebuild_contours, refresh_river_contours, RiverContourCache, RiverContourCacheHandle,
    RiverContourPlugin,
};
pub use classification::{Classification, PointClassifier, PointOrientationData};
pub use config::{
    load_contour_config, load_contour_config_from_env, ContourConfig, ContourConfigError,
    ContourConfigHandle,
};
pub use contour::{
    closest_point_on_contour, is_point_between_contours, Contour, ContourError, ContourStore,
};
pub use direction::{HexDirection, RiverFlow};
pub use grid::{
    CellIndex, GridDescription, GridError, HexCoordinates, HexGrid, HexGridHandle, VertexKey,
};
pub use metrics::HexMetrics;
pub use rationalizer::{rationalize_pair, RationalizeSummary, Repair};
pub use river_sections::{build_river_sections, RiverSection, RiverSectionGraph, SectionId};
pub use river_tracer::{trace_rivers, River, RiverId, RiverTracer, TraceError};

/// Construct a headless Bevy [`App`] publishing the contour cache for `grid`.
pub fn build_contour_app(
    grid: Arc<HexGrid>,
    config: Arc<ContourConfig>,
) -> Result<App, ContourError> {
    let plugin = RiverContourPlugin::new(grid, config)?;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(plugin);
    Ok(app)
}

/// Run one frame, picking up any grid or configuration replaced since the last.
pub fn refresh(app: &mut App) {
    app.update();
}
