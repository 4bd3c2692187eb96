//! Frozen contour partition for one grid, and its engine wiring.
//!
//! The cache is built in full and never mutated afterwards. Systems that need
//! a newer partition build a fresh cache and swap it into
//! [`RiverContourCacheHandle`].

use std::borrow::Cow;
use std::sync::Arc;

use bevy::math::Vec2;
use bevy::prelude::*;

use crate::classification::{Classification, PointClassifier, PointOrientationData};
use crate::config::{ContourConfig, ContourConfigHandle};
use crate::contour::{self, Contour, ContourError, ContourStore};
use crate::direction::HexDirection;
use crate::grid::{CellIndex, HexGrid, HexGridHandle};
use crate::land_contours::build_land_contours;
use crate::rationalizer::{rationalize_contours, RationalizeSummary};
use crate::river_contours::build_river_contours;
use crate::river_sections::{build_river_sections, RiverSectionGraph};
use crate::river_tracer::{trace_rivers, River};

#[derive(Debug, Clone)]
pub struct RiverContourCache {
    grid: Arc<HexGrid>,
    config: Arc<ContourConfig>,
    sections: RiverSectionGraph,
    rivers: Vec<River>,
    contours: ContourStore,
    summary: RationalizeSummary,
}

impl RiverContourCache {
    /// Run the whole pipeline: sections, rivers, banks, dry edges, confluence repair.
    pub fn build(grid: Arc<HexGrid>, config: Arc<ContourConfig>) -> Result<Self, ContourError> {
        let mut sections = build_river_sections(&grid);
        let rivers = trace_rivers(&mut sections, &config);
        let mut contours = ContourStore::new(&grid);
        let banks = build_river_contours(&grid, &sections, &rivers, &config.rivers, &mut contours)?;
        let land = build_land_contours(&grid, &mut contours)?;
        let summary = rationalize_contours(&grid, &sections, &rivers, &mut contours)?;

        tracing::info!(
            target: "hex_contour::contours",
            cells = grid.len(),
            sections = sections.len(),
            rivers = rivers.len(),
            banks,
            land,
            confluences = summary.corners,
            "contours.rebuilt"
        );

        Ok(Self {
            grid,
            config,
            sections,
            rivers,
            contours,
            summary,
        })
    }

    /// Fresh cache over the same grid and configuration.
    pub fn rebuild_contours(&self) -> Result<Self, ContourError> {
        Self::build(Arc::clone(&self.grid), Arc::clone(&self.config))
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn config(&self) -> &ContourConfig {
        &self.config
    }

    pub fn sections(&self) -> &RiverSectionGraph {
        &self.sections
    }

    pub fn rivers(&self) -> &[River] {
        &self.rivers
    }

    pub fn contours(&self) -> &ContourStore {
        &self.contours
    }

    pub fn rationalize_summary(&self) -> &RationalizeSummary {
        &self.summary
    }

    pub fn contour(
        &self,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<Cow<'_, Contour>, ContourError> {
        self.contours.contour(cell, direction)
    }

    pub fn is_point_within_contour(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<bool, ContourError> {
        self.contours.is_point_within_contour(point, cell, direction)
    }

    /// Inside the band between the two contours of the edge `(cell, direction)`.
    ///
    /// Edges on the grid border have only one side and never match.
    pub fn is_point_between_contours(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<bool, ContourError> {
        if self.grid.get(cell).is_none() {
            return Err(ContourError::UnknownCell(cell));
        }
        let Some(neighbor) = self.grid.neighbor(cell, direction) else {
            return Ok(false);
        };
        let ours = self.contours.contour(cell, direction)?;
        let theirs = self.contours.contour(neighbor, direction.opposite())?;
        Ok(contour::is_point_between_contours(point, &ours, &theirs))
    }

    pub fn closest_point_on_contour(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<Vec2, ContourError> {
        let contour = self.contours.contour(cell, direction)?;
        Ok(contour::closest_point_on_contour(point, &contour))
    }

    pub fn classifier(&self) -> PointClassifier<'_> {
        PointClassifier::new(&self.grid, &self.contours, &self.config)
    }

    pub fn classify(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<Classification, ContourError> {
        self.classifier().classify(point, cell, direction)
    }

    pub fn classify_point(
        &self,
        point: Vec2,
        cell: CellIndex,
        direction: HexDirection,
    ) -> Result<(PointOrientationData, bool), ContourError> {
        self.classifier().classify_point(point, cell, direction)
    }

    pub fn locate(&self, point: Vec2) -> Classification {
        self.classifier().locate(point)
    }

    pub fn classify_points_par(&self, points: &[Vec2]) -> Vec<Classification> {
        self.classifier().classify_points_par(points)
    }
}

/// Build a cache for `grid` with `config`.
pub fn rebuild_contours(
    grid: Arc<HexGrid>,
    config: Arc<ContourConfig>,
) -> Result<RiverContourCache, ContourError> {
    RiverContourCache::build(grid, config)
}

/// Published cache; readers clone the `Arc` and keep a consistent snapshot.
#[derive(Resource, Debug, Clone)]
pub struct RiverContourCacheHandle(Arc<RiverContourCache>);

impl RiverContourCacheHandle {
    pub fn new(cache: Arc<RiverContourCache>) -> Self {
        Self(cache)
    }

    pub fn get(&self) -> Arc<RiverContourCache> {
        Arc::clone(&self.0)
    }

    pub fn replace(&mut self, cache: Arc<RiverContourCache>) {
        self.0 = cache;
    }
}

/// Rebuild the cache whenever the grid or configuration resource changes.
///
/// A failed rebuild keeps the previously published cache.
pub fn refresh_river_contours(
    grid: Res<HexGridHandle>,
    config: Res<ContourConfigHandle>,
    mut cache: ResMut<RiverContourCacheHandle>,
) {
    if !(grid.is_changed() || config.is_changed()) || cache.is_added() {
        return;
    }
    match RiverContourCache::build(grid.get(), config.get()) {
        Ok(fresh) => cache.replace(Arc::new(fresh)),
        Err(err) => {
            tracing::warn!(
                target: "hex_contour::contours",
                error = %err,
                "contours.rebuild_failed"
            );
        }
    }
}

/// Publishes a grid, its configuration and the matching contour cache.
pub struct RiverContourPlugin {
    cache: Arc<RiverContourCache>,
}

impl RiverContourPlugin {
    /// Builds the initial cache so a broken grid is reported before the app starts.
    pub fn new(grid: Arc<HexGrid>, config: Arc<ContourConfig>) -> Result<Self, ContourError> {
        let cache = RiverContourCache::build(grid, config)?;
        Ok(Self {
            cache: Arc::new(cache),
        })
    }

    pub fn from_cache(cache: Arc<RiverContourCache>) -> Self {
        Self { cache }
    }
}

impl Plugin for RiverContourPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(HexGridHandle::new(Arc::clone(&self.cache.grid)))
            .insert_resource(ContourConfigHandle::new(Arc::clone(&self.cache.config)))
            .insert_resource(RiverContourCacheHandle::new(Arc::clone(&self.cache)))
            .add_systems(Update, refresh_river_contours);
    }
}

const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RiverContourCache>();
    assert_send_sync::<RiverContourCacheHandle>();
};
