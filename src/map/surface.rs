//! Map surface abstraction
//!
//! The controller only needs to move the viewport and attach/detach
//! markers. [`HeadlessSurface`] keeps that state in memory for terminal use
//! and tests.

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Visible map region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

/// Handle of an attached marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

/// The single marker anchoring the resolved location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedMarker {
    pub id: MarkerId,
    pub position: Coordinates,
}

/// Something that can display a viewport and markers
pub trait MapSurface: Send {
    fn set_viewport(&mut self, viewport: Viewport);

    fn attach_marker(&mut self, position: Coordinates, title: &str) -> MarkerId;

    fn detach_marker(&mut self, id: MarkerId);
}

/// In-memory surface
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    viewport: Option<Viewport>,
    markers: BTreeMap<MarkerId, Coordinates>,
    next_id: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Positions of every attached marker
    pub fn live_markers(&self) -> Vec<Coordinates> {
        self.markers.values().copied().collect()
    }
}

impl MapSurface for HeadlessSurface {
    fn set_viewport(&mut self, viewport: Viewport) {
        debug!(center = %viewport.center, zoom = viewport.zoom, "viewport moved");
        self.viewport = Some(viewport);
    }

    fn attach_marker(&mut self, position: Coordinates, title: &str) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        debug!(marker = id.0, %position, title, "marker attached");
        self.markers.insert(id, position);
        id
    }

    fn detach_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_some() {
            debug!(marker = id.0, "marker detached");
        }
    }
}
