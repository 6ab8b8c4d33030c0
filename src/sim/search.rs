//! Neighborhood collision search: one moving body vs the tile grid
//!
//! Scans a bounded window of tiles around the body, evaluates each solid
//! tile with seam-aware edge exclusion, and iterates resolution until the
//! body is stable or the iteration cap trips. Invoked once per dynamic
//! entity per step; there is no broad phase over entity pairs because
//! entities only ever collide with terrain.

use super::body::{Edge, EdgeSet, RectBody};
use super::collision::{EdgeContact, detect_edges, dominant_contact, resolve_edge};
use super::grid::TileGrid;
use crate::consts::{NEIGHBORHOOD_RADIUS, RESOLUTION_ITERATION_CAP};

/// Outcome of resolving the moving body against one tile
#[derive(Debug, Clone)]
pub struct EvaluatedSystem {
    /// The moving body, corrected for this contact
    pub corrected: RectBody,
    /// The tile body it collided with
    pub obstacle: RectBody,
    /// The dominant contact that was resolved
    pub contact: EdgeContact,
}

/// Edges of the moving body to skip for the tile at (row, col).
///
/// A face shared with another solid tile is an internal seam of a composite
/// wall, not an outward boundary: a body sliding along a run of adjacent
/// tiles must only be stopped by the run's outer face, never snag on the
/// joints between tiles. East neighbor solid suppresses Left contacts (the
/// tile's east face is interior), and symmetrically for the other three.
pub fn seam_exclusions(grid: &TileGrid, row: i32, col: i32) -> EdgeSet {
    let mut exclude = EdgeSet::NONE;
    if grid.is_physical(row, col + 1) {
        exclude.insert(Edge::Left);
    }
    if grid.is_physical(row, col - 1) {
        exclude.insert(Edge::Right);
    }
    if grid.is_physical(row + 1, col) {
        exclude.insert(Edge::Bottom);
    }
    if grid.is_physical(row - 1, col) {
        exclude.insert(Edge::Top);
    }
    exclude
}

/// One pass over the tile neighborhood: an evaluated system per colliding
/// tile, in row-major scan order
fn collide_neighborhood(body: &RectBody, grid: &TileGrid) -> Vec<EvaluatedSystem> {
    let (center_row, center_col) = grid.cell_at(body.bounds.center());
    let mut systems = Vec::new();

    for row in (center_row - NEIGHBORHOOD_RADIUS)..=(center_row + NEIGHBORHOOD_RADIUS) {
        for col in (center_col - NEIGHBORHOOD_RADIUS)..=(center_col + NEIGHBORHOOD_RADIUS) {
            let Some(attrs) = grid.attributes_at(row, col) else {
                continue;
            };
            if !attrs.is_physical() {
                continue;
            }

            let obstacle = grid.tile_body(row, col);
            let exclude = seam_exclusions(grid, row, col);
            let contacts = detect_edges(body, &obstacle, exclude);
            let Some(contact) = dominant_contact(&contacts) else {
                continue;
            };

            let restitution = body.tile_restitution(attrs.restitution);
            let corrected = resolve_edge(body, &obstacle, contact, restitution);
            systems.push(EvaluatedSystem {
                corrected,
                obstacle,
                contact,
            });
        }
    }
    systems
}

/// Reconcile a moving body against the terrain. The sole entry point the
/// integrator uses; returns the corrected body.
///
/// Each pass resolves at most one contact, preferring vertical (ground or
/// ceiling) over horizontal (wall) when both are present - landing on a
/// floor must not be masked by a simultaneous wall nudge. Iteration
/// continues only when a single pass produced both a horizontal and a
/// vertical contact (a corner touch, where fixing one axis can surface the
/// other); anything simpler settles in one pass. The cap bounds pathological
/// configurations that would otherwise oscillate.
pub fn resolve_against_terrain(body: &RectBody, grid: &TileGrid) -> RectBody {
    let mut current = body.clone();

    for _ in 0..RESOLUTION_ITERATION_CAP {
        let systems = collide_neighborhood(&current, grid);
        if systems.is_empty() {
            return current;
        }

        let has_vertical = systems.iter().any(|s| s.contact.edge.is_vertical());
        let has_horizontal = systems.iter().any(|s| !s.contact.edge.is_vertical());

        let chosen = systems
            .iter()
            .find(|s| s.contact.edge.is_vertical())
            .unwrap_or(&systems[0]);
        current = chosen.corrected.clone();

        // Only a corner touch (both axes reported in one pass) needs another
        // look; a lone contact or same-axis contacts settle immediately.
        if systems.len() <= 1 || !(has_horizontal && has_vertical) {
            return current;
        }
    }

    log::warn!("terrain resolution hit iteration cap, accepting last correction");
    current
}
