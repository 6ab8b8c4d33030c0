//! Collision detection and response for axis-aligned bodies
//!
//! The tricky part of the platformer core: deciding which edge of a moving
//! body is actually crossing into an obstacle (directional tie-breaking,
//! seam exclusion, depth-bounded ingress) and producing a corrected body
//! that sits just outside the obstacle with one velocity axis reflected.

use std::cmp::Ordering;

use super::body::{Edge, EdgeSet, RectBody};
use crate::consts::COLLISION_EPSILON;

/// A candidate contact: which edge of the moving body is crossing into the
/// obstacle, and how deep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeContact {
    pub edge: Edge,
    /// Signed overlap depth measured from this edge into the obstacle
    pub ingress: f32,
}

/// Which edges of `body` are colliding with `obstacle`.
///
/// An edge qualifies only when all three hold:
/// - it is not in `exclude` (internal tile seams, see `seam_exclusions`)
/// - the relative velocity of `body` w.r.t. `obstacle` points into the
///   obstacle along that edge's axis
/// - its ingress lies in `[-epsilon, half extent of the obstacle]`; deeper
///   overlaps are already past the edge and correcting them would teleport
///   the body across the obstacle
///
/// The velocity gate makes left/right and top/bottom mutually exclusive, so
/// at most one horizontal and one vertical contact come back per call.
pub fn detect_edges(body: &RectBody, obstacle: &RectBody, exclude: EdgeSet) -> Vec<EdgeContact> {
    let mut contacts = Vec::new();
    if !body.bounds.intersects(&obstacle.bounds) {
        return contacts;
    }

    let rel = body.velocity - obstacle.velocity;
    let half_w = obstacle.bounds.half_width();
    let half_h = obstacle.bounds.half_height();

    if rel.x < 0.0 && !exclude.contains(Edge::Left) {
        let ingress = obstacle.bounds.right() - body.bounds.left;
        if (-COLLISION_EPSILON..=half_w).contains(&ingress) {
            contacts.push(EdgeContact {
                edge: Edge::Left,
                ingress,
            });
        }
    }
    if rel.x > 0.0 && !exclude.contains(Edge::Right) {
        let ingress = body.bounds.right() - obstacle.bounds.left;
        if (-COLLISION_EPSILON..=half_w).contains(&ingress) {
            contacts.push(EdgeContact {
                edge: Edge::Right,
                ingress,
            });
        }
    }
    if rel.y > 0.0 && !exclude.contains(Edge::Top) {
        let ingress = body.bounds.top - obstacle.bounds.bottom();
        if (-COLLISION_EPSILON..=half_h).contains(&ingress) {
            contacts.push(EdgeContact {
                edge: Edge::Top,
                ingress,
            });
        }
    }
    if rel.y < 0.0 && !exclude.contains(Edge::Bottom) {
        let ingress = obstacle.bounds.top - body.bounds.bottom();
        if (-COLLISION_EPSILON..=half_h).contains(&ingress) {
            contacts.push(EdgeContact {
                edge: Edge::Bottom,
                ingress,
            });
        }
    }

    contacts
}

/// Pick the dominant contact: smallest ingress wins. Shallow penetration is
/// the most recently initiated contact, which is the one to resolve when a
/// body grazes two edges in the same evaluation.
pub fn dominant_contact(contacts: &[EdgeContact]) -> Option<EdgeContact> {
    contacts.iter().copied().min_by(|a, b| {
        a.ingress
            .partial_cmp(&b.ingress)
            .unwrap_or(Ordering::Equal)
    })
}

/// Resolve one contact of a moving body against an immovable obstacle.
///
/// Returns a corrected copy: the colliding edge is snapped flush to the
/// obstacle's opposing edge plus one epsilon of separation, and that axis of
/// velocity is negated and scaled by `|restitution|`. The orthogonal
/// velocity component is preserved unchanged. The separation gap is not
/// optional - a body left at ingress zero re-triggers the same contact on
/// the next evaluation and the correction loop never settles.
///
/// Dynamic-vs-dynamic exchange is out of scope: entities collide against
/// terrain only, never against each other.
pub fn resolve_edge(
    body: &RectBody,
    obstacle: &RectBody,
    contact: EdgeContact,
    restitution: f32,
) -> RectBody {
    let mut out = body.clone();
    match contact.edge {
        Edge::Left => {
            out.bounds.left = obstacle.bounds.right() + COLLISION_EPSILON;
            out.velocity.x = -out.velocity.x * restitution.abs();
        }
        Edge::Right => {
            out.bounds.left = obstacle.bounds.left - out.bounds.width - COLLISION_EPSILON;
            out.velocity.x = -out.velocity.x * restitution.abs();
        }
        Edge::Top => {
            out.bounds.top = obstacle.bounds.bottom() - COLLISION_EPSILON;
            out.velocity.y = -out.velocity.y * restitution.abs();
        }
        Edge::Bottom => {
            out.bounds.top = obstacle.bounds.top + out.bounds.height + COLLISION_EPSILON;
            out.velocity.y = -out.velocity.y * restitution.abs();
        }
    }
    out
}
