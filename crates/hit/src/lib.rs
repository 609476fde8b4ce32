#![warn(missing_docs)]
//! Pointer hit testing for 2D content mapped onto 3D meshes.
//!
//! A pointer that lands on the mesh is resolved by ray casting. A captured
//! pointer that has slid off the mesh is resolved against the visible edges
//! of the content instead: the silhouette of the mesh as seen from the
//! camera, its open boundary, and the border of the content itself, all
//! clipped in texture space and projected to the screen. The nearest point on
//! those edges gives the texture coordinate to report.
//!
//! # Example
//!
//! ```rust,no_run
//! use glam::{DMat4, DVec2};
//! use meshpick_core::{primitives::plane_grid, ElementId, Rect, SurfaceId, SurfaceTransforms};
//! use meshpick_hit::InteractiveSurface;
//!
//! let mut surface = InteractiveSurface::new(
//!     SurfaceId(1),
//!     ElementId(1),
//!     plane_grid(2.0, 2.0, 4, 4),
//!     Rect::new(0.0, 0.0, 256.0, 256.0),
//! );
//! surface.set_transforms(SurfaceTransforms::new(DMat4::IDENTITY, DMat4::IDENTITY));
//! if let Some(hit) = surface.hit_test(DVec2::new(3.0, 0.5)) {
//!     println!("u = {}, v = {}", hit.uv.x, hit.uv.y);
//! }
//! ```

pub mod clip;
mod config;
pub mod containment;
mod edge;
mod locate;
mod mapper;
mod raycast;
mod router;
mod silhouette;
mod surface;

pub use config::HitTestConfig;
pub use edge::{Edge, EdgeInfo, EdgeTable, FaceSide, HitTestEdge};
pub use locate::{nearest_edge, project_edges, NearestEdge};
pub use mapper::CoordinateMapper;
pub use raycast::{raycast_mesh, screen_ray, MeshAabb, MeshRayHit, Ray};
pub use router::{CaptureTarget, PointerRouter};
pub use silhouette::{Dirty, EdgeCache, SilhouetteExtractor};
pub use surface::{ClosestIntersectionInfo, DirectHit, InteractiveSurface};
