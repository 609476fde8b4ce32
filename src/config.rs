use std::fs;
use std::path::Path;

use glam::{DMat4, DVec2, DVec3};
use meshpick_camera::{Camera, DragButton, SceneView, Trackball, Viewport};
use meshpick_core::primitives::{plane_grid, uv_sphere, welded_sphere, SphereParams};
use meshpick_core::texcoords::{self, TexCoordMapping};
use meshpick_core::{ElementId, Mesh, Rect, SurfaceId};
use meshpick_hit::{CaptureTarget, HitTestConfig, InteractiveSurface, PointerRouter};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_SCENE_PATH: &str = "config/scene.toml";

/// Everything the probe needs to build surfaces and replay pointer moves.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: Camera,
    pub viewport: Viewport,
    /// Defaults applied to surfaces that carry no override.
    pub hit_test: HitTestConfig,
    pub surfaces: Vec<SurfaceConfig>,
    pub pointers: Vec<PointerConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            viewport: Viewport::default(),
            hit_test: HitTestConfig::default(),
            surfaces: vec![SurfaceConfig::default()],
            pointers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub id: u64,
    pub element: u64,
    pub mesh: MeshConfig,
    /// Replaces the mesh's own texture coordinates when set.
    pub texcoords: Option<TexCoordsConfig>,
    /// Size and placement of the 2D content in its own coordinates.
    pub content_bounds: Rect,
    pub translation: DVec3,
    /// Trackball drags applied in order before the translation.
    pub drags: Vec<DragConfig>,
    pub hit_test: Option<HitTestConfig>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            id: 1,
            element: 1,
            mesh: MeshConfig::default(),
            texcoords: None,
            content_bounds: Rect::new(0.0, 0.0, 512.0, 256.0),
            translation: DVec3::ZERO,
            drags: Vec::new(),
            hit_test: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeshConfig {
    UvSphere(SphereParams),
    WeldedSphere(SphereParams),
    Plane {
        width: f64,
        height: f64,
        columns: u32,
        rows: u32,
    },
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self::UvSphere(SphereParams::default())
    }
}

impl MeshConfig {
    pub fn build(&self) -> Mesh {
        match self {
            Self::UvSphere(params) => uv_sphere(params),
            Self::WeldedSphere(params) => welded_sphere(params),
            Self::Plane {
                width,
                height,
                columns,
                rows,
            } => plane_grid(*width, *height, *columns, *rows),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TexCoordsConfig {
    pub mapping: TexCoordMapping,
    pub direction: DVec3,
}

impl Default for TexCoordsConfig {
    fn default() -> Self {
        Self {
            mapping: TexCoordMapping::Spherical,
            direction: DVec3::Y,
        }
    }
}

/// A straight pointer drag on the viewport, split into `steps` moves.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DragConfig {
    pub button: DragButton,
    pub from: DVec2,
    pub to: DVec2,
    pub steps: u32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            button: DragButton::Rotate,
            from: DVec2::ZERO,
            to: DVec2::ZERO,
            steps: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PointerConfig {
    pub position: DVec2,
    #[serde(default)]
    pub capture: Option<CaptureTarget>,
}

impl SceneConfig {
    /// Load the scene from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_SCENE_PATH))
    }

    /// Load the scene from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SceneConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Scene not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                SceneConfig::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// One router holding every configured surface with this frame's transforms.
    pub fn build_router(&self) -> PointerRouter {
        let view = SceneView::new(self.camera.clone(), self.viewport);
        let size = DVec2::new(self.viewport.width, self.viewport.height);
        let mut router = PointerRouter::new();
        for cfg in &self.surfaces {
            let model = DMat4::from_translation(cfg.translation) * cfg.trackball(size).transform();
            let transforms = view.surface_transforms(&model);
            if !transforms.is_complete() {
                warn!(surface = cfg.id, "surface has no usable transforms");
            }
            let mut surface = InteractiveSurface::new(
                SurfaceId(cfg.id),
                ElementId(cfg.element),
                cfg.build_mesh(),
                cfg.content_bounds,
            )
            .with_config(cfg.hit_test.unwrap_or(self.hit_test));
            surface.set_transforms(transforms);
            debug!(
                surface = cfg.id,
                triangles = surface.mesh().triangle_count(),
                "surface ready"
            );
            router.add_surface(surface);
        }
        router
    }
}

impl SurfaceConfig {
    pub fn build_mesh(&self) -> Mesh {
        let mut mesh = self.mesh.build();
        if let Some(tex) = self.texcoords {
            mesh.texture_coordinates = texcoords::generate(&mesh, tex.mapping, tex.direction);
        }
        mesh
    }

    /// Replay the configured drags on a trackball over a `size` viewport.
    pub fn trackball(&self, size: DVec2) -> Trackball {
        let mut trackball = Trackball::new();
        for drag in &self.drags {
            trackball.begin(drag.from, size);
            let steps = drag.steps.max(1);
            for step in 1..=steps {
                let t = f64::from(step) / f64::from(steps);
                trackball.drag(drag.from.lerp(drag.to, t), size, drag.button);
            }
        }
        trackball
    }
}
