//! Texture space <-> content visual space over the content's bounds.

use glam::DVec2;
use meshpick_core::{HitError, Rect};

/// Linear map between normalized texture coordinates and the pixel
/// coordinates of a content rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    bounds: Rect,
}

impl CoordinateMapper {
    /// Mapper over `bounds`. Fails when either side is zero, negative or not
    /// finite.
    pub fn new(bounds: Rect) -> Result<Self, HitError> {
        if bounds.is_degenerate() {
            return Err(HitError::DegenerateRectangle {
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(Self { bounds })
    }

    /// Content bounds the mapper was built over.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Texture coordinate to visual pixel.
    pub fn to_visual(&self, uv: DVec2) -> DVec2 {
        DVec2::new(
            uv.x * self.bounds.width + self.bounds.left,
            uv.y * self.bounds.height + self.bounds.top,
        )
    }

    /// Visual pixel to texture coordinate.
    pub fn to_texture(&self, point: DVec2) -> DVec2 {
        DVec2::new(
            (point.x - self.bounds.left) / self.bounds.width,
            (point.y - self.bounds.top) / self.bounds.height,
        )
    }

    /// Corners of a visual-space rectangle in texture space, in
    /// [`Rect::corners`] order.
    pub fn texture_quad(&self, visual: &Rect) -> [DVec2; 4] {
        visual.corners().map(|corner| self.to_texture(corner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_bounds_are_rejected() {
        for rect in [
            Rect::new(0.0, 0.0, 0.0, 10.0),
            Rect::new(0.0, 0.0, 10.0, -1.0),
            Rect::new(0.0, 0.0, f64::INFINITY, 10.0),
            Rect::EMPTY,
        ] {
            assert!(matches!(
                CoordinateMapper::new(rect),
                Err(HitError::DegenerateRectangle { .. })
            ));
        }
    }

    #[test]
    fn maps_offset_rectangle() {
        let mapper = CoordinateMapper::new(Rect::new(10.0, 20.0, 200.0, 100.0)).expect("valid");
        assert_eq!(mapper.to_visual(DVec2::new(0.5, 0.25)), DVec2::new(110.0, 45.0));
        assert_eq!(mapper.to_texture(DVec2::new(210.0, 120.0)), DVec2::ONE);
    }

    #[test]
    fn full_bounds_map_to_unit_square() {
        let bounds = Rect::new(-5.0, 3.0, 40.0, 30.0);
        let mapper = CoordinateMapper::new(bounds).expect("valid");
        assert_eq!(
            mapper.texture_quad(&bounds),
            [DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y]
        );
    }
}
