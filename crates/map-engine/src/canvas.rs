//! Raster surfaces backing map canvas elements.

use std::fmt;

use tiny_skia::Pixmap;

use station_common::{MapError, MapResult, Point, Size};

/// A canvas element: a device-pixel backing store plus its CSS placement.
#[derive(Clone)]
pub struct CanvasSurface {
    class_name: String,
    pixmap: Pixmap,
    css_size: Size,
    position: Point,
}

impl fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("class_name", &self.class_name)
            .field("pixel_size", &self.pixel_size())
            .field("css_size", &self.css_size)
            .field("position", &self.position)
            .finish()
    }
}

impl CanvasSurface {
    /// Create a 1x1 surface; callers size it to the viewport before drawing.
    pub fn new(class_name: impl Into<String>) -> MapResult<Self> {
        let pixmap = Pixmap::new(1, 1)
            .ok_or_else(|| MapError::CanvasUnavailable("failed to allocate 1x1 pixmap".into()))?;
        Ok(Self {
            class_name: class_name.into(),
            pixmap,
            css_size: Size::new(1.0, 1.0),
            position: Point::default(),
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Backing store dimensions in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    pub fn css_size(&self) -> Size {
        self.css_size
    }

    /// Top-left corner in layer coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Resize the backing store and CSS box.
    ///
    /// The pixmap is only reallocated when the device-pixel size changes; a
    /// reallocation discards the previous contents.
    pub fn resize(&mut self, css_size: Size, width: u32, height: u32) -> MapResult<()> {
        if self.pixmap.width() != width || self.pixmap.height() != height {
            self.pixmap = Pixmap::new(width, height).ok_or_else(|| {
                MapError::CanvasUnavailable(format!("failed to allocate {}x{} pixmap", width, height))
            })?;
        }
        self.css_size = css_size;
        Ok(())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Whether any pixel has non-zero alpha.
    pub fn has_content(&self) -> bool {
        self.pixmap.pixels().iter().any(|p| p.alpha() > 0)
    }

    /// Encode the backing store as PNG.
    pub fn encode_png(&self) -> MapResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| MapError::EncodeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_reallocates_only_on_change() {
        let mut surface = CanvasSurface::new("glow").unwrap();
        surface.resize(Size::new(400.0, 300.0), 800, 600).unwrap();
        assert_eq!(surface.pixel_size(), (800, 600));
        assert_eq!(surface.css_size(), Size::new(400.0, 300.0));

        surface.pixmap_mut().fill(tiny_skia::Color::WHITE);
        surface.resize(Size::new(400.0, 300.0), 800, 600).unwrap();
        assert!(surface.has_content());

        surface.resize(Size::new(200.0, 100.0), 200, 100).unwrap();
        assert!(!surface.has_content());
    }

    #[test]
    fn test_zero_size_is_error() {
        let mut surface = CanvasSurface::new("glow").unwrap();
        let err = surface.resize(Size::new(0.0, 0.0), 0, 0).unwrap_err();
        assert!(matches!(err, MapError::CanvasUnavailable(_)));
    }
}
