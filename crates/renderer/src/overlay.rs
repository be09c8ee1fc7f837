//! Canvas overlay painting soft temperature glows around stations.
//!
//! Each station contributes one radial gradient, full color at the center
//! fading to transparent at a zoom-dependent radius. Gradients are composited
//! additively so overlapping blobs brighten instead of occluding each other.
//! The whole canvas is repainted on every update.

use tiny_skia::{
    BlendMode, Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, RadialGradient,
    SpreadMode, Transform,
};
use tracing::{debug, trace, warn};

use map_engine::{CanvasId, MapEngine, OVERLAY_PANE};
use station_common::{GlowConfig, LatLng, Point};

use crate::color::Rgb;

/// Class of the overlay canvas element.
pub const GLOW_CANVAS_CLASS: &str = "glow-temperature-overlay";

/// A station reading to be painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowPoint {
    pub position: LatLng,
    pub value: f64,
}

/// A glow already projected to container pixels and colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub center: Point,
    pub color: Rgb,
}

/// The overlay canvas owned by the temperature renderer.
#[derive(Debug)]
pub struct GlowOverlay {
    canvas: CanvasId,
    destroyed: bool,
}

impl GlowOverlay {
    /// Create the overlay canvas in `pane`, or in the engine's overlay pane
    /// when `pane` does not exist.
    ///
    /// Returns `None` if no canvas could be created; callers carry on without
    /// an overlay.
    pub fn create(map: &mut dyn MapEngine, pane: &str) -> Option<Self> {
        let target = if map.has_pane(pane) {
            pane
        } else if map.has_pane(OVERLAY_PANE) {
            debug!(pane = %pane, fallback = OVERLAY_PANE, "Overlay pane missing, using fallback");
            OVERLAY_PANE
        } else {
            warn!(pane = %pane, "No pane available for glow overlay");
            return None;
        };

        match map.create_canvas(target, GLOW_CANVAS_CLASS) {
            Ok(canvas) => Some(Self {
                canvas,
                destroyed: false,
            }),
            Err(e) => {
                warn!(pane = %target, error = %e, "Failed to create glow overlay canvas");
                None
            }
        }
    }

    pub fn canvas(&self) -> CanvasId {
        self.canvas
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Track the viewport and repaint every point.
    ///
    /// The canvas is moved to the layer position of the container's top-left
    /// corner, resized to the viewport at the device pixel ratio and cleared
    /// before painting. Returns the number of glows painted, or `None` when the
    /// canvas no longer exists on the map.
    pub fn update<F>(
        &mut self,
        map: &mut dyn MapEngine,
        points: &[GlowPoint],
        colorize: F,
        config: &GlowConfig,
    ) -> Option<usize>
    where
        F: Fn(f64) -> Rgb,
    {
        if self.destroyed {
            return Some(0);
        }

        let top_left = map.container_point_to_layer_point(Point::new(0.0, 0.0));
        let size = map.size();
        let dpr = effective_ratio(map.device_pixel_ratio());
        let (width, height) = size.scaled_pixels(dpr);
        let radius = config.radius_at(map.zoom());

        let glows: Vec<Glow> = points
            .iter()
            .filter(|p| p.value.is_finite())
            .filter_map(|p| {
                let center = map.lat_lng_to_container_point(p.position);
                center.is_finite().then(|| Glow {
                    center,
                    color: colorize(p.value),
                })
            })
            .collect();

        let Some(surface) = map.canvas_mut(self.canvas) else {
            warn!(canvas = %self.canvas, "Glow overlay canvas vanished");
            return None;
        };

        surface.set_position(top_left);
        if let Err(e) = surface.resize(size, width, height) {
            warn!(error = %e, "Failed to resize glow overlay");
            surface.pixmap_mut().fill(Color::TRANSPARENT);
            return Some(0);
        }

        let painted = paint_glows(surface.pixmap_mut(), &glows, radius, dpr, config);
        trace!(painted, radius, width, height, "Repainted glow overlay");
        Some(painted)
    }

    /// Remove the canvas from the map. Safe to call repeatedly.
    pub fn destroy(&mut self, map: &mut dyn MapEngine) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        map.remove_canvas(self.canvas);
    }
}

fn effective_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

/// Clear `pixmap` and paint one additive radial gradient per glow.
///
/// Glow centers and `radius` are in CSS pixels; `device_pixel_ratio` scales
/// them onto the pixmap.
pub fn paint_glows(
    pixmap: &mut Pixmap,
    glows: &[Glow],
    radius: f64,
    device_pixel_ratio: f64,
    config: &GlowConfig,
) -> usize {
    pixmap.fill(Color::TRANSPARENT);

    let scale = effective_ratio(device_pixel_ratio) as f32;
    let transform = Transform::from_scale(scale, scale);
    let radius = radius as f32;
    if !(radius.is_finite() && radius > 0.0) {
        return 0;
    }

    let mut painted = 0;
    for glow in glows {
        let cx = glow.center.x as f32;
        let cy = glow.center.y as f32;
        if !(cx.is_finite() && cy.is_finite()) {
            continue;
        }

        let Some(paint) = glow_paint(cx, cy, radius, glow.color, config) else {
            continue;
        };
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            continue;
        };

        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        painted += 1;
    }
    painted
}

fn glow_paint(cx: f32, cy: f32, radius: f32, color: Rgb, config: &GlowConfig) -> Option<Paint<'static>> {
    let stop = |position: f32, alpha: f64| {
        let alpha = (alpha * config.alpha).clamp(0.0, 1.0) as f32;
        let color = Color::from_rgba(
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
            alpha,
        )?;
        Some(GradientStop::new(position, color))
    };

    let stops = vec![
        stop(0.0, config.center_alpha)?,
        stop(0.5, config.mid_alpha)?,
        stop(1.0, 0.0)?,
    ];

    let center = tiny_skia::Point::from_xy(cx, cy);
    let shader = RadialGradient::new(
        center,
        center,
        radius,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )?;

    let mut paint = Paint::default();
    paint.shader = shader;
    paint.blend_mode = BlendMode::Plus;
    paint.anti_alias = true;
    Some(paint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    #[test]
    fn test_glow_fades_from_center() {
        let mut pixmap = Pixmap::new(200, 200).unwrap();
        let glows = [Glow {
            center: Point::new(100.0, 100.0),
            color: Rgb::new(255, 80, 0),
        }];

        let painted = paint_glows(&mut pixmap, &glows, 60.0, 1.0, &GlowConfig::default());
        assert_eq!(painted, 1);

        let center = alpha_at(&pixmap, 100, 100);
        let mid = alpha_at(&pixmap, 130, 100);
        assert!(center > mid, "center {} should exceed mid {}", center, mid);
        assert_eq!(alpha_at(&pixmap, 170, 100), 0);
        assert_eq!(alpha_at(&pixmap, 0, 0), 0);
    }

    #[test]
    fn test_overlapping_glows_add_up() {
        let config = GlowConfig::default();
        let color = Rgb::new(200, 40, 40);

        let mut single = Pixmap::new(100, 100).unwrap();
        paint_glows(
            &mut single,
            &[Glow { center: Point::new(50.0, 50.0), color }],
            40.0,
            1.0,
            &config,
        );

        let mut double = Pixmap::new(100, 100).unwrap();
        let glow = Glow { center: Point::new(50.0, 50.0), color };
        paint_glows(&mut double, &[glow, glow], 40.0, 1.0, &config);

        assert!(alpha_at(&double, 50, 50) > alpha_at(&single, 50, 50));
    }

    #[test]
    fn test_non_finite_centers_skipped() {
        let mut pixmap = Pixmap::new(50, 50).unwrap();
        let glows = [Glow {
            center: Point::new(f64::NAN, 10.0),
            color: Rgb::new(1, 2, 3),
        }];
        assert_eq!(paint_glows(&mut pixmap, &glows, 20.0, 1.0, &GlowConfig::default()), 0);
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_device_pixel_ratio_scales_glow() {
        let mut pixmap = Pixmap::new(200, 200).unwrap();
        let glows = [Glow {
            center: Point::new(50.0, 50.0),
            color: Rgb::new(255, 255, 255),
        }];
        paint_glows(&mut pixmap, &glows, 30.0, 2.0, &GlowConfig::default());

        // Center lands at (100, 100) in device pixels.
        assert!(alpha_at(&pixmap, 100, 100) > 0);
        assert_eq!(alpha_at(&pixmap, 50, 50), 0);
    }
}
