//! Spherical Web Mercator (EPSG:3857) in the pixel space of a tiled map.
//!
//! At zoom `z` the world is `256 * 2^z` pixels square, with (0, 0) at the
//! top-left corner (180°W, ~85.05°N).

use std::f64::consts::PI;

use station_common::{LatLng, Point};

/// Tile edge in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude beyond which Web Mercator is undefined.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// World size in pixels at a (possibly fractional) zoom level.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Project a coordinate to world pixels at `zoom`.
pub fn project(position: LatLng, zoom: f64) -> Point {
    let lat = position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let size = world_size(zoom);

    let x = (position.lng + 180.0) / 360.0 * size;
    let y = (1.0 - ((PI / 4.0 + lat / 2.0).tan()).ln() / PI) / 2.0 * size;

    Point::new(x, y)
}

/// Inverse of [`project`].
pub fn unproject(point: Point, zoom: f64) -> LatLng {
    let size = world_size(zoom);

    let lng = point.x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * point.y / size);
    let lat = n.sinh().atan().to_degrees();

    LatLng::new(lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_world_center() {
        let p = project(LatLng::new(0.0, 0.0), 0.0);
        assert!((p.x - 128.0).abs() < 1e-9);
        assert!((p.y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let original = LatLng::new(52.1, 5.29);
        let back = unproject(project(original, 8.0), 8.0);
        assert!((back.lat - original.lat).abs() < 1e-9);
        assert!((back.lng - original.lng).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_doubles_distance() {
        let a = project(LatLng::new(52.0, 4.0), 7.0);
        let b = project(LatLng::new(52.0, 5.0), 7.0);
        let c = project(LatLng::new(52.0, 4.0), 8.0);
        let d = project(LatLng::new(52.0, 5.0), 8.0);
        assert!(((d.x - c.x) - 2.0 * (b.x - a.x)).abs() < 1e-9);
    }

    #[test]
    fn test_polar_latitudes_clamped() {
        let top = project(LatLng::new(90.0, 0.0), 0.0);
        assert!(top.y.is_finite());
        assert!(top.y.abs() < 1e-6);
    }
}
