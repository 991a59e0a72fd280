//! Geodetic coordinate conversion module
//!
//! Converts between earth-centred cartesian positions (as produced by terrain
//! meshes) and geodetic longitude/latitude/elevation on the WGS84 ellipsoid.

mod types;

pub use types::{CoordError, Geod, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

use glam::DVec3;

/// Geometry tolerance in radians shared with the terrain code.
pub const GEOMETRY_EPSILON: f64 = 1e-7;

/// [`GEOMETRY_EPSILON`] expressed in degrees.
///
/// Used to pull requested areas inward so that an edge touching a bucket
/// border does not drag in the neighbouring bucket.
pub const EDGE_EPSILON_DEG: f64 = GEOMETRY_EPSILON * (180.0 / std::f64::consts::PI);

/// WGS84 semi-major axis in metres.
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// WGS84 first eccentricity squared.
const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Converts an earth-centred cartesian position to geodetic coordinates.
///
/// Uses the closed-form solution by Vermeille, exact to well below a
/// millimetre for terrain heights. Positions within a few metres of the
/// earth's centre map to `(0, 0, -a)`.
pub fn cart_to_geod(cart: DVec3) -> Geod {
    let a2 = WGS84_A * WGS84_A;
    let e4 = WGS84_E2 * WGS84_E2;

    let xx_p_yy = cart.x * cart.x + cart.y * cart.y;
    if xx_p_yy + cart.z * cart.z < 25.0 {
        return Geod::from_rad(0.0, 0.0, -WGS84_A);
    }

    let sqrt_xx_p_yy = xx_p_yy.sqrt();
    let p = xx_p_yy / a2;
    let q = cart.z * cart.z * (1.0 - WGS84_E2) / a2;
    let r = (p + q - e4) / 6.0;
    let mut s = e4 * p * q / (4.0 * r * r * r);

    // s slightly below zero happens for points near the centre, clip it
    if (-2.0..=0.0).contains(&s) {
        s = 0.0;
    }

    let t = (1.0 + s + (s * (2.0 + s)).sqrt()).cbrt();
    let u = r * (1.0 + t + 1.0 / t);
    let v = (u * u + e4 * q).sqrt();
    let w = WGS84_E2 * (u + v - q) / (2.0 * v);
    let k = (u + v + w * w).sqrt() - w;
    let d = k * sqrt_xx_p_yy / (k + WGS84_E2);

    let lon = 2.0 * cart.y.atan2(cart.x + sqrt_xx_p_yy);
    let sqrt_dd_p_zz = (d * d + cart.z * cart.z).sqrt();
    let lat = 2.0 * cart.z.atan2(d + sqrt_dd_p_zz);
    let elevation = (k + WGS84_E2 - 1.0) * sqrt_dd_p_zz / k;

    Geod::from_rad(lon, lat, elevation)
}

/// Converts geodetic coordinates to an earth-centred cartesian position.
pub fn geod_to_cart(geod: &Geod) -> DVec3 {
    let lambda = geod.lon_deg.to_radians();
    let phi = geod.lat_deg.to_radians();
    let h = geod.elevation_m;

    let (sphi, cphi) = phi.sin_cos();
    let (slambda, clambda) = lambda.sin_cos();
    let n = WGS84_A / (1.0 - WGS84_E2 * sphi * sphi).sqrt();

    DVec3::new(
        (h + n) * cphi * clambda,
        (h + n) * cphi * slambda,
        (h + n - WGS84_E2 * n) * sphi,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_epsilon_in_degrees() {
        assert!((EDGE_EPSILON_DEG - 5.729_577_951_308_232e-6).abs() < 1e-15);
    }

    #[test]
    fn test_equator_prime_meridian() {
        let geod = cart_to_geod(DVec3::new(WGS84_A, 0.0, 0.0));
        assert!(geod.lon_deg.abs() < 1e-9);
        assert!(geod.lat_deg.abs() < 1e-9);
        assert!(geod.elevation_m.abs() < 1e-3);
    }

    #[test]
    fn test_north_pole() {
        let polar_radius = WGS84_A * (1.0 - WGS84_F);
        let geod = cart_to_geod(DVec3::new(0.0, 0.0, polar_radius + 100.0));
        assert!((geod.lat_deg - 90.0).abs() < 1e-9);
        assert!((geod.elevation_m - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let places = [
            (-122.375, 37.619, 4.0),
            (4.5, 41.3, 120.0),
            (179.99, -16.8, 10.0),
            (-179.99, 65.2, 2500.0),
            (151.18, -33.94, 6.0),
        ];

        for (lon, lat, elevation) in places {
            let original = Geod::from_deg(lon, lat, elevation);
            let converted = cart_to_geod(geod_to_cart(&original));

            assert!(
                (converted.lon_deg - lon).abs() < 1e-9,
                "lon {} came back as {}",
                lon,
                converted.lon_deg
            );
            assert!((converted.lat_deg - lat).abs() < 1e-9);
            assert!((converted.elevation_m - elevation).abs() < 1e-3);
        }
    }

    #[test]
    fn test_centre_of_earth() {
        let geod = cart_to_geod(DVec3::ZERO);
        assert_eq!(geod.lon_deg, 0.0);
        assert_eq!(geod.lat_deg, 0.0);
        assert_eq!(geod.elevation_m, -WGS84_A);
    }
}
