//! Geographic bounding rectangles with longitude wraparound.
//!
//! [`GeoBounds`] tracks the area covered by orthophoto tiles. Longitudes are
//! stored unwrapped: a western edge in `[-180, 180)` plus an eastward span in
//! degrees. A box that crosses the antimeridian simply has
//! `west + span > 180`; no sign-based bookkeeping is needed, and conversion
//! back to `[-180, 180]` only happens at the edges of the API.
//!
//! # Example
//!
//! ```
//! use orthotile::bounds::{GeoBounds, Hemisphere};
//!
//! let mut bounds = GeoBounds::empty();
//! bounds.expand(-175.0, 10.0);
//! bounds.expand(175.0, 12.0);
//!
//! // The short way round is across the antimeridian.
//! assert_eq!(bounds.hemisphere(), Hemisphere::StraddlingAntimeridian);
//! assert!((bounds.width() - 10.0).abs() < 1e-9);
//! ```

mod geo_bounds;
mod hemisphere;

pub use geo_bounds::{normalize_lon, GeoBounds, BOUNDS_EPSILON};
pub use hemisphere::Hemisphere;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_bounds() -> impl Strategy<Value = GeoBounds> {
        (-180.0f64..180.0, 0.0f64..90.0, -80.0f64..70.0, 0.0f64..10.0).prop_map(
            |(west, span, south, height)| {
                GeoBounds::from_edges(west, south, west + span, south + height)
            },
        )
    }

    proptest! {
        #[test]
        fn expanded_points_map_into_unit_square(
            points in prop::collection::vec((-180.0f64..180.0, -90.0f64..90.0), 1..24)
        ) {
            let mut bounds = GeoBounds::empty();
            for (lon, lat) in &points {
                bounds.expand(*lon, *lat);
            }

            for (lon, lat) in &points {
                let (u, v) = bounds.tex_coord(*lon, *lat);
                prop_assert!((-1e-9..=1.0 + 1e-9).contains(&u), "u = {} for lon {}", u, lon);
                prop_assert!((-1e-9..=1.0 + 1e-9).contains(&v), "v = {} for lat {}", v, lat);
                prop_assert!(bounds.contains(*lon, *lat));
            }
        }

        #[test]
        fn absorb_is_symmetric_in_extent(a in arb_bounds(), b in arb_bounds()) {
            let mut ab = a;
            ab.absorb(&b);
            let mut ba = b;
            ba.absorb(&a);

            prop_assert!((ab.width() - ba.width()).abs() < 1e-9);
            prop_assert!((ab.height() - ba.height()).abs() < 1e-9);
        }

        #[test]
        fn absorb_covers_both_inputs(a in arb_bounds(), b in arb_bounds()) {
            let mut merged = a;
            merged.absorb(&b);

            for source in [&a, &b] {
                let (w, s) = (source.min_lon(), source.min_lat());
                let (e, n) = (source.max_lon(), source.max_lat());
                prop_assert!(merged.contains(w, s));
                prop_assert!(merged.contains(e, n));
            }
        }

        #[test]
        fn absorb_is_associative_within_a_hemisphere(
            boxes in prop::collection::vec(
                (0.0f64..170.0, 0.0f64..10.0, -60.0f64..50.0, 0.0f64..10.0),
                3
            )
        ) {
            let [a, b, c] = [0, 1, 2].map(|i| {
                let (west, span, south, height) = boxes[i];
                GeoBounds::from_edges(west, south, west + span, south + height)
            });

            let mut left = a;
            left.absorb(&b);
            left.absorb(&c);

            let mut bc = b;
            bc.absorb(&c);
            let mut right = a;
            right.absorb(&bc);

            prop_assert!((left.width() - right.width()).abs() < 1e-9);
            prop_assert!((left.height() - right.height()).abs() < 1e-9);
            prop_assert!((left.min_lon() - right.min_lon()).abs() < 1e-9);
        }
    }
}
