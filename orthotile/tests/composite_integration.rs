//! Integration tests for orthophoto lookup and compositing.
//!
//! Each test builds a scenery root in a temporary directory, writes solid
//! colour PNG tiles at `<root>/Orthophotos/<base path>/<index>.png` and runs
//! lookups through the public API.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use glam::DVec3;
use image::{Rgb, RgbImage};
use rand::Rng;
use tempfile::TempDir;

use orthotile::app::{AppConfig, OrthophotoApp};
use orthotile::bounds::{GeoBounds, Hemisphere};
use orthotile::bucket::{Bucket, SgBucket};
use orthotile::cache::{TileCache, TileCacheConfig};
use orthotile::composite::{AreaRequest, CompositeBuilder, CompositeError};
use orthotile::coord::{geod_to_cart, Geod};
use orthotile::orthophoto::Orthophoto;
use orthotile::raster::{FileImageLoader, ImageLoader, TileImage};

const TILE: u32 = 64;
const RED: [u8; 3] = [255, 0, 0];
const GREEN: [u8; 3] = [0, 255, 0];
const YELLOW: [u8; 3] = [255, 255, 0];
const BLUE: [u8; 3] = [0, 0, 255];
const BLACK: [u8; 3] = [0, 0, 0];

// ============================================================================
// Helpers
// ============================================================================

fn write_tile(root: &Path, bucket: &SgBucket, color: [u8; 3]) {
    let dir = root.join("Orthophotos").join(bucket.base_path());
    std::fs::create_dir_all(&dir).unwrap();
    RgbImage::from_pixel(TILE, TILE, Rgb(color))
        .save(dir.join(format!("{}.png", bucket.index())))
        .unwrap();
}

fn builder_for(root: &Path) -> CompositeBuilder {
    builder_with_loader(root, Arc::new(FileImageLoader))
}

fn builder_with_loader(root: &Path, loader: Arc<dyn ImageLoader>) -> CompositeBuilder {
    let cache = Arc::new(TileCache::new(TileCacheConfig::default(), loader));
    cache.add_search_path(root);
    CompositeBuilder::new(cache)
}

fn rgb_at(photo: &Orthophoto, x: u32, y: u32) -> [u8; 3] {
    photo.image().image().to_rgb8().get_pixel(x, y).0
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// Loader counting how many files it decodes.
struct CountingLoader {
    loads: AtomicUsize,
}

impl ImageLoader for CountingLoader {
    fn load(&self, path: &Path) -> Option<TileImage> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        thread::sleep(std::time::Duration::from_millis(5));
        FileImageLoader.load(path)
    }
}

// ============================================================================
// Single bucket
// ============================================================================

#[test]
fn test_single_bucket_bounds_match_bucket_extent() {
    let dir = TempDir::new().unwrap();
    let bucket = SgBucket::containing(-122.37, 37.62);
    write_tile(dir.path(), &bucket, GREEN);

    let photo = builder_for(dir.path())
        .orthophoto_for_bucket(&bucket)
        .unwrap();

    let bounds = photo.bounds();
    assert_close(bounds.min_lon(), bucket.center_lon() - bucket.width() / 2.0);
    assert_close(bounds.max_lon(), bucket.center_lon() + bucket.width() / 2.0);
    assert_close(bounds.min_lat(), bucket.center_lat() - bucket.height() / 2.0);
    assert_close(bounds.max_lat(), bucket.center_lat() + bucket.height() / 2.0);
    assert_eq!((photo.width(), photo.height()), (TILE, TILE));
}

// ============================================================================
// Rectangle requests
// ============================================================================

#[test]
fn test_two_by_two_grid_composite() {
    let dir = TempDir::new().unwrap();
    let sw = SgBucket::containing(10.05, 1.05);
    write_tile(dir.path(), &sw, RED);
    write_tile(dir.path(), &sw.sibling(1, 0), GREEN);
    write_tile(dir.path(), &sw.sibling(0, 1), YELLOW);
    write_tile(dir.path(), &sw.sibling(1, 1), BLUE);

    let area = GeoBounds::from_edges(10.0, 1.0, 10.25, 1.25);
    let photo = builder_for(dir.path())
        .orthophoto_for_bounds::<SgBucket>(&area)
        .unwrap()
        .expect("all four tiles exist");

    assert_eq!((photo.width(), photo.height()), (2 * TILE, 2 * TILE));

    let (u, v) = photo.tex_coord(10.25, 1.25);
    assert_close(u, 1.0);
    assert_close(v, 0.0);

    let (u, v) = photo.tex_coord(10.0, 1.0);
    assert_close(u, 0.0);
    assert_close(v, 1.0);

    let last = 2 * TILE - 1;
    assert_eq!(rgb_at(&photo, 0, last), RED);
    assert_eq!(rgb_at(&photo, last, last), GREEN);
    assert_eq!(rgb_at(&photo, 0, 0), YELLOW);
    assert_eq!(rgb_at(&photo, last, 0), BLUE);
}

#[test]
fn test_grid_with_missing_cell_leaves_it_blank() {
    let dir = TempDir::new().unwrap();
    let sw = SgBucket::containing(10.05, 1.05);
    write_tile(dir.path(), &sw, RED);
    write_tile(dir.path(), &sw.sibling(1, 1), BLUE);

    let area = GeoBounds::from_edges(10.0, 1.0, 10.25, 1.25);
    let photo = builder_for(dir.path())
        .orthophoto_for_bounds::<SgBucket>(&area)
        .unwrap()
        .unwrap();

    assert_eq!((photo.width(), photo.height()), (2 * TILE, 2 * TILE));
    assert_eq!(rgb_at(&photo, 0, 0), BLACK);
    assert_eq!(rgb_at(&photo, 2 * TILE - 1, 2 * TILE - 1), BLACK);
    assert_eq!(rgb_at(&photo, 0, 2 * TILE - 1), RED);
    assert_eq!(rgb_at(&photo, 2 * TILE - 1, 0), BLUE);

    // Bounds cover every grid cell, not just the populated ones
    assert_close(photo.bounds().width(), 0.25);
    assert_close(photo.bounds().height(), 0.25);
}

#[test]
fn test_area_without_tiles_is_no_coverage() {
    let dir = TempDir::new().unwrap();
    let builder = builder_for(dir.path());

    let inside_one = GeoBounds::from_edges(10.01, 1.01, 10.1, 1.1);
    assert!(builder
        .orthophoto_for_bounds::<SgBucket>(&inside_one)
        .unwrap()
        .is_none());

    let spanning = GeoBounds::from_edges(10.0, 1.0, 10.5, 1.5);
    assert!(builder
        .orthophoto_for_bounds::<SgBucket>(&spanning)
        .unwrap()
        .is_none());
}

#[test]
fn test_area_across_bucket_width_change_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let below = SgBucket::containing(10.05, 21.9);
    write_tile(dir.path(), &below, RED);
    write_tile(dir.path(), &below.sibling(0, 1), BLUE);

    let builder = builder_for(dir.path());
    let area = GeoBounds::from_edges(10.0, 21.875, 10.125, 22.125);

    let err = builder.orthophoto_for_bounds::<SgBucket>(&area).unwrap_err();
    assert!(matches!(err, CompositeError::UnsupportedSpan { .. }));
    assert!(builder
        .orthophoto_for_area_or_none::<SgBucket>(&AreaRequest::bounds(area))
        .is_none());
}

#[test]
fn test_area_across_antimeridian() {
    let dir = TempDir::new().unwrap();
    let east_of_date_line = SgBucket::containing(179.9, 0.05);
    let west_of_date_line = SgBucket::containing(-179.9, 0.05);
    assert_eq!(east_of_date_line.sibling(1, 0), west_of_date_line);
    write_tile(dir.path(), &east_of_date_line, RED);
    write_tile(dir.path(), &west_of_date_line, BLUE);

    let area = GeoBounds::from_edges(179.875, 0.0, -179.875, 0.125);
    let photo = builder_for(dir.path())
        .orthophoto_for_bounds::<SgBucket>(&area)
        .unwrap()
        .unwrap();

    assert_eq!((photo.width(), photo.height()), (2 * TILE, TILE));
    assert_eq!(photo.bounds().hemisphere(), Hemisphere::StraddlingAntimeridian);
    assert_close(photo.bounds().width(), 0.25);
    assert_eq!(rgb_at(&photo, 0, TILE / 2), RED);
    assert_eq!(rgb_at(&photo, 2 * TILE - 1, TILE / 2), BLUE);

    let (u, _) = photo.tex_coord(180.0, 0.0625);
    assert_close(u, 0.5);
}

// ============================================================================
// Point-set requests
// ============================================================================

#[test]
fn test_points_over_two_buckets() {
    let dir = TempDir::new().unwrap();
    let west = SgBucket::containing(10.05, 1.05);
    let east = west.sibling(1, 0);
    write_tile(dir.path(), &west, RED);
    write_tile(dir.path(), &east, BLUE);

    let center = geod_to_cart(&Geod::from_deg(10.125, 1.0625, 0.0));
    let points: Vec<DVec3> = [(10.03, 1.02), (10.1, 1.1), (10.2, 1.05), (10.24, 1.11)]
        .iter()
        .map(|&(lon, lat)| geod_to_cart(&Geod::from_deg(lon, lat, 150.0)) - center)
        .collect();

    let photo = builder_for(dir.path())
        .orthophoto_for_area::<SgBucket>(&AreaRequest::points(&points, center))
        .unwrap()
        .unwrap();

    assert_eq!((photo.width(), photo.height()), (2 * TILE, TILE));
    assert_eq!(rgb_at(&photo, 5, 5), RED);
    assert_eq!(rgb_at(&photo, 2 * TILE - 5, 5), BLUE);
    assert_close(photo.bounds().min_lon(), 10.0);
    assert_close(photo.bounds().max_lon(), 10.25);
}

#[test]
fn test_points_without_tiles_is_no_coverage() {
    let dir = TempDir::new().unwrap();
    let center = geod_to_cart(&Geod::from_deg(30.0, -20.0, 0.0));
    let points = [DVec3::ZERO, DVec3::new(100.0, 100.0, 0.0)];

    assert!(builder_for(dir.path())
        .orthophoto_for_points::<SgBucket>(&points, center)
        .unwrap()
        .is_none());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_area_requests_load_each_tile_once() {
    const THREADS: usize = 8;
    const REQUESTS: usize = 20;

    let dir = TempDir::new().unwrap();
    let origin = SgBucket::containing(10.05, 1.05);
    let mut with_files = HashSet::new();
    for dx in 0..4 {
        for dy in 0..4 {
            let bucket = origin.sibling(dx, dy);
            write_tile(dir.path(), &bucket, [(dx * 60) as u8, (dy * 60) as u8, 0]);
            with_files.insert(bucket.index());
        }
    }

    let loader = Arc::new(CountingLoader {
        loads: AtomicUsize::new(0),
    });
    let builder = builder_with_loader(dir.path(), loader.clone());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let builder = builder.clone();
            thread::spawn(move || {
                let mut rng = rand::rng();
                for _ in 0..REQUESTS {
                    let west = 10.0 + 0.125 * rng.random_range(0..3) as f64;
                    let south = 1.0 + 0.125 * rng.random_range(0..3) as f64;
                    let area = GeoBounds::from_edges(west, south, west + 0.25, south + 0.25);
                    let photo = builder
                        .orthophoto_for_bounds::<SgBucket>(&area)
                        .unwrap()
                        .unwrap();
                    assert_eq!((photo.width(), photo.height()), (2 * TILE, 2 * TILE));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = builder.cache().stats();
    assert!(loader.loads.load(Ordering::SeqCst) <= with_files.len());
    assert_eq!(stats.loads as usize, loader.loads.load(Ordering::SeqCst));
    assert!(stats.entry_count as usize <= with_files.len());
}

// ============================================================================
// Application
// ============================================================================

#[test]
fn test_app_composes_from_configured_scenery() {
    let dir = TempDir::new().unwrap();
    let sw = SgBucket::containing(10.05, 1.05);
    write_tile(dir.path(), &sw, RED);
    write_tile(dir.path(), &sw.sibling(1, 0), GREEN);

    let app = OrthophotoApp::start(AppConfig::default().with_scenery_path(dir.path())).unwrap();
    let photo = app
        .orthophoto_for_bounds(&GeoBounds::from_edges(10.0, 1.0, 10.25, 1.125))
        .unwrap()
        .unwrap();

    assert_eq!((photo.width(), photo.height()), (2 * TILE, TILE));
    assert_eq!(app.stats().loads, 2);
}
