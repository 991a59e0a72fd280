//! CLI command implementations.

pub mod area;
pub mod bucket;
pub mod config;
pub mod tile;

use orthotile::orthophoto::Orthophoto;

/// Print the bounds and size of an orthophoto.
fn print_orthophoto(photo: &Orthophoto) {
    let bounds = photo.bounds();
    println!("  Image:      {}x{} px", photo.width(), photo.height());
    println!("  Bounds:     {}", bounds);
    println!(
        "  Extent:     {:.6}° x {:.6}°",
        bounds.width(),
        bounds.height()
    );
}
