//! Application composition root.
//!
//! [`OrthophotoApp`] owns the tile cache and the composite builder that
//! reads from it. Callers construct one explicitly and pass it (or handles
//! taken from it) to whatever needs orthophotos; nothing is global.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     OrthophotoApp                      │
//! │                                                        │
//! │  ConfigFile ──► AppConfig ──► TileCache (Arc)          │
//! │                                  │  search paths       │
//! │                                  ▼                     │
//! │                           CompositeBuilder ──► Orthophoto
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use orthotile::app::{AppConfig, OrthophotoApp};
//! use orthotile::config::ConfigFile;
//!
//! let file = ConfigFile::load()?;
//! let app = OrthophotoApp::start(AppConfig::from_config_file(&file))?;
//!
//! if let Some(photo) = app.orthophoto_at(-122.4, 37.6) {
//!     println!("{}x{} over {}", photo.width(), photo.height(), photo.bounds());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::OrthophotoApp;
pub use config::AppConfig;
pub use error::AppError;
