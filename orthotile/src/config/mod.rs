//! Configuration file handling.
//!
//! Settings live in an INI file, by default `~/.orthotile/config.ini`:
//!
//! ```ini
//! [scenery]
//! paths = /data/scenery/custom;/data/scenery/base
//!
//! [orthophoto]
//! directory = Orthophotos
//! primary_extension = png
//! secondary_extension = dds
//!
//! [cache]
//! max_size = 1GB
//! memoize_missing = true
//!
//! [logging]
//! level = info
//! directory = /var/log/orthotile
//! ```
//!
//! Every setting is addressed by a [`ConfigKey`] (`section.key`), which owns
//! the parsing and formatting of its value. Loading, saving and the CLI's
//! `config get`/`config set` all go through the keys.

mod error;
mod file;
mod keys;
mod size;

pub use error::ConfigError;
pub use file::{
    config_dir, config_file_path, CacheSettings, ConfigFile, OrthophotoSettings, ScenerySettings,
};
pub use keys::ConfigKey;
pub use size::{format_size, parse_size};
