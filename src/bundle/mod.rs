//! Bundle registry, cache and requirement lookup
//!
//! A bundle is a downloadable zip release whose extracted root contains
//! a `lib` directory holding individually named packages (directories)
//! or single-file modules. Bundles are downloaded once into a local
//! cache directory; requirements are then resolved against the cache.

mod cache;
mod locate;

pub use cache::ensure_cache;
pub use locate::{locate_requirement, ResolvedRequirement};

use serde::{Deserialize, Serialize};

/// A static registry entry describing a remote bundle archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSource {
    /// Registry name of the bundle (arbitrary, used in messages)
    pub name: String,
    /// URL of the zip release
    pub url: String,
}

/// Built-in registry: the Adafruit CircuitPython bundle releases.
pub fn default_registry() -> Vec<BundleSource> {
    vec![
        BundleSource {
            name: "circuitpython_busdriver".to_string(),
            url: "https://github.com/adafruit/Adafruit_CircuitPython_BusDevice/\
                  releases/download/2.2.11/adafruit-circuitpython-bus-device-py-2.2.11.zip"
                .to_string(),
        },
        BundleSource {
            name: "circuitpython_lis3dh".to_string(),
            url: "https://github.com/adafruit/Adafruit_CircuitPython_LIS3DH/\
                  releases/download/4.3.5/adafruit-circuitpython-lis3dh-py-4.3.5.zip"
                .to_string(),
        },
        BundleSource {
            name: "circuitpython_bundle".to_string(),
            url: "https://github.com/adafruit/Adafruit_CircuitPython_Bundle/\
                  releases/download/20190601/adafruit-circuitpython-bundle-py-20190601.zip"
                .to_string(),
        },
    ]
}
