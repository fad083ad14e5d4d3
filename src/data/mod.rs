/// Data layer: schema, loading, and the cube model.
///
/// Architecture:
/// ```text
///   <root>/**/*.h5
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  discover candidates, try each → first valid file
///   └──────────┘
///        │  descend per LoaderSchema, read X/Y, data, calibration
///        ▼
///   ┌──────────┐
///   │  raster   │  coordinates → [h, w], reshape, serpentine correction
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  cube [h, w, bands], labels, wavelengths, dim
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod raster;
pub mod schema;
