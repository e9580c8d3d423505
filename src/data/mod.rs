/// Data layer: core types, discovery, decoding, and raster cell filtering.
///
/// Architecture:
/// ```text
///  data folder
///        │
///        ▼
///   ┌───────────┐
///   │ discovery │  extension + capabilities → Vec<DataSource>
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  decode one source → Dataset::{Tabular, Raster}
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  no-data rule → valid / displayable raster cells
///   └──────────┘
/// ```

pub mod discovery;
pub mod filter;
pub mod loader;
pub mod model;
