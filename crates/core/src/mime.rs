//! Common STAC asset/link media type constants.
//!
//! STAC stores media types as plain strings rather than a closed enum, since
//! extensions are free to introduce new ones. These constants cover the
//! types that show up most often in the wild.

/// GeoTIFF.
pub const GEOTIFF: &str = "image/tiff; application=geotiff";
/// Cloud-Optimized GeoTIFF.
pub const COG: &str = "image/tiff; application=geotiff; profile=cloud-optimized";
/// JPEG.
pub const JPEG: &str = "image/jpeg";
/// PNG.
pub const PNG: &str = "image/png";
/// JSON.
pub const JSON: &str = "application/json";
/// GeoJSON.
pub const GEOJSON: &str = "application/geo+json";
/// A STAC Item, Catalog, or Collection.
pub const STAC_JSON: &str = "application/json";
/// GeoParquet.
pub const GEOPARQUET: &str = "application/vnd.apache.parquet";
/// Plain text.
pub const TEXT: &str = "text/plain";
