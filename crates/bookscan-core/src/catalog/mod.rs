//! Book catalog lookup.
//!
//! A small abstraction over catalog backends (currently Google Books) used by
//! the resolver stage to turn an extracted title/author into canonical metadata.

pub(crate) mod google_books;
pub(crate) mod source;

pub use google_books::GoogleBooksCatalog;
pub use source::{CatalogSource, ImageLinks, Volume, VolumeInfo, VolumesResponse};
