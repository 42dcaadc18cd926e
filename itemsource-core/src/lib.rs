//! Core library for building the item drop source table from AtlasLoot data.

pub mod error;
pub mod file_utils;
pub mod instances;
pub mod models;
pub mod parsers;
pub mod processors;
pub mod rendering;

pub use error::{ItemSourceError, Result};
pub use instances::InstanceNameTable;
pub use models::{ItemId, ItemSource, ItemSources, SourceStats};
pub use parsers::extract_item_sources;
pub use processors::{generate_item_sources, ProcessSummary};
pub use rendering::{render_item_sources, RenderedOutput};
