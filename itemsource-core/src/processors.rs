//! End-to-end generation of `ItemSources.lua` from AtlasLoot data.

use crate::error::Result;
use crate::file_utils::{read_utf8_file, write_utf8_file};
use crate::instances::InstanceNameTable;
use crate::models::SourceStats;
use crate::parsers::extract_item_sources;
use crate::rendering::render_item_sources;
use std::path::{Path, PathBuf};

/// Outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub unique_items: usize,
    pub entries_written: usize,
    pub stats: SourceStats,
}

/// Read `input`, extract item sources, and write the rendered table to `output`.
///
/// The output is only written once the whole input has been read and
/// processed, so a failing read leaves any existing output untouched.
pub fn generate_item_sources(
    input: &Path,
    output: &Path,
    instance_names: &InstanceNameTable,
) -> Result<ProcessSummary> {
    let text = read_utf8_file(input)?;
    tracing::debug!("Read {} bytes from {:?}", text.len(), input);

    let sources = extract_item_sources(&text, instance_names);
    let rendered = render_item_sources(&sources);

    write_utf8_file(output, &rendered.text)?;
    tracing::debug!("Wrote {} entries to {:?}", rendered.entry_count, output);

    Ok(ProcessSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        unique_items: sources.len(),
        entries_written: rendered.entry_count,
        stats: sources.stats(),
    })
}
