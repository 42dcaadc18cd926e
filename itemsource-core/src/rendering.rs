//! Rendering of extracted item sources as an `ItemSources.lua` table.

use crate::models::{ItemId, ItemSources};
use std::collections::BTreeMap;

/// Addon namespace the generated table is assigned into.
pub const ADDON_NAMESPACE: &str = "MLT";

const HEADER_LINES: [&str; 4] = [
    "-- MyLootTraking Item Sources Database",
    "-- Auto-generated from AtlasLootClassic data",
    "-- Format: [itemID] = { \"Boss Name\", \"Instance Name\" },",
    "",
];

const INDENT: &str = "    ";

/// Rendered Lua text plus the number of entries it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub text: String,
    pub entry_count: usize,
}

/// Escape a string for a double-quoted Lua literal.
///
/// Only double quotes are escaped.
pub fn escape_lua_string(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Group entries by instance. Instances sort lexically, entries by item id
/// with the boss name as tie-break.
pub fn group_by_instance(sources: &ItemSources) -> BTreeMap<&str, Vec<(ItemId, &str)>> {
    let mut groups: BTreeMap<&str, Vec<(ItemId, &str)>> = BTreeMap::new();
    for (item_id, source) in sources.iter() {
        groups
            .entry(source.instance.as_str())
            .or_default()
            .push((item_id, source.boss.as_str()));
    }
    for entries in groups.values_mut() {
        entries.sort_unstable();
    }
    groups
}

/// Render the complete `ItemSources.lua` file.
///
/// Output depends only on the contents of `sources`, never on its iteration
/// order.
pub fn render_item_sources(sources: &ItemSources) -> RenderedOutput {
    let mut lines: Vec<String> = HEADER_LINES.iter().map(|l| l.to_string()).collect();
    lines.push(format!("local _, {} = ...", ADDON_NAMESPACE));
    lines.push(String::new());
    lines.push(format!("{}.ItemSourceData = {{", ADDON_NAMESPACE));

    for (instance, entries) in group_by_instance(sources) {
        lines.push(String::new());
        lines.push(format!("{}-- {}", INDENT, instance));

        let safe_instance = escape_lua_string(instance);
        for (item_id, boss) in entries {
            lines.push(format!(
                "{}[{}] = {{ \"{}\", \"{}\" }},",
                INDENT,
                item_id,
                escape_lua_string(boss),
                safe_instance
            ));
        }
    }

    lines.push("}".to_string());
    lines.push(String::new());

    RenderedOutput {
        text: lines.join("\n"),
        entry_count: sources.len(),
    }
}
