//! Line-based extractor for AtlasLoot loot table files.
//!
//! The source files are Lua table literals without a formal grammar, so each
//! trimmed line is classified with a fixed set of patterns and fed through a
//! two-level instance/boss state machine. Anything unrecognized is skipped.

use crate::instances::InstanceNameTable;
use crate::models::{ItemId, ItemSource, ItemSources};
use lazy_static::lazy_static;
use regex::Regex;

/// Entry ids at or below this value are slot markers, not items.
pub const SLOT_MARKER_MAX: ItemId = 1000;

lazy_static! {
    /// `data["Karazhan"] = {`
    static ref INSTANCE_RE: Regex = Regex::new(r#"^data\["([^"]+)"\]\s*=\s*\{"#).unwrap();
    /// `name = format(NAME_X, AL["Boss"])`
    static ref BOSS_FORMAT_RE: Regex =
        Regex::new(r#"name\s*=\s*format\([^,]+,\s*AL\["([^"]+)"\]\)"#).unwrap();
    /// `name = AL["Boss"]`
    static ref BOSS_RE: Regex = Regex::new(r#"name\s*=\s*AL\["([^"]+)"\]"#).unwrap();
    /// Icons, textures, set/type markers and placeholder tokens that look like entries.
    static ref EXCLUDE_RE: Regex =
        Regex::new(r#""INV_|"Interface|SET_ITTYPE|QUEST_EXTRA|PRICE_EXTRA|AtlasLoot:"#).unwrap();
    /// `{ 2, 29434, [ATLASLOOT_IT_HORDE] = 29435 }`
    static ref VARIANT_ENTRY_RE: Regex = Regex::new(
        r"\{\s*[0-9]+\s*,\s*([0-9]+)\s*,\s*\[ATLASLOOT_IT_(?:ALLIANCE|HORDE)\]\s*=\s*([0-9]+)\s*\}"
    )
    .unwrap();
    /// `{ 1, 28477 }, -- Harbinger Bands`
    static ref ITEM_ENTRY_RE: Regex = Regex::new(r"\{\s*[0-9]+\s*,\s*([0-9]+)\s*\}").unwrap();
}

/// Classification of a single trimmed source line.
///
/// Variants are checked in declaration order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Start of an instance block, carrying the raw instance key.
    InstanceStart(&'a str),
    /// Boss name assignment, carrying the localization key.
    BossName(&'a str),
    /// Entry-shaped line that is known not to be an item.
    Excluded,
    /// Entry with a faction variant. Ids that overflow are `None`.
    VariantEntry(Option<ItemId>, Option<ItemId>),
    /// Plain entry.
    ItemEntry(Option<ItemId>),
    Other,
}

/// Classify a trimmed line.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(key) = capture(&INSTANCE_RE, line) {
        return LineKind::InstanceStart(key);
    }

    if let Some(boss) = capture(&BOSS_FORMAT_RE, line).or_else(|| capture(&BOSS_RE, line)) {
        return LineKind::BossName(boss);
    }

    if EXCLUDE_RE.is_match(line) {
        return LineKind::Excluded;
    }

    if let Some(caps) = VARIANT_ENTRY_RE.captures(line) {
        return LineKind::VariantEntry(parse_id(caps.get(1)), parse_id(caps.get(2)));
    }

    if let Some(caps) = ITEM_ENTRY_RE.captures(line) {
        return LineKind::ItemEntry(parse_id(caps.get(1)));
    }

    LineKind::Other
}

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn parse_id(m: Option<regex::Match<'_>>) -> Option<ItemId> {
    m.and_then(|m| m.as_str().parse().ok())
}

/// Whether `id` names a real item rather than a slot marker.
pub fn is_item_id(id: ItemId) -> bool {
    id > SLOT_MARKER_MAX
}

/// Instance/boss context while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParseState {
    /// No instance block seen yet.
    #[default]
    Idle,
    /// Inside an instance block, before its first boss.
    InInstance { instance: String },
    /// Inside a boss of an instance; entries are recorded here.
    InBoss { instance: String, boss: String },
}

impl ParseState {
    /// Enter a new instance block. Always clears the current boss.
    pub fn enter_instance(&mut self, instance: impl Into<String>) {
        *self = ParseState::InInstance {
            instance: instance.into(),
        };
    }

    /// Switch to `boss` within the current instance. Ignored while idle.
    pub fn enter_boss(&mut self, boss: impl Into<String>) {
        let instance = match std::mem::take(self) {
            ParseState::Idle => return,
            ParseState::InInstance { instance } | ParseState::InBoss { instance, .. } => instance,
        };
        *self = ParseState::InBoss {
            instance,
            boss: boss.into(),
        };
    }

    pub fn instance(&self) -> Option<&str> {
        match self {
            ParseState::Idle => None,
            ParseState::InInstance { instance } | ParseState::InBoss { instance, .. } => {
                Some(instance.as_str())
            }
        }
    }

    /// `(boss, instance)` when entries may be recorded.
    pub fn context(&self) -> Option<(&str, &str)> {
        match self {
            ParseState::InBoss { instance, boss } => Some((boss.as_str(), instance.as_str())),
            _ => None,
        }
    }
}

/// Extract the item id to drop source relation from AtlasLoot data text.
///
/// Never fails: lines that match no known shape are skipped. When an item
/// appears under several bosses only the first occurrence is kept.
pub fn extract_item_sources(text: &str, instance_names: &InstanceNameTable) -> ItemSources {
    let mut sources = ItemSources::new();
    let mut state = ParseState::default();

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();

        let kind = classify_line(line);
        if let LineKind::InstanceStart(key) = kind {
            let instance = instance_names.resolve(key);
            tracing::debug!("Line {}: instance {:?} ({})", line_no + 1, key, instance);
            state.enter_instance(instance);
            continue;
        }

        if state.instance().is_none() {
            continue;
        }

        if let LineKind::BossName(boss) = kind {
            state.enter_boss(boss);
            continue;
        }

        let Some((boss, instance)) = state.context() else {
            continue;
        };

        let candidates = match kind {
            LineKind::VariantEntry(base, variant) => [base, variant],
            LineKind::ItemEntry(id) => [id, None],
            LineKind::Excluded => {
                tracing::trace!("Line {}: excluded {:?}", line_no + 1, line);
                continue;
            }
            _ => continue,
        };

        for item_id in candidates.into_iter().flatten().filter(|id| is_item_id(*id)) {
            if !sources.insert_if_absent(item_id, ItemSource::new(boss, instance)) {
                tracing::trace!("Line {}: item {} already assigned", line_no + 1, item_id);
            }
        }
    }

    tracing::debug!("Extracted {} item sources", sources.len());
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> ItemSources {
        extract_item_sources(text, &InstanceNameTable::default())
    }

    #[test]
    fn test_classify_instance_start() {
        assert_eq!(
            classify_line(r#"data["GruulsLair"] = {"#),
            LineKind::InstanceStart("GruulsLair")
        );
        // Must be at line start once trimmed
        assert_eq!(classify_line(r#"x = data["GruulsLair"] = {"#), LineKind::Other);
    }

    #[test]
    fn test_classify_boss_prefers_format_shape() {
        assert_eq!(
            classify_line(r#"name = format(AL["%s (Heroic)"], AL["Nightbane"]),"#),
            LineKind::BossName("Nightbane")
        );
        assert_eq!(
            classify_line(r#"name = format(NAME_HEROIC, AL["Prince Malchezaar"]),"#),
            LineKind::BossName("Prince Malchezaar")
        );
        assert_eq!(
            classify_line(r#"name = AL["The Curator"],"#),
            LineKind::BossName("The Curator")
        );
    }

    #[test]
    fn test_classify_entries() {
        assert_eq!(
            classify_line("{ 2, 500, [ATLASLOOT_IT_ALLIANCE] = 54321 },"),
            LineKind::VariantEntry(Some(500), Some(54321))
        );
        assert_eq!(
            classify_line("{ 3, 29434, [ATLASLOOT_IT_HORDE] = 29435 }, -- Badge"),
            LineKind::VariantEntry(Some(29434), Some(29435))
        );
        assert_eq!(
            classify_line("[1] = { 1, 12345 }, -- Item A"),
            LineKind::ItemEntry(Some(12345))
        );
        assert_eq!(
            classify_line("{ 1, 99999999999 },"),
            LineKind::ItemEntry(None)
        );
        assert_eq!(classify_line("},"), LineKind::Other);
    }

    #[test]
    fn test_classify_ignores_non_ascii_digits() {
        // Arabic-Indic digits
        assert_eq!(classify_line("{ 1, \u{661}\u{662}\u{663}\u{664}\u{665} },"), LineKind::Other);
        assert_eq!(
            classify_line("{ \u{661}, 12345 },"),
            LineKind::Other
        );
    }

    #[test]
    fn test_classify_excluded_markers() {
        for line in [
            r#"{ 1, 12345, "INV_Misc_Bag_10" },"#,
            r#"{ 1, 12345 }, "Interface\\Icons\\Foo""#,
            "{ 1, 12345 }, SET_ITTYPE",
            "{ 1, 12345 }, QUEST_EXTRA",
            "{ 1, 12345 }, PRICE_EXTRA",
            r#"{ 1, "AtlasLoot:Separator" },"#,
        ] {
            assert_eq!(classify_line(line), LineKind::Excluded, "{}", line);
        }
    }

    #[test]
    fn test_parse_state_transitions() {
        let mut state = ParseState::default();
        state.enter_boss("Ignored");
        assert_eq!(state, ParseState::Idle);

        state.enter_instance("Karazhan");
        assert_eq!(state.instance(), Some("Karazhan"));
        assert_eq!(state.context(), None);

        state.enter_boss("Moroes");
        assert_eq!(state.context(), Some(("Moroes", "Karazhan")));

        state.enter_boss("Maiden of Virtue");
        assert_eq!(state.context(), Some(("Maiden of Virtue", "Karazhan")));

        state.enter_instance("Gruul's Lair");
        assert_eq!(state.context(), None);
        assert_eq!(state.instance(), Some("Gruul's Lair"));
    }

    #[test]
    fn test_extract_basic_example() {
        let text = r#"
data["Karazhan"] = {
  [1] = { name = AL["Attumen the Huntsman"],
    [1] = { 1, 12345 }, -- Item A
  },
}
"#;
        let sources = extract(text);
        assert_eq!(sources.len(), 1);
        assert_eq!(
            sources.get(12345),
            Some(&ItemSource::new("Attumen the Huntsman", "Karazhan"))
        );
    }

    #[test]
    fn test_extract_variant_drops_slot_marker() {
        let text = r#"
data["Y"] = {
  name = AL["X"],
  { 2, 500, [ATLASLOOT_IT_ALLIANCE] = 54321 },
}
"#;
        let sources = extract(text);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources.get(54321), Some(&ItemSource::new("X", "Y")));
        assert_eq!(sources.get(500), None);
    }

    #[test]
    fn test_extract_variant_keeps_both_ids() {
        let text = r#"
data["TheMechanar"] = {
  name = AL["Pathaleon the Calculator"],
  { 4, 29434, [ATLASLOOT_IT_HORDE] = 29435 },
}
"#;
        let sources = extract(text);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources.get(29434).unwrap().instance, "The Mechanar");
        assert_eq!(sources.get(29435).unwrap().boss, "Pathaleon the Calculator");
    }

    #[test]
    fn test_extract_threshold_filter() {
        let text = r#"
data["Karazhan"] = {
  name = AL["Moroes"],
  { 1, 1000 },
  { 2, 17 },
  { 3, 1001 },
}
"#;
        let sources = extract(text);
        assert_eq!(sources.len(), 1);
        assert!(sources.get(1000).is_none());
        assert!(sources.get(1001).is_some());
    }

    #[test]
    fn test_extract_first_write_wins() {
        let text = r#"
data["Karazhan"] = {
  name = AL["Prince Malchezaar"],
  { 1, 30183 },
}
data["GruulsLair"] = {
  name = AL["Gruul the Dragonkiller"],
  { 1, 30183 },
  { 2, 28800 },
}
"#;
        let sources = extract(text);
        assert_eq!(
            sources.get(30183),
            Some(&ItemSource::new("Prince Malchezaar", "Karazhan"))
        );
        assert_eq!(sources.get(28800).unwrap().instance, "Gruul's Lair");
    }

    #[test]
    fn test_extract_ignores_context_before_instance() {
        let text = r#"
name = AL["Orphan Boss"],
{ 1, 22222 },
data["Karazhan"] = {
{ 1, 33333 },
  name = AL["Moroes"],
  { 1, 44444 },
}
"#;
        let sources = extract(text);
        assert!(sources.get(22222).is_none());
        // Inside the instance but before any boss
        assert!(sources.get(33333).is_none());
        assert_eq!(sources.get(44444).unwrap().boss, "Moroes");
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn test_extract_new_instance_resets_boss() {
        let text = r#"
data["Karazhan"] = {
  name = AL["Moroes"],
  { 1, 28529 },
data["GruulsLair"] = {
  { 1, 28800 },
}
"#;
        let sources = extract(text);
        assert!(sources.get(28529).is_some());
        assert!(sources.get(28800).is_none());
    }

    #[test]
    fn test_extract_skips_excluded_lines() {
        let text = r#"
data["Karazhan"] = {
  name = AL["Moroes"],
  { 1, 12345, "INV_Box_01" },
  { 2, 23456 }, "Interface\\Icons\\Spell_Holy"
  { 3, 34567 },
}
"#;
        let sources = extract(text);
        assert_eq!(sources.len(), 1);
        assert!(sources.get(34567).is_some());
    }

    #[test]
    fn test_extract_merges_repeated_instance_blocks() {
        let text = r#"
data["ZulAman"] = {
  name = AL["Nalorakk"],
  { 1, 33191 },
}
data["Karazhan"] = {
  name = AL["Moroes"],
  { 1, 28529 },
}
data["ZulAman"] = {
  { 1, 33203 },
  name = AL["Akil'zon"],
  { 2, 33281 },
}
"#;
        let sources = extract(text);
        assert_eq!(sources.len(), 3);
        assert_eq!(sources.get(33191), Some(&ItemSource::new("Nalorakk", "Zul'Aman")));
        assert!(sources.get(33203).is_none());
        assert_eq!(sources.get(33281), Some(&ItemSource::new("Akil'zon", "Zul'Aman")));
    }

    #[test]
    fn test_extract_unknown_instance_uses_key() {
        let text = "data[\"Naxxramas\"] = {\n name = AL[\"Patchwerk\"],\n { 1, 22960 },\n";
        let sources = extract(text);
        assert_eq!(sources.get(22960), Some(&ItemSource::new("Patchwerk", "Naxxramas")));
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract("").is_empty());
        assert!(extract("-- nothing here\nlocal x = 1\n").is_empty());
    }
}
