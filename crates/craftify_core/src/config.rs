//! Engine configuration.
//!
//! # Responsibility
//! - Hold tunables shared by stores and services (paging, code generation,
//!   category deletion guard).
//! - Normalize caller input against those tunables.
//!
//! # Invariants
//! - `default_page_size >= 1`, and within `max_page_size` when a cap is set.
//! - `item_code_prefix` is non-empty ASCII alphanumeric.

/// Page length used when a list request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Prefix of server-generated item codes (`ITM-001`).
pub const DEFAULT_ITEM_CODE_PREFIX: &str = "ITM";
/// Category names treated as referenced unless deletion is forced.
pub const DEFAULT_RESERVED_CATEGORY_NAMES: &[&str] = &["Component"];

const KNOWN_UOMS: &[&str] = &["pcs", "ea", "kg", "L", "box", "pack"];

/// Returns the units of measure offered to clients for pick lists.
pub fn known_uoms() -> &'static [&'static str] {
    KNOWN_UOMS
}

/// Tunables for the resource engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    default_page_size: u32,
    max_page_size: Option<u32>,
    item_code_prefix: String,
    reserved_category_names: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: None,
            item_code_prefix: DEFAULT_ITEM_CODE_PREFIX.to_string(),
            reserved_category_names: DEFAULT_RESERVED_CATEGORY_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Builds a configuration, repairing out-of-range values.
    ///
    /// - `max_page_size` is an opt-in cap (`None` means uncapped), raised to
    ///   at least 1.
    /// - `default_page_size` is raised to 1 and lowered to the cap.
    /// - `item_code_prefix` keeps only ASCII alphanumerics and falls back to
    ///   `ITM` when nothing is left.
    /// - Blank reserved names are dropped; the rest are trimmed.
    pub fn new(
        default_page_size: u32,
        max_page_size: Option<u32>,
        item_code_prefix: &str,
        reserved_category_names: Vec<String>,
    ) -> Self {
        let max_page_size = max_page_size.map(|cap| cap.max(1));
        let default_page_size = default_page_size.max(1);
        Self {
            default_page_size: max_page_size
                .map_or(default_page_size, |cap| default_page_size.min(cap)),
            max_page_size,
            item_code_prefix: normalize_code_prefix(item_code_prefix),
            reserved_category_names: reserved_category_names
                .into_iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    pub fn max_page_size(&self) -> Option<u32> {
        self.max_page_size
    }

    pub fn item_code_prefix(&self) -> &str {
        self.item_code_prefix.as_str()
    }

    pub fn reserved_category_names(&self) -> &[String] {
        &self.reserved_category_names
    }

    /// Resolves a requested page length.
    ///
    /// - `None` -> `default_page_size`.
    /// - `Some(0)` -> 1.
    /// - Values above `max_page_size` are clamped when a cap is set.
    pub fn normalize_page_size(&self, size: Option<u32>) -> u32 {
        match size {
            None => self.default_page_size,
            Some(value) => {
                let value = value.max(1);
                self.max_page_size.map_or(value, |cap| value.min(cap))
            }
        }
    }
}

fn normalize_code_prefix(prefix: &str) -> String {
    let cleaned: String = prefix
        .trim()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if cleaned.is_empty() {
        DEFAULT_ITEM_CODE_PREFIX.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::{known_uoms, EngineConfig};

    #[test]
    fn page_size_defaults_and_floors_without_upper_cap() {
        let config = EngineConfig::default();
        assert_eq!(config.max_page_size(), None);
        assert_eq!(config.normalize_page_size(None), 20);
        assert_eq!(config.normalize_page_size(Some(0)), 1);
        assert_eq!(config.normalize_page_size(Some(7)), 7);
        assert_eq!(config.normalize_page_size(Some(10_000)), 10_000);
    }

    #[test]
    fn configured_cap_clamps_requested_sizes() {
        let config = EngineConfig::new(20, Some(100), "ITM", Vec::new());
        assert_eq!(config.max_page_size(), Some(100));
        assert_eq!(config.normalize_page_size(Some(150)), 100);
        assert_eq!(config.normalize_page_size(Some(0)), 1);
    }

    #[test]
    fn new_repairs_inconsistent_values() {
        let config = EngineConfig::new(
            500,
            Some(0),
            " sk-u ",
            vec!["  ".to_string(), " Kit ".to_string()],
        );
        assert_eq!(config.max_page_size(), Some(1));
        assert_eq!(config.default_page_size(), 1);
        assert_eq!(config.item_code_prefix(), "sku");
        assert_eq!(config.reserved_category_names(), ["Kit".to_string()]);

        let fallback = EngineConfig::new(0, None, "--", Vec::new());
        assert_eq!(fallback.item_code_prefix(), "ITM");
        assert_eq!(fallback.default_page_size(), 1);
    }

    #[test]
    fn known_uoms_lists_common_units() {
        assert!(known_uoms().contains(&"pcs"));
        assert_eq!(known_uoms().len(), 6);
    }
}
