// Legend selection state
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffixes of the synthetic series that follow their primary's legend entry.
pub const OVERLAY_SUFFIXES: [&str; 4] = ["-nulls", "-out-of-range", "-upper-bound", "-lower-bound"];

/// `legendselectchanged` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegendSelectChanged {
    pub selected: BTreeMap<String, bool>,
}

/// Legend keys the user has toggled; absent keys are visible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendSelection {
    selected: BTreeMap<String, bool>,
}

impl LegendSelection {
    pub fn new(selected: BTreeMap<String, bool>) -> Self {
        Self { selected }
    }

    pub fn apply(&mut self, event: LegendSelectChanged) {
        self.selected = event.selected;
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.selected.get(key).copied().unwrap_or(true)
    }

    /// Selection map with every key expanded to its overlay series names.
    pub fn fan_out(&self) -> BTreeMap<String, bool> {
        let mut expanded = BTreeMap::new();
        for (key, &visible) in &self.selected {
            expanded.insert(key.clone(), visible);
            for suffix in OVERLAY_SUFFIXES {
                expanded.insert(format!("{key}{suffix}"), visible);
            }
        }
        expanded
    }
}
