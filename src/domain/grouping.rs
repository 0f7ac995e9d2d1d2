// Graph type grouping of assets into tracks
use serde::{Deserialize, Serialize};
use std::fmt;

use super::asset::{Asset, GraphType};

/// How analog tracks are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    /// One analog track per unit, compact.
    Stacked,
    /// Every analog asset overlaid on a single track regardless of unit.
    Shared,
    #[default]
    #[serde(other)]
    Default,
}

impl GroupingMode {
    pub fn keeps_units_separate(&self) -> bool {
        !matches!(self, GroupingMode::Shared)
    }
}

/// Identity of one track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Binary,
    Multistate,
    Analog { unit: Option<String> },
}

impl GroupKey {
    pub fn for_asset(asset: &Asset, mode: GroupingMode) -> Self {
        match asset.graph_type() {
            GraphType::Binary => GroupKey::Binary,
            GraphType::Multistate => GroupKey::Multistate,
            GraphType::Analog => GroupKey::Analog {
                unit: if mode.keeps_units_separate() {
                    asset.unit().map(str::to_string)
                } else {
                    None
                },
            },
        }
    }

    pub fn graph_type(&self) -> GraphType {
        match self {
            GroupKey::Binary => GraphType::Binary,
            GroupKey::Multistate => GraphType::Multistate,
            GroupKey::Analog { .. } => GraphType::Analog,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            GroupKey::Binary => 0,
            GroupKey::Multistate => 1,
            GroupKey::Analog { .. } => 2,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Analog { unit: Some(unit) } => write!(f, "analog{}", unit),
            other => f.write_str(other.graph_type().as_str()),
        }
    }
}

/// Ordered track keys and the assets belonging to each.
#[derive(Debug, Clone)]
pub struct Grouping<'a> {
    groups: Vec<(GroupKey, Vec<&'a Asset>)>,
}

impl<'a> Grouping<'a> {
    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.iter().map(|(key, _)| key)
    }

    pub fn groups(&self) -> &[(GroupKey, Vec<&'a Asset>)] {
        &self.groups
    }

    pub fn members(&self, key: &GroupKey) -> &[&'a Asset] {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, members)| members.as_slice())
            .unwrap_or(&[])
    }

    /// Track (and axis) index of a key.
    pub fn index_of(&self, key: &GroupKey) -> Option<usize> {
        self.groups.iter().position(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group assets into tracks, ordered binary, multistate, analog; ties keep first-seen order.
pub fn group(assets: &[Asset], mode: GroupingMode) -> Grouping<'_> {
    let mut groups: Vec<(GroupKey, Vec<&Asset>)> = Vec::new();

    for asset in assets {
        let key = GroupKey::for_asset(asset, mode);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(asset),
            None => groups.push((key, vec![asset])),
        }
    }

    // Vec::sort_by_key is stable, so first-seen order breaks ties.
    groups.sort_by_key(|(key, _)| key.precedence());

    Grouping { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::fixtures;

    fn key_names(grouping: &Grouping) -> Vec<String> {
        grouping.keys().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_precedence_orders_binary_multistate_analog() {
        let assets = vec![
            fixtures::analog("t1", "degF"),
            fixtures::multistate("m1"),
            fixtures::binary("b1"),
            fixtures::analog("t2", "kW"),
            fixtures::binary("b2"),
        ];

        let grouping = group(&assets, GroupingMode::Default);

        assert_eq!(
            key_names(&grouping),
            vec!["binary", "multistate", "analogdegF", "analogkW"]
        );
        let binaries: Vec<_> = grouping
            .members(&GroupKey::Binary)
            .iter()
            .map(|a| a.point_id.as_str())
            .collect();
        assert_eq!(binaries, vec!["b1", "b2"]);
    }

    #[test]
    fn test_shared_mode_collapses_analog_units() {
        let assets = vec![
            fixtures::analog("t1", "degF"),
            fixtures::analog("t2", "kW"),
            fixtures::binary("b1"),
        ];

        let grouping = group(&assets, GroupingMode::Shared);

        assert_eq!(key_names(&grouping), vec!["binary", "analog"]);
        assert_eq!(grouping.members(&GroupKey::Analog { unit: None }).len(), 2);
    }

    #[test]
    fn test_same_unit_shares_a_group() {
        let assets = vec![
            fixtures::analog("t1", "degF"),
            fixtures::analog("t2", "kW"),
            fixtures::analog("t3", "degF"),
        ];

        let grouping = group(&assets, GroupingMode::Stacked);

        assert_eq!(key_names(&grouping), vec!["analogdegF", "analogkW"]);
        assert_eq!(
            grouping.index_of(&GroupKey::Analog {
                unit: Some("kW".to_string())
            }),
            Some(1)
        );
    }

    #[test]
    fn test_grouping_is_stable_across_calls() {
        let assets = vec![
            fixtures::analog("t2", "kW"),
            fixtures::binary("b1"),
            fixtures::analog("t1", "degF"),
            fixtures::multistate("m1"),
        ];

        let first = key_names(&group(&assets, GroupingMode::Default));
        for _ in 0..5 {
            assert_eq!(key_names(&group(&assets, GroupingMode::Default)), first);
        }
        assert_eq!(first, vec!["binary", "multistate", "analogkW", "analogdegF"]);
    }

    #[test]
    fn test_grouping_mode_parses_unknown_as_default() {
        let mode: GroupingMode = serde_json::from_str("\"grid\"").unwrap();
        assert_eq!(mode, GroupingMode::Default);
        let mode: GroupingMode = serde_json::from_str("\"shared\"").unwrap();
        assert_eq!(mode, GroupingMode::Shared);
    }
}
