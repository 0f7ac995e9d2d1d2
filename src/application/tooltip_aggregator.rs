// Tooltip aggregator - Hovered values across every track folded into one payload
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::application::series_synthesizer::{point_id_of, PRIMARY_PREFIX};
use crate::domain::asset::{Asset, NO_DATA};
use crate::domain::tooltip::{
    AxisHoverEvent, SeriesType, TooltipEntry, TooltipGroup, TooltipPayload, TooltipValue,
};

/// Id of the out-of-band element a chart's tooltip payload is rendered into.
pub fn tooltip_region_id(chart_id: &str) -> String {
    format!("graph-tooltip-{chart_id}")
}

/// Latest hovered value per point id.
///
/// Entries are only ever replaced, never cleared, so values from tracks the
/// pointer is not over stay visible until that track reports again.
#[derive(Debug, Clone, Default)]
pub struct TooltipAggregator {
    snapshot: Option<HashMap<String, TooltipValue>>,
}

impl TooltipAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one axis-hover callback into the snapshot.
    pub fn on_hover(&mut self, events: &[AxisHoverEvent]) {
        let mut touched = 0;

        for event in events {
            if !event.series_id.starts_with(PRIMARY_PREFIX) {
                continue;
            }
            let Some(point_id) = point_id_of(&event.series_id) else {
                continue;
            };
            let Some(time) = event.time_millis() else {
                tracing::warn!("Skipping hover on {} without a readable axis value", event.series_id);
                continue;
            };

            let value = TooltipValue {
                time,
                has_no_data: has_no_data(event),
                data: match event.value.get(4) {
                    Some(Value::Object(data)) => data.clone(),
                    _ => Map::new(),
                },
            };
            self.snapshot
                .get_or_insert_with(HashMap::new)
                .insert(point_id.to_string(), value);
            touched += 1;
        }

        tracing::debug!("Hover updated {} of {} series", touched, events.len());
    }

    pub fn value(&self, point_id: &str) -> Option<&TooltipValue> {
        self.snapshot.as_ref()?.get(point_id)
    }

    /// Build the cross-track payload for the given assets, `None` before the first hover.
    pub fn payload(&self, chart_id: &str, assets: &[Asset]) -> Option<TooltipPayload> {
        let snapshot = self.snapshot.as_ref()?;
        let mut groups: Vec<TooltipGroup> = Vec::new();

        for asset in assets {
            let hovered = snapshot.get(&asset.point_id);
            let entry = TooltipEntry {
                name: asset.name.clone(),
                asset_name: asset.twin_name.clone(),
                unit: asset.unit().map(str::to_string),
                point_id: asset.point_id.clone(),
                item: hovered.map(|v| v.data.clone()).unwrap_or_default(),
                color: asset.color.clone(),
                has_no_data: hovered.map(|v| v.has_no_data),
                graph_type: asset.graph_type(),
                value_map: asset.value_map().cloned(),
                time: hovered.map(|v| v.time),
            };

            // Most recently added entry first within its group.
            match groups.iter_mut().find(|g| g.asset_id == asset.asset_id) {
                Some(group) => group.entries.insert(0, entry),
                None => groups.push(TooltipGroup {
                    asset_id: asset.asset_id.clone(),
                    entries: vec![entry],
                }),
            }
        }

        Some(TooltipPayload {
            region_id: tooltip_region_id(chart_id),
            groups,
        })
    }
}

fn has_no_data(event: &AxisHoverEvent) -> bool {
    let index = match event.series_type {
        SeriesType::Custom => 3,
        SeriesType::Line | SeriesType::Other => 1,
    };
    matches!(event.value.get(index), Some(Value::String(s)) if s == NO_DATA)
}
