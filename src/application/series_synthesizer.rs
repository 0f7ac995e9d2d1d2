// Series synthesizer - Per-asset series, dataset partitions and track axes
use std::collections::HashMap;

use crate::domain::asset::{
    Asset, AssetSeries, CellValue, IntervalRow, LineData, LinePoint, ShadedRegion, StateTable, NO_DATA,
};
use crate::domain::chart_option::{
    AreaStyle, AxisLabel, AxisLine, AxisPointer, AxisType, CustomSeries, Dataset, DatasetSource, Encode,
    ItemStyle, Label, LineSeries, LineStyle, MarkArea, MarkAreaEdge, MarkAreaStyle, OpacityStop,
    RectRenderer, Series, SplitLine, TextStyle, XAxis, YAxis,
};
use crate::domain::grouping::{GroupKey, Grouping, GroupingMode};
use crate::domain::legend::LegendSelection;
use crate::error::{ChartError, Result};
use crate::infrastructure::config::ChartSettings;

/// Prefix shared by the ids of every primary series.
pub const PRIMARY_PREFIX: &str = "primary";

const INTERVAL_DIMENSIONS: &[&str] = &["row", "start", "end", "value"];
const LINE_DIMENSIONS: &[&str] = &["time", "value", "confidence", "lower"];
const BINARY_OFF_OPACITY: f64 = 0.5;
const CONFIDENCE_AREA_OPACITY: f64 = 0.3;

/// Role of a synthesized series relative to its asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesRole {
    PrimaryBinary,
    PrimaryMultistate,
    PrimaryLine,
    LowerBound,
    UpperBound,
    NullPoints,
    OutOfRangePoints,
}

impl SeriesRole {
    pub fn id(&self, point_id: &str) -> String {
        let prefix = match self {
            SeriesRole::PrimaryBinary => "primary-binary",
            SeriesRole::PrimaryMultistate => "primary-multistate",
            SeriesRole::PrimaryLine => PRIMARY_PREFIX,
            SeriesRole::LowerBound => "lower-bound",
            SeriesRole::UpperBound => "upper-bound",
            SeriesRole::NullPoints => "nullPoints",
            SeriesRole::OutOfRangePoints => "outOfRangePoints",
        };
        format!("{prefix}_{point_id}")
    }

    pub fn name(&self, asset_name: &str) -> String {
        match self {
            SeriesRole::PrimaryBinary | SeriesRole::PrimaryMultistate | SeriesRole::PrimaryLine => {
                asset_name.to_string()
            }
            SeriesRole::LowerBound => format!("{asset_name}-lower-bound"),
            SeriesRole::UpperBound => format!("{asset_name}-upper-bound"),
            SeriesRole::NullPoints => format!("{asset_name}-nulls"),
            SeriesRole::OutOfRangePoints => format!("{asset_name}-out-of-range"),
        }
    }
}

/// Point id encoded in a series id: everything after the first `_`.
pub fn point_id_of(series_id: &str) -> Option<&str> {
    series_id
        .split_once('_')
        .map(|(_, point_id)| point_id)
        .filter(|point_id| !point_id.is_empty())
}

/// Shaded regions requested at chart level.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shading<'a> {
    pub regions: &'a [ShadedRegion],
    pub boundary_gap: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub series: Vec<Series>,
    pub dataset: Vec<Dataset>,
    pub x_axis: Vec<XAxis>,
    pub y_axis: Vec<YAxis>,
}

/// Validate every asset, then build series, datasets and one x/y axis pair per track.
///
/// Validation covers the whole list before anything is produced, so a bad
/// multistate asset fails the render instead of leaving a partial chart.
pub fn synthesize(
    assets: &[Asset],
    grouping: &Grouping<'_>,
    mode: GroupingMode,
    shading: Shading<'_>,
    legend: &LegendSelection,
    settings: &ChartSettings,
) -> Result<Synthesis> {
    let state_tables = validate(assets)?;
    let mark_areas = shaded_region_owners(grouping, shading, legend, settings);

    let mut series = Vec::new();
    let mut dataset = Vec::new();

    for asset in assets {
        let key = GroupKey::for_asset(asset, mode);
        let axis_index = grouping.index_of(&key).ok_or_else(|| ChartError::InvalidAsset {
            point_id: asset.point_id.clone(),
            reason: format!("asset is not part of track {key}"),
        })?;
        let mark_area = mark_areas.get(asset.point_id.as_str()).cloned();
        let dataset_index = dataset.len();

        match &asset.series {
            AssetSeries::Binary { rows } => {
                series.push(interval_series(
                    asset,
                    SeriesRole::PrimaryBinary,
                    binary_renderer(),
                    axis_index,
                    dataset_index,
                    mark_area,
                ));
                dataset.push(interval_dataset(rows));
            }
            AssetSeries::Multistate { rows, .. } => {
                let table = state_tables.get(asset.point_id.as_str()).ok_or_else(|| {
                    ChartError::MissingValueMap {
                        point_id: asset.point_id.clone(),
                    }
                })?;
                series.push(interval_series(
                    asset,
                    SeriesRole::PrimaryMultistate,
                    multistate_renderer(table),
                    axis_index,
                    dataset_index,
                    mark_area,
                ));
                dataset.push(interval_dataset(rows));
            }
            AssetSeries::Analog { lines, .. } => {
                series.extend(analog_series(asset, axis_index, dataset_index, mark_area, settings));
                dataset.extend(analog_datasets(&asset.point_id, lines));
            }
        }
    }

    let x_axis = (0..grouping.len()).map(XAxis::time).collect();
    let y_axis = grouping
        .groups()
        .iter()
        .enumerate()
        .map(|(index, (key, members))| track_y_axis(index, key, members, settings))
        .collect();

    tracing::debug!(
        "Synthesized {} series over {} datasets for {} tracks",
        series.len(),
        dataset.len(),
        grouping.len()
    );

    Ok(Synthesis {
        series,
        dataset,
        x_axis,
        y_axis,
    })
}

/// Fail fast on multistate assets whose value map cannot label their rows.
fn validate(assets: &[Asset]) -> Result<HashMap<&str, StateTable>> {
    let mut tables = HashMap::new();

    for asset in assets {
        let AssetSeries::Multistate { value_map, rows } = &asset.series else {
            continue;
        };
        let table = StateTable::from_value_map(&asset.point_id, value_map.as_ref())?;
        if let Some(code) = rows
            .iter()
            .filter_map(|row| row.value.as_number())
            .find(|code| table.rank(*code).is_none())
        {
            return Err(ChartError::UnknownStateCode {
                point_id: asset.point_id.clone(),
                code,
            });
        }
        tables.insert(asset.point_id.as_str(), table);
    }

    Ok(tables)
}

/// Pick the single asset per track that carries the shaded regions: the first member whose
/// legend entry is visible, so toggling the carrier off hands the regions to the next one.
fn shaded_region_owners<'a>(
    grouping: &Grouping<'a>,
    shading: Shading<'_>,
    legend: &LegendSelection,
    settings: &ChartSettings,
) -> HashMap<&'a str, MarkArea> {
    let mut owners = HashMap::new();

    for (_, members) in grouping.groups() {
        let regions: Vec<&ShadedRegion> = shading
            .regions
            .iter()
            .chain(members.iter().flat_map(|asset| asset.shaded_regions.iter()))
            .collect();
        if regions.is_empty() {
            continue;
        }

        let owner: Option<&'a Asset> = members
            .iter()
            .copied()
            .find(|asset| legend.is_visible(&asset.name))
            .or_else(|| members.first().copied());
        if let Some(owner) = owner {
            owners.insert(
                owner.point_id.as_str(),
                mark_area(&regions, shading.boundary_gap, settings),
            );
        }
    }

    owners
}

fn mark_area(regions: &[&ShadedRegion], boundary_gap: bool, settings: &ChartSettings) -> MarkArea {
    let theme = &settings.theme;
    let data = regions
        .iter()
        .map(|region| {
            let color = if region.color == "red" {
                theme.negative_region.clone()
            } else {
                theme.secondary_region.clone()
            };
            let dashed = boundary_gap || region.boundary_gap;
            let style = MarkAreaStyle {
                color,
                opacity: 1.0,
                border_type: dashed.then_some("dashed"),
                border_width: dashed.then_some(4.0),
                border_color: dashed.then(|| theme.boundary_border.clone()),
            };
            [
                MarkAreaEdge {
                    x_axis: region.start.clone(),
                    item_style: style.clone(),
                },
                MarkAreaEdge {
                    x_axis: region.end.clone(),
                    item_style: style,
                },
            ]
        })
        .collect();

    MarkArea { data }
}

fn binary_renderer() -> RectRenderer {
    RectRenderer {
        kind: "interval-rect",
        opacity: vec![
            OpacityStop {
                value: 0.0,
                opacity: BINARY_OFF_OPACITY,
            },
            OpacityStop {
                value: 1.0,
                opacity: 1.0,
            },
        ],
        default_opacity: 1.0,
        no_data: NO_DATA,
    }
}

fn multistate_renderer(table: &StateTable) -> RectRenderer {
    let opacity = table
        .codes()
        .iter()
        .filter_map(|&code| {
            table.opacity(code as f64).map(|opacity| OpacityStop {
                value: code as f64,
                opacity,
            })
        })
        .collect();

    RectRenderer {
        kind: "interval-rect",
        opacity,
        default_opacity: 1.0,
        no_data: NO_DATA,
    }
}

fn interval_series(
    asset: &Asset,
    role: SeriesRole,
    render_item: RectRenderer,
    axis_index: usize,
    dataset_index: usize,
    mark_area: Option<MarkArea>,
) -> Series {
    Series::Custom(CustomSeries {
        id: role.id(&asset.point_id),
        name: role.name(&asset.name),
        clip: true,
        encode: Encode {
            x: Some(vec!["start", "end"]),
            y: Some("row"),
            value: Some("value"),
        },
        render_item,
        x_axis_index: axis_index,
        y_axis_index: axis_index,
        dataset_index,
        label: Label { show: false },
        item_style: ItemStyle {
            color: asset.color.clone(),
        },
        zlevel: (role == SeriesRole::PrimaryBinary).then_some(-1),
        mark_area,
    })
}

fn interval_dataset(rows: &[IntervalRow]) -> Dataset {
    Dataset {
        name: None,
        dimensions: INTERVAL_DIMENSIONS,
        source: DatasetSource::Intervals(rows.to_vec()),
    }
}

fn analog_datasets(point_id: &str, lines: &LineData) -> [Dataset; 3] {
    let partition = |suffix: &str, points: &[LinePoint]| Dataset {
        name: Some(format!("{point_id}-{suffix}")),
        dimensions: LINE_DIMENSIONS,
        source: DatasetSource::Points(points.to_vec()),
    };

    [
        partition("valid", &lines.valid),
        partition("nulls", &lines.nulls),
        partition("isOutOfRange", &lines.out_of_range),
    ]
}

fn analog_series(
    asset: &Asset,
    axis_index: usize,
    dataset_index: usize,
    mark_area: Option<MarkArea>,
    settings: &ChartSettings,
) -> [Series; 5] {
    let stack = format!("confidence-band-{}", asset.point_id);
    let line = |role: SeriesRole, dataset_index: usize| LineSeries {
        id: role.id(&asset.point_id),
        name: role.name(&asset.name),
        x_axis_index: axis_index,
        y_axis_index: axis_index,
        dataset_index,
        encode: None,
        line_style: None,
        area_style: None,
        item_style: None,
        label: None,
        stack: None,
        symbol: None,
        show_symbol: false,
        mark_area: None,
    };
    let hidden_line = || LineStyle {
        opacity: Some(0.0),
        ..LineStyle::default()
    };

    let lower = LineSeries {
        encode: Some(Encode {
            x: Some(vec!["time"]),
            y: Some("lower"),
            value: None,
        }),
        line_style: Some(hidden_line()),
        stack: Some(stack.clone()),
        symbol: Some("none"),
        ..line(SeriesRole::LowerBound, dataset_index)
    };
    let upper = LineSeries {
        encode: Some(Encode {
            x: Some(vec!["time"]),
            y: Some("confidence"),
            value: None,
        }),
        line_style: Some(hidden_line()),
        area_style: Some(AreaStyle {
            color: asset.color.clone(),
            opacity: CONFIDENCE_AREA_OPACITY,
        }),
        stack: Some(stack),
        symbol: Some("none"),
        ..line(SeriesRole::UpperBound, dataset_index)
    };
    let primary = LineSeries {
        encode: Some(Encode {
            x: Some(vec!["time"]),
            y: Some("value"),
            value: None,
        }),
        item_style: Some(ItemStyle {
            color: asset.color.clone(),
        }),
        label: Some(Label { show: false }),
        mark_area,
        ..line(SeriesRole::PrimaryLine, dataset_index)
    };
    let nulls = LineSeries {
        encode: Some(Encode {
            x: Some(vec!["time"]),
            y: Some("value"),
            value: None,
        }),
        line_style: Some(LineStyle {
            color: Some(settings.theme.overlay_line.clone()),
            kind: Some("dashed"),
            ..LineStyle::default()
        }),
        symbol: Some("none"),
        ..line(SeriesRole::NullPoints, dataset_index + 1)
    };
    let out_of_range = LineSeries {
        encode: Some(Encode {
            x: Some(vec!["time"]),
            y: Some("value"),
            value: None,
        }),
        line_style: Some(LineStyle {
            color: Some(settings.theme.overlay_line.clone()),
            ..LineStyle::default()
        }),
        ..line(SeriesRole::OutOfRangePoints, dataset_index + 2)
    };

    [
        Series::Line(lower),
        Series::Line(upper),
        Series::Line(primary),
        Series::Line(nulls),
        Series::Line(out_of_range),
    ]
}

fn track_y_axis(index: usize, key: &GroupKey, members: &[&Asset], settings: &ChartSettings) -> YAxis {
    let theme = &settings.theme;
    let category = |formatter: &'static str| YAxis {
        kind: AxisType::Category,
        grid_index: index,
        name: None,
        name_gap: None,
        name_location: None,
        name_text_style: None,
        min: None,
        max: None,
        split_number: None,
        axis_pointer: AxisPointer {
            show: false,
            snap: None,
        },
        split_line: SplitLine {
            line_style: LineStyle {
                color: Some(theme.border.clone()),
                ..LineStyle::default()
            },
        },
        axis_label: AxisLabel {
            formatter: Some(formatter),
            color: theme.border.clone(),
        },
        axis_line: Some(AxisLine { on_zero: false }),
    };

    match key {
        GroupKey::Binary => category("bool"),
        GroupKey::Multistate => category("state"),
        GroupKey::Analog { unit } => YAxis {
            kind: AxisType::Value,
            name: unit.clone().or_else(|| shared_unit_label(members)),
            name_gap: Some(settings.y_axis_name_gap),
            name_location: Some("middle"),
            name_text_style: Some(TextStyle {
                color: theme.muted.clone(),
            }),
            min: Some("dataMin"),
            max: Some("dataMax"),
            split_number: Some(3),
            axis_pointer: AxisPointer {
                show: true,
                snap: Some(false),
            },
            axis_label: AxisLabel {
                formatter: None,
                color: theme.border.clone(),
            },
            axis_line: None,
            ..category("")
        },
    }
}

/// Distinct units of an overlaid analog track, in first-seen order.
fn shared_unit_label(members: &[&Asset]) -> Option<String> {
    let mut units: Vec<&str> = Vec::new();
    for unit in members.iter().filter_map(|asset| asset.unit()) {
        if !units.contains(&unit) {
            units.push(unit);
        }
    }
    (!units.is_empty()).then(|| units.join(" / "))
}

/// Whether a row is drawn at all by the rectangle renderer.
pub fn is_drawn(value: &CellValue) -> bool {
    !value.is_no_data()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::fixtures;
    use crate::domain::grouping::group;
    use serde_json::json;

    fn run(assets: &[Asset], mode: GroupingMode, shading: Shading<'_>, legend: &LegendSelection) -> Result<Synthesis> {
        let grouping = group(assets, mode);
        synthesize(assets, &grouping, mode, shading, legend, &ChartSettings::default())
    }

    fn find<'a>(synthesis: &'a Synthesis, id: &str) -> &'a Series {
        synthesis
            .series
            .iter()
            .find(|s| s.id() == id)
            .unwrap_or_else(|| panic!("series {id} missing"))
    }

    #[test]
    fn test_analog_asset_yields_five_cooperating_series() {
        let assets = vec![fixtures::binary("b1"), fixtures::analog("t1", "degF")];
        let synthesis = run(&assets, GroupingMode::Default, Shading::default(), &LegendSelection::default()).unwrap();

        let ids: Vec<&str> = synthesis.series.iter().map(Series::id).collect();
        assert_eq!(
            ids,
            vec![
                "primary-binary_b1",
                "lower-bound_t1",
                "upper-bound_t1",
                "primary_t1",
                "nullPoints_t1",
                "outOfRangePoints_t1",
            ]
        );
        // Analog track is the second group; all five share its axis.
        assert!(synthesis.series[1..].iter().all(|s| s.axis_index() == 1));
        assert_eq!(synthesis.dataset.len(), 4);
        assert_eq!(find(&synthesis, "primary_t1").dataset_index(), 1);
        assert_eq!(find(&synthesis, "nullPoints_t1").dataset_index(), 2);
        assert_eq!(find(&synthesis, "outOfRangePoints_t1").dataset_index(), 3);
        assert_eq!(synthesis.x_axis.len(), 2);
        assert_eq!(synthesis.y_axis[1].name.as_deref(), Some("degF"));
    }

    #[test]
    fn test_confidence_band_is_stacked_per_point() {
        let assets = vec![fixtures::analog("t1", "degF")];
        let synthesis = run(&assets, GroupingMode::Default, Shading::default(), &LegendSelection::default()).unwrap();

        let json = serde_json::to_value(&synthesis.series).unwrap();
        assert_eq!(json[0]["stack"], "confidence-band-t1");
        assert_eq!(json[0]["lineStyle"]["opacity"], 0.0);
        assert_eq!(json[1]["stack"], "confidence-band-t1");
        assert_eq!(json[1]["areaStyle"]["opacity"], 0.3);
        assert_eq!(json[1]["name"], "t1 temp-upper-bound");
    }

    #[test]
    fn test_null_point_renders_only_on_dashed_overlay() {
        let assets = vec![fixtures::analog("t1", "degF")];
        let synthesis = run(&assets, GroupingMode::Default, Shading::default(), &LegendSelection::default()).unwrap();
        let primary = find(&synthesis, "primary_t1");
        let nulls = find(&synthesis, "nullPoints_t1");
        let Series::Line(null_line) = nulls else {
            panic!("null overlay must be a line");
        };
        assert_eq!(null_line.line_style.as_ref().and_then(|s| s.kind), Some("dashed"));

        let times = |index: usize| -> Vec<serde_json::Value> {
            let DatasetSource::Points(points) = &synthesis.dataset[index].source else {
                panic!("expected point partition");
            };
            points.iter().map(|p| serde_json::to_value(&p.time).unwrap()).collect()
        };
        assert!(!times(primary.dataset_index()).contains(&json!("2020-01-04")));
        assert!(times(nulls.dataset_index()).contains(&json!("2020-01-04")));
    }

    #[test]
    fn test_same_unit_assets_share_axis_index() {
        let assets = vec![
            fixtures::analog("t1", "degF"),
            fixtures::analog("k1", "kW"),
            fixtures::analog("t2", "degF"),
        ];
        let synthesis = run(&assets, GroupingMode::Stacked, Shading::default(), &LegendSelection::default()).unwrap();

        assert_eq!(find(&synthesis, "primary_t1").axis_index(), 0);
        assert_eq!(find(&synthesis, "primary_k1").axis_index(), 1);
        assert_eq!(find(&synthesis, "primary_t2").axis_index(), 0);

        let shared = run(&assets, GroupingMode::Shared, Shading::default(), &LegendSelection::default()).unwrap();
        assert!(shared.series.iter().all(|s| s.axis_index() == 0));
        assert_eq!(shared.y_axis[0].name.as_deref(), Some("degF / kW"));
    }

    #[test]
    fn test_multistate_without_value_map_fails_before_any_series() {
        let mut broken = fixtures::multistate("m1");
        if let AssetSeries::Multistate { value_map, .. } = &mut broken.series {
            *value_map = None;
        }
        let assets = vec![fixtures::binary("b1"), broken];

        let err = run(&assets, GroupingMode::Default, Shading::default(), &LegendSelection::default()).unwrap_err();
        assert_eq!(
            err,
            ChartError::MissingValueMap {
                point_id: "m1".to_string()
            }
        );
    }

    #[test]
    fn test_multistate_code_outside_value_map_is_rejected() {
        let mut asset = fixtures::multistate("m1");
        if let AssetSeries::Multistate { rows, .. } = &mut asset.series {
            rows.push(IntervalRow::new(0, "2020-01-02", "2020-01-03", CellValue::Number(7.0)));
            rows.push(IntervalRow::new(0, "2020-01-03", "2020-01-04", CellValue::NoData));
        }

        let err = run(&[asset], GroupingMode::Default, Shading::default(), &LegendSelection::default()).unwrap_err();
        assert!(matches!(err, ChartError::UnknownStateCode { code, .. } if code == 7.0));
    }

    #[test]
    fn test_multistate_opacity_by_rank() {
        let assets = vec![fixtures::multistate("m1")];
        let synthesis = run(&assets, GroupingMode::Default, Shading::default(), &LegendSelection::default()).unwrap();

        let Series::Custom(series) = find(&synthesis, "primary-multistate_m1") else {
            panic!("multistate must be a custom series");
        };
        assert_eq!(series.render_item.opacity_for(2.0), 1.0);
        assert_eq!(series.render_item.opacity_for(1.0), 0.5);
        assert_eq!(series.zlevel, None);
    }

    #[test]
    fn test_binary_opacity_and_sentinel() {
        let assets = vec![fixtures::binary("b1")];
        let synthesis = run(&assets, GroupingMode::Default, Shading::default(), &LegendSelection::default()).unwrap();

        let Series::Custom(series) = &synthesis.series[0] else {
            panic!("binary must be a custom series");
        };
        assert_eq!(series.render_item.opacity_for(0.0), 0.5);
        assert_eq!(series.render_item.opacity_for(1.0), 1.0);
        assert_eq!(series.render_item.no_data, "-");
        assert_eq!(series.zlevel, Some(-1));
        assert!(!is_drawn(&CellValue::NoData));
    }

    #[test]
    fn test_shaded_region_moves_to_next_visible_asset() {
        let regions = vec![ShadedRegion {
            start: "2020-01-01".into(),
            end: "2020-01-02".into(),
            color: "red".to_string(),
            boundary_gap: false,
        }];
        let shading = Shading {
            regions: &regions,
            boundary_gap: false,
        };
        let assets = vec![fixtures::binary("b1"), fixtures::binary("b2"), fixtures::analog("t1", "degF")];

        let all_visible = run(&assets, GroupingMode::Default, shading, &LegendSelection::default()).unwrap();
        let carriers: Vec<&str> = all_visible
            .series
            .iter()
            .filter(|s| s.mark_area().is_some())
            .map(Series::id)
            .collect();
        assert_eq!(carriers, vec!["primary-binary_b1", "primary_t1"]);

        let b1_hidden = LegendSelection::new([("b1 status".to_string(), false)].into_iter().collect());
        let toggled = run(&assets, GroupingMode::Default, shading, &b1_hidden).unwrap();
        let carriers: Vec<&str> = toggled
            .series
            .iter()
            .filter(|s| s.mark_area().is_some())
            .map(Series::id)
            .collect();
        assert_eq!(carriers, vec!["primary-binary_b2", "primary_t1"]);

        let area = find(&toggled, "primary-binary_b2").mark_area().unwrap();
        assert_eq!(area.data[0][0].item_style.color, ChartSettings::default().theme.negative_region);
        assert_eq!(area.data[0][0].item_style.border_type, None);
    }

    #[test]
    fn test_boundary_gap_dashes_region_border() {
        let regions = vec![ShadedRegion {
            start: "2020-01-01".into(),
            end: "2020-01-02".into(),
            color: "purple".to_string(),
            boundary_gap: false,
        }];
        let shading = Shading {
            regions: &regions,
            boundary_gap: true,
        };
        let synthesis = run(&[fixtures::binary("b1")], GroupingMode::Default, shading, &LegendSelection::default()).unwrap();

        let style = &synthesis.series[0].mark_area().unwrap().data[0][1].item_style;
        assert_eq!(style.border_type, Some("dashed"));
        assert_eq!(style.border_width, Some(4.0));
        assert_eq!(style.color, ChartSettings::default().theme.secondary_region);
    }

    #[test]
    fn test_asset_level_regions_join_track_overlay() {
        let mut asset = fixtures::binary("b1");
        asset.shaded_regions.push(ShadedRegion {
            start: "2020-01-03".into(),
            end: "2020-01-04".into(),
            color: "red".to_string(),
            boundary_gap: true,
        });
        let synthesis = run(&[asset, fixtures::binary("b2")], GroupingMode::Default, Shading::default(), &LegendSelection::default()).unwrap();

        let area = synthesis.series[0].mark_area().unwrap();
        assert_eq!(area.data.len(), 1);
        assert_eq!(area.data[0][0].item_style.border_type, Some("dashed"));
        assert!(synthesis.series[1].mark_area().is_none());
    }

    #[test]
    fn test_point_id_of_series_id() {
        assert_eq!(point_id_of(&SeriesRole::PrimaryLine.id("t1")), Some("t1"));
        assert_eq!(point_id_of("primary-binary_b1"), Some("b1"));
        assert_eq!(point_id_of("primary_ahu_1_sat"), Some("ahu_1_sat"));
        assert_eq!(point_id_of("primary"), None);
    }
}
