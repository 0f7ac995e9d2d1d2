// Sensor asset domain model
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ChartError, Result};

/// Sentinel the upstream query layer writes in place of a missing value.
pub const NO_DATA: &str = "-";

/// Integer state code (as a decimal string) to display label.
pub type ValueMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    Binary,
    #[serde(alias = "multiState")]
    Multistate,
    Analog,
}

impl GraphType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphType::Binary => "binary",
            GraphType::Multistate => "multistate",
            GraphType::Analog => "analog",
        }
    }
}

/// A time coordinate as delivered upstream: epoch milliseconds or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Millis(i64),
    Text(String),
}

impl TimeValue {
    pub fn to_millis(&self) -> Option<i64> {
        match self {
            TimeValue::Millis(ms) => Some(*ms),
            TimeValue::Text(text) => parse_time_millis(text),
        }
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        TimeValue::Text(text.to_string())
    }
}

/// Parse an upstream time string into epoch milliseconds (naive times are UTC).
pub fn parse_time_millis(text: &str) -> Option<i64> {
    if let Ok(ms) = text.parse::<i64>() {
        return Some(ms);
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.timestamp_millis());
    }
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// A cell value: a number, or the no-data sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Number(f64),
    NoData,
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, CellValue::NoData)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(value) => serializer.serialize_f64(*value),
            CellValue::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CellVisitor;

        impl<'de> Visitor<'de> for CellVisitor {
            type Value = CellValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a number or the \"{}\" sentinel", NO_DATA)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<CellValue, E> {
                Ok(CellValue::Number(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<CellValue, E> {
                Ok(CellValue::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<CellValue, E> {
                Ok(CellValue::Number(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<CellValue, E> {
                if v == NO_DATA {
                    return Ok(CellValue::NoData);
                }
                match v.trim().parse::<f64>() {
                    Ok(value) => Ok(CellValue::Number(value)),
                    Err(_) => {
                        tracing::warn!("Unreadable cell value {:?}, rendering as no data", v);
                        Ok(CellValue::NoData)
                    }
                }
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<CellValue, E> {
                Ok(CellValue::NoData)
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<CellValue, E> {
                Ok(CellValue::NoData)
            }
        }

        deserializer.deserialize_any(CellVisitor)
    }
}

/// One constant-value interval of a binary or multistate stream.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalRow {
    pub row: u32,
    pub start: TimeValue,
    pub end: TimeValue,
    pub value: CellValue,
    pub meta: Option<Value>,
}

impl IntervalRow {
    pub fn new(row: u32, start: impl Into<TimeValue>, end: impl Into<TimeValue>, value: CellValue) -> Self {
        Self {
            row,
            start: start.into(),
            end: end.into(),
            value,
            meta: None,
        }
    }
}

impl Serialize for IntervalRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.meta.is_some() { 5 } else { 4 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.row)?;
        seq.serialize_element(&self.start)?;
        seq.serialize_element(&self.end)?;
        seq.serialize_element(&self.value)?;
        if let Some(meta) = &self.meta {
            seq.serialize_element(meta)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for IntervalRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = IntervalRow;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an interval tuple [row, start, end, value?, meta?]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<IntervalRow, A::Error> {
                let row = seq
                    .next_element::<u32>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let start = seq
                    .next_element::<TimeValue>()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let end = seq
                    .next_element::<TimeValue>()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;
                let value = seq.next_element::<CellValue>()?.unwrap_or(CellValue::NoData);
                let meta = seq.next_element::<Option<Value>>()?.flatten();
                while seq.next_element::<IgnoredAny>()?.is_some() {}

                Ok(IntervalRow {
                    row,
                    start,
                    end,
                    value,
                    meta,
                })
            }
        }

        deserializer.deserialize_seq(RowVisitor)
    }
}

/// One sample of an analog stream.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub time: TimeValue,
    pub value: CellValue,
    pub confidence: Option<f64>,
    pub lower: Option<f64>,
    pub meta: Option<Value>,
}

impl LinePoint {
    pub fn new(time: impl Into<TimeValue>, value: CellValue) -> Self {
        Self {
            time: time.into(),
            value,
            confidence: None,
            lower: None,
            meta: None,
        }
    }

    pub fn with_band(mut self, lower: f64, confidence: f64) -> Self {
        self.lower = Some(lower);
        self.confidence = Some(confidence);
        self
    }
}

impl Serialize for LinePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Positional tuple: emit up to the last present field, nulls in between.
        let len = if self.meta.is_some() {
            5
        } else if self.lower.is_some() {
            4
        } else if self.confidence.is_some() {
            3
        } else {
            2
        };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.time)?;
        seq.serialize_element(&self.value)?;
        if len > 2 {
            seq.serialize_element(&self.confidence)?;
        }
        if len > 3 {
            seq.serialize_element(&self.lower)?;
        }
        if let Some(meta) = &self.meta {
            seq.serialize_element(meta)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for LinePoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PointVisitor;

        impl<'de> Visitor<'de> for PointVisitor {
            type Value = LinePoint;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a line tuple [time, value, confidence?, lower?, meta?]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<LinePoint, A::Error> {
                let time = seq
                    .next_element::<TimeValue>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let value = seq.next_element::<CellValue>()?.unwrap_or(CellValue::NoData);
                let confidence = seq.next_element::<CellValue>()?.and_then(|c| c.as_number());
                let lower = seq.next_element::<CellValue>()?.and_then(|c| c.as_number());
                let meta = seq.next_element::<Option<Value>>()?.flatten();
                while seq.next_element::<IgnoredAny>()?.is_some() {}

                Ok(LinePoint {
                    time,
                    value,
                    confidence,
                    lower,
                    meta,
                })
            }
        }

        deserializer.deserialize_seq(PointVisitor)
    }
}

/// The three partitions an analog stream arrives in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LineData {
    #[serde(default)]
    pub valid: Vec<LinePoint>,
    #[serde(default, rename = "null")]
    pub nulls: Vec<LinePoint>,
    #[serde(default, rename = "isOutOfRange")]
    pub out_of_range: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadedRegion {
    pub start: TimeValue,
    pub end: TimeValue,
    pub color: String,
    #[serde(default)]
    pub boundary_gap: bool,
}

/// Graph-type specific payload of an asset.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSeries {
    Binary {
        rows: Vec<IntervalRow>,
    },
    Multistate {
        value_map: Option<ValueMap>,
        rows: Vec<IntervalRow>,
    },
    Analog {
        unit: Option<String>,
        lines: LineData,
    },
}

/// One sensor's identity, styling and time-series payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "AssetRecord")]
pub struct Asset {
    pub name: String,
    pub point_id: String,
    pub asset_id: String,
    pub twin_name: String,
    pub color: String,
    pub shaded_regions: Vec<ShadedRegion>,
    pub series: AssetSeries,
}

impl Asset {
    pub fn graph_type(&self) -> GraphType {
        match self.series {
            AssetSeries::Binary { .. } => GraphType::Binary,
            AssetSeries::Multistate { .. } => GraphType::Multistate,
            AssetSeries::Analog { .. } => GraphType::Analog,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match &self.series {
            AssetSeries::Analog { unit, .. } => unit.as_deref(),
            AssetSeries::Binary { .. } | AssetSeries::Multistate { .. } => None,
        }
    }

    pub fn value_map(&self) -> Option<&ValueMap> {
        match &self.series {
            AssetSeries::Multistate { value_map, .. } => value_map.as_ref(),
            AssetSeries::Binary { .. } | AssetSeries::Analog { .. } => None,
        }
    }
}

/// Wire shape of an asset before its data is interpreted by graph type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetRecord {
    name: String,
    point_id: String,
    asset_id: String,
    twin_name: String,
    graph_type: GraphType,
    #[serde(default)]
    unit: Option<String>,
    color: String,
    #[serde(default)]
    value_map: Option<ValueMap>,
    #[serde(default)]
    shaded_regions: Vec<ShadedRegion>,
    data: Value,
}

impl TryFrom<AssetRecord> for Asset {
    type Error = ChartError;

    fn try_from(record: AssetRecord) -> Result<Self> {
        let AssetRecord {
            name,
            point_id,
            asset_id,
            twin_name,
            graph_type,
            unit,
            color,
            value_map,
            shaded_regions,
            data,
        } = record;

        let invalid = |e: serde_json::Error| ChartError::InvalidAsset {
            point_id: point_id.clone(),
            reason: e.to_string(),
        };

        let series = match graph_type {
            GraphType::Binary => AssetSeries::Binary {
                rows: serde_json::from_value(data).map_err(invalid)?,
            },
            GraphType::Multistate => AssetSeries::Multistate {
                value_map,
                rows: serde_json::from_value(data).map_err(invalid)?,
            },
            GraphType::Analog => AssetSeries::Analog {
                unit,
                lines: serde_json::from_value(data).map_err(invalid)?,
            },
        };

        Ok(Asset {
            name,
            point_id,
            asset_id,
            twin_name,
            color,
            shaded_regions,
            series,
        })
    }
}

/// Sorted state codes of a multistate asset, used to derive cell opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTable {
    codes: Vec<i64>,
}

impl StateTable {
    /// Build the table, failing when the map is absent or empty, or when a key
    /// is not an integer or names the same code as another key (`"1"` and `"01"`).
    pub fn from_value_map(point_id: &str, value_map: Option<&ValueMap>) -> Result<Self> {
        let value_map = value_map
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ChartError::MissingValueMap {
                point_id: point_id.to_string(),
            })?;

        let invalid_key = |key: &String| ChartError::InvalidValueMapKey {
            point_id: point_id.to_string(),
            key: key.clone(),
        };

        let mut codes = Vec::with_capacity(value_map.len());
        for key in value_map.keys() {
            let code = key.trim().parse::<i64>().map_err(|_| invalid_key(key))?;
            if codes.contains(&code) {
                return Err(invalid_key(key));
            }
            codes.push(code);
        }
        codes.sort_unstable();

        Ok(Self { codes })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[i64] {
        &self.codes
    }

    /// 1-based rank of a code, `None` when the code is not in the map.
    pub fn rank(&self, code: f64) -> Option<usize> {
        if code.fract() != 0.0 {
            return None;
        }
        self.codes
            .binary_search(&(code as i64))
            .ok()
            .map(|index| index + 1)
    }

    pub fn opacity(&self, code: f64) -> Option<f64> {
        self.rank(code)
            .map(|rank| round_hundredths(rank as f64 / self.codes.len() as f64))
    }
}

pub(crate) fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    pub fn binary(point_id: &str) -> Asset {
        serde_json::from_value(json!({
            "name": format!("{point_id} status"),
            "pointId": point_id,
            "assetId": "ahu-1",
            "twinName": "AHU 1",
            "graphType": "binary",
            "color": "#7b9ce1",
            "data": [
                [0, 1577797200000i64, 1577798100000i64, 0],
                [0, 1577798100000i64, 1577799000000i64, 1, { "onCount": 3 }],
                [0, 1577808000000i64, 1577808900000i64, "-"],
            ],
        }))
        .unwrap()
    }

    pub fn multistate(point_id: &str) -> Asset {
        serde_json::from_value(json!({
            "name": format!("{point_id} mode"),
            "pointId": point_id,
            "assetId": "ahu-1",
            "twinName": "AHU 1",
            "graphType": "multistate",
            "color": "#e17b7b",
            "valueMap": { "1": "Enable", "2": "Shutdown" },
            "data": [
                [0, 1577797200000i64, 1577798100000i64, 1],
                [0, 1577798100000i64, 1577799000000i64, 2],
            ],
        }))
        .unwrap()
    }

    pub fn analog(point_id: &str, unit: &str) -> Asset {
        serde_json::from_value(json!({
            "name": format!("{point_id} temp"),
            "pointId": point_id,
            "assetId": "ahu-2",
            "twinName": "AHU 2",
            "graphType": "analog",
            "unit": unit,
            "color": "#3ba272",
            "data": {
                "valid": [
                    ["2020-01-01", 1, 1.5, 0.5],
                    ["2020-01-02", 0],
                    ["2020-01-03", 0.4, null, null, { "minimum": 0.1 }],
                ],
                "null": [["2020-01-04", "-"]],
                "isOutOfRange": [["2020-01-05", 42]],
            },
        }))
        .unwrap()
    }
}
