// Shared pan/zoom window
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Percentage range of the full time domain currently in view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub start: f64,
    pub end: f64,
}

impl ZoomWindow {
    pub const FULL: ZoomWindow = ZoomWindow {
        start: 0.0,
        end: 100.0,
    };

    /// Clamp into `[0, 100]` and order the bounds. NaN is rejected.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if start.is_nan() || end.is_nan() {
            return Err(ChartError::InvalidZoomWindow { start, end });
        }
        let start = start.clamp(0.0, 100.0);
        let end = end.clamp(0.0, 100.0);
        Ok(if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        })
    }
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self::FULL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ZoomRange {
    pub start: f64,
    pub end: f64,
}

/// Data zoom event emitted by the rendering engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataZoomEvent {
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default)]
    pub batch: Option<Vec<ZoomRange>>,
}

impl DataZoomEvent {
    /// The window this event asks for: the first batch entry wins over the event's own bounds.
    pub fn requested(&self) -> Result<ZoomWindow> {
        if let Some(first) = self.batch.as_ref().and_then(|batch| batch.first()) {
            return ZoomWindow::new(first.start, first.end);
        }
        ZoomWindow::new(
            self.start.unwrap_or(ZoomWindow::FULL.start),
            self.end.unwrap_or(ZoomWindow::FULL.end),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_window_is_clamped_and_ordered() {
        assert_eq!(
            ZoomWindow::new(-5.0, 120.0).unwrap(),
            ZoomWindow::FULL
        );
        assert_eq!(
            ZoomWindow::new(70.0, 30.0).unwrap(),
            ZoomWindow {
                start: 30.0,
                end: 70.0
            }
        );
        assert!(ZoomWindow::new(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_batch_first_element_wins() {
        let event: DataZoomEvent = serde_json::from_value(json!({
            "start": 1.0,
            "end": 2.0,
            "batch": [{ "start": 10.0, "end": 20.0 }, { "start": 30.0, "end": 40.0 }],
        }))
        .unwrap();

        assert_eq!(
            event.requested().unwrap(),
            ZoomWindow {
                start: 10.0,
                end: 20.0
            }
        );
    }

    #[test]
    fn test_empty_batch_falls_back_to_bounds() {
        let event: DataZoomEvent =
            serde_json::from_value(json!({ "start": 25.0, "end": 75.0, "batch": [] })).unwrap();

        assert_eq!(
            event.requested().unwrap(),
            ZoomWindow {
                start: 25.0,
                end: 75.0
            }
        );
    }
}
