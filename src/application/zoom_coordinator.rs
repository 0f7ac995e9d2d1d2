// Zoom coordinator - Dashboard-scoped pan/zoom window shared by every chart instance
use std::sync::{Arc, Weak};
use tokio::sync::watch;

use crate::domain::zoom::{DataZoomEvent, ZoomWindow};
use crate::error::{ChartError, Result};

/// Owner of the single zoom cell of a dashboard scope.
///
/// Dropping the coordinator discards the scope; handles given out earlier
/// then fail with [`ChartError::ZoomScopeInactive`].
#[derive(Debug)]
pub struct ZoomCoordinator {
    cell: Arc<watch::Sender<ZoomWindow>>,
}

impl ZoomCoordinator {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ZoomWindow::FULL);
        Self {
            cell: Arc::new(sender),
        }
    }

    pub fn handle(&self) -> ZoomHandle {
        ZoomHandle {
            cell: Arc::downgrade(&self.cell),
        }
    }

    pub fn zoom(&self) -> ZoomWindow {
        *self.cell.borrow()
    }

    pub fn set_zoom(&self, start: f64, end: f64) -> Result<ZoomWindow> {
        Ok(store(&self.cell, ZoomWindow::new(start, end)?))
    }

    pub fn reset(&self) -> ZoomWindow {
        store(&self.cell, ZoomWindow::FULL)
    }

    pub fn subscribe(&self) -> watch::Receiver<ZoomWindow> {
        self.cell.subscribe()
    }
}

impl Default for ZoomCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak view of a dashboard's zoom cell, injected into chart instances.
#[derive(Debug, Clone)]
pub struct ZoomHandle {
    cell: Weak<watch::Sender<ZoomWindow>>,
}

impl ZoomHandle {
    fn cell(&self) -> Result<Arc<watch::Sender<ZoomWindow>>> {
        self.cell.upgrade().ok_or(ChartError::ZoomScopeInactive)
    }

    pub fn is_active(&self) -> bool {
        self.cell.strong_count() > 0
    }

    pub fn zoom(&self) -> Result<ZoomWindow> {
        Ok(*self.cell()?.borrow())
    }

    pub fn set_zoom(&self, start: f64, end: f64) -> Result<ZoomWindow> {
        let cell = self.cell()?;
        Ok(store(&cell, ZoomWindow::new(start, end)?))
    }

    /// Apply an engine data zoom event and return the window now in effect.
    pub fn apply_event(&self, event: &DataZoomEvent) -> Result<ZoomWindow> {
        let cell = self.cell()?;
        Ok(store(&cell, event.requested()?))
    }

    pub fn reset(&self) -> Result<ZoomWindow> {
        let cell = self.cell()?;
        Ok(store(&cell, ZoomWindow::FULL))
    }

    pub fn subscribe(&self) -> Result<watch::Receiver<ZoomWindow>> {
        Ok(self.cell()?.subscribe())
    }
}

fn store(cell: &watch::Sender<ZoomWindow>, window: ZoomWindow) -> ZoomWindow {
    let changed = cell.send_if_modified(|current| {
        if *current == window {
            return false;
        }
        *current = window;
        true
    });
    if changed {
        tracing::info!("Zoom window set to {:.2}..{:.2}", window.start, window.end);
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_write_through_one_handle_is_visible_through_all() {
        let coordinator = ZoomCoordinator::new();
        let first = coordinator.handle();
        let second = coordinator.handle();

        first.set_zoom(20.0, 60.0).unwrap();

        let expected = ZoomWindow {
            start: 20.0,
            end: 60.0,
        };
        assert_eq!(second.zoom().unwrap(), expected);
        assert_eq!(coordinator.zoom(), expected);
    }

    #[test]
    fn test_reset_restores_full_range() {
        let coordinator = ZoomCoordinator::new();
        let handle = coordinator.handle();
        handle.set_zoom(10.0, 30.0).unwrap();

        assert_eq!(handle.reset().unwrap(), ZoomWindow::FULL);
        assert_eq!(coordinator.zoom(), ZoomWindow::FULL);
    }

    #[test]
    fn test_discarded_scope_rejects_every_access() {
        let coordinator = ZoomCoordinator::new();
        let handle = coordinator.handle();
        drop(coordinator);

        assert!(!handle.is_active());
        assert_eq!(handle.zoom(), Err(ChartError::ZoomScopeInactive));
        assert_eq!(handle.set_zoom(0.0, 50.0), Err(ChartError::ZoomScopeInactive));
        assert!(matches!(handle.subscribe(), Err(ChartError::ZoomScopeInactive)));
    }

    #[test]
    fn test_event_batch_first_element_wins() {
        let coordinator = ZoomCoordinator::new();
        let handle = coordinator.handle();
        let event: DataZoomEvent = serde_json::from_value(serde_json::json!({
            "batch": [{ "start": 5.0, "end": 15.0 }, { "start": 50.0, "end": 90.0 }],
        }))
        .unwrap();

        let window = handle.apply_event(&event).unwrap();
        assert_eq!(window, ZoomWindow { start: 5.0, end: 15.0 });
        assert_eq!(coordinator.zoom(), window);
    }

    #[test]
    fn test_invalid_window_leaves_state_untouched() {
        let coordinator = ZoomCoordinator::new();
        let handle = coordinator.handle();
        handle.set_zoom(40.0, 50.0).unwrap();

        assert!(handle.set_zoom(f64::NAN, 50.0).is_err());
        assert_eq!(coordinator.zoom(), ZoomWindow { start: 40.0, end: 50.0 });
    }

    #[tokio::test]
    async fn test_subscribers_wake_only_on_change() {
        let coordinator = ZoomCoordinator::new();
        let handle = coordinator.handle();
        let mut receiver = handle.subscribe().unwrap();

        handle.set_zoom(0.0, 100.0).unwrap();
        assert!(!receiver.has_changed().unwrap());

        handle.set_zoom(25.0, 75.0).unwrap();
        tokio::time::timeout(Duration::from_secs(1), receiver.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(*receiver.borrow_and_update(), ZoomWindow { start: 25.0, end: 75.0 });
    }
}
