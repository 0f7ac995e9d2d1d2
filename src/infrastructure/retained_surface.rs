// Retained render host - Keeps the last option per chart for clients that poll or stream it
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::render_surface::{RenderHost, RenderSurface};
use crate::domain::chart_option::ChartConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

/// Surface that retains what it was asked to draw.
#[derive(Debug)]
pub struct RetainedSurface {
    chart_id: String,
    disposed: Arc<AtomicBool>,
    config: Option<ChartConfig>,
    size: Option<SurfaceSize>,
}

impl RetainedSurface {
    pub fn config(&self) -> Option<&ChartConfig> {
        self.config.as_ref()
    }

    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }
}

impl RenderSurface for RetainedSurface {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn set_option(&mut self, config: &ChartConfig) {
        self.config = Some(config.clone());
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.size = Some(SurfaceSize { width, height });
    }

    fn dispose(&mut self) {
        tracing::debug!("Disposing surface for chart {}", self.chart_id);
        self.disposed.store(true, Ordering::Release);
        self.config = None;
    }
}

#[derive(Debug, Default)]
struct HostState {
    regions: BTreeSet<String>,
    surfaces: HashMap<String, Arc<AtomicBool>>,
    created: usize,
}

/// In-process host; tooltip regions are tracked by id.
#[derive(Debug, Clone, Default)]
pub struct RetainedHost {
    state: Arc<Mutex<HostState>>,
}

impl RetainedHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        // State stays consistent across a panicked holder: every update is a single insert/remove.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn has_tooltip_region(&self, region_id: &str) -> bool {
        self.state().regions.contains(region_id)
    }

    pub fn surfaces_created(&self) -> usize {
        self.state().created
    }

    /// Dispose a chart's surface from outside its owner, as a host tearing down a view would.
    pub fn dispose_surface(&self, chart_id: &str) {
        if let Some(flag) = self.state().surfaces.get(chart_id) {
            flag.store(true, Ordering::Release);
        }
    }
}

impl RenderHost for RetainedHost {
    fn create_surface(&self, chart_id: &str) -> Box<dyn RenderSurface> {
        let disposed = Arc::new(AtomicBool::new(false));
        {
            let mut state = self.state();
            state.surfaces.insert(chart_id.to_string(), disposed.clone());
            state.created += 1;
        }
        Box::new(RetainedSurface {
            chart_id: chart_id.to_string(),
            disposed,
            config: None,
            size: None,
        })
    }

    fn create_tooltip_region(&self, region_id: &str) {
        self.state().regions.insert(region_id.to_string());
    }

    fn remove_tooltip_region(&self, region_id: &str) {
        self.state().regions.remove(region_id);
    }
}
