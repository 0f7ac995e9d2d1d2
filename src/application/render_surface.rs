// Render surface traits - Where a chart's option document ends up
use crate::domain::chart_option::ChartConfig;

/// One rendering-engine instance bound to a chart slot.
pub trait RenderSurface: Send + Sync {
    /// A surface can be disposed by its host at any time; callers recreate it lazily.
    fn is_disposed(&self) -> bool;

    fn set_option(&mut self, config: &ChartConfig);

    fn resize(&mut self, width: f64, height: f64);

    fn dispose(&mut self);
}

/// Creates surfaces and the out-of-band tooltip regions that sit next to them.
pub trait RenderHost: Send + Sync {
    fn create_surface(&self, chart_id: &str) -> Box<dyn RenderSurface>;

    fn create_tooltip_region(&self, region_id: &str);

    fn remove_tooltip_region(&self, region_id: &str);
}
