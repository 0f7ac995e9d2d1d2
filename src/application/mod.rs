// Application layer - Chart synthesis use cases and instance lifecycle
pub mod chart_instance;
pub mod chart_service;
pub mod dashboard_service;
pub mod rect_renderer;
pub mod render_surface;
pub mod series_synthesizer;
pub mod tooltip_aggregator;
pub mod zoom_coordinator;
pub mod zoom_slider;
