// Presentation layer - HTTP routes over the dashboard registry
pub mod app_state;
pub mod handlers;
