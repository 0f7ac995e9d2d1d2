// Domain layer - Sensor assets, track geometry and the declarative chart model
pub mod asset;
pub mod chart_option;
pub mod grouping;
pub mod layout;
pub mod legend;
pub mod tooltip;
pub mod zoom;
