use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;

use crate::domain::layout::LayoutMetrics;

const CONFIG_FILE: &str = "config/service";
const ENV_PREFIX: &str = "SENSOR_TIMELINE";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Geometry and colours shared by every synthesized chart.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChartSettings {
    pub layout: LayoutMetrics,
    pub grid: GridSettings,
    pub theme: ThemeSettings,
    /// Legend height used until the host reports a measured one.
    pub legend_height: f64,
    pub y_axis_name_gap: f64,
    pub slider_header_height: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            layout: LayoutMetrics::default(),
            grid: GridSettings::default(),
            theme: ThemeSettings::default(),
            legend_height: 24.0,
            y_axis_name_gap: 48.0,
            slider_header_height: 65.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GridSettings {
    pub left: f64,
    pub right: f64,
    pub border_width: f64,
    pub border_color: String,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            left: 60.0,
            right: 8.0,
            border_width: 1.0,
            border_color: "rgba(128, 128, 128, 0.5)".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ThemeSettings {
    pub foreground: String,
    pub muted: String,
    pub border: String,
    pub background: String,
    pub negative_region: String,
    pub secondary_region: String,
    pub boundary_border: String,
    pub overlay_line: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            foreground: "#c6c6c6".to_string(),
            muted: "#8e8e8e".to_string(),
            border: "#3b3b3b".to_string(),
            background: "#242424".to_string(),
            negative_region: "#4a2323".to_string(),
            secondary_region: "#2f2a4a".to_string(),
            boundary_border: "#9B81E6".to_string(),
            overlay_line: "grey".to_string(),
        }
    }
}

/// Load the service configuration: optional `config/service` file, then environment overrides
/// such as `SENSOR_TIMELINE__SERVER__BIND_ADDRESS`.
pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    build_config(builder)
}

fn build_config(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<ServiceConfig> {
    let settings = builder.build()?;
    Ok(settings.try_deserialize()?)
}
