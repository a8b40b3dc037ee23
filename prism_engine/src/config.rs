/// Application configuration shared by the window, the context and the frame driver

use glam::Vec4;
use crate::graphics_device::PolygonMode;
use crate::log::LogSeverity;

/// Environment variable read by [`Config::from_env`] to override the log level
pub const LOG_LEVEL_ENV: &str = "PRISM_LOG";

/// Prism configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Window title
    pub app_name: String,
    /// Initial window width in pixels
    pub width: u32,
    /// Initial window height in pixels
    pub height: u32,
    /// Requested OpenGL version (major, minor)
    pub gl_version: (u8, u8),
    /// Request a core profile (no deprecated functions)
    pub core_profile: bool,
    /// Allow the user to resize the window
    pub resizable: bool,
    /// Wait for vertical sync when presenting
    pub vsync: bool,
    /// Colour the target is cleared to at the start of every frame
    pub clear_color: Vec4,
    /// Rasterization mode (Line gives the tutorials' wireframe view)
    pub polygon_mode: PolygonMode,
    /// Lowest severity forwarded to the logger
    pub log_level: LogSeverity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "LearnOpenGL".to_string(),
            width: 800,
            height: 600,
            gl_version: (3, 3),
            core_profile: true,
            resizable: true,
            vsync: true,
            clear_color: Vec4::new(0.2, 0.3, 0.3, 1.0),
            polygon_mode: PolygonMode::Fill,
            log_level: LogSeverity::Info,
        }
    }
}

impl Config {
    /// Default configuration with the log level taken from `PRISM_LOG` when set
    ///
    /// An unparsable value keeps the default level.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(LOG_LEVEL_ENV) {
            match value.parse() {
                Ok(level) => config.log_level = level,
                Err(reason) => crate::engine_warn!("prism::Config", "Ignoring {}: {}", LOG_LEVEL_ENV, reason),
            }
        }
        config
    }

    /// Builder-style title override
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.app_name = title.into();
        self
    }

    /// Builder-style rasterization mode override
    pub fn with_polygon_mode(mut self, mode: PolygonMode) -> Self {
        self.polygon_mode = mode;
        self
    }
}
