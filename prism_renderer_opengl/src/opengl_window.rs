/// OpenGlWindow - window, GL context and presentation surface

use std::num::NonZeroU32;
use std::time::Instant;
use glutin::config::{Config as GlutinConfig, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface as GlutinSurface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};
use prism_engine::prism::{Config, Error, Result, Surface};
use prism_engine::{engine_error, engine_info, engine_warn};

use crate::opengl_device::OpenGlDevice;

const SOURCE: &str = "prism::opengl";

fn window_error(what: &str, reason: impl std::fmt::Display) -> Error {
    let message = format!("{}: {}", what, reason);
    engine_error!(SOURCE, "{}", message);
    Error::WindowCreationFailed(message)
}

/// Prefer the config with the most samples
fn pick_config(configs: Box<dyn Iterator<Item = GlutinConfig> + '_>) -> GlutinConfig {
    configs
        .reduce(|best, config| if config.num_samples() > best.num_samples() { config } else { best })
        // the picker has no error channel
        .expect("display offered no GL config")
}

/// A native window with a current OpenGL context
///
/// Implements [`Surface`] for the frame driver. Events are delivered by the
/// winit event loop, so the owner forwards close and resize requests here.
pub struct OpenGlWindow {
    surface: GlutinSurface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
    start: Instant,
    close_requested: bool,
}

impl OpenGlWindow {
    /// Open a window, create a GL context for it and make it current
    ///
    /// Returns the window together with the device that drives its context.
    pub fn create(event_loop: &ActiveEventLoop, config: &Config) -> Result<(Self, OpenGlDevice)> {
        let attributes = WindowAttributes::default()
            .with_title(config.app_name.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, pick_config)
            .map_err(|e| window_error("Failed to create display", e))?;
        let window = window.ok_or_else(|| window_error("Failed to create window", "no window returned"))?;

        let raw_window_handle = window
            .window_handle()
            .map(|handle| handle.as_raw())
            .map_err(|e| window_error("Failed to get window handle", e))?;

        let (major, minor) = config.gl_version;
        let profile = if config.core_profile { GlProfile::Core } else { GlProfile::Compatibility };
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(profile)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| window_error("Failed to create OpenGL context", e))?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|e| window_error("Failed to build surface attributes", e))?;
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| window_error("Failed to create window surface", e))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| window_error("Failed to make context current", e))?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            engine_warn!(SOURCE, "Could not set swap interval: {}", e);
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };

        engine_info!(
            SOURCE,
            "Window '{}' created ({}x{}, GL {}.{} {})",
            config.app_name,
            config.width,
            config.height,
            major,
            minor,
            if config.core_profile { "core" } else { "compatibility" }
        );

        let window = Self {
            surface,
            context,
            window,
            start: Instant::now(),
            close_requested: false,
        };
        Ok((window, OpenGlDevice::new(gl)))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Mark the window for closing; `should_close` reports it from now on
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Resize the presentation surface to the new framebuffer size
    ///
    /// A zero-sized (minimized) framebuffer is ignored.
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, width, height);
        }
    }
}

impl Surface for OpenGlWindow {
    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn poll_events(&mut self) {}

    fn swap_buffers(&mut self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| prism_engine::engine_err!(SOURCE, "Failed to swap buffers: {}", e))
    }

    fn time(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
