/*!
# Prism Demo Runner

Shared event-loop plumbing for the demo binaries.

Each binary builds its draw items in a setup closure and hands it to
[`run_demo`], which owns the window, the frame driver and the winit
application loop.
*/

use prism_engine::prism::{
    Config, Context, DrawItem, Engine, Error, FrameDriver, Result, ShaderKind, ShaderSource, Surface,
};
use prism_engine::{engine_error, engine_info};
use prism_renderer_opengl::OpenGlWindow;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

const SOURCE: &str = "prism::demo";

/// Shader source from the command line argument at `position`, or `default`
///
/// Either way the text goes through the file-or-inline loader, so an argument
/// may be a path to a GLSL file or the GLSL itself.
pub fn shader_source_arg(position: usize, kind: ShaderKind, default: &str) -> ShaderSource {
    match std::env::args().nth(position) {
        Some(arg) => ShaderSource::from_file_or_inline(kind, &arg),
        None => ShaderSource::from_file_or_inline(kind, default),
    }
}

/// Open a window and draw the items built by `setup` until the window closes
///
/// `setup` runs once the GL context is current. Any error it returns, and any
/// error raised while drawing, stops the event loop and is returned here.
pub fn run_demo<F>(config: Config, setup: F) -> Result<()>
where
    F: FnOnce(&Context) -> Result<Vec<DrawItem>>,
{
    Engine::initialize(&config);

    let event_loop = EventLoop::new()
        .map_err(|e| Error::InitializationFailed(format!("Failed to create event loop: {}", e)))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DemoApp {
        config,
        setup: Some(setup),
        running: None,
        error: None,
    };
    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::InitializationFailed(format!("Event loop failed: {}", e)))?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Live window and driver; the driver is dropped first so every GL object is
/// released while the context still exists
struct Running {
    driver: FrameDriver,
    window: OpenGlWindow,
}

struct DemoApp<F> {
    config: Config,
    setup: Option<F>,
    running: Option<Running>,
    error: Option<Error>,
}

impl<F> DemoApp<F>
where
    F: FnOnce(&Context) -> Result<Vec<DrawItem>>,
{
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let (window, device) = OpenGlWindow::create(event_loop, &self.config)?;
        let mut driver = FrameDriver::new(Context::new(device), &self.config);

        if let Some(setup) = self.setup.take() {
            for item in setup(driver.context())? {
                driver.add_item(item)?;
            }
        }
        driver.ready()?;
        Ok(Running { driver, window })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        engine_error!(SOURCE, "{}", error);
        self.error.get_or_insert(error);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut running) = self.running.take() {
            if let Err(e) = running.driver.terminate() {
                engine_error!(SOURCE, "Terminate failed: {}", e);
                self.error.get_or_insert(e);
            }
            engine_info!(SOURCE, "Closed after {} frame(s)", running.driver.frames_drawn());
        }
        event_loop.exit();
    }
}

impl<F> ApplicationHandler for DemoApp<F>
where
    F: FnOnce(&Context) -> Result<Vec<DrawItem>>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() || self.error.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                running.window.window().request_redraw();
                self.running = Some(running);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => running.window.request_close(),
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    logical_key: Key::Named(NamedKey::Escape),
                    state: ElementState::Pressed,
                    ..
                },
                ..
            } => running.window.request_close(),
            WindowEvent::Resized(size) => {
                running.window.resize(size.width, size.height);
                if let Err(e) = running.driver.resize(size.width, size.height) {
                    return self.fail(event_loop, e);
                }
                running.window.window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = running.driver.draw_frame(&mut running.window) {
                    return self.fail(event_loop, e);
                }
                running.window.window().request_redraw();
            }
            _ => {}
        }

        if running.window.should_close() {
            self.shutdown(event_loop);
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.shutdown(event_loop);
    }
}
