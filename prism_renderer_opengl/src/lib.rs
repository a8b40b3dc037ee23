/*!
# Prism OpenGL Backend

OpenGL implementation of the Prism graphics device.

This crate provides:

- [`OpenGlDevice`]: the `GraphicsDevice` trait over a [glow] function table
- [`OpenGlWindow`]: a winit window with a current glutin context, used as
  the frame driver's `Surface`

# Example

```no_run
use prism_engine::prism::{Config, Context, FrameDriver};
use prism_renderer_opengl::OpenGlWindow;
# fn resumed(event_loop: &winit::event_loop::ActiveEventLoop) -> prism_engine::prism::Result<()> {
let config = Config::default();
let (mut window, device) = OpenGlWindow::create(event_loop, &config)?;
let mut driver = FrameDriver::new(Context::new(device), &config);
driver.ready()?;
driver.draw_frame(&mut window)?;
# Ok(())
# }
```
*/

mod opengl_device;
mod opengl_window;

pub use opengl_device::OpenGlDevice;
pub use opengl_window::OpenGlWindow;
