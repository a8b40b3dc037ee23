/// Frame driver - owns the draw items and runs the per-frame sequence
///
/// Lifecycle:
///
/// ```text
/// Uninitialized --ready()--> Ready --draw_frame()--> Drawing --> Ready
///       |                      |
///       +----terminate()-------+-------------------> Terminated
/// ```
///
/// Each frame clears the colour target, then for every item in insertion
/// order: activate the program, bind the vertex array, apply uniforms, draw,
/// unbind the vertex array. The surface presents the result.

use glam::Vec4;
use crate::config::Config;
use crate::error::Result;
use crate::frame::{DrawItem, Surface};
use crate::graphics_device::{Context, PolygonMode};

const SOURCE: &str = "prism::FrameDriver";

/// Frame driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Draw items may still be added
    Uninitialized,
    /// Between frames
    Ready,
    /// Inside `draw_frame`
    Drawing,
    /// Resources released, no further frames
    Terminated,
}

/// Counters for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub triangles: u32,
}

/// Per-frame orchestration over one context
pub struct FrameDriver {
    ctx: Context,
    state: DriverState,
    items: Vec<DrawItem>,
    clear_color: Vec4,
    polygon_mode: PolygonMode,
    viewport: (u32, u32),
    frames: u64,
}

impl FrameDriver {
    /// New driver in the `Uninitialized` state
    pub fn new(ctx: Context, config: &Config) -> Self {
        Self {
            ctx,
            state: DriverState::Uninitialized,
            items: Vec::new(),
            clear_color: config.clear_color,
            polygon_mode: config.polygon_mode,
            viewport: (config.width, config.height),
            frames: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Frames presented so far
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Current viewport size
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Add an item; only allowed before `ready()`
    pub fn add_item(&mut self, item: DrawItem) -> Result<()> {
        if self.state != DriverState::Uninitialized {
            return Err(crate::engine_invalid!(SOURCE, "Draw items can only be added before ready() (state {:?})", self.state));
        }
        self.items.push(item);
        Ok(())
    }

    /// Apply viewport and rasterization mode; `Uninitialized -> Ready`
    pub fn ready(&mut self) -> Result<()> {
        if self.state != DriverState::Uninitialized {
            return Err(crate::engine_invalid!(SOURCE, "ready() called in state {:?}", self.state));
        }
        self.ctx.set_viewport(self.viewport.0, self.viewport.1);
        self.ctx.set_polygon_mode(self.polygon_mode);
        self.state = DriverState::Ready;
        crate::engine_info!(SOURCE, "Frame driver ready with {} draw item(s)", self.items.len());
        Ok(())
    }

    /// Update the viewport to the new framebuffer size
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if self.state == DriverState::Terminated {
            return Err(crate::engine_invalid!(SOURCE, "resize() after terminate()"));
        }
        self.viewport = (width, height);
        if self.state != DriverState::Uninitialized {
            self.ctx.set_viewport(width, height);
        }
        crate::engine_debug!(SOURCE, "Viewport resized to {}x{}", width, height);
        Ok(())
    }

    /// Draw and present one frame; `Ready -> Drawing -> Ready`
    pub fn draw_frame(&mut self, surface: &mut dyn Surface) -> Result<FrameStats> {
        if self.state != DriverState::Ready {
            return Err(crate::engine_invalid!(SOURCE, "draw_frame() called in state {:?}", self.state));
        }
        self.state = DriverState::Drawing;
        let result = self.render(surface.time());
        self.state = DriverState::Ready;

        let stats = result?;
        surface.swap_buffers()?;
        self.frames += 1;
        Ok(stats)
    }

    fn render(&self, time: f64) -> Result<FrameStats> {
        self.ctx.clear(self.clear_color);

        let mut stats = FrameStats::default();
        for item in &self.items {
            item.program.activate()?;
            let vertex_array = item.geometry.vertex_array();
            vertex_array.bind()?;
            for (name, source) in &item.uniforms {
                item.program.set_uniform(name, source.value_at(time))?;
            }
            item.geometry.draw(&self.ctx, item.topology)?;
            vertex_array.unbind()?;

            stats.draw_calls += 1;
            stats.triangles += item.topology.triangle_count(item.geometry.draw_command().element_count());
        }
        Ok(stats)
    }

    /// Poll events and draw frames until the surface asks to close
    ///
    /// Returns the number of frames presented by this call.
    pub fn run(&mut self, surface: &mut dyn Surface) -> Result<u64> {
        let start = self.frames;
        while !surface.should_close() {
            surface.poll_events();
            self.draw_frame(surface)?;
        }
        Ok(self.frames - start)
    }

    /// Release every draw item in reverse order of acquisition; `-> Terminated`
    ///
    /// Calling it again is a no-op.
    pub fn terminate(&mut self) -> Result<()> {
        if self.state == DriverState::Terminated {
            return Ok(());
        }
        self.state = DriverState::Terminated;
        self.ctx.clear_program();
        while let Some(item) = self.items.pop() {
            item.release()?;
        }
        crate::engine_info!(SOURCE, "Frame driver terminated after {} frame(s)", self.frames);
        Ok(())
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        if let Err(e) = self.terminate() {
            crate::engine_error!(SOURCE, "Terminate on drop failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "frame_driver_tests.rs"]
mod tests;
