/// Surface trait - the window side of the frame loop

use crate::error::Result;

/// Presentation surface driven by the frame loop
///
/// Implemented by the backend window. Completely separated from rendering:
/// the frame driver only asks it for events, time and presentation.
pub trait Surface {
    /// Whether the user asked to close the window
    fn should_close(&self) -> bool;

    /// Process pending window events
    fn poll_events(&mut self);

    /// Present the frame just drawn
    fn swap_buffers(&mut self) -> Result<()>;

    /// Seconds elapsed since the surface was created
    fn time(&self) -> f64;
}
