/// Graphics device module - device trait, value types and the context that drives them

// Module declarations
pub mod graphics_device;
pub mod types;
pub mod context;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use types::*;
pub use context::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
