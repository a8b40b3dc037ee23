/// Frame module - surface seam, draw items and the frame driver

pub mod surface;
pub mod draw_item;
pub mod frame_driver;

pub use surface::*;
pub use draw_item::*;
pub use frame_driver::*;
