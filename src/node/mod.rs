pub mod display;
pub mod payload;

pub use display::*;
pub use payload::*;
