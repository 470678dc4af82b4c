pub mod scaling;

// Re-export commonly used items
pub use scaling::{scale, scale_nearest};
