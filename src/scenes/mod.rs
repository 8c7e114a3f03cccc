mod fridge;

pub use fridge::{fan_spec, FridgeDimensions, FridgePalette, FridgeScene};
