pub mod camera;
pub mod cli;
pub mod core;
pub mod farm;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod math;
pub mod overlay;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod types;
pub mod window;

pub use farm::{layout, rebuild_farm, HelixParams, PodPlacement};
pub use interaction::{DoorState, InteractionController, ScaleFactor};
pub use scenes::{FridgeDimensions, FridgeScene};
