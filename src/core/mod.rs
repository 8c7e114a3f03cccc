pub mod controller;
pub mod gpu_context;
pub mod input_adapter;

pub use controller::{Button, Controller};
pub use gpu_context::{surface_extent, GpuContext};
pub use input_adapter::WinitController;
