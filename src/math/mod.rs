mod aabb;
mod color;
mod curve;

pub use aabb::AABB;
pub use color::{hex_to_linear, hex_to_srgb, srgb_to_linear};
pub use curve::{Curve, CurveKind, HelixCurve};
