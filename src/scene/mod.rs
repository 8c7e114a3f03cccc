//! Scene graph: transform nodes, optional meshes, shared materials.

mod graph;
mod material;
mod spec;
mod transform;

pub use graph::{Mesh, MeshInstance, Node, NodeId, SceneGraph};
pub use material::{Material, MaterialId, MaterialLibrary};
pub use spec::NodeSpec;
pub use transform::Transform;
