use glam::Vec3;

use super::material::MaterialId;
use super::transform::Transform;
use crate::geometry::GeometrySpec;

/// Declarative description of a node subtree
///
/// Instantiated with [`SceneGraph::instantiate`](super::SceneGraph::instantiate);
/// the same description can be instantiated any number of times.
///
/// # Examples
///
/// ```
/// use fridge_farm::geometry::GeometrySpec;
/// use fridge_farm::scene::{Material, MaterialLibrary, NodeSpec, SceneGraph};
/// use glam::Vec3;
///
/// let mut materials = MaterialLibrary::new();
/// let metal = materials.add(Material::standard("metal", 0x888888, 0.8, 0.4));
///
/// let spec = NodeSpec::group("fan")
///     .at(Vec3::new(0.0, 3.6, 0.0))
///     .child(NodeSpec::mesh("blade", GeometrySpec::cylinder(0.3, 0.3, 0.1, 16), metal));
///
/// let mut graph = SceneGraph::new();
/// let root = graph.root();
/// graph.instantiate(root, &spec).unwrap();
/// graph.instantiate(root, &spec).unwrap();
/// assert_eq!(graph.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<(GeometrySpec, MaterialId)>,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Transform-only node
    pub fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::IDENTITY,
            mesh: None,
            children: Vec::new(),
        }
    }

    /// Node drawing `geometry` with `material`
    pub fn mesh(name: &str, geometry: GeometrySpec, material: MaterialId) -> Self {
        Self {
            mesh: Some((geometry, material)),
            ..Self::group(name)
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Nodes in this subtree, itself included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(NodeSpec::count).sum::<usize>()
    }
}
