use anyhow::{anyhow, Result};
use glam::Mat4;

use super::material::MaterialId;
use super::spec::NodeSpec;
use super::transform::Transform;
use crate::geometry::GeometryHandle;
use crate::math::AABB;

/// Handle to a node; goes stale once the node is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Visual part of a node
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: GeometryHandle,
    pub material: MaterialId,
}

#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::IDENTITY,
            mesh: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(name: &str, geometry: GeometryHandle, material: MaterialId) -> Self {
        Self {
            mesh: Some(Mesh { geometry, material }),
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A mesh-carrying node resolved to world space
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance<'a> {
    pub node: NodeId,
    pub world: Mat4,
    pub mesh: &'a Mesh,
}

/// Arena-backed transform tree with a single root
///
/// Every node has exactly one parent except the root. Removing a node frees
/// the slots of its whole subtree and drops their geometry handles.
#[derive(Debug)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::group("scene")),
            }],
            free: Vec::new(),
            root,
            live: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when nothing but the root is left
    pub fn is_empty(&self) -> bool {
        self.live <= 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn require_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.node_mut(id)
            .ok_or_else(|| anyhow!("node {:?} is not part of the scene graph", id))
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Result<&mut Transform> {
        Ok(&mut self.require_mut(id)?.transform)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(anyhow!("cannot attach '{}' to missing parent {:?}", node.name, parent));
        }
        node.parent = Some(parent);
        node.children.clear();

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };

        self.require_mut(parent)?.children.push(id);
        self.live += 1;
        Ok(id)
    }

    /// Builds a fresh subtree from a declarative description
    ///
    /// Every mesh in the description gets newly built geometry, so two
    /// instantiations never share geometry.
    pub fn instantiate(&mut self, parent: NodeId, spec: &NodeSpec) -> Result<NodeId> {
        let node = match &spec.mesh {
            Some((geometry, material)) => Node::mesh(&spec.name, geometry.build_shared(), *material),
            None => Node::group(&spec.name),
        }
        .with_transform(spec.transform);

        let id = self.add_child(parent, node)?;
        for child in &spec.children {
            self.instantiate(id, child)?;
        }
        Ok(id)
    }

    /// All nodes below `id`, depth first, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Detaches and frees `id` with its subtree, returns the number of freed nodes
    pub fn remove(&mut self, id: NodeId) -> Result<usize> {
        if id == self.root {
            return Err(anyhow!("the scene root cannot be removed"));
        }
        let parent = self
            .node(id)
            .ok_or_else(|| anyhow!("node {:?} is not part of the scene graph", id))?
            .parent;

        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|&child| child != id);
        }

        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in &doomed {
            let slot = &mut self.slots[node.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(node.index);
        }
        self.live -= doomed.len();
        Ok(doomed.len())
    }

    /// Removes every child subtree of `id`, returns the number of freed nodes
    pub fn clear_children(&mut self, id: NodeId) -> Result<usize> {
        let children = self
            .node(id)
            .ok_or_else(|| anyhow!("node {:?} is not part of the scene graph", id))?
            .children
            .clone();
        children
            .into_iter()
            .try_fold(0, |freed: usize, child| -> Result<usize> {
                Ok(freed + self.remove(child)?)
            })
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&id| self.node(id).is_some_and(|n| n.name == name))
    }

    /// Parent chain composed down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.node(id)?;
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => Some(self.world_matrix(parent)? * local),
            None => Some(local),
        }
    }

    /// Every mesh in the tree with its world matrix, parents before children
    pub fn mesh_instances(&self) -> Vec<MeshInstance<'_>> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Mat4::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            let world = parent_world * node.transform.matrix();
            if let Some(mesh) = &node.mesh {
                out.push(MeshInstance {
                    node: id,
                    world,
                    mesh,
                });
            }
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
        out
    }

    /// World-space bounds of all geometry at or below `id`
    pub fn world_bounds(&self, id: NodeId) -> Option<AABB> {
        let parent_world = self
            .node(id)?
            .parent
            .and_then(|p| self.world_matrix(p))
            .unwrap_or(Mat4::IDENTITY);

        let mut bounds: Option<AABB> = None;
        let mut stack = vec![(id, parent_world)];
        while let Some((next, parent)) = stack.pop() {
            let Some(node) = self.node(next) else { continue };
            let world = parent * node.transform.matrix();
            if let Some(local) = node.mesh.as_ref().and_then(|m| m.geometry.bounds()) {
                let b = local.transformed(&world);
                bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
            }
            stack.extend(node.children.iter().map(|&child| (child, world)));
        }
        bounds
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometrySpec;
    use crate::scene::material::{Material, MaterialLibrary};
    use glam::Vec3;
    use std::sync::Arc;

    fn unit_box() -> GeometryHandle {
        GeometrySpec::cuboid(1.0, 1.0, 1.0).build_shared()
    }

    fn material() -> MaterialId {
        MaterialLibrary::new().add(Material::standard("m", 0xffffff, 0.0, 1.0))
    }

    #[test]
    fn test_new_graph_has_root_only() {
        let graph = SceneGraph::new();
        assert_eq!(graph.len(), 1);
        assert!(graph.children(graph.root()).is_empty());
        assert_eq!(graph.node(graph.root()).unwrap().name, "scene");
        assert!(graph.is_empty());
    }

    #[test]
    fn test_is_empty_tracks_nodes_below_root() {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), Node::group("a")).unwrap();
        assert!(!graph.is_empty());
        graph.remove(a).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_add_and_remove_subtree() {
        let mut graph = SceneGraph::new();
        let group = graph.add_child(graph.root(), Node::group("group")).unwrap();
        let a = graph.add_child(group, Node::mesh("a", unit_box(), material())).unwrap();
        graph.add_child(a, Node::group("a-child")).unwrap();
        assert_eq!(graph.len(), 4);

        assert_eq!(graph.remove(a).unwrap(), 2);
        assert_eq!(graph.len(), 2);
        assert!(!graph.contains(a));
        assert!(graph.children(group).is_empty());
    }

    #[test]
    fn test_stale_ids_do_not_alias_reused_slots() {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), Node::group("a")).unwrap();
        graph.remove(a).unwrap();
        let b = graph.add_child(graph.root(), Node::group("b")).unwrap();
        assert!(graph.node(a).is_none());
        assert_eq!(graph.node(b).unwrap().name, "b");
        assert!(graph.add_child(a, Node::group("orphan")).is_err());
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut graph = SceneGraph::new();
        assert!(graph.remove(graph.root()).is_err());
    }

    #[test]
    fn test_clear_children_releases_geometry() {
        let mut graph = SceneGraph::new();
        let group = graph.add_child(graph.root(), Node::group("group")).unwrap();
        let shared = unit_box();
        for i in 0..3 {
            graph
                .add_child(group, Node::mesh(&format!("m{}", i), shared.clone(), material()))
                .unwrap();
        }
        assert_eq!(Arc::strong_count(&shared), 4);

        assert_eq!(graph.clear_children(group).unwrap(), 3);
        assert_eq!(Arc::strong_count(&shared), 1);
        assert!(graph.contains(group));
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut graph = SceneGraph::new();
        let parent = graph
            .add_child(
                graph.root(),
                Node::group("p").with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))),
            )
            .unwrap();
        let child = graph
            .add_child(
                parent,
                Node::group("c").with_transform(Transform::from_position(Vec3::new(0.0, 2.0, 0.0))),
            )
            .unwrap();
        let p = graph.world_matrix(child).unwrap().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_mesh_instances_skip_groups() {
        let mut graph = SceneGraph::new();
        let group = graph.add_child(graph.root(), Node::group("g")).unwrap();
        graph.add_child(group, Node::mesh("m", unit_box(), material())).unwrap();
        let instances = graph.mesh_instances();
        assert_eq!(instances.len(), 1);
        assert_eq!(graph.node(instances[0].node).unwrap().name, "m");
    }

    #[test]
    fn test_world_bounds_follow_transforms() {
        let mut graph = SceneGraph::new();
        let group = graph
            .add_child(
                graph.root(),
                Node::group("g").with_transform(
                    Transform::from_position(Vec3::new(0.0, 0.5, 0.0)).with_scale(Vec3::splat(2.0)),
                ),
            )
            .unwrap();
        graph
            .add_child(
                group,
                Node::mesh("m", unit_box(), material())
                    .with_transform(Transform::from_position(Vec3::new(0.0, 0.5, 0.0))),
            )
            .unwrap();
        let bounds = graph.world_bounds(group).unwrap();
        assert!((bounds.min.y - 0.5).abs() < 1e-5);
        assert!((bounds.max.y - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_find_by_name() {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), Node::group("a")).unwrap();
        let b = graph.add_child(a, Node::group("b")).unwrap();
        assert_eq!(graph.find_by_name("b"), Some(b));
        assert_eq!(graph.find_by_name("missing"), None);
    }
}
