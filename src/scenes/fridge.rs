use anyhow::Result;
use glam::Vec3;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

use crate::farm::{self, FarmMaterials, FarmStats, HelixParams};
use crate::geometry::GeometrySpec;
use crate::scene::{Material, MaterialId, MaterialLibrary, Node, NodeId, NodeSpec, SceneGraph, Transform};

const SHELF_THICKNESS: f32 = 0.05;
const BASIN_WALL: f32 = 0.02;
const BASIN_HEIGHT: f32 = 0.05;
const HANDLE_LENGTH: f32 = 0.6;
const LED_SIZE: f32 = 0.03;
const HELIX_MARGIN: f32 = 0.1;
const FLOOR_SIZE: f32 = 20.0;

/// Outer measurements of the fridge, everything else is derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FridgeDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub door_thickness: f32,
    pub wall_thickness: f32,
}

impl Default for FridgeDimensions {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 4.0,
            depth: 1.8,
            door_thickness: 0.15,
            wall_thickness: 0.05,
        }
    }
}

impl FridgeDimensions {
    /// Interior width between the side walls
    pub fn shelf_width(&self) -> f32 {
        self.width - 2.0 * self.wall_thickness
    }

    /// Shelves only stop at the back wall
    pub fn shelf_depth(&self) -> f32 {
        self.depth - self.wall_thickness
    }

    pub fn shelf_z(&self) -> f32 {
        -self.depth / 2.0 + self.wall_thickness + self.shelf_depth() / 2.0
    }

    pub fn bottom_shelf_y(&self) -> f32 {
        self.height * 0.2
    }

    pub fn top_shelf_y(&self) -> f32 {
        self.height * 0.9
    }

    pub fn helix_radius(&self) -> f32 {
        (self.width / 2.0) * 0.7
    }

    pub fn helix_start_y(&self) -> f32 {
        self.bottom_shelf_y() + HELIX_MARGIN
    }

    pub fn helix_height(&self) -> f32 {
        (self.top_shelf_y() - HELIX_MARGIN) - self.helix_start_y()
    }

    /// Helix fitted between the shelves
    pub fn helix_params(&self, turns: f32, pod_count: usize) -> Result<HelixParams> {
        HelixParams::new(
            self.helix_radius(),
            self.helix_height(),
            turns,
            self.helix_start_y(),
            pod_count,
        )
    }
}

/// Every material the fridge scene uses
#[derive(Debug, Clone, Copy)]
pub struct FridgePalette {
    pub body: MaterialId,
    pub door: MaterialId,
    pub handle: MaterialId,
    pub pole: MaterialId,
    pub ramp: MaterialId,
    pub pod: MaterialId,
    pub led: MaterialId,
    pub floor: MaterialId,
}

impl FridgePalette {
    pub fn register(library: &mut MaterialLibrary) -> Self {
        Self {
            body: library.add(Material::standard("body", 0xffffff, 0.1, 0.8)),
            door: library.add(Material::standard("door", 0xff0000, 0.3, 0.6)),
            handle: library.add(Material::standard("handle", 0x888888, 0.8, 0.4)),
            pole: library.add(Material::standard("pole", 0x111111, 0.8, 0.6)),
            ramp: library.add(
                Material::standard("ramp", 0x66bb66, 0.1, 0.7)
                    .with_opacity(0.8)
                    .double_sided(),
            ),
            pod: library.add(Material::standard("pod", 0x444444, 0.2, 0.5)),
            led: library.add(Material::basic("led", 0xffaaff)),
            floor: library.add(Material::standard("floor", 0x000000, 0.0, 0.8)),
        }
    }

    pub fn farm(&self) -> FarmMaterials {
        FarmMaterials {
            pole: self.pole,
            ramp: self.ramp,
            pod: self.pod,
            metal: self.handle,
        }
    }
}

/// Fan unit: outer housing with a darker hub
pub fn fan_spec(dims: &FridgeDimensions, palette: &FridgePalette) -> NodeSpec {
    let radius = dims.shelf_width() * 0.15;
    let height = dims.height * 0.03;
    NodeSpec::group("fan")
        .child(NodeSpec::mesh(
            "fan-housing",
            GeometrySpec::cylinder(radius, radius, height, 16),
            palette.handle,
        ))
        .child(NodeSpec::mesh(
            "fan-hub",
            GeometrySpec::cylinder(radius * 0.3, radius * 0.3, height * 1.2, 16),
            palette.pole,
        ))
}

/// The whole scene: floor, fridge body, door on its hinge, helix farm
#[derive(Debug)]
pub struct FridgeScene {
    pub graph: SceneGraph,
    pub materials: MaterialLibrary,
    pub palette: FridgePalette,
    pub dims: FridgeDimensions,
    fridge: NodeId,
    door_pivot: NodeId,
    helix: NodeId,
    helix_params: HelixParams,
}

impl FridgeScene {
    /// Builds the static body and an initial farm
    pub fn build(dims: FridgeDimensions, turns: f32, pod_count: usize) -> Result<Self> {
        let helix_params = dims.helix_params(turns, pod_count)?;
        let mut materials = MaterialLibrary::new();
        let palette = FridgePalette::register(&mut materials);
        let mut graph = SceneGraph::new();
        let root = graph.root();

        graph.add_child(
            root,
            Node::mesh(
                "floor",
                GeometrySpec::Plane {
                    width: FLOOR_SIZE,
                    height: FLOOR_SIZE,
                }
                .build_shared(),
                palette.floor,
            )
            .with_transform(Transform::IDENTITY.with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0))),
        )?;

        let fridge = graph.add_child(root, Node::group("fridge"))?;
        add_walls(&mut graph, fridge, &dims, &palette)?;
        let door_pivot = add_door(&mut graph, fridge, &dims, &palette)?;
        add_lower_compartment(&mut graph, fridge, &dims, &palette)?;
        add_upper_compartment(&mut graph, fridge, &dims, &palette)?;
        let helix = graph.add_child(fridge, Node::group("helix"))?;
        add_led_strips(&mut graph, fridge, &dims, &palette)?;

        log::info!(
            "Fridge body built: {} nodes, {} materials",
            graph.len(),
            materials.len()
        );

        let mut scene = Self {
            graph,
            materials,
            palette,
            dims,
            fridge,
            door_pivot,
            helix,
            helix_params,
        };
        scene.rebuild_farm(turns, pod_count)?;
        Ok(scene)
    }

    pub fn fridge_root(&self) -> NodeId {
        self.fridge
    }

    pub fn door_pivot(&self) -> NodeId {
        self.door_pivot
    }

    pub fn helix_root(&self) -> NodeId {
        self.helix
    }

    pub fn helix_params(&self) -> &HelixParams {
        &self.helix_params
    }

    /// Regenerates the helix subtree, leaving the rest of the scene alone
    pub fn rebuild_farm(&mut self, turns: f32, pod_count: usize) -> Result<FarmStats> {
        let params = self.helix_params.with_shape(turns, pod_count)?;
        let stats = farm::rebuild_farm(&mut self.graph, self.helix, &self.palette.farm(), &params)?;
        self.helix_params = params;
        Ok(stats)
    }
}

fn add_walls(
    graph: &mut SceneGraph,
    fridge: NodeId,
    dims: &FridgeDimensions,
    palette: &FridgePalette,
) -> Result<()> {
    let (w, h, d, t) = (dims.width, dims.height, dims.depth, dims.wall_thickness);
    let walls = [
        ("wall-back", Vec3::new(w, h, t), Vec3::new(0.0, h / 2.0, -d / 2.0 + t / 2.0)),
        ("wall-bottom", Vec3::new(w, t, d), Vec3::new(0.0, t / 2.0, 0.0)),
        ("wall-top", Vec3::new(w, t, d), Vec3::new(0.0, h - t / 2.0, 0.0)),
        ("wall-left", Vec3::new(t, h, d), Vec3::new(-w / 2.0 + t / 2.0, h / 2.0, 0.0)),
        ("wall-right", Vec3::new(t, h, d), Vec3::new(w / 2.0 - t / 2.0, h / 2.0, 0.0)),
    ];
    for (name, size, position) in walls {
        graph.add_child(
            fridge,
            Node::mesh(name, GeometrySpec::cuboid(size.x, size.y, size.z).build_shared(), palette.body)
                .with_transform(Transform::from_position(position)),
        )?;
    }
    Ok(())
}

/// Door hung on a pivot at the front-left edge; returns the pivot
fn add_door(
    graph: &mut SceneGraph,
    fridge: NodeId,
    dims: &FridgeDimensions,
    palette: &FridgePalette,
) -> Result<NodeId> {
    let (w, h, d, door) = (dims.width, dims.height, dims.depth, dims.door_thickness);
    let pivot = graph.add_child(
        fridge,
        Node::group("door-pivot").with_transform(Transform::from_position(Vec3::new(-w / 2.0, 0.0, d / 2.0))),
    )?;
    let panel = graph.add_child(
        pivot,
        Node::mesh("door", GeometrySpec::cuboid(w, h, door).build_shared(), palette.door)
            .with_transform(Transform::from_position(Vec3::new(w / 2.0, h / 2.0, -door / 2.0))),
    )?;
    graph.add_child(
        panel,
        Node::mesh(
            "door-handle",
            GeometrySpec::cylinder(0.04, 0.04, HANDLE_LENGTH, 16).build_shared(),
            palette.handle,
        )
        .with_transform(
            Transform::from_position(Vec3::new((w / 2.0) * 0.9 - w / 2.0, 0.0, door / 2.0 + 0.05))
                .with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2)),
        ),
    )?;
    Ok(pivot)
}

/// Bottom shelf with the basin on it and the drawer facade below
fn add_lower_compartment(
    graph: &mut SceneGraph,
    fridge: NodeId,
    dims: &FridgeDimensions,
    palette: &FridgePalette,
) -> Result<()> {
    let shelf_width = dims.shelf_width();
    let shelf_depth = dims.shelf_depth();
    let shelf_y = dims.bottom_shelf_y();
    let shelf_z = dims.shelf_z();
    let t = dims.wall_thickness;

    graph.add_child(
        fridge,
        Node::mesh(
            "shelf-bottom",
            GeometrySpec::cuboid(shelf_width, SHELF_THICKNESS, shelf_depth).build_shared(),
            palette.body,
        )
        .with_transform(Transform::from_position(Vec3::new(0.0, shelf_y, shelf_z))),
    )?;

    let basin_width = shelf_width * 0.95;
    let basin_depth = shelf_depth * 0.95;
    let basin_y = shelf_y + SHELF_THICKNESS / 2.0 + BASIN_HEIGHT / 2.0;
    let long_side = GeometrySpec::cuboid(basin_width, BASIN_HEIGHT, BASIN_WALL).build_shared();
    let short_side = GeometrySpec::cuboid(BASIN_WALL, BASIN_HEIGHT, basin_depth).build_shared();
    let basin = [
        ("basin-front", &long_side, Vec3::new(0.0, basin_y, shelf_z + shelf_depth / 2.0 - BASIN_WALL / 2.0)),
        ("basin-back", &long_side, Vec3::new(0.0, basin_y, shelf_z - shelf_depth / 2.0 + BASIN_WALL / 2.0)),
        ("basin-left", &short_side, Vec3::new(-basin_width / 2.0 + BASIN_WALL / 2.0, basin_y, shelf_z)),
        ("basin-right", &short_side, Vec3::new(basin_width / 2.0 - BASIN_WALL / 2.0, basin_y, shelf_z)),
    ];
    for (name, geometry, position) in basin {
        graph.add_child(
            fridge,
            Node::mesh(name, geometry.clone(), palette.pole).with_transform(Transform::from_position(position)),
        )?;
    }

    let drawer_height = shelf_y;
    let facade = graph.add_child(
        fridge,
        Node::mesh(
            "drawer",
            GeometrySpec::cuboid(shelf_width, drawer_height * 0.95, t).build_shared(),
            palette.body,
        )
        .with_transform(Transform::from_position(Vec3::new(
            0.0,
            drawer_height / 2.0,
            dims.depth / 2.0 - t / 2.0,
        ))),
    )?;
    graph.add_child(
        facade,
        Node::mesh(
            "drawer-handle",
            GeometrySpec::cuboid(shelf_width * 0.4, drawer_height * 0.1, t * 1.5).build_shared(),
            palette.handle,
        )
        .with_transform(Transform::from_position(Vec3::new(
            0.0,
            drawer_height * 0.8,
            t / 2.0 + (t * 1.5) / 2.0,
        ))),
    )?;
    Ok(())
}

/// Top shelf carrying two fans and the computer box
fn add_upper_compartment(
    graph: &mut SceneGraph,
    fridge: NodeId,
    dims: &FridgeDimensions,
    palette: &FridgePalette,
) -> Result<()> {
    let shelf_width = dims.shelf_width();
    let shelf_depth = dims.shelf_depth();
    let shelf_y = dims.top_shelf_y();
    let shelf_z = dims.shelf_z();

    graph.add_child(
        fridge,
        Node::mesh(
            "shelf-top",
            GeometrySpec::cuboid(shelf_width, SHELF_THICKNESS, shelf_depth).build_shared(),
            palette.body,
        )
        .with_transform(Transform::from_position(Vec3::new(0.0, shelf_y, shelf_z))),
    )?;

    let fan = fan_spec(dims, palette);
    let fan_y = shelf_y + dims.height * 0.03 / 2.0 + 0.01;
    for (i, x) in [-shelf_width * 0.25, shelf_width * 0.25].into_iter().enumerate() {
        let mut spec = fan.clone().at(Vec3::new(x, fan_y, shelf_z));
        spec.name = format!("fan-{}", i + 1);
        graph.instantiate(fridge, &spec)?;
    }

    let computer_height = dims.height * 0.05;
    graph.add_child(
        fridge,
        Node::mesh(
            "computer",
            GeometrySpec::cuboid(shelf_width * 0.4, computer_height, shelf_depth * 0.5).build_shared(),
            palette.pole,
        )
        .with_transform(Transform::from_position(Vec3::new(
            0.0,
            shelf_y + computer_height / 2.0 + 0.01,
            shelf_z - shelf_depth * 0.2,
        ))),
    )?;
    Ok(())
}

/// Four light bars in the inner corners, as tall as the helix
fn add_led_strips(
    graph: &mut SceneGraph,
    fridge: NodeId,
    dims: &FridgeDimensions,
    palette: &FridgePalette,
) -> Result<()> {
    let t = dims.wall_thickness;
    let helix_height = dims.helix_height();
    let y = dims.helix_start_y() + helix_height / 2.0;
    let inner_x = dims.width / 2.0 - t - LED_SIZE / 2.0;
    let front_z = dims.depth / 2.0 - t - LED_SIZE / 2.0;
    let back_z = -dims.depth / 2.0 + t + LED_SIZE / 2.0;

    let strip = GeometrySpec::cuboid(LED_SIZE, helix_height, LED_SIZE).build_shared();
    let corners = [
        ("led-front-left", -inner_x, front_z),
        ("led-front-right", inner_x, front_z),
        ("led-back-left", -inner_x, back_z),
        ("led-back-right", inner_x, back_z),
    ];
    for (name, x, z) in corners {
        graph.add_child(
            fridge,
            Node::mesh(name, strip.clone(), palette.led).with_transform(Transform::from_position(Vec3::new(x, y, z))),
        )?;
    }
    Ok(())
}
