use glam::{Mat4, Vec3};
use serde::Serialize;
use std::f32::consts::TAU;

use crate::core::{Button, Controller};
use crate::types::{CameraUniform, Lighting};

/// Radians per second while a rotate key is held
pub const KEY_ROTATE_SPEED: f32 = 1.5;
/// Distance factor per wheel line
pub const ZOOM_STEP: f32 = 0.95;
/// Keeps the polar angle off the poles so the view never flips
const POLAR_EPSILON: f32 = 1e-3;

/// Projection and orbit limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    /// Fraction of the pending rotation applied each frame
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, 1.5, 6.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            damping: 0.05,
            min_distance: 3.0,
            max_distance: 15.0,
        }
    }
}

/// Perspective camera orbiting a target point, with damped rotation
///
/// Position is kept in spherical coordinates around the target: `theta`
/// turns about +Y starting from +Z, `phi` is measured down from +Y.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    settings: CameraSettings,
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    aspect: f32,
}

impl OrbitCamera {
    pub fn new(settings: CameraSettings, aspect: f32) -> Self {
        let offset = settings.eye - settings.target;
        let radius = offset
            .length()
            .clamp(settings.min_distance, settings.max_distance);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / offset.length().max(f32::EPSILON))
            .clamp(-1.0, 1.0)
            .acos();

        Self {
            settings,
            target: settings.target,
            radius,
            theta,
            phi: phi.clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON),
            pending_theta: 0.0,
            pending_phi: 0.0,
            aspect,
        }
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Follow a viewport resize; zero-sized viewports are ignored
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Queue a rotation; it is eased in over the next frames
    pub fn rotate(&mut self, left: f32, up: f32) {
        self.pending_theta -= left;
        self.pending_phi -= up;
    }

    /// Move closer for positive `lines`, farther for negative
    pub fn zoom(&mut self, lines: f32) {
        self.radius = (self.radius * ZOOM_STEP.powf(lines))
            .clamp(self.settings.min_distance, self.settings.max_distance);
    }

    /// Turn the frame's input into orbit requests
    ///
    /// Dragging across the full viewport height turns the camera once around.
    pub fn handle_input(&mut self, input: &impl Controller, viewport_height: f32, delta: f32) {
        if input.is_down(Button::MouseLeft) && viewport_height > 0.0 {
            let (dx, dy) = input.pointer_delta();
            self.rotate(TAU * dx / viewport_height, TAU * dy / viewport_height);
        }

        let key_axis = |positive: &[Button], negative: &[Button]| -> f32 {
            let pos = positive.iter().any(|&b| input.is_down(b));
            let neg = negative.iter().any(|&b| input.is_down(b));
            match (pos, neg) {
                (true, false) => 1.0,
                (false, true) => -1.0,
                _ => 0.0,
            }
        };
        let horizontal = key_axis(&[Button::ArrowLeft, Button::KeyA], &[Button::ArrowRight, Button::KeyD]);
        let vertical = key_axis(&[Button::ArrowUp, Button::KeyW], &[Button::ArrowDown, Button::KeyS]);
        if horizontal != 0.0 || vertical != 0.0 {
            let step = KEY_ROTATE_SPEED * delta;
            self.rotate(-horizontal * step, -vertical * step);
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            self.zoom(scroll);
        }
    }

    /// Apply one frame of damping to the queued rotation
    pub fn update(&mut self) {
        let damping = self.settings.damping;
        self.theta += self.pending_theta * damping;
        self.phi = (self.phi + self.pending_phi * damping)
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
        self.pending_theta *= 1.0 - damping;
        self.pending_phi *= 1.0 - damping;
    }

    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.settings.fov_y_degrees.to_radians(),
            self.aspect,
            self.settings.near,
            self.settings.far,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn to_uniform(&self, lighting: &Lighting) -> CameraUniform {
        CameraUniform::new(self.view_proj(), self.eye(), lighting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Held {
        buttons: Vec<Button>,
        pointer: (f32, f32),
        scroll: f32,
    }

    impl Controller for Held {
        fn is_down(&self, button: Button) -> bool {
            self.buttons.contains(&button)
        }

        fn get_down_keys(&self) -> &[Button] {
            &self.buttons
        }

        fn pointer_delta(&self) -> (f32, f32) {
            self.pointer
        }

        fn scroll_delta(&self) -> f32 {
            self.scroll
        }
    }

    fn camera() -> OrbitCamera {
        OrbitCamera::new(CameraSettings::default(), 16.0 / 9.0)
    }

    #[test]
    fn test_starts_at_configured_eye() {
        let camera = camera();
        assert!((camera.eye() - Vec3::new(0.0, 1.5, 6.0)).length() < 1e-4);
        assert_eq!(camera.target(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = camera();
        camera.zoom(100.0);
        assert_eq!(camera.distance(), 3.0);
        camera.zoom(-100.0);
        assert_eq!(camera.distance(), 15.0);
    }

    #[test]
    fn test_rotation_is_damped() {
        let mut camera = camera();
        let start = camera.eye();
        camera.rotate(-0.5, 0.0);
        camera.update();
        let first = camera.eye();
        assert!(first != start);

        for _ in 0..400 {
            camera.update();
        }
        // The whole queued turn has been applied, distance unchanged
        let expected = Vec3::new(0.0, 1.0, 0.0)
            + Vec3::new(
                camera.distance() * camera.phi.sin() * 0.5f32.sin(),
                camera.distance() * camera.phi.cos(),
                camera.distance() * camera.phi.sin() * 0.5f32.cos(),
            );
        assert!((camera.eye() - expected).length() < 1e-3);
        assert!(((camera.eye() - camera.target()).length() - camera.distance()).abs() < 1e-4);
    }

    #[test]
    fn test_polar_angle_never_flips() {
        let mut camera = camera();
        camera.rotate(0.0, 100.0);
        for _ in 0..200 {
            camera.update();
        }
        assert!(camera.eye().y > camera.target().y);
        assert!(camera.phi > 0.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = camera();
        let clip = camera.view_proj() * camera.target().extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_wheel_and_keys() {
        let mut camera = camera();
        let before = camera.distance();
        let input = Held {
            buttons: vec![Button::ArrowLeft],
            pointer: (0.0, 0.0),
            scroll: 1.0,
        };
        camera.handle_input(&input, 720.0, 0.1);
        assert!(camera.distance() < before);
        assert!(camera.pending_theta != 0.0);
    }

    #[test]
    fn test_drag_needs_button() {
        let mut camera = camera();
        let input = Held {
            buttons: vec![],
            pointer: (50.0, 10.0),
            scroll: 0.0,
        };
        camera.handle_input(&input, 720.0, 0.016);
        assert_eq!(camera.pending_theta, 0.0);
        assert_eq!(camera.pending_phi, 0.0);
    }

    #[test]
    fn test_viewport_updates_aspect() {
        let mut camera = camera();
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect(), 2.0);
        camera.set_viewport(0, 400);
        assert_eq!(camera.aspect(), 2.0);
    }
}
