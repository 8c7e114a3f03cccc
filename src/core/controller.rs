/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    Space,
    Escape,
    MouseLeft,
    MouseRight,
}

/// Controller - held buttons plus pointer motion accumulated since the last reset
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];

    /// Pointer movement in pixels
    fn pointer_delta(&self) -> (f32, f32);

    /// Wheel movement in lines, positive away from the user
    fn scroll_delta(&self) -> f32;
}
