use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Window events delivered to the renderer once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Resized { width: u32, height: u32 },
    CursorMoved { x: f32, y: f32 },
    MouseButton { button: MouseButton, pressed: bool },
    /// Scroll in lines.
    MouseWheel { dx: f32, dy: f32 },
    Key { code: u32, pressed: bool },
    CloseRequested,
}

/// A window (or offscreen surface) with a drawable context.
///
/// The renderer draws into whichever target is current. Making a target
/// current binds its context to the device.
pub trait RenderTarget {
    fn id(&self) -> WindowId;

    fn is_open(&self) -> bool;

    /// Drawable size in pixels.
    fn size(&self) -> (u32, u32);

    fn make_current(&mut self) -> Result<()>;

    /// Drains events received since the last call.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    fn swap_buffers(&mut self) -> Result<()>;
}
