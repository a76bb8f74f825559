/// A raw event from the windowing host, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    CursorMoved { x: f32, y: f32 },
    /// First touch point moved.
    TouchMoved { x: f32, y: f32 },
    /// Wheel or trackpad scroll; positive scrolls down the page.
    Wheel { delta_y: f32 },
    /// Absolute scroll position reported by a host that owns the page.
    ScrollTo { offset: f32, content_height: f32 },
    Resized { width: u32, height: u32, scale: f32 },
    /// Pointer drag with a button held.
    Dragged { dx: f32, dy: f32 },
}
