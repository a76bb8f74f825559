use shaderloop_input::HostEvent;
use shaderloop_kernel::Variant;
use std::f32::consts::TAU;

/// Canned input for a headless run: what a user of each variant would do.
///
/// `progress` runs from 0 to 1 over the simulation. The viewport is
/// `width` x `height` physical pixels.
pub fn events_at(variant: Variant, progress: f32, width: f32, height: f32) -> Vec<HostEvent> {
    let p = progress.clamp(0.0, 1.0);
    match variant {
        // drag right for the first half, then let damping settle
        Variant::Orbit if p < 0.5 => vec![HostEvent::Dragged { dx: 4.0, dy: 1.0 }],
        Variant::Orbit => Vec::new(),
        // scroll down the page, then back to the top
        Variant::Scroll => {
            let delta = height * 0.1;
            vec![HostEvent::Wheel {
                delta_y: if p < 0.6 { delta } else { -2.0 * delta },
            }]
        }
        // sweep across the middle of the window
        Variant::Hover => vec![HostEvent::CursorMoved {
            x: width * p,
            y: height * 0.5,
        }],
        // circle around the center
        Variant::Plane => {
            let a = p * TAU;
            vec![HostEvent::TouchMoved {
                x: width * (0.5 + 0.3 * a.cos()),
                y: height * (0.5 + 0.3 * a.sin()),
            }]
        }
    }
}
