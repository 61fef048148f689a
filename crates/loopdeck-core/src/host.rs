//! Interface the carousel needs from whatever actually draws the cards

use crate::carousel::{HostCommand, SurfaceId};

/// A pair of overlaid, independently scrollable surfaces.
///
/// Coordinates are horizontal centers in the host's layout units.
pub trait RenderSurface {
    /// Horizontal center of the viewport
    fn viewport_center_x(&self) -> f64;

    /// Horizontal center of the card at `position` on `surface`, if laid out
    fn card_center_x(&self, surface: SurfaceId, position: usize) -> Option<f64>;

    /// Lay out `len` cards on both surfaces, clamping scroll offsets into range
    fn set_len(&mut self, len: usize);

    /// Positions currently inside the viewport of `surface`
    fn visible_positions(&self, surface: SurfaceId) -> Vec<usize>;

    /// Scroll `surface` so the card at `position` is centered
    fn scroll_to(&mut self, surface: SurfaceId, position: usize, animated: bool);

    fn set_surface_visible(&mut self, surface: SurfaceId, visible: bool);

    fn set_interaction_enabled(&mut self, enabled: bool);
}

/// Apply the rendering half of a command. Timer commands are not the
/// surface's concern and are returned untouched.
pub fn apply_command<H: RenderSurface + ?Sized>(
    host: &mut H,
    command: HostCommand,
) -> Option<HostCommand> {
    match command {
        HostCommand::SetLength { len } => host.set_len(len),
        HostCommand::ScrollTo {
            surface,
            position,
            animated,
        } => host.scroll_to(surface, position, animated),
        HostCommand::SetSurfaceVisible { surface, visible } => {
            host.set_surface_visible(surface, visible)
        }
        HostCommand::SetInteractionEnabled { enabled } => host.set_interaction_enabled(enabled),
        timer @ (HostCommand::ScheduleSwap { .. } | HostCommand::CancelSwap { .. }) => {
            return Some(timer)
        }
    }
    None
}
