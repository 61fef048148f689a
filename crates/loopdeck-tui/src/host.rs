//! Two overlaid strips acting as the carousel's render surface

use loopdeck_core::{config::UiConfig, RenderSurface, SurfaceId};

use crate::strip::Strip;

/// The pair of strips behind the terminal carousel.
///
/// Only the visible strip takes user input; the hidden one is free to be
/// jumped around by the reset logic.
#[derive(Debug, Clone)]
pub struct StripHost {
    strips: [Strip; 2],
    interaction_enabled: bool,
}

impl StripHost {
    pub fn new(ui: &UiConfig, viewport_width: f64) -> Self {
        let make = || Strip::new(ui.card_width, ui.card_spacing, viewport_width, ui.scroll.clone());
        let mut strips = [make(), make()];
        strips[SurfaceId::Front.index()].set_visible(true);
        Self {
            strips,
            interaction_enabled: true,
        }
    }

    pub fn strip(&self, id: SurfaceId) -> &Strip {
        &self.strips[id.index()]
    }

    /// The strip currently on screen
    pub fn shown(&self) -> SurfaceId {
        SurfaceId::ALL
            .into_iter()
            .find(|id| self.strips[id.index()].is_visible())
            .unwrap_or(SurfaceId::Front)
    }

    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        for strip in &mut self.strips {
            strip.set_viewport_width(width);
        }
    }

    /// Drag the shown strip. Ignored while interaction is disabled.
    pub fn drag_by(&mut self, delta: f64) -> bool {
        if !self.interaction_enabled {
            return false;
        }
        let shown = self.shown();
        self.strips[shown.index()].drag_by(delta);
        true
    }

    /// Glide the shown strip. Ignored while interaction is disabled.
    pub fn fling(&mut self, distance: f64) -> bool {
        if !self.interaction_enabled {
            return false;
        }
        let shown = self.shown();
        self.strips[shown.index()].fling(distance);
        true
    }

    /// Step both strips one frame and collect every disappearance
    pub fn advance(&mut self) -> Vec<(SurfaceId, usize)> {
        let mut gone = Vec::new();
        for id in SurfaceId::ALL {
            gone.extend(self.strips[id.index()].advance().into_iter().map(|p| (id, p)));
        }
        gone
    }

    pub fn is_animating(&self) -> bool {
        self.strips.iter().any(Strip::is_animating)
    }
}

impl RenderSurface for StripHost {
    fn viewport_center_x(&self) -> f64 {
        self.strips[self.shown().index()].viewport_center()
    }

    fn card_center_x(&self, surface: SurfaceId, position: usize) -> Option<f64> {
        self.strips[surface.index()].card_center(position)
    }

    fn set_len(&mut self, len: usize) {
        for strip in &mut self.strips {
            strip.set_len(len);
        }
    }

    fn visible_positions(&self, surface: SurfaceId) -> Vec<usize> {
        self.strips[surface.index()].visible_range().collect()
    }

    fn scroll_to(&mut self, surface: SurfaceId, position: usize, animated: bool) {
        self.strips[surface.index()].scroll_to(position, animated);
    }

    fn set_surface_visible(&mut self, surface: SurfaceId, visible: bool) {
        self.strips[surface.index()].set_visible(visible);
    }

    fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopdeck_core::ScrollConfig;

    fn host() -> StripHost {
        let ui = UiConfig {
            card_width: 100.0,
            card_spacing: 0.0,
            scroll: ScrollConfig {
                smooth_enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut host = StripHost::new(&ui, 300.0);
        host.set_len(30);
        host
    }

    #[test]
    fn test_drag_moves_shown_strip_only() {
        let mut host = host();
        host.scroll_to(SurfaceId::Front, 10, false);
        host.scroll_to(SurfaceId::Back, 10, false);

        assert!(host.drag_by(40.0));
        assert_eq!(host.strip(SurfaceId::Front).offset(), 940.0);
        assert_eq!(host.strip(SurfaceId::Back).offset(), 900.0);
    }

    #[test]
    fn test_interaction_lock() {
        let mut host = host();
        host.set_interaction_enabled(false);
        assert!(!host.drag_by(40.0));
        assert!(!host.fling(400.0));
        assert_eq!(host.strip(SurfaceId::Front).offset(), 0.0);
    }

    #[test]
    fn test_visibility_switch_changes_shown() {
        let mut host = host();
        assert_eq!(host.shown(), SurfaceId::Front);
        host.set_surface_visible(SurfaceId::Front, false);
        host.set_surface_visible(SurfaceId::Back, true);
        assert_eq!(host.shown(), SurfaceId::Back);
    }

    #[test]
    fn test_advance_tags_surface() {
        let mut host = host();
        host.scroll_to(SurfaceId::Back, 10, false);
        host.advance();
        host.scroll_to(SurfaceId::Back, 20, false);
        let gone = host.advance();
        assert!(gone.iter().all(|(id, _)| *id == SurfaceId::Back));
        assert_eq!(gone, vec![(SurfaceId::Back, 9), (SurfaceId::Back, 10), (SurfaceId::Back, 11)]);
    }
}
