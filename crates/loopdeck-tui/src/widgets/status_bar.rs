use std::hash::Hash;

use loopdeck_core::{ResetPhase, SurfaceId};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render<M>(frame: &mut Frame, area: Rect, app: &App<M>)
    where
        M: Clone + Eq + Hash,
    {
        let theme = &app.theme;
        let carousel = app.carousel();

        let surface = match carousel.active_surface() {
            SurfaceId::Front => "FRONT",
            SurfaceId::Back => "BACK",
        };
        let phase = match carousel.reset_phase() {
            ResetPhase::Stable => "stable",
            ResetPhase::PendingReset => "reset due",
            ResetPhase::Swapping { .. } => "swapping",
        };
        let centered = carousel
            .centered()
            .map(|e| format!("#{}", e.position))
            .unwrap_or_else(|| "-".to_string());
        let state = carousel.reset_state();
        let config = carousel.config();

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} | centered {} | dwell {}/{} | lost {}/{} | {} | swaps {}{}",
                surface,
                centered,
                carousel.dwell().min(config.dwell_threshold().saturating_add(1)),
                config.dwell_threshold().saturating_add(1),
                state.disappear_count,
                config.disappear_threshold.saturating_add(1),
                phase,
                carousel.stats().swaps,
                if carousel.interaction_enabled() { "" } else { " | locked" },
            )
        };

        let status_style = if carousel.reset_phase() == ResetPhase::Stable {
            Style::default().fg(theme.fg0).bg(theme.bg2)
        } else {
            Style::default().fg(theme.warning).bg(theme.bg2)
        };

        let help_hint = " q:quit h/l:drag H/L:fling r:rotate ";
        let padding_len =
            (area.width as usize).saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, status_style),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
