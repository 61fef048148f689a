use std::hash::Hash;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;

/// Smallest card that still fits a border and one line of text
const MIN_CARD_COLS: u16 = 3;
const MIN_CARD_ROWS: u16 = 3;

pub struct CarouselWidget;

impl CarouselWidget {
    /// Draw the shown strip's cards, each scaled by its distance from the
    /// viewport center. `label` turns a model value into card text.
    pub fn render<M, F>(frame: &mut Frame, area: Rect, app: &App<M>, label: F)
    where
        M: Clone + Eq + Hash,
        F: Fn(&M) -> String,
    {
        let theme = &app.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);

        let carousel = app.carousel();
        let Some(buffer) = carousel.buffer() else {
            let empty = Paragraph::new("No items")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.grey1).bg(theme.bg0));
            frame.render_widget(empty, area);
            return;
        };

        let strip = app.host().strip(app.host().shown());
        let units = app.config.ui.units_per_column.max(1.0);
        let center = strip.viewport_center();

        let mut cards: Vec<(usize, f64)> = strip
            .visible_range()
            .filter_map(|position| strip.card_center(position).map(|x| (position, x)))
            .collect();
        // farthest first so the nearest card ends up on top
        cards.sort_by(|a, b| (b.1 - center).abs().total_cmp(&(a.1 - center).abs()));

        let centered = carousel.centered().map(|e| e.position);
        let slow = carousel.slow_centered().map(|e| e.position);

        for (position, x) in cards {
            let Some(element) = buffer.get(position) else {
                continue;
            };
            let scale = carousel.scale_for(x - center);
            let width = ((strip.card_width() * scale) / units).round() as u16;
            let height = (area.height as f64 * scale).round() as u16;
            let Some(rect) = card_rect(area, x / units, width, height) else {
                continue;
            };

            let border = if centered == Some(position) {
                theme.centered
            } else if slow == Some(position) {
                theme.slow_target
            } else {
                theme.card
            };

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(theme.bg0));
            let inner_width = rect.width.saturating_sub(2) as usize;
            let mut title_style = Style::default().fg(theme.fg0);
            if centered == Some(position) {
                title_style = title_style.add_modifier(Modifier::BOLD);
            }
            let lines = vec![
                Line::styled(truncate_to_width(&label(&element.value), inner_width), title_style),
                Line::styled(
                    truncate_to_width(&format!("#{} {:.0}%", position, scale * 100.0), inner_width),
                    Style::default().fg(theme.grey1),
                ),
            ];

            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center).block(block),
                rect,
            );
        }
    }
}

/// Rectangle for a card centered at column `center_col` (relative to the
/// area's left edge), clipped to `area`. None when nothing is left to draw.
fn card_rect(area: Rect, center_col: f64, width: u16, height: u16) -> Option<Rect> {
    let width = width.max(MIN_CARD_COLS);
    let height = height.clamp(MIN_CARD_ROWS.min(area.height), area.height);

    let left = area.x as f64 + center_col - width as f64 / 2.0;
    let right = left + width as f64;
    let x0 = left.round().max(area.x as f64);
    let x1 = right.round().min(area.right() as f64);
    if x1 - x0 < 1.0 || height == 0 {
        return None;
    }

    let y = area.y + (area.height - height) / 2;
    Some(Rect::new(x0 as u16, y, (x1 - x0) as u16, height))
}

/// Cut `text` to at most `max` display columns, marking the cut with an ellipsis
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
