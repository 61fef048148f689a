use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use loopdeck_core::AppConfig;
use loopdeck_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    scroll::ScrollConfigExt,
    widgets::{CarouselWidget, StatusBarWidget},
    App,
};

use super::items_or_default;

pub async fn run(config: Arc<AppConfig>, items: Vec<String>) -> Result<()> {
    let items = items_or_default(items);
    info!(items = items.len(), "Starting carousel");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("loopdeck"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, config, items);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Arc<AppConfig>,
    items: Vec<String>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config.clone(), 0.0).with_scheduler();
    app.resize(size.width);
    app.set_source(items);

    let event_handler = EventHandler::with_frame_rate(
        config.ui.tick_rate_ms,
        config.ui.scroll.animation_tick_duration(),
    );

    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = true;
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(1)])
                .split(frame.area());

            CarouselWidget::render(frame, layout[0], &app, |item: &String| item.clone());
            StatusBarWidget::render(frame, layout[1], &app);
        })?;

        match event_handler.next(needs_fast_update)? {
            Some(AppEvent::Key(key)) => app.handle_action(handle_key_event(key)),
            Some(AppEvent::Resize(width, _)) => app.resize(width),
            Some(AppEvent::Tick) | None => {}
        }

        // Held keys must not starve the frame clock
        if last_frame.elapsed() >= event_handler.timeout(needs_fast_update) {
            app.tick();
            last_frame = Instant::now();
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    info!(stats = ?app.carousel().stats(), "Carousel closed");
    Ok(())
}
