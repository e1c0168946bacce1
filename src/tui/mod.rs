pub mod app;
pub mod error;
pub mod layout;
pub mod render;

pub use app::{App, AppMessage, Screen};
pub use error::{TuiError, TuiResult};

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect as CellRect, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Config;
use crate::data_provider::FootballDataProvider;
use crate::live::{poller, PollSettings};
use crate::nav::RawKey;
use crate::store::ProfileStore;

type Backend = CrosstermBackend<io::Stdout>;

/// Smallest terminal that fits the sidebar and one card
const MIN_WIDTH: u16 = (layout::CONTENT_X + layout::CARD_WIDTH) as u16 + 4;
const MIN_HEIGHT: u16 = 12;

/// Input poll period while idle
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Input poll period while a hold-scroll is animating
const FRAME_POLL: Duration = Duration::from_millis(16);

/// Map terminal keys to the names remotes report
///
/// Letters stand in for remote buttons a keyboard lacks: `t` for Guide (track),
/// `f` for Play/Pause (favourite), `[`/`]` for channel down/up.
pub fn terminal_key(event: &KeyEvent) -> RawKey {
    match event.code {
        KeyCode::Char('t') => RawKey::named("Guide"),
        KeyCode::Char('f') => RawKey::named("MediaPlayPause"),
        KeyCode::Char(']') => RawKey::named("ChannelUp"),
        KeyCode::Char('[') => RawKey::named("ChannelDown"),
        _ => RawKey::from(event),
    }
}

/// Main entry point for TUI mode
pub async fn run(
    config: Config,
    provider: Arc<dyn FootballDataProvider>,
    store: Arc<dyn ProfileStore>,
) -> TuiResult<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let key_release = supports_keyboard_enhancement().unwrap_or(false);
    if key_release {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    info!("KEY: key release events {}", if key_release { "enabled" } else { "unavailable" });
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let settings = PollSettings {
        interval: Duration::from_secs(config.refresh_interval.max(1) as u64),
        lookahead: chrono::Duration::minutes(config.lookahead_minutes as i64),
    };
    let (poller, poll_events) = poller::spawn(provider.clone(), settings);

    let result = event_loop(&mut terminal, config, provider, store, &poller, poll_events).await;

    poller.shutdown().await;

    // Restore terminal
    if key_release {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<Backend>,
    config: Config,
    provider: Arc<dyn FootballDataProvider>,
    store: Arc<dyn ProfileStore>,
    poller: &poller::PollerHandle,
    mut poll_events: mpsc::Receiver<poller::PollEvent>,
) -> TuiResult<()> {
    let size = terminal.size()?;
    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        return Err(TuiError::TerminalTooSmall {
            width: size.width,
            height: size.height,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        });
    }

    let started = Instant::now();
    let now_ms = || started.elapsed().as_millis() as u64;

    let (messages_tx, mut messages) = mpsc::unbounded_channel();
    // Last terminal row is the status bar
    let mut app = App::new(
        config,
        provider,
        store,
        messages_tx,
        (size.width, size.height.saturating_sub(1)),
        now_ms(),
    );
    app.load();
    let mut last_tick = now_ms();

    loop {
        // Apply async results before drawing so the frame shows them
        while let Ok(event) = poll_events.try_recv() {
            app.apply_poll(event, now_ms());
        }
        while let Ok(message) = messages.try_recv() {
            app.handle_message(message);
        }
        if let Some(timings) = app.take_timings() {
            poller.set_rendered(timings);
        }
        if app.refresh_requested {
            app.refresh_requested = false;
            poller.refresh();
        }

        let now = now_ms();
        app.tick(now.saturating_sub(last_tick), now);
        last_tick = now;

        terminal.draw(|f| {
            let area = f.area();
            let tree_area = CellRect::new(area.x, area.y, area.width, area.height.saturating_sub(1));
            let status_area = CellRect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
            render::draw_tree(&app.tree, &app.config.theme, tree_area, f.buffer_mut());
            render::draw_status_bar(&app, now, status_area, f.buffer_mut());
        })?;

        let timeout = if app.nav.is_scrolling() { FRAME_POLL } else { IDLE_POLL };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    let raw = terminal_key(&key);
                    match key.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => app.handle_key_down(&raw, now_ms()),
                        KeyEventKind::Release => app.handle_key_up(&raw),
                    }
                }
                Event::Resize(width, height) => {
                    debug!("RENDER: resized to {}x{}", width, height);
                    app.resize(width, height.saturating_sub(1));
                }
                _ => {}
            }
        }

        if app.should_quit {
            debug!("ACTION: Quitting application");
            break;
        }
    }
    Ok(())
}
