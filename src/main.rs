use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::{error, info, warn};

use clone_os::app::App;
use clone_os::config::{self, Config};
use clone_os::core::Context;
use clone_os::domain::Profile;
use clone_os::event::{handle_key, handle_mouse};
use clone_os::infrastructure::{logging, RuntimeBridge};
use clone_os::service::StubAiService;
use clone_os::shell::Registry;
use clone_os::ui;

#[derive(Debug, Parser)]
#[command(
    name = "clone-os",
    version,
    about = "Clone-OS: a terminal dashboard of AI-assisted applications"
)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated service latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Fail every Nth service call (0 disables)
    #[arg(long)]
    fail_every: Option<u64>,

    /// Log filter, e.g. "clone_os=debug"
    #[arg(long)]
    log_filter: Option<String>,

    /// UI tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(latency) = self.latency_ms {
            config.service.latency_ms = latency;
        }
        if let Some(every) = self.fail_every {
            config.service.fail_every = every;
        }
        if let Some(filter) = self.log_filter.as_ref() {
            config.log.filter = filter.clone();
        }
        if let Some(tick) = self.tick_ms {
            config.tick_rate_ms = tick.max(1);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let loaded = match args.config.as_ref() {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    let (mut config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    args.apply(&mut config);

    let _log_guard = logging::init(&config.log_dir(), &config.log.filter)?;
    logging::install_panic_hook();
    if let Some(err) = config_error {
        warn!(error = %err, "ignoring config file, using defaults");
    }
    info!(
        latency_ms = config.service.latency_ms,
        fail_every = config.service.fail_every,
        "starting clone-os"
    );

    let service = StubAiService::new(config.service.latency(), config.service.fail_every());
    let bridge = RuntimeBridge::new(Arc::new(service), config.service.timeout())?;

    let mut ctx = Context::new(Profile::mock(), bridge.client());
    ctx.export_dir = config.export_dir();
    let app = App::new(Registry::default_apps(), ctx);

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, &bridge, config.tick_rate());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "event loop failed");
        eprintln!("{err:?}");
    }
    info!("clone-os stopped");

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    bridge: &RuntimeBridge,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();
    let mut size = Rect::default();

    loop {
        pump_replies(&mut app, bridge);
        terminal.draw(|f| {
            size = f.size();
            ui::draw(f, &mut app);
        })?;
        if app.should_quit {
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse, size),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_replies(app: &mut App, bridge: &RuntimeBridge) {
    for reply in bridge.poll_events() {
        app.ingest_reply(reply);
    }
}
