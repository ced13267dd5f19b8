use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

use metrics_dashboard::app::export_data;
use metrics_dashboard::config::{DashboardConfig, SourceKind};
use metrics_dashboard::data::{DeltaMode, TimeHorizon};
use metrics_dashboard::logging::init_logging;
use metrics_dashboard::source::Loader;
use metrics_dashboard::ui::{self, table, Theme};
use metrics_dashboard::{events, App};

#[derive(Parser, Debug)]
#[command(name = "metrics-dashboard")]
#[command(about = "Terminal dashboard for business metrics")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data source: mock, file or http
    #[arg(short, long)]
    source: Option<SourceKind>,

    /// Read dashboard data from a JSON file (implies --source file)
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Fetch dashboard data from a backend base URL (implies --source http)
    #[arg(short, long)]
    url: Option<String>,

    /// Initial time horizon: hour, day, week or month
    #[arg(long)]
    horizon: Option<TimeHorizon>,

    /// Initial delta mode: pct or abs
    #[arg(short, long)]
    delta_mode: Option<DeltaMode>,

    /// Refetch interval in seconds (0 disables)
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Seed for the sample data generator
    #[arg(long)]
    seed: Option<u64>,

    /// Dashboard title
    #[arg(long)]
    title: Option<String>,

    /// Fetch once, export to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    apply_args(&mut config, &args);

    let logging = match init_logging(&config.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };
    info!(source = ?config.source.kind, horizon = %config.time_horizon, "starting");

    // Handle export mode (non-interactive)
    let result = match args.export {
        Some(ref export_path) => export_to_file(&config, export_path),
        None => run_tui(&config),
    };

    if let Err(ref e) = result {
        error!(error = %e, "exiting with error");
        if let Some(ref guard) = logging {
            eprintln!("See the log for details: {}", guard.path().display());
        }
    }
    result
}

/// Command line flags override every other configuration layer.
fn apply_args(config: &mut DashboardConfig, args: &Args) {
    if let Some(ref path) = args.file {
        config.source.kind = SourceKind::File;
        config.source.path = Some(path.clone());
    }
    if let Some(ref url) = args.url {
        config.source.kind = SourceKind::Http;
        config.source.url = Some(url.clone());
    }
    if let Some(kind) = args.source {
        config.source.kind = kind;
    }
    if let Some(horizon) = args.horizon {
        config.time_horizon = horizon;
    }
    if let Some(mode) = args.delta_mode {
        config.delta_mode = mode;
    }
    if let Some(refresh) = args.refresh {
        config.refresh_secs = refresh;
    }
    if let Some(seed) = args.seed {
        config.source.seed = seed;
    }
    if let Some(ref title) = args.title {
        config.title = title.clone();
    }
}

/// Run the TUI with the configured data source
fn run_tui(config: &DashboardConfig) -> Result<()> {
    let adapter = config.build_adapter()?;

    // Fetches run on the runtime while the TUI owns the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let loader = Loader::new(adapter, rt.handle().clone());

    let theme = Theme::auto_detect();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Create app and start the initial fetch
    let mut app = App::new(loader, config).with_theme(theme);
    app.request_load();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, config.refresh_interval());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Option<Duration>,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        app.poll_loader();

        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    events::handle_mouse_event(app, mouse, ui::TABLE_START_ROW, table::ROW_HEIGHT)
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Periodic refetch
        if let Some(interval) = refresh_interval {
            if last_refresh.elapsed() >= interval && !app.is_loading() {
                app.request_load();
                last_refresh = Instant::now();
            }
        }
    }

    Ok(())
}

/// Fetch the configured horizon once and write it to a JSON file
fn export_to_file(config: &DashboardConfig, export_path: &std::path::Path) -> Result<()> {
    let adapter = config.build_adapter()?;
    let rt = tokio::runtime::Runtime::new()?;

    let source = adapter.description().to_string();
    let data = rt
        .block_on(adapter.get_metrics(config.time_horizon))
        .with_context(|| format!("failed to fetch metrics from {source}"))?;

    export_data(&data, export_path)?;
    if data.categories.is_empty() {
        warn!("exported snapshot has no categories");
    }

    println!(
        "Exported {} metrics ({}) to: {}",
        data.metric_count(),
        config.time_horizon,
        export_path.display()
    );
    Ok(())
}
