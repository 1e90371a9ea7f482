//! Main entry point for the PosterForge composition studio

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Stdout},
    panic,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use posterforge::{
    color::Rgba,
    composition::CompositionModel,
    config::Config,
    export::export_poster,
    fonts::FontCatalog,
    input::handle_event,
    state::AppState,
    style::StyleEdit,
    terminal_capabilities::detect_capabilities,
    ui,
    worker::{spawn_workers, WorkerHandle},
};

/// Target frame time for 60 FPS
const FRAME_TIME_MS: u64 = 16;

struct CliArgs {
    image: Option<PathBuf>,
    caption: Option<String>,
    bar_color: Option<String>,
    text_color: Option<String>,
    font_size: Option<f32>,
    bold: bool,
    italic: bool,
    export_once: bool,
    output: Option<PathBuf>,
    scale: Option<f32>,
}

fn parse_args() -> CliArgs {
    let mut args = CliArgs {
        image: None,
        caption: None,
        bar_color: None,
        text_color: None,
        font_size: None,
        bold: false,
        italic: false,
        export_once: false,
        output: None,
        scale: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(a) = iter.next() {
        match a.as_str() {
            "--image" => args.image = iter.next().map(PathBuf::from),
            "--caption" => args.caption = iter.next(),
            "--bar-color" => args.bar_color = iter.next(),
            "--text-color" => args.text_color = iter.next(),
            "--font-size" => args.font_size = iter.next().and_then(|s| s.parse().ok()),
            "--bold" => args.bold = true,
            "--italic" => args.italic = true,
            "--export-once" => args.export_once = true,
            "--output" => args.output = iter.next().map(PathBuf::from),
            "--scale" => args.scale = iter.next().and_then(|s| s.parse().ok()),
            _ => {}
        }
    }

    args
}

fn main() -> Result<()> {
    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let args = parse_args();

    // Load configuration
    let config = Config::load().unwrap_or_default();

    // The font catalog is immutable after startup and shared with workers
    let fonts = Arc::new(FontCatalog::load());
    if fonts.is_empty() {
        eprintln!("Warning: no system fonts found; captions cannot be rendered");
    }

    // Headless export: compose and write the PNG without entering the TUI
    if args.export_once {
        return run_export_once(&args, &config, &fonts);
    }

    // Detect terminal capabilities
    let capabilities = detect_capabilities();

    // Spawn worker threads
    let workers = spawn_workers(Arc::clone(&fonts));

    // Create application state
    let mut app_state = AppState::new(config, capabilities, workers.request_tx.clone());
    apply_style_args(&mut app_state, &args);

    if let Some(path) = args.image {
        app_state.request_photo_load(path);
    }

    // Initialize terminal (only needed for interactive TUI)
    let mut terminal = setup_terminal()?;

    // Run main event loop
    let result = run_event_loop(&mut terminal, &mut app_state, &workers);

    // Cleanup
    cleanup_terminal(terminal)?;

    // Shutdown workers
    workers.shutdown();

    result
}

/// Apply style flags to a fresh session
fn apply_style_args(state: &mut AppState, args: &CliArgs) {
    if let Some(ref caption) = args.caption {
        state.apply_style_edit(StyleEdit::SetCaption(caption.clone()));
    }
    if let Some(color) = args.bar_color.as_deref().and_then(Rgba::parse_hex) {
        state.apply_style_edit(StyleEdit::SetFooterColor(color));
    }
    if let Some(color) = args.text_color.as_deref().and_then(Rgba::parse_hex) {
        state.apply_style_edit(StyleEdit::SetTextColor(color));
    }
    if let Some(size) = args.font_size {
        state.apply_style_edit(StyleEdit::SetFontSize(size));
    }
    if args.bold {
        state.apply_style_edit(StyleEdit::ToggleBold);
    }
    if args.italic {
        state.apply_style_edit(StyleEdit::ToggleItalic);
    }
}

/// Set up the terminal for TUI rendering
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn cleanup_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main event loop - handles input, processes worker messages, renders UI
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app_state: &mut AppState,
    workers: &WorkerHandle,
) -> Result<()> {
    let frame_duration = Duration::from_millis(FRAME_TIME_MS);

    loop {
        let frame_start = Instant::now();

        // Render UI
        terminal.draw(|frame| ui::render(frame, app_state))?;

        // Poll for events with timeout
        let timeout = frame_duration.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            let event = event::read()?;

            // Handle terminal resize
            if let Event::Resize(width, height) = event {
                app_state.set_terminal_size(width, height);
                app_state.trigger_preview();
            }

            // Handle input
            handle_event(event, app_state)?;
        }

        // Process worker responses (non-blocking)
        while let Ok(response) = workers.response_rx.try_recv() {
            app_state.handle_worker_response(response);
        }

        // Record frame time for performance monitoring
        let frame_time = frame_start.elapsed();
        app_state.perf_metrics.record_frame(frame_time);

        // Check for quit
        if app_state.should_quit {
            break;
        }
    }

    // Save configuration on exit, carrying the session's style forward
    app_state.snapshot_config();
    if let Err(e) = app_state.config.save() {
        eprintln!("Warning: Failed to save config: {}", e);
    }

    Ok(())
}

/// Compose once and write the PNG, no TUI.
fn run_export_once(args: &CliArgs, config: &Config, fonts: &FontCatalog) -> Result<()> {
    let Some(ref image_path) = args.image else {
        anyhow::bail!("--export-once requires --image <path>");
    };

    let photo = posterforge::asset::load_photo(image_path)?;
    let asset = posterforge::asset::PhotoAsset::new(photo, Some(image_path.clone()), 0);

    let mut style = config.style.to_style_state();
    if let Some(ref caption) = args.caption {
        style = style.apply(StyleEdit::SetCaption(caption.clone()));
    }
    if let Some(color) = args.bar_color.as_deref().and_then(Rgba::parse_hex) {
        style = style.apply(StyleEdit::SetFooterColor(color));
    }
    if let Some(color) = args.text_color.as_deref().and_then(Rgba::parse_hex) {
        style = style.apply(StyleEdit::SetTextColor(color));
    }
    if let Some(size) = args.font_size {
        style = style.apply(StyleEdit::SetFontSize(size));
    }
    if args.bold {
        style = style.apply(StyleEdit::ToggleBold);
    }
    if args.italic {
        style = style.apply(StyleEdit::ToggleItalic);
    }

    let model = CompositionModel::derive(Some(&asset), &style);
    let plan = model
        .poster
        .ok_or_else(|| anyhow::anyhow!("Nothing to compose"))?;

    let scale = args.scale.unwrap_or(config.export.scale);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.export.filename));

    let start = Instant::now();
    let written = export_poster(&plan, fonts, scale, &output)?;
    println!(
        "Exported {} ({}ms)",
        written.display(),
        start.elapsed().as_millis()
    );

    Ok(())
}
