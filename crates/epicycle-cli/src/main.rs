//! epicycle - TUI and CLI for Fourier epicycle drawing
//!
//! Usage:
//!   epicycle [svg_file]              Launch TUI animation
//!   epicycle trace <svg> [options]   Run headless, write the traced trail
//!   epicycle coeffs <svg> [options]  Dump harmonic amplitudes and phases
//!   epicycle benchmark <svg>         Measure setup and per-tick costs
//!   epicycle recipe <file.yaml>      Run a trace from a saved recipe

mod cli;

use std::env;
use std::fs;
use std::io::{self, stdout};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::{DynamicImage, RgbaImage};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use ratatui_image::{
    StatefulImage,
    picker::{Picker, ProtocolType},
    protocol::StatefulProtocol,
};
use resvg::usvg;
use tiny_skia::Pixmap;

use epicycle::{ChainConfig, EpicycleChain, PathSampler, Point, SvgCurve};

use cli::common::frame_to_svg;
use cli::{cmd_benchmark, cmd_coeffs, cmd_recipe, cmd_trace};

// Rendered frame dimensions; the engine's canvas is 600x600
const IMAGE_WIDTH: u32 = 600;
const IMAGE_HEIGHT: u32 = 600;

/// One full traversal of the curve takes 3 * 360 ticks at the damped base
/// speed; keep two traversals' worth of trail dots on screen.
const MAX_TRAIL: usize = 2160;

/// Rasterize the current frame (vector chain + trail) with resvg.
fn render_to_image(chain: &EpicycleChain, trail: &[Point]) -> DynamicImage {
    let svg = frame_to_svg(chain, trail);

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(&svg, &options).expect("Failed to parse generated SVG");

    let mut pixmap = Pixmap::new(IMAGE_WIDTH, IMAGE_HEIGHT).expect("Failed to create pixmap");

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let rgba = RgbaImage::from_raw(IMAGE_WIDTH, IMAGE_HEIGHT, pixmap.take())
        .expect("Failed to create image");

    DynamicImage::ImageRgba8(rgba)
}

/// Result from a background chain rebuild.
struct BuildResult {
    chain: EpicycleChain,
    sampler: PathSampler<SvgCurve>,
    build_ms: f64,
}

/// Application state for TUI
struct App {
    /// The running chain
    chain: EpicycleChain,
    /// Sampler kept for rebuilds - its cache carries over, so changing the
    /// harmonic count only integrates, never re-walks the curve
    sampler: PathSampler<SvgCurve>,
    /// Accumulated traced points (the trail)
    trail: Vec<Point>,
    /// Ticks advanced since the last rebuild
    tick: u64,
    /// Harmonic pair count for the next rebuild
    harmonics: usize,
    /// Last build time
    build_ms: f64,
    /// Animation paused?
    paused: bool,
    /// Should exit
    should_quit: bool,
    /// Is a rebuild in progress?
    is_loading: bool,
    /// Rebuild again after the current one completes
    needs_rebuild: bool,
    /// Channel to receive rebuild results
    result_rx: Receiver<BuildResult>,
    result_tx: Sender<BuildResult>,
    /// SVG file path (for the title bar)
    svg_path: String,
    /// Image picker for terminal protocol detection
    picker: Picker,
    /// Current rendered image protocol state
    image_state: Option<Box<dyn StatefulProtocol>>,
    /// Flag to indicate image needs re-rendering
    needs_image_update: bool,
}

impl App {
    fn new(svg_path: &str) -> Result<Self, String> {
        let svg_content = fs::read_to_string(svg_path)
            .map_err(|e| format!("Failed to read {}: {}", svg_path, e))?;

        let config = ChainConfig::default();

        let start = Instant::now();
        let curve = SvgCurve::from_svg(&svg_content).map_err(|e| e.to_string())?;
        let mut sampler = PathSampler::new(curve);
        let chain = EpicycleChain::build(config, &mut sampler).map_err(|e| e.to_string())?;
        let build_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (result_tx, result_rx) = mpsc::channel();

        // Initialize image picker - force Sixel protocol
        let mut picker = Picker::from_termios().unwrap_or_else(|_| Picker::new((8, 16)));
        picker.protocol_type = ProtocolType::Sixel;

        Ok(App {
            harmonics: chain.config().harmonics,
            chain,
            sampler,
            trail: Vec::new(),
            tick: 0,
            build_ms,
            paused: false,
            should_quit: false,
            is_loading: false,
            needs_rebuild: false,
            result_rx,
            result_tx,
            svg_path: svg_path.to_string(),
            picker,
            image_state: None,
            needs_image_update: true,
        })
    }

    /// Advance the animation one tick and extend the trail.
    fn step(&mut self) {
        if self.paused || self.is_loading {
            return;
        }
        self.chain.advance();
        self.trail.push(self.chain.traced_point());
        if self.trail.len() > MAX_TRAIL {
            self.trail.remove(0);
        }
        self.tick += 1;
        self.needs_image_update = true;
    }

    /// Rebuild the chain with the currently selected harmonic count on a
    /// worker thread, so integration never blocks the UI.
    fn rebuild(&mut self) {
        // Skip if already loading - mark for rebuild after completion
        if self.is_loading {
            self.needs_rebuild = true;
            return;
        }
        self.needs_rebuild = false;

        let config = ChainConfig {
            harmonics: self.harmonics,
            ..*self.chain.config()
        };
        let mut sampler = self.sampler.clone();
        let tx = self.result_tx.clone();

        self.is_loading = true;

        thread::spawn(move || {
            let start = Instant::now();
            if let Ok(chain) = EpicycleChain::build(config, &mut sampler) {
                let build_ms = start.elapsed().as_secs_f64() * 1000.0;
                let _ = tx.send(BuildResult {
                    chain,
                    sampler,
                    build_ms,
                });
            }
        });
    }

    fn check_build_result(&mut self) {
        // Drain all pending results, keep only the latest
        let mut latest: Option<BuildResult> = None;
        while let Ok(result) = self.result_rx.try_recv() {
            latest = Some(result);
        }

        if let Some(result) = latest {
            self.chain = result.chain;
            // Take the worker's sampler back: it now caches every sample
            // the new harmonics needed
            self.sampler = result.sampler;
            self.build_ms = result.build_ms;
            self.trail.clear();
            self.tick = 0;
            self.is_loading = false;
            self.needs_image_update = true;

            // If the count changed again while we were building, go again
            if self.needs_rebuild {
                self.rebuild();
            }
        }
    }

    fn update_image(&mut self) {
        if self.needs_image_update && !self.is_loading {
            let img = render_to_image(&self.chain, &self.trail);
            self.image_state = Some(self.picker.new_resize_protocol(img));
            self.needs_image_update = false;
        }
    }

    fn adjust_harmonics(&mut self, delta: i64) {
        let next = (self.harmonics as i64 + delta).max(0) as usize;
        if next != self.harmonics {
            self.harmonics = next;
            self.rebuild();
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Check for CLI subcommands
    if args.len() >= 2 {
        match args[1].as_str() {
            "trace" => {
                cmd_trace(&args[2..]);
                return;
            }
            "coeffs" => {
                cmd_coeffs(&args[2..]);
                return;
            }
            "benchmark" => {
                cmd_benchmark(&args[2..]);
                return;
            }
            "recipe" => {
                cmd_recipe(&args[2..]);
                return;
            }
            "help" | "--help" | "-h" => {
                print_usage(&args[0]);
                return;
            }
            _ => {}
        }
    }

    // Launch TUI
    let svg_path = if args.len() >= 2 && args[1].ends_with(".svg") {
        args[1].clone()
    } else {
        // Try to find a default SVG file
        let candidates = [
            "test_assets/heart.svg",
            "../test_assets/heart.svg",
            "heart.svg",
        ];

        let mut found: Option<String> = None;
        for candidate in &candidates {
            if std::path::Path::new(candidate).exists() {
                found = Some(candidate.to_string());
                break;
            }
        }

        match found {
            Some(path) => path,
            None => {
                eprintln!("Usage: epicycle <svg_file>");
                eprintln!();
                eprintln!("No SVG file specified and no default found.");
                eprintln!("Please provide an SVG file with a closed path.");
                eprintln!();
                eprintln!("Examples:");
                eprintln!("  epicycle drawing.svg");
                eprintln!("  epicycle trace drawing.svg -n 100 -o trail.svg");
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = run_tui(&svg_path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!("epicycle - redraw a closed SVG path with rotating vectors");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} [svg_file]                      Launch TUI animation", prog);
    eprintln!("  {} trace <svg> [options]", prog);
    eprintln!("  {} coeffs <svg> [-n N] [-d delta] [--json]", prog);
    eprintln!("  {} benchmark <svg> [-n N] [-d delta] [-t ticks]", prog);
    eprintln!("  {} recipe <file.yaml>", prog);
    eprintln!();
    eprintln!("Trace options:");
    eprintln!("  -n, --harmonics <N>    Harmonic pairs (default: 200)");
    eprintln!("  -d, --delta <step>     Integration step in (0,1] (default: 0.001)");
    eprintln!("  -t, --ticks <count>    Animation ticks to run (default: 1080)");
    eprintln!("  -s, --scale <factor>   Visual amplitude scale (default: 100)");
    eprintln!("  -o, --output <file>    Output file (- for stdout, default: stdout)");
    eprintln!("  -f, --format <fmt>     Output format: svg, json (default: svg)");
    eprintln!("  --connect              Join trail points into a polyline");
    eprintln!();
    eprintln!("Stdin support:");
    eprintln!("  Use '-' as input file to read SVG from stdin:");
    eprintln!("  cat drawing.svg | {} trace - -o -", prog);
    eprintln!();
    eprintln!("TUI Controls:");
    eprintln!("  Space         Pause/resume");
    eprintln!("  + / -         More/fewer harmonics (rebuilds the chain)");
    eprintln!("  r             Clear the trail");
    eprintln!("  q / Esc       Quit");
}

fn run_tui(svg_path: &str) -> Result<(), String> {
    // Initialize terminal
    enable_raw_mode().map_err(|e| e.to_string())?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| e.to_string())?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout())).map_err(|e| e.to_string())?;

    // Create app
    let mut app = App::new(svg_path)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().map_err(|e| e.to_string())?;
    stdout()
        .execute(LeaveAlternateScreen)
        .map_err(|e| e.to_string())?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), String> {
    loop {
        // Check for completed rebuilds (non-blocking)
        app.check_build_result();

        // One advance per externally driven tick
        app.step();

        // Update the rendered image if needed
        app.update_image();

        terminal
            .draw(|frame| ui(frame, app))
            .map_err(|_| "Draw error".to_string())?;

        if event::poll(Duration::from_millis(50)).map_err(|e| e.to_string())? {
            if let Event::Key(key) = event::read().map_err(|e| e.to_string())? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            app.should_quit = true;
                        }
                        KeyCode::Char(' ') => {
                            app.paused = !app.paused;
                        }
                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.adjust_harmonics(10);
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.adjust_harmonics(-10);
                        }
                        KeyCode::Char('r') => {
                            app.trail.clear();
                            app.needs_image_update = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(40)])
        .split(frame.area());

    let sidebar_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(7)])
        .split(layout[0]);

    // Stats panel
    let status = if app.is_loading {
        "building..."
    } else if app.paused {
        "paused"
    } else {
        "running"
    };
    let stats_text = format!(
        "Harmonics: ±{}\nVectors: {}\nTick: {}\nTrail: {} pts\nSetup: {:.0}ms\nState: {}",
        app.harmonics,
        app.chain.harmonics().len(),
        app.tick,
        app.trail.len(),
        app.build_ms,
        status,
    );
    let stats = Paragraph::new(stats_text)
        .block(
            Block::default()
                .title(" Epicycles ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(stats, sidebar_layout[0]);

    // Help
    let help = Paragraph::new("space pause\n+/- harmonics\nr clear trail\nq quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, sidebar_layout[1]);

    // Image panel
    let border_color = if app.is_loading {
        Color::Yellow
    } else {
        Color::Green
    };
    let image_block = Block::default()
        .title(format!(" {} ", app.svg_path))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_area = image_block.inner(layout[1]);
    frame.render_widget(image_block, layout[1]);

    // Render the image using ratatui-image
    if let Some(ref mut image_state) = app.image_state {
        let image_widget = StatefulImage::new(None);
        frame.render_stateful_widget(image_widget, inner_area, image_state);
    }
}
