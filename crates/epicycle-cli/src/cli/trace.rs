//! `trace` command - run the engine for a number of ticks and write the
//! traced trail as SVG or JSON.

use serde::Serialize;

use epicycle::{ChainConfig, Point};

use crate::cli::common::{OutputFormat, build_chain, read_svg_input, trail_to_svg, write_output};

/// Everything a trace run needs; shared with the `recipe` command.
pub struct TraceParams {
    pub svg_path: String,
    pub harmonics: usize,
    pub delta: f64,
    pub scale: f64,
    pub ticks: usize,
    pub connect: bool,
    pub format: OutputFormat,
    pub output: Option<String>,
}

impl Default for TraceParams {
    fn default() -> Self {
        let config = ChainConfig::default();
        Self {
            svg_path: String::new(),
            harmonics: config.harmonics,
            delta: config.delta,
            scale: config.amplitude_scale,
            // The base harmonic advances 1/3 degree per tick, so one full
            // traversal of the curve is 3 * 360 ticks.
            ticks: 1080,
            connect: false,
            format: OutputFormat::Svg,
            output: None,
        }
    }
}

/// A traced point in JSON output format.
#[derive(Serialize)]
struct JsonPoint {
    x: f64,
    y: f64,
}

/// JSON output: the full trail in tick order.
#[derive(Serialize)]
struct JsonTrail {
    harmonics: usize,
    ticks: usize,
    points: Vec<JsonPoint>,
}

pub fn cmd_trace(args: &[String]) {
    let mut params = TraceParams::default();
    let mut svg_path: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--harmonics" => {
                i += 1;
                if i < args.len() {
                    params.harmonics = args[i].parse().unwrap_or(params.harmonics);
                }
            }
            "-d" | "--delta" => {
                i += 1;
                if i < args.len() {
                    params.delta = args[i].parse().unwrap_or(params.delta);
                }
            }
            "-t" | "--ticks" => {
                i += 1;
                if i < args.len() {
                    params.ticks = args[i].parse().unwrap_or(params.ticks);
                }
            }
            "-s" | "--scale" => {
                i += 1;
                if i < args.len() {
                    params.scale = args[i].parse().unwrap_or(params.scale);
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    params.output = Some(args[i].clone());
                }
            }
            "-f" | "--format" => {
                i += 1;
                if i < args.len() {
                    params.format = match args[i].to_lowercase().as_str() {
                        "json" => OutputFormat::Json,
                        "svg" => OutputFormat::Svg,
                        other => {
                            eprintln!("Unknown format: {}. Use 'svg' or 'json'.", other);
                            std::process::exit(1);
                        }
                    };
                }
            }
            "--connect" => {
                params.connect = true;
            }
            // "-" is stdin, anything else starting with '-' is an
            // unknown flag, not a path
            path if path == "-" || !path.starts_with('-') => {
                if svg_path.is_none() {
                    svg_path = Some(path);
                }
            }
            _ => {}
        }
        i += 1;
    }

    let svg_path = svg_path.unwrap_or_else(|| {
        eprintln!("Error: SVG file required (use '-' for stdin)");
        std::process::exit(1);
    });
    params.svg_path = svg_path.to_string();

    if let Err(e) = run_trace(&params) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Run the engine and write the trail. Shared by `trace` and `recipe`.
pub fn run_trace(params: &TraceParams) -> Result<(), String> {
    let svg_content = read_svg_input(&params.svg_path)?;

    let config = ChainConfig {
        harmonics: params.harmonics,
        delta: params.delta,
        amplitude_scale: params.scale,
        ..ChainConfig::default()
    };

    let start = std::time::Instant::now();
    let (_sampler, mut chain) = build_chain(&svg_content, config)?;
    eprintln!("Setup: {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    let mut trail: Vec<Point> = Vec::with_capacity(params.ticks);
    for _ in 0..params.ticks {
        chain.advance();
        trail.push(chain.traced_point());
    }
    eprintln!("Traced {} points over {} ticks", trail.len(), params.ticks);

    let output = match params.format {
        OutputFormat::Svg => trail_to_svg(&trail, params.connect),
        OutputFormat::Json => {
            let out = JsonTrail {
                harmonics: params.harmonics,
                ticks: params.ticks,
                points: trail.iter().map(|p| JsonPoint { x: p.x, y: p.y }).collect(),
            };
            serde_json::to_string(&out).map_err(|e| format!("Failed to serialize JSON: {}", e))?
        }
    };

    write_output(params.output.as_deref(), &output)
}
