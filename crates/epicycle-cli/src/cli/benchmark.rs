//! `benchmark` command - measure the one-time setup cost (coefficient
//! integration) and the per-tick advance cost.

use std::time::Instant;

use epicycle::ChainConfig;

use crate::cli::common::{build_chain, read_svg_input};

pub fn cmd_benchmark(args: &[String]) {
    let mut svg_path: Option<&str> = None;
    let mut config = ChainConfig::default();
    let mut ticks: usize = 1000;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--harmonics" => {
                i += 1;
                if i < args.len() {
                    config.harmonics = args[i].parse().unwrap_or(config.harmonics);
                }
            }
            "-d" | "--delta" => {
                i += 1;
                if i < args.len() {
                    config.delta = args[i].parse().unwrap_or(config.delta);
                }
            }
            "-t" | "--ticks" => {
                i += 1;
                if i < args.len() {
                    ticks = args[i].parse().unwrap_or(ticks);
                }
            }
            path if !path.starts_with('-') => {
                if svg_path.is_none() {
                    svg_path = Some(path);
                }
            }
            // Ignore unknown flags
            _ => {}
        }
        i += 1;
    }

    let svg_path = svg_path.unwrap_or_else(|| {
        eprintln!("Error: SVG file required");
        std::process::exit(1);
    });

    println!("Loading: {}", svg_path);
    let svg_content = match read_svg_input(svg_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let start_setup = Instant::now();
    let (sampler, mut chain) = match build_chain(&svg_content, config) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let setup_time = start_setup.elapsed();

    let start_advance = Instant::now();
    for _ in 0..ticks {
        chain.advance();
    }
    let advance_time = start_advance.elapsed();

    println!("\n═══════════════════════════════════════════════");
    println!("  EPICYCLE BENCHMARK");
    println!("═══════════════════════════════════════════════");
    println!("  Harmonic pairs: {}", config.harmonics);
    println!("  Integration step: {}", config.delta);
    println!("  Curve samples: {}", sampler.cached_samples());
    println!("  Setup: {:.2}ms", setup_time.as_secs_f64() * 1000.0);
    println!("  Advance: {} ticks in {:.2}ms", ticks, advance_time.as_secs_f64() * 1000.0);
    if ticks > 0 {
        println!(
            "  Avg per tick: {:.4}ms",
            advance_time.as_secs_f64() * 1000.0 / ticks as f64
        );
    }
    println!("═══════════════════════════════════════════════");
}
