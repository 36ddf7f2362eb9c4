//! `recipe` command - drive a trace run from a YAML file instead of
//! command-line flags, so a drawing setup can be kept and re-run.
//!
//! ```yaml
//! svg: heart.svg
//! harmonics: 120
//! delta: 0.001
//! ticks: 1080
//! connect: true
//! format: svg
//! output: heart-trace.svg
//! ```

use chrono::Local;
use serde::Deserialize;

use epicycle::ChainConfig;

use crate::cli::common::OutputFormat;
use crate::cli::trace::{TraceParams, run_trace};

/// A saved drawing setup. Only `svg` is required; everything else falls
/// back to the engine defaults.
#[derive(Deserialize)]
struct Recipe {
    svg: String,
    harmonics: Option<usize>,
    delta: Option<f64>,
    scale: Option<f64>,
    ticks: Option<usize>,
    connect: Option<bool>,
    format: Option<String>,
    output: Option<String>,
}

pub fn cmd_recipe(args: &[String]) {
    let recipe_path = args.first().unwrap_or_else(|| {
        eprintln!("Error: recipe file required");
        eprintln!("Usage: epicycle recipe <file.yaml>");
        std::process::exit(1);
    });

    let content = match std::fs::read_to_string(recipe_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", recipe_path, e);
            std::process::exit(1);
        }
    };

    let recipe: Recipe = match serde_yaml::from_str(&content) {
        Ok(recipe) => recipe,
        Err(e) => {
            eprintln!("Error parsing {}: {}", recipe_path, e);
            std::process::exit(1);
        }
    };

    let defaults = ChainConfig::default();
    let format = match recipe.format.as_deref() {
        Some("json") => OutputFormat::Json,
        Some("svg") | None => OutputFormat::Svg,
        Some(other) => {
            eprintln!("Unknown format in recipe: {}. Use 'svg' or 'json'.", other);
            std::process::exit(1);
        }
    };

    // Unlike the trace command, recipes default to a timestamped file
    // rather than stdout - they exist to produce keepable artifacts.
    let output = recipe.output.clone().unwrap_or_else(|| {
        let ext = match format {
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
        };
        format!("trace-{}.{}", Local::now().format("%Y%m%d-%H%M%S"), ext)
    });

    let base = TraceParams::default();
    let params = TraceParams {
        svg_path: recipe.svg,
        harmonics: recipe.harmonics.unwrap_or(defaults.harmonics),
        delta: recipe.delta.unwrap_or(defaults.delta),
        scale: recipe.scale.unwrap_or(defaults.amplitude_scale),
        ticks: recipe.ticks.unwrap_or(base.ticks),
        connect: recipe.connect.unwrap_or(false),
        format,
        output: Some(output),
    };

    eprintln!("Recipe: {}", recipe_path);
    if let Err(e) = run_trace(&params) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
