//! `coeffs` command - build the chain and dump every harmonic's
//! parameters as a table or JSON.

use serde::Serialize;

use epicycle::ChainConfig;

use crate::cli::common::{build_chain, read_svg_input};

/// One harmonic in JSON output format.
#[derive(Serialize)]
struct JsonHarmonic {
    index: i32,
    amplitude: f64,
    phase: f64,
}

/// JSON output: harmonics in chain order.
#[derive(Serialize)]
struct JsonCoeffs {
    harmonics: Vec<JsonHarmonic>,
}

pub fn cmd_coeffs(args: &[String]) {
    let mut svg_path: Option<&str> = None;
    let mut config = ChainConfig::default();
    let mut json_output = false;

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
            "--json" => {
                json_output = true;
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

    let svg_content = match read_svg_input(svg_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let (_sampler, chain) = match build_chain(&svg_content, config) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if json_output {
        let out = JsonCoeffs {
            harmonics: chain
                .harmonics()
                .iter()
                .map(|h| JsonHarmonic {
                    index: h.index,
                    amplitude: h.amplitude,
                    phase: h.phase,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string(&out).expect("Failed to serialize JSON"));
    } else {
        println!("{:>6}  {:>12}  {:>10}", "index", "amplitude", "phase");
        println!("{:>6}  {:>12}  {:>10}", "-----", "---------", "-----");
        for h in chain.harmonics() {
            println!("{:>6}  {:>12.6}  {:>9.2}°", h.index, h.amplitude, h.phase);
        }
    }
}
