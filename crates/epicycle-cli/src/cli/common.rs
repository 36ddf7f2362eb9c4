//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};

use epicycle::{ChainConfig, CurveSource, EpicycleChain, PathSampler, Point, SvgCurve};

/// Canvas size used for all generated output, matching the engine's
/// default origin at (300, 300).
pub const CANVAS_SIZE: f64 = 600.0;

/// Output format for generated traces.
#[derive(Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Svg,
    Json,
}

/// Read SVG content from a file path, or from stdin when the path is "-".
pub fn read_svg_input(path: &str) -> Result<String, String> {
    if path == "-" {
        eprintln!("Reading SVG from stdin...");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))
    }
}

/// Load the source curve and build the chain in one step.
///
/// This is the whole setup phase: parse the SVG, wrap it in a memoizing
/// sampler, integrate all 2N harmonics. Reports progress to stderr and
/// keeps stdout clean for machine output.
pub fn build_chain(
    svg_content: &str,
    config: ChainConfig,
) -> Result<(PathSampler<SvgCurve>, EpicycleChain), String> {
    let curve = SvgCurve::from_svg(svg_content).map_err(|e| e.to_string())?;
    eprintln!("Curve length: {:.1} units", curve.total_length());

    let mut sampler = PathSampler::new(curve);
    let chain = EpicycleChain::build(config, &mut sampler).map_err(|e| e.to_string())?;
    eprintln!(
        "Built chain: {} harmonics from {} curve samples",
        chain.harmonics().len(),
        sampler.cached_samples()
    );

    Ok((sampler, chain))
}

/// Convert a trail of traced points to SVG output.
///
/// Discrete dots by default (the verified behavior of the engine's trail);
/// `connect` joins the points into a single polyline instead - a pure
/// output-layer choice.
pub fn trail_to_svg(trail: &[Point], connect: bool) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">
"#,
        CANVAS_SIZE, CANVAS_SIZE
    ));

    if connect {
        if trail.len() >= 2 {
            let points: String = trail
                .iter()
                .map(|p| format!("{:.2},{:.2}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            svg.push_str(&format!(
                "<polyline points=\"{}\" stroke=\"red\" stroke-width=\"1\" fill=\"none\"/>\n",
                points
            ));
        }
    } else {
        svg.push_str("<g fill=\"red\">\n");
        for p in trail {
            svg.push_str(&format!(
                "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"2\"/>\n",
                p.x, p.y
            ));
        }
        svg.push_str("</g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

/// Build one full animation frame as an SVG string: the accumulated trail
/// plus the rotating vector chain with its support circles.
pub fn frame_to_svg(chain: &EpicycleChain, trail: &[Point]) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<rect width="100%" height="100%" fill="white"/>
"#,
        CANVAS_SIZE, CANVAS_SIZE, CANVAS_SIZE, CANVAS_SIZE
    ));

    // Trail first so the vector chain draws on top
    svg.push_str("<g fill=\"red\">\n");
    for p in trail {
        svg.push_str(&format!(
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"2\"/>\n",
            p.x, p.y
        ));
    }
    svg.push_str("</g>\n");

    let endpoints = chain.endpoints();
    let scale = chain.config().amplitude_scale;

    // Support circles at each vector's base, radius = scaled amplitude
    svg.push_str("<g stroke=\"black\" stroke-opacity=\"0.2\" fill=\"none\">\n");
    for (harmonic, base) in chain.harmonics().iter().zip(endpoints.iter()) {
        svg.push_str(&format!(
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\"/>\n",
            base.x,
            base.y,
            scale * harmonic.amplitude
        ));
    }
    svg.push_str("</g>\n");

    // The vectors themselves
    svg.push_str("<g stroke=\"black\" stroke-width=\"2\">\n");
    for window in endpoints.windows(2) {
        svg.push_str(&format!(
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
            window[0].x, window[0].y, window[1].x, window[1].y
        ));
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

/// Write output to a file, or to stdout for "-" / no path.
pub fn write_output(output_path: Option<&str>, content: &str) -> Result<(), String> {
    match output_path {
        Some("-") | None => {
            println!("{}", content);
            Ok(())
        }
        Some(path) => {
            fs::write(path, content).map_err(|e| format!("Failed to write {}: {}", path, e))?;
            eprintln!("Wrote: {}", path);
            Ok(())
        }
    }
}
