use doc_rectify::config::{load_config, RuntimeConfig};
use doc_rectify::diagnostics::RectifyTrace;
use doc_rectify::image::io::{load_raster, save_raster_png, write_json_file};
use doc_rectify::{DocumentScanner, ScanResult};
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "scan_demo".to_string());
    let config_path = args
        .next()
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config = load_config(Path::new(&config_path))?;

    let image = load_raster(&config.input_path)?;
    let scanner = DocumentScanner::new(config.scan.clone());
    let (scan, trace) = scanner
        .scan_with_trace(&image)
        .map_err(|e| e.to_string())?;

    print_summary(&scan, &trace);
    write_outputs(&config, &scan, &trace)?;
    Ok(())
}

fn print_summary(scan: &ScanResult, trace: &RectifyTrace) {
    let rect = &scan.rectification;
    println!(
        "input      {}x{} ({} boundary polygons)",
        trace.input.width, trace.input.height, trace.input.boundaries
    );
    println!("outcome    {:?}", rect.outcome);
    println!("scan size  {}x{}", rect.output.w, rect.output.h);
    let quad = rect.corners.points();
    for (label, p) in ["tl", "tr", "br", "bl"].iter().zip(quad.iter()) {
        println!("corner {label}  ({:.1}, {:.1})", p[0], p[1]);
    }
    println!("latency    {:.3} ms", rect.latency_ms);
}

fn write_outputs(
    config: &RuntimeConfig,
    scan: &ScanResult,
    trace: &RectifyTrace,
) -> Result<(), String> {
    if let Some(path) = &config.output.scan_out {
        let page = scan.enhanced.as_ref().unwrap_or(&scan.rectification.output);
        save_raster_png(path, page)?;
        println!("Scan written to {}", path.display());
    }
    if let Some(path) = &config.output.json_out {
        write_json_file(path, trace)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}
