use doc_rectify::image::Raster;
use doc_rectify::{Rectifier, RectifyOptions};

fn main() {
    // Demo stub: creates a fake raster and runs the rectifier against an
    // empty boundary list, exercising the fallback path.
    let w = 640usize;
    let h = 480usize;
    let image = Raster::new(w, h, 1);

    let rectifier = Rectifier::new(RectifyOptions::default());
    match rectifier.rectify(&image, &[]) {
        Ok(result) => println!(
            "outcome={:?} {}x{} latency_ms={:.3}",
            result.outcome, result.output.w, result.output.h, result.latency_ms
        ),
        Err(err) => eprintln!("Error: {err}"),
    }
}
