//! Minimal end-to-end run: locate a sudoku on an image and write the
//! overlay plus the rectified crop next to it.
//!
//! ```sh
//! cargo run --example detect_sudoku -- path/to/puzzle.png
//! ```

use log::LevelFilter;
use sudoku_grid::core::logger;
use sudoku_grid::{find_sudoku, image_from_gray};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init(LevelFilter::Info)?;

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: detect_sudoku <image>")?;
    let img = image::open(&path)?;

    let sudoku = find_sudoku(&img)?;
    println!(
        "grid found with score {:.4}, corners {:?}",
        sudoku.grid().score,
        sudoku.grid().corners()
    );

    sudoku.overlay().save("overlay.png")?;
    if let Some(rectified) = image_from_gray(&sudoku.extracted(420)?) {
        rectified.save("rectified.png")?;
    }

    Ok(())
}
