use clap::Parser;
use log::{info, warn, LevelFilter};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use sudoku_grid::core::logger;
use sudoku_grid::{find_sudoku_with, image_from_gray, DetectError, DetectorParams, GridDetector};

/// Locate 9x9 sudoku grids on photographs and write overlay and rectified
/// crops next to them.
#[derive(Parser, Debug)]
#[command(name = "sudoku-grid", version, about)]
struct Args {
    /// Image file to process; scans --dir when omitted.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Directory scanned for PNG/JPEG images when no --file is given.
    #[arg(long, default_value = "examples")]
    dir: PathBuf,

    /// Output directory for overlay and rectified images.
    #[arg(long, default_value = "examples_out")]
    out_dir: PathBuf,

    /// Edge length of the rectified crop.
    #[arg(long, default_value_t = 420)]
    size: usize,

    /// Print the located grid as JSON to stdout.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn is_image_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("png" | "jpg" | "jpeg" | "PNG" | "JPG" | "JPEG")
    )
}

fn process(path: &Path, args: &Args, detector: &GridDetector) -> Result<(), Box<dyn Error>> {
    let img = image::open(path)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sudoku");

    match find_sudoku_with(&img, detector) {
        Ok(sudoku) => {
            info!("{}: grid found, score {:.4}", path.display(), sudoku.grid().score);

            let overlay = sudoku.overlay();
            overlay.save(args.out_dir.join(format!("{stem}_overlay.png")))?;

            let rectified = sudoku.extracted(args.size)?;
            if let Some(out) = image_from_gray(&rectified) {
                out.save(args.out_dir.join(format!("{stem}_rectified.png")))?;
            }

            if args.json {
                println!("{}", serde_json::to_string_pretty(sudoku.grid())?);
            }
        }
        Err(DetectError::NotRecognised) => {
            warn!("{}: no sudoku grid recognised", path.display());
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    logger::init(level)?;

    fs::create_dir_all(&args.out_dir)?;
    let detector = GridDetector::new(DetectorParams::default());

    let files: Vec<PathBuf> = match &args.file {
        Some(file) => vec![file.clone()],
        None => {
            let mut files: Vec<PathBuf> = fs::read_dir(&args.dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| is_image_file(path))
                .collect();
            files.sort();
            files
        }
    };

    for file in &files {
        process(file, &args, &detector)?;
    }

    Ok(())
}
