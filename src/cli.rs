// ============================================================================
// AtelierMaster CLI — headless batch manuscript rendering
// ============================================================================
//
// Usage examples:
//   ateliermaster --input sketch.png
//   ateliermaster -i sketch.jpg -o gown.png
//   ateliermaster -i "scans/*.png" --output-dir rendered/
//   ateliermaster -i sketch.png --thumbnail            (writes a data-string .b64)
//
// Each input image is fitted onto a fresh 500x700 manuscript stack and
// flattened the same way the studio's download button does: over opaque
// white paper. Thumbnail mode keeps transparency and writes the
// data-embeddable string instead.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::canvas::LayerStack;
use crate::error::Result;
use crate::export;
use crate::io;
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// AtelierMaster headless manuscript renderer.
///
/// Mount sketches onto manuscript canvases and flatten them for delivery,
/// no studio window required.
#[derive(Parser, Debug)]
#[command(
    name = "ateliermaster",
    about = "AtelierMaster headless manuscript renderer",
    long_about = "Fit sketch images onto 500x700 manuscript canvases and flatten them\n\
                  for delivery without opening the studio. Regular output is a white\n\
                  background PNG named manuscript-<stem>.png; thumbnail mode writes the\n\
                  transparent data-embeddable string instead.\n\n\
                  Example:\n  \
                  ateliermaster --input sketch.png\n  \
                  ateliermaster -i \"scans/*.jpg\" --output-dir rendered/"
)]
pub struct CliArgs {
    /// Input image file(s). Glob patterns accepted (e.g. "*.png",
    /// "scans/*.jpg").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Output file path. Only valid for single-file input.
    /// For batch input use --output-dir instead.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch rendering.
    /// Files are written here as manuscript-<stem> with the mode's extension.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write the transparent-background data string (.b64) instead of the
    /// white-background download PNG.
    #[arg(short, long)]
    pub thumbnail: bool,

    /// Print per-file dimensions and timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

/// What a render pass writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    /// White-background PNG, the download flattening.
    Download,
    /// Transparent-background data string.
    Thumbnail,
}

impl OutputMode {
    fn extension(&self) -> &'static str {
        match self {
            OutputMode::Download => "png",
            OutputMode::Thumbnail => "b64",
        }
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: CliArgs) -> ExitCode {
    // Resolve glob patterns / literal paths → concrete PathBufs
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    // Multiple inputs require --output-dir, not --output
    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch rendering.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    let mode = if args.thumbnail {
        OutputMode::Thumbnail
    } else {
        OutputMode::Download
    };

    // Create output directory if specified
    if let Some(dir) = &args.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "error: could not create output directory '{}': {}",
                dir.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    }

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        let output_path = match build_output_path(
            input_path,
            args.output.as_deref(),
            args.output_dir.as_deref(),
            mode,
        ) {
            Some(p) => p,
            None => {
                eprintln!(
                    "  error: cannot determine output path for '{}'.",
                    input_path.display()
                );
                any_failure = true;
                continue;
            }
        };

        match run_one(input_path, &output_path, mode, args.verbose) {
            Ok(()) => {
                if args.verbose || multi {
                    println!(
                        "  → {} ({:.0}ms)",
                        output_path.display(),
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ============================================================================
// Per-file rendering pipeline
// ============================================================================

fn run_one(input: &Path, output: &Path, mode: OutputMode, verbose: bool) -> Result<()> {
    // -- Step 1: Decode ---------------------------------------------------
    let image = io::load_image(input)?;
    if verbose {
        println!("  decoded {}x{} px", image.width(), image.height());
    }

    // -- Step 2: Mount onto a fresh manuscript stack ----------------------
    let mut stack = LayerStack::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let base = stack.active();
    if let Some(surface) = stack.surface_mut(base) {
        surface.draw_image_fit(&image);
    }

    // -- Step 3: Flatten and write ----------------------------------------
    match mode {
        OutputMode::Download => {
            let title = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("export");
            let (_, bytes) = export::to_download(&stack, title)?;
            std::fs::write(output, bytes)?;
        }
        OutputMode::Thumbnail => {
            let data = export::to_thumbnail(&stack)?;
            std::fs::write(output, data)?;
        }
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            // Literal path — use directly
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        // Treat as glob pattern
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Compute the output path for a single input file.
///
/// Priority:
/// 1. `--output` (explicit path, used for single-file input)
/// 2. `--output-dir` (batch directory, derives filename from input stem)
/// 3. Fallback: same directory as input, manuscript-<stem> plus the mode's
///    extension (appends `_out` if it would collide with the input path)
fn build_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
    mode: OutputMode,
) -> Option<PathBuf> {
    // Explicit output path
    if let Some(out) = output {
        return Some(out.to_path_buf());
    }

    let ext = mode.extension();
    let stem = input.file_stem()?.to_string_lossy().into_owned();

    if let Some(dir) = output_dir {
        return Some(dir.join(format!("manuscript-{}.{}", stem, ext)));
    }

    // Write next to the input file
    let parent = input.parent().unwrap_or(Path::new("."));
    let candidate = parent.join(format!("manuscript-{}.{}", stem, ext));

    // Avoid silent overwrite of the input
    if candidate == input {
        Some(parent.join(format!("manuscript-{}_out.{}", stem, ext)))
    } else {
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_prefers_explicit_output() {
        let path = build_output_path(
            Path::new("sketch.png"),
            Some(Path::new("final.png")),
            None,
            OutputMode::Download,
        );
        assert_eq!(path, Some(PathBuf::from("final.png")));
    }

    #[test]
    fn output_path_uses_directory_and_manuscript_prefix() {
        let path = build_output_path(
            Path::new("scans/gown.jpg"),
            None,
            Some(Path::new("out")),
            OutputMode::Download,
        );
        assert_eq!(path, Some(PathBuf::from("out/manuscript-gown.png")));
    }

    #[test]
    fn thumbnail_mode_writes_data_string_extension() {
        let path = build_output_path(
            Path::new("scans/gown.jpg"),
            None,
            None,
            OutputMode::Thumbnail,
        );
        assert_eq!(path, Some(PathBuf::from("scans/manuscript-gown.b64")));
    }
}
