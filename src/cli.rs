//! Command-line surface of the `normify` binary.
//!
//! Argument definitions, output naming rules, the batch driver and the
//! console progress bar live here so `main.rs` only wires them together.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use clap::error::ErrorKind;
use tracing::{info, warn};

use crate::image_pipeline::{
    ConversionConfig, ImageToNormalPipeline, NoProgress, ProgressObserver, ScalarOp,
};

/// Normify - converts any number of images into normal maps
#[derive(Parser, Debug)]
#[command(name = "normify")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Images to convert (any format the decoder understands)
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Operation used to get a 1-d value per pixel
    /// (luminance, grayscale, sum, red, green, blue or an alias)
    #[arg(short = 'p', long = "pixel-op", value_name = "OP", default_value = "luminance")]
    pub pixel_op: String,

    /// Output filename, only used with a single input. Always saved as PNG
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write `<name>.png` instead of appending `_n` to the original filename
    #[arg(short = 'w', long)]
    pub overwrite: bool,

    /// Skip images that fail and keep converting the rest
    #[arg(short, long)]
    pub keep_going: bool,

    /// Do not draw the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn scalar_op(&self) -> ScalarOp {
        ScalarOp::from_key(&self.pixel_op)
    }

    pub fn config(&self) -> ConversionConfig {
        ConversionConfig::builder().scalar_op(self.scalar_op()).build()
    }

    /// `-o` applies only when exactly one input was given.
    pub fn explicit_output(&self) -> Option<&Path> {
        match self.files.len() {
            1 => self.output.as_deref(),
            _ => None,
        }
    }

    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        resolve_output_path(input, self.explicit_output(), self.overwrite)
    }
}

/// Picks where the normal map for `input` is written.
///
/// An explicit path is used as is. Otherwise the extension is replaced by
/// `.png` when `overwrite` is set, or by `_n.png` when it is not.
pub fn resolve_output_path(input: &Path, explicit: Option<&Path>, overwrite: bool) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = if overwrite {
        format!("{stem}.png")
    } else {
        format!("{stem}_n.png")
    };
    input.with_file_name(file_name)
}

/// Parses the command line. `Ok(None)` means no arguments were given and
/// only the usage should be shown.
pub fn try_parse_args<I, T>(args: I) -> Result<Option<Cli>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(e) if e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Ok(None),
        Err(e) => Err(e),
    }
}

/// Converts every input of `cli` in order and returns how many succeeded.
///
/// The first failure ends the batch unless `keep_going` is set, in which
/// case failed inputs are skipped and reported together at the end.
pub fn convert_batch(cli: &Cli) -> anyhow::Result<usize> {
    let pipeline = ImageToNormalPipeline::new(cli.config());
    let total = cli.files.len();

    info!(
        "Converting {} image{}...",
        total,
        if total == 1 { "" } else { "s" }
    );
    info!("Method: {}", pipeline.config().scalar_op);

    if cli.output.is_some() && cli.explicit_output().is_none() {
        warn!("-o is ignored when converting more than one image");
    }

    let mut failures = 0usize;
    for input in &cli.files {
        let output = cli.output_path_for(input);
        info!(image = %input.display(), outfile = %output.display(), "Starting image");

        let mut progress: Box<dyn ProgressObserver> = if cli.quiet {
            Box::new(NoProgress)
        } else {
            Box::new(ProgressBar::stderr())
        };

        let result = pipeline
            .convert_file_with_progress(input, &output, &mut *progress)
            .with_context(|| format!("could not convert {}", input.display()));

        match result {
            Ok(report) => report.timings.log_summary(),
            Err(e) if cli.keep_going => {
                warn!("{:#}, skipping", e);
                failures += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if failures > 0 {
        bail!("{} of {} images failed", failures, total);
    }

    Ok(total)
}

const BAR_TITLE: &str = "Progress: ";
const BAR_WIDTH: usize = 30;

// Index n holds the block n/8 of a cell wide.
const PARTIAL_BLOCKS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

/// Renders `title[█████▌     ] 55%` with `width` cells between the brackets.
pub fn render_progress_bar(title: &str, width: usize, fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let cells = width as f64 * fraction;
    let full = (cells.floor() as usize).min(width);
    let eighths = ((cells - full as f64) * 8.0) as usize;

    let mut bar = String::with_capacity(title.len() + width * 3 + 8);
    bar.push_str(title);
    bar.push('[');
    bar.extend(std::iter::repeat_n('█', full));
    if full < width {
        bar.push(PARTIAL_BLOCKS[eighths.min(7)]);
        bar.extend(std::iter::repeat_n(' ', width - full - 1));
    }
    bar.push_str(&format!("] {}%", (fraction * 100.0) as u32));
    bar
}

/// Redraws a progress bar in place on `out` after every column.
pub struct ProgressBar<W: Write> {
    out: W,
}

impl<W: Write> ProgressBar<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ProgressBar<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> ProgressObserver for ProgressBar<W> {
    fn column_done(&mut self, completed: usize, total: usize) {
        let fraction = if total == 0 {
            1.0
        } else {
            completed as f64 / total as f64
        };
        let line = render_progress_bar(BAR_TITLE, BAR_WIDTH, fraction);
        let end = if completed >= total { "\n" } else { "" };
        // Progress output is best effort.
        let _ = write!(self.out, "\r{line}{end}");
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("normify").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn default_output_appends_suffix() {
        let out = resolve_output_path(Path::new("textures/bricks.jpg"), None, false);
        assert_eq!(out, PathBuf::from("textures/bricks_n.png"));
    }

    #[test]
    fn overwrite_replaces_extension() {
        let out = resolve_output_path(Path::new("textures/bricks.jpg"), None, true);
        assert_eq!(out, PathBuf::from("textures/bricks.png"));
    }

    #[test]
    fn only_last_extension_is_replaced() {
        let out = resolve_output_path(Path::new("a.b.tiff"), None, false);
        assert_eq!(out, PathBuf::from("a.b_n.png"));
        let out = resolve_output_path(Path::new("noext"), None, false);
        assert_eq!(out, PathBuf::from("noext_n.png"));
    }

    #[test]
    fn explicit_output_wins_over_overwrite() {
        let out = resolve_output_path(Path::new("in.bmp"), Some(Path::new("out.dat")), true);
        assert_eq!(out, PathBuf::from("out.dat"));
    }

    #[test]
    fn parses_flags_anywhere() {
        let cli = parse(&["a.png", "-p", "gs", "b.jpg", "-w"]);
        assert_eq!(cli.files, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
        assert_eq!(cli.scalar_op(), ScalarOp::Grayscale);
        assert!(cli.overwrite);
        assert_eq!(cli.output_path_for(Path::new("b.jpg")), PathBuf::from("b.png"));
    }

    #[test]
    fn pixel_op_defaults_to_luminance() {
        let cli = parse(&["a.png"]);
        assert_eq!(cli.scalar_op(), ScalarOp::Luminance);
        assert_eq!(cli.config().scalar_op, ScalarOp::Luminance);
    }

    #[test]
    fn unknown_pixel_op_is_luminance() {
        assert_eq!(parse(&["a.png", "-p", "foo"]).scalar_op(), ScalarOp::Luminance);
    }

    #[test]
    fn output_is_honoured_for_a_single_input() {
        let cli = parse(&["a.png", "-o", "normals.png"]);
        assert_eq!(cli.output_path_for(Path::new("a.png")), PathBuf::from("normals.png"));
    }

    #[test]
    fn output_is_ignored_for_several_inputs() {
        let cli = parse(&["a.png", "b.png", "-o", "normals.png"]);
        assert_eq!(cli.explicit_output(), None);
        assert_eq!(cli.output_path_for(Path::new("b.png")), PathBuf::from("b_n.png"));
    }

    #[test]
    fn no_arguments_means_usage_only() {
        assert!(try_parse_args(["normify"]).unwrap().is_none());
    }

    #[test]
    fn files_after_a_boolean_flag_are_inputs() {
        // `-w` takes no value, so the next argument is still an input.
        let cli = try_parse_args(["normify", "-w", "a.png", "b.png"]).unwrap().unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.png"), PathBuf::from("b.png")]);
        assert!(try_parse_args(["normify", "a.png", "--bogus"]).is_err());
    }

    #[test]
    fn files_are_required() {
        assert!(Cli::try_parse_from(["normify", "-w"]).is_err());
    }

    fn write_white_png(path: &Path) {
        image::RgbImage::from_pixel(2, 2, image::Rgb([255, 255, 255]))
            .save(path)
            .unwrap();
    }

    fn batch_cli(files: &[&Path], flags: &[&str]) -> Cli {
        let mut args: Vec<OsString> = vec!["normify".into(), "-q".into()];
        args.extend(flags.iter().map(|f| OsString::from(*f)));
        args.extend(files.iter().map(|f| f.as_os_str().to_owned()));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn batch_converts_every_input() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_white_png(&a);
        write_white_png(&b);

        let converted = convert_batch(&batch_cli(&[&a, &b], &[])).unwrap();

        assert_eq!(converted, 2);
        assert!(dir.path().join("a_n.png").exists());
        assert!(dir.path().join("b_n.png").exists());
    }

    #[test]
    fn batch_stops_at_first_failure_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        let good = dir.path().join("good.png");
        write_white_png(&good);

        let result = convert_batch(&batch_cli(&[&missing, &good], &[]));

        assert!(result.is_err());
        assert!(!dir.path().join("good_n.png").exists());
    }

    #[test]
    fn keep_going_converts_the_rest_but_still_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        let good = dir.path().join("good.png");
        write_white_png(&good);

        let result = convert_batch(&batch_cli(&[&missing, &good], &["-k"]));

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("1 of 2 images failed"), "{message}");
        assert!(dir.path().join("good_n.png").exists());
        assert!(!dir.path().join("missing_n.png").exists());
    }

    #[test]
    fn batch_output_flag_needs_a_single_input() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_white_png(&a);
        write_white_png(&b);
        let named = dir.path().join("named.png");
        let named_flag = named.to_string_lossy().into_owned();

        convert_batch(&batch_cli(&[&a, &b], &["-o", &named_flag])).unwrap();

        assert!(!named.exists());
        assert!(dir.path().join("a_n.png").exists());
        assert!(dir.path().join("b_n.png").exists());

        convert_batch(&batch_cli(&[&a], &["-o", &named_flag])).unwrap();
        assert!(named.exists());
    }

    #[test]
    fn bar_is_empty_at_start_and_full_at_end() {
        assert_eq!(render_progress_bar("P: ", 4, 0.0), "P: [    ] 0%");
        assert_eq!(render_progress_bar("P: ", 4, 1.0), "P: [████] 100%");
    }

    #[test]
    fn bar_uses_partial_blocks() {
        // 4 cells * 0.5625 = 2.25 cells: two full blocks and a quarter block.
        assert_eq!(render_progress_bar("", 4, 0.5625), "[██▎ ] 56%");
    }

    #[test]
    fn progress_bar_redraws_in_place_and_ends_line() {
        let mut bar = ProgressBar::new(Vec::new());
        bar.column_done(1, 2);
        bar.column_done(2, 2);
        let text = String::from_utf8(bar.into_inner()).unwrap();

        assert_eq!(text.matches('\r').count(), 2);
        assert!(text.contains("50%"));
        assert!(text.ends_with("100%\n"));
    }
}
