// iconset - main.rs
//
// Command-line front end:
// 1. CLI argument parsing
// 2. Logging initialisation (RUST_LOG > --debug > info)
// 3. Profile list loading, one JSON file per platform
// 4. Generation and zip output

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use iconset_renderer::{
    ArchiveError, BackgroundMode, CancelToken, Error, IconGenerator, Manifest,
    ProfileCatalog, RenderOptions, SourceImage, ValidationError, ZipSink, profiles_for,
    write_icon_set,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Generate a platform icon set from one source image.
///
/// Each profile file is a JSON array of profiles; its file stem is used as
/// the platform name.
#[derive(Parser, Debug)]
#[command(name = "iconset", version, about)]
struct Cli {
    /// Source image (PNG, JPEG, WebP, BMP, TIFF or SVG).
    #[arg(short = 's', long = "source")]
    source: PathBuf,

    /// Profile list files, processed in the given order.
    #[arg(short = 'p', long = "profiles", required = true, num_args = 1..)]
    profiles: Vec<PathBuf>,

    /// Padding proportion in [0, 1]; a comma is accepted as decimal separator.
    #[arg(long = "padding")]
    padding: Option<String>,

    /// Background color: #rgb, #rrggbb, #rrggbbaa, a CSS name or "transparent".
    #[arg(short = 'c', long = "color")]
    color: Option<String>,

    /// Canvas fill when no color is given.
    #[arg(long = "background-mode", value_enum, default_value_t = BackgroundMode::Transparent)]
    background_mode: BackgroundMode,

    /// Render profiles one at a time.
    #[arg(long = "sequential")]
    sequential: bool,

    /// Output archive path.
    #[arg(short = 'o', long = "output", default_value = "icons.zip")]
    output: PathBuf,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generate(#[from] Error),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

fn init_logging(debug_flag: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn content_type(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.eq_ignore_ascii_case("svg"))
        .map(|_| "image/svg+xml")
}

fn load_catalog(paths: &[PathBuf]) -> Result<(ProfileCatalog, Vec<String>), CliError> {
    let mut catalog = ProfileCatalog::new();
    let mut platforms = Vec::with_capacity(paths.len());
    for path in paths {
        let platform = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = read(path)?;
        catalog.insert_json(&platform, &String::from_utf8_lossy(&bytes))?;
        platforms.push(platform);
    }
    Ok((catalog, platforms))
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut options = RenderOptions::from_form(cli.padding.as_deref(), cli.color.as_deref())?;
    options.background_mode = cli.background_mode;
    options.parallel = !cli.sequential;

    let (catalog, platforms) = load_catalog(&cli.profiles)?;
    let profiles = profiles_for(&catalog, &platforms[..])?;

    let data = read(&cli.source)?;
    let source = SourceImage::from_bytes(&data, content_type(&cli.source))?;

    let output = IconGenerator::new(options).run(&source, &profiles, &CancelToken::new())?;
    for failure in &output.failures {
        eprintln!("warning: {failure}");
    }

    let manifest = Manifest::build(&output.icons);
    let file = File::create(&cli.output).map_err(|source| CliError::Create {
        path: cli.output.clone(),
        source,
    })?;
    let mut sink = ZipSink::new(BufWriter::new(file));
    write_icon_set(&mut sink, &output.icons, &manifest)?;
    sink.finish()?;

    tracing::info!(
        icons = output.icons.len(),
        failed = output.failures.len(),
        output = %cli.output.display(),
        "Icon set written"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        source = %cli.source.display(),
        "iconset starting"
    );

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Generate(Error::NothingGenerated { failures })) => {
            for failure in &failures {
                eprintln!("error: {failure}");
            }
            eprintln!("error: no icons generated");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
