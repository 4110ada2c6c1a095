//! CLI binary for pdf2img.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `ConversionRequest` + `ConversionConfig` and writes the result.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use pdf2img::config::DEFAULT_MAX_SURFACE_PIXELS;
use pdf2img::{convert, inspect, write_image, ConversionConfig, ConversionRequest, EncodedImage};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # First page as a 1240 px wide PNG next to the input (document.png)
  pdf2img document.pdf

  # 800 px JPEG to a chosen path
  pdf2img --width 800 --format jpeg document.pdf -o preview.jpg

  # Base64 input on stdin, JSON result (base64, width, height) on stdout
  base64 document.pdf | pdf2img --base64 --json -

  # Host message: {"payload": "<base64>", "desiredWidth": 640, "imageFormat": "png"}
  pdf2img --request --json message.json

  # Page count and first-page size only
  pdf2img --inspect-only document.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  PDF2IMG_WIDTH           Default target width
  PDF2IMG_FORMAT          Default image format (png, jpeg)
  RUST_LOG                Override log filter (e.g. pdf2img=debug)
"#;

/// Rasterise the first page of a PDF to PNG or JPEG.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Rasterise the first page of a PDF to PNG or JPEG",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file, base64 file (--base64) or JSON request (--request). "-" reads stdin.
    input: String,

    /// Write the image to this file. Default: input name with the format's extension.
    #[arg(short, long, env = "PDF2IMG_OUTPUT")]
    output: Option<PathBuf>,

    /// Target width in pixels; height follows the page aspect ratio.
    #[arg(short, long, env = "PDF2IMG_WIDTH", default_value_t = 1240.0)]
    width: f64,

    /// Output image format.
    #[arg(short, long, env = "PDF2IMG_FORMAT", value_enum, default_value = "png")]
    format: FormatArg,

    /// INPUT holds base64 text rather than raw PDF bytes.
    #[arg(long)]
    base64: bool,

    /// INPUT is a JSON request; its width and format override the flags.
    #[arg(long, conflicts_with = "base64")]
    request: bool,

    /// Print the result as JSON (base64, width, height, format) on stdout.
    #[arg(long, env = "PDF2IMG_JSON")]
    json: bool,

    /// Print page count and first-page size only, no rendering.
    #[arg(long)]
    inspect_only: bool,

    /// pdfium shared library, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2IMG_PASSWORD")]
    password: Option<String>,

    /// Refuse to render more pixels than this.
    #[arg(long, env = "PDF2IMG_MAX_PIXELS", default_value_t = DEFAULT_MAX_SURFACE_PIXELS)]
    max_pixels: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2IMG_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpeg,
}

impl FormatArg {
    fn as_str(self) -> &'static str {
        match self {
            FormatArg::Png => "png",
            FormatArg::Jpeg => "jpeg",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let request = build_request(&cli)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect(&request.document, &config)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialize document info")?
            );
        } else {
            println!("Input:        {}", cli.input);
            println!("Pages:        {}", info.page_count);
            println!(
                "First page:   {} x {} pt",
                info.first_page.width, info.first_page.height
            );
        }
        return Ok(());
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let image = convert(&request, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&image).context("Failed to serialise output")?;
        println!("{json}");
        if let Some(ref path) = cli.output {
            write_image(&image, path)
                .await
                .context("Failed to write image")?;
        }
    } else {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&cli.input, &image));
        write_image(&image, &path)
            .await
            .context("Failed to write image")?;

        if !cli.quiet {
            eprintln!(
                "{}  {}x{} {}  {}  →  {}",
                green("✔"),
                image.width,
                image.height,
                image.format,
                dim(&format!("{} bytes", image.bytes.len())),
                bold(&path.display().to_string()),
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder().max_surface_pixels(cli.max_pixels);
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library_path(lib);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    builder.build().context("Invalid configuration")
}

/// Read INPUT and turn it into a `ConversionRequest`.
fn build_request(cli: &Cli) -> Result<ConversionRequest> {
    let raw = read_input(&cli.input)?;

    if cli.request {
        return serde_json::from_slice(&raw).context("Failed to parse JSON request");
    }

    let document = if cli.base64 {
        String::from_utf8(raw).context("Base64 input is not valid UTF-8")?
    } else {
        STANDARD.encode(&raw)
    };

    Ok(ConversionRequest::new(document)
        .desired_width(cli.width)
        .image_format(cli.format.as_str()))
}

fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read(input).with_context(|| format!("Failed to read '{input}'"))
}

/// `document.pdf` → `document.png`; stdin → `page.png`.
fn default_output_path(input: &str, image: &EncodedImage) -> PathBuf {
    let base = if input == "-" {
        PathBuf::from("page")
    } else {
        let p = Path::new(input);
        let stem = p.file_stem().map(PathBuf::from).unwrap_or_else(|| "page".into());
        p.parent().map(|d| d.join(&stem)).unwrap_or(stem)
    };
    base.with_extension(image.format.extension())
}
