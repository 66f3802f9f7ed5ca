use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "kfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split one line's raw text into words, syllables and chars.
    Tokenize(TokenizeArgs),
    /// Prepare and lay out a document, printing the resolved document.
    Layout(LayoutArgs),
    /// Rasterize an SVG path into sparse pixel coverage.
    Pixels(PixelsArgs),
}

#[derive(Parser, Debug)]
struct TokenizeArgs {
    /// Raw line text, override tags included.
    text: String,

    #[arg(long, default_value_t = 0)]
    start: i64,

    #[arg(long, default_value_t = 0)]
    end: i64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OracleKind {
    Parley,
    Monospace,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON file (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OracleKind::Parley)]
    oracle: OracleKind,

    /// Font files to register with the Parley oracle.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Lay out lines on a worker pool of this size.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct PixelsArgs {
    /// SVG path data, e.g. "M0,0 L4,0 L4,4 L0,4 Z".
    #[arg(long)]
    d: String,

    #[arg(long, default_value_t = 8)]
    supersampling: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Tokenize(args) => cmd_tokenize(args),
        Command::Layout(args) => cmd_layout(args),
        Command::Pixels(args) => cmd_pixels(args),
    }
}

fn cmd_tokenize(args: TokenizeArgs) -> anyhow::Result<()> {
    let hierarchy = kfx::tokenize(&args.text, args.start, args.end)?;
    write_json(None, &hierarchy)
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let mut doc = kfx::Document::from_path(&args.in_path)?;
    doc.validate()?;
    doc.prepare()?;

    match args.oracle {
        OracleKind::Monospace => match args.threads {
            Some(_) => {
                kfx::layout_lines_parallel(&mut doc, args.threads, kfx::MonospaceOracle::default)?
            }
            None => doc.layout(&mut kfx::MonospaceOracle::default())?,
        },
        OracleKind::Parley => {
            let fonts = read_fonts(&args.fonts)?;
            let mut oracle = kfx::ParleyOracle::new();
            for (path, bytes) in args.fonts.iter().zip(&fonts) {
                let families = oracle
                    .register_font_bytes(bytes.clone())
                    .with_context(|| format!("register font '{}'", path.display()))?;
                tracing::debug!(font = %path.display(), ?families, "registered font");
            }
            match args.threads {
                Some(_) => kfx::layout_lines_parallel(&mut doc, args.threads, || {
                    let mut oracle = kfx::ParleyOracle::new();
                    for bytes in &fonts {
                        if let Err(e) = oracle.register_font_bytes(bytes.clone()) {
                            tracing::warn!(error = %e, "font registration failed on worker");
                        }
                    }
                    oracle
                })?,
                None => doc.layout(&mut oracle)?,
            }
        }
    }

    write_json(args.out.as_ref(), &doc)?;
    if let Some(out) = &args.out {
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_pixels(args: PixelsArgs) -> anyhow::Result<()> {
    let path = kfx::BezPath::from_svg(&args.d)
        .map_err(|e| anyhow::anyhow!("parse svg path '{}': {e}", args.d))?;
    let options = kfx::RasterOptions {
        supersampling: args.supersampling,
    };
    options.validate()?;
    let pixels = kfx::shape_to_pixels(&path, options.supersampling)?;
    write_json(None, &pixels)
}

fn read_fonts(paths: &[PathBuf]) -> anyhow::Result<Vec<Vec<u8>>> {
    paths
        .iter()
        .map(|p| std::fs::read(p).with_context(|| format!("read font '{}'", p.display())))
        .collect()
}

fn write_json<T: serde::Serialize>(out: Option<&PathBuf>, value: &T) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = std::fs::File::create(path)
                .with_context(|| format!("create '{}'", path.display()))?;
            serde_json::to_writer_pretty(std::io::BufWriter::new(f), value)
                .with_context(|| format!("write json '{}'", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value).context("write json to stdout")?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
