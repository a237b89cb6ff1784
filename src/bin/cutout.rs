use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cutout", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an edit script over an image and write the cutout PNG.
    Apply(ApplyArgs),
    /// Print natural and display geometry of an image.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image (PNG, JPEG, WebP, GIF or BMP).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Edit script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Output PNG path (natural resolution).
    #[arg(long)]
    out: PathBuf,

    /// Also write the display-resolution preview PNG.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Editor options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Display width limit.
    #[arg(long, default_value_t = cutout::DEFAULT_MAX_DISPLAY_WIDTH)]
    max_width: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let opts = match &args.config {
        Some(path) => cutout::EditorOpts::from_path(path)?,
        None => cutout::EditorOpts::default(),
    };
    let script = cutout::EditScript::from_path(&args.script)?;
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;

    let mut sess = cutout::EditorSession::new(opts)?;
    sess.open(&bytes)?;
    let report = script.apply(&mut sess)?;
    tracing::info!(?report, "script applied");

    if let Some(preview_path) = &args.preview {
        sess.render_composite();
        let preview = sess
            .preview()
            .context("preview composite was not produced")?;
        write_file(preview_path, &preview.png)?;
        eprintln!("wrote {}", preview_path.display());
    }

    let artifact = sess.export()?;
    write_file(&args.out, &artifact.png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let source = cutout::SourceImage::decode(&bytes)?;
    let geometry = cutout::DisplayGeometry::fit(source.natural_size(), args.max_width)?;
    let json = serde_json::to_string_pretty(&geometry).context("serialize geometry")?;
    println!("{json}");
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))
}
