use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use conceptmap_core::{reconcile_bytes, InputKind, ReconcileConfig, ReconcileError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::flags::{AliasOverflowFlag, EncodingFlag};
use crate::settings::{resolve_config, ConfigOverrides};

mod archive;
mod flags;
mod http_api;
mod listener;
pub mod report;
mod settings;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "conceptmap")]
#[command(about = "Rewrite employer codes in concept extracts using an alias file", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML configuration file (overrides CONCEPTMAP_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Encoding of inputs and outputs
    #[arg(long, global = true, value_enum)]
    encoding: Option<EncodingFlag>,

    /// Policy for aliases wider than the code field
    #[arg(long, global = true, value_enum)]
    alias_overflow: Option<AliasOverflowFlag>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile an alias file with a concepts file and write the three reports
    Process(ProcessArgs),

    /// Serve the upload form over HTTP (GET /, POST /process)
    ServeHttp(ServeArgs),

    /// Print the resolved configuration as TOML
    Config,
}

#[derive(Args)]
struct ProcessArgs {
    /// Alias mapping file (e.g. RelacionONVIO.txt)
    #[arg(long)]
    alias: PathBuf,

    /// Fixed-width concepts file (e.g. Relacion_de_Conceptos.TXT)
    #[arg(long)]
    concepts: PathBuf,

    /// Directory receiving the three report files
    #[arg(long, default_value = ".", conflicts_with = "zip")]
    out_dir: PathBuf,

    /// Write a single zip archive instead of loose files
    #[arg(long)]
    zip: Option<PathBuf>,

    /// Print run statistics as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:7700
    #[arg(long, default_value = "127.0.0.1:7700")]
    bind: String,

    /// Allow binding to non-loopback addresses
    #[arg(long)]
    public: bool,

    /// Maximum request body size in MiB
    #[arg(long, default_value_t = 32)]
    max_upload_mb: usize,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = resolve_config(
        cli.config.as_deref(),
        ConfigOverrides {
            encoding: cli.encoding,
            alias_overflow: cli.alias_overflow,
        },
    )?;

    match cli.command {
        Commands::Process(args) => run_process(args, &config)?,
        Commands::ServeHttp(args) => serve_http(args, config).await?,
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            print_stdout(rendered.trim_end())?;
        }
    }

    Ok(())
}

fn read_input(path: &Path, kind: InputKind) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(anyhow::Error::new(ReconcileError::MissingInput(kind))
            .context(format!("{} file not found: {}", kind, path.display())));
    }
    fs::read(path).with_context(|| format!("Cannot read {} file {}", kind, path.display()))
}

fn run_process(args: ProcessArgs, config: &ReconcileConfig) -> Result<()> {
    let alias = read_input(&args.alias, InputKind::Alias)?;
    let concepts = read_input(&args.concepts, InputKind::Concepts)?;

    let encoded = reconcile_bytes(&alias, &concepts, config)?;

    let destination = match &args.zip {
        Some(zip_path) => {
            let bytes = archive::build_zip(&encoded.files)?;
            fs::write(zip_path, bytes)
                .with_context(|| format!("Cannot write archive {}", zip_path.display()))?;
            zip_path.clone()
        }
        None => {
            fs::create_dir_all(&args.out_dir).with_context(|| {
                format!("Cannot create output directory {}", args.out_dir.display())
            })?;
            for file in &encoded.files {
                let path = args.out_dir.join(file.name);
                fs::write(&path, &file.bytes)
                    .with_context(|| format!("Cannot write {}", path.display()))?;
                log::debug!("Wrote {} ({} bytes)", path.display(), file.bytes.len());
            }
            args.out_dir.clone()
        }
    };

    if args.json {
        let run = report::RunReport {
            destination: &destination,
            files: encoded.files.iter().map(|file| file.name).collect(),
            stats: &encoded.stats,
        };
        print_stdout(&serde_json::to_string(&run)?)?;
    } else {
        print_stdout(report::render_summary(&encoded.stats, &destination).trim_end())?;
    }
    Ok(())
}

async fn serve_http(args: ServeArgs, config: ReconcileConfig) -> Result<()> {
    let listener = listener::bind_upload_listener(&args.bind, args.public).await?;
    let app = http_api::router(config, args.max_upload_mb.saturating_mul(1024 * 1024));

    println!("Serving upload form on http://{}/", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
