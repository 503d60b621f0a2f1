use anyhow::{bail, Context, Result};
use clap::Parser;
use mdexport::config::Config;
use mdexport::export::{export, file_stem, ExportFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdexport", about = "Export Markdown minutes to DOCX or PDF")]
struct Cli {
    /// Input file(s) or directory
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (default: <name>.<format> in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: docx or pdf (default: from config or docx)
    #[arg(short, long)]
    format: Option<String>,

    /// Download filename; also used as the PDF title
    #[arg(long)]
    name: Option<String>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the parsed blocks as JSON instead of rendering
    #[arg(long)]
    dump_blocks: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mdexport=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config JSON in {}", path.display()))
}

fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    for p in ["mdexport.config.json", "config/mdexport.config.json"] {
        let path = Path::new(p);
        if path.is_file() {
            debug!(path = p, "using config");
            return load_config(path);
        }
    }
    Ok(Config::default())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let config = resolve_config(cli.config.as_deref())?;
    let format = match cli.format.as_deref() {
        Some(f) => f.parse::<ExportFormat>()?,
        None => config.format,
    };

    let files = mdexport::list_files(&cli.inputs).context("cannot collect inputs")?;
    if files.is_empty() {
        bail!("no input files found");
    }

    let mut markdown = String::new();
    for fp in &files {
        if !markdown.is_empty() {
            markdown.push('\n');
        }
        let content =
            fs::read_to_string(fp).with_context(|| format!("cannot read {}", fp.display()))?;
        markdown.push_str(&content);
    }

    if cli.dump_blocks {
        let blocks = mdexport::parse_to_blocks(&markdown);
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    let name = match (&cli.name, &cli.output) {
        (Some(n), _) => n.clone(),
        (None, Some(out)) => file_stem(&out.to_string_lossy()),
        (None, None) => file_stem(&files[0].to_string_lossy()),
    };
    let file = export(&markdown, &name, format, &config)?;

    let output = cli.output.unwrap_or_else(|| PathBuf::from(&file.filename));
    fs::write(&output, &file.bytes)
        .with_context(|| format!("cannot write {}", output.display()))?;
    info!(
        files = files.len(),
        output = %output.display(),
        content_type = file.content_type(),
        disposition = %file.content_disposition(),
        "wrote document"
    );
    Ok(())
}
