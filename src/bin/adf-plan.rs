//! ADF Distribution Planner
//!
//! Reads a list of files and prints how they spread over disk images

use adf_distribute::{
    CandidateFile, CreateDiskRequest, DiskGeometry, DiskNaming, Planner, PlannerBuilder,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "adf-plan")]
#[command(about = "Plan how files are split and packed onto ADF disk images")]
struct Args {
    /// JSON array of {"name", "size"} records; "-" or absent reads stdin
    #[arg(short = 'i', long, conflicts_with = "scan")]
    input: Option<PathBuf>,

    /// Use the regular files of a directory as candidates
    #[arg(short = 's', long)]
    scan: Option<PathBuf>,

    /// TOML file with a [geometry] table
    #[arg(short = 'c', long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Disk preset (dd, hd) [default: dd]
    #[arg(short = 'p', long)]
    preset: Option<String>,

    /// Print creation requests instead of the raw plan
    #[arg(short = 'r', long, requires_all = ["name", "label"])]
    requests: bool,

    /// Base name of the disk images (without .adf)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Volume label of the disks
    #[arg(short = 'l', long)]
    label: Option<String>,

    /// Reject empty/duplicate names and output name collisions
    #[arg(long)]
    strict: bool,
}

/// Parse a disk preset from CLI string
fn parse_preset(s: &str) -> Result<DiskGeometry> {
    match s.to_lowercase().as_str() {
        "dd" | "880k" => Ok(DiskGeometry::amiga_dd()),
        "hd" | "1760k" => Ok(DiskGeometry::amiga_hd()),
        _ => bail!("Invalid preset '{}'. Valid options: dd, hd", s),
    }
}

fn read_candidates(input: Option<&Path>) -> Result<Vec<CandidateFile>> {
    let source = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading candidate list {:?}", path))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading candidate list from stdin")?;
            buf
        }
    };

    serde_json::from_str(&source).context("parsing candidate list")
}

fn scan_directory(dir: &Path) -> Result<Vec<CandidateFile>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir).with_context(|| format!("scanning {:?}", dir))? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let name = entry
            .file_name()
            .into_string()
            .map_err(|name| anyhow::anyhow!("non UTF-8 file name {:?}", name))?;
        files.push(CandidateFile::new(name, metadata.len()));
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

fn build_planner(args: &Args) -> Result<Planner> {
    let mut builder = PlannerBuilder::new();
    if let Some(preset) = &args.preset {
        builder = builder.geometry(parse_preset(preset)?);
    }
    if let Some(config) = &args.config {
        builder = builder.config_file(config);
    }
    builder.build().context("setting up disk geometry")
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let planner = build_planner(&args)?;

    let files = match &args.scan {
        Some(dir) => scan_directory(dir)?,
        None => read_candidates(args.input.as_deref())?,
    };
    info!("Planning {} candidate files", files.len());

    let result = if args.strict {
        planner.plan_checked(&files)?
    } else {
        planner.plan(&files)
    };

    let output = if args.requests {
        let (Some(name), Some(label)) = (&args.name, &args.label) else {
            bail!("--requests needs both --name and --label");
        };
        let batch = planner.prepare_submission(&result, &DiskNaming::new(name, label))?;
        let requests: Vec<serde_json::Value> = batch
            .disks()
            .iter()
            .map(|disk| request_json(disk.request()))
            .collect::<Result<_>>()?;
        serde_json::to_string_pretty(&requests)?
    } else {
        serde_json::to_string_pretty(&result)?
    };

    println!("{}", output);
    Ok(())
}

/// `{ "name": ..., "body": { "label": ..., "contents": [...] } }`
fn request_json(request: &CreateDiskRequest) -> Result<serde_json::Value> {
    Ok(serde_json::json!({
        "name": request.name,
        "body": request.body()?,
    }))
}
