use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use eegscope_lib::{
    analysis::{
        processed_csv, AnalysisResponse, ArtifactKind, PresetAnalysisRequest,
        UploadAnalysisRequest,
    },
    channels::organize,
    config::{ChannelCheck, IngestConfig, TimePolicy},
    display::{AmplitudeScale, DisplayWindow, ViewSettings},
    io::{file_extension, preset},
    plot::figure_from_recording,
    session::{load_preset_recording, load_upload, LoadedRecording},
};
use log::info;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "eegscope",
    version,
    about = "eegscope: EEG recording ingestion and channel tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TimePolicyArg {
    Labeled,
    Synthetic,
}

impl From<TimePolicyArg> for TimePolicy {
    fn from(arg: TimePolicyArg) -> Self {
        match arg {
            TimePolicyArg::Labeled => TimePolicy::Labeled,
            TimePolicyArg::Synthetic => TimePolicy::Synthetic,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ChannelCheckArg {
    Off,
    Warn,
    Enforce,
}

impl From<ChannelCheckArg> for ChannelCheck {
    fn from(arg: ChannelCheckArg) -> Self {
        match arg {
            ChannelCheckArg::Off => ChannelCheck::Off,
            ChannelCheckArg::Warn => ChannelCheck::Warn,
            ChannelCheckArg::Enforce => ChannelCheck::Enforce,
        }
    }
}

/// Source selection shared by the commands that read a recording.
#[derive(Args)]
struct SourceArgs {
    /// Uploaded recording (.csv, .xlsx or .xls)
    #[arg(long, conflicts_with = "preset")]
    input: Option<PathBuf>,
    /// Preset recording id (s00 .. s35), read from --preset-dir
    #[arg(long)]
    preset: Option<String>,
    #[arg(long, default_value = "data")]
    preset_dir: PathBuf,
    /// Declared MIME type; guessed from the extension when omitted
    #[arg(long)]
    mime: Option<String>,
    /// TOML file with ingest settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    time_policy: Option<TimePolicyArg>,
    #[arg(long)]
    sampling_interval: Option<f64>,
    #[arg(long)]
    channel_check: Option<ChannelCheckArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a recording and print a JSON summary (channels, groups, window)
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Ingest a recording and print one JSON sample per line
    Samples {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Group channel names by region
    Channels {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Write the selected channels as CSV for the analysis upload
    Export {
        #[command(flatten)]
        source: SourceArgs,
        /// Comma-separated channels; all detected channels when omitted
        #[arg(long, value_delimiter = ',')]
        channels: Vec<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the stacked strip figure for a time window as JSON
    Traces {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_delimiter = ',')]
        channels: Vec<String>,
        #[arg(long)]
        start: Option<f64>,
        #[arg(long)]
        end: Option<f64>,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        #[arg(long, default_value_t = 2000)]
        max_points: usize,
    },
    /// Print the JSON body that requests analysis of a preset recording
    PresetRequest {
        id: String,
        #[arg(long, value_delimiter = ',')]
        channels: Vec<String>,
    },
    /// Summarize an analysis response: artifact kind and resolved URL
    Report {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect { source } => cmd_inspect(&source)?,
        Commands::Samples { source } => cmd_samples(&source)?,
        Commands::Channels { names } => cmd_channels(&names)?,
        Commands::Export {
            source,
            channels,
            out,
        } => cmd_export(&source, &channels, out.as_deref())?,
        Commands::Traces {
            source,
            channels,
            start,
            end,
            scale,
            max_points,
        } => cmd_traces(&source, &channels, start, end, scale, max_points)?,
        Commands::PresetRequest { id, channels } => cmd_preset_request(&id, &channels)?,
        Commands::Report { input } => cmd_report(&input)?,
    }
    Ok(())
}

fn ingest_config(args: &SourceArgs) -> Result<IngestConfig> {
    let mut config = match &args.config {
        Some(path) => IngestConfig::load(path)?,
        None => IngestConfig::default(),
    };
    if let Some(policy) = args.time_policy {
        config.time_policy = policy.into();
    }
    if let Some(interval) = args.sampling_interval {
        config.sampling_interval = interval;
    }
    if let Some(check) = args.channel_check {
        config.channel_check = check.into();
    }
    config.validate()?;
    Ok(config)
}

fn guess_mime(path: &Path) -> &'static str {
    let name = path.to_string_lossy();
    match file_extension(&name).as_deref() {
        Some("csv") => "text/csv",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xls") => "application/vnd.ms-excel",
        _ => "application/octet-stream",
    }
}

fn load_recording(args: &SourceArgs) -> Result<LoadedRecording> {
    if let Some(id) = &args.preset {
        return Ok(load_preset_recording(&args.preset_dir, id)?);
    }
    let Some(path) = &args.input else {
        bail!("pass --input <FILE> or --preset <ID>");
    };
    let config = ingest_config(args)?;
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());
    let mime = args
        .mime
        .clone()
        .unwrap_or_else(|| guess_mime(path).to_string());
    let loaded = load_upload(&bytes, &file_name, &mime, &config)?;
    info!(
        "loaded {} ({} samples, {} channels)",
        loaded.source,
        loaded.samples.len(),
        loaded.detected.available.len()
    );
    Ok(loaded)
}

#[derive(Serialize)]
struct InspectSummary<'a> {
    source: &'a str,
    samples: usize,
    available: &'a [String],
    groups: &'a [eegscope_lib::channels::ChannelGroup],
    window: DisplayWindow,
}

fn cmd_inspect(args: &SourceArgs) -> Result<()> {
    let loaded = load_recording(args)?;
    let summary = InspectSummary {
        source: &loaded.source,
        samples: loaded.samples.len(),
        available: &loaded.detected.available,
        groups: &loaded.detected.groups,
        window: loaded.window,
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn cmd_samples(args: &SourceArgs) -> Result<()> {
    let loaded = load_recording(args)?;
    for sample in &loaded.samples {
        println!("{}", serde_json::to_string(sample)?);
    }
    Ok(())
}

fn cmd_channels(names: &[String]) -> Result<()> {
    let detected = organize(names);
    println!("{}", serde_json::to_string(&detected)?);
    Ok(())
}

fn selected_or_all(loaded: &LoadedRecording, channels: &[String]) -> Vec<String> {
    if channels.is_empty() {
        loaded.selection.channels().to_vec()
    } else {
        channels.iter().map(|name| name.to_uppercase()).collect()
    }
}

fn cmd_export(args: &SourceArgs, channels: &[String], out: Option<&Path>) -> Result<()> {
    let loaded = load_recording(args)?;
    let selected = selected_or_all(&loaded, channels);
    let csv = processed_csv(&loaded.samples, &selected)?;
    info!(
        "processed file for POST {}: {} columns",
        UploadAnalysisRequest::ENDPOINT,
        selected.len() + 1
    );
    match out {
        Some(path) => {
            fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?
        }
        None => print!("{}", csv),
    }
    Ok(())
}

fn cmd_traces(
    args: &SourceArgs,
    channels: &[String],
    start: Option<f64>,
    end: Option<f64>,
    scale: f64,
    max_points: usize,
) -> Result<()> {
    let loaded = load_recording(args)?;
    let selected = selected_or_all(&loaded, channels);
    let view = ViewSettings {
        window: DisplayWindow::new(
            start.unwrap_or(loaded.window.start),
            end.unwrap_or(loaded.window.end),
        ),
        scale: AmplitudeScale::new(scale),
    };
    let fig = figure_from_recording(&loaded.source, &loaded.samples, &selected, &view, max_points);
    println!("{}", serde_json::to_string(&fig)?);
    Ok(())
}

fn cmd_preset_request(id: &str, channels: &[String]) -> Result<()> {
    let file = preset::preset_file_name(id)?;
    let selected: Vec<String> = if channels.is_empty() {
        preset::STANDARD_CHANNELS.iter().map(|s| s.to_string()).collect()
    } else {
        channels.iter().map(|name| name.to_uppercase()).collect()
    };
    let request = PresetAnalysisRequest::new(&file, &selected);
    info!("body for POST {}", PresetAnalysisRequest::ENDPOINT);
    println!("{}", serde_json::to_string(&request)?);
    Ok(())
}

#[derive(Serialize)]
struct ArtifactSummary {
    name: String,
    kind: ArtifactKind,
    url: String,
}

fn cmd_report(input: &Path) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let response = AnalysisResponse::from_json(&text)?;
    let artifacts = response.artifacts();
    if artifacts.is_empty() {
        bail!("no artifacts found in {}", input.display());
    }
    for artifact in artifacts {
        let summary = ArtifactSummary {
            kind: artifact.kind(),
            url: artifact.resolved_url(),
            name: artifact.name,
        };
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}
