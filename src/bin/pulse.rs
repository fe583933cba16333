//! Pulse CLI - Command-line interface for tubepulse
//!
//! Commands:
//! - analyze: Score a comment or caption payload into a sentiment report
//! - export: Score a payload and write the per-unit CSV table
//! - validate: Report malformed units in a payload
//! - metadata: Decode a video metadata response
//! - doctor: Diagnose configuration and environment
//! - schema: Print input/output schema information

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use tubepulse::adapters::{adapter_for, TextUnitAdapter, VideoMetadataAdapter};
use tubepulse::encoder::ReportEncoder;
use tubepulse::export;
use tubepulse::types::{SentimentReport, SourceKind};
use tubepulse::{AnalysisConfig, ComputeError, LexiconScorer, SentimentProcessor};
use tubepulse::{PRODUCER_NAME, PULSE_VERSION};

/// Pulse - Sentiment scoring for YouTube comments and captions
#[derive(Parser)]
#[command(name = "pulse")]
#[command(version = PULSE_VERSION)]
#[command(about = "Score YouTube comments and captions for sentiment", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a payload into a sentiment report
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Kind of payload
        #[arg(short, long)]
        source: SourceArg,

        /// Video URL or identifier to stamp on the report
        #[arg(long)]
        video_id: Option<String>,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        format: OutputFormat,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Score a payload and write the per-unit CSV table
    Export {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Kind of payload
        #[arg(short, long)]
        source: SourceArg,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Report malformed units in a payload
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Kind of payload
        #[arg(short, long)]
        source: SourceArg,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a video metadata response
    Metadata {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check an analysis config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Load analysis config from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of polarity histogram bins
    #[arg(long)]
    bins: Option<usize>,

    /// Rolling-average window (units)
    #[arg(long)]
    window: Option<usize>,

    /// Size of each most-positive/most-negative list
    #[arg(long)]
    top_k: Option<usize>,

    /// Polarity above which a unit is Positive
    #[arg(long, allow_hyphen_values = true)]
    positive_threshold: Option<f64>,

    /// Polarity below which a unit is Negative
    #[arg(long, allow_hyphen_values = true)]
    negative_threshold: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    /// Comment threads or a JSON array of comment strings
    Comments,
    /// Caption transcript records
    Captions,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Comments => SourceKind::Comments,
            SourceArg::Captions => SourceKind::Captions,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
    /// Newline-delimited JSON (one scored unit per line)
    Ndjson,
    /// Per-unit CSV table
    Csv,
    /// Plain-text summary
    Summary,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Accepted comment and caption payloads
    Input,
    /// Sentiment report
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), PulseCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            source,
            video_id,
            format,
            config,
        } => cmd_analyze(&input, &output, source.into(), video_id.as_deref(), format, &config),

        Commands::Export {
            input,
            output,
            source,
            config,
        } => cmd_analyze(&input, &output, source.into(), None, OutputFormat::Csv, &config),

        Commands::Validate { input, source, json } => cmd_validate(&input, source.into(), json),

        Commands::Metadata { input, json } => cmd_metadata(&input, json),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),

        Commands::Schema { schema_type, json_schema } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    source: SourceKind,
    video_id: Option<&str>,
    format: OutputFormat,
    config_args: &ConfigArgs,
) -> Result<(), PulseCliError> {
    let config = resolve_config(config_args)?;
    let input_data = read_input(input)?;

    let processor = SentimentProcessor::with_config(config)?;
    let report = processor.analyze_json(source, &input_data, video_id)?;

    let output_data = format_output(&report, &format)?;
    write_output(output, &output_data)
}

fn cmd_validate(input: &Path, source: SourceKind, json: bool) -> Result<(), PulseCliError> {
    let input_data = read_input(input)?;
    let batch = adapter_for(source).parse(&input_data)?;

    let report = ValidationReport {
        source: source.as_str().to_string(),
        total_records: batch.units.len() + batch.skipped.len(),
        valid_records: batch.units.len(),
        invalid_records: batch.skipped.len(),
        errors: batch
            .skipped
            .iter()
            .map(|s| ValidationErrorDetail {
                index: s.index,
                error: s.reason.clone(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Source:          {}", report.source);
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Record {}: {}", err.index, err.error);
            }
        }
    }

    if report.invalid_records > 0 {
        Err(PulseCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_metadata(input: &Path, json: bool) -> Result<(), PulseCliError> {
    let input_data = read_input(input)?;
    let metadata = VideoMetadataAdapter.parse(&input_data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    let or_unknown = |value: Option<&str>| value.unwrap_or("-").to_string();
    let count = |value: Option<u64>| value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());

    println!("Video:     {}", metadata.video_id);
    println!("Title:     {}", or_unknown(metadata.title.as_deref()));
    println!("Channel:   {}", or_unknown(metadata.channel_title.as_deref()));
    println!(
        "Published: {}",
        metadata
            .published_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Views:     {}", count(metadata.view_count));
    println!("Likes:     {}", count(metadata.like_count));
    println!("Comments:  {}", count(metadata.comment_count));
    println!("Thumbnail: {}", or_unknown(metadata.thumbnail_url.as_deref()));

    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), PulseCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "pulse_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Pulse version {}", PULSE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "lexicon".to_string(),
        status: CheckStatus::Ok,
        message: format!(
            "Built-in lexicon loaded ({} entries)",
            LexiconScorer::new().lexicon_size()
        ),
    });

    if let Some(config_path) = config {
        let check = if !config_path.exists() {
            DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist".to_string(),
            }
        } else {
            match fs::read_to_string(config_path) {
                Ok(content) => match AnalysisConfig::from_json(&content) {
                    Ok(loaded) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "Config valid ({} bins, window {}, top {})",
                            loaded.histogram_bins, loaded.rolling_window, loaded.top_k
                        ),
                    },
                    Err(e) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Invalid config: {}", e),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read config file: {}", e),
                },
            }
        };
        checks.push(check);
    }

    let stdin_message = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (pass --input <file>)"
    } else {
        "stdin is a pipe (--input - ready)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_message.to_string(),
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: PULSE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Pulse Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(PulseCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), PulseCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input payloads");
                println!();
                println!("1. comments - YouTube commentThreads response");
                println!("   - items[].snippet.topLevelComment.snippet.textOriginal (or textDisplay)");
                println!("   - optional authorDisplayName, likeCount, publishedAt");
                println!("   - a plain JSON array of comment strings is also accepted");
                println!();
                println!("2. captions - transcript records");
                println!("   - [{{ start, duration, text }}] with offsets in seconds");
                println!("   - {{ \"unavailable\": \"<reason>\" }} when the video has no captions");
                println!();
                println!("Malformed records are skipped and listed in the report.");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output: sentiment report");
                println!();
                println!("- video_id, source (comments | captions)");
                println!("- producer: {{ name, version, instance_id }}, computed_at_utc");
                println!("- config: {{ thresholds, histogram_bins, rolling_window, top_k }}");
                println!("- units: [{{ text, polarity, sentiment, time_offset, duration }}]");
                println!("- distribution: {{ total, counts, histogram: [{{ lower, upper, center, count }}] }}");
                println!("- timeline: [{{ time_minutes, polarity, rolling_polarity }}] (captions only)");
                println!("- most_positive, most_negative: ranked units");
                println!("- skipped: [{{ index, reason }}], mean_polarity");
            }
        }
    }

    Ok(())
}

// Helper functions

fn resolve_config(args: &ConfigArgs) -> Result<AnalysisConfig, PulseCliError> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json(&fs::read_to_string(path)?)?,
        None => AnalysisConfig::default(),
    };

    if let Some(bins) = args.bins {
        config.histogram_bins = bins;
    }
    if let Some(window) = args.window {
        config.rolling_window = window;
    }
    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }
    if let Some(threshold) = args.positive_threshold {
        config.thresholds.positive_threshold = threshold;
    }
    if let Some(threshold) = args.negative_threshold {
        config.thresholds.negative_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

fn read_input(input: &Path) -> Result<String, PulseCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), PulseCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn format_output(report: &SentimentReport, format: &OutputFormat) -> Result<String, PulseCliError> {
    let data = match format {
        OutputFormat::Json => ReportEncoder::to_json(report)? + "\n",
        OutputFormat::JsonPretty => ReportEncoder::to_json_pretty(report)? + "\n",
        OutputFormat::Ndjson => export::to_ndjson(&report.units)?,
        OutputFormat::Csv => export::to_csv_string(report.source, &report.units)?,
        OutputFormat::Summary => export::summary_text(report),
    };
    Ok(data)
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "tubepulse input",
        "oneOf": [
            {
                "title": "commentThreads",
                "type": "object",
                "required": ["items"],
                "properties": {
                    "items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "snippet": {
                                    "type": "object",
                                    "properties": {
                                        "topLevelComment": {
                                            "type": "object",
                                            "properties": {
                                                "snippet": {
                                                    "type": "object",
                                                    "properties": {
                                                        "textOriginal": { "type": "string" },
                                                        "textDisplay": { "type": "string" },
                                                        "authorDisplayName": { "type": "string" },
                                                        "likeCount": { "type": "integer", "minimum": 0 },
                                                        "publishedAt": { "type": "string", "format": "date-time" }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            {
                "title": "comment strings",
                "type": "array",
                "items": { "type": "string" }
            },
            {
                "title": "transcript",
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["start", "text"],
                    "properties": {
                        "start": { "type": "number", "minimum": 0 },
                        "duration": { "type": "number", "minimum": 0 },
                        "text": { "type": "string" }
                    }
                }
            },
            {
                "title": "captions unavailable",
                "type": "object",
                "required": ["unavailable"],
                "properties": {
                    "unavailable": { "type": "string" }
                }
            }
        ]
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "tubepulse sentiment report",
        "type": "object",
        "required": ["source", "config", "producer", "computed_at_utc", "units", "skipped", "distribution", "timeline", "most_positive", "most_negative"],
        "properties": {
            "video_id": { "type": ["string", "null"] },
            "source": { "type": "string", "enum": ["comments", "captions"] },
            "config": {
                "type": "object",
                "properties": {
                    "thresholds": {
                        "type": "object",
                        "properties": {
                            "positive_threshold": { "type": "number" },
                            "negative_threshold": { "type": "number" }
                        }
                    },
                    "histogram_bins": { "type": "integer", "minimum": 1 },
                    "rolling_window": { "type": "integer", "minimum": 1 },
                    "top_k": { "type": "integer", "minimum": 0 }
                }
            },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "computed_at_utc": { "type": "string", "format": "date-time" },
            "units": { "type": "array", "items": { "$ref": "#/$defs/unit" } },
            "skipped": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "index": { "type": "integer" },
                        "reason": { "type": "string" }
                    }
                }
            },
            "distribution": {
                "type": "object",
                "properties": {
                    "total": { "type": "integer" },
                    "counts": {
                        "type": "object",
                        "properties": {
                            "Positive": { "type": "integer" },
                            "Neutral": { "type": "integer" },
                            "Negative": { "type": "integer" }
                        }
                    },
                    "histogram": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "lower": { "type": "number" },
                                "upper": { "type": "number" },
                                "center": { "type": "number" },
                                "count": { "type": "integer" }
                            }
                        }
                    }
                }
            },
            "timeline": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "time_minutes": { "type": "number" },
                        "polarity": { "type": "number" },
                        "rolling_polarity": { "type": "number" }
                    }
                }
            },
            "most_positive": { "type": "array", "items": { "$ref": "#/$defs/unit" } },
            "most_negative": { "type": "array", "items": { "$ref": "#/$defs/unit" } },
            "mean_polarity": { "type": ["number", "null"] }
        },
        "$defs": {
            "unit": {
                "type": "object",
                "required": ["text", "polarity", "sentiment"],
                "properties": {
                    "text": { "type": "string" },
                    "polarity": { "type": "number", "minimum": -1, "maximum": 1 },
                    "sentiment": { "type": "string", "enum": ["Positive", "Neutral", "Negative"] },
                    "time_offset": { "type": "number" },
                    "duration": { "type": "number" }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum PulseCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for PulseCliError {
    fn from(e: io::Error) -> Self {
        PulseCliError::Io(e)
    }
}

impl From<ComputeError> for PulseCliError {
    fn from(e: ComputeError) -> Self {
        PulseCliError::Compute(e)
    }
}

impl From<serde_json::Error> for PulseCliError {
    fn from(e: serde_json::Error) -> Self {
        PulseCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<PulseCliError> for CliError {
    fn from(e: PulseCliError) -> Self {
        match e {
            PulseCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            PulseCliError::Compute(e) => compute_error(e),
            PulseCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            PulseCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Malformed records are skipped by 'pulse analyze'".to_string()),
            },
            PulseCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

fn compute_error(e: ComputeError) -> CliError {
    let (code, hint) = match &e {
        ComputeError::CaptionsUnavailable(_) => (
            "CAPTIONS_UNAVAILABLE",
            "The video has no captions; try --source comments",
        ),
        ComputeError::InvalidConfig(_) => (
            "INVALID_CONFIG",
            "Bins and window must be at least 1; negative threshold must not exceed positive",
        ),
        ComputeError::InvalidVideoId(_) => (
            "INVALID_VIDEO_ID",
            "Pass a YouTube URL or an 11-character video id",
        ),
        ComputeError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
        _ => ("PARSE_ERROR", "Run 'pulse schema input' for accepted payloads"),
    };

    CliError {
        code: code.to_string(),
        message: e.to_string(),
        hint: Some(hint.to_string()),
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    source: String,
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
