//! spectra CLI: run one spectral analysis of two series from the terminal.
//!
//! - `--method fetch` (default) loads daily closes of `--first` and `--second`
//!   over `--period` from MOEX.
//! - `--method file --file data.json` reads two series from a JSON document.
//! - `--export out.xlsx` writes the results as a workbook after a successful run.
//! - `--mock` swaps both remote services for in-process fixtures.
//!
//! Exit codes: 0 on success, 1 when the run ends in an error, 2 for
//! unusable input, 3 when market data could not be loaded.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use spectra::{Pipeline, PipelineSnapshot, RunOutcome, SourceRequest, UploadedFile};
use spectra_core::{
    AnalysisService, Company, DEFAULT_ANALYSIS_BASE_URL, DEFAULT_MARKET_DATA_BASE_URL,
    MarketDataProvider, Period, Phase, SpectraConfig, SpectraError,
};
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Query MOEX for two instruments.
    Fetch,
    /// Read two series from a JSON document.
    File,
}

#[derive(Parser, Debug)]
#[command(
    name = "spectra",
    version,
    about = "Spectral analysis of two market series"
)]
struct Cli {
    /// Where the two series come from.
    #[arg(long, value_enum, default_value_t = Method::Fetch)]
    method: Method,

    /// Instrument of series 1 (YNDX, SBER, GAZP, VTBR, ROSN, LKOH, GMKN).
    #[arg(long, default_value = "GAZP")]
    first: Company,

    /// Instrument of series 2.
    #[arg(long, default_value = "SBER")]
    second: Company,

    /// Lookback ending today: year, half, quarter or month.
    #[arg(long, default_value = "year")]
    period: Period,

    /// JSON document with two numeric arrays (file method).
    #[arg(long)]
    file: Option<PathBuf>,

    /// Base URL of the analysis service.
    #[arg(long, env = "SPECTRA_ANALYSIS_URL", default_value = DEFAULT_ANALYSIS_BASE_URL)]
    analysis_url: String,

    /// MOEX ISS securities endpoint.
    #[arg(long, env = "SPECTRA_MOEX_URL", default_value = DEFAULT_MARKET_DATA_BASE_URL)]
    moex_url: String,

    /// Deadline for each remote call, in seconds. Unbounded when omitted.
    #[arg(long, env = "SPECTRA_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Write the results to this workbook after a successful run.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Use in-process fixtures instead of the remote services.
    #[arg(long, env = "SPECTRA_USE_MOCK")]
    mock: bool,
}

impl Cli {
    fn config(&self) -> SpectraConfig {
        SpectraConfig {
            analysis_base_url: self.analysis_url.clone(),
            market_data_base_url: self.moex_url.clone(),
            request_timeout: self.timeout_secs.map(Duration::from_secs),
            ..SpectraConfig::default()
        }
    }

    fn request(&self) -> Result<SourceRequest> {
        Ok(match self.method {
            Method::Fetch => SourceRequest::Fetch {
                first: self.first,
                second: self.second,
                period: self.period,
            },
            Method::File => SourceRequest::File(self.file.as_deref().map(read_upload).transpose()?),
        })
    }
}

fn read_upload(path: &Path) -> Result<UploadedFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(UploadedFile::new(name, contents))
}

fn providers(
    cli: &Cli,
    cfg: &SpectraConfig,
) -> Result<(Arc<dyn MarketDataProvider>, Arc<dyn AnalysisService>)> {
    if cli.mock {
        tracing::info!("using mock providers");
        return Ok((
            Arc::new(spectra_mock::MockMarketData::new()),
            Arc::new(spectra_mock::MockAnalysisService::new()),
        ));
    }
    let mut moex = spectra_moex::MoexConnector::builder().base_url(&cfg.market_data_base_url);
    let mut service = spectra_service::AnalysisClient::builder().base_url(&cfg.analysis_base_url);
    if let Some(t) = cfg.request_timeout {
        moex = moex.timeout(t);
        service = service.timeout(t);
    }
    Ok((Arc::new(moex.build()?), Arc::new(service.build()?)))
}

fn unsubmittable_reason(request: &SourceRequest) -> String {
    match request {
        SourceRequest::File(None) => SpectraError::NoFile.to_string(),
        _ => "choose two different instruments".to_string(),
    }
}

/// Submit `request`, printing every phase change observed on the way.
async fn run_with_progress(pipeline: &Pipeline, request: SourceRequest) -> RunOutcome {
    let mut rx: watch::Receiver<PipelineSnapshot> = pipeline.subscribe();
    let mut last = rx.borrow_and_update().state.phase();
    let mut report = |phase: Phase| {
        if phase != last {
            println!("phase: {phase:?}");
            last = phase;
        }
    };

    let run = pipeline.submit(request);
    tokio::pin!(run);
    let outcome = loop {
        tokio::select! {
            outcome = &mut run => break outcome,
            Ok(()) = rx.changed() => report(rx.borrow_and_update().state.phase()),
        }
    };
    // changes coalesce; make sure the settled phase is printed
    report(rx.borrow_and_update().state.phase());
    outcome
}

fn print_summary(pipeline: &Pipeline) {
    let results = pipeline.results();
    let raw = &results.raw;
    println!("series: {} / {}", raw.first_code, raw.second_code);
    println!("merged rows: {}", raw.len());
    println!("spread points: {}", results.spread.len());
    println!("periodogram points: {}", results.periodogram.len());
    if let (Some(first), Some(last)) = (raw.rows.first(), raw.rows.last()) {
        println!("range: {} .. {}", first.date, last.date);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // RUST_LOG=info,spectra=debug for spans around every remote call
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let cfg = cli.config();
    let request = cli.request()?;
    if !request.is_submittable() {
        eprintln!("error: {}", unsubmittable_reason(&request));
        return Ok(ExitCode::from(2));
    }

    let (market_data, analysis) = providers(&cli, &cfg)?;
    let pipeline = Pipeline::builder()
        .with_market_data(market_data)
        .with_analysis_service(analysis)
        .config(cfg)
        .build()?;

    match run_with_progress(&pipeline, request).await {
        RunOutcome::Success => {
            print_summary(&pipeline);
            if let Some(path) = cli.export.as_deref() {
                let written = pipeline.export(Some(path))?;
                println!("exported: {}", written.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Failed(msg) => {
            eprintln!("error: {msg}");
            Ok(ExitCode::from(1))
        }
        RunOutcome::SourceUnavailable { code } => {
            eprintln!("no market data for {code}");
            Ok(ExitCode::from(3))
        }
        RunOutcome::Superseded => Ok(ExitCode::from(1)),
    }
}
