mod common;
use common::get_providers;
use spectra::{Pipeline, RunOutcome, SourceRequest};
use spectra_core::{Company, Period};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,spectra=debug,spectra_moex=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    let (market_data, analysis) = get_providers();
    let pipeline = Pipeline::builder()
        .with_market_data(market_data)
        .with_analysis_service(analysis)
        .build()?;

    let request = SourceRequest::Fetch {
        first: Company::Gazp,
        second: Company::Sber,
        period: Period::Half,
    };
    println!("Analysing {request:?}...");

    match pipeline.submit(request).await {
        RunOutcome::Success => {
            let results = pipeline.results();
            println!("\n## Merged rows: {}", results.raw.len());
            for row in results.raw.rows.iter().take(5) {
                println!("  {}  {:>10.2}  {:>10.2}", row.date, row.first, row.second);
            }
            println!("## Spread points: {}", results.spread.len());
            println!("## Periodogram points: {}", results.periodogram.len());
        }
        RunOutcome::Failed(msg) => println!("Analysis failed: {msg}"),
        RunOutcome::SourceUnavailable { code } => println!("No market data for {code}"),
        RunOutcome::Superseded => println!("Run was superseded"),
    }
    Ok(())
}
