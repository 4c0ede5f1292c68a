mod common;
use common::get_providers;
use spectra::{Pipeline, SourceRequest, UploadedFile};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (market_data, analysis) = get_providers();
    let pipeline = Pipeline::builder()
        .with_market_data(market_data)
        .with_analysis_service(analysis)
        .build()?;

    // Two trending series with a shared component.
    let a: Vec<f64> = (0..64)
        .map(|t| 100.0 + f64::from(t) + (f64::from(t) / 3.0).sin())
        .collect();
    let b: Vec<f64> = (0..64).map(|t| 50.0 + 0.5 * f64::from(t)).collect();
    let doc = format!(r#"{{"stock1": {a:?}, "stock2": {b:?}}}"#);

    let outcome = pipeline
        .submit(SourceRequest::File(Some(UploadedFile::new("demo.json", doc))))
        .await;
    println!("Outcome: {outcome:?}");

    let target = std::env::temp_dir().join(spectra_core::DEFAULT_EXPORT_FILE_NAME);
    let path = pipeline.export(Some(target.as_path()))?;
    println!("Workbook written to {}", path.display());
    Ok(())
}
