use spectra_core::{AnalysisService, MarketDataProvider};
use std::sync::Arc;

/// Providers for the examples: fixtures when `SPECTRA_EXAMPLES_USE_MOCK` is
/// set, the public MOEX endpoint and a local analysis service otherwise.
#[must_use]
pub fn get_providers() -> (Arc<dyn MarketDataProvider>, Arc<dyn AnalysisService>) {
    if std::env::var("SPECTRA_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using mock providers for CI) ---");
        (
            Arc::new(spectra_mock::MockMarketData::new()),
            Arc::new(spectra_mock::MockAnalysisService::new()),
        )
    } else {
        (
            Arc::new(spectra_moex::MoexConnector::new_default()),
            Arc::new(spectra_service::AnalysisClient::new_default()),
        )
    }
}
