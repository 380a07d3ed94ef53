use crate::config::Config;
use crate::scraping::scraper::{RunSummary, VaccineSlotScraper};
use anyhow::Result;
use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

pub async fn run(config: &Config) -> Result<RunSummary> {
    let run_id = Uuid::new_v4();
    let today = Utc::now().date_naive();
    let scraper = VaccineSlotScraper::new(config)?;

    let summary = scraper
        .run(today)
        .instrument(tracing::info_span!("run", %run_id))
        .await?;

    if summary.availability_failures > 0 || summary.write_failures > 0 {
        tracing::warn!(
            %run_id,
            "{} availability lookups and {} writes failed",
            summary.availability_failures,
            summary.write_failures
        );
    }
    tracing::info!(
        %run_id,
        "done: {} of {} locations written, {} of {} dates fetched",
        summary.written,
        summary.locations,
        summary.dates_fetched,
        summary.dates_requested
    );

    Ok(summary)
}
