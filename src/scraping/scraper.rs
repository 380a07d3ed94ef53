use crate::config::Config;
use crate::models::location::Location;
use crate::output::OutputWriter;
use crate::scraping::aggregate::combine_slots;
use crate::scraping::availability::AvailabilityClient;
use crate::scraping::client::HttpClient;
use crate::scraping::locations::fetch_locations;
use crate::scraping::slots::SlotFanOut;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};
use url::Url;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub locations: usize,
    pub written: usize,
    pub availability_failures: usize,
    pub write_failures: usize,
    pub dates_requested: usize,
    pub dates_fetched: usize,
}

pub struct VaccineSlotScraper {
    http: HttpClient,
    locations_url: Url,
    availability: AvailabilityClient,
    slots: Arc<SlotFanOut>,
    output: OutputWriter,
}

impl VaccineSlotScraper {
    pub fn new(config: &Config) -> Result<Self> {
        let http = HttpClient::new(config).context("building http client")?;

        Ok(VaccineSlotScraper {
            availability: AvailabilityClient::new(
                http.clone(),
                config.api_base.clone(),
                config.profile.clone(),
                config.window_months,
            ),
            slots: Arc::new(SlotFanOut::new(
                http.clone(),
                config.api_base.clone(),
                &config.profile,
                config.fan_out,
            )),
            output: OutputWriter::new(config.output_dir.clone()),
            locations_url: config.locations_url.clone(),
            http,
        })
    }

    pub async fn run(&self, today: NaiveDate) -> Result<RunSummary> {
        let locations = fetch_locations(&self.http, &self.locations_url)
            .await
            .with_context(|| format!("loading locations from {}", self.locations_url))?;

        info!(
            "scraping {} locations into {}",
            locations.len(),
            self.output.dir().display()
        );

        let mut summary = RunSummary {
            locations: locations.len(),
            ..RunSummary::default()
        };

        for location in &locations {
            let span = info_span!("location", ext_id = %location.ext_id);
            self.process_location(location, today, &mut summary)
                .instrument(span)
                .await;
        }

        Ok(summary)
    }

    async fn process_location(
        &self,
        location: &Location,
        today: NaiveDate,
        summary: &mut RunSummary,
    ) {
        let dates = match self.availability.available_dates(location, today).await {
            Ok(dates) => dates,
            Err(e) => {
                error!("availability lookup failed: {}", e);
                summary.availability_failures += 1;
                return;
            }
        };

        let report = Arc::clone(&self.slots)
            .fetch_all(&location.ext_id, &dates)
            .await;
        summary.dates_requested += dates.len();
        summary.dates_fetched += report.succeeded();

        let combined = combine_slots(&report.records);
        if combined.is_empty() {
            debug!("no slots for {}", location.display_address);
        }

        let output = self.output.clone();
        let ext_id = location.ext_id.clone();
        let days = combined.len();
        let written = tokio::task::spawn_blocking(move || output.write(&ext_id, &combined)).await;

        match written {
            Ok(Ok(path)) => {
                info!(
                    "{} of {} available dates fetched ({} failed, {} skipped), wrote {} days to {}",
                    report.succeeded(),
                    dates.len(),
                    report.failed,
                    report.skipped,
                    days,
                    path.display()
                );
                summary.written += 1;
            }
            Ok(Err(e)) => {
                error!("writing slots failed: {}", e);
                summary.write_failures += 1;
            }
            Err(e) => {
                error!("writer task did not finish: {:?}", e);
                summary.write_failures += 1;
            }
        }
    }
}
