use crate::config::BookingProfile;
use crate::error::ClientError;
use crate::models::availability::{AvailabilityRequest, AvailableDate, LocationAvailability};
use crate::models::location::Location;
use crate::scraping::client::{HttpClient, endpoint};
use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::{debug, warn};
use url::Url;

pub struct AvailabilityClient {
    http: HttpClient,
    api_base: Url,
    profile: BookingProfile,
    window_months: u32,
}

impl AvailabilityClient {
    pub fn new(
        http: HttpClient,
        api_base: Url,
        profile: BookingProfile,
        window_months: u32,
    ) -> Self {
        AvailabilityClient {
            http,
            api_base,
            profile,
            window_months,
        }
    }

    pub async fn available_dates(
        &self,
        location: &Location,
        today: NaiveDate,
    ) -> Result<Vec<AvailableDate>, ClientError> {
        let (start_date, end_date) = date_window(today, self.window_months);
        let url = endpoint(
            &self.api_base,
            &["public", "locations", &location.ext_id, "availability"],
        )?;

        let body = AvailabilityRequest {
            end_date,
            start_date,
            vaccine_data: &self.profile.vaccine_data,
            group_size: self.profile.group_size,
            dose_number: self.profile.dose_number,
            // the availability endpoint is called with these left blank
            url: "",
            time_zone: "",
        };

        let response: LocationAvailability = self.http.post_json(url, &body).await?;
        if !response.location_ext_id.is_empty() && response.location_ext_id != location.ext_id {
            warn!(
                "availability for {} answered as {}",
                location.ext_id, response.location_ext_id
            );
        }
        let total = response.availability.len();
        let dates = filter_available(response.availability);

        debug!(
            "{} of {} dates available at {} for {}",
            dates.len(),
            total,
            location.ext_id,
            response.vaccine_data
        );

        Ok(dates)
    }
}

pub fn filter_available(dates: Vec<AvailableDate>) -> Vec<AvailableDate> {
    dates.into_iter().filter(|d| d.available).collect()
}

/// `[today, today + months]`. A day past the end of the target month rolls
/// over into the next one, Dec 31 + 2 months lands in early March.
pub fn date_window(today: NaiveDate, months: u32) -> (NaiveDate, NaiveDate) {
    let end = today
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(months)))
        .and_then(|first| first.checked_add_days(Days::new(u64::from(today.day() - 1))))
        .unwrap_or(NaiveDate::MAX);
    (today, end)
}
