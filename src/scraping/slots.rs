use crate::config::{BookingProfile, FanOutPolicy};
use crate::models::availability::AvailableDate;
use crate::models::slots::{SlotRecord, SlotRequest};
use crate::scraping::client::{HttpClient, endpoint};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use url::Url;

#[derive(Debug)]
enum TaskOutcome {
    Succeeded(SlotRecord),
    Failed,
    /// never started its request because a sibling already hit an http error
    Skipped,
}

#[derive(Debug, Default)]
pub struct FanOutReport {
    pub records: Vec<SlotRecord>,
    pub failed: usize,
    pub skipped: usize,
}

impl FanOutReport {
    pub fn succeeded(&self) -> usize {
        self.records.len()
    }
}

/// Fetches the slots of every available date of a location concurrently,
/// one task per date, with no cap on in-flight requests.
pub struct SlotFanOut {
    http: HttpClient,
    api_base: Url,
    request: SlotRequest,
    policy: FanOutPolicy,
}

impl SlotFanOut {
    pub fn new(
        http: HttpClient,
        api_base: Url,
        profile: &BookingProfile,
        policy: FanOutPolicy,
    ) -> Self {
        SlotFanOut {
            http,
            api_base,
            request: SlotRequest {
                vaccine_data: profile.vaccine_data.clone(),
                group_size: profile.group_size,
                url: profile.booking_url.clone(),
                time_zone: profile.time_zone.clone(),
            },
            policy,
        }
    }

    /// Waits for every dispatched task and returns whatever succeeded.
    /// A failing date only shrinks the result, it never fails the call.
    pub async fn fetch_all(
        self: Arc<Self>,
        ext_id: &str,
        dates: &[AvailableDate],
    ) -> FanOutReport {
        let mut report = FanOutReport::default();
        if dates.is_empty() {
            return report;
        }

        // every task sends exactly once, so this capacity never blocks a sender
        let (tx, mut rx) = mpsc::channel(dates.len());
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::with_capacity(dates.len());

        for available in dates {
            let engine = Arc::clone(&self);
            let tx = tx.clone();
            let cancelled = Arc::clone(&cancelled);
            let ext_id = ext_id.to_string();
            let date = available.date.clone();

            handles.push(tokio::spawn(async move {
                let outcome = engine.fetch_date(&ext_id, &date, &cancelled).await;
                // receiver outlives every sender
                let _ = tx.send(outcome).await;
            }));
        }
        drop(tx);

        // single consumer, the only writer of `report`
        while let Some(outcome) = rx.recv().await {
            match outcome {
                TaskOutcome::Succeeded(record) => report.records.push(record),
                TaskOutcome::Failed => report.failed += 1,
                TaskOutcome::Skipped => report.skipped += 1,
            }
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("slot task for {} did not finish: {:?}", ext_id, e);
                report.failed += 1;
            }
        }

        report
    }

    async fn fetch_date(&self, ext_id: &str, date: &str, cancelled: &AtomicBool) -> TaskOutcome {
        if self.policy == FanOutPolicy::StopOnHttpError && cancelled.load(Ordering::Acquire) {
            debug!("skipping {} at {}, a sibling date already failed", date, ext_id);
            return TaskOutcome::Skipped;
        }

        let url = match endpoint(
            &self.api_base,
            &["public", "locations", ext_id, "date", date, "slots"],
        ) {
            Ok(url) => url,
            Err(e) => {
                error!("{}", e);
                return TaskOutcome::Failed;
            }
        };

        match self.http.post_json::<_, SlotRecord>(url, &self.request).await {
            Ok(mut record) => {
                if record.date != date {
                    if !record.date.is_empty() {
                        warn!(
                            "asked for {} at {} but got slots for {}",
                            date, ext_id, record.date
                        );
                    }
                    record.date = date.to_string();
                }
                if record.location_ext_id.is_empty() {
                    record.location_ext_id = ext_id.to_string();
                }
                TaskOutcome::Succeeded(record)
            }
            Err(e) => {
                if e.is_http_status() && self.policy == FanOutPolicy::StopOnHttpError {
                    cancelled.store(true, Ordering::Release);
                }
                error!("slots for {} on {} failed: {}", ext_id, date, e);
                TaskOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::{Days, NaiveDate};
    use serde_json::json;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine(server: &MockServer, policy: FanOutPolicy) -> Arc<SlotFanOut> {
        let config = Config::default();
        Arc::new(SlotFanOut::new(
            HttpClient::new(&config).unwrap(),
            Url::parse(&server.uri()).unwrap(),
            &config.profile,
            policy,
        ))
    }

    fn available(date: &str) -> AvailableDate {
        AvailableDate {
            date: date.to_string(),
            available: true,
            vaccine_data: String::new(),
        }
    }

    fn slots_body(date: &str) -> serde_json::Value {
        json!({
            "locationExtId": "abc",
            "date": date,
            "slotsWithAvailability": [{"localStartTime": "09:00", "durationSeconds": 900}]
        })
    }

    async fn mount_ok(server: &MockServer, date: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/public/locations/abc/date/{date}/slots")))
            .respond_with(ResponseTemplate::new(200).set_body_json(slots_body(date)))
            .mount(server)
            .await;
    }

    async fn mount_status(server: &MockServer, date: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/public/locations/abc/date/{date}/slots")))
            .respond_with(ResponseTemplate::new(status))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn empty_dates_dispatch_nothing() {
        let server = MockServer::start().await;
        let report = engine(&server, FanOutPolicy::Exhaustive)
            .fetch_all("abc", &[])
            .await;

        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed, 0);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sends_profile_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/public/locations/abc/date/2024-03-01/slots"))
            .and(body_json(json!({
                "vaccineData": "WyJhMVQ0YTAwMDAwMEdiVGdFQUsiXQ==",
                "groupSize": 1,
                "url": "https://app.bookmyvaccine.covid19.health.nz/appointment-select",
                "timeZone": "Pacific/Auckland"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(slots_body("2024-03-01")))
            .expect(1)
            .mount(&server)
            .await;

        let report = engine(&server, FanOutPolicy::Exhaustive)
            .fetch_all("abc", &[available("2024-03-01")])
            .await;

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.records[0].slots[0].duration_seconds, 900);
    }

    #[tokio::test]
    async fn result_count_matches_successes() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        for n in [1usize, 5, 50] {
            // failing share as numerator over 2: none, half, all
            for halves in [0usize, 1, 2] {
                let failing = n * halves / 2;
                let server = MockServer::start().await;
                let mut dates = Vec::with_capacity(n);

                for i in 0..n {
                    let date = first
                        .checked_add_days(Days::new(i as u64))
                        .unwrap()
                        .format("%Y-%m-%d")
                        .to_string();
                    if i < failing {
                        mount_status(&server, &date, 500).await;
                    } else {
                        mount_ok(&server, &date).await;
                    }
                    dates.push(available(&date));
                }

                let report = tokio::time::timeout(
                    Duration::from_secs(10),
                    engine(&server, FanOutPolicy::Exhaustive).fetch_all("abc", &dates),
                )
                .await
                .unwrap_or_else(|_| panic!("fan-out over {n} dates did not finish"));

                let expected = n - failing;
                assert_eq!(report.succeeded(), expected, "n={n} failing={failing}");
                assert_eq!(report.failed, n - expected, "n={n} failing={failing}");
                assert_eq!(report.skipped, 0);

                let mut got: Vec<_> = report.records.iter().map(|r| r.date.clone()).collect();
                got.sort();
                let mut want: Vec<_> = dates[failing..].iter().map(|d| d.date.clone()).collect();
                want.sort();
                assert_eq!(got, want);
            }
        }
    }

    #[tokio::test]
    async fn decode_failure_only_drops_its_date() {
        let server = MockServer::start().await;
        mount_ok(&server, "2024-03-01").await;
        Mock::given(method("POST"))
            .and(path("/public/locations/abc/date/2024-03-02/slots"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let report = engine(&server, FanOutPolicy::Exhaustive)
            .fetch_all("abc", &[available("2024-03-01"), available("2024-03-02")])
            .await;

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.records[0].date, "2024-03-01");
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn requests_run_concurrently() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(slots_body(""))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;

        let dates: Vec<_> = (1..=10)
            .map(|day| available(&format!("2024-02-{day:02}")))
            .collect();

        let started = Instant::now();
        let report = engine(&server, FanOutPolicy::Exhaustive)
            .fetch_all("abc", &dates)
            .await;

        assert_eq!(report.succeeded(), 10);
        // sequential would take at least 4s
        assert!(started.elapsed() < Duration::from_millis(2500));
    }

    #[tokio::test]
    async fn record_is_keyed_by_requested_date() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/public/locations/abc/date/2024-03-01/slots"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "slotsWithAvailability": []
            })))
            .mount(&server)
            .await;

        let report = engine(&server, FanOutPolicy::Exhaustive)
            .fetch_all("abc", &[available("2024-03-01")])
            .await;

        assert_eq!(report.records[0].date, "2024-03-01");
        assert_eq!(report.records[0].location_ext_id, "abc");
    }

    #[tokio::test]
    async fn raised_flag_skips_new_tasks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(slots_body("2024-03-01")))
            .expect(0)
            .mount(&server)
            .await;

        let engine = engine(&server, FanOutPolicy::StopOnHttpError);
        let outcome = engine
            .fetch_date("abc", "2024-03-01", &AtomicBool::new(true))
            .await;

        assert!(matches!(outcome, TaskOutcome::Skipped));
    }

    #[tokio::test]
    async fn exhaustive_ignores_flag() {
        let server = MockServer::start().await;
        mount_ok(&server, "2024-03-01").await;

        let engine = engine(&server, FanOutPolicy::Exhaustive);
        let outcome = engine
            .fetch_date("abc", "2024-03-01", &AtomicBool::new(true))
            .await;

        assert!(matches!(outcome, TaskOutcome::Succeeded(_)));
    }

    #[tokio::test]
    async fn http_error_raises_flag_under_stop_policy() {
        let server = MockServer::start().await;
        mount_status(&server, "2024-03-01", 500).await;

        let cancelled = AtomicBool::new(false);
        let engine = engine(&server, FanOutPolicy::StopOnHttpError);
        let outcome = engine.fetch_date("abc", "2024-03-01", &cancelled).await;

        assert!(matches!(outcome, TaskOutcome::Failed));
        assert!(cancelled.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn stop_policy_accounts_for_every_task() {
        let server = MockServer::start().await;
        let dates: Vec<_> = (1..=8)
            .map(|day| available(&format!("2024-04-{day:02}")))
            .collect();
        for date in &dates {
            mount_status(&server, &date.date, 500).await;
        }

        let report = engine(&server, FanOutPolicy::StopOnHttpError)
            .fetch_all("abc", &dates)
            .await;

        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed + report.skipped, 8);
        assert!(report.failed >= 1);
    }
}
