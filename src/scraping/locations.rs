use crate::error::ClientError;
use crate::models::location::Location;
use crate::scraping::client::HttpClient;
use url::Url;

pub async fn fetch_locations(http: &HttpClient, url: &Url) -> Result<Vec<Location>, ClientError> {
    http.get_json(url.clone()).await
}
