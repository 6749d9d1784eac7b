//! HTTP client for the RIT case API.
//!
//! Maps HTTP and JSON failures onto `ExchangeError`:
//! 401 is `Authentication`, other non-success statuses are `Http`,
//! empty payloads are `Data`, undecodable bodies are `Decode`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use rit_core::{
    BoxFuture, Exchange, ExchangeError, ExchangeResult, OpenOrder, OrderRequest, OrderStatus,
    Position, Price, SubmitOutcome, Tick, TopOfBook,
};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::{ClientError, ClientResult};
use crate::response::{BookResponse, CaseResponse, HistoryBar, OrderResponse, SecurityResponse};

/// Local RIT client API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9999/v1";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// REST client for one RIT trader session.
#[derive(Debug, Clone)]
pub struct RitClient {
    client: Client,
    base_url: String,
}

impl RitClient {
    /// Create a client that sends `api_key` with every request.
    ///
    /// # Arguments
    /// * `base_url` - API root including the version segment (e.g. "http://localhost:9999/v1")
    /// * `api_key` - value of the `X-API-Key` header
    /// * `timeout` - per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: &str,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(path: &str, response: Response) -> ExchangeResult<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ExchangeError::Authentication(format!(
                "{path} returned 401; the API key must match the one shown in the RIT client"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Http(format!("{path}: HTTP {status}: {body}")));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ExchangeResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| ExchangeError::Http(format!("GET {path} failed: {e}")))?;
        let response = Self::check_status(path, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ExchangeError::Decode(format!("{path}: {e}")))
    }

    /// `GET /case`
    pub async fn fetch_tick(&self) -> ExchangeResult<Tick> {
        let case: CaseResponse = self.get_json("/case", &[]).await?;
        trace!(tick = case.tick, "Case tick");
        Ok(Tick::new(case.tick))
    }

    /// `GET /securities/history?ticker&limit=1`
    pub async fn fetch_last_close(&self, ticker: &str) -> ExchangeResult<Price> {
        let bars: Vec<HistoryBar> = self
            .get_json("/securities/history", &[("ticker", ticker), ("limit", "1")])
            .await?;
        HistoryBar::latest_close(&bars, ticker)
    }

    /// `GET /securities/book?ticker`
    pub async fn fetch_top_of_book(&self, ticker: &str) -> ExchangeResult<TopOfBook> {
        let book: BookResponse = self
            .get_json("/securities/book", &[("ticker", ticker)])
            .await?;
        book.top_of_book(ticker)
    }

    /// `GET /securities?ticker`
    pub async fn fetch_position(&self, ticker: &str) -> ExchangeResult<Position> {
        let rows: Vec<SecurityResponse> =
            self.get_json("/securities", &[("ticker", ticker)]).await?;
        SecurityResponse::net_position(&rows, ticker)
    }

    /// `GET /orders?status`
    pub async fn fetch_orders(&self, status: OrderStatus) -> ExchangeResult<Vec<OpenOrder>> {
        let rows: Vec<OrderResponse> = self
            .get_json("/orders", &[("status", status.as_str())])
            .await?;
        Ok(rows.into_iter().map(OpenOrder::from).collect())
    }

    /// `POST /orders` with the order in the query string.
    ///
    /// Never fails: transport errors and refusals come back as
    /// `SubmitOutcome::Rejected`.
    pub async fn post_order(&self, order: &OrderRequest) -> SubmitOutcome {
        let quantity = order.quantity.to_string();
        let price = order.price.to_cents().to_string();
        let query = [
            ("ticker", order.ticker.as_str()),
            ("type", order.order_type.as_str()),
            ("quantity", quantity.as_str()),
            ("action", order.side.as_str()),
            ("price", price.as_str()),
        ];

        let response = match self.client.post(self.url("/orders")).query(&query).send().await {
            Ok(r) => r,
            Err(e) => return SubmitOutcome::Rejected(format!("POST /orders failed: {e}")),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return SubmitOutcome::Rejected(format!("HTTP {status}: {body}"));
        }

        // The body is informational only.
        let order_id = response
            .json::<OrderResponse>()
            .await
            .ok()
            .map(|r| r.order_id);
        debug!(
            side = %order.side,
            quantity = %order.quantity,
            price = %order.price,
            ?order_id,
            "Order accepted"
        );
        SubmitOutcome::Accepted { order_id }
    }

    /// `POST /commands/cancel?all=1`
    pub async fn post_cancel_all(&self) -> ExchangeResult<()> {
        let path = "/commands/cancel";
        let response = self
            .client
            .post(self.url(path))
            .query(&[("all", "1")])
            .send()
            .await
            .map_err(|e| ExchangeError::Http(format!("POST {path} failed: {e}")))?;
        Self::check_status(path, response).await?;
        Ok(())
    }
}

impl Exchange for RitClient {
    fn tick(&self) -> BoxFuture<'_, ExchangeResult<Tick>> {
        Box::pin(self.fetch_tick())
    }

    fn last_close<'a>(&'a self, ticker: &'a str) -> BoxFuture<'a, ExchangeResult<Price>> {
        Box::pin(self.fetch_last_close(ticker))
    }

    fn top_of_book<'a>(&'a self, ticker: &'a str) -> BoxFuture<'a, ExchangeResult<TopOfBook>> {
        Box::pin(self.fetch_top_of_book(ticker))
    }

    fn position<'a>(&'a self, ticker: &'a str) -> BoxFuture<'a, ExchangeResult<Position>> {
        Box::pin(self.fetch_position(ticker))
    }

    fn orders(&self, status: OrderStatus) -> BoxFuture<'_, ExchangeResult<Vec<OpenOrder>>> {
        Box::pin(self.fetch_orders(status))
    }

    fn submit_order(&self, order: OrderRequest) -> BoxFuture<'_, SubmitOutcome> {
        Box::pin(async move { self.post_order(&order).await })
    }

    fn cancel_all(&self) -> BoxFuture<'_, ExchangeResult<()>> {
        Box::pin(self.post_cancel_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RitClient::new(DEFAULT_BASE_URL, "474RQCA1", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/v1");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = RitClient::new("http://localhost:9999/v1/", "key", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.url("/case"), "http://localhost:9999/v1/case");
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let err = RitClient::new(DEFAULT_BASE_URL, "bad\nkey", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader(_)));
    }
}
