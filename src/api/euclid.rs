//! reqwest client for the Euclid testnet endpoints

use super::{SwapApi, TrackEvent};
use crate::config::ApiConfig;
use crate::retry::{retry, RetryPolicy};
use crate::swap::{BuildResponse, QuoteResponse, SwapRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, REFERER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

const ACCEPT_JSON: &str = "application/json, text/plain, */*";

/// Client for the Euclid swap and tracking APIs
pub struct EuclidClient {
    client: Client,
    swap_url: Url,
    track_url: Url,
    swap_headers: HeaderMap,
    track_headers: HeaderMap,
    retry: RetryPolicy,
}

impl EuclidClient {
    pub fn new(config: &ApiConfig, retry: RetryPolicy) -> Result<Self> {
        let swap_url = Url::parse(&config.swap_url)
            .map_err(|e| Error::Config(format!("Invalid swap URL: {}", e)))?;
        let track_url = Url::parse(&config.track_url)
            .map_err(|e| Error::Config(format!("Invalid tracking URL: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            swap_url,
            track_url,
            swap_headers: Self::headers(&config.referer)?,
            track_headers: Self::headers(&config.track_referer)?,
            retry,
        })
    }

    fn headers(referer: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            REFERER,
            HeaderValue::from_str(referer)
                .map_err(|e| Error::Config(format!("Invalid referer '{}': {}", referer, e)))?,
        );
        Ok(headers)
    }

    /// POST `body` and return the reply text, retrying on transport errors
    /// and non-2xx statuses
    async fn post<B>(&self, label: &str, url: &Url, headers: &HeaderMap, body: &B) -> Result<String>
    where
        B: Serialize + Sync,
    {
        retry(&self.retry, label, || async {
            let response = self
                .client
                .post(url.clone())
                .headers(headers.clone())
                .json(body)
                .send()
                .await?
                .error_for_status()?;
            Ok::<String, Error>(response.text().await?)
        })
        .await
    }

    async fn post_json<B, T>(&self, label: &str, url: &Url, headers: &HeaderMap, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let text = self.post(label, url, headers, body).await?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Api(format!("{} returned an unexpected body: {}", label, e)))
    }
}

#[async_trait]
impl SwapApi for EuclidClient {
    async fn quote(&self, request: &SwapRequest) -> Result<QuoteResponse> {
        self.post_json("Swap quote", &self.swap_url, &self.swap_headers, request)
            .await
    }

    async fn build(&self, request: &SwapRequest) -> Result<BuildResponse> {
        self.post_json("Swap build", &self.swap_url, &self.swap_headers, request)
            .await
    }

    async fn track(&self, event: &TrackEvent) -> Result<()> {
        self.post("Tracking", &self.track_url, &self.track_headers, event)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwapSettings;
    use crate::swap::{AmountOut, SwapKind};
    use alloy::primitives::{address, Address, U256};
    use httpmock::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;

    const WALLET: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    fn client_for(server: &MockServer, retry: RetryPolicy) -> EuclidClient {
        let config = ApiConfig {
            swap_url: server.url("/swap"),
            track_url: server.url("/track"),
            ..ApiConfig::default()
        };
        EuclidClient::new(&config, retry).unwrap()
    }

    fn quick_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay_ms: 10,
        }
    }

    fn quote_request() -> SwapRequest {
        SwapRequest::for_quote(
            &SwapSettings::default(),
            SwapKind::Euclid,
            WALLET,
            U256::from(1_000_000_000_000_000u64),
        )
        .unwrap()
    }

    fn quote_body() -> String {
        let meta = serde_json::json!({ "swaps": { "path": [{ "amount_out": "11580659" }] } });
        serde_json::json!({ "meta": meta.to_string() }).to_string()
    }

    #[test]
    fn builds_from_default_config() {
        let client = EuclidClient::new(&ApiConfig::default(), RetryPolicy::default()).unwrap();
        assert_eq!(client.swap_url.host_str(), Some("testnet.api.euclidprotocol.com"));
        assert_eq!(
            client.track_headers.get(REFERER).unwrap(),
            "https://testnet.euclidswap.io/swap?ref=EUCLIDEAN667247"
        );
        assert_eq!(client.swap_headers.get(ACCEPT).unwrap(), ACCEPT_JSON);
    }

    #[test]
    fn rejects_invalid_urls() {
        let config = ApiConfig {
            swap_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            EuclidClient::new(&config, RetryPolicy::default()),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn quote_recovers_after_two_unavailable_replies() {
        let server = MockServer::start_async().await;
        let mut unavailable = server
            .mock_async(|when, then| {
                when.method(POST).path("/swap");
                then.status(503);
            })
            .await;

        // long enough to swap the mock before the third attempt
        let retry = RetryPolicy {
            max_attempts: 3,
            delay_ms: 500,
        };
        let client = Arc::new(client_for(&server, retry));
        let task = {
            let client = client.clone();
            tokio::spawn(async move { client.quote(&quote_request()).await })
        };

        tokio::time::timeout(Duration::from_secs(10), async {
            while unavailable.hits_async().await < 2 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("two failed attempts");
        unavailable.delete_async().await;

        let available = server
            .mock_async(|when, then| {
                when.method(POST).path("/swap");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(quote_body());
            })
            .await;

        let quote = task.await.unwrap().unwrap();
        available.assert_hits_async(1).await;
        assert_eq!(
            quote.amount_out("1").unwrap(),
            AmountOut::Quoted(U256::from(11_580_659u64))
        );
    }

    #[tokio::test]
    async fn quote_gives_up_after_max_attempts() {
        let server = MockServer::start_async().await;
        let unavailable = server
            .mock_async(|when, then| {
                when.method(POST).path("/swap");
                then.status(503);
            })
            .await;

        let client = client_for(&server, quick_retry(3));
        let err = client.quote(&quote_request()).await.unwrap_err();

        assert!(matches!(err, Error::Network(_)), "{:?}", err);
        unavailable.assert_hits_async(3).await;
    }

    #[tokio::test]
    async fn undecodable_body_is_not_retried() {
        let server = MockServer::start_async().await;
        let garbage = server
            .mock_async(|when, then| {
                when.method(POST).path("/swap");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let client = client_for(&server, quick_retry(3));
        let err = client.quote(&quote_request()).await.unwrap_err();

        assert!(matches!(err, Error::Api(_)), "{:?}", err);
        garbage.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn quote_sends_headers_and_request_document() {
        let server = MockServer::start_async().await;
        let request = quote_request();
        let expected = serde_json::to_value(&request).unwrap();
        let quote = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/swap")
                    .header("accept", ACCEPT_JSON)
                    .header("content-type", "application/json")
                    .header("referer", "https://testnet.euclidswap.io/")
                    .json_body(expected);
                then.status(200)
                    .header("content-type", "application/json")
                    .body(quote_body());
            })
            .await;

        let client = client_for(&server, quick_retry(1));
        client.quote(&request).await.unwrap();
        quote.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn build_returns_call_data_for_the_wallet() {
        let server = MockServer::start_async().await;
        let body = serde_json::json!({
            "msgs": [{ "data": "0xdeadbeef" }],
            "sender": { "address": WALLET.to_checksum(None) }
        });
        let build = server
            .mock_async(|when, then| {
                when.method(POST).path("/swap");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(body.to_string());
            })
            .await;

        let client = client_for(&server, quick_retry(1));
        let request = SwapRequest::for_build(
            &SwapSettings::default(),
            SwapKind::Euclid,
            WALLET,
            U256::from(1_000_000_000_000_000u64),
            U256::from(11_580_659u64),
        )
        .unwrap();
        let built = client.build(&request).await.unwrap();

        build.assert_hits_async(1).await;
        assert_eq!(built.call_data_for(WALLET).unwrap().to_string(), "0xdeadbeef");
    }

    #[tokio::test]
    async fn track_posts_the_event_with_the_referral_referer() {
        let server = MockServer::start_async().await;
        let track = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/track")
                    .header("referer", "https://testnet.euclidswap.io/swap?ref=EUCLIDEAN667247")
                    .json_body(serde_json::json!({
                        "chain_uid": "arbitrum",
                        "tx_hash": "0xabc",
                        "wallet_address": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
                        "referral_code": "EUCLIDEAN667247",
                        "type": "swap"
                    }));
                // the tracker replies with plain text
                then.status(200).body("ok");
            })
            .await;

        let client = client_for(&server, quick_retry(1));
        let event = TrackEvent::swap(
            "arbitrum",
            "0xabc".to_string(),
            WALLET.to_checksum(None),
            "EUCLIDEAN667247",
        );
        client.track(&event).await.unwrap();
        track.assert_hits_async(1).await;
    }
}
