//! Typed client for the top.gg API.
//!
//! # Design
//! `Client` holds an immutable `ClientConfig` and a `Transport`. Every typed
//! operation funnels through `request`, the only method that performs I/O:
//! it builds the URL (query string for GET), asks `RequestBuilder` for the
//! descriptor, executes it and classifies the status. Typed operations only
//! resolve ids and shape the returned JSON.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse, Payload};
use crate::request::RequestBuilder;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Bot, BotQuery, BotStats, BotStatsPayload, StatsUpdate, User};

/// Client for the top.gg API.
///
/// Generic over the transport so tests can substitute a recording fake.
pub struct Client<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    builder: RequestBuilder,
    transport: T,
}

impl Client<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let builder = RequestBuilder::new(config.token());
        Self {
            config,
            builder,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue one request and classify the response.
    ///
    /// Returns `Ok(None)` for 204 without reading the body, the parsed JSON
    /// for 200 and 201, and `ApiError::Http` for anything else.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Payload>,
    ) -> Result<Option<Value>, ApiError> {
        let mut url = format!("{}{}", self.config.base_url(), path);
        if method == HttpMethod::Get {
            if let Some(payload) = &payload {
                url.push('?');
                url.push_str(&encode_query(&payload.query_pairs()));
            }
        }

        let request = self.builder.build(method, url, payload);
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.execute(request).await?;
        classify(response)
    }

    /// Fetch a bot. Falls back to the configured id.
    pub async fn get_bot(&self, id: Option<&str>) -> Result<Bot, ApiError> {
        let id = self.resolve_id(id, "getBot")?;
        let value = self
            .request(HttpMethod::Get, &format!("/bots/{id}"), None)
            .await?;
        decode(value)
    }

    /// Fetch a bot's posted stats. Falls back to the configured id.
    pub async fn get_stats(&self, id: Option<&str>) -> Result<BotStats, ApiError> {
        let id = self.resolve_id(id, "getStats")?;
        let value = self
            .request(HttpMethod::Get, &format!("/bots/{id}/stats"), None)
            .await?;
        let payload: BotStatsPayload = decode(value)?;
        Ok(BotStats::from(payload))
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ApiError> {
        let value = self
            .request(HttpMethod::Get, &format!("/users/{id}"), None)
            .await?;
        decode(value)
    }

    /// Search bots. The response is returned as sent by the server.
    pub async fn get_bots(&self, query: &BotQuery) -> Result<Value, ApiError> {
        let value = self
            .request(HttpMethod::Get, "/bots", Some(Payload::Query(query.to_pairs())))
            .await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// Users who voted for the token's bot. The service returns the last
    /// 1000 votes only.
    pub async fn get_votes(&self) -> Result<Vec<User>, ApiError> {
        let value = self.request(HttpMethod::Get, "/bots/votes", None).await?;
        decode(value)
    }

    /// Whether `user_id` voted for the token's bot.
    ///
    /// True only when the response's `voted` field is the number 1.
    pub async fn has_voted(&self, user_id: &str) -> Result<bool, ApiError> {
        let payload = Payload::Query(vec![("userId".to_string(), user_id.to_string())]);
        let value = self
            .request(HttpMethod::Get, "/bots/check", Some(payload))
            .await?;
        Ok(voted_flag(value.as_ref()))
    }

    /// Whether the weekend vote multiplier is active.
    pub async fn is_weekend(&self) -> Result<bool, ApiError> {
        let value = self.request(HttpMethod::Get, "/weekend", None).await?;
        value
            .as_ref()
            .and_then(|v| v.get("is_weekend"))
            .and_then(Value::as_bool)
            .ok_or_else(|| ApiError::Decode("missing boolean field `is_weekend`".to_string()))
    }

    pub async fn post_stats(&self, update: StatsUpdate) -> Result<(), ApiError> {
        let body = serde_json::to_value(update)?;
        self.request(HttpMethod::Post, "/bots/stats", Some(Payload::Json(body)))
            .await?;
        Ok(())
    }

    fn resolve_id<'a>(
        &'a self,
        id: Option<&'a str>,
        operation: &'static str,
    ) -> Result<&'a str, ApiError> {
        id.or(self.config.id())
            .ok_or(ApiError::MissingId { operation })
    }
}

/// Percent-encode every key and value and join them as `k=v&k=v`.
///
/// Everything except `A-Z a-z 0-9 - _ . ~` is escaped, including `!'()*`.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn classify(response: HttpResponse) -> Result<Option<Value>, ApiError> {
    if response.is_no_content() {
        return Ok(None);
    }
    if response.is_success() {
        return Ok(Some(serde_json::from_str(&response.body)?));
    }

    let message = match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => value.to_string(),
        Err(_) => response.body,
    };
    warn!(status = response.status, %message, "request failed");
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}

fn decode<D: DeserializeOwned>(value: Option<Value>) -> Result<D, ApiError> {
    let value = value.ok_or_else(|| ApiError::Decode("empty response".to_string()))?;
    Ok(serde_json::from_value(value)?)
}

fn voted_flag(value: Option<&Value>) -> bool {
    value
        .and_then(|v| v.get("voted"))
        .and_then(Value::as_f64)
        == Some(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use serde_json::json;

    const BASE: &str = "https://top.gg/api";

    fn client(transport: MockTransport) -> Client<MockTransport> {
        Client::with_transport(ClientConfig::new("tok"), transport)
    }

    fn client_with_id(transport: MockTransport) -> Client<MockTransport> {
        Client::with_transport(ClientConfig::new("tok").with_id("264811613708746752"), transport)
    }

    #[test]
    fn encode_query_escapes_keys_and_values() {
        let pairs = vec![
            ("search".to_string(), "lib: discord.js & more".to_string()),
            ("a b".to_string(), "x=y".to_string()),
        ];
        assert_eq!(
            encode_query(&pairs),
            "search=lib%3A%20discord.js%20%26%20more&a%20b=x%3Dy"
        );
    }

    #[tokio::test]
    async fn get_bot_without_any_id_fails_before_io() {
        let transport = MockTransport::new();
        let client = client(transport.clone());

        let err = client.get_bot(None).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingId { operation: "getBot" }));

        let err = client.get_stats(None).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingId { operation: "getStats" }));

        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn get_bot_falls_back_to_configured_id() {
        let transport = MockTransport::new().respond_json(json!({
            "id": "264811613708746752",
            "username": "Luca",
            "discriminator": "1375"
        }));
        let bot = client_with_id(transport.clone()).get_bot(None).await.unwrap();
        assert_eq!(bot.username, "Luca");

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, format!("{BASE}/bots/264811613708746752"));
        assert_eq!(requests[0].header("Authorization"), Some("tok"));
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn explicit_id_wins_over_default() {
        let transport = MockTransport::new().respond_json(json!({"shards": [10, 20]}));
        let stats = client_with_id(transport.clone())
            .get_stats(Some("1"))
            .await
            .unwrap();
        assert_eq!(stats.server_count, None);
        assert_eq!(stats.shards, vec![10, 20]);
        assert_eq!(transport.requests()[0].url, format!("{BASE}/bots/1/stats"));
    }

    #[tokio::test]
    async fn has_voted_encodes_user_id_in_query() {
        let transport = MockTransport::new().respond_json(json!({"voted": 1}));
        assert!(client(transport.clone()).has_voted("140862798832861184").await.unwrap());

        let req = &transport.requests()[0];
        assert_eq!(req.url, format!("{BASE}/bots/check?userId=140862798832861184"));
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn has_voted_requires_number_one() {
        let cases = [
            (json!({"voted": 0}), false),
            (json!({"voted": "1"}), false),
            (json!({"voted": true}), false),
            (json!({}), false),
            (json!({"voted": 1}), true),
        ];
        for (body, expected) in cases {
            let transport = MockTransport::new().respond_json(body.clone());
            let voted = client(transport).has_voted("1").await.unwrap();
            assert_eq!(voted, expected, "{body}");
        }
    }

    #[tokio::test]
    async fn is_weekend_reads_flag() {
        let transport = MockTransport::new().respond_json(json!({"is_weekend": true}));
        let client = client(transport.clone());
        assert!(client.is_weekend().await.unwrap());
        assert_eq!(transport.requests()[0].url, format!("{BASE}/weekend"));
    }

    #[tokio::test]
    async fn is_weekend_rejects_other_shapes() {
        let transport = MockTransport::new().respond_json(json!({"is_weekend": "yes"}));
        let err = client(transport).is_weekend().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn post_stats_sends_json_body() {
        let transport = MockTransport::new().respond(204, "");
        client(transport.clone())
            .post_stats(StatsUpdate::new(150).with_shard(2, 4))
            .await
            .unwrap();

        let req = &transport.requests()[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE}/bots/stats"));
        assert_eq!(
            req.body,
            Some(Payload::Json(json!({"server_count": 150, "shard_id": 2, "shard_count": 4})))
        );
    }

    #[tokio::test]
    async fn no_content_skips_parsing() {
        // Body is not JSON; a 204 must not try to read it.
        let transport = MockTransport::new().respond(204, "not json");
        let result = client(transport)
            .request(HttpMethod::Delete, "/anything", None)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn created_is_parsed_like_ok() {
        let transport = MockTransport::new().respond(201, r#"{"ok":true}"#);
        let result = client(transport)
            .request(HttpMethod::Put, "/x", None)
            .await
            .unwrap();
        assert_eq!(result, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn not_found_renders_body_into_error() {
        let transport = MockTransport::new().respond(404, r#"{"message": "Not Found"}"#);
        let err = client(transport).get_user("1").await.unwrap_err();
        match err {
            ApiError::Http { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains(r#""message":"Not Found""#), "{message}");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept_raw() {
        let transport = MockTransport::new().respond(502, "Bad Gateway");
        let err = client(transport).get_votes().await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Http { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[tokio::test]
    async fn accepted_status_is_an_error() {
        let transport = MockTransport::new().respond(202, "{}");
        let err = client(transport).is_weekend().await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 202, .. }));
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let transport = MockTransport::new().respond(200, "<html>");
        let err = client(transport).get_votes().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        // No canned response: the mock reports a transport failure.
        let err = client(MockTransport::new()).get_user("1").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn encode_query_escapes_sub_delims() {
        let pairs = vec![("q".to_string(), "it's (fun)!*".to_string())];
        assert_eq!(encode_query(&pairs), "q=it%27s%20%28fun%29%21%2A");
    }

    #[tokio::test]
    async fn json_query_payload_keeps_key_order() {
        let transport = MockTransport::new().respond_json(json!({"results": []}));
        let payload = Payload::Json(json!({"sort": "-points", "limit": 5}));
        client(transport.clone())
            .request(HttpMethod::Get, "/bots", Some(payload))
            .await
            .unwrap();

        let req = &transport.requests()[0];
        assert_eq!(req.url, format!("{BASE}/bots?sort=-points&limit=5"));
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn get_bots_passes_query_through() {
        let raw = json!({"results": [], "limit": 2, "offset": 0, "count": 0, "total": 0});
        let transport = MockTransport::new().respond_json(raw.clone());
        let query = BotQuery {
            limit: Some(2),
            sort: Some("-points".to_string()),
            ..Default::default()
        };
        let value = client(transport.clone()).get_bots(&query).await.unwrap();
        assert_eq!(value, raw);
        assert_eq!(transport.requests()[0].url, format!("{BASE}/bots?limit=2&sort=-points"));
    }

    #[tokio::test]
    async fn get_votes_parses_user_list() {
        let transport = MockTransport::new().respond_json(json!([
            {"id": "1", "username": "a", "discriminator": "0001"},
            {"id": "2", "username": "b", "discriminator": "0002", "avatar": "abc"}
        ]));
        let votes = client(transport.clone()).get_votes().await.unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[1].avatar.as_deref(), Some("abc"));
        assert_eq!(transport.requests()[0].url, format!("{BASE}/bots/votes"));
    }

    #[tokio::test]
    async fn empty_response_for_record_is_decode_error() {
        let transport = MockTransport::new().respond(204, "");
        let err = client(transport).get_user("1").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
