//! Async client for the top.gg bot listing API.
//!
//! # Overview
//! Fetches bot and user records, reads and posts bot stats, and checks vote
//! status. Each typed operation becomes one HTTP request whose response is
//! classified and turned into a typed value.
//!
//! # Design
//! - `RequestBuilder` maps (method, url, payload) to an `HttpRequest` as
//!   plain data, with no I/O.
//! - `Client` owns the immutable `ClientConfig` and a `Transport`; its
//!   `request` method is the single point that performs I/O.
//! - `ReqwestTransport` is the production transport. Tests plug in their
//!   own.
//! - No retries, caching or rate limiting: every error reaches the caller.
//!
//! ```no_run
//! use topgg_core::{Client, ClientConfig, StatsUpdate};
//!
//! # async fn run() -> Result<(), topgg_core::ApiError> {
//! let client = Client::new(ClientConfig::new("token").with_id("264811613708746752"));
//! let bot = client.get_bot(None).await?;
//! client.post_stats(StatsUpdate::new(1200)).await?;
//! # let _ = bot;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Payload};
pub use request::RequestBuilder;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Bot, BotQuery, BotStats, BotStatsPayload, StatsUpdate, User, UserSocials};
