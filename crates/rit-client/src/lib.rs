//! REST client for the RIT exchange.
//!
//! `RitClient` implements `rit_core::Exchange` on top of the case's local
//! REST API. Every request carries the `X-API-Key` header.

pub mod client;
pub mod error;
pub mod response;

pub use client::{RitClient, API_KEY_HEADER, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use response::{
    BookEntry, BookResponse, CaseResponse, HistoryBar, OrderResponse, SecurityResponse,
};
