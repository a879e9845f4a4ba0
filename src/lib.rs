//! Async client for the Nano Banana image-editing API.
//!
//! Submit an image with an optional prompt and mask strokes, then poll the
//! backend with the returned request id until the edit completes.
//!
//! ```no_run
//! use nanobanana::{create_nano_banana_client, GenerationRequest, PollStatusRequest};
//!
//! # async fn example() {
//! let client = create_nano_banana_client("https://banana.example.com/", Some("token".into()));
//! let submitted = client
//!     .generate_image(&GenerationRequest::new("iVBORw0KGgo...").with_prompt("add a red hat"))
//!     .await;
//!
//! if let Some(id) = submitted.request_id() {
//!     let status = client.poll_status(&PollStatusRequest::new(id)).await;
//!     println!("{}", status.status());
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;

pub use client::{create_nano_banana_client, ApiClient, ReqwestTransport, Transport};
pub use config::ApiConfig;
pub use error::{ClientError, Result};
pub use models::*;
