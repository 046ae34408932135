//! Client for the homework review status API.
//!
//! This crate covers one polling cycle up to the point where a notification
//! text exists:
//!
//! - [`ReviewClient`] - issues the authenticated GET with the poll cursor
//! - [`check_response`] - validates the response shape and returns the records
//! - [`parse_status`] - turns the most recent record into a verdict message
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use homework_api::{check_response, parse_status, ReviewClient, DEFAULT_ENDPOINT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), homework_api::ApiError> {
//!     let client = ReviewClient::new(DEFAULT_ENDPOINT, "token", Duration::from_secs(30))?;
//!     let response = client.get_api_answer(0).await?;
//!     let homeworks = check_response(&response)?;
//!     println!("{}", parse_status(&homeworks[0])?);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod response;
pub mod status;

pub use client::{HomeworkSource, ReviewClient, DEFAULT_ENDPOINT};
pub use error::{ApiError, Result};
pub use response::{check_response, current_date};
pub use status::{parse_status, HomeworkStatus};
