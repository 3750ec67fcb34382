//! Clients for the geocoding and form-relay APIs

mod client;
mod error;
mod traits;

pub use client::HttpClient;
pub use error::ApiError;
pub use traits::{BookingApi, Place, SubmitReceipt};

#[cfg(test)]
pub use traits::MockBookingApi;
