//! Data models for the gateway
//!
//! `request` holds the authoritative record shape returned by the request store;
//! `envelope` holds the JSON envelopes of the gateway's REST surface;
//! `upload` holds multipart field defaults and the backend upload receipt.

mod envelope;
mod request;
mod upload;

pub use envelope::*;
pub use request::*;
pub use upload::*;
