//! Minimal HTTP boundary types.
//!
//! The backend does not define a server loop; handlers consume a [`Request`]
//! and produce a [`Response`], and whatever hosts the service (a hyper server,
//! a test harness) owns the transport.

mod request;
mod response;

pub use request::{Request, RequestBuilder};
pub use response::Response;
