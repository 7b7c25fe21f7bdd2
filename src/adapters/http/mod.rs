//! HTTP Adapter
//!
//! Production `HttpTransport` backed by reqwest.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
