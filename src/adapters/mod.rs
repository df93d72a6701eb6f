// Adapters layer: concrete implementations of the domain ports.

pub mod http;

pub use http::{HttpFedClient, REQUEST_ID_HEADER};
