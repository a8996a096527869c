//! Service layer: clients, transport boundary and report processing.

mod client;
mod client_factory;
mod report_service;
mod transport;

pub use client::Client;
pub use client_factory::ClientFactory;
pub use report_service::{ReportService, Summary};
pub use transport::{JsonLinesTransport, Transport};
