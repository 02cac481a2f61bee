//! Travel planning backend.
//!
//! Registered users plan trips made of dated itineraries, scheduled
//! activities and their expenses, and keep reminders for their trips. Every
//! record is reachable only by the user at the root of its ownership chain.

pub mod doc;
pub mod domain;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
