//! PassSlot API client library for Rust.
//!
//! A Rust client library for the [PassSlot](https://www.passslot.com)
//! pass management service. It creates digital wallet passes from templates,
//! manages the pass lifecycle (values, status, push, images) and manages
//! template-level resources (images, distribution restrictions).
//!
//! # Quick Start
//!
//! ```no_run
//! use passslot_client::{PassSlotClient, Values};
//!
//! let client = PassSlotClient::new("<your app key>").unwrap();
//!
//! let mut values = Values::new();
//! values.insert("Name".into(), "John".into());
//! values.insert("Level".into(), "Platinum".into());
//! values.insert("Balance".into(), 20.50.into());
//!
//! let created = client
//!     .passes()
//!     .create_from_template(6008004u64, &values, &[])
//!     .unwrap();
//! let pkpass = client.passes().download(&created.pass).unwrap();
//! ```

pub mod client;
pub mod error;
pub mod images;
pub mod models;

// Re-export the main public types at the crate root for convenience.
pub use client::{
    ApiPayload, Config, CreatedPass, PassSlotClient, PassesClient, TemplatesClient,
    DEFAULT_ENDPOINT,
};
pub use error::{FieldError, PassSlotError};
pub use images::{SkippedImage, IMAGE_TYPES};
pub use models::{Image, Location, Pass, Restrictions, Template, TemplateId, Values};
