//! Message routing and data assembly.
//!
//! detector -> access -> fetcher -> prompt, driven by `ChatService`.

pub mod access;
pub mod detector;
pub mod error;
pub mod fetcher;
pub mod policy;
pub mod prompt;
pub mod service;
pub mod types;
pub mod whitelist;

pub use access::AccessPolicy;
pub use detector::{TableDetector, TriggerRule};
pub use error::ChatError;
pub use fetcher::DataFetcher;
pub use policy::{ChatPolicy, PolicyError, SelfRecord};
pub use service::{ChatReply, ChatService, Gathered};
pub use types::{FetchedDataset, Principal, Role, Table};
pub use whitelist::ColumnWhitelist;
