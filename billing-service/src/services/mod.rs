pub mod catalog;
pub mod customers;
pub mod drafts;
pub mod handoff;
pub mod ledger;
pub mod metrics;
pub mod providers;
pub mod reports;
pub mod store;
pub mod summarizer;

pub use catalog::CatalogStore;
pub use customers::CustomerDirectory;
pub use drafts::{DraftRegistry, InvoiceDraft};
pub use handoff::PrintHandoff;
pub use ledger::InvoiceLedger;
pub use metrics::{get_metrics, init_metrics};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
pub use summarizer::SummaryService;
