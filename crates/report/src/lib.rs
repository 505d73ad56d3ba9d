//! Fee revenue reports over the intents fee transfers.
//!
//! The reports can be produced by ClickHouse or by the in-process pipeline in
//! this crate; both sit behind [`FeeReports`].

pub mod cache;
pub mod memory;
pub mod normalize;
pub mod record;
pub mod series;
pub mod source;
pub mod summary;
pub mod top_assets;

pub use cache::{CachedReports, DEFAULT_MAX_CACHE_ENTRIES};
pub use memory::MemoryTable;
pub use normalize::{AssetResolution, NormalizedFee, normalize};
pub use record::{FeeTransaction, read_csv, read_csv_file};
pub use series::compute_daily_cumulative;
pub use source::{FeeReports, ReportParams, open};
pub use summary::compute_summary;
pub use top_assets::compute_top_assets;
