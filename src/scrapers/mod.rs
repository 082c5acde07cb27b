pub mod cookies;
pub mod realty;
pub mod traits;
pub mod types;

pub use realty::{RealtySource, SourceConfig};
pub use traits::ListingsSource;
pub use types::{Category, RawPage, SearchParams, TransactionType};
