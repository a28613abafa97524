pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod pagination;
pub mod types;

pub use error::FilterError;
pub use filter::{Filter, FindQuery};
pub use pagination::{Page, Pagination, ZeroLimit, MAX_WINDOW};
pub use types::*;
