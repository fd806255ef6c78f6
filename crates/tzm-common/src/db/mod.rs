pub mod pool;
pub mod timestamp_store;
pub mod util;

pub use pool::{create_pool_from_url, DbPoolError, PgPool};
pub use timestamp_store::PgTimestampStore;
pub use util::TimedClientExt;
