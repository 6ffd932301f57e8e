pub(crate) mod error;
mod store;

pub use self::store::rebuild_store;
