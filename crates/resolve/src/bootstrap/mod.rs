pub(crate) mod error;
mod store;

pub use self::store::open_store;
