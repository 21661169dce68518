pub mod application;
pub mod domain;
pub mod ingest;
pub mod storage;

pub use domain::*;
pub use storage::Repository;
