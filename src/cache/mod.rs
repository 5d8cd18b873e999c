//! Artifact cache
//!
//! Finished PNG renditions are stored in a single flat directory, one file
//! per (article, version), named `{article}-{version}.png`. Reserved keys hold
//! placeholder images served when a conversion cannot produce a real one.

mod artifact;
pub mod backend;
mod error;
mod key;
pub mod tokio_backend;



pub use artifact::ArtifactCache;
pub use backend::DiskBackend;
pub use error::CacheError;
pub use key::CacheKey;
pub use tokio_backend::TokioFsBackend;
