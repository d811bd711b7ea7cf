//! Fetch a dataset archive from a Dataverse access endpoint, check that it is
//! a zip container and unpack it.

pub mod download;
pub mod error;
pub mod extract;
pub mod logging;
pub mod pipeline;
pub mod request;
pub mod verify;

pub use download::{Diagnostics, FetchOutcome, Fetcher, StatusPolicy, CHUNK_SIZE};
pub use error::PipelineError;
pub use extract::{extract_zip, open_archive, unpack_archive};
pub use pipeline::{CleanupPolicy, Pipeline, PipelineReport};
pub use request::DatasetRequest;
pub use verify::{compute_sha256, ensure_zip_archive, has_zip_signature, is_zip_archive};
