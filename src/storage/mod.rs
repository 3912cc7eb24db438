//! Data provider backends

pub mod archive;
#[cfg(feature = "remote")]
pub mod remote;
pub mod snapshot;

pub use archive::{ArchiveReader, DirectoryReader, ZipArchiveReader, open_archive};
#[cfg(feature = "remote")]
pub use remote::RemoteProvider;
pub use snapshot::SnapshotProvider;

use crate::config::DataSource;
use crate::core::error::ProbeResult;
use crate::core::provider::DataProvider;
use std::sync::Arc;
use std::time::Duration;

/// Build the provider for a configured data source
///
/// Archives are read completely before this returns.
pub fn open_provider(source: &DataSource, timeout: Duration) -> ProbeResult<Arc<dyn DataProvider>> {
    match source {
        DataSource::Archive(path) => {
            tracing::info!(archive = %path.display(), "Loading probe archive");
            Ok(Arc::new(SnapshotProvider::open(path)?))
        }
        #[cfg(feature = "remote")]
        DataSource::Remote(url) => {
            tracing::info!(remote = %url, "Forwarding to remote probe");
            Ok(Arc::new(RemoteProvider::with_timeout(url, timeout)?))
        }
        #[cfg(not(feature = "remote"))]
        DataSource::Remote(_) => {
            let _ = timeout;
            Err(crate::core::error::ConfigError::InvalidValue {
                field: "remote".to_string(),
                message: "built without the 'remote' feature".to_string(),
            }
            .into())
        }
    }
}
