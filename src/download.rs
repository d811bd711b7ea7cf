use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::error::PipelineError;
use crate::request::DatasetRequest;

/// Size of each read from the response stream.
pub const CHUNK_SIZE: usize = 16 * 1024;

/// What to do when the endpoint answers with anything other than 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    #[default]
    Halt,
    /// Log the failure, leave an empty archive file and let validation reject it.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Diagnostics {
    /// Log the HTTP exchange at the connection level.
    pub wire_trace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub status: StatusCode,
    pub bytes_written: u64,
    pub sha256: String,
}

pub struct Fetcher {
    client: Client,
    status_policy: StatusPolicy,
}

impl Fetcher {
    pub fn new(diagnostics: Diagnostics, status_policy: StatusPolicy) -> Result<Self> {
        let client = Client::builder()
            .connection_verbose(diagnostics.wire_trace)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            status_policy,
        })
    }

    pub fn fetch_to_file(&self, request: &DatasetRequest, output_path: &Path) -> Result<FetchOutcome> {
        let url = request.access_url()?;
        log::info!("Downloading {} from {} to {:?}", request.persistent_id, url, output_path);

        let mut response = self
            .client
            .get(url)
            .send()
            .context("Failed to download dataset")?;

        let status = response.status();
        if status != StatusCode::OK {
            return self.handle_failed_status(status, output_path);
        }

        // Stream next to the destination so a failed transfer never replaces
        // an archive from an earlier run.
        let dir = output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut partial =
            tempfile::NamedTempFile::new_in(dir).context("Failed to create output file")?;
        let mut hasher = Sha256::new();

        let bytes_written = {
            let mut writer = BufWriter::new(partial.as_file_mut());
            let n = copy_in_chunks(&mut response, &mut writer, &mut hasher)
                .context("Failed to stream response body")?;
            writer.flush().context("Failed to flush downloaded data")?;
            n
        };
        drop(response);

        partial
            .persist(output_path)
            .context("Failed to move download into place")?;

        let sha256 = hex::encode(hasher.finalize());
        log::info!("Download completed: {} bytes, sha256 {}", bytes_written, sha256);

        Ok(FetchOutcome {
            status,
            bytes_written,
            sha256,
        })
    }

    fn handle_failed_status(&self, status: StatusCode, output_path: &Path) -> Result<FetchOutcome> {
        match self.status_policy {
            StatusPolicy::Halt => {
                log::error!("Dataset request failed with status: {}", status);
                Err(PipelineError::Status { status }.into())
            }
            StatusPolicy::Continue => {
                log::warn!("request fail: status {}, continuing", status);
                // Plain stdout line kept for scripts that watch for it.
                println!("request fail");

                fs::File::create(output_path).context("Failed to truncate output file")?;

                Ok(FetchOutcome {
                    status,
                    bytes_written: 0,
                    sha256: hex::encode(Sha256::new().finalize()),
                })
            }
        }
    }
}

/// Copies `reader` into `writer` in `CHUNK_SIZE` pieces, feeding every chunk
/// to `hasher` as well. Returns the number of bytes copied.
pub fn copy_in_chunks<R, W, D>(reader: &mut R, writer: &mut W, hasher: &mut D) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    D: Digest,
{
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer[..n])?;
        hasher.update(&buffer[..n]);
        total += n as u64;
    }

    Ok(total)
}
