use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::download::copy_in_chunks;
use crate::error::PipelineError;

/// Leading signatures a zip container may start with: local file header,
/// end of central directory (empty archive) and the spanned-archive marker.
const ZIP_SIGNATURES: [[u8; 4]; 3] = [
    *b"PK\x03\x04",
    *b"PK\x05\x06",
    *b"PK\x07\x08",
];

pub fn has_zip_signature(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && ZIP_SIGNATURES.iter().any(|sig| bytes[..4] == sig[..])
}

/// Sniffs the first bytes of `path`. A missing file is not an archive.
pub fn is_zip_archive(path: &Path) -> Result<bool> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).context("Failed to open file for format check"),
    };

    let mut head = Vec::with_capacity(4);
    file.take(4)
        .read_to_end(&mut head)
        .context("Failed to read file signature")?;

    Ok(has_zip_signature(&head))
}

pub fn ensure_zip_archive(path: &Path) -> Result<()> {
    log::info!("Checking archive format of {:?}", path);

    if !is_zip_archive(path)? {
        log::error!("{:?} is not a zip archive", path);
        return Err(PipelineError::NotAnArchive {
            path: path.to_path_buf(),
        }
        .into());
    }

    log::debug!("Zip signature found in {:?}", path);
    Ok(())
}

pub fn compute_sha256(file_path: &Path) -> Result<String> {
    let mut file = fs::File::open(file_path).context("Failed to open file for hash computation")?;

    let mut hasher = Sha256::new();
    copy_in_chunks(&mut file, &mut io::sink(), &mut hasher)
        .context("Failed to read file for hash computation")?;

    Ok(hex::encode(hasher.finalize()))
}
