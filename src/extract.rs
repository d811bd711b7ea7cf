use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::error::PipelineError;

pub type Archive = zip::ZipArchive<fs::File>;

/// Unpacks every entry of `zip_path` into `extract_dir`.
pub fn extract_zip(zip_path: &Path, extract_dir: &Path) -> Result<()> {
    let archive = open_archive(zip_path)?;
    unpack_archive(archive, extract_dir)
}

/// Opens `zip_path` and reads its central directory. Nothing on disk changes.
pub fn open_archive(zip_path: &Path) -> Result<Archive> {
    let file = fs::File::open(zip_path).context("Failed to open ZIP file")?;

    let archive = zip::ZipArchive::new(file).map_err(|e| PipelineError::Extraction {
        reason: format!("failed to read ZIP archive {:?}: {}", zip_path, e),
    })?;

    Ok(archive)
}

/// Replaces `extract_dir` with the contents of `archive`.
///
/// An existing `extract_dir` is removed first so entries from an earlier run
/// never survive. Entry names are sanitised: root and `..` components are
/// dropped, so `../escape.txt` lands at `extract_dir/escape.txt`.
pub fn unpack_archive(mut archive: Archive, extract_dir: &Path) -> Result<()> {
    log::info!("Extracting {} entries to {:?}", archive.len(), extract_dir);

    if extract_dir.exists() {
        log::debug!("Removing previous extraction at {:?}", extract_dir);
        fs::remove_dir_all(extract_dir).context("Failed to clear extraction directory")?;
    }
    fs::create_dir_all(extract_dir).context("Failed to create extraction directory")?;

    let mut extracted = 0usize;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| PipelineError::Extraction {
            reason: format!("failed to read entry {}: {}", i, e),
        })?;

        let outpath = extract_dir.join(file.mangled_name());

        if file.is_dir() {
            fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(p) = outpath.parent() {
            fs::create_dir_all(p)?;
        }
        let mut outfile = fs::File::create(&outpath)
            .with_context(|| format!("Failed to create extracted file {:?}", outpath))?;
        std::io::copy(&mut file, &mut outfile).map_err(|e| PipelineError::Extraction {
            reason: format!("failed to write {}: {}", file.name(), e),
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))?;
            }
        }

        extracted += 1;
    }

    log::info!("ZIP extraction completed: {} file(s)", extracted);
    Ok(())
}
