use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use crate::discovery::classifier::ArchiveFormat;
use crate::errors::ExtractionUnsafe;

const DEFAULT_MODE: u32 = 0o755;

/// Extract `input` (an archive of `format`) into a fresh `output`
/// directory, enforcing the zip-slip defense described in spec §4.7:
/// absolute paths, `..` traversal, and symlink entries are all fatal.
pub fn extract(input: &Path, output: &Path, format: ArchiveFormat) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("creating extraction root {}", output.display()))?;

    match format {
        ArchiveFormat::TarGz => extract_tar(flate2::read::GzDecoder::new(open(input)?), output),
        ArchiveFormat::TarXz => extract_tar(xz2::read::XzDecoder::new(open(input)?), output),
        ArchiveFormat::TarBz2 => extract_tar(bzip2::read::BzDecoder::new(open(input)?), output),
        ArchiveFormat::Tar => extract_tar(open(input)?, output),
        ArchiveFormat::Zip => extract_zip(input, output),
    }
}

fn open(input: &Path) -> Result<File> {
    File::open(input).with_context(|| format!("opening archive {}", input.display()))
}

fn safe_join(output: &Path, entry_path: &Path) -> Result<PathBuf> {
    if entry_path.is_absolute() {
        return Err(ExtractionUnsafe(format!(
            "archive entry has an absolute path: {}",
            entry_path.display()
        ))
        .into());
    }

    for component in entry_path.components() {
        match component {
            Component::ParentDir => {
                return Err(ExtractionUnsafe(format!(
                    "archive entry escapes the extraction root: {}",
                    entry_path.display()
                ))
                .into());
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractionUnsafe(format!(
                    "archive entry has an absolute path: {}",
                    entry_path.display()
                ))
                .into());
            }
            _ => {}
        }
    }

    Ok(output.join(entry_path))
}

fn extract_tar<R: Read>(reader: R, output: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries().context("reading tar entries")? {
        let mut entry = entry.context("reading tar entry")?;

        if entry.header().entry_type().is_symlink() || entry.header().entry_type().is_hard_link() {
            return Err(ExtractionUnsafe(format!(
                "archive contains a symlink entry: {}",
                entry.path().map(|p| p.display().to_string()).unwrap_or_default()
            ))
            .into());
        }

        let entry_path = entry.path().context("reading tar entry path")?.to_path_buf();
        let dest = safe_join(output, &entry_path)?;

        if entry.header().entry_type().is_dir() {
            std::fs::create_dir_all(&dest)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mode = entry.header().mode().unwrap_or(DEFAULT_MODE);
        entry
            .unpack(&dest)
            .with_context(|| format!("extracting {}", dest.display()))?;
        set_mode(&dest, mode)?;
    }
    Ok(())
}

fn extract_zip(input: &Path, output: &Path) -> Result<()> {
    let file = open(input)?;
    let mut archive = zip::ZipArchive::new(file).context("reading zip central directory")?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).context("reading zip entry")?;

        if is_zip_symlink(&entry) {
            return Err(ExtractionUnsafe(format!(
                "archive contains a symlink entry: {}",
                entry.name()
            ))
            .into());
        }

        let Some(enclosed) = entry.enclosed_name() else {
            return Err(ExtractionUnsafe(format!(
                "archive entry has an unsafe path: {}",
                entry.name()
            ))
            .into());
        };
        let dest = safe_join(output, &enclosed)?;

        if entry.is_dir() {
            std::fs::create_dir_all(&dest)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&dest).with_context(|| format!("creating {}", dest.display()))?;
        std::io::copy(&mut entry, &mut out).with_context(|| format!("writing {}", dest.display()))?;

        let mode = entry.unix_mode().unwrap_or(DEFAULT_MODE);
        set_mode(&dest, mode)?;
    }
    Ok(())
}

fn is_zip_symlink<R: Read>(entry: &zip::read::ZipFile<R>) -> bool {
    const S_IFLNK: u32 = 0o120000;
    entry
        .unix_mode()
        .map(|mode| mode & 0o170000 == S_IFLNK)
        .unwrap_or(false)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("setting permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "../tests/root/extract.rs"]
mod tests;
