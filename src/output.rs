use crate::{
    error::{PassChartError, Result},
    pass_chart::{ImageFormat, PassChartImage},
};
use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::Path,
};
use tempfile::Builder;

/// Save the chart to `path`, replacing any existing file.
pub fn save_pass_chart(image: &PassChartImage, path: &Path) -> Result<()> {
    let format = image.get_format();
    if format != ImageFormat::Other && !has_extension(path, format.extensions()) {
        log::warn!("Saving a {format:?} image to {path:?}, which has a different extension.");
    }
    write_atomically(path, image.as_bytes())?;
    log::info!("{} bytes saved to {path:?}.", image.as_bytes().len());
    Ok(())
}

/// Write `bytes` next to `path` and rename the result over it.
///
/// `path` is either left untouched or holds all of `bytes`. An existing
/// `path` must be writable; symlinks are followed and the target keeps its
/// permissions.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_error = |source| PassChartError::Io {
        path: path.to_path_buf(),
        source,
    };

    let (target, permissions) = match fs::canonicalize(path) {
        Ok(resolved) => {
            // Fails on read-only files and directories; does not truncate.
            let existing = OpenOptions::new()
                .write(true)
                .open(&resolved)
                .map_err(io_error)?;
            let permissions = existing.metadata().map_err(io_error)?.permissions();
            (resolved, Some(permissions))
        }
        Err(error) if error.kind() == ErrorKind::NotFound => (path.to_path_buf(), None),
        Err(error) => return Err(io_error(error)),
    };

    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Dropped (and removed) on every early return below.
    let mut file = Builder::new()
        .prefix(".get_hapasschart")
        .suffix(".part")
        .tempfile_in(directory)
        .map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    match permissions {
        Some(permissions) => file
            .as_file()
            .set_permissions(permissions)
            .map_err(io_error)?,
        // Temporary files are created owner-only.
        #[cfg(unix)]
        None => {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(io_error)?;
        }
        #[cfg(not(unix))]
        None => {}
    }
    file.persist(&target).map_err(|e| io_error(e.error))?;

    Ok(())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
