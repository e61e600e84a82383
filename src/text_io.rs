//! Plain-text output of selected observations
//!
//! One observation per line, fields separated by a single space:
//!
//! ```text
//! <storm id> <YYYY-MM-DDTHH:MM> <lat> <lon> <pressure>[ <basin>]
//! ```
//!
//! The file is written to a temporary sibling and renamed into place, so a
//! failed conversion never leaves a truncated output behind. The renamed file
//! keeps the permissions of the file it replaces, or gets `0644` when new.

use crate::basin::Basin;
use crate::errors::{Result, TrackTextError};
use crate::filter::Selection;
use crate::track::{RecordLayout, TrackPoint};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Mode of a newly created output file on Unix
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Format one observation, or `None` when it lacks a field the line needs.
pub fn format_point(storm_id: &str, point: &TrackPoint, layout: RecordLayout) -> Option<String> {
    let time = point.time?;
    let (lat, lon, pressure) = (point.lat?, point.lon?, point.pressure?);

    let mut line = format!(
        "{} {} {:.2} {:.2} {:.1}",
        storm_id,
        time.format(TIME_FORMAT),
        lat,
        lon,
        pressure
    );
    if layout.includes_basin() {
        line.push(' ');
        line.push_str(point.basin.unwrap_or(Basin::Missing).code());
    }
    Some(line)
}

/// Writes a [`Selection`] to a text file
pub struct TextWriter<'a> {
    output_path: &'a Path,
    layout: RecordLayout,
}

impl<'a> TextWriter<'a> {
    pub fn new(output_path: &'a Path, layout: RecordLayout) -> Self {
        Self {
            output_path,
            layout,
        }
    }

    /// Render every line. Storms are formatted in parallel; line order
    /// follows the selection.
    pub fn render(&self, selection: &Selection) -> Vec<String> {
        let layout = self.layout;
        selection
            .tracks
            .par_iter()
            .flat_map_iter(|track| {
                track
                    .points
                    .iter()
                    .filter_map(move |p| format_point(track.id, p, layout))
            })
            .collect()
    }

    /// Write the selection and return the number of lines written.
    pub fn write(&self, selection: &Selection) -> Result<usize> {
        let lines = self.render(selection);
        self.write_lines(&lines).map_err(|source| TrackTextError::WriteFailed {
            path: self.output_path.to_path_buf(),
            source,
        })?;

        debug!("Wrote {} lines to {}", lines.len(), self.output_path.display());
        Ok(lines.len())
    }

    fn write_lines(&self, lines: &[String]) -> std::io::Result<()> {
        let dir = parent_dir(self.output_path);
        let tmp = NamedTempFile::new_in(&dir)?;

        {
            let mut out = BufWriter::new(tmp.as_file());
            for line in lines {
                writeln!(out, "{}", line)?;
            }
            out.flush()?;
        }

        match_permissions(tmp.as_file(), self.output_path)?;
        tmp.persist(self.output_path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Give the temp file the target's permissions, since the temp file is
/// created private.
#[cfg(unix)]
fn match_permissions(file: &File, target: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match fs::metadata(target) {
        Ok(meta) => meta.permissions(),
        Err(_) => fs::Permissions::from_mode(NEW_FILE_MODE),
    };
    file.set_permissions(permissions)
}

#[cfg(not(unix))]
fn match_permissions(_file: &File, _target: &Path) -> std::io::Result<()> {
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
