//! Raw, headerless per-frame scratch files used by the streaming pipeline.
//!
//! Each buffer is `width * height * 4` bytes of RGBA8 in row-major order.
//! Handles and files live exactly as long as the owning [`ScratchSet`]:
//! dropping it closes every handle and removes the directory, whatever path
//! the caller took out of the pipeline.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{GratingError, Result};

/// One frame's pixels on disk.
pub struct ScratchBuffer {
    file: File,
    bytes_per_row: usize,
    rows: usize,
}

impl ScratchBuffer {
    /// Read row `y` into `buf`, which must be exactly one row long.
    pub fn read_row(&mut self, y: usize, buf: &mut [u8]) -> Result<()> {
        if buf.len() != self.bytes_per_row {
            return Err(GratingError::RowLengthMismatch {
                expected: self.bytes_per_row,
                actual: buf.len(),
            });
        }
        if y >= self.rows {
            return Err(GratingError::InvalidParameter(format!(
                "scratch row {y} out of range ({} rows)",
                self.rows
            )));
        }
        self.file
            .seek(SeekFrom::Start((y * self.bytes_per_row) as u64))?;
        self.file.read_exact(buf)?;
        Ok(())
    }
}

/// Scratch directory plus the buffers created in it.
pub struct ScratchSet {
    // Declared before `dir` so handles close before the directory is removed.
    buffers: Vec<ScratchBuffer>,
    dir: TempDir,
    bytes_per_row: usize,
    rows: usize,
}

impl ScratchSet {
    /// Create a fresh, uniquely named scratch directory under `root`, which
    /// must already exist.
    pub fn create(root: &Path, bytes_per_row: usize, rows: usize) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("grating-scratch-")
            .tempdir_in(root)?;
        debug!(dir = %dir.path().display(), "Created scratch directory");
        Ok(Self {
            buffers: Vec::new(),
            dir,
            bytes_per_row,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Persist one frame's raw pixels as the next buffer.
    pub fn push(&mut self, pixels: &[u8]) -> Result<()> {
        let expected = self.bytes_per_row * self.rows;
        if pixels.len() != expected {
            return Err(GratingError::RowLengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        let path = self
            .dir
            .path()
            .join(format!("frame_{:04}.raw", self.buffers.len()));
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(pixels)?;
        file.flush()?;
        debug!(path = %path.display(), bytes = expected, "Wrote scratch buffer");
        self.buffers.push(ScratchBuffer {
            file,
            bytes_per_row: self.bytes_per_row,
            rows: self.rows,
        });
        Ok(())
    }

    /// Read row `y` of every buffer, in push order, into `rows`.
    pub fn read_rows(&mut self, y: usize, rows: &mut [Vec<u8>]) -> Result<()> {
        if rows.len() != self.buffers.len() {
            return Err(GratingError::InvalidParameter(format!(
                "expected {} row buffers, got {}",
                self.buffers.len(),
                rows.len()
            )));
        }
        for (buffer, row) in self.buffers.iter_mut().zip(rows.iter_mut()) {
            buffer.read_row(y, row)?;
        }
        Ok(())
    }

    /// Close every handle and remove the directory, reporting any failure.
    /// Dropping the set does the same but swallows errors.
    pub fn close(self) -> Result<()> {
        let Self { buffers, dir, .. } = self;
        drop(buffers);
        let path = dir.path().to_path_buf();
        if let Err(e) = dir.close() {
            warn!(dir = %path.display(), error = %e, "Failed to remove scratch directory");
            return Err(e.into());
        }
        debug!(dir = %path.display(), "Removed scratch directory");
        Ok(())
    }
}
