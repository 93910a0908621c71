use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_EXTENSIONS;
use crate::error::{GratingError, Result};

/// Pixel dimensions of a raster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const ZERO: PixelSize = PixelSize {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Scale to fit inside a `max_edge` x `max_edge` box, keeping aspect ratio.
    /// Each side is at least one pixel.
    pub fn fit_within(&self, max_edge: u32) -> PixelSize {
        if self.is_empty() || max_edge == 0 {
            return PixelSize::ZERO;
        }
        let longest = self.width.max(self.height) as f64;
        let scale = max_edge as f64 / longest;
        let w = ((self.width as f64 * scale).round() as u32).clamp(1, max_edge);
        let h = ((self.height as f64 * scale).round() as u32).clamp(1, max_edge);
        PixelSize::new(w, h)
    }
}

impl std::fmt::Display for PixelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Physical print dimensions in centimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl PhysicalSize {
    pub const ZERO: PhysicalSize = PhysicalSize {
        width_cm: 0.0,
        height_cm: 0.0,
    };
}

impl std::fmt::Display for PhysicalSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} x {:.2} cm", self.width_cm, self.height_cm)
    }
}

/// How imported paths combine with an existing list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportMode {
    #[default]
    Append,
    Replace,
}

/// Ordered frame sources. The list order is the interleave order and the
/// first entry defines the output aspect ratio.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameList {
    paths: Vec<PathBuf>,
}

impl FrameList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Add paths to the list. Returns the number of frames now in the list.
    pub fn import<I, P>(&mut self, paths: I, mode: ImportMode) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        if mode == ImportMode::Replace {
            self.paths.clear();
        }
        self.paths.extend(paths.into_iter().map(Into::into));
        self.paths.len()
    }

    /// Remove every listed index. Duplicates are ignored.
    ///
    /// Returns the index that should be selected afterwards: the lowest removed
    /// index, clamped to the shortened list, or `None` once the list is empty.
    pub fn remove(&mut self, indices: &[usize]) -> Result<Option<usize>> {
        let total = self.paths.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= total) {
            return Err(GratingError::FrameIndexOutOfRange { index, total });
        }
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        let Some(&anchor) = sorted.last() else {
            return Ok(None);
        };
        for index in sorted {
            self.paths.remove(index);
        }
        if self.paths.is_empty() {
            Ok(None)
        } else {
            Ok(Some(anchor.min(self.paths.len() - 1)))
        }
    }

    /// Swap entry `index` with its predecessor. Returns the new index.
    pub fn move_up(&mut self, index: usize) -> Result<usize> {
        let total = self.paths.len();
        if index == 0 || index >= total {
            return Err(GratingError::FrameIndexOutOfRange { index, total });
        }
        self.paths.swap(index, index - 1);
        Ok(index - 1)
    }

    /// Swap entry `index` with its successor. Returns the new index.
    pub fn move_down(&mut self, index: usize) -> Result<usize> {
        let total = self.paths.len();
        if index >= total.saturating_sub(1) {
            return Err(GratingError::FrameIndexOutOfRange { index, total });
        }
        self.paths.swap(index, index + 1);
        Ok(index + 1)
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for FrameList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Check that a path has one of the accepted frame extensions.
pub fn check_frame_extension(path: &Path) -> Result<()> {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            FRAME_EXTENSIONS
                .iter()
                .any(|allowed| e.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(GratingError::UnsupportedFrameType(path.to_path_buf()))
    }
}
