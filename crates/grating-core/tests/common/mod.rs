#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{Rgba, RgbaImage};

use grating_core::frame::FrameList;
use grating_core::pipeline::ProgressReporter;

/// Frame whose pixels record where they came from:
/// `[tag, x mod 256, y mod 256, 255]`.
pub fn tagged_frame(width: u32, height: u32, tag: u8) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba([tag, x as u8, y as u8, 255]))
}

/// Frame filled with a single colour.
pub fn solid_frame(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Save frames as `frame_<i>.png` in `dir` and return them as a list.
pub fn write_frames(dir: &Path, frames: &[RgbaImage]) -> FrameList {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let path = dir.join(format!("frame_{i}.png"));
            frame.save(&path).expect("write test frame");
            path
        })
        .collect()
}

/// Write `count` tagged frames (tags 0, 1, 2, ...) of one size.
pub fn write_tagged_frames(dir: &Path, width: u32, height: u32, count: usize) -> FrameList {
    let frames: Vec<RgbaImage> = (0..count)
        .map(|i| tagged_frame(width, height, i as u8))
        .collect();
    write_frames(dir, &frames)
}

/// Number of entries directly inside `dir`.
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read dir").count()
}

/// Everything under `dir`, recursively.
pub fn all_entries(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        for entry in std::fs::read_dir(&d).expect("read dir") {
            let path = entry.expect("dir entry").path();
            if path.is_dir() {
                stack.push(path.clone());
            }
            out.push(path);
        }
    }
    out
}

/// Reporter that requests cancellation on the `n`-th poll (1-based).
pub struct CancelOnPoll {
    cancel_at: usize,
    polls: AtomicUsize,
}

impl CancelOnPoll {
    pub fn new(cancel_at: usize) -> Self {
        Self {
            cancel_at,
            polls: AtomicUsize::new(0),
        }
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl ProgressReporter for CancelOnPoll {
    fn is_cancelled(&self) -> bool {
        self.polls.fetch_add(1, Ordering::SeqCst) + 1 >= self.cancel_at
    }
}
