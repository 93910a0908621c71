use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{GratingError, Result};
use crate::frame::PixelSize;

/// Lossless formats the composite can be written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Tiff,
}

impl OutputFormat {
    /// Choose from the file extension. Anything unrecognised is PNG.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("tiff" | "tif") => Self::Tiff,
            _ => Self::Png,
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

/// Bitmap decode/encode seam. The pipeline only talks to files through this.
pub trait FrameCodec: Send + Sync {
    /// Read the pixel dimensions without decoding the full image.
    fn probe(&self, path: &Path) -> Result<PixelSize>;

    /// Decode a frame in whatever pixel layout the file uses.
    fn decode(&self, path: &Path) -> Result<DynamicImage>;

    /// Fully decode a frame and discard the pixels. Catches files whose
    /// header is readable but whose data is truncated or corrupt.
    fn verify(&self, path: &Path) -> Result<()> {
        self.decode(path).map(drop)
    }

    /// Write an RGBA8 raster to `path`.
    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<()>;
}

/// [`FrameCodec`] backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCodec;

impl FrameCodec for ImageCodec {
    fn probe(&self, path: &Path) -> Result<PixelSize> {
        let (width, height) =
            image::image_dimensions(path).map_err(|e| undecodable(path, e))?;
        Ok(PixelSize::new(width, height))
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        image::open(path).map_err(|e| undecodable(path, e))
    }

    fn encode(&self, image: &RgbaImage, path: &Path) -> Result<()> {
        let format = OutputFormat::from_path(path);
        image
            .save_with_format(path, format.image_format())
            .map_err(|e| GratingError::Encode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}

fn undecodable(path: &Path, err: image::ImageError) -> GratingError {
    GratingError::UndecodableFrame {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Probe a frame and reject zero-area images.
pub fn probe_frame(codec: &dyn FrameCodec, path: &Path) -> Result<PixelSize> {
    let size = codec.probe(path)?;
    if size.is_empty() {
        return Err(GratingError::InvalidDimensions {
            width: size.width,
            height: size.height,
        });
    }
    Ok(size)
}

/// Decode a frame and normalize it to RGBA8.
pub fn load_frame(codec: &dyn FrameCodec, path: &Path) -> Result<RgbaImage> {
    let img = codec.decode(path)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(GratingError::InvalidDimensions {
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(img.into_rgba8())
}

/// Save an RGBA8 raster, choosing the format from the file extension.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<()> {
    ImageCodec.encode(image, path)
}
