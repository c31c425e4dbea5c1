//! Native texture resource.
//!
//! A [`Texture`] owns exactly one native texture. The native resource is
//! released from `Drop`, which only runs once the last `Rc<Texture>` (held by
//! sprite sheets or a texture cache) goes away. There is no public destroy
//! method, so the native destroy cannot be called twice.
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::native::{NativeError, RendererRef, TextureHandle};

/// Pixel layout of texture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Unknown,
    /// 8 bits per channel, red first.
    Rgba8888,
}

impl PixelFormat {
    /// Bytes per pixel, or `None` for formats the engine cannot upload.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            PixelFormat::Rgba8888 => Some(4),
            PixelFormat::Unknown => None,
        }
    }
}

/// Why a texture could not be created.
#[derive(Debug, thiserror::Error)]
pub enum ResourceCreationError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("unsupported pixel format {0:?}")]
    UnsupportedFormat(PixelFormat),
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("native texture allocation failed: {0}")]
    Native(#[from] NativeError),
}

pub struct Texture {
    width: u32,
    height: u32,
    format: PixelFormat,
    handle: TextureHandle,
    renderer: RendererRef,
}

impl Texture {
    /// Upload `pixels` as a new native texture.
    ///
    /// `pixels` must hold exactly `width * height` tightly packed pixels of
    /// `format`.
    pub fn create(
        renderer: &RendererRef,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, ResourceCreationError> {
        if width == 0 || height == 0 {
            return Err(ResourceCreationError::ZeroSize { width, height });
        }
        let bpp = format
            .bytes_per_pixel()
            .ok_or(ResourceCreationError::UnsupportedFormat(format))?;
        let expected = width as usize * height as usize * bpp;
        if pixels.len() != expected {
            return Err(ResourceCreationError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }

        let handle = renderer.texture_create(format, width, height, pixels)?;
        debug!("Created texture {:?} ({}x{})", handle, width, height);
        Ok(Self {
            width,
            height,
            format,
            handle,
            renderer: renderer.clone(),
        })
    }

    /// Decode an image file to RGBA8888 and upload it.
    pub fn load(renderer: &RendererRef, path: impl AsRef<Path>) -> Result<Self, ResourceCreationError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| ResourceCreationError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        let texture = Self::create(renderer, image.as_raw(), width, height, PixelFormat::Rgba8888)?;
        info!("Loaded {} ({}x{})", path.display(), width, height);
        Ok(texture)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("handle", &self.handle)
            .finish()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        debug!("Destroying texture {:?}", self.handle);
        self.renderer.texture_destroy(self.handle);
    }
}
