//! Image format detection from leading magic bytes.
//!
//! Sniffing borrows the buffer and never copies or consumes it, so the same
//! bytes can be uploaded afterwards.

use serde::Serialize;
use std::fmt;

/// Image formats the OCR and CDN endpoints accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Tiff,
    Bmp,
    Webp,
    /// SGI image library
    Rgb,
    Pbm,
    Pgm,
    Ppm,
    /// Sun raster
    Rast,
    Xbm,
    /// OpenEXR
    Exr,
}

impl ImageFormat {
    /// Detect the format of `bytes`; `None` when it is not a known image
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

        let format = match bytes {
            [0xFF, 0xD8, 0xFF, ..] => ImageFormat::Jpeg,
            _ if bytes.starts_with(PNG) => ImageFormat::Png,
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => ImageFormat::Gif,
            [b'M', b'M', 0x00, 0x2A, ..] | [b'I', b'I', 0x2A, 0x00, ..] => ImageFormat::Tiff,
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => ImageFormat::Webp,
            [0x01, 0xDA, ..] => ImageFormat::Rgb,
            [b'P', kind @ b'1'..=b'6', b' ' | b'\t' | b'\n' | b'\r', ..] => match kind {
                b'1' | b'4' => ImageFormat::Pbm,
                b'2' | b'5' => ImageFormat::Pgm,
                _ => ImageFormat::Ppm,
            },
            [0x59, 0xA6, 0x6A, 0x95, ..] => ImageFormat::Rast,
            _ if bytes.starts_with(b"#define ") => ImageFormat::Xbm,
            [0x76, 0x2F, 0x31, 0x01, ..] => ImageFormat::Exr,
            [b'B', b'M', ..] => ImageFormat::Bmp,
            _ => return None,
        };

        Some(format)
    }

    /// Name sent as the OCR `filetype` and used as the upload extension
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Webp => "webp",
            ImageFormat::Rgb => "rgb",
            ImageFormat::Pbm => "pbm",
            ImageFormat::Pgm => "pgm",
            ImageFormat::Ppm => "ppm",
            ImageFormat::Rast => "rast",
            ImageFormat::Xbm => "xbm",
            ImageFormat::Exr => "exr",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
