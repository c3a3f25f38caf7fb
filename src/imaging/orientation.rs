//! EXIF orientation normalization.
//!
//! Cameras store pixels in sensor order and record how to display them in
//! EXIF tag 0x0112. Every size measurement downstream assumes an upright
//! buffer, so [`normalize`] runs before the first resize.
//!
//! | EXIF | [`Orientation`] | Transform |
//! |---|---|---|
//! | 3 | `Rotate180` | 180°, same dimensions |
//! | 6 | `Rotate90` | 90° clockwise, width ↔ height |
//! | 8 | `Rotate270` | 270° clockwise, width ↔ height |
//! | anything else | `Normal` | none |
//!
//! Mirrored orientations (2, 4, 5, 7) are passed through untouched.

use image::DynamicImage;
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    Rotate180,
    Rotate90,
    Rotate270,
}

impl Orientation {
    pub fn from_exif(tag: u32) -> Self {
        match tag {
            3 => Orientation::Rotate180,
            6 => Orientation::Rotate90,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Orientation::Rotate90 | Orientation::Rotate270)
    }
}

/// Read the orientation tag from an encoded image.
///
/// Missing or unreadable EXIF data means [`Orientation::Normal`].
pub fn read_exif_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from_exif)
        .unwrap_or_default()
}

/// Turn a decoded buffer upright.
///
/// Rotations allocate a new buffer sized to the rotated content; the input
/// is consumed either way.
pub fn normalize(image: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => image,
        Orientation::Rotate180 => image.rotate180(),
        Orientation::Rotate90 => image.rotate90(),
        Orientation::Rotate270 => image.rotate270(),
    }
}
