#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//===========================================================================//

/// Pixel sizes that are published as standalone PNG files.
pub const REQUIRED_PNG_IMAGE_SIZES: &[u32] =
    &[32, 57, 72, 96, 120, 128, 144, 152, 195, 228];

/// Pixel sizes that are embedded in the ICO file.
pub const REQUIRED_ICO_IMAGE_SIZES: &[u32] = &[16, 24, 32, 48, 64];

// Output file names for each PNG size.  See
// https://github.com/audreyr/favicon-cheat-sheet for who consumes which.
const PNG_FILE_NAMES: &[(u32, &str)] = &[
    (32, "favicon-32.png"),   // Older Chrome versions that mishandle ICO
    (57, "favicon-57.png"),   // iPhone (first generation to 3G) home screen
    (72, "favicon-72.png"),   // iPad home screen
    (96, "favicon-96.png"),   // GoogleTV
    (120, "favicon-120.png"), // iPhone retina touch icon
    (128, "favicon-128.png"), // Chrome Web Store
    (144, "favicon-144.png"), // IE10 Metro tile
    (152, "favicon-152.png"), // iPad retina touch icon
    (195, "favicon-195.png"), // Opera Speed Dial
    (228, "favicon-228.png"), // Opera Coast
];

//===========================================================================//

/// A square PNG image, already resized, that can feed the favicon set.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ImageInfo {
    /// The width (and height) of the image, in pixels.
    pub size: u32,
    /// Where the PNG file lives.
    pub path: PathBuf,
}

impl ImageInfo {
    /// Creates a new image description.
    pub fn new<P: Into<PathBuf>>(size: u32, path: P) -> ImageInfo {
        ImageInfo { size, path: path.into() }
    }
}

//===========================================================================//

/// Returns every pixel size a complete favicon set needs, in ascending order
/// and without duplicates.
pub fn required_image_sizes() -> Vec<u32> {
    let mut sizes: Vec<u32> = REQUIRED_PNG_IMAGE_SIZES
        .iter()
        .chain(REQUIRED_ICO_IMAGE_SIZES.iter())
        .cloned()
        .collect();
    sizes.sort_unstable();
    sizes.dedup();
    sizes
}

/// Returns the output file name for a standalone PNG of the given size, or
/// `None` if that size is not published as a PNG.
pub fn png_file_name(size: u32) -> Option<&'static str> {
    PNG_FILE_NAMES
        .iter()
        .find(|&&(png_size, _)| png_size == size)
        .map(|&(_, name)| name)
}

/// Returns the images whose size is one of `sizes`, in their original order.
pub fn filter_images_by_sizes<'a>(
    images: &'a [ImageInfo],
    sizes: &[u32],
) -> Vec<&'a ImageInfo> {
    images.iter().filter(|image| sizes.contains(&image.size)).collect()
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{
        filter_images_by_sizes, png_file_name, required_image_sizes,
        ImageInfo, REQUIRED_PNG_IMAGE_SIZES,
    };

    #[test]
    fn required_sizes_are_sorted_and_unique() {
        assert_eq!(
            required_image_sizes(),
            vec![16, 24, 32, 48, 57, 64, 72, 96, 120, 128, 144, 152, 195, 228]
        );
    }

    #[test]
    fn every_png_size_has_a_file_name() {
        for &size in REQUIRED_PNG_IMAGE_SIZES.iter() {
            assert_eq!(
                png_file_name(size),
                Some(format!("favicon-{}.png", size).as_str())
            );
        }
        assert_eq!(png_file_name(16), None);
        assert_eq!(png_file_name(0), None);
    }

    #[test]
    fn filter_keeps_input_order() {
        let images = vec![
            ImageInfo::new(64, "64.png"),
            ImageInfo::new(100, "100.png"),
            ImageInfo::new(16, "16.png"),
        ];
        let filtered = filter_images_by_sizes(&images, &[16, 64]);
        assert_eq!(filtered, vec![&images[0], &images[2]]);
        assert!(filter_images_by_sizes(&images, &[]).is_empty());
    }
}

//===========================================================================//
