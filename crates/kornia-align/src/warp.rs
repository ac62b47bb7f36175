use kornia_geometry::Transform;
use kornia_image::{Image, MaskedImage};
use kornia_imgproc::interpolation::{remap, InterpolationMode};

use crate::error::AlignError;

/// Resamples an image onto the pixel grid of a template.
///
/// Given a target image `I`, a template `T` and a transform `W(x; p)`, the sampler
/// returns the image `I(W(x; p))` with the size of `T`. Alignment sessions hold the
/// sampler for their whole lifetime, so custom boundary handling or interpolation
/// schemes can be plugged in here.
pub trait WarpSampler<T: Transform, const C: usize> {
    /// Warp `image` onto the grid of `template` through `transform`.
    ///
    /// # Errors
    ///
    /// If the image cannot be sampled, e.g. it is empty.
    fn warp(
        &self,
        image: &Image<f64, C>,
        template: &MaskedImage<f64, C>,
        transform: &T,
    ) -> Result<Image<f64, C>, AlignError>;
}

/// Warp sampler interpolating the image at the transformed template pixels.
///
/// Samples that fall outside the image are set to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageWarp {
    /// Interpolation used to sample the image.
    pub interpolation: InterpolationMode,
}

impl ImageWarp {
    /// Create a warp sampler with the given interpolation.
    pub fn new(interpolation: InterpolationMode) -> Self {
        Self { interpolation }
    }
}

impl<T: Transform, const C: usize> WarpSampler<T, C> for ImageWarp {
    fn warp(
        &self,
        image: &Image<f64, C>,
        template: &MaskedImage<f64, C>,
        transform: &T,
    ) -> Result<Image<f64, C>, AlignError> {
        let size = template.size();

        // every template pixel, row-major, so the map lines up with the destination
        let grid = (0..size.height)
            .flat_map(|y| (0..size.width).map(move |x| [x as f64, y as f64]))
            .collect::<Vec<_>>();

        let (map_x, map_y): (Vec<f64>, Vec<f64>) = transform
            .apply(&grid)
            .into_iter()
            .map(|[x, y]| (x, y))
            .unzip();

        let mut dst = Image::from_size_val(size, 0.0)?;
        remap(image, &mut dst, &map_x, &map_y, self.interpolation)?;

        Ok(dst)
    }
}
