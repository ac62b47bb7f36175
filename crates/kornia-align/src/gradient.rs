use kornia_geometry::Transform;
use kornia_image::{Image, ImageSize, MaskedImage};
use kornia_imgproc::filter::spatial_gradient;

use crate::error::{ensure_same_size, AlignError};
use crate::warp::WarpSampler;

/// The x and y derivatives of an image, one image per direction.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageGradient<const C: usize> {
    /// Derivative along x (columns).
    pub dx: Image<f64, C>,
    /// Derivative along y (rows).
    pub dy: Image<f64, C>,
}

impl<const C: usize> ImageGradient<C> {
    /// Compute the gradient of an image with a normalized Sobel operator.
    ///
    /// # Errors
    ///
    /// If the image is empty.
    pub fn new(image: &Image<f64, C>) -> Result<Self, AlignError> {
        let mut dx = Image::from_size_val(image.size(), 0.0)?;
        let mut dy = Image::from_size_val(image.size(), 0.0)?;
        spatial_gradient(image, &mut dx, &mut dy)?;
        Ok(Self { dx, dy })
    }

    /// Create a gradient from precomputed derivative images.
    ///
    /// # Errors
    ///
    /// If both derivatives do not share the same size.
    pub fn from_parts(dx: Image<f64, C>, dy: Image<f64, C>) -> Result<Self, AlignError> {
        ensure_same_size("gradient dy", dx.size(), dy.size())?;
        Ok(Self { dx, dy })
    }

    /// Get the size of the gradient images.
    pub fn size(&self) -> ImageSize {
        self.dx.size()
    }

    /// Pull both derivatives onto the template grid through `transform`.
    ///
    /// The forward additive update needs the gradient of the target image evaluated
    /// at the warped template pixels, `grad(I)(W(x; p))`.
    pub fn warp<T, W>(
        &self,
        sampler: &W,
        template: &MaskedImage<f64, C>,
        transform: &T,
    ) -> Result<Self, AlignError>
    where
        T: Transform,
        W: WarpSampler<T, C>,
    {
        Ok(Self {
            dx: sampler.warp(&self.dx, template, transform)?,
            dy: sampler.warp(&self.dy, template, transform)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ImageGradient;
    use crate::warp::ImageWarp;
    use crate::AlignError;
    use approx::assert_relative_eq;
    use kornia_geometry::Translation2d;
    use kornia_image::{Image, MaskedImage};

    #[test]
    fn test_gradient_of_ramp() -> Result<(), AlignError> {
        let image = Image::<f64, 1>::from_size_fn([8, 6].into(), |x, y| {
            [0.25 * x as f64 + 0.5 * y as f64]
        })?;
        let gradient = ImageGradient::new(&image)?;
        assert_eq!(gradient.size(), image.size());
        assert_relative_eq!(*gradient.dx.get([3, 4, 0]).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(*gradient.dy.get([3, 4, 0]).unwrap(), 0.5, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_gradient_warp_shifts_samples() -> Result<(), AlignError> {
        let dx = Image::<f64, 1>::from_size_fn([6, 6].into(), |x, _| [x as f64])?;
        let dy = Image::<f64, 1>::from_size_fn([6, 6].into(), |_, y| [y as f64])?;
        let gradient = ImageGradient::from_parts(dx, dy)?;

        let template = MaskedImage::from_image(Image::<f64, 1>::from_size_val([4, 4].into(), 0.0)?);
        let warped = gradient.warp(&ImageWarp::default(), &template, &Translation2d::new(1.0, 2.0))?;

        assert_eq!(warped.size(), template.size());
        // template pixel (x=1, y=0) samples the gradient at (2, 2)
        assert_relative_eq!(*warped.dx.get([0, 1, 0]).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(*warped.dy.get([0, 1, 0]).unwrap(), 2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_gradient_from_mismatched_parts() -> Result<(), AlignError> {
        let dx = Image::<f64, 1>::from_size_val([4, 4].into(), 0.0)?;
        let dy = Image::<f64, 1>::from_size_val([4, 5].into(), 0.0)?;
        assert!(matches!(
            ImageGradient::from_parts(dx, dy),
            Err(AlignError::SizeMismatch { .. })
        ));
        Ok(())
    }
}
