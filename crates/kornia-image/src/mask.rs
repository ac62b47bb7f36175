use crate::{Image, ImageError, ImageSize};

/// A boolean mask marking the valid pixels of an image.
///
/// Alignment only evaluates residuals and warp Jacobians at the pixels where the
/// mask is `true`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageMask {
    size: ImageSize,
    data: Vec<bool>,
}

impl ImageMask {
    /// Create a mask from row-major pixel flags.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the mask size, an error is returned.
    pub fn new(size: ImageSize, data: Vec<bool>) -> Result<Self, ImageError> {
        if data.len() != size.num_pixels() {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.num_pixels(),
            ));
        }
        Ok(Self { size, data })
    }

    /// Create a mask where every pixel is valid.
    pub fn all_true(size: ImageSize) -> Self {
        Self {
            size,
            data: vec![true; size.num_pixels()],
        }
    }

    /// Create a mask by evaluating a predicate at every `(x, y)` pixel.
    ///
    /// # Examples
    ///
    /// ```
    /// use kornia_image::ImageMask;
    ///
    /// // keep a one pixel border out of the mask
    /// let mask = ImageMask::from_fn([4, 3].into(), |x, y| x > 0 && x < 3 && y == 1);
    ///
    /// assert_eq!(mask.count(), 2);
    /// assert_eq!(mask.true_points(), vec![[1.0, 1.0], [2.0, 1.0]]);
    /// ```
    pub fn from_fn(size: ImageSize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(size.num_pixels());
        for y in 0..size.height {
            for x in 0..size.width {
                data.push(f(x, y));
            }
        }
        Self { size, data }
    }

    /// Get the size of the mask in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Number of valid pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Whether the pixel at `(x, y)` is valid. Out of bounds pixels are not.
    pub fn is_true(&self, x: usize, y: usize) -> bool {
        if x >= self.size.width || y >= self.size.height {
            return false;
        }
        self.data[y * self.size.width + x]
    }

    /// Row-major linear indices of the valid pixels.
    pub fn true_indices(&self) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| v.then_some(i))
            .collect()
    }

    /// Coordinates `[x, y]` of the valid pixels, in the same order as [`Self::true_indices`].
    pub fn true_points(&self) -> Vec<[f64; 2]> {
        let width = self.size.width;
        self.true_indices()
            .into_iter()
            .map(|i| [(i % width) as f64, (i / width) as f64])
            .collect()
    }
}

/// An image together with the mask of its valid pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskedImage<T, const C: usize> {
    image: Image<T, C>,
    mask: ImageMask,
}

impl<T, const C: usize> MaskedImage<T, C> {
    /// Attach a mask to an image.
    ///
    /// # Errors
    ///
    /// If the mask and the image do not share the same size, an error is returned.
    pub fn new(image: Image<T, C>, mask: ImageMask) -> Result<Self, ImageError> {
        if image.size() != mask.size() {
            return Err(ImageError::InvalidImageSize(
                mask.size().width,
                mask.size().height,
                image.width(),
                image.height(),
            ));
        }
        Ok(Self { image, mask })
    }

    /// Wrap an image with a mask where every pixel is valid.
    pub fn from_image(image: Image<T, C>) -> Self {
        let mask = ImageMask::all_true(image.size());
        Self { image, mask }
    }

    /// The underlying image.
    pub fn image(&self) -> &Image<T, C> {
        &self.image
    }

    /// The mask of valid pixels.
    pub fn mask(&self) -> &ImageMask {
        &self.mask
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.image.size()
    }
}
