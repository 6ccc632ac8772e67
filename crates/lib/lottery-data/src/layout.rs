use lottery_core::shape::ImageShape;

use crate::error::DatasetError;

/// Axis order of a raw image array with a leading example axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// `[examples, channels, d2, d3]`
    ChannelsFirst,
    /// `[examples, height, width, channels]`
    ChannelsLast,
}

/// Raw 8-bit pixels of many images held in one contiguous buffer.
#[derive(Clone, Debug)]
pub struct RawImages {
    data: Vec<u8>,
    shape: [usize; 4],
    layout: Layout,
}

impl RawImages {
    pub fn new(data: Vec<u8>, shape: [usize; 4], layout: Layout) -> Result<Self, DatasetError> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(DatasetError::BufferSize {
                shape: shape.to_vec(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            shape,
            layout,
        })
    }

    /// Wraps single-channel images given as `[examples, height, width]`.
    pub fn grayscale(data: Vec<u8>, shape: [usize; 3]) -> Result<Self, DatasetError> {
        Self::new(
            data,
            [shape[0], shape[1], shape[2], 1],
            Layout::ChannelsLast,
        )
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn num_examples(&self) -> usize {
        self.shape[0]
    }

    /// Moves the channel axis last by exchanging axes 1 and 3.
    ///
    /// A channels-first `[n, c, a, b]` array becomes `[n, b, a, c]`, so the two spatial axes
    /// also trade places. Channels-last arrays are returned untouched.
    pub fn into_channels_last(self) -> Self {
        match self.layout {
            Layout::ChannelsLast => self,
            Layout::ChannelsFirst => {
                let (data, shape) = swap_axes(&self.data, self.shape, 1, 3);
                Self {
                    data,
                    shape,
                    layout: Layout::ChannelsLast,
                }
            }
        }
    }

    /// Per-image shape, read as `[n, height, width, channels]`.
    pub fn image_shape(&self) -> ImageShape {
        let dims = match self.layout {
            Layout::ChannelsLast => self.shape,
            Layout::ChannelsFirst => [self.shape[0], self.shape[3], self.shape[2], self.shape[1]],
        };
        ImageShape::new(dims[1], dims[2], dims[3])
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Reorders one `[height, width, channels]` image into `[channels, height, width]`.
pub fn hwc_to_chw(pixels: &[u8], shape: ImageShape) -> Vec<u8> {
    let ImageShape {
        height,
        width,
        channels,
    } = shape;
    let mut planar = Vec::with_capacity(pixels.len());
    for channel in 0..channels {
        for row in 0..height {
            for column in 0..width {
                planar.push(pixels[(row * width + column) * channels + channel]);
            }
        }
    }
    planar
}

/// Exchanges two axes of a 4-d row-major array.
pub fn swap_axes(data: &[u8], shape: [usize; 4], a: usize, b: usize) -> (Vec<u8>, [usize; 4]) {
    let strides = [
        shape[1] * shape[2] * shape[3],
        shape[2] * shape[3],
        shape[3],
        1,
    ];
    let mut new_shape = shape;
    new_shape.swap(a, b);
    let mut source_strides = strides;
    source_strides.swap(a, b);

    let mut swapped = Vec::with_capacity(data.len());
    for i0 in 0..new_shape[0] {
        for i1 in 0..new_shape[1] {
            for i2 in 0..new_shape[2] {
                let base =
                    i0 * source_strides[0] + i1 * source_strides[1] + i2 * source_strides[2];
                swapped.extend((0..new_shape[3]).map(|i3| data[base + i3 * source_strides[3]]));
            }
        }
    }
    (swapped, new_shape)
}
