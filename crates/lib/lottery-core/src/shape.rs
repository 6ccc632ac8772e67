use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Spatial size and channel count of a single image.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl ImageShape {
    pub const fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    /// Number of values in one image.
    pub fn num_values(&self) -> usize {
        self.height * self.width * self.channels
    }

    pub fn num_pixels(&self) -> usize {
        self.height * self.width
    }
}

impl Display for ImageShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}
