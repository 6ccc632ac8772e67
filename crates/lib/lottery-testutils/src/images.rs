use lottery_core::shape::ImageShape;

/// Pixels of `count` images where every value encodes its own position, so that layout bugs
/// show up as wrong values rather than silently passing.
pub fn position_pixels(count: usize, shape: ImageShape) -> Vec<u8> {
    (0..count * shape.num_values())
        .map(|i| (i % 251) as u8)
        .collect()
}

/// Pixels of `count` images that all share a single value.
pub fn flat_pixels(count: usize, shape: ImageShape, value: u8) -> Vec<u8> {
    vec![value; count * shape.num_values()]
}

/// Labels `0, 1, .., num_classes - 1, 0, 1, ..`.
pub fn cycling_labels(count: usize, num_classes: usize) -> Vec<usize> {
    (0..count).map(|i| i % num_classes).collect()
}
