//! Color distance and background reference sampling
//!
//! The segmenter compares every candidate pixel against a single background
//! reference color derived from the four image corners. Both helpers operate
//! on plain RGB triples; alpha never participates in similarity decisions.

use image::RgbaImage;

/// Euclidean distance between two RGB triples on the 0-255 scale.
///
/// `sqrt((r1-r2)^2 + (g1-g2)^2 + (b1-b2)^2)`, so the maximum possible
/// distance is ~441.67 (black vs white).
#[must_use]
pub fn color_distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    let dr = f64::from(a[0]) - f64::from(b[0]);
    let dg = f64::from(a[1]) - f64::from(b[1]);
    let db = f64::from(a[2]) - f64::from(b[2]);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Channel-wise integer average of the four corner pixels' RGB values.
///
/// Alpha is ignored. Uses floor division by 4, matching the truncating
/// arithmetic the reference color was historically computed with. If the
/// subject touches a corner the reference is contaminated; that limitation
/// is inherited deliberately and no correction heuristic is applied.
///
/// Callers must guarantee a non-empty image; corner coordinates are only
/// valid when both dimensions are at least 1.
#[must_use]
pub fn corner_average_color(image: &RgbaImage) -> [u8; 3] {
    let (width, height) = image.dimensions();
    let corners = [
        image.get_pixel(0, 0),
        image.get_pixel(width - 1, 0),
        image.get_pixel(0, height - 1),
        image.get_pixel(width - 1, height - 1),
    ];

    let mut reference = [0u8; 3];
    for (channel, value) in reference.iter_mut().enumerate() {
        let sum: u32 = corners.iter().map(|p| u32::from(p[channel])).sum();
        *value = (sum / 4) as u8;
    }
    reference
}
