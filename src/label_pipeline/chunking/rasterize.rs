use image::{ImageBuffer, Pixel};

/// Fills the region enclosed by `rings` with `value`, using the even-odd rule.
///
/// Rings are in fractional pixel coordinates and are implicitly closed. A
/// pixel is filled when its center lies inside, so a hole ring passed
/// alongside its exterior is left unfilled and an edge a hair short of a pixel
/// boundary still covers the last pixel. Parts outside the image are clipped.
pub fn fill_rings<P: Pixel>(
    image: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    rings: &[Vec<(f64, f64)>],
    value: P,
) {
    let (width, height) = image.dimensions();
    let edges: Vec<((f64, f64), (f64, f64))> = rings
        .iter()
        .filter(|ring| ring.len() >= 3)
        .flat_map(|ring| ring.iter().copied().zip(ring.iter().copied().cycle().skip(1)))
        .filter(|((_, y0), (_, y1))| y0 != y1)
        .collect();
    if edges.is_empty() {
        return;
    }

    let mut crossings = Vec::new();
    for y in 0..height {
        let sample = y as f64 + 0.5;
        crossings.clear();
        for &((x0, y0), (x1, y1)) in &edges {
            if (y0 <= sample && sample < y1) || (y1 <= sample && sample < y0) {
                crossings.push(x0 + (sample - y0) * (x1 - x0) / (y1 - y0));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(0.0);
            let end = (span[1] - 0.5).ceil().min(width as f64);
            if start >= end {
                continue;
            }
            for x in start as u32..end as u32 {
                image.put_pixel(x, y, value);
            }
        }
    }
}
