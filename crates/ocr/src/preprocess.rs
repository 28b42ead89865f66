use image::{imageops, DynamicImage, GrayImage, ImageBuffer, Luma};
use imageproc::filter::{filter3x3, separable_filter_equal};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Longest side accepted before downscaling.
const MAX_SIDE: u32 = 2800;

const THRESHOLD_BLOCK: u32 = 11;
const THRESHOLD_BIAS: f32 = 2.0;

const DENOISE_STRENGTH: f32 = 10.0;
const DENOISE_TEMPLATE: u32 = 7;
const DENOISE_SEARCH: u32 = 21;

#[rustfmt::skip]
const SHARPEN_KERNEL: [i32; 9] = [
    -1, -1, -1,
    -1,  9, -1,
    -1, -1, -1,
];

/// Decode raw image bytes (JPEG / PNG / WEBP / …) and normalize them for OCR.
pub fn prepare_for_ocr_from_bytes(data: &[u8]) -> Result<GrayImage, PreprocessError> {
    let img = image::load_from_memory(data)?;
    Ok(normalize(img))
}

/// Grayscale → adaptive threshold → non-local means → sharpen.
pub fn normalize(img: DynamicImage) -> GrayImage {
    let gray = downscale(img).to_luma8();
    let binary = adaptive_threshold(&gray, THRESHOLD_BLOCK, THRESHOLD_BIAS);
    let denoised = denoise(&binary, DENOISE_STRENGTH, DENOISE_TEMPLATE, DENOISE_SEARCH);
    sharpen(&denoised)
}

/// Serialize a normalized image as PNG for engines that take encoded bytes.
pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

fn downscale(img: DynamicImage) -> DynamicImage {
    if img.width() > MAX_SIDE || img.height() > MAX_SIDE {
        img.resize(MAX_SIDE, MAX_SIDE, imageops::FilterType::Lanczos3)
    } else {
        img
    }
}

// ── Adaptive threshold ────────────────────────────────────────────────────────

/// Normalized 1-D Gaussian weights for a `size`-tap window.
fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (size / 2) as i32;
    let weights: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// White where a pixel is brighter than its Gaussian-weighted neighborhood
/// mean minus `bias`, black elsewhere. Borders are replicated.
fn adaptive_threshold(gray: &GrayImage, block: u32, bias: f32) -> GrayImage {
    let mean: GrayImage = separable_filter_equal(gray, &gaussian_kernel(block));
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let local = f32::from(mean.get_pixel(x, y)[0]);
        if f32::from(gray.get_pixel(x, y)[0]) > local - bias {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

// ── Non-local means ───────────────────────────────────────────────────────────

/// Non-local means denoising. Each pixel becomes the weighted average of the
/// pixels in its search window, weighted by how similar the surrounding
/// `template`×`template` patches are. Patch distances for one search offset
/// come from a single integral image.
fn denoise(img: &GrayImage, strength: f32, template: u32, search: u32) -> GrayImage {
    let (w, h) = (img.width() as usize, img.height() as usize);
    if w == 0 || h == 0 {
        return img.clone();
    }
    let tr = (template / 2) as usize;
    let sr = (search / 2) as usize;
    let pad = tr + sr;
    let pw = w + 2 * pad;
    let ph = h + 2 * pad;

    let padded: Vec<i64> = (0..ph)
        .flat_map(|py| {
            (0..pw).map(move |px| {
                let x = px.saturating_sub(pad).min(w - 1);
                let y = py.saturating_sub(pad).min(h - 1);
                i64::from(img.get_pixel(x as u32, y as u32)[0])
            })
        })
        .collect();

    // Distances are needed for every patch pixel of every output pixel.
    let rw = w + 2 * tr;
    let rh = h + 2 * tr;
    let iw = rw + 1;
    let mut integral = vec![0u64; iw * (rh + 1)];

    let area = (template * template) as f32;
    let h2 = strength * strength;
    let mut acc = vec![0f32; w * h];
    let mut weights = vec![0f32; w * h];

    let sr = sr as i64;
    for dy in -sr..=sr {
        for dx in -sr..=sr {
            for r in 0..rh {
                let mut row_sum = 0u64;
                for c in 0..rw {
                    let a = padded[(r + sr as usize) * pw + c + sr as usize];
                    let by = (r as i64 + sr + dy) as usize;
                    let bx = (c as i64 + sr + dx) as usize;
                    let d = a - padded[by * pw + bx];
                    row_sum += (d * d) as u64;
                    integral[(r + 1) * iw + c + 1] = integral[r * iw + c + 1] + row_sum;
                }
            }

            for y in 0..h {
                for x in 0..w {
                    let (y0, x0, y1, x1) = (y, x, y + 2 * tr + 1, x + 2 * tr + 1);
                    let ssd = integral[y1 * iw + x1] + integral[y0 * iw + x0]
                        - integral[y0 * iw + x1]
                        - integral[y1 * iw + x0];
                    let weight = (-(ssd as f32 / area) / h2).exp();
                    let ny = (y as i64 + pad as i64 + dy) as usize;
                    let nx = (x as i64 + pad as i64 + dx) as usize;
                    acc[y * w + x] += weight * padded[ny * pw + nx] as f32;
                    weights[y * w + x] += weight;
                }
            }
        }
    }

    ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
        let i = y as usize * w + x as usize;
        Luma([(acc[i] / weights[i]).round().clamp(0.0, 255.0) as u8])
    })
}

// ── Sharpen ───────────────────────────────────────────────────────────────────

/// Index into `0..len` mirrored about the edge pixel without repeating it
/// (`-1 → 1`, `len → len - 2`).
fn reflect_101(i: i64, len: u32) -> u32 {
    let last = i64::from(len) - 1;
    if last == 0 {
        return 0;
    }
    let mirrored = if i < 0 {
        -i
    } else if i > last {
        2 * last - i
    } else {
        i
    };
    mirrored.clamp(0, last) as u32
}

/// 3×3 sharpen. The image is padded by one mirrored pixel on each side so
/// edge pixels see reflect-101 neighbors, then the padding is cropped off.
fn sharpen(img: &GrayImage) -> GrayImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let padded: GrayImage = ImageBuffer::from_fn(w + 2, h + 2, |x, y| {
        *img.get_pixel(
            reflect_101(i64::from(x) - 1, w),
            reflect_101(i64::from(y) - 1, h),
        )
    });
    let filtered: GrayImage = filter3x3::<_, i32, u8>(&padded, &SHARPEN_KERNEL);
    imageops::crop_imm(&filtered, 1, 1, w, h).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_gray(width: u32, height: u32, value: u8) -> GrayImage {
        ImageBuffer::from_fn(width, height, |_, _| Luma([value]))
    }

    /// White page with a dark 10×10 "stroke" in the middle.
    fn page_with_block() -> GrayImage {
        ImageBuffer::from_fn(40, 40, |x, y| {
            if (15..25).contains(&x) && (15..25).contains(&y) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        })
    }

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(11);
        assert_eq!(k.len(), 11);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..5 {
            assert!((k[i] - k[10 - i]).abs() < 1e-7);
        }
        assert!(k[5] > k[4]);
    }

    #[test]
    fn uniform_image_thresholds_to_white() {
        let out = normalize(DynamicImage::ImageLuma8(solid_gray(12, 12, 128)));
        assert!(out.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn dark_stroke_survives_pipeline() {
        let out = normalize(DynamicImage::ImageLuma8(page_with_block()));
        assert_eq!(out.dimensions(), (40, 40));
        assert_eq!(out.get_pixel(20, 20)[0], 0);
        assert_eq!(out.get_pixel(2, 2)[0], 255);
    }

    #[test]
    fn normalize_is_deterministic() {
        let a = normalize(DynamicImage::ImageLuma8(page_with_block()));
        let b = normalize(DynamicImage::ImageLuma8(page_with_block()));
        assert_eq!(a, b);
    }

    #[test]
    fn output_is_binary_for_binary_input() {
        let out = normalize(DynamicImage::ImageLuma8(page_with_block()));
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn sharpen_saturates() {
        let mut img = solid_gray(3, 3, 100);
        img.put_pixel(1, 1, Luma([200]));
        let out = sharpen(&img);
        // 9·200 − 8·100 = 1000
        assert_eq!(out.get_pixel(1, 1)[0], 255);
        // A flat field is left alone.
        assert_eq!(sharpen(&solid_gray(3, 3, 100)).get_pixel(1, 1)[0], 100);
    }

    #[test]
    fn sharpen_mirrors_edges_without_repeating_them() {
        let img: GrayImage =
            ImageBuffer::from_fn(4, 3, |x, _| if x == 0 { Luma([120u8]) } else { Luma([100u8]) });
        let out = sharpen(&img);
        // Left neighbors mirror to column 1: 9·120 − (2·120 + 6·100) = 240.
        // Replicated edges would give 9·120 − (5·120 + 3·100) = 180.
        assert_eq!(out.get_pixel(0, 1)[0], 240);
        // Column 1 sees 120 on its left and 100 on its right:
        // 9·100 − (3·120 + 5·100) = 40.
        assert_eq!(out.get_pixel(1, 1)[0], 40);
        // Rightmost column mirrors column 2 (100), a flat neighborhood.
        assert_eq!(out.get_pixel(3, 1)[0], 100);
    }

    #[test]
    fn reflect_101_indexing() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(2, 5), 2);
        assert_eq!(reflect_101(-1, 1), 0);
    }

    #[test]
    fn large_image_is_resized() {
        let img = DynamicImage::ImageLuma8(solid_gray(3000, 10, 200));
        let out = downscale(img);
        assert!(out.width() <= MAX_SIDE && out.height() <= MAX_SIDE);
    }

    #[test]
    fn prepare_from_bytes_rejects_garbage() {
        let err = prepare_for_ocr_from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PreprocessError::Decode(_)));
    }

    #[test]
    fn prepare_from_png_bytes() {
        let png = encode_png(&solid_gray(6, 4, 90)).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
        let out = prepare_for_ocr_from_bytes(&png).unwrap();
        assert_eq!(out.dimensions(), (6, 4));
    }
}
