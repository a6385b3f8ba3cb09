/*
 * Copyright (c) Radzivon Bartoshyk. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::gaussian_blur::gaussian_blur_impl;
use crate::image_store::{ImageStore, Rgba8ImageStore};
use crate::pic_blur_error::PicBlurError;
use crate::scanline::{copy_to_store, ScanlineSource};
use crate::threading_policy::ThreadingPolicy;
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::prelude::{ParallelSlice, ParallelSliceMut};
use rayon::ThreadPool;

/// Performs an unsharp mask on an RGBA8 image.
///
/// The low frequencies are estimated with [crate::gaussian_blur] at the given
/// `sigma` and subtracted from the doubled source, which amplifies the detail
/// the blur removed. Every channel is masked independently, alpha included.
/// Always yields a freshly allocated image of the source dimensions.
///
/// # Arguments
///
/// * `image` - Any scanline addressable source, see [ScanlineSource]
/// * `sigma` - Spread of the underlying blur; zero or negative returns an
///   untouched copy
/// * `threading_policy` - Threading policy according to *ThreadingPolicy*
pub fn sharpen<S: ScanlineSource + Sync>(
    image: &S,
    sigma: f32,
    threading_policy: ThreadingPolicy,
) -> Result<Rgba8ImageStore<'static>, PicBlurError> {
    let size = image.image_size();
    if size.width == 0 || size.height == 0 {
        return Err(PicBlurError::ZeroImageDimensions);
    }
    if sigma <= 0f32 {
        return copy_to_store(image);
    }
    let pool = threading_policy.get_pool(size);
    let blurred = gaussian_blur_impl(image, sigma, &pool)?;
    let mut destination = ImageStore::<u8, 4>::alloc(size.width, size.height)?;
    unsharp_mask_dispatch_u8(image, &blurred, &mut destination, &pool);
    Ok(destination)
}

/// Runs the combine step row by row: every destination row is one work unit
/// pairing the source scanline with the matching blurred row.
fn unsharp_mask_dispatch_u8<S: ScanlineSource + Sync>(
    image: &S,
    blurred: &ImageStore<'_, u8, 4>,
    destination: &mut ImageStore<'_, u8, 4>,
    pool: &Option<ThreadPool>,
) {
    let width = destination.width;
    let dst_stride = destination.stride();
    let blurred_stride = blurred.stride();
    let blurred_rows = blurred.as_bytes();
    let dst = destination.buffer.borrow_mut();

    if let Some(pool) = pool {
        pool.install(|| {
            dst.par_chunks_exact_mut(dst_stride)
                .zip(blurred_rows.par_chunks_exact(blurred_stride))
                .enumerate()
                .for_each_init(
                    || vec![0u8; width * 4],
                    |scanline, (y, (dst_row, blurred_row))| {
                        image.scan(0, y, width, y + 1, scanline);
                        unsharp_mask_row(scanline, blurred_row, &mut dst_row[..width * 4]);
                    },
                );
        });
    } else {
        let mut scanline = vec![0u8; width * 4];
        for (y, (dst_row, blurred_row)) in dst
            .chunks_exact_mut(dst_stride)
            .zip(blurred_rows.chunks_exact(blurred_stride))
            .enumerate()
        {
            image.scan(0, y, width, y + 1, &mut scanline);
            unsharp_mask_row(&scanline, blurred_row, &mut dst_row[..width * 4]);
        }
    }
}

#[inline(always)]
fn unsharp_mask_row(scanline: &[u8], blurred_row: &[u8], dst_row: &mut [u8]) {
    for ((dst, &orig), &low) in dst_row
        .iter_mut()
        .zip(scanline.iter())
        .zip(blurred_row.iter())
    {
        let val = (i32::from(orig) << 1) - i32::from(low);
        *dst = val.clamp(0, 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaussian_blur::gaussian_blur;

    fn store_of(data: &[u8], width: usize, height: usize) -> Rgba8ImageStore<'static> {
        ImageStore::<u8, 4>::new(data.to_vec(), width, height).unwrap()
    }

    #[test]
    fn non_positive_sigma_is_identity() {
        let data: Vec<u8> = (0u8..48).collect();
        let store = store_of(&data, 4, 3);
        for sigma in [0f32, -0.5f32] {
            let sharpened = sharpen(&store, sigma, ThreadingPolicy::Single).unwrap();
            assert_eq!(sharpened.as_bytes(), store.as_bytes());
        }
    }

    #[test]
    fn flat_color_is_a_fixed_point_and_idempotent() {
        let data: Vec<u8> = [64u8, 180, 33, 255].repeat(6 * 4);
        let store = store_of(&data, 6, 4);
        let once = sharpen(&store, 1.3f32, ThreadingPolicy::Single).unwrap();
        assert_eq!(once.as_bytes(), store.as_bytes());
        let twice = sharpen(&once, 1.3f32, ThreadingPolicy::Single).unwrap();
        assert_eq!(twice.as_bytes(), store.as_bytes());
    }

    #[test]
    fn matches_doubled_source_minus_blur() {
        let mut data = vec![0u8; 8 * 7 * 4];
        for (i, v) in data.iter_mut().enumerate() {
            *v = ((i * 29 + 101) % 256) as u8;
        }
        let store = store_of(&data, 8, 7);
        let sigma = 1.1f32;

        let sharpened = sharpen(&store, sigma, ThreadingPolicy::Single).unwrap();
        let blurred = gaussian_blur(&store, sigma, ThreadingPolicy::Single).unwrap();

        for ((&out, &orig), &low) in sharpened
            .as_bytes()
            .iter()
            .zip(store.as_bytes().iter())
            .zip(blurred.as_bytes().iter())
        {
            let expected = (i32::from(orig) * 2 - i32::from(low)).clamp(0, 255) as u8;
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn amplifies_an_edge() {
        // A vertical step edge: sharpening must overshoot on both sides.
        let mut data = Vec::new();
        for _ in 0..5 {
            for x in 0..8 {
                let v = if x < 4 { 60u8 } else { 190u8 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let store = store_of(&data, 8, 5);
        let sharpened = sharpen(&store, 1f32, ThreadingPolicy::Single).unwrap();
        let row = &sharpened.as_bytes()[..8 * 4];
        // Dark side of the edge dips below 60, bright side rises above 190.
        assert!(row[3 * 4] < 60);
        assert!(row[4 * 4] > 190);
        // Alpha is processed like every other channel and stays saturated.
        assert!(row.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn output_dimensions_match_source() {
        let store = store_of(&vec![128u8; 3 * 9 * 4], 3, 9);
        let sharpened = sharpen(&store, 2.7f32, ThreadingPolicy::Single).unwrap();
        assert_eq!(sharpened.width, 3);
        assert_eq!(sharpened.height, 9);
    }

    #[test]
    fn threaded_run_matches_single_threaded() {
        let mut data = vec![0u8; 19 * 11 * 4];
        for (i, v) in data.iter_mut().enumerate() {
            *v = ((i * 57 + 7) % 256) as u8;
        }
        let store = store_of(&data, 19, 11);
        let single = sharpen(&store, 1.6f32, ThreadingPolicy::Single).unwrap();
        let threaded = sharpen(&store, 1.6f32, ThreadingPolicy::Fixed(3)).unwrap();
        assert_eq!(single.as_bytes(), threaded.as_bytes());
    }
}
