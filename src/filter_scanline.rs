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
use crate::gaussian_kernel::GaussianKernel;
use crate::to_storage::ToStorage;

#[inline(always)]
pub(crate) fn fill_scanline_f32(scanline: &[u8], scanline_f: &mut [f32]) {
    for (dst, &src) in scanline_f.iter_mut().zip(scanline.iter()) {
        *dst = src as f32;
    }
}

/// Convolves one materialized RGBA scanline with a one sided gaussian table.
///
/// Neighbors falling outside the line are omitted, never replicated or
/// mirrored; the weight sum of the retained taps renormalizes the result
/// instead. Alpha acts as a blending weight so that fully transparent
/// neighbors cannot bleed their color into the output, and output alpha is
/// rescaled by the retained kernel mass so edge positions do not fade merely
/// from having fewer neighbors.
pub(crate) fn convolve_scanline_rgba(
    scanline_f: &[f32],
    dst: &mut [u8],
    kernel: &GaussianKernel,
) {
    let radius = kernel.radius();
    let weights = kernel.weights.as_slice();
    let len = scanline_f.len() / 4;
    let last = len - 1;

    for (p, dst_px) in dst[..len * 4].chunks_exact_mut(4).enumerate() {
        let start = p.saturating_sub(radius);
        let end = (p + radius).min(last);

        let mut r = 0f32;
        let mut g = 0f32;
        let mut b = 0f32;
        let mut a_sum = 0f32;

        let wsum = if end - start == 2 * radius {
            // Interior: every tap is retained, the precomputed window sum
            // stands in for the per-tap accumulation.
            for (i, src_px) in scanline_f[start * 4..=end * 4 + 3]
                .chunks_exact(4)
                .enumerate()
            {
                let weight = weights[p.abs_diff(start + i)];
                let wa = src_px[3] * weight;
                r += src_px[0] * wa;
                g += src_px[1] * wa;
                b += src_px[2] * wa;
                a_sum += wa;
            }
            kernel.full_window_sum
        } else {
            let mut wsum = 0f32;
            for (i, src_px) in scanline_f[start * 4..=end * 4 + 3]
                .chunks_exact(4)
                .enumerate()
            {
                let weight = weights[p.abs_diff(start + i)];
                wsum += weight;
                let wa = src_px[3] * weight;
                r += src_px[0] * wa;
                g += src_px[1] * wa;
                b += src_px[2] * wa;
                a_sum += wa;
            }
            wsum
        };

        if a_sum != 0f32 {
            r /= a_sum;
            g /= a_sum;
            b /= a_sum;
        }

        dst_px[0] = r.to_storage();
        dst_px[1] = g.to_storage();
        dst_px[2] = b.to_storage();
        dst_px[3] = (a_sum / wsum).to_storage();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convolve(line: &[u8], sigma: f32) -> Vec<u8> {
        let kernel = GaussianKernel::new(sigma).unwrap();
        let mut line_f = vec![0f32; line.len()];
        fill_scanline_f32(line, &mut line_f);
        let mut dst = vec![0u8; line.len()];
        convolve_scanline_rgba(&line_f, &mut dst, &kernel);
        dst
    }

    #[test]
    fn flat_opaque_line_is_a_fixed_point() {
        let line: Vec<u8> = [120u8, 30, 200, 255].repeat(9);
        // sigma 1.0 keeps full windows inside the line, 1.4 truncates at
        // every position.
        for sigma in [1f32, 1.4f32] {
            let dst = convolve(&line, sigma);
            assert_eq!(dst, line, "sigma {sigma}");
        }
    }

    #[test]
    fn transparent_neighbors_do_not_bleed_color() {
        // An opaque white pixel surrounded by transparent black must stay
        // pure white wherever any alpha survives.
        let mut line = vec![0u8; 9 * 4];
        line[4 * 4] = 255;
        line[4 * 4 + 1] = 255;
        line[4 * 4 + 2] = 255;
        line[4 * 4 + 3] = 255;
        let dst = convolve(&line, 1f32);
        for px in dst.chunks_exact(4) {
            if px[3] != 0 {
                assert_eq!(&px[..3], &[255, 255, 255]);
            } else {
                assert_eq!(&px[..3], &[0, 0, 0]);
            }
        }
        // Alpha decays with distance from the lit pixel.
        let alphas: Vec<u8> = dst.chunks_exact(4).map(|px| px[3]).collect();
        assert!(alphas[4] > alphas[3]);
        assert!(alphas[3] > alphas[2]);
        assert!(alphas[2] > alphas[1]);
        assert_eq!(alphas[0], 0);
        assert_eq!(alphas[4], 102);
    }

    #[test]
    fn fully_transparent_line_stays_transparent() {
        let line = vec![0u8; 6 * 4];
        let dst = convolve(&line, 2f32);
        assert!(dst.iter().all(|&v| v == 0));
    }

    #[test]
    fn single_pixel_line_is_untouched() {
        let line = vec![9u8, 18, 27, 200];
        let dst = convolve(&line, 3f32);
        assert_eq!(dst, line);
    }

    #[test]
    fn edge_omission_renormalizes_alpha() {
        // A fully opaque line keeps alpha at 255 even at the truncated ends.
        let line: Vec<u8> = [0u8, 0, 0, 255].repeat(5);
        let dst = convolve(&line, 1f32);
        for px in dst.chunks_exact(4) {
            assert_eq!(px[3], 255);
        }
    }
}
