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
use crate::pic_blur_error::{try_vec, PicBlurError};

/// One sided gaussian weight table.
///
/// `weights[d]` is the weight at absolute distance `d` from the filter center,
/// `weights[0]` being the peak. The table is truncated at `radius = ceil(3σ)`
/// and is intentionally left unnormalized: each convolved position divides by
/// the sum of the weights it actually retained, so edge truncation and alpha
/// weighting renormalize themselves.
#[derive(Debug, Clone)]
pub(crate) struct GaussianKernel {
    pub weights: Vec<f32>,
    pub full_window_sum: f32,
}

impl GaussianKernel {
    pub(crate) fn new(sigma: f32) -> Result<GaussianKernel, PicBlurError> {
        let radius = (3f32 * sigma).ceil() as usize;
        let mut weights: Vec<f32> = try_vec![0f32; radius + 1];
        for (x, weight) in weights.iter_mut().enumerate() {
            *weight = gaussian_density(x as f32, sigma);
        }
        let full_window_sum = weights[0] + 2f32 * weights[1..].iter().sum::<f32>();
        Ok(GaussianKernel {
            weights,
            full_window_sum,
        })
    }

    pub(crate) fn radius(&self) -> usize {
        self.weights.len() - 1
    }
}

#[inline(always)]
fn gaussian_density(x: f32, sigma: f32) -> f32 {
    (-(x * x) / (2f32 * sigma * sigma)).exp() / (sigma * (2f32 * std::f32::consts::PI).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_truncated_at_three_sigma() {
        let kernel = GaussianKernel::new(1f32).unwrap();
        assert_eq!(kernel.radius(), 3);
        assert_eq!(kernel.weights.len(), 4);

        let kernel = GaussianKernel::new(2.5f32).unwrap();
        assert_eq!(kernel.radius(), 8);
    }

    #[test]
    fn peak_sits_at_zero_distance() {
        let kernel = GaussianKernel::new(1f32).unwrap();
        assert!((kernel.weights[0] - 0.3989423f32).abs() < 1e-6);
        for window in kernel.weights.windows(2) {
            assert!(window[0] >= window[1]);
            assert!(window[1] > 0f32);
        }
    }

    #[test]
    fn table_is_not_normalized_at_build_time() {
        // Truncation at 3 sigma keeps the window sum strictly below one,
        // a pre-normalized table would sum to exactly one.
        let kernel = GaussianKernel::new(1.7f32).unwrap();
        assert!(kernel.full_window_sum < 1f32);
        assert!(kernel.full_window_sum > 0.99f32);

        let by_hand = kernel.weights[0] + 2f32 * kernel.weights[1..].iter().sum::<f32>();
        assert_eq!(kernel.full_window_sum, by_hand);
    }
}
