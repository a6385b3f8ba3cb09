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
use crate::dispatch_group_u8::{convolve_horizontal_dispatch_u8, convolve_vertical_dispatch_u8};
use crate::gaussian_kernel::GaussianKernel;
use crate::image_store::{ImageStore, Rgba8ImageStore};
use crate::pic_blur_error::PicBlurError;
use crate::scanline::{copy_to_store, ScanlineSource};
use crate::threading_policy::ThreadingPolicy;
use rayon::ThreadPool;

/// Performs a gaussian blur on an RGBA8 image.
///
/// The kernel is derived from `sigma` and applied as two separable 1D passes,
/// horizontal then vertical. Neighbors outside the frame are omitted and the
/// kernel mass renormalized per position, and alpha weighs each neighbor's
/// color contribution. Always yields a freshly allocated image of the source
/// dimensions.
///
/// # Arguments
///
/// * `image` - Any scanline addressable source, see [ScanlineSource]
/// * `sigma` - Blur spread; zero or negative returns an untouched copy
/// * `threading_policy` - Threading policy according to *ThreadingPolicy*
pub fn gaussian_blur<S: ScanlineSource + Sync>(
    image: &S,
    sigma: f32,
    threading_policy: ThreadingPolicy,
) -> Result<Rgba8ImageStore<'static>, PicBlurError> {
    let size = image.image_size();
    if size.width == 0 || size.height == 0 {
        return Err(PicBlurError::ZeroImageDimensions);
    }
    let pool = threading_policy.get_pool(size);
    gaussian_blur_impl(image, sigma, &pool)
}

pub(crate) fn gaussian_blur_impl<S: ScanlineSource + Sync>(
    image: &S,
    sigma: f32,
    pool: &Option<ThreadPool>,
) -> Result<Rgba8ImageStore<'static>, PicBlurError> {
    if sigma <= 0f32 {
        return copy_to_store(image);
    }
    let size = image.image_size();
    let kernel = GaussianKernel::new(sigma)?;
    let mut intermediate = ImageStore::<u8, 4>::alloc(size.width, size.height)?;
    convolve_horizontal_dispatch_u8(image, &kernel, &mut intermediate, pool);
    let mut destination = ImageStore::<u8, 4>::alloc(size.width, size.height)?;
    convolve_vertical_dispatch_u8(&intermediate, &kernel, &mut destination, pool);
    Ok(destination)
}
