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
use crate::filter_scanline::{convolve_scanline_rgba, fill_scanline_f32};
use crate::gaussian_kernel::GaussianKernel;
use crate::image_store::ImageStore;
use crate::scanline::ScanlineSource;
use crate::unsafe_slice::UnsafeSlice;
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use rayon::prelude::ParallelSliceMut;
use rayon::ThreadPool;

/// Runs the row pass: every destination row is one work unit, each worker
/// materializes the source row it needs and convolves it in place.
pub(crate) fn convolve_horizontal_dispatch_u8<S: ScanlineSource + Sync>(
    image: &S,
    kernel: &GaussianKernel,
    destination: &mut ImageStore<'_, u8, 4>,
    pool: &Option<ThreadPool>,
) {
    let width = destination.width;
    let dst_stride = destination.stride();
    let dst = destination.buffer.borrow_mut();

    if let Some(pool) = pool {
        pool.install(|| {
            dst.par_chunks_exact_mut(dst_stride)
                .enumerate()
                .for_each_init(
                    || (vec![0u8; width * 4], vec![0f32; width * 4]),
                    |(scanline, scanline_f), (y, dst_row)| {
                        image.scan(0, y, width, y + 1, scanline);
                        fill_scanline_f32(scanline, scanline_f);
                        convolve_scanline_rgba(scanline_f, &mut dst_row[..width * 4], kernel);
                    },
                );
        });
    } else {
        let mut scanline = vec![0u8; width * 4];
        let mut scanline_f = vec![0f32; width * 4];
        for (y, dst_row) in dst.chunks_exact_mut(dst_stride).enumerate() {
            image.scan(0, y, width, y + 1, &mut scanline);
            fill_scanline_f32(&scanline, &mut scanline_f);
            convolve_scanline_rgba(&scanline_f, &mut dst_row[..width * 4], kernel);
        }
    }
}

/// Runs the column pass: every column is one work unit. A worker convolves
/// its column into a transient line and scatters it back through the strided
/// destination.
pub(crate) fn convolve_vertical_dispatch_u8<S: ScanlineSource + Sync>(
    image: &S,
    kernel: &GaussianKernel,
    destination: &mut ImageStore<'_, u8, 4>,
    pool: &Option<ThreadPool>,
) {
    let height = destination.height;
    let width = destination.width;
    let dst_stride = destination.stride();

    if let Some(pool) = pool {
        let dst = UnsafeSlice::new(destination.buffer.borrow_mut());
        pool.install(|| {
            (0..width).into_par_iter().for_each_init(
                || {
                    (
                        vec![0u8; height * 4],
                        vec![0f32; height * 4],
                        vec![0u8; height * 4],
                    )
                },
                |(scanline, scanline_f, column), x| {
                    image.scan(x, 0, x + 1, height, scanline);
                    fill_scanline_f32(scanline, scanline_f);
                    convolve_scanline_rgba(scanline_f, column, kernel);
                    for (y, px) in column.chunks_exact(4).enumerate() {
                        let offset = y * dst_stride + x * 4;
                        for (i, &v) in px.iter().enumerate() {
                            // Safety: columns partition the destination,
                            // no sample index is shared between workers.
                            unsafe { dst.write(offset + i, v) };
                        }
                    }
                },
            );
        });
    } else {
        let mut scanline = vec![0u8; height * 4];
        let mut scanline_f = vec![0f32; height * 4];
        let mut column = vec![0u8; height * 4];
        let dst = destination.buffer.borrow_mut();
        for x in 0..width {
            image.scan(x, 0, x + 1, height, &mut scanline);
            fill_scanline_f32(&scanline, &mut scanline_f);
            convolve_scanline_rgba(&scanline_f, &mut column, kernel);
            for (y, px) in column.chunks_exact(4).enumerate() {
                let offset = y * dst_stride + x * 4;
                dst[offset..offset + 4].copy_from_slice(px);
            }
        }
    }
}
