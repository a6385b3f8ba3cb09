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
use crate::image_size::ImageSize;
use crate::image_store::ImageStore;
use crate::pic_blur_error::PicBlurError;

/// Supplies RGBA8 scanlines from an arbitrary drawable image.
///
/// Filters never touch a source image directly, they materialize exactly the
/// row or column a convolution pass needs through this trait. Samples are
/// expected non premultiplied, in R, G, B, A order.
pub trait ScanlineSource {
    fn image_size(&self) -> ImageSize;

    /// Fills `dst` with the `(x1 - x0) x (y1 - y0)` rect read row-major from
    /// the source. `dst` must hold at least `(x1 - x0) * (y1 - y0) * 4`
    /// samples. The rect must lie inside the image bounds.
    fn scan(&self, x0: usize, y0: usize, x1: usize, y1: usize, dst: &mut [u8]);
}

impl ScanlineSource for ImageStore<'_, u8, 4> {
    fn image_size(&self) -> ImageSize {
        self.get_size()
    }

    fn scan(&self, x0: usize, y0: usize, x1: usize, y1: usize, dst: &mut [u8]) {
        let src = self.buffer.borrow();
        let row_len = (x1 - x0) * 4;
        for (y, dst_row) in (y0..y1).zip(dst.chunks_exact_mut(row_len)) {
            let offset = y * self.stride + x0 * 4;
            dst_row.copy_from_slice(&src[offset..offset + row_len]);
        }
    }
}

pub(crate) fn copy_to_store<S: ScanlineSource + ?Sized>(
    image: &S,
) -> Result<ImageStore<'static, u8, 4>, PicBlurError> {
    let size = image.image_size();
    let mut store = ImageStore::<u8, 4>::alloc(size.width, size.height)?;
    image.scan(0, 0, size.width, size.height, store.buffer.borrow_mut());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_sub_rect_from_padded_store() {
        // 3x2 image over stride 16, one padding pixel per row
        let mut data = vec![0u8; 16 * 2];
        for y in 0..2 {
            for x in 0..3 {
                let px = y * 16 + x * 4;
                data[px] = (10 * (y * 3 + x)) as u8;
                data[px + 3] = 255;
            }
        }
        let store = ImageStore::<u8, 4>::from_slice_with_stride(&mut data, 3, 2, 16).unwrap();

        let mut row = vec![0u8; 2 * 4];
        store.scan(1, 1, 3, 2, &mut row);
        assert_eq!(row[0], 40);
        assert_eq!(row[4], 50);
        assert_eq!(row[3], 255);

        let mut column = vec![0u8; 2 * 4];
        store.scan(2, 0, 3, 2, &mut column);
        assert_eq!(column[0], 20);
        assert_eq!(column[4], 50);
    }

    #[test]
    fn copies_whole_frame() {
        let mut data = (0u8..48).collect::<Vec<u8>>();
        let store = ImageStore::<u8, 4>::from_slice(&mut data, 4, 3).unwrap();
        let copied = copy_to_store(&store).unwrap();
        assert_eq!(copied.as_bytes(), store.as_bytes());
        assert_eq!(copied.get_size(), store.get_size());
    }
}
