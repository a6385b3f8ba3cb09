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
use crate::pic_blur_error::{try_vec, PicBlurBufferMismatch, PicBlurError};
use num_traits::FromPrimitive;
use std::fmt::Debug;

/// Image holder with pixel store in `T` and `N` interleaved channels.
///
/// Rows are laid out with a fixed `stride`, in samples, that is at least
/// `width * N`. Both the layout and the dimensions are sealed at construction.
#[derive(Debug)]
pub struct ImageStore<'a, T, const N: usize>
where
    T: FromPrimitive + Clone + Copy + Debug,
{
    pub(crate) buffer: BufferStore<'a, T>,
    pub channels: usize,
    pub width: usize,
    pub height: usize,
    pub(crate) stride: usize,
}

/// RGBA8, non premultiplied, channel order R, G, B, A
pub type Rgba8ImageStore<'a> = ImageStore<'a, u8, 4>;

#[derive(Debug)]
pub enum BufferStore<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStore<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn borrow_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

impl<T, const N: usize> ImageStore<'static, T, N>
where
    T: FromPrimitive + Clone + Copy + Debug + Default,
{
    pub fn new(
        buffer: Vec<T>,
        width: usize,
        height: usize,
    ) -> Result<ImageStore<'static, T, N>, PicBlurError> {
        let expected = check_image_size(width, height, N)?;
        if buffer.len() != expected {
            return Err(PicBlurError::BufferMismatch(PicBlurBufferMismatch {
                expected,
                width,
                height,
                channels: N,
                slice_len: buffer.len(),
            }));
        }
        Ok(ImageStore::<T, N> {
            buffer: BufferStore::Owned(buffer),
            channels: N,
            width,
            height,
            stride: width * N,
        })
    }

    pub fn alloc(width: usize, height: usize) -> Result<ImageStore<'static, T, N>, PicBlurError> {
        let expected = check_image_size(width, height, N)?;
        let vc = try_vec![T::from_u32(0).unwrap_or_default(); expected];
        Ok(ImageStore::<T, N> {
            buffer: BufferStore::Owned(vc),
            channels: N,
            width,
            height,
            stride: width * N,
        })
    }
}

impl<'a, T, const N: usize> ImageStore<'a, T, N>
where
    T: FromPrimitive + Clone + Copy + Debug,
{
    pub fn from_slice(
        slice_ref: &'a mut [T],
        width: usize,
        height: usize,
    ) -> Result<ImageStore<'a, T, N>, PicBlurError> {
        Self::from_slice_with_stride(slice_ref, width, height, width * N)
    }

    /// Wraps a caller owned buffer whose rows may carry trailing padding.
    pub fn from_slice_with_stride(
        slice_ref: &'a mut [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<ImageStore<'a, T, N>, PicBlurError> {
        check_image_size(width, height, N)?;
        if stride < width * N {
            return Err(PicBlurError::InvalidStride(width * N, stride));
        }
        let expected = stride
            .checked_mul(height)
            .ok_or(PicBlurError::SourceImageIsTooLarge)?;
        if slice_ref.len() != expected {
            return Err(PicBlurError::BufferMismatch(PicBlurBufferMismatch {
                expected,
                width,
                height,
                channels: N,
                slice_len: slice_ref.len(),
            }));
        }
        Ok(ImageStore::<T, N> {
            buffer: BufferStore::Borrowed(slice_ref),
            channels: N,
            width,
            height,
            stride,
        })
    }

    pub fn get_size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// Row length in samples, `width * N` unless the store was built over a
    /// padded buffer.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_bytes(&self) -> &[T] {
        self.buffer.borrow()
    }
}

fn check_image_size(width: usize, height: usize, channels: usize) -> Result<usize, PicBlurError> {
    if width == 0 || height == 0 {
        return Err(PicBlurError::ZeroImageDimensions);
    }
    width
        .checked_mul(height)
        .and_then(|size| size.checked_mul(channels))
        .ok_or(PicBlurError::SourceImageIsTooLarge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_store_checks_buffer_length() {
        let store = ImageStore::<u8, 4>::new(vec![0u8; 4 * 3 * 4], 4, 3).unwrap();
        assert_eq!(store.stride(), 16);
        assert_eq!(store.get_size(), ImageSize::new(4, 3));

        let too_short = ImageStore::<u8, 4>::new(vec![0u8; 10], 4, 3);
        match too_short {
            Err(PicBlurError::BufferMismatch(mismatch)) => {
                assert_eq!(mismatch.expected, 48);
                assert_eq!(mismatch.slice_len, 10);
            }
            _ => panic!("expected buffer mismatch"),
        }
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            ImageStore::<u8, 4>::alloc(0, 2),
            Err(PicBlurError::ZeroImageDimensions)
        ));
        assert!(matches!(
            ImageStore::<u8, 4>::alloc(2, 0),
            Err(PicBlurError::ZeroImageDimensions)
        ));
    }

    #[test]
    fn stride_must_cover_row() {
        let mut data = vec![0u8; 10 * 2];
        assert!(matches!(
            ImageStore::<u8, 4>::from_slice_with_stride(&mut data, 3, 2, 10),
            Err(PicBlurError::InvalidStride(12, 10))
        ));
    }

    #[test]
    fn padded_stride_is_accepted() {
        let mut data = vec![0u8; 16 * 2];
        let store = ImageStore::<u8, 4>::from_slice_with_stride(&mut data, 3, 2, 16).unwrap();
        assert_eq!(store.stride(), 16);
        assert_eq!(store.width, 3);
    }
}
