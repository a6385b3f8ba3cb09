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
use num_traits::{AsPrimitive, Bounded};

/// Narrows an accumulator back into the pixel storage type, rounding half up
/// and saturating at the storage bounds.
pub(crate) trait ToStorage<T> {
    fn to_storage(self) -> T;
}

impl<T: Copy + 'static + Bounded + AsPrimitive<f32>> ToStorage<T> for f32
where
    f32: AsPrimitive<T>,
{
    #[inline(always)]
    fn to_storage(self) -> T {
        (self + 0.5f32).max(0f32).min(T::max_value().as_()).as_()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_and_saturates() {
        let narrowed: u8 = 13.49f32.to_storage();
        assert_eq!(narrowed, 13);
        let narrowed: u8 = 13.5f32.to_storage();
        assert_eq!(narrowed, 14);
        let narrowed: u8 = (-4.2f32).to_storage();
        assert_eq!(narrowed, 0);
        let narrowed: u8 = 300f32.to_storage();
        assert_eq!(narrowed, 255);
        let narrowed: u8 = 255f32.to_storage();
        assert_eq!(narrowed, 255);
    }
}
