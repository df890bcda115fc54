//! Flat byte layout of `QuantizedSubgrids`, for caching built leaves.
//!
//! Record layout, native byte order, no padding:
//! N subgrid ids (u16 x, u16 y, u32 primitive id), u32 geometry id,
//! 3 x f32 start, 3 x f32 scale, 6N plane bytes.

use bytemuck::Pod;
use thiserror::Error;

use super::quantized::{QuantizedSubgrids, SubgridId};
use crate::geometry::{Axis, FloatType, WorldPoint, WorldVector};

#[derive(Debug, Error, PartialEq)]
pub enum CacheLayoutError {
    #[error("record needs {expected} bytes, only {actual} available")]
    Truncated { expected: usize, actual: usize },

    #[error("scale {scale} along {axis:?} is not a finite non-negative number")]
    InvalidScale { axis: Axis, scale: FloatType },
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> &'a [u8] {
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        head
    }

    fn read<T: Pod>(&mut self) -> T {
        bytemuck::pod_read_unaligned(self.take(size_of::<T>()))
    }

    fn read_xyz(&mut self) -> [FloatType; 3] {
        std::array::from_fn(|_| self.read())
    }
}

impl<const N: usize> QuantizedSubgrids<N> {
    pub const ENCODED_SIZE: usize =
        N * size_of::<SubgridId>() + size_of::<u32>() + 2 * 3 * size_of::<FloatType>() + 6 * N;

    /// Appends `ENCODED_SIZE` bytes to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(Self::ENCODED_SIZE);
        out.extend_from_slice(bytemuck::cast_slice(&self.subgrids));
        out.extend_from_slice(bytemuck::bytes_of(&self.geometry_id));
        out.extend_from_slice(bytemuck::cast_slice(self.start.coords.as_slice()));
        out.extend_from_slice(bytemuck::cast_slice(self.scale.as_slice()));
        out.extend_from_slice(self.all_planes());
    }

    /// Reads one record from the front of `bytes`, returns it together with the remaining bytes.
    pub fn read_from(bytes: &[u8]) -> Result<(Self, &[u8]), CacheLayoutError> {
        if bytes.len() < Self::ENCODED_SIZE {
            return Err(CacheLayoutError::Truncated {
                expected: Self::ENCODED_SIZE,
                actual: bytes.len(),
            });
        }
        let (record, rest) = bytes.split_at(Self::ENCODED_SIZE);
        let mut reader = Reader { bytes: record };

        let subgrids = std::array::from_fn(|_| reader.read::<SubgridId>());
        let geometry_id = reader.read::<u32>();
        let start = WorldPoint::from(reader.read_xyz());
        let scale = WorldVector::from(reader.read_xyz());

        let mut planes = [[0u8; N]; 6];
        for plane in &mut planes {
            plane.copy_from_slice(reader.take(N));
        }

        for axis in Axis::ALL {
            let s = scale[axis.index()];
            if !s.is_finite() || s < 0.0 {
                return Err(CacheLayoutError::InvalidScale { axis, scale: s });
            }
        }

        Ok((
            QuantizedSubgrids {
                subgrids,
                geometry_id,
                start,
                scale,
                planes,
            },
            rest,
        ))
    }
}
