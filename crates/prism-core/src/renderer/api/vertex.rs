// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The vertex-format bitmask and the concrete vertex layouts built from it.
//!
//! A vertex format is a set of attribute flags; attribute data is interleaved
//! in a fixed canonical order (position, diffuse, texcoord0, texcoord1,
//! normal), so byte offsets and the total stride derive from the mask alone.

use crate::prism_bitflags;
use crate::renderer::api::pipeline::VertexFormat;
use bytemuck::{Pod, Zeroable};

prism_bitflags! {
    /// A bitmask describing which attributes a vertex layout contains.
    ///
    /// The empty mask is not a valid vertex format; it marks an
    /// invalid/unregistered pipeline.
    pub struct VertexAttributes: u32 {
        /// Object-space position (`vs_position`).
        const POSITION = 1 << 0;
        /// Diffuse vertex color (`vs_color`).
        const DIFFUSE = 1 << 1;
        /// First texture coordinate set (`vs_texcoord0`).
        const TEX1 = 1 << 2;
        /// Second texture coordinate set (`vs_texcoord1`).
        const TEX2 = 1 << 3;
        /// Vertex normal (`vs_normal`).
        const NORMAL = 1 << 4;
    }
}

/// Number of bits a vertex-format mask occupies inside a pipeline identifier.
pub const VERTEX_ATTRIBUTES_BITS: u32 = 5;

/// The canonical interleaving order of vertex attributes.
pub const VERTEX_ATTRIBUTE_ORDER: [VertexAttributes; 5] = [
    VertexAttributes::POSITION,
    VertexAttributes::DIFFUSE,
    VertexAttributes::TEX1,
    VertexAttributes::TEX2,
    VertexAttributes::NORMAL,
];

impl VertexAttributes {
    /// Returns the shader attribute name for a single-flag mask.
    pub fn shader_name(self) -> Option<&'static str> {
        if self == VertexAttributes::POSITION {
            Some("vs_position")
        } else if self == VertexAttributes::DIFFUSE {
            Some("vs_color")
        } else if self == VertexAttributes::TEX1 {
            Some("vs_texcoord0")
        } else if self == VertexAttributes::TEX2 {
            Some("vs_texcoord1")
        } else if self == VertexAttributes::NORMAL {
            Some("vs_normal")
        } else {
            None
        }
    }

    /// Returns the wire format of a single-flag mask.
    pub fn wire_format(self) -> Option<VertexFormat> {
        if self == VertexAttributes::POSITION || self == VertexAttributes::NORMAL {
            Some(VertexFormat::Float32x3)
        } else if self == VertexAttributes::DIFFUSE {
            Some(VertexFormat::Unorm8x4)
        } else if self == VertexAttributes::TEX1 || self == VertexAttributes::TEX2 {
            Some(VertexFormat::Float32x2)
        } else {
            None
        }
    }

    /// Returns the byte size of one interleaved vertex with this format.
    ///
    /// Zero for the empty mask, which no registered pipeline carries.
    pub fn stride(self) -> u64 {
        VERTEX_ATTRIBUTE_ORDER
            .iter()
            .filter(|attr| self.contains(**attr))
            .filter_map(|attr| attr.wire_format())
            .map(|format| format.size())
            .sum()
    }

    /// Returns the byte offset of `attr` within this interleaved layout, or
    /// `None` if `attr` is not part of the format.
    pub fn offset_of(self, attr: VertexAttributes) -> Option<u64> {
        if !self.contains(attr) {
            return None;
        }
        let mut offset = 0;
        for candidate in VERTEX_ATTRIBUTE_ORDER {
            if candidate == attr {
                return Some(offset);
            }
            if self.contains(candidate) {
                offset += candidate.wire_format().map_or(0, |f| f.size());
            }
        }
        None
    }
}

/// An RGBA color packed as four 8-bit channels.
pub type DiffuseColor = [u8; 4];

/// Position + diffuse color vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexXyzd {
    /// Object-space position.
    pub position: [f32; 3],
    /// Diffuse vertex color.
    pub diffuse: DiffuseColor,
}

impl VertexXyzd {
    /// The format mask of this vertex layout.
    pub const FORMAT: VertexAttributes =
        VertexAttributes::POSITION.with(VertexAttributes::DIFFUSE);
}

/// Position + diffuse color + one texture coordinate set.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexXyzdt1 {
    /// Object-space position.
    pub position: [f32; 3],
    /// Diffuse vertex color.
    pub diffuse: DiffuseColor,
    /// First texture coordinate set.
    pub uv0: [f32; 2],
}

impl VertexXyzdt1 {
    /// The format mask of this vertex layout.
    pub const FORMAT: VertexAttributes = VertexAttributes::POSITION
        .with(VertexAttributes::DIFFUSE)
        .with(VertexAttributes::TEX1);
}

/// Position + diffuse color + two texture coordinate sets.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexXyzdt2 {
    /// Object-space position.
    pub position: [f32; 3],
    /// Diffuse vertex color.
    pub diffuse: DiffuseColor,
    /// First texture coordinate set.
    pub uv0: [f32; 2],
    /// Second texture coordinate set.
    pub uv1: [f32; 2],
}

impl VertexXyzdt2 {
    /// The format mask of this vertex layout.
    pub const FORMAT: VertexAttributes = VertexAttributes::POSITION
        .with(VertexAttributes::DIFFUSE)
        .with(VertexAttributes::TEX1)
        .with(VertexAttributes::TEX2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn stride_matches_struct_sizes() {
        assert_eq!(VertexXyzd::FORMAT.stride() as usize, size_of::<VertexXyzd>());
        assert_eq!(
            VertexXyzdt1::FORMAT.stride() as usize,
            size_of::<VertexXyzdt1>()
        );
        assert_eq!(
            VertexXyzdt2::FORMAT.stride() as usize,
            size_of::<VertexXyzdt2>()
        );
    }

    #[test]
    fn empty_mask_has_zero_stride() {
        assert_eq!(VertexAttributes::EMPTY.stride(), 0);
    }

    #[test]
    fn offsets_follow_canonical_order() {
        let fmt = VertexXyzdt2::FORMAT;
        assert_eq!(fmt.offset_of(VertexAttributes::POSITION), Some(0));
        assert_eq!(fmt.offset_of(VertexAttributes::DIFFUSE), Some(12));
        assert_eq!(fmt.offset_of(VertexAttributes::TEX1), Some(16));
        assert_eq!(fmt.offset_of(VertexAttributes::TEX2), Some(24));
        assert_eq!(fmt.offset_of(VertexAttributes::NORMAL), None);
    }

    #[test]
    fn offsets_skip_absent_attributes() {
        // Without a diffuse color the first texture set moves up.
        let fmt = VertexAttributes::POSITION.with(VertexAttributes::TEX1);
        assert_eq!(fmt.offset_of(VertexAttributes::TEX1), Some(12));
    }

    #[test]
    fn shader_names_are_single_flag_only() {
        assert_eq!(
            VertexAttributes::POSITION.shader_name(),
            Some("vs_position")
        );
        assert_eq!(VertexXyzd::FORMAT.shader_name(), None);
    }

    #[test]
    fn masks_fit_the_id_field() {
        for attr in VERTEX_ATTRIBUTE_ORDER {
            assert!(attr.bits() < (1 << VERTEX_ATTRIBUTES_BITS));
        }
    }
}
