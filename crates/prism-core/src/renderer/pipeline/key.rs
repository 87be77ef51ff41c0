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

//! Pipeline identifiers: (topology, vertex format, mode) packed into one
//! integer.
//!
//! An identifier doubles as the index into the registry's dense array, so
//! composing and decomposing must be an exact bijection over in-range
//! triples.

use crate::renderer::api::pipeline::PrimitiveTopology;
use crate::renderer::api::vertex::VertexAttributes;
use crate::renderer::pipeline::mode::PipelineMode;

/// The primitive grouping a pipeline draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PipelineType {
    /// Isolated triangles.
    #[default]
    Triangles = 0,
    /// A connected triangle strip.
    TriangleStrip = 1,
}

impl PipelineType {
    const MASK: u32 = 0b11;

    /// Decodes a 2-bit field. Patterns 2 and 3 are unassigned.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits & Self::MASK {
            0 => Some(PipelineType::Triangles),
            1 => Some(PipelineType::TriangleStrip),
            _ => None,
        }
    }

    /// Returns the primitive topology this type draws with.
    pub const fn topology(self) -> PrimitiveTopology {
        match self {
            PipelineType::Triangles => PrimitiveTopology::TriangleList,
            PipelineType::TriangleStrip => PrimitiveTopology::TriangleStrip,
        }
    }
}

const TYPE_SHIFT: u32 = 0;
const TYPE_MASK: u32 = 0b11;
const FMT_SHIFT: u32 = 2;
const FMT_MASK: u32 = 0b1_1111;
const MODE_SHIFT: u32 = 7;
const MODE_MASK: u32 = 0xFF;

/// A packed pipeline identifier.
///
/// Bits 0-1 hold the [`PipelineType`], bits 2-6 the [`VertexAttributes`]
/// mask, bits 7-14 the [`PipelineMode`] value. The fields never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineId(pub u32);

impl PipelineId {
    /// Packs a (topology, vertex format, mode) triple into an identifier.
    pub const fn compose(
        pipeline_type: PipelineType,
        format: VertexAttributes,
        mode: PipelineMode,
    ) -> Self {
        PipelineId(
            (pipeline_type as u32 & TYPE_MASK) << TYPE_SHIFT
                | (format.bits() & FMT_MASK) << FMT_SHIFT
                | (mode.to_value() as u32 & MODE_MASK) << MODE_SHIFT,
        )
    }

    /// Unpacks this identifier back into its triple.
    ///
    /// Returns `None` when the type or mode field holds an unassigned
    /// pattern; such identifiers can never have been produced by
    /// [`PipelineId::compose`].
    pub const fn decompose(self) -> Option<(PipelineType, VertexAttributes, PipelineMode)> {
        let pipeline_type = match PipelineType::from_bits(self.0 >> TYPE_SHIFT) {
            Some(ty) => ty,
            None => return None,
        };
        let format = VertexAttributes::from_bits_truncate((self.0 >> FMT_SHIFT) & FMT_MASK);
        let mode = match PipelineMode::from_value(((self.0 >> MODE_SHIFT) & MODE_MASK) as u16) {
            Some(mode) => mode,
            None => return None,
        };
        Some((pipeline_type, format, mode))
    }

    /// Returns the identifier as a dense array index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::pipeline::mode::{
        BlendMode, CullFace, DepthCompare, PIPELINE_MODE_VALUE_MAX,
    };

    #[test]
    fn compose_decompose_is_a_bijection() {
        let formats = [
            VertexAttributes::POSITION,
            VertexAttributes::POSITION.with(VertexAttributes::DIFFUSE),
            VertexAttributes::POSITION
                .with(VertexAttributes::DIFFUSE)
                .with(VertexAttributes::TEX1)
                .with(VertexAttributes::TEX2),
        ];
        for ty in [PipelineType::Triangles, PipelineType::TriangleStrip] {
            for format in formats {
                for value in 0..PIPELINE_MODE_VALUE_MAX {
                    let Some(mode) = PipelineMode::from_value(value) else {
                        continue;
                    };
                    let id = PipelineId::compose(ty, format, mode);
                    assert_eq!(id.decompose(), Some((ty, format, mode)));
                }
            }
        }
    }

    #[test]
    fn worked_example_round_trips() {
        let format = VertexAttributes::POSITION
            .with(VertexAttributes::DIFFUSE)
            .with(VertexAttributes::TEX1);
        let mode = PipelineMode {
            blend: BlendMode::AlphaBlend,
            depth_write: true,
            depth_cmp: DepthCompare::LessEqual,
            cull: CullFace::Ccw,
        };
        let id = PipelineId::compose(PipelineType::Triangles, format, mode);
        assert_eq!(id.decompose(), Some((PipelineType::Triangles, format, mode)));
    }

    #[test]
    fn fields_never_overlap() {
        let all_type = PipelineId::compose(
            PipelineType::TriangleStrip,
            VertexAttributes::EMPTY,
            PipelineMode::default(),
        );
        assert_eq!(all_type.0, 0b01);

        let all_fmt = PipelineId::compose(
            PipelineType::Triangles,
            VertexAttributes::from_bits_truncate(0b1_1111),
            PipelineMode::default(),
        );
        assert_eq!(all_fmt.0, 0b111_1100);
    }

    #[test]
    fn unassigned_type_bits_decompose_to_none() {
        assert_eq!(PipelineId(0b10).decompose(), None);
        assert_eq!(PipelineId(0b11).decompose(), None);
    }

    #[test]
    fn unassigned_mode_bits_decompose_to_none() {
        // Blend field all-ones inside the mode bits.
        let id = PipelineId(0b111 << 7);
        assert_eq!(id.decompose(), None);
    }

    #[test]
    fn topology_mapping() {
        assert_eq!(
            PipelineType::Triangles.topology(),
            PrimitiveTopology::TriangleList
        );
        assert_eq!(
            PipelineType::TriangleStrip.topology(),
            PrimitiveTopology::TriangleStrip
        );
    }
}
