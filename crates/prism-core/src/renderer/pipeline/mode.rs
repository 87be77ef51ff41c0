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

//! The packed render-state mode: blend, depth write, depth compare and cull,
//! folded into one byte.
//!
//! The packing is stable across runs and backends; pipeline identifiers built
//! from it are therefore valid as persistent sort keys.

use crate::renderer::api::pipeline::{
    BlendComponentDescriptor, BlendFactor, BlendOperation, BlendStateDescriptor, CompareFunction,
    CullMode, FrontFace,
};

/// How a fragment's color is combined with the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BlendMode {
    /// Opaque; blending disabled.
    #[default]
    None = 0,
    /// Alpha-tested cutout; blending itself stays conventional.
    AlphaTest = 1,
    /// Additive, scaled by source alpha.
    AddBlendAlpha = 2,
    /// Conventional alpha blending.
    AlphaBlend = 3,
    /// Pure additive.
    AddBlend = 4,
    /// Reverse-subtractive, scaled by source alpha.
    SubBlend = 5,
    /// Multiplicative (modulate by destination color).
    Multiply = 6,
}

impl BlendMode {
    const MASK: u16 = 0b111;

    /// Decodes a 3-bit field. The all-ones pattern is unassigned.
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits & Self::MASK {
            0 => Some(BlendMode::None),
            1 => Some(BlendMode::AlphaTest),
            2 => Some(BlendMode::AddBlendAlpha),
            3 => Some(BlendMode::AlphaBlend),
            4 => Some(BlendMode::AddBlend),
            5 => Some(BlendMode::SubBlend),
            6 => Some(BlendMode::Multiply),
            _ => None,
        }
    }

    /// Returns the blend equation for this mode, or `None` when blending is
    /// disabled.
    ///
    /// Alpha factors mirror the RGB factors in every mode.
    pub fn blend_state(self) -> Option<BlendStateDescriptor> {
        let component = match self {
            BlendMode::None => return None,
            // Cutout transparency; discard happens in the shader, the
            // equation is plain alpha blending.
            BlendMode::AlphaTest | BlendMode::AlphaBlend => BlendComponentDescriptor {
                src_factor: BlendFactor::SrcAlpha,
                dst_factor: BlendFactor::OneMinusSrcAlpha,
                operation: BlendOperation::Add,
            },
            BlendMode::AddBlendAlpha => BlendComponentDescriptor {
                src_factor: BlendFactor::SrcAlpha,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::Add,
            },
            BlendMode::AddBlend => BlendComponentDescriptor {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::Add,
            },
            BlendMode::SubBlend => BlendComponentDescriptor {
                src_factor: BlendFactor::SrcAlpha,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::ReverseSubtract,
            },
            BlendMode::Multiply => BlendComponentDescriptor {
                src_factor: BlendFactor::DstColor,
                dst_factor: BlendFactor::Zero,
                operation: BlendOperation::Add,
            },
        };
        Some(BlendStateDescriptor {
            color: component,
            alpha: component,
        })
    }
}

/// The depth-test comparison a mode can select.
///
/// Only the comparisons the renderer actually draws with are representable;
/// anything else collapses to [`DepthCompare::Always`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DepthCompare {
    /// Pass when the fragment is at or in front of the stored depth.
    #[default]
    LessEqual = 0,
    /// Pass when the fragment is strictly behind the stored depth.
    Greater = 1,
    /// Pass when the fragment is at or behind the stored depth.
    GreaterEqual = 2,
    /// The depth test always passes.
    Always = 3,
}

impl DepthCompare {
    const MASK: u16 = 0b11;

    /// Decodes a 2-bit field. Every pattern is assigned.
    pub const fn from_bits(bits: u16) -> Self {
        match bits & Self::MASK {
            0 => DepthCompare::LessEqual,
            1 => DepthCompare::Greater,
            2 => DepthCompare::GreaterEqual,
            _ => DepthCompare::Always,
        }
    }

    /// Narrows a full comparison function into the representable set.
    pub const fn from_compare_function(func: CompareFunction) -> Self {
        match func {
            CompareFunction::LessEqual => DepthCompare::LessEqual,
            CompareFunction::Greater => DepthCompare::Greater,
            CompareFunction::GreaterEqual => DepthCompare::GreaterEqual,
            _ => DepthCompare::Always,
        }
    }

    /// Returns the comparison function this mode selects.
    pub const fn to_compare_function(self) -> CompareFunction {
        match self {
            DepthCompare::LessEqual => CompareFunction::LessEqual,
            DepthCompare::Greater => CompareFunction::Greater,
            DepthCompare::GreaterEqual => CompareFunction::GreaterEqual,
            DepthCompare::Always => CompareFunction::Always,
        }
    }
}

/// Which triangle winding, if any, a mode culls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CullFace {
    /// Both windings are drawn.
    #[default]
    None = 0,
    /// Clockwise triangles are culled.
    Cw = 1,
    /// Counter-clockwise triangles are culled.
    Ccw = 2,
}

impl CullFace {
    const MASK: u16 = 0b11;

    /// Decodes a 2-bit field. The all-ones pattern is unassigned.
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits & Self::MASK {
            0 => Some(CullFace::None),
            1 => Some(CullFace::Cw),
            2 => Some(CullFace::Ccw),
            _ => None,
        }
    }

    /// Returns the pipeline cull mode for this setting.
    pub const fn cull_mode(self) -> Option<CullMode> {
        match self {
            CullFace::None => None,
            CullFace::Cw | CullFace::Ccw => Some(CullMode::Back),
        }
    }

    /// Returns the winding that counts as front-facing under this setting.
    ///
    /// Culling always removes the back face; which winding the back face IS
    /// comes from here.
    pub const fn front_face(self) -> FrontFace {
        match self {
            CullFace::None | CullFace::Cw => FrontFace::Ccw,
            CullFace::Ccw => FrontFace::Cw,
        }
    }
}

const BLEND_SHIFT: u16 = 0;
const DEPTH_WRITE_SHIFT: u16 = 3;
const DEPTH_CMP_SHIFT: u16 = 4;
const CULL_SHIFT: u16 = 6;

/// One past the largest packed mode value.
pub const PIPELINE_MODE_VALUE_MAX: u16 = 1 << 8;

/// The packed render-state selection of a pipeline.
///
/// All four fields fold into eight bits; see [`PipelineMode::to_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PipelineMode {
    /// How fragments blend with the framebuffer.
    pub blend: BlendMode,
    /// Whether passing fragments write their depth.
    pub depth_write: bool,
    /// The depth-test comparison.
    pub depth_cmp: DepthCompare,
    /// Which winding, if any, is culled.
    pub cull: CullFace,
}

impl PipelineMode {
    /// Packs this mode into its canonical byte value.
    pub const fn to_value(self) -> u16 {
        (self.blend as u16) << BLEND_SHIFT
            | (self.depth_write as u16) << DEPTH_WRITE_SHIFT
            | (self.depth_cmp as u16) << DEPTH_CMP_SHIFT
            | (self.cull as u16) << CULL_SHIFT
    }

    /// Unpacks a byte value back into a mode.
    ///
    /// Returns `None` for values outside the packed range and for bit
    /// patterns whose blend or cull field is unassigned; exhaustive sweeps
    /// over `0..PIPELINE_MODE_VALUE_MAX` skip those.
    pub const fn from_value(value: u16) -> Option<Self> {
        if value >= PIPELINE_MODE_VALUE_MAX {
            return None;
        }
        let blend = match BlendMode::from_bits(value >> BLEND_SHIFT) {
            Some(blend) => blend,
            None => return None,
        };
        let cull = match CullFace::from_bits(value >> CULL_SHIFT) {
            Some(cull) => cull,
            None => return None,
        };
        Some(PipelineMode {
            blend,
            depth_write: (value >> DEPTH_WRITE_SHIFT) & 1 != 0,
            depth_cmp: DepthCompare::from_bits(value >> DEPTH_CMP_SHIFT),
            cull,
        })
    }
}
