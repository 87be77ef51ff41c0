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

//! Reflection-driven binding: resolving vertex attribute locations and
//! enforcing the shader resource contract.

use crate::renderer::api::common::ShaderStage;
use crate::renderer::api::pipeline::VertexAttributeDescriptor;
use crate::renderer::api::shader::{
    FsParams, VsParams, FS_PARAMS_BLOCK, TEX0_IMAGE, TEX1_IMAGE, VS_PARAMS_BLOCK,
};
use crate::renderer::api::vertex::{VertexAttributes, VERTEX_ATTRIBUTE_ORDER};
use crate::renderer::error::ShaderError;
use crate::renderer::traits::ShaderReflection;

/// Resolves each attribute in `format` to its shader input location.
///
/// Attributes the shader does not consume are left unbound with an error
/// diagnostic; draws through the resulting pipeline may render incorrectly
/// but registration proceeds. Offsets and the stride come from the canonical
/// interleaving order, independent of what the shader consumes.
pub fn resolve_vertex_attributes(
    reflection: &dyn ShaderReflection,
    format: VertexAttributes,
    label: &str,
) -> Vec<VertexAttributeDescriptor> {
    let mut attributes = Vec::new();
    for attr in VERTEX_ATTRIBUTE_ORDER {
        if !format.contains(attr) {
            continue;
        }
        let (Some(name), Some(wire_format), Some(offset)) =
            (attr.shader_name(), attr.wire_format(), format.offset_of(attr))
        else {
            continue;
        };
        match reflection.attribute_slot(name) {
            Some(shader_location) => attributes.push(VertexAttributeDescriptor {
                shader_location,
                format: wire_format,
                offset,
            }),
            None => {
                log::error!(
                    "Shader '{label}' has no attribute '{name}'; leaving it unbound"
                );
            }
        }
    }
    attributes
}

/// Checks that `reflection` satisfies the uniform and image contract the
/// registry's draw path assumes for `format`.
///
/// The vertex stage must expose `vs_params` at slot 0 with the exact size of
/// [`VsParams`]. A format with a first texture channel needs the `un_tex0`
/// image; a second texture channel additionally needs `un_tex1` and an
/// `fs_params` block at slot 0 sized like [`FsParams`].
pub fn validate_shader_contract(
    reflection: &dyn ShaderReflection,
    format: VertexAttributes,
    label: &str,
) -> Result<(), ShaderError> {
    check_uniform_block(
        reflection,
        ShaderStage::Vertex,
        VS_PARAMS_BLOCK,
        std::mem::size_of::<VsParams>(),
        label,
    )?;

    if format.contains(VertexAttributes::TEX1) {
        check_image_slot(reflection, ShaderStage::Fragment, TEX0_IMAGE, label)?;
    }
    if format.contains(VertexAttributes::TEX2) {
        check_image_slot(reflection, ShaderStage::Fragment, TEX1_IMAGE, label)?;
        check_uniform_block(
            reflection,
            ShaderStage::Fragment,
            FS_PARAMS_BLOCK,
            std::mem::size_of::<FsParams>(),
            label,
        )?;
    }
    Ok(())
}

fn check_uniform_block(
    reflection: &dyn ShaderReflection,
    stage: ShaderStage,
    name: &'static str,
    expected: usize,
    label: &str,
) -> Result<(), ShaderError> {
    let slot = reflection
        .uniform_block_slot(stage, name)
        .ok_or_else(|| ShaderError::MissingUniformBlock {
            stage,
            name,
            label: label.to_string(),
        })?;
    if slot != 0 {
        return Err(ShaderError::WrongUniformBlockSlot {
            stage,
            name,
            slot,
            label: label.to_string(),
        });
    }
    let found = reflection
        .uniform_block_size(stage, name)
        .ok_or_else(|| ShaderError::MissingUniformBlock {
            stage,
            name,
            label: label.to_string(),
        })?;
    if found != expected {
        return Err(ShaderError::UniformBlockSizeMismatch {
            stage,
            name,
            expected,
            found,
            label: label.to_string(),
        });
    }
    Ok(())
}

fn check_image_slot(
    reflection: &dyn ShaderReflection,
    stage: ShaderStage,
    name: &'static str,
    label: &str,
) -> Result<(), ShaderError> {
    reflection
        .image_slot(stage, name)
        .map(|_| ())
        .ok_or_else(|| ShaderError::MissingImageSlot {
            stage,
            name,
            label: label.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::common::GraphicsBackendType;
    use crate::renderer::api::pipeline::VertexFormat;
    use crate::renderer::api::shader::ShaderModuleDescriptor;
    use crate::renderer::api::vertex::{VertexXyzdt1, VertexXyzdt2};

    /// A hand-written reflection table with tweakable gaps.
    #[derive(Debug, Default)]
    struct TableReflection {
        omit_attribute: Option<&'static str>,
        omit_image: Option<&'static str>,
        vs_params_slot: u32,
        vs_params_size_delta: isize,
    }

    impl ShaderReflection for TableReflection {
        fn descriptor(&self, _backend: GraphicsBackendType) -> Option<ShaderModuleDescriptor<'_>> {
            None
        }

        fn attribute_slot(&self, name: &str) -> Option<u32> {
            if self.omit_attribute == Some(name) {
                return None;
            }
            match name {
                "vs_position" => Some(0),
                "vs_color" => Some(1),
                "vs_texcoord0" => Some(2),
                "vs_texcoord1" => Some(3),
                "vs_normal" => Some(4),
                _ => None,
            }
        }

        fn uniform_block_slot(&self, stage: ShaderStage, name: &str) -> Option<u32> {
            match (stage, name) {
                (ShaderStage::Vertex, VS_PARAMS_BLOCK) => Some(self.vs_params_slot),
                (ShaderStage::Fragment, FS_PARAMS_BLOCK) => Some(0),
                _ => None,
            }
        }

        fn uniform_block_size(&self, stage: ShaderStage, name: &str) -> Option<usize> {
            match (stage, name) {
                (ShaderStage::Vertex, VS_PARAMS_BLOCK) => Some(
                    (std::mem::size_of::<VsParams>() as isize + self.vs_params_size_delta)
                        as usize,
                ),
                (ShaderStage::Fragment, FS_PARAMS_BLOCK) => {
                    Some(std::mem::size_of::<FsParams>())
                }
                _ => None,
            }
        }

        fn image_slot(&self, stage: ShaderStage, name: &str) -> Option<u32> {
            if stage != ShaderStage::Fragment || self.omit_image == Some(name) {
                return None;
            }
            match name {
                TEX0_IMAGE => Some(0),
                TEX1_IMAGE => Some(1),
                _ => None,
            }
        }
    }

    #[test]
    fn resolves_attributes_in_canonical_order() {
        let reflection = TableReflection::default();
        let attrs =
            resolve_vertex_attributes(&reflection, VertexXyzdt1::FORMAT, "color_tex1");
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].shader_location, 0);
        assert_eq!(attrs[0].format, VertexFormat::Float32x3);
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[1].shader_location, 1);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[2].shader_location, 2);
        assert_eq!(attrs[2].offset, 16);
    }

    #[test]
    fn missing_attribute_is_left_unbound() {
        let reflection = TableReflection {
            omit_attribute: Some("vs_color"),
            ..Default::default()
        };
        let attrs =
            resolve_vertex_attributes(&reflection, VertexXyzdt1::FORMAT, "color_tex1");
        // Position and texcoord0 still bind; offsets keep the full layout.
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1].offset, 16);
    }

    #[test]
    fn conforming_table_passes_contract() {
        let reflection = TableReflection::default();
        assert!(validate_shader_contract(&reflection, VertexXyzdt2::FORMAT, "t").is_ok());
    }

    #[test]
    fn wrong_vs_params_slot_fails() {
        let reflection = TableReflection {
            vs_params_slot: 1,
            ..Default::default()
        };
        let err = validate_shader_contract(&reflection, VertexXyzdt1::FORMAT, "t");
        assert!(matches!(
            err,
            Err(ShaderError::WrongUniformBlockSlot { slot: 1, .. })
        ));
    }

    #[test]
    fn mis_sized_vs_params_fails() {
        let reflection = TableReflection {
            vs_params_size_delta: 16,
            ..Default::default()
        };
        let err = validate_shader_contract(&reflection, VertexXyzdt1::FORMAT, "t");
        assert!(matches!(
            err,
            Err(ShaderError::UniformBlockSizeMismatch { expected: 64, found: 80, .. })
        ));
    }

    #[test]
    fn second_texture_channel_requires_un_tex1() {
        let reflection = TableReflection {
            omit_image: Some(TEX1_IMAGE),
            ..Default::default()
        };
        // TEX1-only format does not need un_tex1.
        assert!(validate_shader_contract(&reflection, VertexXyzdt1::FORMAT, "t").is_ok());
        let err = validate_shader_contract(&reflection, VertexXyzdt2::FORMAT, "t");
        assert!(matches!(
            err,
            Err(ShaderError::MissingImageSlot { name: TEX1_IMAGE, .. })
        ));
    }
}
