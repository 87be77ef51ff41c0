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

//! Shader module descriptors and the per-draw uniform block layouts.

use bytemuck::{Pod, Zeroable};
use std::borrow::Cow;

/// Represents the source data for a shader module.
#[derive(Debug, Clone)]
pub enum ShaderSourceData<'a> {
    /// WGSL source code.
    Wgsl(Cow<'a, str>),
}

/// Describes a shader module to be created by the `GraphicsDevice`.
///
/// One module carries both the vertex and fragment entry points; the label is
/// also the key under which the registry deduplicates shared modules.
#[derive(Debug, Clone)]
pub struct ShaderModuleDescriptor<'a> {
    /// A debug label, also used as the module sharing key.
    pub label: Option<&'a str>,
    /// The shader source for the active backend.
    pub source: ShaderSourceData<'a>,
}

/// An opaque handle representing a compiled shader module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderModuleId(pub usize);

/// Name of the vertex-stage uniform block carrying per-draw parameters.
pub const VS_PARAMS_BLOCK: &str = "vs_params";

/// Name of the fragment-stage uniform block required by dual-texture formats.
pub const FS_PARAMS_BLOCK: &str = "fs_params";

/// Name of the image slot backing the first texture channel.
pub const TEX0_IMAGE: &str = "un_tex0";

/// Name of the image slot backing the second texture channel.
pub const TEX1_IMAGE: &str = "un_tex1";

/// Per-draw vertex-stage parameters.
///
/// Every conforming shader exposes a uniform block named [`VS_PARAMS_BLOCK`]
/// at slot 0 with exactly this byte size.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VsParams {
    /// Combined model-view-projection matrix, column major.
    pub model_view_proj: [[f32; 4]; 4],
}

/// Per-draw fragment-stage parameters for dual-texture pipelines.
///
/// Required (as [`FS_PARAMS_BLOCK`] at slot 0, exactly this byte size) only
/// when the vertex format carries a second texture channel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FsParams {
    /// Interpolation factor between the two texture channels.
    pub tex2_lerp: f32,
    /// Alpha-test reference value.
    pub alpha_ref: f32,
    /// Padding up to the 16-byte uniform alignment.
    pub _padding: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_module_id_creation_and_equality() {
        let id1 = ShaderModuleId(1);
        let id2 = ShaderModuleId(2);
        let id1_again = ShaderModuleId(1);

        assert_eq!(id1, id1_again);
        assert_ne!(id1, id2);
    }

    #[test]
    fn shader_module_descriptor_creation() {
        let source_code = "fn vs_main() {}";
        let descriptor = ShaderModuleDescriptor {
            label: Some("test_shader"),
            source: ShaderSourceData::Wgsl(Cow::Borrowed(source_code)),
        };

        assert_eq!(descriptor.label, Some("test_shader"));
        let ShaderSourceData::Wgsl(ref cow) = descriptor.source;
        assert_eq!(cow.as_ref(), source_code);
    }

    #[test]
    fn uniform_block_sizes() {
        assert_eq!(std::mem::size_of::<VsParams>(), 64);
        assert_eq!(std::mem::size_of::<FsParams>(), 16);
    }
}
