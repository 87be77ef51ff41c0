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

//! The `ShaderReflection` trait, describing a shader's binding interface by
//! name.

use crate::renderer::api::common::{GraphicsBackendType, ShaderStage};
use crate::renderer::api::shader::ShaderModuleDescriptor;
use std::fmt::Debug;

/// Reflection data for one compiled shader program.
///
/// The registry validates resource contracts and resolves vertex attribute
/// locations exclusively through this trait; every lookup is by name so the
/// queries stay independent of how the reflection tables were produced
/// (offline codegen, naga, hand-written tables in tests).
pub trait ShaderReflection: Debug {
    /// Returns the module descriptor holding the source compiled for
    /// `backend`, or `None` if this shader has no variant for it.
    fn descriptor(&self, backend: GraphicsBackendType) -> Option<ShaderModuleDescriptor<'_>>;

    /// Returns the vertex-input location of the attribute `name`, or `None`
    /// if the shader does not consume it.
    fn attribute_slot(&self, name: &str) -> Option<u32>;

    /// Returns the bind slot of the uniform block `name` in `stage`.
    fn uniform_block_slot(&self, stage: ShaderStage, name: &str) -> Option<u32>;

    /// Returns the byte size of the uniform block `name` in `stage`.
    fn uniform_block_size(&self, stage: ShaderStage, name: &str) -> Option<usize>;

    /// Returns the bind slot of the sampled image `name` in `stage`.
    fn image_slot(&self, stage: ShaderStage, name: &str) -> Option<u32>;
}
