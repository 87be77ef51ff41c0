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

//! The `GraphicsDevice` trait, the boundary between the backend-agnostic
//! registry and a concrete graphics API.

use crate::renderer::api::common::GraphicsBackendType;
use crate::renderer::api::pipeline::{RenderPipelineDescriptor, RenderPipelineId};
use crate::renderer::api::shader::{ShaderModuleDescriptor, ShaderModuleId};
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// Represents the GPU resource factory the pipeline registry drives.
///
/// Implementations own the API-specific objects behind the opaque IDs they
/// hand out; the registry never sees backend types.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Returns the type of the underlying graphics backend.
    fn backend_type(&self) -> GraphicsBackendType;

    /// Compiles a shader module from the provided descriptor.
    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError>;

    /// Builds a complete render pipeline state object.
    fn create_render_pipeline(
        &self,
        descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError>;
}
