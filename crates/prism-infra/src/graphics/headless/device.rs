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

//! A `GraphicsDevice` that records descriptors instead of talking to a GPU.
//!
//! Used by the registration-sweep tests and in CI where no adapter exists.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use prism_core::renderer::api::common::{GraphicsBackendType, IndexFormat, TextureFormat};
use prism_core::renderer::api::pipeline::{
    BlendStateDescriptor, CompareFunction, CullMode, FrontFace, PrimitiveTopology,
    RenderPipelineDescriptor, RenderPipelineId, VertexAttributeDescriptor,
};
use prism_core::renderer::api::shader::{ShaderModuleDescriptor, ShaderModuleId};
use prism_core::renderer::error::ResourceError;
use prism_core::renderer::traits::GraphicsDevice;

/// An owned snapshot of one pipeline descriptor the device was asked to
/// build.
///
/// The backend-agnostic descriptor borrows its contents, so tests keep this
/// flattened copy instead.
#[derive(Debug, Clone)]
pub struct PipelineSnapshot {
    /// The descriptor label.
    pub label: Option<String>,
    /// The shader module the pipeline was built from.
    pub vertex_shader_module: ShaderModuleId,
    /// The single vertex buffer's stride.
    pub array_stride: u64,
    /// The bound vertex attributes.
    pub attributes: Vec<VertexAttributeDescriptor>,
    /// The primitive topology.
    pub topology: PrimitiveTopology,
    /// The strip index format, if any.
    pub strip_index_format: Option<IndexFormat>,
    /// The front-face winding.
    pub front_face: FrontFace,
    /// The cull mode, if any.
    pub cull_mode: Option<CullMode>,
    /// Whether depth writes are enabled.
    pub depth_write_enabled: bool,
    /// The depth comparison function.
    pub depth_compare: CompareFunction,
    /// The depth target format.
    pub depth_format: Option<TextureFormat>,
    /// The first color target's blend state.
    pub blend: Option<BlendStateDescriptor>,
    /// The first color target's format.
    pub color_format: Option<TextureFormat>,
}

/// A `GraphicsDevice` producing sequential IDs and descriptor snapshots.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    shader_labels: Mutex<Vec<Option<String>>>,
    pipelines: Mutex<Vec<PipelineSnapshot>>,
    next_shader_id: AtomicUsize,
    fail_pipelines: bool,
}

impl HeadlessDevice {
    /// Creates a device that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a device whose pipeline builds all fail, for error-path tests.
    pub fn failing_pipelines() -> Self {
        Self {
            fail_pipelines: true,
            ..Self::default()
        }
    }

    /// Returns how many shader modules were built.
    pub fn shader_module_count(&self) -> usize {
        self.shader_labels.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// Returns copies of every pipeline snapshot recorded so far.
    pub fn pipeline_snapshots(&self) -> Vec<PipelineSnapshot> {
        self.pipelines.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Returns the snapshot built for the pipeline with `id`.
    pub fn pipeline_snapshot(&self, id: RenderPipelineId) -> Option<PipelineSnapshot> {
        self.pipelines
            .lock()
            .ok()
            .and_then(|v| v.get(id.0).cloned())
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn backend_type(&self) -> GraphicsBackendType {
        GraphicsBackendType::Headless
    }

    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError> {
        let mut labels = self
            .shader_labels
            .lock()
            .map_err(|e| ResourceError::BackendError(format!("Mutex poisoned: {e}")))?;
        labels.push(descriptor.label.map(String::from));
        let id = ShaderModuleId(self.next_shader_id.fetch_add(1, Ordering::Relaxed));
        log::debug!("HeadlessDevice: recorded shader module {id:?}");
        Ok(id)
    }

    fn create_render_pipeline(
        &self,
        descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError> {
        if self.fail_pipelines {
            return Err(ResourceError::BackendError(
                "headless device configured to fail pipeline builds".to_string(),
            ));
        }

        let buffer = descriptor.vertex_buffers_layout.first();
        let color = descriptor.color_target_states.first();
        let snapshot = PipelineSnapshot {
            label: descriptor.label.as_deref().map(String::from),
            vertex_shader_module: descriptor.vertex_shader_module,
            array_stride: buffer.map_or(0, |b| b.array_stride),
            attributes: buffer.map_or_else(Vec::new, |b| b.attributes.to_vec()),
            topology: descriptor.primitive_state.topology,
            strip_index_format: descriptor.primitive_state.strip_index_format,
            front_face: descriptor.primitive_state.front_face,
            cull_mode: descriptor.primitive_state.cull_mode,
            depth_write_enabled: descriptor
                .depth_stencil_state
                .as_ref()
                .is_some_and(|ds| ds.depth_write_enabled),
            depth_compare: descriptor
                .depth_stencil_state
                .as_ref()
                .map_or(CompareFunction::Always, |ds| ds.depth_compare),
            depth_format: descriptor.depth_stencil_state.as_ref().map(|ds| ds.format),
            blend: color.and_then(|c| c.blend),
            color_format: color.map(|c| c.format),
        };

        let mut pipelines = self
            .pipelines
            .lock()
            .map_err(|e| ResourceError::BackendError(format!("Mutex poisoned: {e}")))?;
        pipelines.push(snapshot);
        Ok(RenderPipelineId(pipelines.len() - 1))
    }
}
