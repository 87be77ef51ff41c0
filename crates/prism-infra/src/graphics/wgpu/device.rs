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

use wgpu;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use prism_core::renderer::api::common::GraphicsBackendType;
use prism_core::renderer::api::pipeline::{RenderPipelineDescriptor, RenderPipelineId};
use prism_core::renderer::api::shader::{ShaderModuleDescriptor, ShaderModuleId, ShaderSourceData};
use prism_core::renderer::error::ResourceError;
use prism_core::renderer::traits::GraphicsDevice;

use crate::graphics::wgpu::conversions::{from_wgpu_backend, IntoWgpu};

#[derive(Debug)]
struct WgpuShaderModuleEntry {
    wgpu_module: Arc<wgpu::ShaderModule>,
}

#[derive(Debug)]
struct WgpuRenderPipelineEntry {
    wgpu_pipeline: Arc<wgpu::RenderPipeline>,
}

/// The internal, non-clonable state of the WgpuDevice.
/// This struct holds all the GPU resources, protected behind an Arc.
#[derive(Debug)]
struct WgpuDeviceInternal {
    device: wgpu::Device,
    backend: GraphicsBackendType,
    shader_modules: Mutex<HashMap<ShaderModuleId, WgpuShaderModuleEntry>>,
    pipelines: Mutex<HashMap<RenderPipelineId, WgpuRenderPipelineEntry>>,

    next_shader_id: AtomicUsize,
    next_pipeline_id: AtomicUsize,
}

/// A clonable, thread-safe handle to the WGPU graphics device.
/// It wraps the actual device state (`WgpuDeviceInternal`) in an Arc,
/// allowing it to be shared across threads.
#[derive(Clone, Debug)]
pub struct WgpuDevice {
    internal: Arc<WgpuDeviceInternal>,
}

impl WgpuDevice {
    /// Requests a default adapter and logical device, blocking on the async
    /// wgpu initialization.
    pub fn request_blocking() -> Result<Self, ResourceError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .map_err(|e| {
                    ResourceError::BackendError(format!("Failed to request adapter: {e}"))
                })?;
        let adapter_info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (Backend: {:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, _queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Prism Logical Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
        }))
        .map_err(|e| ResourceError::BackendError(format!("Failed to create logical device: {e}")))?;

        Ok(Self::new(device, adapter_info.backend))
    }

    /// Wraps an already-initialized `wgpu::Device`.
    ///
    /// `backend` is the adapter backend the device was created on; shader
    /// reflection tables use it to pick their source variant.
    pub fn new(device: wgpu::Device, backend: wgpu::Backend) -> Self {
        Self {
            internal: Arc::new(WgpuDeviceInternal {
                device,
                backend: from_wgpu_backend(backend),
                shader_modules: Mutex::new(HashMap::new()),
                pipelines: Mutex::new(HashMap::new()),
                next_shader_id: AtomicUsize::new(0),
                next_pipeline_id: AtomicUsize::new(0),
            }),
        }
    }

    // --- ID Generation Helpers ---

    fn generate_shader_id(&self) -> ShaderModuleId {
        ShaderModuleId(self.internal.next_shader_id.fetch_add(1, Ordering::Relaxed))
    }

    fn generate_pipeline_id(&self) -> RenderPipelineId {
        RenderPipelineId(
            self.internal
                .next_pipeline_id
                .fetch_add(1, Ordering::Relaxed),
        )
    }

    /// Retrieves a reference-counted pointer to the internal WGPU render pipeline.
    /// Returns `None` if the ID is invalid.
    pub fn get_wgpu_render_pipeline(
        &self,
        id: RenderPipelineId,
    ) -> Option<Arc<wgpu::RenderPipeline>> {
        let pipelines = self.internal.pipelines.lock().ok()?;
        pipelines
            .get(&id)
            .map(|entry| Arc::clone(&entry.wgpu_pipeline))
    }
}

impl GraphicsDevice for WgpuDevice {
    fn backend_type(&self) -> GraphicsBackendType {
        self.internal.backend
    }

    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError> {
        let wgpu_source = match &descriptor.source {
            ShaderSourceData::Wgsl(cow_str) => wgpu::ShaderSource::Wgsl(cow_str.clone()),
        };
        let label = descriptor.label;

        log::debug!("WgpuDevice: Creating wgpu::ShaderModule with label: {label:?}");
        let wgpu_module = self
            .internal
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label,
                source: wgpu_source,
            });

        let id = self.generate_shader_id();
        let mut modules_guard = self.internal.shader_modules.lock().map_err(|e| {
            ResourceError::BackendError(format!("Mutex poisoned (shader_modules): {e}"))
        })?;
        modules_guard.insert(
            id,
            WgpuShaderModuleEntry {
                wgpu_module: Arc::new(wgpu_module),
            },
        );
        Ok(id)
    }

    fn create_render_pipeline(
        &self,
        descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError> {
        log::debug!(
            "WgpuDevice: Creating render pipeline with label: {:?}",
            descriptor.label
        );

        // 1. Get the shader modules
        let shader_modules_map = self.internal.shader_modules.lock().map_err(|e| {
            ResourceError::BackendError(format!("Mutex poisoned (shader_modules): {e}"))
        })?;

        let vs_module_entry = shader_modules_map
            .get(&descriptor.vertex_shader_module)
            .ok_or(ResourceError::InvalidHandle)?;
        let vs_wgpu_module = &vs_module_entry.wgpu_module;

        let fs_wgpu_module_opt = match descriptor.fragment_shader_module {
            Some(fs_id) => Some(
                &shader_modules_map
                    .get(&fs_id)
                    .ok_or(ResourceError::InvalidHandle)?
                    .wgpu_module,
            ),
            None => None,
        };

        // 2. Convert vertex buffers layout
        let wgpu_vertex_attributes_storage: Vec<Vec<wgpu::VertexAttribute>> = descriptor
            .vertex_buffers_layout
            .as_ref()
            .iter()
            .map(|vb_layout_desc| {
                vb_layout_desc
                    .attributes
                    .as_ref()
                    .iter()
                    .map(|attr_desc| wgpu::VertexAttribute {
                        format: attr_desc.format.into_wgpu(),
                        offset: attr_desc.offset,
                        shader_location: attr_desc.shader_location,
                    })
                    .collect()
            })
            .collect();

        let wgpu_vertex_buffers_layouts: Vec<wgpu::VertexBufferLayout> = descriptor
            .vertex_buffers_layout
            .as_ref()
            .iter()
            .zip(wgpu_vertex_attributes_storage.iter())
            .map(
                |(vb_layout_desc, attributes_for_this_layout)| wgpu::VertexBufferLayout {
                    array_stride: vb_layout_desc.array_stride,
                    step_mode: vb_layout_desc.step_mode.into_wgpu(),
                    attributes: attributes_for_this_layout,
                },
            )
            .collect();

        // 3. Convert primitive state
        let primitive_state = wgpu::PrimitiveState {
            topology: descriptor.primitive_state.topology.into_wgpu(),
            strip_index_format: descriptor
                .primitive_state
                .strip_index_format
                .map(|f| f.into_wgpu()),
            front_face: descriptor.primitive_state.front_face.into_wgpu(),
            cull_mode: descriptor
                .primitive_state
                .cull_mode
                .and_then(|m| m.into_wgpu()),
            polygon_mode: descriptor.primitive_state.polygon_mode.into_wgpu(),
            unclipped_depth: false,
            conservative: false,
        };

        // 4. Convert depth stencil state
        let depth_stencil_state =
            descriptor
                .depth_stencil_state
                .as_ref()
                .map(|ds| wgpu::DepthStencilState {
                    format: ds.format.into_wgpu(),
                    depth_write_enabled: Some(ds.depth_write_enabled),
                    depth_compare: Some(ds.depth_compare.into_wgpu()),
                    stencil: wgpu::StencilState {
                        front: wgpu::StencilFaceState {
                            compare: ds.stencil_front.compare.into_wgpu(),
                            fail_op: ds.stencil_front.fail_op.into_wgpu(),
                            depth_fail_op: ds.stencil_front.depth_fail_op.into_wgpu(),
                            pass_op: ds.stencil_front.depth_pass_op.into_wgpu(),
                        },
                        back: wgpu::StencilFaceState {
                            compare: ds.stencil_back.compare.into_wgpu(),
                            fail_op: ds.stencil_back.fail_op.into_wgpu(),
                            depth_fail_op: ds.stencil_back.depth_fail_op.into_wgpu(),
                            pass_op: ds.stencil_back.depth_pass_op.into_wgpu(),
                        },
                        read_mask: ds.stencil_read_mask,
                        write_mask: ds.stencil_write_mask,
                    },
                    bias: wgpu::DepthBiasState {
                        constant: ds.bias.constant,
                        slope_scale: ds.bias.slope_scale,
                        clamp: ds.bias.clamp,
                    },
                });

        // 5. Convert color target states
        let color_target_states: Vec<Option<wgpu::ColorTargetState>> = descriptor
            .color_target_states
            .iter()
            .map(|cts| {
                Some(wgpu::ColorTargetState {
                    format: cts.format.into_wgpu(),
                    blend: cts.blend.map(|b| wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: b.color.src_factor.into_wgpu(),
                            dst_factor: b.color.dst_factor.into_wgpu(),
                            operation: b.color.operation.into_wgpu(),
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: b.alpha.src_factor.into_wgpu(),
                            dst_factor: b.alpha.dst_factor.into_wgpu(),
                            operation: b.alpha.operation.into_wgpu(),
                        },
                    }),
                    write_mask: wgpu::ColorWrites::from_bits_truncate(cts.write_mask.bits() as u32),
                })
            })
            .collect();

        // 6. Convert multisample state
        let multisample_state = wgpu::MultisampleState {
            count: descriptor.multisample_state.count,
            mask: descriptor.multisample_state.mask as u64,
            alpha_to_coverage_enabled: descriptor.multisample_state.alpha_to_coverage_enabled,
        };

        // 7. Create pipeline layout and render pipeline
        let pipeline_layout_label = descriptor.label.as_deref().map(|s| format!("{s}_Layout"));
        let wgpu_pipeline_layout =
            self.internal
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: pipeline_layout_label.as_deref(),
                    bind_group_layouts: &[],
                    immediate_size: 0,
                });

        let wgpu_pipeline_descriptor = wgpu::RenderPipelineDescriptor {
            label: descriptor.label.as_deref(),
            layout: Some(&wgpu_pipeline_layout),
            vertex: wgpu::VertexState {
                module: vs_wgpu_module,
                entry_point: Some(descriptor.vertex_entry_point.as_ref()),
                buffers: &wgpu_vertex_buffers_layouts,
                compilation_options: Default::default(),
            },
            fragment: match fs_wgpu_module_opt {
                Some(fs_module) => {
                    let entry_point = descriptor.fragment_entry_point.as_ref().ok_or_else(|| {
                        ResourceError::BackendError(format!(
                            "fragment module present but no entry point for pipeline {:?}",
                            descriptor.label
                        ))
                    })?;
                    Some(wgpu::FragmentState {
                        module: fs_module,
                        entry_point: Some(entry_point.as_ref()),
                        targets: &color_target_states,
                        compilation_options: Default::default(),
                    })
                }
                None => None,
            },
            primitive: primitive_state,
            depth_stencil: depth_stencil_state,
            multisample: multisample_state,
            multiview_mask: None,
            cache: None,
        };

        let pipeline = self
            .internal
            .device
            .create_render_pipeline(&wgpu_pipeline_descriptor);
        drop(shader_modules_map);

        let id = self.generate_pipeline_id();
        let mut pipelines_guard = self.internal.pipelines.lock().map_err(|e| {
            ResourceError::BackendError(format!("Mutex poisoned (pipelines): {e}"))
        })?;
        pipelines_guard.insert(
            id,
            WgpuRenderPipelineEntry {
                wgpu_pipeline: Arc::new(pipeline),
            },
        );
        Ok(id)
    }
}
