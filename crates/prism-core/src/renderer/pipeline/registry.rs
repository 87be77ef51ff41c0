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

//! The pipeline registry: a dense, lazily-grown array of compiled pipelines
//! indexed directly by [`PipelineId`].
//!
//! All construction cost is paid at registration; a draw-time lookup is a
//! plain array index with no allocation, no locking and no fallibility.

use crate::renderer::api::common::DRAW_INDEX_FORMAT;
use crate::renderer::api::pipeline::{
    ColorTargetStateDescriptor, ColorWrites, DepthBiasState, DepthStencilStateDescriptor,
    MultisampleStateDescriptor, PrimitiveStateDescriptor, PrimitiveTopology, RenderPipelineDescriptor,
    RenderPipelineId, StencilFaceState, VertexBufferLayoutDescriptor, VertexStepMode,
};
use crate::renderer::api::settings::RegistrySettings;
use crate::renderer::api::shader::ShaderModuleId;
use crate::renderer::api::vertex::VertexAttributes;
use crate::renderer::error::{PipelineError, ShaderError};
use crate::renderer::pipeline::binder::{resolve_vertex_attributes, validate_shader_contract};
use crate::renderer::pipeline::key::{PipelineId, PipelineType};
use crate::renderer::pipeline::mode::{PipelineMode, PIPELINE_MODE_VALUE_MAX};
use crate::renderer::traits::{GraphicsDevice, ShaderReflection};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// One registered pipeline.
///
/// Created once at registration and never mutated; records referencing the
/// same shader source share one backend shader module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRecord {
    /// The identifier this record is stored under.
    pub id: PipelineId,
    /// The primitive grouping of the pipeline.
    pub pipeline_type: PipelineType,
    /// The vertex format the pipeline consumes.
    pub format: VertexAttributes,
    /// The byte stride of one interleaved vertex.
    pub stride: u64,
    /// The backend pipeline state object.
    pub pipeline: RenderPipelineId,
    /// The backend shader module the pipeline was built from.
    pub shader_module: ShaderModuleId,
}

/// One (topology, vertex format, shader) triple for the startup sweep.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSeed<'a> {
    /// The primitive grouping to register.
    pub pipeline_type: PipelineType,
    /// The vertex format to register.
    pub format: VertexAttributes,
    /// The reflection table of the shader program drawing this format.
    pub shader: &'a dyn ShaderReflection,
}

/// The outcome of a [`PipelineRegistry::register_all`] sweep.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// How many identifiers the sweep attempted.
    pub attempted: usize,
    /// How many registrations succeeded.
    pub registered: usize,
    /// Each failed identifier with its cause.
    pub failures: Vec<(PipelineId, PipelineError)>,
}

/// Owns every compiled pipeline, addressed by packed identifier.
#[derive(Debug)]
pub struct PipelineRegistry {
    device: Arc<dyn GraphicsDevice>,
    settings: RegistrySettings,
    records: Vec<Option<PipelineRecord>>,
    shader_cache: HashMap<String, ShaderModuleId>,
}

impl PipelineRegistry {
    /// Creates an empty registry building pipelines on `device`.
    pub fn new(device: Arc<dyn GraphicsDevice>, settings: RegistrySettings) -> Self {
        Self {
            device,
            settings,
            records: Vec::new(),
            shader_cache: HashMap::new(),
        }
    }

    /// Builds and stores the pipeline for `id` from `shader`.
    ///
    /// The identifier is decomposed, the shader contract validated, vertex
    /// attributes bound by name, and the backend objects created. Any failure
    /// aborts this one registration and leaves the slot empty. Registering an
    /// already-filled identifier keeps the first record.
    pub fn register(
        &mut self,
        id: PipelineId,
        shader: &dyn ShaderReflection,
    ) -> Result<PipelineId, PipelineError> {
        let Some((pipeline_type, format, mode)) = id.decompose() else {
            return Err(PipelineError::UnrepresentableId { id });
        };

        if self.lookup(id).is_some() {
            // A programming error in the seed tables, flagged but survivable.
            log::error!("Pipeline {id:?} registered twice; keeping the first record");
            return Err(PipelineError::DuplicateRegistration { id });
        }

        let (shader_module, shader_label) = self.resolve_shader_module(shader)?;
        let label = format!("{}#{:04x}", shader_label, id.0);

        validate_shader_contract(shader, format, &label)?;

        let stride = format.stride();
        if stride == 0 {
            return Err(PipelineError::ZeroVertexStride { label });
        }
        let attributes = resolve_vertex_attributes(shader, format, &label);

        let topology = pipeline_type.topology();
        let descriptor = RenderPipelineDescriptor {
            label: Some(Cow::Borrowed(label.as_str())),
            vertex_shader_module: shader_module,
            vertex_entry_point: Cow::Borrowed("vs_main"),
            fragment_shader_module: Some(shader_module),
            fragment_entry_point: Some(Cow::Borrowed("fs_main")),
            vertex_buffers_layout: Cow::Owned(vec![VertexBufferLayoutDescriptor {
                array_stride: stride,
                step_mode: VertexStepMode::Vertex,
                attributes: Cow::Owned(attributes),
            }]),
            primitive_state: PrimitiveStateDescriptor {
                topology,
                strip_index_format: strip_index_format(topology),
                front_face: mode.cull.front_face(),
                cull_mode: mode.cull.cull_mode(),
                ..Default::default()
            },
            depth_stencil_state: Some(DepthStencilStateDescriptor {
                format: self.settings.depth_format,
                depth_write_enabled: mode.depth_write,
                depth_compare: mode.depth_cmp.to_compare_function(),
                stencil_front: StencilFaceState::default(),
                stencil_back: StencilFaceState::default(),
                stencil_read_mask: 0,
                stencil_write_mask: 0,
                bias: DepthBiasState::default(),
            }),
            color_target_states: Cow::Owned(vec![ColorTargetStateDescriptor {
                format: self.settings.color_format,
                blend: mode.blend.blend_state(),
                write_mask: ColorWrites::ALL,
            }]),
            multisample_state: MultisampleStateDescriptor::default(),
        };

        let pipeline = self
            .device
            .create_render_pipeline(&descriptor)
            .map_err(|err| PipelineError::CompilationFailed {
                label: label.clone(),
                details: err.to_string(),
            })?;

        if self.settings.log_registrations {
            log::info!("Registered pipeline '{label}' ({mode:?})");
        } else {
            log::debug!("Registered pipeline '{label}'");
        }

        self.store(PipelineRecord {
            id,
            pipeline_type,
            format,
            stride,
            pipeline,
            shader_module,
        });
        Ok(id)
    }

    /// Sweeps every packed mode value over every seed triple and registers
    /// the composed identifiers.
    ///
    /// Individual failures are collected, not propagated; a summary lands in
    /// the returned report and the log.
    pub fn register_all(&mut self, seeds: &[PipelineSeed<'_>]) -> RegistrationReport {
        let mut report = RegistrationReport::default();
        for value in 0..PIPELINE_MODE_VALUE_MAX {
            let Some(mode) = PipelineMode::from_value(value) else {
                continue;
            };
            for seed in seeds {
                let id = PipelineId::compose(seed.pipeline_type, seed.format, mode);
                report.attempted += 1;
                match self.register(id, seed.shader) {
                    Ok(_) => report.registered += 1,
                    Err(err) => {
                        log::error!("Registration of {id:?} failed: {err}");
                        report.failures.push((id, err));
                    }
                }
            }
        }
        log::info!(
            "Pipeline sweep: {}/{} registered, {} failed",
            report.registered,
            report.attempted,
            report.failures.len()
        );
        report
    }

    /// Returns the record stored under `id`, if any.
    ///
    /// Out-of-bounds identifiers and never-filled slots both read as absent.
    pub fn lookup(&self, id: PipelineId) -> Option<&PipelineRecord> {
        self.records.get(id.index())?.as_ref()
    }

    /// Returns how many pipelines are currently registered.
    pub fn len(&self) -> usize {
        self.records.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if no pipeline has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.records.iter().all(|slot| slot.is_none())
    }

    /// Builds or reuses the backend shader module for `shader`.
    fn resolve_shader_module(
        &mut self,
        shader: &dyn ShaderReflection,
    ) -> Result<(ShaderModuleId, String), PipelineError> {
        let backend = self.device.backend_type();
        let descriptor = shader.descriptor(backend).ok_or_else(|| {
            PipelineError::ContractViolation(ShaderError::CreationFailed {
                label: "<unknown>".to_string(),
                details: format!("no shader source variant for backend {backend:?}"),
            })
        })?;
        let label = descriptor.label.unwrap_or("<unnamed>").to_string();

        if self.settings.share_shader_modules {
            if let Some(module) = self.shader_cache.get(&label) {
                return Ok((*module, label));
            }
        }
        let module = self.device.create_shader_module(&descriptor).map_err(|err| {
            PipelineError::ContractViolation(ShaderError::CreationFailed {
                label: label.clone(),
                details: err.to_string(),
            })
        })?;
        log::debug!("Built shader module '{label}' ({module:?})");
        if self.settings.share_shader_modules {
            self.shader_cache.insert(label.clone(), module);
        }
        Ok((module, label))
    }

    fn store(&mut self, record: PipelineRecord) {
        let index = record.id.index();
        if index >= self.records.len() {
            self.records.resize(index + 1, None);
        }
        self.records[index] = Some(record);
    }
}

const fn strip_index_format(
    topology: PrimitiveTopology,
) -> Option<crate::renderer::api::common::IndexFormat> {
    match topology {
        PrimitiveTopology::LineStrip | PrimitiveTopology::TriangleStrip => {
            Some(DRAW_INDEX_FORMAT)
        }
        _ => None,
    }
}
