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

//! Integration tests: the full startup registration sweep against the
//! headless backend.

use std::borrow::Cow;
use std::sync::Arc;

use prism_core::renderer::api::common::{GraphicsBackendType, IndexFormat, ShaderStage};
use prism_core::renderer::api::pipeline::{
    BlendFactor, BlendOperation, FrontFace, PrimitiveTopology,
};
use prism_core::renderer::api::settings::RegistrySettings;
use prism_core::renderer::api::shader::{
    FsParams, ShaderModuleDescriptor, ShaderSourceData, VsParams, FS_PARAMS_BLOCK, TEX0_IMAGE,
    TEX1_IMAGE, VS_PARAMS_BLOCK,
};
use prism_core::renderer::api::vertex::{VertexXyzd, VertexXyzdt1, VertexXyzdt2};
use prism_core::renderer::error::{PipelineError, ShaderError};
use prism_core::renderer::pipeline::{
    BlendMode, CullFace, DepthCompare, PipelineId, PipelineMode, PipelineRegistry, PipelineSeed,
    PipelineType, PIPELINE_MODE_VALUE_MAX,
};
use prism_core::renderer::traits::ShaderReflection;
use prism_infra::graphics::headless::HeadlessDevice;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A hand-written reflection table standing in for generated shader metadata.
#[derive(Debug)]
struct TestShader {
    label: &'static str,
    omit_image: Option<&'static str>,
}

impl TestShader {
    fn conforming(label: &'static str) -> Self {
        Self {
            label,
            omit_image: None,
        }
    }
}

impl ShaderReflection for TestShader {
    fn descriptor(&self, backend: GraphicsBackendType) -> Option<ShaderModuleDescriptor<'_>> {
        // The headless backend accepts any source.
        let _ = backend;
        Some(ShaderModuleDescriptor {
            label: Some(self.label),
            source: ShaderSourceData::Wgsl(Cow::Borrowed("")),
        })
    }

    fn attribute_slot(&self, name: &str) -> Option<u32> {
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
            (ShaderStage::Vertex, VS_PARAMS_BLOCK) => Some(0),
            (ShaderStage::Fragment, FS_PARAMS_BLOCK) => Some(0),
            _ => None,
        }
    }

    fn uniform_block_size(&self, stage: ShaderStage, name: &str) -> Option<usize> {
        match (stage, name) {
            (ShaderStage::Vertex, VS_PARAMS_BLOCK) => Some(std::mem::size_of::<VsParams>()),
            (ShaderStage::Fragment, FS_PARAMS_BLOCK) => Some(std::mem::size_of::<FsParams>()),
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

fn registry_on(device: &Arc<HeadlessDevice>) -> PipelineRegistry {
    PipelineRegistry::new(device.clone(), RegistrySettings::default())
}

fn assigned_modes() -> impl Iterator<Item = PipelineMode> {
    (0..PIPELINE_MODE_VALUE_MAX).filter_map(PipelineMode::from_value)
}

#[test]
fn full_sweep_registers_every_identifier() {
    init_logger();
    let device = Arc::new(HeadlessDevice::new());
    let mut registry = registry_on(&device);

    let shader = TestShader::conforming("sweep");
    let seeds = [
        PipelineSeed {
            pipeline_type: PipelineType::Triangles,
            format: VertexXyzd::FORMAT,
            shader: &shader,
        },
        PipelineSeed {
            pipeline_type: PipelineType::Triangles,
            format: VertexXyzdt1::FORMAT,
            shader: &shader,
        },
        PipelineSeed {
            pipeline_type: PipelineType::TriangleStrip,
            format: VertexXyzdt2::FORMAT,
            shader: &shader,
        },
    ];

    let report = registry.register_all(&seeds);
    assert!(report.failures.is_empty());
    assert_eq!(report.registered, report.attempted);

    // Every identifier the sweep can produce must now be present.
    for mode in assigned_modes() {
        for seed in &seeds {
            let id = PipelineId::compose(seed.pipeline_type, seed.format, mode);
            let record = registry.lookup(id).expect("sweep id missing");
            assert_eq!(record.format, seed.format);
        }
    }

    // One shader label, one backend module.
    assert_eq!(device.shader_module_count(), 1);
}

#[test]
fn missing_second_texture_image_fails_only_tex2_formats() {
    init_logger();
    let device = Arc::new(HeadlessDevice::new());
    let mut registry = registry_on(&device);

    let shader = TestShader {
        label: "no_tex1",
        omit_image: Some(TEX1_IMAGE),
    };
    let seeds = [
        PipelineSeed {
            pipeline_type: PipelineType::Triangles,
            format: VertexXyzdt1::FORMAT,
            shader: &shader,
        },
        PipelineSeed {
            pipeline_type: PipelineType::Triangles,
            format: VertexXyzdt2::FORMAT,
            shader: &shader,
        },
    ];

    let report = registry.register_all(&seeds);
    assert_eq!(report.registered, report.attempted / 2);

    for mode in assigned_modes() {
        let tex1 = PipelineId::compose(PipelineType::Triangles, VertexXyzdt1::FORMAT, mode);
        let tex2 = PipelineId::compose(PipelineType::Triangles, VertexXyzdt2::FORMAT, mode);
        assert!(registry.lookup(tex1).is_some());
        assert!(registry.lookup(tex2).is_none());
    }
    for (_, err) in &report.failures {
        assert!(matches!(
            err,
            PipelineError::ContractViolation(ShaderError::MissingImageSlot {
                name: TEX1_IMAGE,
                ..
            })
        ));
    }
}

#[test]
fn blend_state_reaches_the_backend() {
    init_logger();
    let device = Arc::new(HeadlessDevice::new());
    let mut registry = registry_on(&device);
    let shader = TestShader::conforming("blend");

    let opaque = PipelineId::compose(
        PipelineType::Triangles,
        VertexXyzd::FORMAT,
        PipelineMode {
            blend: BlendMode::None,
            ..Default::default()
        },
    );
    let additive = PipelineId::compose(
        PipelineType::Triangles,
        VertexXyzd::FORMAT,
        PipelineMode {
            blend: BlendMode::AddBlend,
            ..Default::default()
        },
    );
    registry.register(opaque, &shader).unwrap();
    registry.register(additive, &shader).unwrap();

    let opaque_snapshot = device
        .pipeline_snapshot(registry.lookup(opaque).unwrap().pipeline)
        .unwrap();
    assert!(opaque_snapshot.blend.is_none());

    let additive_snapshot = device
        .pipeline_snapshot(registry.lookup(additive).unwrap().pipeline)
        .unwrap();
    let blend = additive_snapshot.blend.unwrap();
    assert_eq!(blend.color.src_factor, BlendFactor::One);
    assert_eq!(blend.color.dst_factor, BlendFactor::One);
    assert_eq!(blend.color.operation, BlendOperation::Add);
    assert_eq!(blend.alpha.src_factor, BlendFactor::One);
    assert_eq!(blend.alpha.dst_factor, BlendFactor::One);
}

#[test]
fn ccw_cull_flips_the_winding() {
    init_logger();
    let device = Arc::new(HeadlessDevice::new());
    let mut registry = registry_on(&device);
    let shader = TestShader::conforming("winding");

    let cw = PipelineId::compose(
        PipelineType::Triangles,
        VertexXyzd::FORMAT,
        PipelineMode {
            cull: CullFace::Cw,
            ..Default::default()
        },
    );
    let ccw = PipelineId::compose(
        PipelineType::Triangles,
        VertexXyzd::FORMAT,
        PipelineMode {
            cull: CullFace::Ccw,
            ..Default::default()
        },
    );
    registry.register(cw, &shader).unwrap();
    registry.register(ccw, &shader).unwrap();

    let cw_snapshot = device
        .pipeline_snapshot(registry.lookup(cw).unwrap().pipeline)
        .unwrap();
    let ccw_snapshot = device
        .pipeline_snapshot(registry.lookup(ccw).unwrap().pipeline)
        .unwrap();
    assert_eq!(cw_snapshot.front_face, FrontFace::Ccw);
    assert_eq!(ccw_snapshot.front_face, FrontFace::Cw);
    assert_eq!(cw_snapshot.cull_mode, ccw_snapshot.cull_mode);
}

#[test]
fn strip_topology_carries_an_index_format() {
    init_logger();
    let device = Arc::new(HeadlessDevice::new());
    let mut registry = registry_on(&device);
    let shader = TestShader::conforming("strip");

    let strip = PipelineId::compose(
        PipelineType::TriangleStrip,
        VertexXyzd::FORMAT,
        PipelineMode::default(),
    );
    let list = PipelineId::compose(
        PipelineType::Triangles,
        VertexXyzd::FORMAT,
        PipelineMode::default(),
    );
    registry.register(strip, &shader).unwrap();
    registry.register(list, &shader).unwrap();

    let strip_snapshot = device
        .pipeline_snapshot(registry.lookup(strip).unwrap().pipeline)
        .unwrap();
    assert_eq!(strip_snapshot.topology, PrimitiveTopology::TriangleStrip);
    assert_eq!(strip_snapshot.strip_index_format, Some(IndexFormat::Uint16));

    let list_snapshot = device
        .pipeline_snapshot(registry.lookup(list).unwrap().pipeline)
        .unwrap();
    assert_eq!(list_snapshot.strip_index_format, None);
}

#[test]
fn depth_mode_reaches_the_backend() {
    init_logger();
    let device = Arc::new(HeadlessDevice::new());
    let mut registry = registry_on(&device);
    let shader = TestShader::conforming("depth");

    let id = PipelineId::compose(
        PipelineType::Triangles,
        VertexXyzd::FORMAT,
        PipelineMode {
            depth_write: true,
            depth_cmp: DepthCompare::Greater,
            ..Default::default()
        },
    );
    registry.register(id, &shader).unwrap();

    let snapshot = device
        .pipeline_snapshot(registry.lookup(id).unwrap().pipeline)
        .unwrap();
    assert!(snapshot.depth_write_enabled);
    assert_eq!(
        snapshot.depth_compare,
        DepthCompare::Greater.to_compare_function()
    );
}

#[test]
fn duplicate_registration_keeps_the_first_record() {
    init_logger();
    let device = Arc::new(HeadlessDevice::new());
    let mut registry = registry_on(&device);
    let shader = TestShader::conforming("dup");

    let id = PipelineId::compose(
        PipelineType::Triangles,
        VertexXyzd::FORMAT,
        PipelineMode::default(),
    );
    registry.register(id, &shader).unwrap();
    let first = registry.lookup(id).unwrap().pipeline;

    assert_eq!(
        registry.register(id, &shader),
        Err(PipelineError::DuplicateRegistration { id })
    );
    assert_eq!(registry.lookup(id).unwrap().pipeline, first);
}

#[test]
fn lookup_outside_the_array_is_absent() {
    init_logger();
    let device = Arc::new(HeadlessDevice::new());
    let registry = registry_on(&device);

    assert!(registry.lookup(PipelineId(0)).is_none());
    assert!(registry.lookup(PipelineId(u32::MAX)).is_none());
}

#[test]
fn backend_failure_is_reported_not_stored() {
    init_logger();
    let device = Arc::new(HeadlessDevice::failing_pipelines());
    let mut registry = registry_on(&device);
    let shader = TestShader::conforming("fail");

    let id = PipelineId::compose(
        PipelineType::Triangles,
        VertexXyzd::FORMAT,
        PipelineMode::default(),
    );
    assert!(matches!(
        registry.register(id, &shader),
        Err(PipelineError::CompilationFailed { .. })
    ));
    assert!(registry.lookup(id).is_none());
}
