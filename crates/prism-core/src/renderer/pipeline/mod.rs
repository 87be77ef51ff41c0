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

//! Pipeline identification and the registry built on it.

pub mod binder;
pub mod key;
pub mod mode;
pub mod registry;

pub use binder::{resolve_vertex_attributes, validate_shader_contract};
pub use key::{PipelineId, PipelineType};
pub use mode::{BlendMode, CullFace, DepthCompare, PipelineMode, PIPELINE_MODE_VALUE_MAX};
pub use registry::{PipelineRecord, PipelineRegistry, PipelineSeed, RegistrationReport};
