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

//! Settings for the pipeline registry.

use crate::renderer::api::common::TextureFormat;

/// A collection of settings that shape how pipelines are registered.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// If `true`, shader modules are deduplicated by label across pipelines
    /// built from the same shader source.
    pub share_shader_modules: bool,
    /// The color target format every registered pipeline renders to.
    pub color_format: TextureFormat,
    /// The depth/stencil target format every registered pipeline renders to.
    pub depth_format: TextureFormat,
    /// If `true`, each successful registration is logged at info level
    /// instead of debug.
    pub log_registrations: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            share_shader_modules: true,
            color_format: TextureFormat::Bgra8UnormSrgb,
            depth_format: TextureFormat::Depth24PlusStencil8,
            log_registrations: false,
        }
    }
}
