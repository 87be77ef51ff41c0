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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! Registration failures are local by design: they are reported through these
//! types (and aggregated into a startup report), never raised across the
//! registration boundary as panics.

use crate::renderer::api::common::ShaderStage;
use crate::renderer::pipeline::key::PipelineId;
use std::fmt;

/// A violation of the shader resource contract a pipeline depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The backend failed to build a shader module from its descriptor.
    CreationFailed {
        /// A descriptive label for the shader.
        label: String,
        /// Detailed error messages from the backend.
        details: String,
    },
    /// A required uniform block is not exposed by the shader.
    MissingUniformBlock {
        /// The stage the block was looked up in.
        stage: ShaderStage,
        /// The expected block name.
        name: &'static str,
        /// The label of the shader being validated.
        label: String,
    },
    /// A required uniform block exists but not at the mandated slot.
    WrongUniformBlockSlot {
        /// The stage the block was looked up in.
        stage: ShaderStage,
        /// The block name.
        name: &'static str,
        /// The slot the shader actually exposes.
        slot: u32,
        /// The label of the shader being validated.
        label: String,
    },
    /// A required uniform block has the wrong byte size.
    UniformBlockSizeMismatch {
        /// The stage the block was looked up in.
        stage: ShaderStage,
        /// The block name.
        name: &'static str,
        /// The byte size mandated by the contract.
        expected: usize,
        /// The byte size the shader actually exposes.
        found: usize,
        /// The label of the shader being validated.
        label: String,
    },
    /// An image slot required by the vertex format is not exposed.
    MissingImageSlot {
        /// The stage the image was looked up in.
        stage: ShaderStage,
        /// The image name.
        name: &'static str,
        /// The label of the shader being validated.
        label: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CreationFailed { label, details } => {
                write!(f, "Shader module creation failed for '{label}': {details}")
            }
            ShaderError::MissingUniformBlock { stage, name, label } => {
                write!(
                    f,
                    "Uniform block '{name}' ({stage:?}) not found in shader '{label}'"
                )
            }
            ShaderError::WrongUniformBlockSlot {
                stage,
                name,
                slot,
                label,
            } => {
                write!(
                    f,
                    "Uniform block '{name}' ({stage:?}) is at slot {slot}, expected 0, in shader '{label}'"
                )
            }
            ShaderError::UniformBlockSizeMismatch {
                stage,
                name,
                expected,
                found,
                label,
            } => {
                write!(
                    f,
                    "Uniform block '{name}' ({stage:?}) is {found} bytes, expected {expected}, in shader '{label}'"
                )
            }
            ShaderError::MissingImageSlot { stage, name, label } => {
                write!(
                    f,
                    "Image slot '{name}' ({stage:?}) not found in shader '{label}'"
                )
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error aborting the registration of a single pipeline identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The identifier does not decompose into a known (topology, vertex
    /// format, mode) triple.
    UnrepresentableId {
        /// The offending identifier.
        id: PipelineId,
    },
    /// The shader does not satisfy the resource contract for this format.
    ContractViolation(ShaderError),
    /// The graphics backend failed to compile the full pipeline state object.
    CompilationFailed {
        /// A descriptive label for the pipeline.
        label: String,
        /// Detailed error messages from the backend.
        details: String,
    },
    /// The decoded vertex format resolves to an empty layout.
    ZeroVertexStride {
        /// A descriptive label for the pipeline.
        label: String,
    },
    /// The identifier already holds a registered pipeline.
    DuplicateRegistration {
        /// The offending identifier.
        id: PipelineId,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::UnrepresentableId { id } => {
                write!(f, "Pipeline id {id:?} does not decompose into a valid triple")
            }
            PipelineError::ContractViolation(err) => {
                write!(f, "Shader contract violation: {err}")
            }
            PipelineError::CompilationFailed { label, details } => {
                write!(f, "Pipeline compilation failed for '{label}': {details}")
            }
            PipelineError::ZeroVertexStride { label } => {
                write!(f, "Pipeline '{label}' resolves to a zero vertex stride")
            }
            PipelineError::DuplicateRegistration { id } => {
                write!(f, "Pipeline id {id:?} is already registered")
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::ContractViolation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for PipelineError {
    fn from(err: ShaderError) -> Self {
        PipelineError::ContractViolation(err)
    }
}

/// An error originating from a concrete graphics backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// A generic resource could not be found.
    NotFound,
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::NotFound => write!(f, "Resource not found."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::MissingUniformBlock {
            stage: ShaderStage::Vertex,
            name: "vs_params",
            label: "color_tex1".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Uniform block 'vs_params' (Vertex) not found in shader 'color_tex1'"
        );
    }

    #[test]
    fn pipeline_error_wraps_shader_error() {
        let shader_err = ShaderError::MissingImageSlot {
            stage: ShaderStage::Fragment,
            name: "un_tex1",
            label: "color_tex2".to_string(),
        };
        let pipe_err: PipelineError = shader_err.into();
        assert_eq!(
            format!("{pipe_err}"),
            "Shader contract violation: Image slot 'un_tex1' (Fragment) not found in shader 'color_tex2'"
        );
        assert!(pipe_err.source().is_some());
    }

    #[test]
    fn resource_error_display() {
        let err = ResourceError::BackendError("device lost".to_string());
        assert_eq!(
            format!("{err}"),
            "Backend-specific resource error: device lost"
        );
    }
}
