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

//! Common, backend-agnostic enums shared across the rendering API.

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

/// The index type used by every draw buffer in the engine.
pub type DrawIndex = u16;

/// The [`IndexFormat`] matching [`DrawIndex`].
pub const DRAW_INDEX_FORMAT: IndexFormat = if std::mem::size_of::<DrawIndex>() == 2 {
    IndexFormat::Uint16
} else {
    IndexFormat::Uint32
};

/// A backend-agnostic representation of a graphics API.
///
/// Shader reflection tables use this to hand out the source variant compiled
/// for the active backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsBackendType {
    /// Vulkan API.
    Vulkan,
    /// Apple's Metal API.
    Metal,
    /// Microsoft's DirectX 12 API.
    Dx12,
    /// OpenGL API.
    OpenGL,
    /// WebGPU API (for web builds).
    WebGpu,
    /// A backend that creates no GPU objects; used for tests and CI.
    Headless,
    /// An unknown or unsupported backend.
    #[default]
    Unknown,
}

/// Defines the programmable stage in the graphics pipeline a shader resource
/// binding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The fragment (or pixel) shader stage.
    Fragment,
}

/// The texture format of a render target attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit per channel RGBA, linear.
    Rgba8Unorm,
    /// 8-bit per channel RGBA, sRGB.
    Rgba8UnormSrgb,
    /// 8-bit per channel BGRA, linear.
    Bgra8Unorm,
    /// 8-bit per channel BGRA, sRGB.
    Bgra8UnormSrgb,
    /// 32-bit float depth.
    Depth32Float,
    /// 24-bit depth with 8-bit stencil.
    Depth24PlusStencil8,
}

impl TextureFormat {
    /// Returns `true` if this format carries a depth aspect.
    pub const fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::Depth32Float | TextureFormat::Depth24PlusStencil8
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_index_format_matches_index_type() {
        assert_eq!(DRAW_INDEX_FORMAT, IndexFormat::Uint16);
        assert_eq!(std::mem::size_of::<DrawIndex>(), 2);
    }

    #[test]
    fn depth_formats_are_depth() {
        assert!(TextureFormat::Depth24PlusStencil8.is_depth());
        assert!(!TextureFormat::Bgra8UnormSrgb.is_depth());
    }
}
