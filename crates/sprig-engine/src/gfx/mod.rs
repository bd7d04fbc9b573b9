//! Thin wrappers over wgpu resources: buffers, shaders, vertex layouts,
//! textures, framebuffers and the resident texture table.

mod buffer;
mod framebuffer;
mod registry;
mod shader;
mod texture;
mod vertex_input;

pub use buffer::{BufferUsage, DeviceBuffer};
pub use framebuffer::Framebuffer;
pub use registry::{TextureRef, TextureRegistry};
pub use shader::{
    AttributeType, ResourceKind, Shader, ShaderAttribute, ShaderError, ShaderProgram, ShaderStage,
    ShaderUniform,
};
pub use texture::{Texture2D, TextureFormat};
pub use vertex_input::VertexInput;
