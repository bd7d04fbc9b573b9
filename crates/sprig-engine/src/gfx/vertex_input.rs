use super::shader::ShaderProgram;

/// Vertex buffer layout builder.
///
/// Attributes are appended to the current binding (vertex buffer slot) with
/// tightly packed offsets; [`VertexInput::next_binding`] starts a new slot.
/// Shader locations keep counting across bindings since wgpu requires them to
/// be unique within a pipeline.
#[derive(Debug, Clone)]
pub struct VertexInput {
    bindings: Vec<BindingLayout>,
    next_location: u32,
}

#[derive(Debug, Clone)]
struct BindingLayout {
    attributes: Vec<wgpu::VertexAttribute>,
    stride: u64,
    step_mode: wgpu::VertexStepMode,
}

impl BindingLayout {
    fn new() -> Self {
        Self {
            attributes: Vec::new(),
            stride: 0,
            step_mode: wgpu::VertexStepMode::Vertex,
        }
    }
}

impl Default for VertexInput {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexInput {
    pub fn new() -> Self {
        Self {
            bindings: vec![BindingLayout::new()],
            next_location: 0,
        }
    }

    /// Derives a single-binding layout from the program's reflected vertex
    /// inputs, packed in location order.
    pub fn from_program(program: &ShaderProgram) -> Self {
        let mut input = Self::new();
        for attr in program.attributes() {
            match attr.ty.vertex_format() {
                Some(format) => {
                    input.push(attr.location, format);
                }
                None => log::warn!(
                    "VertexInput: attribute `{}` at location {} has no vertex format",
                    attr.name,
                    attr.location
                ),
            }
        }
        input
    }

    /// Appends an attribute of `format` at the next shader location.
    pub fn add_attribute(&mut self, format: wgpu::VertexFormat) -> &mut Self {
        let location = self.next_location;
        self.push(location, format)
    }

    fn push(&mut self, location: u32, format: wgpu::VertexFormat) -> &mut Self {
        let binding = self.current();
        binding.attributes.push(wgpu::VertexAttribute {
            format,
            offset: binding.stride,
            shader_location: location,
        });
        binding.stride += format.size();
        self.next_location = self.next_location.max(location + 1);
        self
    }

    pub fn add_float(&mut self) -> &mut Self {
        self.add_attribute(wgpu::VertexFormat::Float32)
    }

    pub fn add_vec2(&mut self) -> &mut Self {
        self.add_attribute(wgpu::VertexFormat::Float32x2)
    }

    pub fn add_vec3(&mut self) -> &mut Self {
        self.add_attribute(wgpu::VertexFormat::Float32x3)
    }

    pub fn add_vec4(&mut self) -> &mut Self {
        self.add_attribute(wgpu::VertexFormat::Float32x4)
    }

    pub fn add_int(&mut self) -> &mut Self {
        self.add_attribute(wgpu::VertexFormat::Sint32)
    }

    pub fn add_uint(&mut self) -> &mut Self {
        self.add_attribute(wgpu::VertexFormat::Uint32)
    }

    pub fn add_double(&mut self) -> &mut Self {
        self.add_attribute(wgpu::VertexFormat::Float64)
    }

    /// Starts a new vertex buffer slot. Offsets restart at zero.
    pub fn next_binding(&mut self) -> &mut Self {
        self.bindings.push(BindingLayout::new());
        self
    }

    /// Makes the current binding advance per instance instead of per vertex.
    pub fn per_instance(&mut self) -> &mut Self {
        self.current().step_mode = wgpu::VertexStepMode::Instance;
        self
    }

    fn current(&mut self) -> &mut BindingLayout {
        let last = self.bindings.len() - 1;
        &mut self.bindings[last]
    }

    /// Byte stride of `binding`, or 0 if it does not exist.
    pub fn stride(&self, binding: usize) -> u64 {
        self.bindings.get(binding).map_or(0, |b| b.stride)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn attributes(&self, binding: usize) -> &[wgpu::VertexAttribute] {
        self.bindings.get(binding).map_or(&[], |b| &b.attributes)
    }

    /// Layouts to plug into `wgpu::VertexState::buffers`.
    pub fn layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        self.bindings
            .iter()
            .map(|b| wgpu::VertexBufferLayout {
                array_stride: b.stride,
                step_mode: b.step_mode,
                attributes: &b.attributes,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_pack_tightly() {
        let mut input = VertexInput::new();
        input.add_vec4().add_vec4().add_vec2().add_attribute(wgpu::VertexFormat::Uint32x2);

        let offsets: Vec<_> = input.attributes(0).iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 16, 32, 40]);
        assert_eq!(input.stride(0), 48);
    }

    #[test]
    fn next_binding_restarts_offsets_but_not_locations() {
        let mut input = VertexInput::new();
        input.add_vec3().add_float().next_binding().per_instance().add_vec2().add_double();

        assert_eq!(input.binding_count(), 2);
        assert_eq!(input.stride(0), 16);
        assert_eq!(input.stride(1), 16);

        let second = input.attributes(1);
        assert_eq!(second[0].offset, 0);
        assert_eq!(second[0].shader_location, 2);
        assert_eq!(second[1].offset, 8);
        assert_eq!(second[1].shader_location, 3);

        let layouts = input.layouts();
        assert_eq!(layouts[1].step_mode, wgpu::VertexStepMode::Instance);
    }

    #[test]
    fn missing_binding_has_zero_stride() {
        let input = VertexInput::new();
        assert_eq!(input.stride(3), 0);
        assert!(input.attributes(3).is_empty());
    }
}
