//! WGSL shader stages and linked programs.
//!
//! Sources are parsed and validated with naga before anything reaches the
//! device, so a broken shader produces an info log and an invalid object
//! instead of a device error. The parsed module is also reflected: vertex
//! inputs become [`ShaderAttribute`]s and resource bindings become
//! [`ShaderUniform`]s.

use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn matches(self, stage: naga::ShaderStage) -> bool {
        match self {
            ShaderStage::Vertex => stage == naga::ShaderStage::Vertex,
            ShaderStage::Fragment => stage == naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

// ── errors ────────────────────────────────────────────────────────────────

/// Why a shader or program is invalid. The rendered message is what ends up
/// in the info log.
#[derive(Debug, Clone)]
pub enum ShaderError {
    Parse(String),
    Validation(String),
    MissingEntryPoint(ShaderStage),
    StageMismatch { expected: ShaderStage, found: ShaderStage },
    InvalidStage(ShaderStage),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Parse(log) => write!(f, "parse error:\n{log}"),
            ShaderError::Validation(log) => write!(f, "validation error:\n{log}"),
            ShaderError::MissingEntryPoint(stage) => {
                write!(f, "no {stage} entry point in shader source")
            }
            ShaderError::StageMismatch { expected, found } => {
                write!(f, "expected a {expected} shader, got a {found} shader")
            }
            ShaderError::InvalidStage(stage) => {
                write!(f, "cannot link: {stage} shader failed to compile")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

// ── reflection types ──────────────────────────────────────────────────────

/// Type of a vertex input as declared in the shader.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeType {
    Float(u8),
    Int(u8),
    UInt(u8),
    Double(u8),
}

impl AttributeType {
    pub fn components(self) -> u8 {
        match self {
            AttributeType::Float(n)
            | AttributeType::Int(n)
            | AttributeType::UInt(n)
            | AttributeType::Double(n) => n,
        }
    }

    /// Vertex buffer format that feeds this input without conversion.
    pub fn vertex_format(self) -> Option<wgpu::VertexFormat> {
        use wgpu::VertexFormat as F;
        Some(match self {
            AttributeType::Float(1) => F::Float32,
            AttributeType::Float(2) => F::Float32x2,
            AttributeType::Float(3) => F::Float32x3,
            AttributeType::Float(4) => F::Float32x4,
            AttributeType::Int(1) => F::Sint32,
            AttributeType::Int(2) => F::Sint32x2,
            AttributeType::Int(3) => F::Sint32x3,
            AttributeType::Int(4) => F::Sint32x4,
            AttributeType::UInt(1) => F::Uint32,
            AttributeType::UInt(2) => F::Uint32x2,
            AttributeType::UInt(3) => F::Uint32x3,
            AttributeType::UInt(4) => F::Uint32x4,
            AttributeType::Double(1) => F::Float64,
            AttributeType::Double(2) => F::Float64x2,
            AttributeType::Double(3) => F::Float64x3,
            AttributeType::Double(4) => F::Float64x4,
            _ => return None,
        })
    }

    fn from_naga(inner: &naga::TypeInner) -> Option<Self> {
        let (scalar, count) = match *inner {
            naga::TypeInner::Scalar(scalar) => (scalar, 1),
            naga::TypeInner::Vector { size, scalar } => (scalar, size as u8),
            _ => return None,
        };
        match (scalar.kind, scalar.width) {
            (naga::ScalarKind::Float, 4) => Some(AttributeType::Float(count)),
            (naga::ScalarKind::Float, 8) => Some(AttributeType::Double(count)),
            (naga::ScalarKind::Sint, 4) => Some(AttributeType::Int(count)),
            (naga::ScalarKind::Uint, 4) => Some(AttributeType::UInt(count)),
            _ => None,
        }
    }
}

/// A vertex input of a linked program.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderAttribute {
    pub location: u32,
    pub name: String,
    pub ty: AttributeType,
    /// Size in bytes of one element.
    pub size: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    UniformBuffer,
    StorageBuffer,
    Texture,
    TextureArray,
    Sampler,
    Other,
}

/// A resource binding (`@group(g) @binding(b)`) used by a program.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderUniform {
    pub group: u32,
    pub binding: u32,
    pub name: String,
    pub kind: ResourceKind,
}

// ── shader ────────────────────────────────────────────────────────────────

/// One compiled stage.
///
/// Construction never fails; check [`Shader::is_valid`] and read
/// [`Shader::info_log`] for diagnostics.
pub struct Shader {
    stage: ShaderStage,
    module: Option<wgpu::ShaderModule>,
    ir: Option<naga::Module>,
    entry_point: Option<String>,
    error: Option<ShaderError>,
    info_log: String,
}

impl Shader {
    /// Parses, validates and uploads a WGSL `source` for `stage`.
    pub fn compile(device: &wgpu::Device, stage: ShaderStage, source: &str) -> Self {
        let parsed = parse_and_validate(source);
        let module = parsed
            .is_ok()
            .then(|| create_module(device, &format!("sprig {stage} shader"), source));
        Self::from_parsed(stage, parsed, module)
    }

    /// Device-independent half of [`Shader::compile`].
    #[cfg(test)]
    fn front_end(stage: ShaderStage, source: &str) -> Self {
        Self::from_parsed(stage, parse_and_validate(source), None)
    }

    /// Builds the `stage` half of an already parsed source. `module` is the
    /// device module for that source, if one was created.
    fn from_parsed(
        stage: ShaderStage,
        parsed: Result<naga::Module, ShaderError>,
        module: Option<wgpu::ShaderModule>,
    ) -> Self {
        let mut shader = Self {
            stage,
            module: None,
            ir: None,
            entry_point: None,
            error: None,
            info_log: String::new(),
        };

        match parsed {
            Ok(ir) => match ir.entry_points.iter().find(|ep| stage.matches(ep.stage)) {
                Some(ep) => {
                    shader.entry_point = Some(ep.name.clone());
                    shader.ir = Some(ir);
                    shader.module = module;
                }
                None => shader.fail(ShaderError::MissingEntryPoint(stage)),
            },
            Err(e) => shader.fail(e),
        }

        shader
    }

    fn fail(&mut self, error: ShaderError) {
        self.info_log = error.to_string();
        log::error!("{} shader: {}", self.stage, self.info_log);
        self.error = Some(error);
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Empty when the shader compiled cleanly.
    #[inline]
    pub fn info_log(&self) -> &str {
        &self.info_log
    }

    #[inline]
    pub fn error(&self) -> Option<&ShaderError> {
        self.error.as_ref()
    }

    #[inline]
    pub fn entry_point(&self) -> Option<&str> {
        self.entry_point.as_deref()
    }
}

fn parse_and_validate(source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| ShaderError::Parse(e.emit_to_string(source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| ShaderError::Validation(e.emit_to_string(source)))?;

    Ok(module)
}

fn create_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

// ── program ───────────────────────────────────────────────────────────────

/// A vertex and fragment stage linked into one program.
///
/// An invalid program keeps its info log and reflection stays empty; renderers
/// must not build pipelines from it (see [`ShaderProgram::stages`]).
pub struct ShaderProgram {
    vertex: Shader,
    fragment: Shader,
    attributes: Vec<ShaderAttribute>,
    uniforms: Vec<ShaderUniform>,
    error: Option<ShaderError>,
    info_log: String,
}

impl ShaderProgram {
    pub fn link(vertex: Shader, fragment: Shader) -> Self {
        let mut program = Self {
            vertex,
            fragment,
            attributes: Vec::new(),
            uniforms: Vec::new(),
            error: None,
            info_log: String::new(),
        };

        if let Err(e) = program.check_stages() {
            program.info_log = e.to_string();
            log::error!("shader program link failed: {}", program.info_log);
            program.error = Some(e);
            return program;
        }

        if let (Some(vs_ir), Some(vs_entry)) = (&program.vertex.ir, &program.vertex.entry_point) {
            program.attributes = reflect_attributes(vs_ir, vs_entry);
            program.uniforms = reflect_uniforms(vs_ir);
        }
        if let Some(fs_ir) = &program.fragment.ir {
            for u in reflect_uniforms(fs_ir) {
                if !program
                    .uniforms
                    .iter()
                    .any(|known| known.group == u.group && known.binding == u.binding)
                {
                    program.uniforms.push(u);
                }
            }
        }
        program.uniforms.sort_by_key(|u| (u.group, u.binding));

        log::debug!(
            "shader program linked: {} attributes, {} bindings",
            program.attributes.len(),
            program.uniforms.len()
        );

        program
    }

    /// Compiles both stages from one WGSL source holding a vertex and a
    /// fragment entry point. The source is parsed once and uploaded as a
    /// single device module shared by both stages.
    pub fn from_wgsl(device: &wgpu::Device, source: &str) -> Self {
        let parsed = parse_and_validate(source);
        let module = parsed
            .is_ok()
            .then(|| create_module(device, "sprig shader program", source));
        Self::link_parsed(parsed, module)
    }

    fn link_parsed(
        parsed: Result<naga::Module, ShaderError>,
        module: Option<wgpu::ShaderModule>,
    ) -> Self {
        let vertex = Shader::from_parsed(ShaderStage::Vertex, parsed.clone(), module.clone());
        Self::link(vertex, Shader::from_parsed(ShaderStage::Fragment, parsed, module))
    }

    fn check_stages(&self) -> Result<(), ShaderError> {
        for (shader, expected) in [
            (&self.vertex, ShaderStage::Vertex),
            (&self.fragment, ShaderStage::Fragment),
        ] {
            if shader.stage != expected {
                return Err(ShaderError::StageMismatch { expected, found: shader.stage });
            }
            if !shader.is_valid() {
                return Err(ShaderError::InvalidStage(expected));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    #[inline]
    pub fn info_log(&self) -> &str {
        &self.info_log
    }

    /// Vertex inputs, sorted by location.
    #[inline]
    pub fn attributes(&self) -> &[ShaderAttribute] {
        &self.attributes
    }

    /// Resource bindings of both stages, sorted by `(group, binding)`.
    #[inline]
    pub fn uniforms(&self) -> &[ShaderUniform] {
        &self.uniforms
    }

    /// Vertex and fragment `(module, entry point)` pairs, or `None` if the
    /// program is not valid (or was built without a device).
    pub fn stages(&self) -> Option<[(&wgpu::ShaderModule, &str); 2]> {
        if !self.is_valid() {
            return None;
        }
        Some([
            (self.vertex.module.as_ref()?, self.vertex.entry_point()?),
            (self.fragment.module.as_ref()?, self.fragment.entry_point()?),
        ])
    }
}

// ── reflection ────────────────────────────────────────────────────────────

fn reflect_attributes(module: &naga::Module, entry_point: &str) -> Vec<ShaderAttribute> {
    let Some(ep) = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga::ShaderStage::Vertex && ep.name == entry_point)
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        let ty = &module.types[arg.ty];
        match (&arg.binding, &ty.inner) {
            (Some(binding), inner) => {
                push_attribute(&mut out, binding, arg.name.as_deref(), inner);
            }
            (None, naga::TypeInner::Struct { members, .. }) => {
                for member in members {
                    if let Some(binding) = &member.binding {
                        let inner = &module.types[member.ty].inner;
                        push_attribute(&mut out, binding, member.name.as_deref(), inner);
                    }
                }
            }
            (None, _) => {}
        }
    }

    out.sort_by_key(|a| a.location);
    out
}

fn push_attribute(
    out: &mut Vec<ShaderAttribute>,
    binding: &naga::Binding,
    name: Option<&str>,
    inner: &naga::TypeInner,
) {
    let naga::Binding::Location { location, .. } = *binding else {
        // Built-ins such as vertex_index are not fed from buffers.
        return;
    };
    let Some(ty) = AttributeType::from_naga(inner) else {
        log::warn!("vertex input @location({location}) has an unsupported type; skipped");
        return;
    };
    let size = ty.vertex_format().map(|f| f.size() as u32).unwrap_or(0);
    out.push(ShaderAttribute {
        location,
        name: name.unwrap_or_default().to_owned(),
        ty,
        size,
    });
}

fn reflect_uniforms(module: &naga::Module) -> Vec<ShaderUniform> {
    let mut out = Vec::new();
    for (_, var) in module.global_variables.iter() {
        let Some(rb) = &var.binding else { continue };
        let inner = &module.types[var.ty].inner;
        let kind = match (var.space, inner) {
            (naga::AddressSpace::Uniform, _) => ResourceKind::UniformBuffer,
            (naga::AddressSpace::Storage { .. }, _) => ResourceKind::StorageBuffer,
            (_, naga::TypeInner::Image { .. }) => ResourceKind::Texture,
            (_, naga::TypeInner::Sampler { .. }) => ResourceKind::Sampler,
            (_, naga::TypeInner::BindingArray { .. }) => ResourceKind::TextureArray,
            _ => ResourceKind::Other,
        };
        out.push(ShaderUniform {
            group: rb.group,
            binding: rb.binding,
            name: var.name.clone().unwrap_or_default(),
            kind,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH_WGSL: &str = include_str!("../render/batch/shaders/batch.wgsl");

    fn link_front_end(source: &str) -> ShaderProgram {
        ShaderProgram::link(
            Shader::front_end(ShaderStage::Vertex, source),
            Shader::front_end(ShaderStage::Fragment, source),
        )
    }

    #[test]
    fn batch_shader_reflects_vertex_inputs() {
        let program = link_front_end(BATCH_WGSL);
        assert!(program.is_valid(), "{}", program.info_log());

        let attrs = program.attributes();
        let summary: Vec<_> = attrs.iter().map(|a| (a.location, a.ty, a.size)).collect();
        assert_eq!(
            summary,
            vec![
                (0, AttributeType::Float(4), 16),
                (1, AttributeType::Float(4), 16),
                (2, AttributeType::Float(2), 8),
                (3, AttributeType::UInt(2), 8),
            ]
        );
        assert_eq!(attrs[0].name, "position");
    }

    #[test]
    fn batch_shader_reflects_bindings() {
        let program = link_front_end(BATCH_WGSL);
        let kinds: Vec<_> = program
            .uniforms()
            .iter()
            .map(|u| (u.group, u.binding, u.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (0, 0, ResourceKind::UniformBuffer),
                (1, 0, ResourceKind::TextureArray),
                (1, 1, ResourceKind::Sampler),
            ]
        );
    }

    #[test]
    fn syntax_error_is_reported_not_fatal() {
        let shader = Shader::front_end(ShaderStage::Vertex, "fn vs_main( -> {");
        assert!(!shader.is_valid());
        assert!(matches!(shader.error(), Some(ShaderError::Parse(_))));
        assert!(!shader.info_log().is_empty());
    }

    #[test]
    fn missing_entry_point_is_invalid() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let shader = Shader::front_end(ShaderStage::Vertex, src);
        assert!(matches!(
            shader.error(),
            Some(ShaderError::MissingEntryPoint(ShaderStage::Vertex))
        ));
    }

    #[test]
    fn program_with_invalid_stage_has_no_pipeline_stages() {
        let program = ShaderProgram::link(
            Shader::front_end(ShaderStage::Vertex, "not wgsl"),
            Shader::front_end(ShaderStage::Fragment, BATCH_WGSL),
        );
        assert!(!program.is_valid());
        assert!(program.info_log().contains("vertex"));
        assert!(program.attributes().is_empty());
        assert!(program.stages().is_none());
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let program = ShaderProgram::link(
            Shader::front_end(ShaderStage::Fragment, BATCH_WGSL),
            Shader::front_end(ShaderStage::Vertex, BATCH_WGSL),
        );
        assert!(matches!(program.error, Some(ShaderError::StageMismatch { .. })));
    }

    #[test]
    fn one_parse_yields_both_stages() {
        let program = ShaderProgram::link_parsed(parse_and_validate(BATCH_WGSL), None);
        assert!(program.is_valid(), "{}", program.info_log());
        assert_eq!(program.vertex.entry_point(), Some("vs_main"));
        assert_eq!(program.fragment.entry_point(), Some("fs_main"));
        assert!(program.vertex.ir.is_some() && program.fragment.ir.is_some());
    }

    #[test]
    fn shared_parse_error_invalidates_both_stages() {
        let program = ShaderProgram::link_parsed(parse_and_validate("fn ("), None);
        assert!(!program.is_valid());
        assert!(matches!(program.vertex.error(), Some(ShaderError::Parse(_))));
        assert!(matches!(program.fragment.error(), Some(ShaderError::Parse(_))));
        assert!(program.stages().is_none());
    }

    #[test]
    fn builtin_inputs_are_not_attributes() {
        let src = r#"
            @vertex
            fn vs_main(@builtin(vertex_index) i: u32, @location(2) offset: vec2<i32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(f32(i) + f32(offset.x), 0.0, 0.0, 1.0);
            }
            @fragment
            fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }
        "#;
        let program = link_front_end(src);
        assert!(program.is_valid(), "{}", program.info_log());
        assert_eq!(program.attributes().len(), 1);
        assert_eq!(program.attributes()[0].location, 2);
        assert_eq!(program.attributes()[0].ty, AttributeType::Int(2));
    }
}
