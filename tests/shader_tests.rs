//! Parse and validate the generated WGSL with naga, the same front end wgpu
//! runs when a shader module is created.

use immersive::gpu::shaders::{mesh_shader, point_shader};
use naga::valid::{Capabilities, ValidationFlags, Validator};

fn validate(name: &str, source: &str) -> naga::Module {
    let module = match naga::front::wgsl::parse_str(source) {
        Ok(module) => module,
        Err(e) => panic!("{} failed to parse:\n{}", name, e.emit_to_string(source)),
    };
    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    if let Err(e) = validator.validate(&module) {
        panic!("{} failed validation: {:?}", name, e);
    }
    module
}

fn entry_points(module: &naga::Module) -> Vec<(&str, naga::ShaderStage)> {
    module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect()
}

#[test]
fn test_point_shader_is_valid() {
    let module = validate("point shader", &point_shader());
    let entries = entry_points(&module);
    assert!(entries.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(entries.contains(&("fs_main", naga::ShaderStage::Fragment)));
}

#[test]
fn test_mesh_shader_is_valid() {
    let module = validate("mesh shader", &mesh_shader());
    let entries = entry_points(&module);
    assert!(entries.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(entries.contains(&("fs_main", naga::ShaderStage::Fragment)));
}
