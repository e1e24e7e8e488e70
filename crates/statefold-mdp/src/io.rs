use std::{fs, path::Path};

use crate::{CompiledMdp, MdpError, MdpSpec};

/// Parse and validate an MDP spec from YAML text.
pub fn parse_yaml(yaml: &str) -> Result<MdpSpec, MdpError> {
    let spec: MdpSpec = serde_yaml::from_str(yaml)?;
    spec.validate()?;
    Ok(spec)
}

/// Load and validate an MDP spec from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<MdpSpec, MdpError> {
    parse_yaml(&fs::read_to_string(path)?)
}

/// Load and compile an MDP from a YAML file.
pub fn compile_yaml(path: impl AsRef<Path>) -> Result<CompiledMdp, MdpError> {
    load_yaml(path)?.compile()
}

/// Validate, serialize and write an MDP spec to YAML.
pub fn save_yaml(path: impl AsRef<Path>, spec: &MdpSpec) -> Result<(), MdpError> {
    spec.validate()?;
    fs::write(path, serde_yaml::to_string(spec)?)?;
    Ok(())
}
