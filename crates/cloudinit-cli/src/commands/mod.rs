pub mod check;
pub mod objects;
pub mod render;

use cloudinit_core::{ConfigParameters, ExError, ExErrorKind};
use std::path::Path;

pub type CommandResult = Result<i32, Box<dyn std::error::Error>>;

/// True for `.json` files; everything else is read as YAML
pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub(crate) fn io_error(op: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op)
        .with_object(path.display().to_string())
        .with_message(err.to_string())
}

/// Load declared parameters from a YAML or JSON file
pub(crate) fn load_config(path: &Path) -> Result<ConfigParameters, ExError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error("read_config", path, e))?;
    let params = if is_json(path) {
        ConfigParameters::from_json_str(&text)?
    } else {
        ConfigParameters::from_yaml_str(&text)?
    };
    tracing::debug!(config = %path.display(), parts = params.part.len(), "loaded config");
    Ok(params)
}
