//! Template loading and management

use crate::printer::identifier;
use soap_client_generator_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Name of the output file shell template
pub const SOURCE_FILE: &str = "source_file.cs";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("cs_namespace", cs_namespace_filter);

    tera.add_raw_template(SOURCE_FILE, include_str!("../templates/source_file.cs.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load {} template: {}", SOURCE_FILE, e))
        })?;

    Ok(tera)
}

/// Filter escaping every segment of a dotted namespace that is a keyword
fn cs_namespace_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let namespace = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("cs_namespace filter expects a string"))?;

    let escaped: Vec<String> = namespace.split('.').map(identifier).collect();
    Ok(Value::String(escaped.join(".")))
}
