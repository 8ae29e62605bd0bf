//! `/key:value` parameters following the positional arguments

use soap_client_generator_common::GeneratorError;
use std::path::PathBuf;

/// Overrides given as trailing parameters
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    /// `/tool:<path>` or `/svcutil:<path>`
    pub tool: Option<PathBuf>,
}

/// Parse trailing parameters
///
/// Every token must read `/key:value` or `/key`; keys are case-insensitive.
/// Unknown keys and keys missing a required value are rejected.
pub fn parse_parameters(tokens: &[String]) -> Result<Parameters, GeneratorError> {
    let mut parameters = Parameters::default();

    for token in tokens {
        let body = token
            .strip_prefix('/')
            .ok_or_else(|| GeneratorError::MalformedParameter(token.clone()))?;
        let (key, value) = match body.split_once(':') {
            Some((key, value)) => (key, Some(value)),
            None => (body, None),
        };

        match (key.to_ascii_lowercase().as_str(), value) {
            ("tool" | "svcutil", Some(path)) if !path.is_empty() => {
                parameters.tool = Some(PathBuf::from(path));
            }
            _ => return Err(GeneratorError::MalformedParameter(key.to_string())),
        }
    }

    Ok(parameters)
}
