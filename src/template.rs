//! Template-variable extraction
//!
//! Manifests may embed references to values that are only known at run time:
//! `bundle.outputs.<name>` for this bundle's own outputs and
//! `bundle.dependencies.<dependency>.outputs.<name>` for a dependency's
//! outputs. Substitution happens in the execution engine; this module only
//! discovers which variables a document uses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

#[allow(clippy::unwrap_used)]
static TEMPLATE_VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"bundle\.(?:dependencies\.[A-Za-z0-9_-]+\.outputs\.[A-Za-z0-9_-]+|outputs\.[A-Za-z0-9_-]+)",
    )
    .unwrap()
});

/// Collect the distinct template variables used anywhere in the document,
/// in first-occurrence order. Walks string values only, in document order.
pub fn extract_variables(document: &Value) -> Vec<String> {
    let mut variables = Vec::new();
    walk(document, &mut variables);
    variables
}

fn walk(value: &Value, variables: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            for found in TEMPLATE_VARIABLE.find_iter(text) {
                let variable = found.as_str().to_string();
                if !variables.contains(&variable) {
                    variables.push(variable);
                }
            }
        }
        Value::Sequence(items) => {
            for item in items {
                walk(item, variables);
            }
        }
        Value::Mapping(mapping) => {
            for (_, entry) in mapping {
                walk(entry, variables);
            }
        }
        Value::Tagged(tagged) => walk(&tagged.value, variables),
        _ => {}
    }
}

/// A parsed template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateVariableReference {
    /// `bundle.outputs.<name>`
    Output(String),
    /// `bundle.dependencies.<dependency>.outputs.<name>`
    DependencyOutput { dependency: String, output: String },
}

impl TemplateVariableReference {
    /// Parse an extracted variable. Returns `None` for strings that do not
    /// follow either recognized shape.
    pub fn parse(variable: &str) -> Option<Self> {
        let parts: Vec<&str> = variable.split('.').collect();
        match parts.as_slice() {
            ["bundle", "outputs", name] => Some(Self::Output((*name).to_string())),
            ["bundle", "dependencies", dependency, "outputs", output] => {
                Some(Self::DependencyOutput {
                    dependency: (*dependency).to_string(),
                    output: (*output).to_string(),
                })
            }
            _ => None,
        }
    }
}
