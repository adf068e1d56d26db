//! Compiled collection validator.
//!
//! Wraps `jsonschema::JSONSchema` with format checks on and every external
//! reference refused, and reports all violations of a document at once.

use anyhow::{Result, anyhow};
use jsonschema::{JSONSchema, SchemaResolver, SchemaResolverError};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// One schema violation: where in the instance, and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.message)
    }
}

/// Refuses every reference that would leave the schema document.
///
/// Same-document `#/...` references never reach a resolver, so anything that
/// does is a remote fetch.
struct OfflineResolver;

impl SchemaResolver for OfflineResolver {
    fn resolve(
        &self,
        _root_schema: &Value,
        url: &Url,
        original_reference: &str,
    ) -> Result<Arc<Value>, SchemaResolverError> {
        Err(anyhow!(
            "refusing to resolve '{original_reference}' ({url}): schemas are never fetched"
        ))
    }
}

pub struct ToolValidator {
    compiled: JSONSchema,
}

impl ToolValidator {
    /// Compile `schema`, validating it against its meta-schema first.
    pub fn compile(schema: &Value) -> Result<Self> {
        let compiled = JSONSchema::options()
            .with_resolver(OfflineResolver)
            .compile(schema)
            .map_err(|err| {
                let at = pointer_or_root(&err.instance_path.to_string());
                anyhow!("invalid schema at {at}: {err}")
            })?;
        Ok(Self { compiled })
    }

    /// Validate `instance`, returning every violation found.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<Violation>> {
        match self.compiled.validate(instance) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors
                .map(|err| Violation {
                    path: pointer_or_root(&err.instance_path.to_string()),
                    message: err.to_string(),
                })
                .collect()),
        }
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.is_valid(instance)
    }
}

fn pointer_or_root(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
