//! Strict-mode checks for schema authoring mistakes.
//!
//! A misspelled keyword (`minLenght`) is silently ignored by a JSON Schema
//! validator, which turns a typo into a constraint that never fires. These
//! checks walk the schema document before it is compiled and reject anything
//! outside the JSON Schema vocabulary, unknown `format` names, and references
//! to documents other than the schema itself.

use anyhow::{Result, bail};
use serde_json::Value;

const KNOWN_KEYWORDS: &[&str] = &[
    // core
    "$schema",
    "$id",
    "$ref",
    "$comment",
    "$defs",
    "$anchor",
    "$dynamicRef",
    "$dynamicAnchor",
    "$recursiveRef",
    "$recursiveAnchor",
    "$vocabulary",
    "definitions",
    // annotations
    "title",
    "description",
    "default",
    "examples",
    "readOnly",
    "writeOnly",
    "deprecated",
    // any instance
    "type",
    "enum",
    "const",
    // numbers
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    // strings
    "maxLength",
    "minLength",
    "pattern",
    "format",
    "contentEncoding",
    "contentMediaType",
    "contentSchema",
    // arrays
    "items",
    "additionalItems",
    "prefixItems",
    "maxItems",
    "minItems",
    "uniqueItems",
    "contains",
    "maxContains",
    "minContains",
    "unevaluatedItems",
    // objects
    "maxProperties",
    "minProperties",
    "required",
    "properties",
    "patternProperties",
    "additionalProperties",
    "dependencies",
    "dependentRequired",
    "dependentSchemas",
    "propertyNames",
    "unevaluatedProperties",
    // applicators
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "if",
    "then",
    "else",
];

const KNOWN_FORMATS: &[&str] = &[
    "date",
    "date-time",
    "duration",
    "email",
    "hostname",
    "idn-email",
    "idn-hostname",
    "ipv4",
    "ipv6",
    "iri",
    "iri-reference",
    "json-pointer",
    "regex",
    "relative-json-pointer",
    "time",
    "uri",
    "uri-reference",
    "uri-template",
    "uuid",
];

// Keywords whose value is a single subschema.
const SCHEMA_VALUED: &[&str] = &[
    "additionalItems",
    "additionalProperties",
    "contains",
    "contentSchema",
    "else",
    "if",
    "not",
    "propertyNames",
    "then",
    "unevaluatedItems",
    "unevaluatedProperties",
];

// Keywords whose value is an array of subschemas.
const SCHEMA_ARRAYS: &[&str] = &["allOf", "anyOf", "oneOf", "prefixItems"];

// Keywords whose value maps names to subschemas.
const SCHEMA_MAPS: &[&str] = &[
    "$defs",
    "definitions",
    "dependentSchemas",
    "patternProperties",
    "properties",
];

/// Walk `schema` and fail with every strict-mode problem found.
pub fn check_schema(schema: &Value) -> Result<()> {
    let mut problems = Vec::new();
    walk(schema, "#", &mut problems);
    if problems.is_empty() {
        return Ok(());
    }
    bail!("{}", problems.join("; "))
}

fn walk(schema: &Value, location: &str, problems: &mut Vec<String>) {
    let Some(object) = schema.as_object() else {
        if !schema.is_boolean() {
            problems.push(format!("{location}: schema must be an object or boolean"));
        }
        return;
    };

    for (keyword, value) in object {
        let here = format!("{location}/{}", escape_pointer(keyword));
        if !KNOWN_KEYWORDS.contains(&keyword.as_str()) {
            problems.push(format!("{location}: unknown keyword \"{keyword}\""));
            continue;
        }
        match keyword.as_str() {
            "$ref" => {
                if let Some(reference) = value.as_str() {
                    if !reference.starts_with('#') {
                        problems.push(format!(
                            "{location}: external reference \"{reference}\" is not allowed"
                        ));
                    }
                }
            }
            "format" => {
                if let Some(format) = value.as_str() {
                    if !KNOWN_FORMATS.contains(&format) {
                        problems.push(format!("{location}: unknown format \"{format}\""));
                    }
                }
            }
            "items" => match value {
                Value::Array(schemas) => walk_each(schemas, &here, problems),
                other => walk(other, &here, problems),
            },
            "dependencies" => {
                if let Some(map) = value.as_object() {
                    for (name, dependency) in map {
                        // Array values are property lists, not schemas.
                        if !dependency.is_array() {
                            let nested = format!("{here}/{}", escape_pointer(name));
                            walk(dependency, &nested, problems);
                        }
                    }
                }
            }
            k if SCHEMA_VALUED.contains(&k) => walk(value, &here, problems),
            k if SCHEMA_ARRAYS.contains(&k) => {
                if let Some(schemas) = value.as_array() {
                    walk_each(schemas, &here, problems);
                }
            }
            k if SCHEMA_MAPS.contains(&k) => {
                if let Some(map) = value.as_object() {
                    for (name, nested_schema) in map {
                        let nested = format!("{here}/{}", escape_pointer(name));
                        walk(nested_schema, &nested, problems);
                    }
                }
            }
            _ => {}
        }
    }
}

fn walk_each(schemas: &[Value], location: &str, problems: &mut Vec<String>) {
    for (idx, schema) in schemas.iter().enumerate() {
        walk(schema, &format!("{location}/{idx}"), problems);
    }
}

fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
