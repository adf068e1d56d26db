//! TypeScript declaration for a single catalog entry, derived from the schema.
//!
//! The UI imports `src/types/tool.ts` instead of restating the entry shape.
//! Rendering follows the conventions the front end already formats with:
//! two-space indentation, no semicolons, JSDoc blocks from `description`.

use crate::schema::loader::{ToolSchema, resolve_local_ref};
use anyhow::{Result, bail};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Entry properties whose item-count limits are validation-only.
pub const SIZE_CONSTRAINED_FIELDS: &[&str] = &["categories"];

const SIZE_KEYWORDS: &[&str] = &["minItems", "maxItems"];

// Longer bounded arrays fall back to `T[]` instead of enumerating tuples.
const MAX_TUPLE_LEN: u64 = 20;

const INDENT: &str = "  ";

static ANY_SCHEMA: Value = Value::Bool(true);

#[derive(Debug, Clone)]
pub struct TypegenOptions {
    pub type_name: String,
    /// Comment lines written above the declaration.
    pub banner: Vec<String>,
}

impl Default for TypegenOptions {
    fn default() -> Self {
        Self {
            type_name: "Tool".to_string(),
            banner: vec![
                "// biome-ignore lint: auto-generated file".to_string(),
                "// This file is auto-generated. Do not edit manually.".to_string(),
            ],
        }
    }
}

/// Render `export interface <type_name>` for the schema's entry sub-schema.
///
/// Item-count limits on `SIZE_CONSTRAINED_FIELDS` are dropped first so those
/// properties come out as plain arrays rather than tuple unions.
pub fn derive_entry_type(schema: &ToolSchema, options: &TypegenOptions) -> Result<String> {
    let root = schema.document();
    let mut entry = schema.entry_schema()?.clone();
    strip_size_constraints(root, &mut entry)?;

    if entry.get("type").and_then(Value::as_str) != Some("object")
        && entry.get("properties").is_none()
    {
        bail!("entry schema must describe an object");
    }

    let renderer = Renderer { root };
    let mut out = String::new();
    for line in &options.banner {
        out.push_str(line);
        out.push('\n');
    }
    if !options.banner.is_empty() {
        out.push('\n');
    }
    writeln!(out, "export interface {} {{", options.type_name)?;
    out.push_str(&renderer.object_body(&entry, 1)?);
    out.push_str("}\n");
    Ok(out)
}

fn strip_size_constraints(root: &Value, entry: &mut Value) -> Result<()> {
    for field in SIZE_CONSTRAINED_FIELDS {
        let Some(property) = entry.pointer_mut(&format!("/properties/{field}")) else {
            continue;
        };
        let resolved = resolve_local_ref(root, property)?.clone();
        *property = resolved;
        if let Some(object) = property.as_object_mut() {
            for keyword in SIZE_KEYWORDS {
                object.remove(*keyword);
            }
        }
    }
    Ok(())
}

struct Renderer<'a> {
    root: &'a Value,
}

impl Renderer<'_> {
    fn render(&self, schema: &Value, depth: usize) -> Result<String> {
        let schema = match schema {
            Value::Bool(true) => return Ok("unknown".to_string()),
            Value::Bool(false) => return Ok("never".to_string()),
            other => resolve_local_ref(self.root, other)?,
        };

        if let Some(literal) = schema.get("const") {
            return Ok(render_literal(literal));
        }
        if let Some(options) = schema.get("enum").and_then(Value::as_array) {
            let members: Vec<String> = options.iter().map(render_literal).collect();
            return Ok(union(members));
        }
        for combinator in ["anyOf", "oneOf"] {
            if let Some(members) = schema.get(combinator).and_then(Value::as_array) {
                let rendered = members
                    .iter()
                    .map(|member| self.render(member, depth))
                    .collect::<Result<Vec<_>>>()?;
                return Ok(union(rendered));
            }
        }
        if let Some(members) = schema.get("allOf").and_then(Value::as_array) {
            let rendered = members
                .iter()
                .map(|member| self.render(member, depth))
                .collect::<Result<Vec<_>>>()?;
            return Ok(rendered.join(" & "));
        }

        match schema.get("type") {
            Some(Value::String(kind)) => self.render_kind(kind, schema, depth),
            Some(Value::Array(kinds)) => {
                let rendered = kinds
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|kind| self.render_kind(kind, schema, depth))
                    .collect::<Result<Vec<_>>>()?;
                Ok(union(rendered))
            }
            _ if schema.get("properties").is_some() => self.render_kind("object", schema, depth),
            _ if schema.get("items").is_some() => self.render_kind("array", schema, depth),
            _ => Ok("unknown".to_string()),
        }
    }

    fn render_kind(&self, kind: &str, schema: &Value, depth: usize) -> Result<String> {
        Ok(match kind {
            "string" => "string".to_string(),
            "number" | "integer" => "number".to_string(),
            "boolean" => "boolean".to_string(),
            "null" => "null".to_string(),
            "array" => self.render_array(schema, depth)?,
            "object" => {
                let body = self.object_body(schema, depth + 1)?;
                format!("{{\n{body}{}}}", INDENT.repeat(depth))
            }
            other => bail!("unsupported schema type '{other}'"),
        })
    }

    fn render_array(&self, schema: &Value, depth: usize) -> Result<String> {
        let items = schema.get("items").unwrap_or(&ANY_SCHEMA);
        if let Value::Array(positional) = items {
            let rendered = positional
                .iter()
                .map(|item| self.render(item, depth))
                .collect::<Result<Vec<_>>>()?;
            return Ok(format!("[{}]", rendered.join(", ")));
        }

        let element = self.render(items, depth)?;
        let min = schema.get("minItems").and_then(Value::as_u64).unwrap_or(0);
        let max = schema.get("maxItems").and_then(Value::as_u64);

        match max {
            Some(max) if max >= min && max <= MAX_TUPLE_LEN => {
                let tuples = (min..=max).map(|len| tuple(&element, len, false)).collect();
                Ok(union(tuples))
            }
            _ if min > 0 && min <= MAX_TUPLE_LEN => Ok(tuple(&element, min, true)),
            _ => Ok(format!("{}[]", parenthesize(&element))),
        }
    }

    fn object_body(&self, schema: &Value, depth: usize) -> Result<String> {
        let pad = INDENT.repeat(depth);
        let required: BTreeSet<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let empty = Map::new();
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let mut out = String::new();
        for (name, property) in properties {
            let resolved = resolve_local_ref(self.root, property)?;
            if let Some(description) = resolved.get("description").and_then(Value::as_str) {
                writeln!(out, "{pad}/**")?;
                for line in description.lines() {
                    if line.trim().is_empty() {
                        writeln!(out, "{pad} *")?;
                    } else {
                        writeln!(out, "{pad} * {}", line.trim_end())?;
                    }
                }
                writeln!(out, "{pad} */")?;
            }
            let optional = if required.contains(name.as_str()) { "" } else { "?" };
            let rendered = self.render(property, depth)?;
            writeln!(out, "{pad}{}{optional}: {rendered}", property_key(name))?;
        }

        match schema.get("additionalProperties") {
            Some(Value::Bool(false)) => {}
            None | Some(Value::Bool(true)) => writeln!(out, "{pad}[k: string]: unknown")?,
            Some(extra) => {
                let rendered = self.render(extra, depth)?;
                writeln!(out, "{pad}[k: string]: {rendered}")?;
            }
        }
        Ok(out)
    }
}

fn tuple(element: &str, len: u64, open: bool) -> String {
    let mut slots: Vec<String> = (0..len).map(|_| element.to_string()).collect();
    if open {
        slots.push(format!("...{}[]", parenthesize(element)));
    }
    format!("[{}]", slots.join(", "))
}

fn union(members: Vec<String>) -> String {
    let mut unique: Vec<String> = Vec::with_capacity(members.len());
    for member in members {
        if !unique.contains(&member) {
            unique.push(member);
        }
    }
    match unique.len() {
        0 => "never".to_string(),
        _ => unique.join(" | "),
    }
}

fn parenthesize(element: &str) -> String {
    if !element.starts_with('{') && (element.contains(" | ") || element.contains(" & ")) {
        format!("({element})")
    } else {
        element.to_string()
    }
}

fn render_literal(value: &Value) -> String {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => value.to_string(),
        _ => "unknown".to_string(),
    }
}

fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        name.to_string()
    } else {
        Value::String(name.to_string()).to_string()
    }
}
