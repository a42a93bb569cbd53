//! Interpolation resolution for composite documents
//!
//! Fragments may reference named constants as `${name}`. Resolution runs once
//! over the assembled document against an explicitly passed context, so the
//! persisted file never carries an unresolved reference and no process-wide
//! registry exists.

use crate::error::{Error, Result};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Named constants substituted into `${name}` references.
#[derive(Debug, Clone, Default)]
pub struct ResolverContext {
    values: BTreeMap<String, Value>,
}

impl ResolverContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named value, replacing any previous binding.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The audio constants the SVC fragments reference, plus a null
    /// `ddp_strategy` (the distributed helper is a pass-through descriptor;
    /// this tool never probes hardware).
    pub fn svc_defaults() -> Self {
        Self::new()
            .with("mel_channels", 128u64)
            .with("sampling_rate", 44100u64)
            .with("hidden_size", 257u64)
            .with("n_fft", 2048u64)
            .with("hop_length", 256u64)
            .with("win_length", 2048u64)
            .with("ddp_strategy", Value::Null)
    }
}

/// Replace every `${name}` reference in `value` with the context's value.
///
/// A string scalar that is exactly one reference takes the context value with
/// its type intact; references embedded in longer strings are substituted
/// textually. An unknown name is an error.
pub fn resolve(value: &mut Value, ctx: &ResolverContext) -> Result<()> {
    match value {
        Value::String(s) => {
            if let Some(name) = exact_reference(s) {
                let resolved = ctx
                    .get(name)
                    .ok_or_else(|| Error::UnknownResolver(name.to_string()))?;
                *value = resolved.clone();
            } else if s.contains("${") {
                *s = substitute(s, ctx)?;
            }
        }
        Value::Sequence(items) => {
            for item in items {
                resolve(item, ctx)?;
            }
        }
        Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                resolve(v, ctx)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// The resolver name if `s` is exactly one `${name}` reference.
fn exact_reference(s: &str) -> Option<&str> {
    let inner = s.strip_prefix("${")?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains('$') || inner.contains('}') {
        return None;
    }
    Some(inner)
}

fn substitute(s: &str, ctx: &ResolverContext) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| Error::UnknownResolver(after.to_string()))?;
        let name = &after[..end];
        let resolved = ctx
            .get(name)
            .ok_or_else(|| Error::UnknownResolver(name.to_string()))?;
        out.push_str(&scalar_text(resolved));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
