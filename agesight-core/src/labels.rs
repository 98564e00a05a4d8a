//! Class-name tables for detector outputs.
//!
//! Ultralytics exports store the class names in the ONNX `names` metadata
//! entry as a Python dict literal, e.g. `{0: 'adult female', 1: 'adult male'}`.

use std::fmt;

use anyhow::Result;

/// Class names indexed by class id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Parse the `names` metadata string written by Ultralytics.
    pub fn parse_ultralytics(metadata: &str) -> Result<Self> {
        let body = metadata.trim();
        let body = body
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| anyhow::anyhow!("class names must be a {{id: 'name'}} mapping"))?;

        let mut entries: Vec<(usize, String)> = Vec::new();
        let mut rest = body.trim_start();
        while !rest.is_empty() {
            let colon = rest
                .find(':')
                .ok_or_else(|| anyhow::anyhow!("missing ':' after class id in '{rest}'"))?;
            let id: usize = rest[..colon]
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid class id '{}': {e}", rest[..colon].trim()))?;

            let value = rest[colon + 1..].trim_start();
            let quote = value
                .chars()
                .next()
                .filter(|c| *c == '\'' || *c == '"')
                .ok_or_else(|| anyhow::anyhow!("class {id} name must be quoted"))?;
            let close = value[1..]
                .find(quote)
                .ok_or_else(|| anyhow::anyhow!("unterminated name for class {id}"))?;
            entries.push((id, value[1..1 + close].to_string()));

            rest = value[close + 2..].trim_start();
            if let Some(after_comma) = rest.strip_prefix(',') {
                rest = after_comma.trim_start();
            } else {
                anyhow::ensure!(
                    rest.is_empty(),
                    "expected ',' between class entries, found '{rest}'"
                );
            }
        }

        entries.sort_by_key(|(id, _)| *id);
        for (expected, (id, _)) in entries.iter().enumerate() {
            anyhow::ensure!(
                *id == expected,
                "class ids must be contiguous from 0 (missing id {expected})"
            );
        }
        Ok(Self(entries.into_iter().map(|(_, name)| name).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.0.get(class_id).map(String::as_str)
    }

    /// Name for `class_id`, or a placeholder for ids outside the table.
    pub fn name_or_placeholder(&self, class_id: usize) -> String {
        self.get(class_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("class{class_id}"))
    }
}

impl fmt::Display for ClassNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
