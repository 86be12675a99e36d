//! Prompt template handling.
//!
//! The template file optionally splits into a SYSTEM and a USER block on
//! case-insensitive `SYSTEM:` / `USER:` markers; with no markers the whole
//! file is the user message. The user block carries `{field}` placeholders
//! that are filled from canonical record fields at render time.

use serde_json::Value;
use thiserror::Error;

use company_indexer_shared::CanonicalRecord;

/// A template placeholder referenced a field no record field matches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Template references unknown field: {{{placeholder}}}")]
pub struct TemplateError {
    /// The placeholder name as written in the template.
    pub placeholder: String,
}

/// A parsed prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system: Option<String>,
    user: String,
}

impl PromptTemplate {
    /// Parse template text into SYSTEM and USER blocks.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let user_marker = lines
            .iter()
            .position(|line| line.trim_start().to_ascii_lowercase().starts_with("user:"));

        let Some(user_idx) = user_marker else {
            return Self {
                system: None,
                user: text.trim().to_string(),
            };
        };

        let user_line = lines[user_idx].trim_start();
        let mut user = user_line["user:".len()..].trim_start().to_string();
        for line in &lines[user_idx + 1..] {
            user.push('\n');
            user.push_str(line);
        }

        let head = lines[..user_idx].join("\n");
        let system = match head.to_ascii_lowercase().find("system:") {
            Some(pos) => {
                let sys = head[pos + "system:".len()..].trim();
                (!sys.is_empty()).then(|| sys.to_string())
            }
            None => {
                let sys = head.trim();
                (!sys.is_empty()).then(|| sys.to_string())
            }
        };

        Self {
            system,
            user: user.trim().to_string(),
        }
    }

    /// The SYSTEM block, when the template carries one.
    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    /// Render the USER block for a record.
    ///
    /// Every `{field}` placeholder must resolve against the record; an
    /// unresolved placeholder is an error, not silently dropped.
    pub fn render(&self, record: &CanonicalRecord) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.user.len());
        let mut rest = self.user.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            match after.find('}') {
                Some(close) if is_placeholder(&after[..close]) => {
                    let name = &after[..close];
                    let value = record
                        .field(name)
                        .ok_or_else(|| TemplateError {
                            placeholder: name.to_string(),
                        })?;
                    out.push_str(&stringify(&value));
                    rest = &after[close + 1..];
                }
                _ => {
                    // Not a placeholder (e.g. a literal JSON brace).
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}

fn is_placeholder(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Convert a field value to a printable string suitable for prompt
/// injection. Objects prefer a human-friendly key when one is present;
/// arrays join their elements; null renders as empty.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => {
            for key in ["url", "platform", "name", "value"] {
                if let Some(v) = map.get(key) {
                    if !v.is_null() && v.as_str() != Some("") {
                        return stringify(v);
                    }
                }
            }
            Value::Object(map.clone()).to_string()
        }
        other => other.to_string(),
    }
}
