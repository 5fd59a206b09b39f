//! Redaction of sensitive fields before data reaches a log sink.
//!
//! [`SensitiveDataSanitizer::sanitize`] renders a [`LogValue`] as pretty JSON
//! (two-space indent) with every sensitive key's value replaced by the
//! redaction text. A key is sensitive when its lowercased, trimmed form is in
//! the configured set, or contains one of the fixed substrings `password`,
//! `token`, `secret`, `key`, `auth` or `credential`.
//!
//! Rendering rules:
//!
//! | Node | Rendered as |
//! |---|---|
//! | timestamp | ISO-8601 string |
//! | error | `{ "name", "message", "stack" }` |
//! | shared node seen before | `"[CIRCULAR_REFERENCE]"` |
//!
//! When structured rendering is impossible (an opaque value, a shared node
//! locked by a writer, nesting deeper than the configured limit) the
//! sanitizer falls back to a one-line summary of the top-level value. The
//! fallback never fails; anything going wrong inside it yields
//! `"[SANITIZATION_ERROR]"`.
//!
//! Matching is a best-effort heuristic for keeping secrets out of logs, not
//! a security boundary.
//!
//! # Example
//!
//! ```
//! use phont_core::LogValue;
//! use phont_telemetry::SensitiveDataSanitizer;
//!
//! let sanitizer = SensitiveDataSanitizer::new();
//! let data = LogValue::object([("email", "ada@example.com"), ("password", "hunter2")]);
//!
//! let rendered = sanitizer.sanitize(&data);
//! assert!(rendered.contains("ada@example.com"));
//! assert!(rendered.contains("[REDACTED]"));
//! assert!(!rendered.contains("hunter2"));
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use phont_core::{ErrorRecord, LogValue};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Default redaction placeholder.
pub const DEFAULT_REDACTION_TEXT: &str = "[REDACTED]";

/// Marker substituted for a shared node that was already rendered.
pub const CIRCULAR_REFERENCE_MARKER: &str = "[CIRCULAR_REFERENCE]";

/// Fallback marker for values that cannot be summarized.
pub const UNSERIALIZABLE_MARKER: &str = "[UNSERIALIZABLE_DATA]";

/// Fallback marker for failures inside the fallback itself.
pub const SANITIZATION_ERROR_MARKER: &str = "[SANITIZATION_ERROR]";

/// Default maximum nesting depth of structured rendering.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Keys redacted out of the box.
pub const DEFAULT_SENSITIVE_FIELDS: [&str; 18] = [
    "password",
    "token",
    "access_token",
    "refresh_token",
    "secret",
    "api_key",
    "private_key",
    "authorization",
    "auth",
    "bearer",
    "credential",
    "credentials",
    "key",
    "pass",
    "pwd",
    "security_token",
    "session_token",
    "csrf_token",
];

const SENSITIVE_PATTERNS: [&str; 6] = ["password", "token", "secret", "key", "auth", "credential"];

#[derive(Debug, Error)]
enum RenderError {
    #[error("value of type {0} cannot be rendered")]
    Opaque(&'static str),
    #[error("shared value is locked by a writer")]
    Locked,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Redacts sensitive fields and renders data for logging.
///
/// The sensitive-field set is shared configuration: it can be changed at
/// runtime and concurrent calls to [`sanitize`](Self::sanitize) each see a
/// consistent snapshot. Per-call traversal state is local to the call.
#[derive(Debug)]
pub struct SensitiveDataSanitizer {
    sensitive_fields: RwLock<HashSet<String>>,
    redaction_text: String,
    max_depth: usize,
}

impl Default for SensitiveDataSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SensitiveDataSanitizer {
    /// Creates a sanitizer with the default fields and redaction text.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> SensitiveDataSanitizerBuilder {
        SensitiveDataSanitizerBuilder::default()
    }

    /// Returns the redaction placeholder.
    #[must_use]
    pub fn redaction_text(&self) -> &str {
        &self.redaction_text
    }

    /// Returns the configured sensitive fields, sorted.
    #[must_use]
    pub fn sensitive_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = self.sensitive_fields.read().iter().cloned().collect();
        fields.sort_unstable();
        fields
    }

    /// Returns `true` if values under `key` must be redacted.
    #[must_use]
    pub fn is_sensitive_field(&self, key: &str) -> bool {
        is_sensitive(&self.sensitive_fields.read(), key)
    }

    /// Adds a field to the sensitive set (lowercased and trimmed).
    pub fn add_sensitive_field(&self, field: &str) {
        self.sensitive_fields.write().insert(normalize(field));
    }

    /// Removes a field from the sensitive set (lowercased and trimmed).
    ///
    /// A key that still contains one of the fixed substrings stays sensitive.
    pub fn remove_sensitive_field(&self, field: &str) {
        self.sensitive_fields.write().remove(&normalize(field));
    }

    /// Renders `data` as pretty JSON with sensitive values redacted.
    ///
    /// Never fails; see the module documentation for the fallback rules.
    #[must_use]
    pub fn sanitize(&self, data: &LogValue) -> String {
        match catch_unwind(AssertUnwindSafe(|| self.render(data))) {
            Ok(Ok(rendered)) => rendered,
            Ok(Err(error)) => {
                tracing::debug!(error = %error, "structured sanitization failed, summarizing");
                self.summarize(data)
            }
            Err(_) => self.summarize(data),
        }
    }

    /// Renders any serializable value; see [`sanitize`](Self::sanitize).
    #[must_use]
    pub fn sanitize_serialize<T: Serialize + ?Sized>(&self, data: &T) -> String {
        self.sanitize(&LogValue::from_serialize(data))
    }

    fn render(&self, data: &LogValue) -> Result<String, RenderError> {
        let fields = self.sensitive_fields.read();
        let mut walker = Walker {
            fields: &fields,
            redaction_text: &self.redaction_text,
            max_depth: self.max_depth,
            visited: HashSet::new(),
        };
        let value = walker.redact(data, 0)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn summarize(&self, data: &LogValue) -> String {
        catch_unwind(AssertUnwindSafe(|| self.summarize_value(data, true)))
            .unwrap_or_else(|_| SANITIZATION_ERROR_MARKER.to_string())
    }

    fn summarize_value(&self, data: &LogValue, follow_shared: bool) -> String {
        match data {
            LogValue::Null => "null".to_string(),
            LogValue::Bool(value) => value.to_string(),
            LogValue::Number(value) => value.to_string(),
            LogValue::String(value) => value.clone(),
            LogValue::Timestamp(value) => iso_timestamp(value),
            LogValue::Array(values) => format!("[Array with {} items]", values.len()),
            LogValue::Object(map) => self.summarize_keys(map.keys().map(String::as_str)),
            LogValue::Error(_) => self.summarize_keys(["name", "message", "stack"].into_iter()),
            LogValue::Shared(node) if follow_shared => match node.try_read() {
                Some(inner) => self.summarize_value(&inner, false),
                None => SANITIZATION_ERROR_MARKER.to_string(),
            },
            LogValue::Shared(_) | LogValue::Opaque(_) => UNSERIALIZABLE_MARKER.to_string(),
        }
    }

    fn summarize_keys<'a>(&self, keys: impl Iterator<Item = &'a str>) -> String {
        let fields = self.sensitive_fields.read();
        let visible: Vec<&str> = keys.filter(|key| !is_sensitive(&fields, key)).collect();
        format!("{{Object with keys: {}}}", visible.join(", "))
    }
}

struct Walker<'a> {
    fields: &'a HashSet<String>,
    redaction_text: &'a str,
    max_depth: usize,
    // Identities of every shared node rendered so far in this call.
    visited: HashSet<usize>,
}

impl Walker<'_> {
    fn redact(&mut self, value: &LogValue, depth: usize) -> Result<Value, RenderError> {
        if depth > self.max_depth {
            return Err(RenderError::TooDeep(self.max_depth));
        }

        Ok(match value {
            LogValue::Null => Value::Null,
            LogValue::Bool(value) => Value::Bool(*value),
            LogValue::Number(value) => Value::Number(value.clone()),
            LogValue::String(value) => Value::String(value.clone()),
            LogValue::Timestamp(value) => Value::String(iso_timestamp(value)),
            LogValue::Error(record) => error_value(record),
            LogValue::Array(values) => Value::Array(
                values
                    .iter()
                    .map(|value| self.redact(value, depth + 1))
                    .collect::<Result<_, _>>()?,
            ),
            LogValue::Object(map) => {
                let mut rendered = Map::with_capacity(map.len());
                for (key, value) in map {
                    let value = if is_sensitive(self.fields, key) {
                        if let LogValue::Shared(node) = value {
                            self.visited.insert(node.id());
                        }
                        Value::String(self.redaction_text.to_string())
                    } else {
                        self.redact(value, depth + 1)?
                    };
                    rendered.insert(key.clone(), value);
                }
                Value::Object(rendered)
            }
            LogValue::Shared(node) => {
                if !self.visited.insert(node.id()) {
                    return Ok(Value::String(CIRCULAR_REFERENCE_MARKER.to_string()));
                }
                let inner = node.try_read().ok_or(RenderError::Locked)?;
                self.redact(&inner, depth + 1)?
            }
            LogValue::Opaque(type_name) => return Err(RenderError::Opaque(type_name)),
        })
    }
}

fn error_value(record: &ErrorRecord) -> Value {
    let mut map = Map::new();
    map.insert("name".to_string(), Value::String(record.name.clone()));
    map.insert("message".to_string(), Value::String(record.message.clone()));
    if let Some(stack) = &record.stack {
        map.insert("stack".to_string(), Value::String(stack.clone()));
    }
    Value::Object(map)
}

fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

fn is_sensitive(fields: &HashSet<String>, key: &str) -> bool {
    let normalized = normalize(key);
    fields.contains(&normalized)
        || SENSITIVE_PATTERNS
            .iter()
            .any(|pattern| normalized.contains(pattern))
}

/// Builder for [`SensitiveDataSanitizer`].
#[derive(Debug, Default)]
pub struct SensitiveDataSanitizerBuilder {
    redaction_text: Option<String>,
    additional_sensitive_fields: Vec<String>,
    max_depth: Option<usize>,
}

impl SensitiveDataSanitizerBuilder {
    /// Sets the redaction placeholder.
    #[must_use]
    pub fn redaction_text(mut self, text: impl Into<String>) -> Self {
        self.redaction_text = Some(text.into());
        self
    }

    /// Adds one field on top of the defaults.
    #[must_use]
    pub fn sensitive_field(mut self, field: impl Into<String>) -> Self {
        self.additional_sensitive_fields.push(field.into());
        self
    }

    /// Adds several fields on top of the defaults.
    #[must_use]
    pub fn additional_sensitive_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_sensitive_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Sets the maximum nesting depth of structured rendering.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Builds the sanitizer.
    #[must_use]
    pub fn build(self) -> SensitiveDataSanitizer {
        let sensitive_fields = DEFAULT_SENSITIVE_FIELDS
            .iter()
            .map(|field| (*field).to_string())
            .chain(self.additional_sensitive_fields.iter().map(|field| normalize(field)))
            .collect();

        SensitiveDataSanitizer {
            sensitive_fields: RwLock::new(sensitive_fields),
            redaction_text: self
                .redaction_text
                .unwrap_or_else(|| DEFAULT_REDACTION_TEXT.to_string()),
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use phont_core::SharedValue;
    use proptest::prelude::*;
    use serde_json::json;

    fn parse(rendered: &str) -> Value {
        serde_json::from_str(rendered).expect("sanitized output should be JSON")
    }

    #[test]
    fn test_redacts_default_fields() {
        let sanitizer = SensitiveDataSanitizer::new();
        let data = LogValue::from(json!({
            "email": "ada@example.com",
            "password": "hunter2",
            "nested": { "access_token": "abc", "name": "Ada" }
        }));

        assert_eq!(
            parse(&sanitizer.sanitize(&data)),
            json!({
                "email": "ada@example.com",
                "password": "[REDACTED]",
                "nested": { "access_token": "[REDACTED]", "name": "Ada" }
            })
        );
    }

    #[test]
    fn test_redacts_whole_subtree() {
        let sanitizer = SensitiveDataSanitizer::new();
        let data = LogValue::from(json!({ "credentials": { "user": "ada", "pin": 1234 } }));
        assert_eq!(
            parse(&sanitizer.sanitize(&data)),
            json!({ "credentials": "[REDACTED]" })
        );
    }

    #[test]
    fn test_key_matching_is_case_insensitive_and_trimmed() {
        let sanitizer = SensitiveDataSanitizer::new();
        assert!(sanitizer.is_sensitive_field("PASSWORD"));
        assert!(sanitizer.is_sensitive_field("  Pwd "));
        assert!(!sanitizer.is_sensitive_field("email"));
    }

    #[test]
    fn test_substring_patterns() {
        let sanitizer = SensitiveDataSanitizer::new();
        for key in ["userPassword", "x-api-key", "client_secret", "OAuthState", "jwtToken"] {
            assert!(sanitizer.is_sensitive_field(key), "{key} should be sensitive");
        }
        for key in ["email", "name", "status", "id"] {
            assert!(!sanitizer.is_sensitive_field(key), "{key} should not be sensitive");
        }
    }

    #[test]
    fn test_output_is_pretty_printed() {
        let sanitizer = SensitiveDataSanitizer::new();
        let rendered = sanitizer.sanitize(&LogValue::object([("a", 1_i64)]));
        assert_eq!(rendered, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_primitives_render_as_json() {
        let sanitizer = SensitiveDataSanitizer::new();
        assert_eq!(sanitizer.sanitize(&LogValue::Null), "null");
        assert_eq!(sanitizer.sanitize(&LogValue::from("text")), "\"text\"");
        assert_eq!(sanitizer.sanitize(&LogValue::from(42_i64)), "42");
    }

    #[test]
    fn test_custom_options() {
        let sanitizer = SensitiveDataSanitizer::builder()
            .redaction_text("***")
            .additional_sensitive_fields([" SSN "])
            .build();
        let data = LogValue::object([("ssn", "123-45-6789"), ("token", "t"), ("name", "Ada")]);

        assert_eq!(sanitizer.redaction_text(), "***");
        assert_eq!(
            parse(&sanitizer.sanitize(&data)),
            json!({ "ssn": "***", "token": "***", "name": "Ada" })
        );
    }

    #[test]
    fn test_add_and_remove_fields() {
        let sanitizer = SensitiveDataSanitizer::new();
        assert!(!sanitizer.is_sensitive_field("phone"));

        sanitizer.add_sensitive_field("  Phone ");
        assert!(sanitizer.is_sensitive_field("PHONE"));
        assert!(sanitizer.sensitive_fields().contains(&"phone".to_string()));

        sanitizer.remove_sensitive_field("phone");
        assert!(!sanitizer.is_sensitive_field("phone"));

        // Still matched by the fixed substring list.
        sanitizer.remove_sensitive_field("api_key");
        assert!(sanitizer.is_sensitive_field("api_key"));
    }

    #[test]
    fn test_self_reference_is_marked() {
        let sanitizer = SensitiveDataSanitizer::new();
        let node = SharedValue::new(LogValue::object([("name", "root")]));
        node.insert("me", node.clone());

        assert_eq!(
            parse(&sanitizer.sanitize(&LogValue::Shared(node))),
            json!({ "name": "root", "me": "[CIRCULAR_REFERENCE]" })
        );
    }

    #[test]
    fn test_locked_node_renders_error_marker() {
        let sanitizer = SensitiveDataSanitizer::new();
        let node = SharedValue::new(LogValue::object([("name", "root")]));
        let guard = node.write();

        let rendered = sanitizer.sanitize(&LogValue::Shared(node.clone()));

        drop(guard);
        assert_eq!(rendered, SANITIZATION_ERROR_MARKER);
    }

    #[test]
    fn test_locked_child_falls_back_to_summary() {
        let sanitizer = SensitiveDataSanitizer::new();
        let child = SharedValue::new(LogValue::object([("name", "child")]));
        let data = LogValue::object([
            ("token", LogValue::from("abc")),
            ("child", LogValue::Shared(child.clone())),
        ]);
        let guard = child.write();

        let rendered = sanitizer.sanitize(&data);

        drop(guard);
        assert_eq!(rendered, "{Object with keys: child}");
    }

    #[test]
    fn test_indirect_cycle_is_marked() {
        let sanitizer = SensitiveDataSanitizer::new();
        let parent = SharedValue::new(LogValue::object([("name", "parent")]));
        let child = SharedValue::new(LogValue::object([("name", "child")]));
        child.insert("parent", parent.clone());
        parent.insert("children", LogValue::Array(vec![LogValue::Shared(child)]));

        assert_eq!(
            parse(&sanitizer.sanitize(&LogValue::Shared(parent))),
            json!({
                "name": "parent",
                "children": [{ "name": "child", "parent": "[CIRCULAR_REFERENCE]" }]
            })
        );
    }

    #[test]
    fn test_repeated_shared_node_is_marked() {
        let sanitizer = SensitiveDataSanitizer::new();
        let shared = SharedValue::new(LogValue::from("same"));
        let data = LogValue::object([("first", shared.clone()), ("second", shared)]);

        assert_eq!(
            parse(&sanitizer.sanitize(&data)),
            json!({ "first": "same", "second": "[CIRCULAR_REFERENCE]" })
        );
    }

    #[test]
    fn test_timestamps_and_errors() {
        let sanitizer = SensitiveDataSanitizer::new();
        let at = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid date");
        let data = LogValue::object([
            ("at", LogValue::Timestamp(at)),
            (
                "error",
                LogValue::Error(ErrorRecord {
                    name: "Error".to_string(),
                    message: "boom".to_string(),
                    stack: Some("Error: boom".to_string()),
                }),
            ),
        ]);

        assert_eq!(
            parse(&sanitizer.sanitize(&data)),
            json!({
                "at": "2024-05-01T12:00:00.000Z",
                "error": { "name": "Error", "message": "boom", "stack": "Error: boom" }
            })
        );
    }

    #[test]
    fn test_fallback_summarizes_objects_without_sensitive_keys() {
        let sanitizer = SensitiveDataSanitizer::new();
        let data = LogValue::object([
            ("email", LogValue::from("ada@example.com")),
            ("password", LogValue::from("hunter2")),
            ("socket", LogValue::Opaque("TcpStream")),
        ]);

        assert_eq!(sanitizer.sanitize(&data), "{Object with keys: email, socket}");
    }

    #[test]
    fn test_fallback_summarizes_arrays() {
        let sanitizer = SensitiveDataSanitizer::new();
        let data = LogValue::Array(vec![LogValue::from(1_i64), LogValue::Opaque("Handle")]);
        assert_eq!(sanitizer.sanitize(&data), "[Array with 2 items]");
    }

    #[test]
    fn test_fallback_marks_opaque_values() {
        let sanitizer = SensitiveDataSanitizer::new();
        assert_eq!(sanitizer.sanitize(&LogValue::Opaque("Handle")), UNSERIALIZABLE_MARKER);
    }

    #[test]
    fn test_depth_limit_falls_back() {
        let sanitizer = SensitiveDataSanitizer::builder().max_depth(2).build();
        let data = LogValue::from(json!({ "a": { "b": { "c": { "d": 1 } } } }));
        assert_eq!(sanitizer.sanitize(&data), "{Object with keys: a}");
    }

    #[test]
    fn test_sanitize_serialize() {
        #[derive(Serialize)]
        struct SignIn {
            email: &'static str,
            password: &'static str,
        }

        let sanitizer = SensitiveDataSanitizer::new();
        let rendered = sanitizer.sanitize_serialize(&SignIn {
            email: "ada@example.com",
            password: "hunter2",
        });
        assert_eq!(
            parse(&rendered),
            json!({ "email": "ada@example.com", "password": "[REDACTED]" })
        );
    }

    proptest! {
        #[test]
        fn prop_non_sensitive_keys_round_trip(
            entries in proptest::collection::btree_map("[a-z]{1,8}", ".*", 0..8)
        ) {
            let sanitizer = SensitiveDataSanitizer::new();
            let entries: Vec<(String, String)> = entries
                .into_iter()
                .filter(|(key, _)| !sanitizer.is_sensitive_field(key))
                .collect();
            let data = LogValue::object(entries.clone());

            let rendered = parse(&sanitizer.sanitize(&data));
            let expected: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            prop_assert_eq!(rendered, Value::Object(expected));
        }

        #[test]
        fn prop_sensitive_keys_are_redacted(
            index in 0..DEFAULT_SENSITIVE_FIELDS.len(),
            upper in any::<bool>(),
            padding in " {0,3}",
            secret in ".*",
        ) {
            let sanitizer = SensitiveDataSanitizer::new();
            let field = DEFAULT_SENSITIVE_FIELDS[index];
            let field = if upper { field.to_uppercase() } else { field.to_string() };
            let key = format!("{padding}{field}{padding}");
            let data = LogValue::object([(key.clone(), LogValue::from(secret))]);

            let rendered = parse(&sanitizer.sanitize(&data));
            prop_assert_eq!(&rendered[key.as_str()], &Value::String(DEFAULT_REDACTION_TEXT.to_string()));
        }
    }
}
