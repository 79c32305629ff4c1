//! Per-record value extraction.
//!
//! Templates are literal text with `{{.field}}` placeholders (the leading dot
//! is optional, whitespace inside the braces is ignored). A template built
//! with [`Template::field`] yields the value of a single column.

use serde_json::{Map, Value};

use crate::error::{Result, TimebucketError};

/// One input row: field name to scalar value.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A compiled extraction template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Compile a template string.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use timebucket_core::extract::Template;
    ///
    /// let template = Template::parse("{{.date}}T{{.time}}").unwrap();
    /// let record = json!({"date": "2020-01-01", "time": "12:00:00"});
    /// let value = template.render(record.as_object().unwrap()).unwrap();
    /// assert_eq!(value, "2020-01-01T12:00:00");
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let close = after_open.find("}}").ok_or_else(|| {
                TimebucketError::InvalidTemplate(format!("unterminated placeholder in '{}'", source))
            })?;
            let inner = after_open[..close].trim();
            let name = inner.strip_prefix('.').unwrap_or(inner).trim();
            if name.is_empty() {
                return Err(TimebucketError::InvalidTemplate(format!(
                    "empty field name in '{}'",
                    source
                )));
            }
            segments.push(Segment::Field(name.to_string()));
            rest = &after_open[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        if segments.is_empty() {
            return Err(TimebucketError::InvalidTemplate(
                "template is empty".to_string(),
            ));
        }
        Ok(Template { segments })
    }

    /// A template yielding the value of a single field.
    pub fn field(name: impl Into<String>) -> Self {
        Template {
            segments: vec![Segment::Field(name.into())],
        }
    }

    /// Names of the fields the template reads, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Render the template against a record.
    pub fn render(&self, record: &Record) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value = record.get(name).ok_or_else(|| {
                        TimebucketError::Extract(format!("field {:?} is missing from record", name))
                    })?;
                    push_scalar(&mut out, name, value)?;
                }
            }
        }
        Ok(out)
    }
}

fn push_scalar(out: &mut String, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Array(_) | Value::Object(_) => {
            return Err(TimebucketError::Extract(format!(
                "field {:?} is not a scalar value",
                name
            )));
        }
    }
    Ok(())
}
