use super::{structured, DecodeError, EncodeError, EncodeOptions, Parser};
use crate::value::Value;

/// YAML documents (`.yml`, `.yaml`)
///
/// Decoding goes through [serde_yaml]. Encoding uses a small block emitter so the
/// `inline`/`indent` options can be honored, scalars are still quoted by [serde_yaml].
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

impl Parser for YamlParser {
    fn extensions(&self) -> &'static [&'static str] {
        &["yml", "yaml"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let yaml: serde_yaml::Value = serde_yaml::from_slice(bytes)?;
        structured(yaml.into())
    }

    fn encode(&self, tree: &Value, options: &EncodeOptions) -> Result<String, EncodeError> {
        let mut emitter = Emitter::new(options);
        emitter.document(tree);
        Ok(emitter.out)
    }
}

struct Emitter<'o> {
    options: &'o EncodeOptions,
    out: String,
}

impl<'o> Emitter<'o> {
    fn new(options: &'o EncodeOptions) -> Self {
        Self {
            options,
            out: String::new(),
        }
    }

    fn document(&mut self, value: &Value) {
        if self.options.inline == 0 || !is_block(value) {
            self.out.push_str(&flow(value));
            self.out.push('\n');
            return;
        }

        self.block(value, self.options.inline, 0);
    }

    /// `value` must be a non-empty collection
    fn block(&mut self, value: &Value, inline: usize, level: usize) {
        match value {
            Value::Object(object) => {
                for (key, child) in object {
                    self.pad(level);
                    self.out.push_str(&string(key, false));
                    self.out.push(':');
                    self.child(child, inline, level);
                }
            }
            Value::Array(array) => {
                for child in array {
                    self.pad(level);
                    self.out.push('-');
                    self.child(child, inline, level);
                }
            }
            scalar => {
                self.pad(level);
                self.out.push_str(&flow(scalar));
                self.out.push('\n');
            }
        }
    }

    fn child(&mut self, child: &Value, inline: usize, level: usize) {
        let nested = level + self.options.indent;

        if inline > 1 && is_block(child) {
            self.out.push('\n');
            self.block(child, inline - 1, nested);
            return;
        }

        if let Value::String(s) = child {
            if self.options.has_flag(EncodeOptions::MULTI_LINE_LITERAL_BLOCK) && is_literal(s) {
                self.literal(s, nested);
                return;
            }
        }

        self.out.push(' ');
        self.out.push_str(&flow(child));
        self.out.push('\n');
    }

    fn literal(&mut self, s: &str, level: usize) {
        let (indicator, body) = match s.strip_suffix('\n') {
            None => ("|-", s),
            Some(body) if body.ends_with('\n') => ("|+", body),
            Some(body) => ("|", body),
        };

        self.out.push(' ');
        self.out.push_str(indicator);
        self.out.push('\n');
        for line in body.split('\n') {
            if !line.is_empty() {
                self.pad(level);
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }

    fn pad(&mut self, level: usize) {
        self.out.extend(std::iter::repeat(' ').take(level));
    }
}

fn is_block(value: &Value) -> bool {
    match value {
        Value::Object(object) => !object.is_empty(),
        Value::Array(array) => !array.is_empty(),
        _ => false,
    }
}

/// Literal blocks cannot start with indentation without an explicit indicator
fn is_literal(s: &str) -> bool {
    s.contains('\n') && !s.contains('\r') && !s.starts_with([' ', '\n'])
}

/// Flow (inline) representation of any value
fn flow(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Decimal(d) => serde_yaml::to_string(d)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| d.to_string()),
        Value::String(s) => string(s, true),
        Value::Array(array) => {
            let items: Vec<_> = array.iter().map(flow).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(object) if object.is_empty() => "{}".to_string(),
        Value::Object(object) => {
            let items: Vec<_> = object
                .iter()
                .map(|(key, value)| format!("{}: {}", string(key, true), flow(value)))
                .collect();
            format!("{{ {} }}", items.join(", "))
        }
    }
}

/// Quote a string the way [serde_yaml] would, falling back to double quotes where a plain
/// or single-quoted scalar cannot be used
fn string(s: &str, in_flow: bool) -> String {
    let needs_double_quotes = s.contains(['\n', '\r', '\t'])
        || (in_flow && s.contains([',', '[', ']', '{', '}']));
    if needs_double_quotes {
        return double_quoted(s);
    }

    match serde_yaml::to_string(s) {
        Ok(text) => text.trim_end_matches('\n').to_string(),
        Err(_) => double_quoted(s),
    }
}

// json string escapes are a subset of yaml double-quoted escapes
fn double_quoted(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}
