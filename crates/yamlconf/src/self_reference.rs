//! self-references (`{{'dotted.path'}}`)
//!
//! A self-reference is answered from the tree being built, never from the registry.
//! Matching is brace-aware: the path may itself contain complete self-references, which are
//! resolved first (`{{'servers.{{'env.name'}}.host'}}`). Apart from those, the path cannot
//! contain `{` or `}`.
//!
//! References to missing keys, `null` or collections stay as they are. The tree may still be
//! incomplete, a later pass can resolve them.
use crate::value::Value;

#[derive(derive_new::new)]
pub struct SelfReferenceResolver<'t> {
    tree: &'t Value,
    /// Upper bound of references expanded inside one another
    max_depth: usize,
}

impl<'t> SelfReferenceResolver<'t> {
    /// Substitute the self-references of the scalar stored at `path`
    ///
    /// Substituted values are expanded as well. A reference to a path that is already being
    /// expanded (the scalar itself included) stays as it is, so values containing themselves
    /// do not grow.
    pub fn resolve_scalar(&self, path: &str, scalar: &str) -> String {
        let mut expanding = vec![path.to_string()];
        self.expand(scalar, &mut expanding)
    }

    fn expand(&self, text: &str, expanding: &mut Vec<String>) -> String {
        let bytes = text.as_bytes();
        let mut resolved = String::with_capacity(text.len());
        // paths of the references opened so far, innermost last
        let mut open: Vec<String> = vec![];
        let mut last = 0;
        let mut position = 0;

        while position < bytes.len() {
            let rest = &bytes[position..];
            if rest.starts_with(b"{{'") {
                append(&mut resolved, &mut open, &text[last..position]);
                open.push(String::new());
                position += 3;
                last = position;
            } else if open.is_empty() {
                position += 1;
            } else if rest.starts_with(b"'}}") {
                let mut path = open.pop().unwrap_or_default();
                path.push_str(&text[last..position]);
                let replacement = self.substitute(path, expanding);
                append(&mut resolved, &mut open, &replacement);
                position += 3;
                last = position;
            } else if matches!(rest[0], b'{' | b'}') {
                // none of the open references can close any more
                append(&mut resolved, &mut open, &text[last..position]);
                abandon(&mut resolved, &mut open);
                last = position;
                position += 1;
            } else {
                position += 1;
            }
        }

        append(&mut resolved, &mut open, &text[last..]);
        abandon(&mut resolved, &mut open);
        resolved
    }

    fn substitute(&self, path: String, expanding: &mut Vec<String>) -> String {
        let value = if path.contains("{{") {
            None
        } else {
            self.tree.get_path(&path).and_then(Value::to_substitution)
        };

        let Some(value) = value else {
            return literal(&path);
        };

        if expanding.contains(&path) {
            tracing::debug!(%path, "cyclic self-reference");
            return literal(&path);
        }

        if expanding.len() >= self.max_depth {
            tracing::warn!(%path, max_depth = self.max_depth, "self-references nested too deeply");
            return literal(&path);
        }

        expanding.push(path);
        let expanded = self.expand(&value, expanding);
        let path = expanding.pop().unwrap_or_default();

        tracing::trace!(%path, replacement = %expanded, "self-reference substituted");
        expanded
    }
}

fn literal(path: &str) -> String {
    format!("{{{{'{path}'}}}}")
}

/// Add `text` to the innermost open reference, or to the output when none is open
fn append(resolved: &mut String, open: &mut [String], text: &str) {
    match open.last_mut() {
        Some(path) => path.push_str(text),
        None => resolved.push_str(text),
    }
}

/// Write unclosed references back as they were written
fn abandon(resolved: &mut String, open: &mut Vec<String>) {
    for path in open.drain(..) {
        resolved.push_str("{{'");
        resolved.push_str(&path);
    }
}
