use super::{VisitMut, VisitPathMut};
use crate::value::Value;

/// Recursively visit all string scalars mutably
///
/// Other scalars cannot hold placeholders and are skipped.
pub trait VisitScalarsMut {
    fn visit_scalars_mut(&mut self, visitor: &mut dyn VisitMut<String>);

    /// Like [VisitScalarsMut::visit_scalars_mut], with the dotted path of each string
    /// (`app.providers.0`)
    fn visit_scalar_paths_mut(&mut self, visitor: &mut dyn VisitPathMut<String>);
}

impl VisitScalarsMut for Value {
    fn visit_scalars_mut(&mut self, visitor: &mut dyn VisitMut<String>) {
        match self {
            Value::String(string) => visitor.visit_mut(string),
            Value::Array(array) => {
                for value in array {
                    value.visit_scalars_mut(visitor);
                }
            }
            Value::Object(object) => {
                for value in object.values_mut() {
                    value.visit_scalars_mut(visitor);
                }
            }
            Value::Null | Value::Boolean(_) | Value::Integer(_) | Value::Decimal(_) => {}
        }
    }

    fn visit_scalar_paths_mut(&mut self, visitor: &mut dyn VisitPathMut<String>) {
        visit_paths(self, &mut String::new(), visitor);
    }
}

fn visit_paths(value: &mut Value, path: &mut String, visitor: &mut dyn VisitPathMut<String>) {
    match value {
        Value::String(string) => visitor.visit_path_mut(path, string),
        Value::Array(array) => {
            for (index, value) in array.iter_mut().enumerate() {
                let parent = push_segment(path, &index.to_string());
                visit_paths(value, path, visitor);
                path.truncate(parent);
            }
        }
        Value::Object(object) => {
            for (key, value) in object.iter_mut() {
                let parent = push_segment(path, key);
                visit_paths(value, path, visitor);
                path.truncate(parent);
            }
        }
        Value::Null | Value::Boolean(_) | Value::Integer(_) | Value::Decimal(_) => {}
    }
}

/// Returns the length of the path before the segment was added
fn push_segment(path: &mut String, segment: &str) -> usize {
    let parent = path.len();
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(segment);
    parent
}
