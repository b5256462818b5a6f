//! host key/value store
//!
//! The [Registry] is where resolved trees are published and where lookup placeholders
//! (`{{ app.name }}`) are answered from. It is owned by the host and passed in explicitly.
//!
//! Namespaces may be dotted (`mix.second-level`), addressing a nested partition.
use crate::value::Value;

pub trait Registry {
    /// Replace the content of `namespace` with `tree`
    fn publish(&mut self, namespace: &str, tree: Value);

    /// Scalar found at `dotted_path`
    ///
    /// Collections and null are not returned, they cannot be substituted into a string.
    fn lookup(&self, dotted_path: &str) -> Option<Value>;

    /// Current content of `namespace`, an empty object when there is none
    fn snapshot(&self, namespace: &str) -> Value;

    /// Drop `namespace` entirely
    fn teardown(&mut self, namespace: &str);
}

/// In-process registry
#[derive(Debug, Default, Clone)]
pub struct MemoryRegistry {
    root: Value,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        self.root.get_path(dotted_path)
    }

    pub fn clear(&mut self) {
        self.root = Value::empty_object();
    }
}

impl Registry for MemoryRegistry {
    #[tracing::instrument(level = "trace", skip(self, tree))]
    fn publish(&mut self, namespace: &str, tree: Value) {
        let mut segments: Vec<&str> = namespace.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut current = &mut self.root;
        for segment in segments {
            if !matches!(current.get_path(segment), Some(Value::Object(_))) {
                current.insert(segment, Value::empty_object());
            }
            current = match current.get_path_mut(segment) {
                Some(next) => next,
                None => unreachable!("segment was just inserted"),
            };
        }

        current.insert(last, tree);
    }

    fn lookup(&self, dotted_path: &str) -> Option<Value> {
        self.root
            .get_path(dotted_path)
            .filter(|value| !value.is_collection() && **value != Value::Null)
            .cloned()
    }

    fn snapshot(&self, namespace: &str) -> Value {
        self.root
            .get_path(namespace)
            .cloned()
            .unwrap_or_else(Value::empty_object)
    }

    fn teardown(&mut self, namespace: &str) {
        let (parent, last) = match namespace.rsplit_once('.') {
            Some((parent, last)) => (self.root.get_path_mut(parent), last),
            None => (Some(&mut self.root), namespace),
        };

        if let Some(Value::Object(object)) = parent {
            object.shift_remove(last);
        }
    }
}
