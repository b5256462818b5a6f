//! decoding an [Entry] tree into one [Value] tree
//!
//! Every document becomes the value of its (normalized) key, directories become mappings.
//! The result is what the resolver works on.
use crate::error::Result;
use crate::loader::Entry;
use crate::parser::Parser;
use crate::value::Value;

pub fn load_entry<P: Parser + ?Sized>(entry: &Entry, parser: &P) -> Result<Value> {
    match entry {
        Entry::Document(path) => parser.decode_file(path),
        Entry::Directory(children) => children
            .iter()
            .map(|(key, child)| Ok((key.clone(), load_entry(child, parser)?)))
            .collect(),
    }
}

/// Utility macro to build a configuration tree from yaml text
///
/// Create from a single document
/// ```
/// # use yamlconf::documents;
/// let tree = documents!("attribute: 42");
/// ```
///
/// Create from multiple documents (key required)
/// ```
/// # use yamlconf::documents;
/// let tree = documents! {
///   "app" => "name: \"{{'person.name'}}\"",
///   "person" => "name: Antonio Carlos"
/// };
/// assert!(tree.get_path("person.name").is_some());
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use yamlconf::documents;
/// documents!("version = 1");
/// ```
#[macro_export]
macro_rules! documents {
    // single document
    { $expr:expr } => {
        $crate::parser::Parser::decode(&$crate::parser::YamlParser, $expr.as_bytes())
            .expect("document must decode")
    };
    // multiple documents, each under its key
    { $($key:expr => $expr:expr),+ $(,)? } => {{
        let mut tree = $crate::value::Value::empty_object();
        $(
            tree.insert($key, $crate::documents!($expr));
        )+

        tree
    }};
}
