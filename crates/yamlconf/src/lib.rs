//! # yamlconf - layered configuration documents
//!
//! Loads a directory tree of configuration documents into one configuration namespace and
//! resolves the placeholders embedded in their strings.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `yamlconf` works internally.
//!
//! ### Placeholders
//!
//! Placeholders are plain text inside string values. There are three kinds:
//!
//! ```yaml
//! # function placeholder: a registered function, one (optionally quoted) argument
//! greeting: "{{ upper('hi') }}"
//!
//! # lookup placeholder: a dotted path into the registry
//! framework: "{{ app.name }}"
//!
//! # self-reference: a dotted path into the tree being loaded
//! name: "{{'person.name'}}"
//! ```
//!
//! A string may contain any number of them, they are replaced textually.
//!
//! ### Loading files
//!
//! see [loader::Loader] and [documents::load_entry]
//!
//! A directory becomes a mapping. Each document in it is stored under its file name without
//! extension ([normalize::normalize_key]), each sub-directory under its name. Given
//!
//! ```text
//! multiple/
//!   app.yml
//!   person.yml
//!   second-level/
//!     third-level/
//!       alter.yml
//! ```
//!
//! the person's name is addressed as `person.name` and the deepest document as
//! `second-level.third-level.alter`. Files that are not documents are ignored.
//!
//! Each document is decoded by a [parser::Parser]. A document must contain a mapping or a
//! sequence, anything else is an [Error::InvalidDocument].
//!
//! ### Resolution
//!
//! see [resolver::Resolver]
//!
//! Placeholders may point at values that still contain placeholders, or at documents that
//! were loaded later. A single substitution pass is not enough, so the resolver repeats
//! passes until one of them changes nothing.
//!
//! Each pass visits every string ([visit::VisitScalarsMut]) and
//! 1. replaces function and lookup placeholders ([placeholder::PlaceholderResolver]),
//!    function first, registry lookup second
//! 2. replaces self-references ([self_reference::SelfReferenceResolver]) against the tree as it
//!    is after step 1
//!
//! and then publishes the tree to the [registry::Registry], so lookups in the next pass see it.
//!
//! Placeholders that cannot be resolved are not an error. They stay in the output as they were
//! written. Calling a function that is not registered is an error.
//!
//! ### Merging
//!
//! see [merge::merge]
//!
//! The resolved tree is laid over what the namespace held before: top-level keys of the new
//! tree replace existing ones, other existing keys are kept.
//!
//! ### Output
//!
//! [YamlConf::load_to_namespace] returns the merged tree, [YamlConf::save_as_document] writes a
//! tree back as a document.
//!
pub mod conf;
pub mod config;
pub mod documents;
pub mod error;
pub mod functions;
pub mod loader;
pub mod merge;
pub mod normalize;
pub mod parser;
pub mod placeholder;
pub mod registry;
pub mod resolver;
pub mod self_reference;
mod util;
pub mod value;
mod visit;

pub use conf::{Operation, YamlConf};
pub use config::ResolveOptions;
pub use error::{Error, Result};
pub use value::Value;
