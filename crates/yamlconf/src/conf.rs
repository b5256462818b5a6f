//! the public entry point
use crate::config::ResolveOptions;
use crate::documents::load_entry;
use crate::error::{Error, Result};
use crate::functions::FunctionTable;
use crate::loader::{Entry, FsLoader, Loader};
use crate::parser::{EncodeOptions, Parser, YamlParser};
use crate::registry::Registry;
use crate::resolver::Resolver;
use crate::value::Value;
use std::path::Path;

/// Loads documents into a registry namespace and writes trees back to disk
#[derive(Debug)]
pub struct YamlConf<L = FsLoader, P = YamlParser> {
    loader: L,
    parser: P,
    resolver: Resolver,
}

impl YamlConf {
    pub fn new() -> Self {
        Self::with_parser(YamlParser)
    }
}

impl Default for YamlConf {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Parser> YamlConf<FsLoader, P> {
    /// Documents are recognized by the extensions of `parser`
    pub fn with_parser(parser: P) -> Self {
        let loader = FsLoader::for_extensions(parser.extensions());
        Self::from_parts(loader, parser, Resolver::default())
    }
}

impl<L: Loader, P: Parser> YamlConf<L, P> {
    pub fn from_parts(loader: L, parser: P, resolver: Resolver) -> Self {
        Self {
            loader,
            parser,
            resolver,
        }
    }

    pub fn with_functions(mut self, functions: FunctionTable) -> Self {
        self.resolver = Resolver::new(functions, *self.resolver.options());
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.resolver = Resolver::new(self.resolver.functions().clone(), options);
        self
    }

    pub fn functions_mut(&mut self) -> &mut FunctionTable {
        self.resolver.functions_mut()
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Load `path` (a document or a directory) into `namespace`
    ///
    /// The loaded tree is resolved to its fixpoint, overlaid onto what `namespace` held before
    /// and published. The published tree is returned.
    #[tracing::instrument(level = "info", skip(self, path, registry), fields(path = %path.as_ref().display()))]
    pub fn load_to_namespace(
        &self,
        path: impl AsRef<Path>,
        namespace: &str,
        registry: &mut dyn Registry,
    ) -> Result<Value> {
        let path = path.as_ref();
        let loaded = if self.loader.is_document(path) {
            self.load_file(path)?
        } else {
            self.load_from_directory(path)?
        };

        self.resolver.resolve(loaded, namespace, registry)
    }

    /// Decode a single document, unresolved
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        self.parser.decode_file(path.as_ref())
    }

    /// Decode all documents below `path`, unresolved
    pub fn load_from_directory(&self, path: impl AsRef<Path>) -> Result<Value> {
        let entries = self.loader.list_entries(path.as_ref())?;
        load_entry(&entries, &self.parser)
    }

    pub fn list_entries(&self, path: impl AsRef<Path>) -> Result<Entry> {
        self.loader.list_entries(path.as_ref())
    }

    pub fn is_document(&self, path: impl AsRef<Path>) -> bool {
        self.loader.is_document(path.as_ref())
    }

    /// Decode document text
    pub fn parse(&self, contents: &str) -> Result<Value> {
        self.parser
            .decode(contents.as_bytes())
            .map_err(|source| Error::InvalidDocument {
                origin: "<input>".to_string(),
                source,
            })
    }

    pub fn dump(&self, tree: &Value, options: &EncodeOptions) -> Result<String> {
        Ok(self.parser.encode(tree, options)?)
    }

    /// Encode `tree` and write it to `path`, replacing existing content
    pub fn save_as_document(
        &self,
        tree: &Value,
        path: impl AsRef<Path>,
        options: &EncodeOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        tracing::info!(path=%path.display(), "saving document");
        std::fs::write(path, self.dump(tree, options)?)?;
        Ok(())
    }

    /// Run a named operation
    ///
    /// For callers that only know the operation by name (scripts, the cli `call` command).
    pub fn dispatch(&self, operation: &str, argument: &str) -> Result<Value> {
        let value = match operation.parse::<Operation>()? {
            Operation::ListEntries => self.list_entries(argument)?.to_value(),
            Operation::IsDocument => self.is_document(argument).into(),
            Operation::Parse => self.parse(argument)?,
            Operation::LoadFile => self.load_file(argument)?,
            Operation::LoadFromDirectory => self.load_from_directory(argument)?,
        };

        Ok(value)
    }
}

/// Operations reachable through [YamlConf::dispatch]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListEntries,
    IsDocument,
    Parse,
    LoadFile,
    LoadFromDirectory,
}

impl std::str::FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list_entries" => Ok(Operation::ListEntries),
            "is_document" => Ok(Operation::IsDocument),
            "parse" => Ok(Operation::Parse),
            "load_file" => Ok(Operation::LoadFile),
            "load_from_directory" => Ok(Operation::LoadFromDirectory),
            unknown => Err(Error::UnknownOperation(unknown.to_string())),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::ListEntries => f.write_str("list_entries"),
            Operation::IsDocument => f.write_str("is_document"),
            Operation::Parse => f.write_str("parse"),
            Operation::LoadFile => f.write_str("load_file"),
            Operation::LoadFromDirectory => f.write_str("load_from_directory"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::documents;
    use crate::registry::MemoryRegistry;
    use pretty_assertions::assert_eq;

    #[test]
    fn operation_names_round_trip() {
        for operation in [
            Operation::ListEntries,
            Operation::IsDocument,
            Operation::Parse,
            Operation::LoadFile,
            Operation::LoadFromDirectory,
        ] {
            assert_eq!(operation.to_string().parse::<Operation>().unwrap(), operation);
        }
    }

    #[test]
    fn unknown_operation() {
        let err = YamlConf::new()
            .dispatch("inexistentMethod", "")
            .expect_err("must fail");
        assert!(matches!(err, Error::UnknownOperation(name) if name == "inexistentMethod"));
    }

    #[test]
    fn dispatch_parse() {
        assert_eq!(
            YamlConf::new().dispatch("parse", "version: 1").unwrap(),
            documents!("version: 1")
        );
    }

    #[test]
    fn parse_rejects_scalars() {
        let err = YamlConf::new().parse("version = 1").expect_err("must fail");
        assert!(matches!(err, Error::InvalidDocument { .. }));
    }

    #[test]
    fn single_document_is_resolved_and_published() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("single.yml");
        std::fs::write(
            &file,
            "name: \"{{'person.name'}}\"\nperson:\n  name: Benoit\n",
        )
        .unwrap();

        let mut registry = MemoryRegistry::new();
        let loaded = YamlConf::new()
            .load_to_namespace(&file, "single", &mut registry)
            .unwrap();

        assert_eq!(loaded.get_path("name"), Some(&Value::from("Benoit")));
        assert_eq!(registry.snapshot("single"), loaded);
    }

    #[test]
    fn custom_functions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.yml"), "id: \"{{ shout(hey) }}\"").unwrap();

        let conf = YamlConf::new().with_functions(
            FunctionTable::empty().with("shout", |arg| Some(format!("{}!", arg.to_uppercase()))),
        );
        let mut registry = MemoryRegistry::new();
        let loaded = conf
            .load_to_namespace(dir.path(), "ns", &mut registry)
            .unwrap();

        assert_eq!(loaded.get_path("app.id"), Some(&Value::from("HEY!")));
    }
}
