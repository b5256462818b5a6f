//! fixpoint resolution
//!
//! ```text
//! Idle -> Resolving -> Publishing -> Resolving ... -> Done
//! ```
//!
//! A pass rewrites every string scalar of the tree: function/lookup placeholders first, then
//! self-references (a function may produce text that forms a self-reference). After each pass the
//! tree is published so the next pass's lookups observe it. Resolution is done once a pass
//! changes nothing.
use crate::config::ResolveOptions;
use crate::error::Result;
use crate::functions::FunctionTable;
use crate::merge::merge_into_namespace;
use crate::placeholder::PlaceholderResolver;
use crate::registry::Registry;
use crate::self_reference::SelfReferenceResolver;
use crate::util::{PlaceholderRewriter, SelfReferenceRewriter};
use crate::value::Value;
use crate::visit::VisitScalarsMut;

#[derive(Debug, Clone, Default, derive_new::new)]
pub struct Resolver {
    functions: FunctionTable,
    options: ResolveOptions,
}

impl Resolver {
    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionTable {
        &mut self.functions
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Run one pass over `tree`
    ///
    /// Returns the number of scalar rewrites. A scalar rewritten by both stages counts twice,
    /// only zero versus non-zero matters to the caller.
    pub fn resolve_pass(
        &self,
        tree: &mut Value,
        namespace: Option<&str>,
        registry: &dyn Registry,
    ) -> Result<usize> {
        let mut placeholders = PlaceholderRewriter::new(PlaceholderResolver::new(
            &self.functions,
            registry,
            namespace,
        ));
        tree.visit_scalars_mut(&mut placeholders);
        let mut changed = placeholders.finish()?;

        // self-references see the tree as it is after the placeholder stage
        let snapshot = tree.clone();
        let mut self_references = SelfReferenceRewriter::new(SelfReferenceResolver::new(
            &snapshot,
            self.options.max_self_reference_depth,
        ));
        tree.visit_scalar_paths_mut(&mut self_references);
        changed += self_references.changed;

        Ok(changed)
    }

    /// Resolve `tree` to its fixpoint
    ///
    /// Every pass merges `tree` into the content of `namespace` and publishes the result. Passes
    /// only rewrite strings, so each publish replaces the same top-level keys and whatever the
    /// namespace held before the load survives next to them. The tree published last is
    /// returned. Stops with a warning after [ResolveOptions::max_passes].
    #[tracing::instrument(level = "debug", skip(self, tree, registry))]
    pub fn resolve(
        &self,
        mut tree: Value,
        namespace: &str,
        registry: &mut dyn Registry,
    ) -> Result<Value> {
        let mut pass = 0;
        loop {
            pass += 1;
            let changed = self.resolve_pass(&mut tree, Some(namespace), &*registry)?;
            tracing::debug!(pass, changed, "pass finished");

            let published = merge_into_namespace(namespace, tree.clone(), &*registry);
            registry.publish(namespace, published.clone());

            if changed == 0 {
                return Ok(published);
            }

            if pass >= self.options.max_passes {
                tracing::warn!(
                    max_passes = self.options.max_passes,
                    "placeholders still changing, giving up"
                );
                return Ok(published);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::documents;
    use crate::registry::MemoryRegistry;
    use pretty_assertions::assert_eq;

    fn resolve(tree: Value) -> (Value, MemoryRegistry) {
        let mut registry = MemoryRegistry::new();
        let resolved = Resolver::default()
            .resolve(tree, "conf", &mut registry)
            .expect("must resolve");
        (resolved, registry)
    }

    #[test]
    fn forward_references_across_documents() {
        let (resolved, _) = resolve(documents! {
            "app" => "name: \"{{'person.name'}}\"",
            "person" => "name: Antonio Carlos",
        });

        assert_eq!(
            resolved.get_path("app.name"),
            Some(&Value::from("Antonio Carlos"))
        );
    }

    #[test]
    fn lookup_resolves_after_publish() {
        let mut tree = documents! {
            "app" => "name: \"{{env.app.name}}\"",
            "env" => "app:\n  name: \"{{'meta.name'}}\"",
            "meta" => "name: Laravel",
        };
        let resolver = Resolver::default();
        let mut registry = MemoryRegistry::new();

        let changed = resolver
            .resolve_pass(&mut tree, Some("conf"), &registry)
            .unwrap();
        assert!(changed > 0);
        assert_eq!(
            tree.get_path("app.name"),
            Some(&Value::from("{{env.app.name}}"))
        );
        assert_eq!(tree.get_path("env.app.name"), Some(&Value::from("Laravel")));

        registry.publish("conf", tree.clone());
        resolver
            .resolve_pass(&mut tree, Some("conf"), &registry)
            .unwrap();
        assert_eq!(tree.get_path("app.name"), Some(&Value::from("Laravel")));
    }

    #[test]
    fn function_output_forming_a_self_reference() {
        let functions = FunctionTable::empty().with("reference", |path| Some(format!("{{{{'{path}'}}}}")));
        let mut registry = MemoryRegistry::new();

        let resolved = Resolver::new(functions, ResolveOptions::default())
            .resolve(
                documents! {
                    "app" => "name: \"{{ reference(person.name) }}\"",
                    "person" => "name: Benoit",
                },
                "conf",
                &mut registry,
            )
            .unwrap();

        assert_eq!(resolved.get_path("app.name"), Some(&Value::from("Benoit")));
    }

    #[test]
    fn converged_tree_is_a_fixpoint() {
        let (mut resolved, registry) = resolve(documents! {
            "app" => "name: \"{{'person.name'}}\"\nmissing: \"{{'nowhere.to.be.found'}}\"\ngreeting: \"{{ upper('hi') }}\"",
            "person" => "name: Antonio Carlos",
        });

        let before = resolved.clone();
        let changed = Resolver::default()
            .resolve_pass(&mut resolved, Some("conf"), &registry)
            .unwrap();

        assert_eq!(changed, 0);
        assert_eq!(resolved, before);
        assert_eq!(
            resolved.get_path("app.missing"),
            Some(&Value::from("{{'nowhere.to.be.found'}}"))
        );
    }

    #[test]
    fn publishes_over_baseline() {
        let mut registry = MemoryRegistry::new();
        registry.publish("conf", documents!("kept: {k: v}\napp: {old: true}"));

        Resolver::default()
            .resolve(documents! { "app" => "name: x" }, "conf", &mut registry)
            .unwrap();

        assert_eq!(
            registry.snapshot("conf"),
            documents!("kept: {k: v}\napp: {name: x}")
        );
    }

    #[test]
    fn self_reference_ignores_registry() {
        let mut registry = MemoryRegistry::new();
        registry.publish("a", documents!("b: from-registry"));

        let resolved = Resolver::default()
            .resolve(
                documents! {
                    "a" => "b: from-tree",
                    "c" => "d: \"{{'a.b'}}\"\ne: \"{{'x.y'}}\"",
                },
                "conf",
                &mut registry,
            )
            .unwrap();

        assert_eq!(resolved.get_path("c.d"), Some(&Value::from("from-tree")));
        assert_eq!(resolved.get_path("c.e"), Some(&Value::from("{{'x.y'}}")));
    }

    #[test]
    fn pass_cap_stops_runaway_functions() {
        let functions = FunctionTable::empty().with("again", |arg| Some(format!("{{{{ again({arg}) }}}}!")));
        let resolver = Resolver::new(functions, ResolveOptions::new(3, 8));
        let mut registry = MemoryRegistry::new();

        let resolved = resolver
            .resolve(
                documents!("loop: \"{{ again(x) }}\""),
                "conf",
                &mut registry,
            )
            .unwrap();

        assert_eq!(
            resolved.get_path("loop"),
            Some(&Value::from("{{ again(x) }}!!!"))
        );
    }

    #[test]
    fn self_containing_values_converge() {
        let (resolved, _) = resolve(documents!("a: \"{{'a'}}x\""));
        assert_eq!(resolved.get_path("a"), Some(&Value::from("{{'a'}}x")));

        let (resolved, _) = resolve(documents!("a: \"{{'b'}}x\"\nb: \"{{'a'}}y\""));
        assert_eq!(resolved.get_path("a"), Some(&Value::from("{{'a'}}yx")));
        assert_eq!(resolved.get_path("b"), Some(&Value::from("{{'b'}}xy")));
    }

    #[test]
    fn returns_the_published_tree() {
        let mut registry = MemoryRegistry::new();
        registry.publish("conf", documents!("kept: {k: v}"));

        let resolved = Resolver::default()
            .resolve(
                documents! { "app" => "name: \"{{'kept.k'}}\"" },
                "conf",
                &mut registry,
            )
            .unwrap();

        assert_eq!(resolved, documents!("kept: {k: v}\napp: {name: \"{{'kept.k'}}\"}"));
        assert_eq!(registry.snapshot("conf"), resolved);
    }

    #[test]
    fn unregistered_function_aborts() {
        let mut registry = MemoryRegistry::new();
        let err = Resolver::default()
            .resolve(
                documents!("a: \"{{ nope() }}\""),
                "conf",
                &mut registry,
            )
            .expect_err("must fail");

        assert!(matches!(err, crate::Error::UnregisteredFunction(name) if name == "nope"));
    }
}
