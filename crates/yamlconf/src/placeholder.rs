//! function and lookup placeholders
//!
//! `{{ expr }}` regions are matched non-greedily and never span lines. For each one the trimmed
//! expression is tried as a function call first and as a registry lookup second. A region that
//! resolves to nothing stays in the text as it is, a later pass may resolve it.
use crate::error::Result;
use crate::functions::{FunctionTable, Invocation};
use crate::registry::Registry;
use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern must compile"));

#[derive(derive_new::new)]
pub struct PlaceholderResolver<'a> {
    functions: &'a FunctionTable,
    registry: &'a dyn Registry,
    /// Lookups missing from the registry are retried relative to this namespace
    namespace: Option<&'a str>,
}

impl<'a> PlaceholderResolver<'a> {
    pub fn resolve_scalar(&self, scalar: &str) -> Result<String> {
        let mut resolved = String::with_capacity(scalar.len());
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(scalar) {
            let (Some(region), Some(inner)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            let Some(replacement) = self.resolve_expression(inner.as_str().trim())? else {
                continue;
            };

            tracing::trace!(placeholder = region.as_str(), %replacement, "substituted");
            resolved.push_str(&scalar[last..region.start()]);
            resolved.push_str(&replacement);
            last = region.end();
        }

        resolved.push_str(&scalar[last..]);
        Ok(resolved)
    }

    fn resolve_expression(&self, expression: &str) -> Result<Option<String>> {
        if expression.is_empty() || is_self_reference(expression) {
            return Ok(None);
        }

        if let Invocation::Returned(value) = self.functions.invoke(expression)? {
            return Ok(value);
        }

        Ok(self.lookup(expression))
    }

    fn lookup(&self, expression: &str) -> Option<String> {
        self.registry
            .lookup(expression)
            .or_else(|| {
                let namespace = self.namespace?;
                self.registry.lookup(&format!("{namespace}.{expression}"))
            })
            .and_then(|value| value.to_substitution())
    }
}

/// `'dotted.path'` belongs to the self-reference resolver
fn is_self_reference(expression: &str) -> bool {
    expression.len() >= 2 && expression.starts_with('\'') && expression.ends_with('\'')
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::documents;
    use crate::registry::MemoryRegistry;
    use pretty_assertions::assert_eq;

    fn registry() -> MemoryRegistry {
        let mut registry = MemoryRegistry::new();
        registry.publish("app", documents!("name: Laravel\nport: 8080\ndebug: false"));
        registry.publish(
            "multiple",
            documents!("env:\n  app:\n    name: Relative\nlocal:\n  name: Fallback"),
        );
        registry.publish("env", documents!("app:\n  name: Absolute"));
        registry
    }

    fn resolve(scalar: &str) -> String {
        let functions = FunctionTable::default();
        let registry = registry();
        PlaceholderResolver::new(&functions, &registry, None)
            .resolve_scalar(scalar)
            .expect("must resolve")
    }

    #[test]
    fn functions_and_lookups() {
        assert_eq!(resolve("{{upper('hi')}}"), "HI");
        assert_eq!(resolve("{{ app.name }} on {{app.port}}"), "Laravel on 8080");
        assert_eq!(resolve("debug={{ app.debug }}"), "debug=false");
    }

    #[test]
    fn unresolved_regions_stay() {
        assert_eq!(
            resolve("{{ missing.key }} and {{ app.name }}"),
            "{{ missing.key }} and Laravel"
        );
        assert_eq!(resolve("{{}} {{ }}"), "{{}} {{ }}");
    }

    #[test]
    fn self_references_are_left_alone() {
        let functions = FunctionTable::default();
        let mut registry = registry();
        registry.publish("'app", documents!("name': Quoted"));

        let resolved = PlaceholderResolver::new(&functions, &registry, None)
            .resolve_scalar("{{'app.name'}}")
            .unwrap();
        assert_eq!(resolved, "{{'app.name'}}");
    }

    #[test]
    fn each_occurrence_is_replaced_on_its_own() {
        let functions = FunctionTable::empty().with("once", {
            let calls = std::sync::atomic::AtomicUsize::new(0);
            move |_: &str| {
                let call = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                (call == 0).then(|| "first".to_string())
            }
        });
        let registry = registry();

        let resolved = PlaceholderResolver::new(&functions, &registry, None)
            .resolve_scalar("{{ once(x) }} {{ once(x) }}")
            .unwrap();
        assert_eq!(resolved, "first {{ once(x) }}");
    }

    #[test]
    fn regions_do_not_span_lines() {
        assert_eq!(resolve("{{ app.\nname }}"), "{{ app.\nname }}");
        assert_eq!(resolve("{{ app.name }}\n{{ app.port }}"), "Laravel\n8080");
    }

    #[test]
    fn absolute_lookup_wins_over_namespace() {
        let functions = FunctionTable::default();
        let registry = registry();
        let resolver = PlaceholderResolver::new(&functions, &registry, Some("multiple"));

        assert_eq!(resolver.resolve_scalar("{{ env.app.name }}").unwrap(), "Absolute");
        assert_eq!(resolver.resolve_scalar("{{ local.name }}").unwrap(), "Fallback");

        let other = PlaceholderResolver::new(&functions, &registry, Some("other"));
        assert_eq!(other.resolve_scalar("{{ local.name }}").unwrap(), "{{ local.name }}");
    }

    #[test]
    fn unregistered_functions_fail() {
        let functions = FunctionTable::default();
        let registry = registry();

        let err = PlaceholderResolver::new(&functions, &registry, None)
            .resolve_scalar("{{ nope('x') }}")
            .expect_err("must fail");
        assert!(matches!(err, crate::Error::UnregisteredFunction(_)));
    }
}
