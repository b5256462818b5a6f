//! function placeholders (`{{ upper('hi') }}`)
//!
//! Functions are resolved by name from an explicit [FunctionTable]. Each function takes exactly
//! one string argument. Returning `None` means "no value" and leaves the placeholder untouched.
use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

static CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\((.*)\)$").expect("call pattern must compile")
});

pub type Function = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Outcome of [FunctionTable::invoke]
#[derive(Debug, PartialEq)]
pub enum Invocation {
    /// The expression is not shaped like `name(arg)`, it should be treated as a lookup
    NotAFunction,
    Returned(Option<String>),
}

#[derive(Clone)]
pub struct FunctionTable {
    functions: BTreeMap<String, Function>,
}

impl FunctionTable {
    pub fn empty() -> Self {
        Self {
            functions: Default::default(),
        }
    }

    /// `env`, `upper`, `lower` and `trim`
    pub fn with_builtins() -> Self {
        Self::empty()
            .with("env", |name| std::env::var(name).ok())
            .with("upper", |arg| Some(arg.to_uppercase()))
            .with("lower", |arg| Some(arg.to_lowercase()))
            .with("trim", |arg| Some(arg.trim().to_string()))
    }

    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.register(name, function);
        self
    }

    /// Register `function` under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Call `expression` if it is shaped like `name(arg)`
    ///
    /// One layer of quotes around the argument is removed before the call.
    pub fn invoke(&self, expression: &str) -> Result<Invocation> {
        let Some((name, argument)) = parse_call(expression) else {
            return Ok(Invocation::NotAFunction);
        };

        let function = self
            .functions
            .get(name)
            .ok_or_else(|| Error::UnregisteredFunction(name.to_string()))?;

        let argument = unquote(argument.trim());
        tracing::trace!(%name, %argument, "invoking function");
        Ok(Invocation::Returned(function(argument)))
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}

fn parse_call(expression: &str) -> Option<(&str, &str)> {
    let captures = CALL.captures(expression)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

fn unquote(argument: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = argument
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }

    argument
}
