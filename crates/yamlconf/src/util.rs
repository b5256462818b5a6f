use crate::error::{Error, Result};
use crate::placeholder::PlaceholderResolver;
use crate::self_reference::SelfReferenceResolver;
use crate::visit;

/// Rewrites function and lookup placeholders, counting changed scalars
///
/// Stops touching scalars after the first error, which is kept for the caller.
#[derive(derive_new::new)]
pub(crate) struct PlaceholderRewriter<'a> {
    resolver: PlaceholderResolver<'a>,
    #[new(default)]
    changed: usize,
    #[new(default)]
    error: Option<Error>,
}

impl<'a> PlaceholderRewriter<'a> {
    pub fn finish(self) -> Result<usize> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.changed),
        }
    }
}

impl<'a> visit::VisitMut<String> for PlaceholderRewriter<'a> {
    fn visit_mut(&mut self, scalar: &mut String) {
        if self.error.is_some() || !scalar.contains("{{") {
            return;
        }

        match self.resolver.resolve_scalar(scalar) {
            Ok(resolved) if resolved != *scalar => {
                *scalar = resolved;
                self.changed += 1;
            }
            Ok(_) => {}
            Err(error) => self.error = Some(error),
        }
    }
}

/// Rewrites self-references, counting changed scalars
#[derive(derive_new::new)]
pub(crate) struct SelfReferenceRewriter<'t> {
    resolver: SelfReferenceResolver<'t>,
    #[new(default)]
    pub changed: usize,
}

impl<'t> visit::VisitPathMut<String> for SelfReferenceRewriter<'t> {
    fn visit_path_mut(&mut self, path: &str, scalar: &mut String) {
        if !scalar.contains("{{'") {
            return;
        }

        let resolved = self.resolver.resolve_scalar(path, scalar);
        if resolved != *scalar {
            *scalar = resolved;
            self.changed += 1;
        }
    }
}
