//! resolver settings

/// Bounds for the resolver
///
/// Resolution normally ends on its own once a pass changes nothing. These limits only matter
/// for substitutions that keep producing new text (a function whose output contains its own
/// placeholder, a value that references itself plus a suffix, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct ResolveOptions {
    /// Whole-tree passes before giving up
    pub max_passes: usize,
    /// Substitution rounds per scalar for self-references
    pub max_self_reference_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_passes: 64,
            max_self_reference_depth: 32,
        }
    }
}
