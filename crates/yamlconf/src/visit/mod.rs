//! visitor pattern helpers
mod visit_scalars;
pub use visit_scalars::VisitScalarsMut;

/// Visitor receiving each subject mutably
pub trait VisitMut<T> {
    fn visit_mut(&mut self, value: &mut T);
}

// blanket impl for FnMut
impl<T, F> VisitMut<T> for F
where
    F: FnMut(&mut T),
{
    fn visit_mut(&mut self, value: &mut T) {
        self(value)
    }
}

/// Visitor that also receives the dotted path of its subject
pub trait VisitPathMut<T> {
    fn visit_path_mut(&mut self, path: &str, value: &mut T);
}

impl<T, F> VisitPathMut<T> for F
where
    F: FnMut(&str, &mut T),
{
    fn visit_path_mut(&mut self, path: &str, value: &mut T) {
        self(path, value)
    }
}
