use core::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
};

use crate::annotated::{Qualifier, TypeInfo};

/// Handle for a managed component of type `T`.
///
/// Bean classification, scoping and contextual instance management belong to
/// the consuming container; this core only needs the identity and the type of
/// the beans a producer is wired between.
pub struct Bean<T: 'static> {
    name: &'static str,
    bean_type: TypeInfo,
    qualifiers: Vec<Qualifier>,
    instance_type: PhantomData<fn() -> T>,
}

impl<T: 'static> Bean<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            bean_type: TypeInfo::of::<T>(),
            qualifiers: vec![Qualifier::Default],
            instance_type: PhantomData,
        }
    }

    pub fn with_qualifiers(mut self, qualifiers: impl IntoIterator<Item = Qualifier>) -> Self {
        self.qualifiers = qualifiers.into_iter().collect();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bean_type(&self) -> TypeInfo {
        self.bean_type
    }

    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }
}

impl<T: 'static> Debug for Bean<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Bean `{}` ({})", self.name, self.bean_type)
    }
}

enum DisposerFn<X: 'static, T: 'static> {
    Instance(fn(&X, T)),
    Static(fn(T)),
}

/// A paired method releasing instances created by a producer. Supplied per
/// invocation when producer/disposer pairs are wired together, absent
/// otherwise.
pub struct DisposalMethod<X: 'static, T: 'static> {
    name: &'static str,
    dispose: DisposerFn<X, T>,
}

impl<X: 'static, T: 'static> DisposalMethod<X, T> {
    /// A disposer invoked on an instance of the declaring type.
    pub fn instance(name: &'static str, dispose: fn(&X, T)) -> Self {
        Self {
            name,
            dispose: DisposerFn::Instance(dispose),
        }
    }

    /// A disposer invocable without any declaring instance.
    pub fn static_method(name: &'static str, dispose: fn(T)) -> Self {
        Self {
            name,
            dispose: DisposerFn::Static(dispose),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_static(&self) -> bool {
        matches!(self.dispose, DisposerFn::Static(_))
    }

    /// Invokes the disposer. Returns `None` when an instance disposer is
    /// invoked without a receiver.
    pub(crate) fn invoke(&self, receiver: Option<&X>, instance: T) -> Option<()> {
        match (&self.dispose, receiver) {
            (DisposerFn::Static(dispose), _) => {
                dispose(instance);
                Some(())
            }
            (DisposerFn::Instance(dispose), Some(receiver)) => {
                dispose(receiver, instance);
                Some(())
            }
            (DisposerFn::Instance(_), None) => None,
        }
    }
}

impl<X: 'static, T: 'static> Debug for DisposalMethod<X, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DisposalMethod `{}`", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Pool;

    static STATIC_DISPOSED: AtomicUsize = AtomicUsize::new(0);

    #[test]
    fn static_disposer_runs_without_receiver() {
        let method = DisposalMethod::<Pool, usize>::static_method("release", |value| {
            STATIC_DISPOSED.fetch_add(value, Ordering::SeqCst);
        });
        assert!(method.is_static());
        assert_eq!(Some(()), method.invoke(None, 3));
        assert_eq!(3, STATIC_DISPOSED.load(Ordering::SeqCst));
    }

    #[test]
    fn instance_disposer_requires_receiver() {
        let method = DisposalMethod::<Pool, usize>::instance("release", |_pool, _value| {});
        assert_eq!(None, method.invoke(None, 1));
        assert_eq!(Some(()), method.invoke(Some(&Pool), 1));
    }
}
