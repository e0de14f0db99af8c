use core::{
    any::{Any, TypeId},
    fmt::{self, Debug, Formatter},
};
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tracing::trace;

use crate::{
    annotated::{AnnotatedField, EnhancedAnnotatedField, MemberRef, TypeArgument, TypeInfo},
    container::ContainerId,
};

/// Identity of a producer field: the declaring type plus the member name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct FieldKey {
    declaring_type: TypeId,
    name: &'static str,
}

/// Failures while resolving an enhanced member descriptor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("cannot resolve type argument `{argument}` of `{member}`")]
    UnresolvedTypeArgument {
        member: MemberRef,
        argument: &'static str,
    },
}

/// Builds enhanced member descriptors and caches them per
/// (field identity, container identity).
///
/// The cache is the only shared mutable state in this core: lookups are
/// concurrent, population is compute-if-absent, failures are never cached.
/// Repeated calls for the same key observe the same shared descriptor.
#[derive(Default)]
pub struct MemberTransformer {
    cache: DashMap<(FieldKey, ContainerId), Arc<dyn Any + Send + Sync>>,
}

impl MemberTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_enhanced_member<X: 'static>(
        &self,
        field: &Arc<AnnotatedField<X>>,
        container_id: &ContainerId,
    ) -> Result<Arc<EnhancedAnnotatedField<X>>, TransformError> {
        let metadata = field.metadata();
        let key = (
            FieldKey {
                declaring_type: metadata.declaring_type().id(),
                name: metadata.name(),
            },
            container_id.clone(),
        );
        let entry = self.cache.entry(key).or_try_insert_with(|| {
            trace!(member = %metadata, container = %container_id, "building enhanced member");
            Self::enhance(field, container_id)
                .map(|enhanced| Arc::new(enhanced) as Arc<dyn Any + Send + Sync>)
        })?;
        let shared = entry.value().clone();
        drop(entry);

        Ok(shared
            .downcast::<EnhancedAnnotatedField<X>>()
            .unwrap_or_else(|_| {
                panic!(
                    "cached enhanced member for `{}` has a foreign type. \
                     This is likely a bug in fieldfac, please file a bug report",
                    metadata
                )
            }))
    }

    fn enhance<X: 'static>(
        field: &Arc<AnnotatedField<X>>,
        container_id: &ContainerId,
    ) -> Result<EnhancedAnnotatedField<X>, TransformError> {
        let metadata = field.metadata();
        let mut resolved_arguments: Vec<TypeInfo> =
            Vec::with_capacity(metadata.type_arguments().len());
        for argument in metadata.type_arguments() {
            match argument {
                TypeArgument::Resolved(info) => resolved_arguments.push(*info),
                TypeArgument::Unresolved(name) => {
                    return Err(TransformError::UnresolvedTypeArgument {
                        member: metadata.member(),
                        argument: name,
                    })
                }
            }
        }
        Ok(EnhancedAnnotatedField::new(
            field.clone(),
            container_id.clone(),
            metadata.field_type(),
            resolved_arguments,
        ))
    }

    /// Number of enhanced members currently cached, for diagnostics.
    pub fn cached_member_count(&self) -> usize {
        self.cache.len()
    }
}

impl Debug for MemberTransformer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemberTransformer (cached members: {})",
            self.cache.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gauge {
        level: u8,
    }

    #[test]
    fn resolves_and_caches_enhanced_member() {
        let transformer = MemberTransformer::new();
        let field = Arc::new(
            AnnotatedField::instance("level", |g: &Gauge| g.level)
                .with_type_arguments([TypeArgument::Resolved(TypeInfo::of::<u8>())]),
        );
        let id = ContainerId::new("app");

        let first = transformer
            .load_enhanced_member(&field, &id)
            .expect("resolved arguments enhance cleanly");
        let second = transformer
            .load_enhanced_member(&field, &id)
            .expect("second lookup hits the cache");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(1, transformer.cached_member_count());
        assert_eq!(TypeInfo::of::<u8>(), first.resolved_type());
        assert_eq!(&[TypeInfo::of::<u8>()], first.resolved_arguments());
    }

    #[test]
    fn distinct_container_identities_get_distinct_entries() {
        let transformer = MemberTransformer::new();
        let field = Arc::new(AnnotatedField::instance("level", |g: &Gauge| g.level));

        let first = transformer
            .load_enhanced_member(&field, &ContainerId::new("a"))
            .unwrap();
        let second = transformer
            .load_enhanced_member(&field, &ContainerId::new("b"))
            .unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(2, transformer.cached_member_count());
    }

    #[test]
    fn unresolved_argument_fails_and_is_not_cached() {
        let transformer = MemberTransformer::new();
        let field = Arc::new(
            AnnotatedField::instance("level", |g: &Gauge| g.level)
                .with_type_arguments([TypeArgument::Unresolved("L")]),
        );
        let id = ContainerId::new("app");

        let error = transformer
            .load_enhanced_member(&field, &id)
            .expect_err("unresolved argument cannot enhance");
        assert_eq!(
            TransformError::UnresolvedTypeArgument {
                member: field.metadata().member(),
                argument: "L",
            },
            error
        );
        assert_eq!(0, transformer.cached_member_count());
    }
}
