use core::{
    any::{Any, TypeId},
    fmt::{self, Debug, Display, Formatter},
};
use std::sync::Arc;

use crate::{container::ContainerId, untyped::UntypedReader};

/// Runtime identity of a type: its `TypeId` paired with the human readable
/// type name used in error messages and logs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Debug for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A generic argument of the field's declared type. Definitions can arrive
/// from separately compiled plugins, so an argument the metadata layer could
/// not pin to a concrete type is representable as `Unresolved`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeArgument {
    Resolved(TypeInfo),
    Unresolved(&'static str),
}

/// Qualifier metadata carried by producer fields and beans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Default,
    Named(&'static str),
}

/// Names the member an error refers to without keeping the descriptor alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemberRef {
    declaring_type: &'static str,
    name: &'static str,
}

impl MemberRef {
    pub(crate) fn new(declaring_type: &'static str, name: &'static str) -> Self {
        Self {
            declaring_type,
            name,
        }
    }

    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Display for MemberRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}

/// Immutable description of a producer field, independent of the declaring
/// type parameter so validators can stay object safe.
#[derive(Clone, Debug)]
pub struct FieldMetadata {
    name: &'static str,
    declaring_type: TypeInfo,
    field_type: TypeInfo,
    type_arguments: Vec<TypeArgument>,
    qualifiers: Vec<Qualifier>,
    is_static: bool,
}

impl FieldMetadata {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declaring_type(&self) -> TypeInfo {
        self.declaring_type
    }

    pub fn field_type(&self) -> TypeInfo {
        self.field_type
    }

    pub fn type_arguments(&self) -> &[TypeArgument] {
        &self.type_arguments
    }

    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn member(&self) -> MemberRef {
        MemberRef::new(self.declaring_type.name(), self.name)
    }
}

impl Display for FieldMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type.name(), self.name)
    }
}

/// Reflective description of a producer field on declaring type `X`.
///
/// Carries the member metadata plus a type erased reader for the field value.
/// Descriptors are immutable once constructed and shared as `Arc`s between
/// the metadata subsystem, factories and producers.
pub struct AnnotatedField<X: 'static> {
    metadata: FieldMetadata,
    reader: UntypedReader<X>,
}

impl<X: 'static> AnnotatedField<X> {
    /// Describes an instance field: reading it requires an instance of the
    /// declaring type.
    pub fn instance<T: Any + Send + Sync>(name: &'static str, read: fn(&X) -> T) -> Self {
        Self {
            metadata: FieldMetadata {
                name,
                declaring_type: TypeInfo::of::<X>(),
                field_type: TypeInfo::of::<T>(),
                type_arguments: Vec::new(),
                qualifiers: vec![Qualifier::Default],
                is_static: false,
            },
            reader: UntypedReader::instance(read),
        }
    }

    /// Describes a static field: readable without any declaring instance.
    pub fn static_field<T: Any + Send + Sync>(name: &'static str, read: fn() -> T) -> Self {
        Self {
            metadata: FieldMetadata {
                name,
                declaring_type: TypeInfo::of::<X>(),
                field_type: TypeInfo::of::<T>(),
                type_arguments: Vec::new(),
                qualifiers: vec![Qualifier::Default],
                is_static: true,
            },
            reader: UntypedReader::static_field(read),
        }
    }

    pub fn with_type_arguments(mut self, arguments: impl IntoIterator<Item = TypeArgument>) -> Self {
        self.metadata.type_arguments = arguments.into_iter().collect();
        self
    }

    pub fn with_qualifiers(mut self, qualifiers: impl IntoIterator<Item = Qualifier>) -> Self {
        self.metadata.qualifiers = qualifiers.into_iter().collect();
        self
    }

    pub fn metadata(&self) -> &FieldMetadata {
        &self.metadata
    }

    pub fn is_static(&self) -> bool {
        self.metadata.is_static
    }

    pub(crate) fn reader(&self) -> &UntypedReader<X> {
        &self.reader
    }
}

impl<X: 'static> Debug for AnnotatedField<X> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AnnotatedField ({})", self.metadata)
    }
}

/// Per container identity view of an [`AnnotatedField`] with every type
/// argument resolved. Built only by the member transformer and shared through
/// its cache, never mutated afterwards.
pub struct EnhancedAnnotatedField<X: 'static> {
    field: Arc<AnnotatedField<X>>,
    container_id: ContainerId,
    resolved_type: TypeInfo,
    resolved_arguments: Vec<TypeInfo>,
}

impl<X: 'static> EnhancedAnnotatedField<X> {
    pub(crate) fn new(
        field: Arc<AnnotatedField<X>>,
        container_id: ContainerId,
        resolved_type: TypeInfo,
        resolved_arguments: Vec<TypeInfo>,
    ) -> Self {
        Self {
            field,
            container_id,
            resolved_type,
            resolved_arguments,
        }
    }

    pub fn field(&self) -> &Arc<AnnotatedField<X>> {
        &self.field
    }

    pub fn container_id(&self) -> &ContainerId {
        &self.container_id
    }

    pub fn resolved_type(&self) -> TypeInfo {
        self.resolved_type
    }

    pub fn resolved_arguments(&self) -> &[TypeInfo] {
        &self.resolved_arguments
    }
}

impl<X: 'static> Debug for EnhancedAnnotatedField<X> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EnhancedAnnotatedField ({} in {})",
            self.field.metadata(),
            self.container_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Cache {
        capacity: usize,
    }

    #[test]
    fn member_ref_names_declaring_type_and_field() {
        let field = AnnotatedField::instance("capacity", |c: &Cache| c.capacity);
        let member = field.metadata().member();
        assert_eq!("capacity", member.name());
        assert!(member.declaring_type().contains("Cache"));
        assert!(format!("{}", member).ends_with("::capacity"));
    }

    #[test]
    fn instance_field_is_not_static() {
        let field = AnnotatedField::instance("capacity", |c: &Cache| c.capacity);
        assert!(!field.is_static());
        assert_eq!(TypeInfo::of::<usize>(), field.metadata().field_type());
    }

    #[test]
    fn static_field_needs_no_declaring_instance() {
        let field = AnnotatedField::<Cache>::static_field("limit", || 16usize);
        assert!(field.is_static());
    }

    #[test]
    fn builder_replaces_type_arguments_and_qualifiers() {
        let field = AnnotatedField::instance("capacity", |c: &Cache| c.capacity)
            .with_type_arguments([TypeArgument::Unresolved("T")])
            .with_qualifiers([Qualifier::Named("capacity")]);
        assert_eq!(
            &[TypeArgument::Unresolved("T")],
            field.metadata().type_arguments()
        );
        assert_eq!(
            &[Qualifier::Named("capacity")],
            field.metadata().qualifiers()
        );
    }
}
