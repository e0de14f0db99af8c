use thiserror::Error;

use crate::annotated::{FieldMetadata, MemberRef, Qualifier, TypeArgument, TypeInfo};

/// Member level correctness violations found before a producer is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuralViolation {
    #[error("`{member}` declares unresolved type argument `{argument}`")]
    UnresolvedTypeArgument {
        member: MemberRef,
        argument: &'static str,
    },
    #[error("`{member}` declares qualifier {qualifier:?} more than once")]
    DuplicateQualifier {
        member: MemberRef,
        qualifier: Qualifier,
    },
}

/// Stateless checker rejecting malformed annotated members before they reach
/// production.
pub trait StructuralValidator: Send + Sync {
    fn validate(&self, member: &FieldMetadata) -> Result<(), StructuralViolation>;
}

/// Rejects members whose declared type carries holes the container cannot
/// safely process, and duplicated qualifier metadata.
#[derive(Debug, Default)]
pub struct DefaultStructuralValidator;

impl StructuralValidator for DefaultStructuralValidator {
    fn validate(&self, member: &FieldMetadata) -> Result<(), StructuralViolation> {
        for argument in member.type_arguments() {
            if let TypeArgument::Unresolved(name) = argument {
                return Err(StructuralViolation::UnresolvedTypeArgument {
                    member: member.member(),
                    argument: name,
                });
            }
        }
        let qualifiers = member.qualifiers();
        for (index, qualifier) in qualifiers.iter().enumerate() {
            if qualifiers[..index].contains(qualifier) {
                return Err(StructuralViolation::DuplicateQualifier {
                    member: member.member(),
                    qualifier: *qualifier,
                });
            }
        }
        Ok(())
    }
}

/// Non generic view of a constructed producer, handed to the injection target
/// service for post construction checks.
pub struct ProducerView<'a> {
    pub member: &'a FieldMetadata,
    pub resolved_type: TypeInfo,
    pub has_declaring_bean: bool,
    pub target_bean_name: &'static str,
    pub target_bean_type: TypeInfo,
}

/// Reasons a constructed producer may be rejected even though its field is
/// structurally sound.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProducerValidationError {
    #[error(
        "producer for `{member}` produces {produced} but the target bean `{bean}` expects {expected}"
    )]
    ProducedTypeMismatch {
        member: MemberRef,
        bean: &'static str,
        produced: TypeInfo,
        expected: TypeInfo,
    },
}

/// Post construction validator consulted before a producer is accepted into
/// the container's bean graph.
pub trait InjectionTargetService: Send + Sync {
    fn validate_producer(&self, producer: ProducerView<'_>) -> Result<(), ProducerValidationError>;
}

/// Rejects producers whose resolved type disagrees with the bean they are
/// supposed to supply instances for.
#[derive(Debug, Default)]
pub struct DefaultInjectionTargetService;

impl InjectionTargetService for DefaultInjectionTargetService {
    fn validate_producer(&self, producer: ProducerView<'_>) -> Result<(), ProducerValidationError> {
        if producer.resolved_type.id() != producer.target_bean_type.id() {
            return Err(ProducerValidationError::ProducedTypeMismatch {
                member: producer.member.member(),
                bean: producer.target_bean_name,
                produced: producer.resolved_type,
                expected: producer.target_bean_type,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotated::AnnotatedField;

    struct Registry {
        entries: usize,
    }

    #[test]
    fn accepts_plain_member() {
        let field = AnnotatedField::instance("entries", |r: &Registry| r.entries);
        assert_eq!(
            Ok(()),
            DefaultStructuralValidator.validate(field.metadata())
        );
    }

    #[test]
    fn rejects_unresolved_type_argument() {
        let field = AnnotatedField::instance("entries", |r: &Registry| r.entries)
            .with_type_arguments([
                TypeArgument::Resolved(TypeInfo::of::<usize>()),
                TypeArgument::Unresolved("V"),
            ]);
        assert_eq!(
            Err(StructuralViolation::UnresolvedTypeArgument {
                member: field.metadata().member(),
                argument: "V",
            }),
            DefaultStructuralValidator.validate(field.metadata())
        );
    }

    #[test]
    fn rejects_duplicate_qualifier() {
        let field = AnnotatedField::instance("entries", |r: &Registry| r.entries)
            .with_qualifiers([Qualifier::Named("entries"), Qualifier::Named("entries")]);
        assert!(matches!(
            DefaultStructuralValidator.validate(field.metadata()),
            Err(StructuralViolation::DuplicateQualifier { .. })
        ));
    }

    #[test]
    fn rejects_produced_type_disagreeing_with_target_bean() {
        let field = AnnotatedField::instance("entries", |r: &Registry| r.entries);
        let view = ProducerView {
            member: field.metadata(),
            resolved_type: TypeInfo::of::<usize>(),
            has_declaring_bean: true,
            target_bean_name: "entries",
            target_bean_type: TypeInfo::of::<String>(),
        };
        assert!(matches!(
            DefaultInjectionTargetService.validate_producer(view),
            Err(ProducerValidationError::ProducedTypeMismatch { .. })
        ));
    }
}
