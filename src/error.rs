use core::fmt::{self, Display, Formatter};
use std::error::Error as StdError;

use thiserror::Error;

use crate::annotated::MemberRef;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// The message key identifying which rule a producer field configuration
/// violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigurationErrorKind {
    /// A non-static producer field has no declaring bean.
    MissingDeclaringBean,
    /// The annotated member failed structural validation.
    InvalidMember,
    /// The constructed producer was rejected by injection target validation.
    RejectedProducer,
    /// Any other failure surfaced while assembling the producer.
    Assembly,
}

impl Display for ConfigurationErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingDeclaringBean => "a non-static producer field must have a declaring bean",
            Self::InvalidMember => "the annotated member failed structural validation",
            Self::RejectedProducer => "the producer was rejected by injection target validation",
            Self::Assembly => "assembling the producer failed",
        })
    }
}

/// The single error type observable from the validated producer creation
/// path. Every failure names the offending member; the underlying violation
/// stays reachable through [`std::error::Error::source`] instead of being
/// flattened into the message.
#[derive(Debug, Error)]
#[error("invalid producer field configuration for `{member}`: {kind}")]
pub struct ConfigurationError {
    kind: ConfigurationErrorKind,
    member: MemberRef,
    #[source]
    cause: Option<BoxedCause>,
}

impl ConfigurationError {
    pub(crate) fn missing_declaring_bean(member: MemberRef) -> Self {
        Self {
            kind: ConfigurationErrorKind::MissingDeclaringBean,
            member,
            cause: None,
        }
    }

    pub(crate) fn invalid_member(
        member: MemberRef,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ConfigurationErrorKind::InvalidMember,
            member,
            cause: Some(Box::new(cause)),
        }
    }

    pub(crate) fn rejected_producer(
        member: MemberRef,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ConfigurationErrorKind::RejectedProducer,
            member,
            cause: Some(Box::new(cause)),
        }
    }

    pub(crate) fn assembly(member: MemberRef, cause: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            kind: ConfigurationErrorKind::Assembly,
            member,
            cause: Some(Box::new(cause)),
        }
    }

    pub fn kind(&self) -> ConfigurationErrorKind {
        self.kind
    }

    pub fn member(&self) -> MemberRef {
        self.member
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::StructuralViolation;

    fn member() -> MemberRef {
        MemberRef::new("app::Repository", "count")
    }

    #[test]
    fn display_names_member_and_rule() {
        let error = ConfigurationError::missing_declaring_bean(member());
        assert_eq!(
            "invalid producer field configuration for `app::Repository::count`: \
             a non-static producer field must have a declaring bean",
            format!("{}", error)
        );
        assert_eq!(ConfigurationErrorKind::MissingDeclaringBean, error.kind());
    }

    #[test]
    fn cause_stays_reachable_as_source() {
        let violation = StructuralViolation::UnresolvedTypeArgument {
            member: member(),
            argument: "T",
        };
        let error = ConfigurationError::invalid_member(member(), violation);
        let source = error.source().expect("structural cause is preserved");
        assert!(format!("{}", source).contains("unresolved type argument"));
    }
}
