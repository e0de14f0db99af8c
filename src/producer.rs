use core::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use thiserror::Error;

use crate::{
    annotated::{AnnotatedField, EnhancedAnnotatedField, MemberRef, TypeInfo},
    bean::{Bean, DisposalMethod},
    container::Container,
    validation::ProducerView,
};

/// Failures while creating or disposing instances through a producer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProduceError {
    #[error("producing from instance field `{member}` requires a declaring component instance")]
    MissingReceiver { member: MemberRef },
    #[error("disposing through `{disposer}` requires a declaring component instance")]
    MissingDisposerReceiver { disposer: &'static str },
    #[error("field `{member}` produces {actual} but the producer was typed {expected}")]
    ProducedTypeMismatch {
        member: MemberRef,
        expected: TypeInfo,
        actual: TypeInfo,
    },
}

/// Generic producer field runtime: owns the enhanced descriptor and the
/// optional disposal method, and implements the actual create/destroy
/// semantics the emitted [`FieldProducer`] delegates to.
pub struct ProducerFieldRuntime<X: 'static, T: 'static> {
    enhanced: Arc<EnhancedAnnotatedField<X>>,
    disposal: Option<DisposalMethod<X, T>>,
}

impl<X: 'static, T: 'static> ProducerFieldRuntime<X, T> {
    pub(crate) fn new(
        enhanced: Arc<EnhancedAnnotatedField<X>>,
        disposal: Option<DisposalMethod<X, T>>,
    ) -> Self {
        Self { enhanced, disposal }
    }

    pub fn enhanced_member(&self) -> &EnhancedAnnotatedField<X> {
        &self.enhanced
    }

    pub fn disposal_method(&self) -> Option<&DisposalMethod<X, T>> {
        self.disposal.as_ref()
    }

    /// Reads the field value from the receiver, or without one for a static
    /// field.
    pub fn produce(&self, receiver: Option<&X>) -> Result<T, ProduceError> {
        let metadata = self.enhanced.field().metadata();
        let value = self
            .enhanced
            .field()
            .reader()
            .read(receiver)
            .ok_or_else(|| ProduceError::MissingReceiver {
                member: metadata.member(),
            })?;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(ProduceError::ProducedTypeMismatch {
                member: metadata.member(),
                expected: TypeInfo::of::<T>(),
                actual: self.enhanced.resolved_type(),
            }),
        }
    }

    /// Releases an instance. Without a disposal method, dropping the
    /// instance is the whole disposal.
    pub fn dispose(&self, receiver: Option<&X>, instance: T) -> Result<(), ProduceError> {
        match &self.disposal {
            Some(method) => {
                method
                    .invoke(receiver, instance)
                    .ok_or(ProduceError::MissingDisposerReceiver {
                        disposer: method.name(),
                    })
            }
            None => Ok(()),
        }
    }
}

/// The emitted artifact: a producer bound to its annotated member, owning
/// container, declaring bean and target bean, delegating create/destroy to
/// the [`ProducerFieldRuntime`].
///
/// The four bindings are explicit fields; nothing is captured in closures.
pub struct FieldProducer<X: 'static, T: 'static> {
    field: Arc<AnnotatedField<X>>,
    container: Container,
    declaring_bean: Option<Arc<Bean<X>>>,
    target_bean: Arc<Bean<T>>,
    runtime: ProducerFieldRuntime<X, T>,
}

impl<X: 'static, T: 'static> FieldProducer<X, T> {
    pub(crate) fn new(
        field: Arc<AnnotatedField<X>>,
        container: Container,
        declaring_bean: Option<Arc<Bean<X>>>,
        target_bean: Arc<Bean<T>>,
        runtime: ProducerFieldRuntime<X, T>,
    ) -> Self {
        Self {
            field,
            container,
            declaring_bean,
            target_bean,
            runtime,
        }
    }

    pub fn annotated_member(&self) -> &AnnotatedField<X> {
        &self.field
    }

    pub fn owning_container(&self) -> &Container {
        &self.container
    }

    pub fn declaring_bean(&self) -> Option<&Arc<Bean<X>>> {
        self.declaring_bean.as_ref()
    }

    pub fn target_bean(&self) -> &Arc<Bean<T>> {
        &self.target_bean
    }

    pub fn runtime(&self) -> &ProducerFieldRuntime<X, T> {
        &self.runtime
    }

    pub fn produce(&self, receiver: Option<&X>) -> Result<T, ProduceError> {
        self.runtime.produce(receiver)
    }

    pub fn dispose(&self, receiver: Option<&X>, instance: T) -> Result<(), ProduceError> {
        self.runtime.dispose(receiver, instance)
    }

    pub(crate) fn view(&self) -> ProducerView<'_> {
        ProducerView {
            member: self.field.metadata(),
            resolved_type: self.runtime.enhanced.resolved_type(),
            has_declaring_bean: self.declaring_bean.is_some(),
            target_bean_name: self.target_bean.name(),
            target_bean_type: self.target_bean.bean_type(),
        }
    }
}

impl<X: 'static, T: 'static> Debug for FieldProducer<X, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FieldProducer (member: {}, target: `{}`)",
            self.field.metadata(),
            self.target_bean.name()
        )
    }
}
