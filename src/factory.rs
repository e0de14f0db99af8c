use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    annotated::AnnotatedField,
    bean::{Bean, DisposalMethod},
    container::Container,
    error::ConfigurationError,
    producer::{FieldProducer, ProducerFieldRuntime},
    transformer::TransformError,
};

/// Binds a producer field and its declaring bean to a container, and mints
/// validated [`FieldProducer`]s for arbitrary target beans.
///
/// Construction stores the three bindings and performs no validation; the
/// factory is immutable afterwards and every creation call is independent.
/// One factory can mint producers for multiple target beans sequentially.
pub struct FieldProducerFactory<X: 'static> {
    field: Arc<AnnotatedField<X>>,
    declaring_bean: Option<Arc<Bean<X>>>,
    container: Container,
}

impl<X: 'static> FieldProducerFactory<X> {
    pub(crate) fn new(
        field: Arc<AnnotatedField<X>>,
        declaring_bean: Option<Arc<Bean<X>>>,
        container: Container,
    ) -> Self {
        Self {
            field,
            declaring_bean,
            container,
        }
    }

    /// Creates a producer for `target_bean` that is safe to register into the
    /// container's bean graph.
    ///
    /// Ordering is fixed: the ownership check runs before anything else, a
    /// structural violation prevents injection target validation from ever
    /// running, and every failure leaves this entry point as a
    /// [`ConfigurationError`] naming the offending member, with the original
    /// violation attached as its source.
    pub fn create_validated_producer<T: 'static>(
        &self,
        target_bean: Arc<Bean<T>>,
    ) -> Result<FieldProducer<X, T>, ConfigurationError> {
        let member = self.field.metadata().member();
        if self.declaring_bean.is_none() && !self.field.is_static() {
            debug!(member = %self.field.metadata(), "producer field has no declaring bean");
            return Err(ConfigurationError::missing_declaring_bean(member));
        }
        self.container
            .structural_validator()
            .validate(self.field.metadata())
            .map_err(|violation| {
                debug!(member = %self.field.metadata(), %violation, "structural validation failed");
                ConfigurationError::invalid_member(member, violation)
            })?;
        let producer = self
            .create_producer(self.declaring_bean.clone(), target_bean, None)
            .map_err(|cause| ConfigurationError::assembly(member, cause))?;
        self.container
            .injection_targets()
            .validate_producer(producer.view())
            .map_err(|cause| {
                debug!(member = %self.field.metadata(), %cause, "producer rejected");
                ConfigurationError::rejected_producer(member, cause)
            })?;
        trace!(member = %self.field.metadata(), target_bean = producer.target_bean().name(), "validated producer ready");
        Ok(producer)
    }

    /// Producers returned from this method are not validated. Internal use
    /// only: callers wiring producer/disposer pairs validate the composed
    /// result themselves.
    ///
    /// The declaring bean is taken from the caller rather than from the
    /// factory's own binding, so one factory can serve differently scoped
    /// declaring beans.
    pub fn create_producer<T: 'static>(
        &self,
        declaring_bean: Option<Arc<Bean<X>>>,
        target_bean: Arc<Bean<T>>,
        disposal_method: Option<DisposalMethod<X, T>>,
    ) -> Result<FieldProducer<X, T>, TransformError> {
        let enhanced = self
            .container
            .member_transformer()
            .load_enhanced_member(&self.field, self.container.id())?;
        Ok(FieldProducer::new(
            self.field.clone(),
            self.container.clone(),
            declaring_bean,
            target_bean,
            ProducerFieldRuntime::new(enhanced, disposal_method),
        ))
    }
}
