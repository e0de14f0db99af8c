use core::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::{
    annotated::AnnotatedField,
    bean::Bean,
    factory::FieldProducerFactory,
    transformer::MemberTransformer,
    validation::{
        DefaultInjectionTargetService, DefaultStructuralValidator, InjectionTargetService,
        StructuralValidator,
    },
};

static DEFAULT_TRANSFORMER: Lazy<Arc<MemberTransformer>> =
    Lazy::new(|| Arc::new(MemberTransformer::new()));
static DEFAULT_STRUCTURAL_VALIDATOR: Lazy<Arc<dyn StructuralValidator>> =
    Lazy::new(|| Arc::new(DefaultStructuralValidator));
static DEFAULT_INJECTION_TARGETS: Lazy<Arc<dyn InjectionTargetService>> =
    Lazy::new(|| Arc::new(DefaultInjectionTargetService));

/// Identity of a container. Enhanced member descriptors are cached per
/// container identity, so two containers never share a resolved view.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContainerId(Arc<str>);

impl ContainerId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContainerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct ContainerState {
    id: ContainerId,
    transformer: Arc<MemberTransformer>,
    structural_validator: Arc<dyn StructuralValidator>,
    injection_targets: Arc<dyn InjectionTargetService>,
}

/// Handle to the container a producer factory is bound to: its identity plus
/// the infrastructure services this core consumes, injected explicitly at
/// construction time rather than looked up from a global registry.
///
/// Cheap to clone; all clones share the same state.
pub struct Container {
    state: Arc<ContainerState>,
}

impl Container {
    /// Public entry to obtain a factory bound to (field, declaring bean, this
    /// container). The factory constructor itself is crate internal.
    pub fn producer_factory<X: 'static>(
        &self,
        field: Arc<AnnotatedField<X>>,
        declaring_bean: Option<Arc<Bean<X>>>,
    ) -> FieldProducerFactory<X> {
        FieldProducerFactory::new(field, declaring_bean, self.clone())
    }

    pub fn id(&self) -> &ContainerId {
        &self.state.id
    }

    pub fn member_transformer(&self) -> &MemberTransformer {
        &self.state.transformer
    }

    pub(crate) fn structural_validator(&self) -> &dyn StructuralValidator {
        self.state.structural_validator.as_ref()
    }

    pub(crate) fn injection_targets(&self) -> &dyn InjectionTargetService {
        self.state.injection_targets.as_ref()
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Container (id: {}, cached members: {})",
            self.state.id,
            self.state.transformer.cached_member_count()
        )
    }
}

/// Builds a [`Container`]. Every infrastructure service has a process wide
/// default and can be replaced individually, which is how tests install
/// doubles and embedders bring their own rules.
pub struct ContainerBuilder {
    id: ContainerId,
    transformer: Option<Arc<MemberTransformer>>,
    structural_validator: Option<Arc<dyn StructuralValidator>>,
    injection_targets: Option<Arc<dyn InjectionTargetService>>,
}

impl ContainerBuilder {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: ContainerId::new(id),
            transformer: None,
            structural_validator: None,
            injection_targets: None,
        }
    }

    pub fn with_member_transformer(mut self, transformer: Arc<MemberTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn with_structural_validator(mut self, validator: Arc<dyn StructuralValidator>) -> Self {
        self.structural_validator = Some(validator);
        self
    }

    pub fn with_injection_target_service(
        mut self,
        injection_targets: Arc<dyn InjectionTargetService>,
    ) -> Self {
        self.injection_targets = Some(injection_targets);
        self
    }

    pub fn build(self) -> Container {
        Container {
            state: Arc::new(ContainerState {
                id: self.id,
                transformer: self
                    .transformer
                    .unwrap_or_else(|| DEFAULT_TRANSFORMER.clone()),
                structural_validator: self
                    .structural_validator
                    .unwrap_or_else(|| DEFAULT_STRUCTURAL_VALIDATOR.clone()),
                injection_targets: self
                    .injection_targets
                    .unwrap_or_else(|| DEFAULT_INJECTION_TARGETS.clone()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_containers_share_the_singleton_transformer() {
        let first = ContainerBuilder::new("first").build();
        let second = ContainerBuilder::new("second").build();
        assert!(core::ptr::eq(
            first.member_transformer(),
            second.member_transformer()
        ));
    }

    #[test]
    fn clones_share_state() {
        let container = ContainerBuilder::new("app").build();
        let clone = container.clone();
        assert_eq!(container.id(), clone.id());
        assert!(core::ptr::eq(
            container.member_transformer(),
            clone.member_transformer()
        ));
    }

    #[test]
    fn debug_reports_identity_and_cache_size() {
        let container = ContainerBuilder::new("app")
            .with_member_transformer(Arc::new(MemberTransformer::new()))
            .build();
        assert_eq!(
            "Container (id: app, cached members: 0)",
            format!("{:?}", container)
        );
    }
}
