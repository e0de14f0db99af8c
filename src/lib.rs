//! # Producer field resolution for dependency injection containers
//!
//! A producer field is a field on a managed component whose value supplies
//! instances of another component, rather than the field's owner being the
//! component itself. This crate turns the reflective description of such a
//! field ([`AnnotatedField`]) into a validated [`FieldProducer`]: a reusable
//! factory object bound to its field, its declaring bean, its target bean and
//! the owning container, ready to create and dispose instances on demand.
//!
//! Complete example:
//! ```
//! use fieldfac::{AnnotatedField, Bean, ContainerBuilder};
//! use std::sync::Arc;
//!
//! struct Repository {
//!     active_connections: usize,
//! }
//!
//! let container = ContainerBuilder::new("app").build();
//! let field = Arc::new(AnnotatedField::instance(
//!     "active_connections",
//!     |repository: &Repository| repository.active_connections,
//! ));
//! let declaring_bean = Arc::new(Bean::<Repository>::new("repository"));
//! let factory = container.producer_factory(field, Some(declaring_bean));
//!
//! let producer = factory
//!     .create_validated_producer(Arc::new(Bean::<usize>::new("activeConnections")))
//!     .expect("producer field is well formed");
//!
//! let repository = Repository { active_connections: 3 };
//! assert_eq!(Ok(3), producer.produce(Some(&repository)));
//! ```
//! # Notes
//! - A producer is never handed out by [`FieldProducerFactory::create_validated_producer`]
//!   without passing both structural validation and injection target validation;
//!   every failure surfaces as one [`ConfigurationError`] naming the offending member
//! - A producer field without a declaring bean is valid only if the field is static
//! - Enhanced member descriptors are resolved once per (field, container identity)
//!   and shared through a concurrent cache, so registration may run from multiple
//!   threads
//! - Producer/disposer pairs are wired through the unvalidated
//!   [`FieldProducerFactory::create_producer`] path, reserved for trusted
//!   in-process callers
//!
//! Visit the documentation for more details

mod annotated;
mod bean;
mod container;
mod error;
mod factory;
mod producer;
mod transformer;
mod untyped;
mod validation;

pub use annotated::{
    AnnotatedField, EnhancedAnnotatedField, FieldMetadata, MemberRef, Qualifier, TypeArgument,
    TypeInfo,
};
pub use bean::{Bean, DisposalMethod};
pub use container::{Container, ContainerBuilder, ContainerId};
pub use error::{ConfigurationError, ConfigurationErrorKind};
pub use factory::FieldProducerFactory;
pub use producer::{FieldProducer, ProduceError, ProducerFieldRuntime};
pub use transformer::{MemberTransformer, TransformError};
pub use validation::{
    DefaultInjectionTargetService, DefaultStructuralValidator, InjectionTargetService,
    ProducerValidationError, ProducerView, StructuralValidator, StructuralViolation,
};
