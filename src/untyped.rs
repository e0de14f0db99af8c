use core::any::Any;

use crate::annotated::TypeInfo;

type BoxedValue = Box<dyn Any + Send + Sync>;

enum ReadFn<X: 'static> {
    Instance(Box<dyn Fn(&X) -> BoxedValue + Send + Sync>),
    Static(Box<dyn Fn() -> BoxedValue + Send + Sync>),
}

/// A typed field reader erased behind `dyn Any`, tagged with the type it
/// produces. The tag allows the producer runtime to recover the value with a
/// checked downcast instead of trusting the caller.
pub(crate) struct UntypedReader<X: 'static> {
    result_type: TypeInfo,
    read: ReadFn<X>,
}

impl<X: 'static> UntypedReader<X> {
    pub fn instance<T: Any + Send + Sync>(read: fn(&X) -> T) -> Self {
        Self {
            result_type: TypeInfo::of::<T>(),
            read: ReadFn::Instance(Box::new(move |x| Box::new(read(x)))),
        }
    }

    pub fn static_field<T: Any + Send + Sync>(read: fn() -> T) -> Self {
        Self {
            result_type: TypeInfo::of::<T>(),
            read: ReadFn::Static(Box::new(move || Box::new(read()))),
        }
    }

    pub fn result_type(&self) -> TypeInfo {
        self.result_type
    }

    /// Reads the field value. Returns `None` when an instance reader is
    /// invoked without a receiver.
    pub fn read(&self, receiver: Option<&X>) -> Option<BoxedValue> {
        match (&self.read, receiver) {
            (ReadFn::Static(read), _) => Some(read()),
            (ReadFn::Instance(read), Some(receiver)) => Some(read(receiver)),
            (ReadFn::Instance(_), None) => None,
        }
    }
}
