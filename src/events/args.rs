//! # Broadcast arguments.
//!
//! [`Args`] is the type-erased payload handed to every listener of a
//! broadcast. The dispatcher never inspects the values, it only forwards
//! the list unchanged to each matched callback.
//!
//! Values are stored as `Rc<dyn Any>` so one payload can fan out to many
//! listeners without cloning the underlying data.
//!
//! # Example
//! ```
//! use signalcast::Args;
//!
//! let args = Args::new().with(3u32).with(String::from("laser"));
//!
//! assert_eq!(args.len(), 2);
//! assert_eq!(args.get::<u32>(0), Some(&3));
//! assert_eq!(args.get::<String>(1).map(String::as_str), Some("laser"));
//! assert_eq!(args.get::<f64>(0), None); // wrong type
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Type-erased, positionally indexed argument list for one broadcast.
#[derive(Clone, Default)]
pub struct Args {
    values: Vec<Rc<dyn Any>>,
}

impl Args {
    /// Creates an empty argument list.
    #[inline]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends a value, builder style.
    #[inline]
    #[must_use]
    pub fn with<T: Any>(mut self, value: T) -> Self {
        self.values.push(Rc::new(value));
        self
    }

    /// Appends a value in place.
    #[inline]
    pub fn push<T: Any>(&mut self, value: T) {
        self.values.push(Rc::new(value));
    }

    /// Returns the value at `index` downcast to `T`, or `None` if the
    /// index is out of range or the value has a different type.
    #[inline]
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    /// Returns the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the list carries no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args").field("len", &self.values.len()).finish()
    }
}
