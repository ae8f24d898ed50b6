//! Shared, identity-carrying handles for composite values.
//!
//! Composite containers ([`Value::Array`], [`Value::Object`], [`Value::Map`]
//! and [`Value::Set`]) live behind a [`Shared`] handle. Cloning a handle is
//! cheap and yields a second reference to the *same* node, which is how a
//! value graph expresses sharing and reference cycles:
//!
//! ```rust
//! use deep_value::{value, Value};
//!
//! let node = value!({ "a": 1 });
//! let obj = node.as_object().unwrap();
//! obj.borrow_mut().insert("self".to_string(), node.clone());
//!
//! let inner = obj.borrow().get("self").cloned().unwrap();
//! assert_eq!(inner.node_id(), node.node_id());
//! ```
//!
//! [`Value::Array`]: crate::Value::Array
//! [`Value::Object`]: crate::Value::Object
//! [`Value::Map`]: crate::Value::Map
//! [`Value::Set`]: crate::Value::Set

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Identity of a composite node.
///
/// Two handles have the same `NodeId` exactly when they point at the same
/// allocation. Ids are only meaningful while the node is alive, which holds
/// for the duration of any traversal borrowing the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the raw address backing this id.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// A reference-counted, interior-mutable node of a value graph.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    /// Allocates a new node holding `inner`.
    #[must_use]
    pub fn new(inner: T) -> Self {
        Shared(Rc::new(RefCell::new(inner)))
    }

    /// Immutably borrows the node contents.
    ///
    /// # Panics
    ///
    /// Panics if the node is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrows the node contents.
    ///
    /// # Panics
    ///
    /// Panics if the node is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles point at the same node.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the identity of this node.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Number of handles currently pointing at this node.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Shared::new(T::default())
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T> From<T> for Shared<T> {
    fn from(inner: T) -> Self {
        Shared::new(inner)
    }
}

// Contents may be cyclic, so handles only ever print their identity.
impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({})", self.id())
    }
}
