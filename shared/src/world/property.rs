use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use tether_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::world::layout::PropertyLayout;

/// A replicated field as its entity sees it, regardless of value type.
///
/// Cells are visited in declaration order, which is the order they travel
/// in on the wire. Each cell writes a present bit ahead of its value so an
/// unchanged field costs a single bit per delta.
pub trait PropertyCell {
    fn is_dirty(&self) -> bool;

    fn mark_dirty(&mut self);

    /// Writes the present bit, then the value when dirty. Clears the dirty flag.
    fn pack(&mut self, writer: &mut dyn BitWrite);

    /// Writes the value unconditionally, as present. Leaves the dirty flag alone.
    fn write_full(&self, writer: &mut dyn BitWrite);

    /// Reads the present bit and, when set, overwrites the value. A value
    /// arriving from the network never marks the cell dirty.
    fn apply(&mut self, reader: &mut BitReader) -> Result<(), SerdeErr>;

    /// Reads past this cell's entry the way `apply` would, leaving the value
    /// untouched.
    fn skip(&self, reader: &mut BitReader) -> Result<(), SerdeErr>;

    fn layout(&self) -> PropertyLayout;

    /// Records the cell's position in its entity's wire order.
    fn attach(&mut self, index: u16);

    fn index(&self) -> Option<u16>;
}

/// A Property of a Behaviour, that contains data which must be tracked for
/// updates
#[derive(Clone)]
pub struct Property<T: Serde> {
    inner: T,
    dirty: bool,
    index: Option<u16>,
}

impl<T: Serde> Property<T> {
    /// Create a new clean Property
    pub fn new(value: T) -> Self {
        Self {
            inner: value,
            dirty: false,
            index: None,
        }
    }

    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Replace the value and queue it for replication. Setting an equal value
    /// still queues it.
    pub fn set(&mut self, value: T) {
        self.inner = value;
        self.dirty = true;
    }

    pub fn modify<F: FnOnce(&mut T)>(&mut self, modifier: F) {
        modifier(&mut self.inner);
        self.dirty = true;
    }

    /// Compare to another property
    pub fn equals(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    /// Set value to the value of another Property, queues for update
    pub fn mirror(&mut self, other: &Self) {
        self.set(other.inner.clone());
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Serde> PropertyCell for Property<T> {
    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn pack(&mut self, writer: &mut dyn BitWrite) {
        self.dirty.ser(writer);
        if self.dirty {
            self.inner.ser(writer);
            self.dirty = false;
        }
    }

    fn write_full(&self, writer: &mut dyn BitWrite) {
        true.ser(writer);
        self.inner.ser(writer);
    }

    fn apply(&mut self, reader: &mut BitReader) -> Result<(), SerdeErr> {
        if bool::de(reader)? {
            self.inner = T::de(reader)?;
        }
        Ok(())
    }

    fn skip(&self, reader: &mut BitReader) -> Result<(), SerdeErr> {
        if bool::de(reader)? {
            T::de(reader)?;
        }
        Ok(())
    }

    fn layout(&self) -> PropertyLayout {
        PropertyLayout::of::<T>()
    }

    fn attach(&mut self, index: u16) {
        self.index = Some(index);
    }

    fn index(&self) -> Option<u16> {
        self.index
    }
}

// Reads go straight through to the value
impl<T: Serde> Deref for Property<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Serde> DerefMut for Property<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // Any mutable borrow counts as a change
        self.dirty = true;
        &mut self.inner
    }
}

impl<T: Serde + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Serde + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.inner)
            .field("dirty", &self.dirty)
            .field("index", &self.index)
            .finish()
    }
}
