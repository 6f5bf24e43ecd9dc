//! FieldStore - Per-instance tracked-field storage
//!
//! A slot map from descriptor identity to the instance's current value.
//! Writes are equality-gated: the store reports whether the value actually
//! changed, and the owning object turns that into scope activity.
//!
//! The store lock is independent of the scope ledger lock and the two are
//! never held at the same time.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use super::{Field, FieldKey, FieldValue};

type Slot = Box<dyn Any + Send + Sync>;

const SLOT_TYPE_VIOLATION: &str = "tracked field slot holds a different type";
const STORE_LOCK_POISONED: &str = "field store lock poisoned";

/// Per-instance value storage for tracked fields.
#[derive(Default)]
pub(crate) struct FieldStore {
    slots: RwLock<HashMap<FieldKey, Slot>>,
}

impl FieldStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current value of `field`, materializing the default on first touch.
    pub(crate) fn read<T: FieldValue>(&self, field: &'static Field<T>) -> T {
        {
            let slots = self.slots.read().expect(STORE_LOCK_POISONED);
            if let Some(slot) = slots.get(&field.key()) {
                return slot.downcast_ref::<T>().expect(SLOT_TYPE_VIOLATION).clone();
            }
        }

        let mut slots = self.slots.write().expect(STORE_LOCK_POISONED);
        slots
            .entry(field.key())
            .or_insert_with(|| Box::new(field.default_value()))
            .downcast_ref::<T>()
            .expect(SLOT_TYPE_VIOLATION)
            .clone()
    }

    /// Stores `value`; returns true when it differs from the current value.
    ///
    /// The compare-and-store runs under the write lock, so two racing
    /// writes of the same value can never both report a change.
    pub(crate) fn write<T: FieldValue>(&self, field: &'static Field<T>, value: T) -> bool {
        let mut slots = self.slots.write().expect(STORE_LOCK_POISONED);
        let slot = slots
            .entry(field.key())
            .or_insert_with(|| Box::new(field.default_value()));
        let current = slot.downcast_mut::<T>().expect(SLOT_TYPE_VIOLATION);

        if *current == value {
            return false;
        }
        *current = value;
        true
    }

    /// Runs `f` on the value in place, atomically with respect to other
    /// readers and writers. Returns whether the value changed plus `f`'s
    /// result.
    pub(crate) fn modify<T: FieldValue, R>(
        &self,
        field: &'static Field<T>,
        f: impl FnOnce(&mut T) -> R,
    ) -> (bool, R) {
        let mut slots = self.slots.write().expect(STORE_LOCK_POISONED);
        let slot = slots
            .entry(field.key())
            .or_insert_with(|| Box::new(field.default_value()));
        let current = slot.downcast_mut::<T>().expect(SLOT_TYPE_VIOLATION);

        let before = current.clone();
        let result = f(current);
        (*current != before, result)
    }
}

impl fmt::Debug for FieldStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.slots.read().expect(STORE_LOCK_POISONED).len();
        f.debug_struct("FieldStore").field("slots", &len).finish()
    }
}
