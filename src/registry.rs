//! Forward declarations for recursive schemas.
//!
//! A recursive schema needs to mention itself before it exists. The
//! [`ForwardRegistry`] hands out [`Forward`] handles that point at empty
//! slots in a shared table; containers embed the handle, and the slot is
//! filled once the full definition has been built.
//!
//! The table owns the bound checkers and handles only hold a weak reference
//! to the table, so a schema that contains its own forward does not form an
//! ownership cycle. Keep the registry alive for as long as its forwards are
//! used: once it is dropped every forward fails with
//! `forward_registry_dropped`, bound or not.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::Value;
use stillwater::Validation;
use tracing::debug;

use crate::codes;
use crate::error::{DataError, Violations};
use crate::schema::{Checker, SharedChecker};

struct Slot {
    name: Option<String>,
    checker: Option<SharedChecker>,
}

/// Type alias for the slot storage.
type SlotTable = Arc<RwLock<Vec<Slot>>>;

/// A thread-safe table of forward-declared checkers.
///
/// Cloning the registry shares the table.
///
/// # Example
///
/// ```rust
/// use scrutiny::{Checker, Dict, ForwardRegistry, List, Schema};
/// use serde_json::json;
///
/// let registry = ForwardRegistry::new();
/// let node = registry.declare("Node").unwrap();
///
/// node.provide(
///     Dict::new()
///         .field("name", Schema::string())
///         .field("children", List::new(node.clone())),
/// )
/// .unwrap();
///
/// let tree = json!({"name": "foo", "children": [{"name": "bar", "children": []}]});
/// assert_eq!(node.check(&tree).unwrap(), tree);
/// ```
#[derive(Clone, Default)]
pub struct ForwardRegistry {
    slots: SlotTable,
}

impl ForwardRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an anonymous slot.
    pub fn forward(&self) -> Forward {
        let mut slots = self.slots.write();
        self.push_slot(&mut slots, None)
    }

    /// Allocates a slot that can later be looked up by `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already declared.
    pub fn declare(&self, name: impl Into<String>) -> Result<Forward, RegistryError> {
        let name = name.into();
        let mut slots = self.slots.write();
        if slots.iter().any(|slot| slot.name.as_deref() == Some(name.as_str())) {
            return Err(RegistryError::DuplicateName(name));
        }
        debug!(name = %name, "declaring forward checker");
        Ok(self.push_slot(&mut slots, Some(name)))
    }

    fn push_slot(&self, slots: &mut Vec<Slot>, name: Option<String>) -> Forward {
        let id = slots.len();
        slots.push(Slot {
            name: name.clone(),
            checker: None,
        });
        Forward {
            id,
            name,
            table: Arc::downgrade(&self.slots),
        }
    }

    /// Looks up a named slot.
    pub fn get(&self, name: &str) -> Option<Forward> {
        let slots = self.slots.read();
        slots
            .iter()
            .position(|slot| slot.name.as_deref() == Some(name))
            .map(|id| Forward {
                id,
                name: Some(name.to_string()),
                table: Arc::downgrade(&self.slots),
            })
    }

    /// Lists the slots that were never provided: named slots by name,
    /// anonymous ones as `#<id>`.
    ///
    /// Call it after the schema is assembled to catch a forgotten `provide`.
    pub fn unbound(&self) -> Vec<String> {
        self.slots
            .read()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.checker.is_none())
            .map(|(id, slot)| slot.name.clone().unwrap_or_else(|| format!("#{}", id)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Checks a value against a named slot and flattens a failure.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the name was never declared.
    pub fn validate(&self, name: &str, value: &Value) -> Result<Validation<Value, Violations>, RegistryError> {
        let forward = self
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(forward.validate(value))
    }
}

/// A handle to a slot of a [`ForwardRegistry`].
///
/// Checking an unbound forward fails with code `trafaret_is_not_set`;
/// checking one whose registry was dropped fails with
/// `forward_registry_dropped`.
#[derive(Clone)]
pub struct Forward {
    id: usize,
    name: Option<String>,
    table: Weak<RwLock<Vec<Slot>>>,
}

impl Forward {
    /// Position of the slot in its registry.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Binds the slot. A slot can be bound once.
    ///
    /// The table lives in the registry, not in the forward: a schema built
    /// from forwards only works while its registry is alive. Return the
    /// registry together with the schema from a constructor function.
    ///
    /// # Errors
    ///
    /// - `RegistryError::AlreadyBound` if the slot already holds a checker
    /// - `RegistryError::RegistryDropped` if the owning registry is gone
    pub fn provide<C: Checker + 'static>(&self, checker: C) -> Result<(), RegistryError> {
        let table = self.table.upgrade().ok_or(RegistryError::RegistryDropped)?;
        let mut slots = table.write();
        let slot = slots.get_mut(self.id).ok_or(RegistryError::RegistryDropped)?;
        if slot.checker.is_some() {
            return Err(RegistryError::AlreadyBound(self.label()));
        }
        let checker = checker.into_shared();
        debug!(forward = %self.label(), checker = %checker.describe(), "binding forward checker");
        slot.checker = Some(checker);
        Ok(())
    }

    /// False when the slot is empty or the registry is gone.
    pub fn is_bound(&self) -> bool {
        self.table
            .upgrade()
            .is_some_and(|table| table.read().get(self.id).is_some_and(|slot| slot.checker.is_some()))
    }

    fn fail(&self, message: &str, code: &str, value: &Value) -> DataError {
        DataError::new(message)
            .with_code(code)
            .with_value(value.clone())
            .with_checker(self.describe())
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.id),
        }
    }
}

impl Checker for Forward {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        let Some(table) = self.table.upgrade() else {
            return Err(self.fail("forward registry was dropped", codes::FORWARD_REGISTRY_DROPPED, value));
        };
        // The guard is released at the end of the statement, before recursing.
        let bound = table.read().get(self.id).and_then(|slot| slot.checker.clone());
        match bound {
            Some(checker) => checker.check_with_context(value, context),
            None => Err(self.fail("trafaret not set yet", codes::TRAFARET_IS_NOT_SET, value)),
        }
    }

    fn describe(&self) -> String {
        format!("<Forward({})>", self.label())
    }
}

/// Errors that can occur while declaring or binding forwards.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to declare a name that already exists.
    #[error("forward '{0}' already declared")]
    DuplicateName(String),

    /// Attempted to bind a slot twice.
    #[error("forward '{0}' is already bound")]
    AlreadyBound(String),

    /// The registry owning the slot was dropped.
    #[error("forward registry was dropped")]
    RegistryDropped,

    /// Attempted to validate with a name that was never declared.
    #[error("forward '{0}' not found")]
    NotFound(String),
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ForwardRegistry>();
    assert_sync::<ForwardRegistry>();
    assert_send::<Forward>();
    assert_sync::<Forward>();
};
