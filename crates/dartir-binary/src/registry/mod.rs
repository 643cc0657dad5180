//! Relationship registry
//!
//! A graph over declaration ids that the tree does not spell out: which
//! widget owns which state class, the state lifecycle hooks, what each
//! `build` method produces, who calls whom, who touches which field, the
//! class hierarchy and the implementers of each interface.
//!
//! The registry is built once per encode call (see [`RelationshipRegistry::build`]),
//! optionally extended through [`record_method_call`] and [`record_field_access`],
//! then validated. Only the [`RelationshipSection`] part is serialized; the
//! id indexes exist to validate it.
//!
//! [`record_method_call`]: RelationshipRegistry::record_method_call
//! [`record_field_access`]: RelationshipRegistry::record_field_access

mod inference;
mod pairing;

pub use pairing::{NamingConventionPairing, StatePairing};

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// State lifecycle hooks, tagged on the wire by their discriminant
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleMethod {
    /// `initState`
    InitState = 0,
    /// `dispose`
    Dispose = 1,
    /// `didUpdateWidget`
    DidUpdateWidget = 2,
    /// `didChangeDependencies`
    DidChangeDependencies = 3,
}

impl LifecycleMethod {
    /// Match a method name exactly
    pub fn from_method_name(name: &str) -> Option<Self> {
        match name {
            "initState" => Some(Self::InitState),
            "dispose" => Some(Self::Dispose),
            "didUpdateWidget" => Some(Self::DidUpdateWidget),
            "didChangeDependencies" => Some(Self::DidChangeDependencies),
            _ => None,
        }
    }

    /// Dart method name
    pub fn method_name(self) -> &'static str {
        match self {
            Self::InitState => "initState",
            Self::Dispose => "dispose",
            Self::DidUpdateWidget => "didUpdateWidget",
            Self::DidChangeDependencies => "didChangeDependencies",
        }
    }

    /// Convert to the wire byte
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from the wire byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::InitState),
            1 => Some(Self::Dispose),
            2 => Some(Self::DidUpdateWidget),
            3 => Some(Self::DidChangeDependencies),
            _ => None,
        }
    }
}

/// The serialized part of the registry
///
/// All maps are ordered, so iteration and therefore output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipSection {
    /// Widget class id → state class id
    pub widget_to_state: BTreeMap<String, String>,
    /// State class id → lifecycle hook → method id
    pub lifecycle: BTreeMap<String, BTreeMap<LifecycleMethod, String>>,
    /// State class id → `build` method id
    pub build_methods: BTreeMap<String, String>,
    /// Caller id → callee ids
    pub method_calls: BTreeMap<String, BTreeSet<String>>,
    /// Accessor id → field ids
    pub field_accesses: BTreeMap<String, BTreeSet<String>>,
    /// Class id → superclass display name
    pub class_hierarchy: BTreeMap<String, String>,
    /// Interface display name → implementing class ids
    pub interface_implementers: BTreeMap<String, BTreeSet<String>>,
    /// Class id → widget its `build` method produces
    pub build_outputs: BTreeMap<String, String>,
}

impl RelationshipSection {
    /// Check if no relationship of any kind is recorded
    pub fn is_empty(&self) -> bool {
        self.widget_to_state.is_empty()
            && self.lifecycle.is_empty()
            && self.build_methods.is_empty()
            && self.method_calls.is_empty()
            && self.field_accesses.is_empty()
            && self.class_hierarchy.is_empty()
            && self.interface_implementers.is_empty()
            && self.build_outputs.is_empty()
    }
}

/// One dangling or inconsistent relationship
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationshipIssue {
    /// Id used as a callable is not a declared method, constructor or function
    #[error("{map}: '{id}' is not a declared method, constructor or function")]
    UnknownMethod {
        /// Map the id appears in
        map: &'static str,
        /// Offending id
        id: String,
    },

    /// Id used as a field is not a declared field or top-level variable
    #[error("{map}: '{id}' is not a declared field or variable")]
    UnknownField {
        /// Map the id appears in
        map: &'static str,
        /// Offending id
        id: String,
    },

    /// Id used as a class is not a declared class
    #[error("{map}: '{id}' is not a declared class")]
    UnknownClass {
        /// Map the id appears in
        map: &'static str,
        /// Offending id
        id: String,
    },

    /// Lifecycle or build method registered on a class that does not declare it
    #[error("method '{method}' is registered on state '{state}' but declared elsewhere")]
    LifecycleOwnerMismatch {
        /// State class id
        state: String,
        /// Method id
        method: String,
    },

    /// Widget paired with itself
    #[error("widget '{0}' is paired with itself")]
    SelfPairing(String),
}

/// Relationship graph for one file
#[derive(Debug, Clone, Default)]
pub struct RelationshipRegistry {
    section: RelationshipSection,
    method_to_class: BTreeMap<String, String>,
    field_to_class: BTreeMap<String, String>,
    class_ids: BTreeSet<String>,
    callable_ids: BTreeSet<String>,
    field_ids: BTreeSet<String>,
}

impl RelationshipRegistry {
    /// The relationships that get serialized
    pub fn section(&self) -> &RelationshipSection {
        &self.section
    }

    /// Consume the registry, keeping the serialized part
    pub fn into_section(self) -> RelationshipSection {
        self.section
    }

    /// Method or constructor id → owning class id
    pub fn method_to_class(&self) -> &BTreeMap<String, String> {
        &self.method_to_class
    }

    /// Field id → owning class id
    pub fn field_to_class(&self) -> &BTreeMap<String, String> {
        &self.field_to_class
    }

    /// Check if `id` names a method, constructor or top-level function
    pub fn is_callable(&self, id: &str) -> bool {
        self.callable_ids.contains(id)
    }

    /// Check if `id` names a field or top-level variable
    pub fn is_field(&self, id: &str) -> bool {
        self.field_ids.contains(id)
    }

    /// Check if `id` names a class
    pub fn is_class(&self, id: &str) -> bool {
        self.class_ids.contains(id)
    }

    /// Record a call edge supplied by the frontend
    pub fn record_method_call(&mut self, caller: impl Into<String>, callee: impl Into<String>) {
        self.section
            .method_calls
            .entry(caller.into())
            .or_default()
            .insert(callee.into());
    }

    /// Record a field-access edge supplied by the frontend
    pub fn record_field_access(&mut self, accessor: impl Into<String>, field: impl Into<String>) {
        self.section
            .field_accesses
            .entry(accessor.into())
            .or_default()
            .insert(field.into());
    }

    /// Check every edge against the declared ids, collecting all violations
    pub fn validate(&self) -> Result<(), Vec<RelationshipIssue>> {
        let mut issues = Vec::new();
        let section = &self.section;

        for (caller, callees) in &section.method_calls {
            self.expect_callable("method_calls", caller, &mut issues);
            for callee in callees {
                self.expect_callable("method_calls", callee, &mut issues);
            }
        }
        for (accessor, fields) in &section.field_accesses {
            self.expect_callable("field_accesses", accessor, &mut issues);
            for field in fields {
                if !self.is_field(field) {
                    issues.push(RelationshipIssue::UnknownField {
                        map: "field_accesses",
                        id: field.clone(),
                    });
                }
            }
        }
        for (widget, state) in &section.widget_to_state {
            self.expect_class("widget_to_state", widget, &mut issues);
            self.expect_class("widget_to_state", state, &mut issues);
            if widget == state {
                issues.push(RelationshipIssue::SelfPairing(widget.clone()));
            }
        }
        for (state, methods) in &section.lifecycle {
            self.expect_class("lifecycle", state, &mut issues);
            for method in methods.values() {
                self.expect_owned_method("lifecycle", state, method, &mut issues);
            }
        }
        for (state, method) in &section.build_methods {
            self.expect_class("build_methods", state, &mut issues);
            self.expect_owned_method("build_methods", state, method, &mut issues);
        }
        for class in section.class_hierarchy.keys() {
            self.expect_class("class_hierarchy", class, &mut issues);
        }
        for classes in section.interface_implementers.values() {
            for class in classes {
                self.expect_class("interface_implementers", class, &mut issues);
            }
        }
        for class in section.build_outputs.keys() {
            self.expect_class("build_outputs", class, &mut issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    fn expect_callable(&self, map: &'static str, id: &str, issues: &mut Vec<RelationshipIssue>) {
        if !self.is_callable(id) {
            issues.push(RelationshipIssue::UnknownMethod {
                map,
                id: id.to_string(),
            });
        }
    }

    fn expect_class(&self, map: &'static str, id: &str, issues: &mut Vec<RelationshipIssue>) {
        if !self.is_class(id) {
            issues.push(RelationshipIssue::UnknownClass {
                map,
                id: id.to_string(),
            });
        }
    }

    fn expect_owned_method(
        &self,
        map: &'static str,
        state: &str,
        method: &str,
        issues: &mut Vec<RelationshipIssue>,
    ) {
        match self.method_to_class.get(method) {
            None => issues.push(RelationshipIssue::UnknownMethod {
                map,
                id: method.to_string(),
            }),
            Some(owner) if owner != state => issues.push(RelationshipIssue::LifecycleOwnerMismatch {
                state: state.to_string(),
                method: method.to_string(),
            }),
            Some(_) => {}
        }
    }
}
