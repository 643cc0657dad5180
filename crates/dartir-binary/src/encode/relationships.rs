//! Relationship section writer
//!
//! `present_flags: u16`, then one block per set flag in bit order.

use super::NodeWriter;
use crate::error::EncodeError;
use crate::format::relationship;
use crate::registry::RelationshipSection;
use crate::strings::StringInterner;
use crate::writer::ByteSink;
use std::collections::{BTreeMap, BTreeSet};

impl<W: ByteSink, S: StringInterner> NodeWriter<'_, W, S> {
    /// Write the relationship section
    pub fn write_relationships(&mut self, section: &RelationshipSection) -> Result<(), EncodeError> {
        self.in_context("relationship_write", |w| {
            let flags = present_flags(section);
            w.out.emit_u16(flags);

            if flags & relationship::WIDGET_STATE != 0 {
                w.write_pairs(&section.widget_to_state, "widget_to_state")?;
            }
            if flags & relationship::LIFECYCLE != 0 {
                w.count(section.lifecycle.len(), "lifecycle")?;
                for (state, hooks) in &section.lifecycle {
                    w.str_ref(state)?;
                    // At most one entry per LifecycleMethod variant.
                    w.out.emit_u8(hooks.len() as u8);
                    for (hook, method) in hooks {
                        w.out.emit_u8(hook.to_u8());
                        w.str_ref(method)?;
                    }
                }
                w.write_pairs(&section.build_methods, "build_methods")?;
            }
            if flags & relationship::METHOD_CALLS != 0 {
                w.write_multimap(&section.method_calls, "method_calls")?;
            }
            if flags & relationship::FIELD_ACCESS != 0 {
                w.write_multimap(&section.field_accesses, "field_accesses")?;
            }
            if flags & relationship::CLASS_HIERARCHY != 0 {
                w.write_pairs(&section.class_hierarchy, "class_hierarchy")?;
            }
            if flags & relationship::INTERFACE_IMPLEMENTERS != 0 {
                w.write_multimap(&section.interface_implementers, "interface_implementers")?;
            }
            if flags & relationship::BUILD_OUTPUTS != 0 {
                w.write_pairs(&section.build_outputs, "build_outputs")?;
            }
            Ok(())
        })
    }

    fn write_pairs(
        &mut self,
        map: &BTreeMap<String, String>,
        context: &'static str,
    ) -> Result<(), EncodeError> {
        self.count(map.len(), context)?;
        for (key, value) in map {
            self.str_ref(key)?;
            self.str_ref(value)?;
        }
        Ok(())
    }

    fn write_multimap(
        &mut self,
        map: &BTreeMap<String, BTreeSet<String>>,
        context: &'static str,
    ) -> Result<(), EncodeError> {
        self.count(map.len(), context)?;
        for (key, values) in map {
            self.str_ref(key)?;
            self.count(values.len(), context)?;
            for value in values {
                self.str_ref(value)?;
            }
        }
        Ok(())
    }
}

/// Flags for the non-empty relationship kinds
pub(crate) fn present_flags(section: &RelationshipSection) -> u16 {
    let mut flags = 0;
    if !section.widget_to_state.is_empty() {
        flags |= relationship::WIDGET_STATE;
    }
    if !section.lifecycle.is_empty() || !section.build_methods.is_empty() {
        flags |= relationship::LIFECYCLE;
    }
    if !section.method_calls.is_empty() {
        flags |= relationship::METHOD_CALLS;
    }
    if !section.field_accesses.is_empty() {
        flags |= relationship::FIELD_ACCESS;
    }
    if !section.class_hierarchy.is_empty() {
        flags |= relationship::CLASS_HIERARCHY;
    }
    if !section.interface_implementers.is_empty() {
        flags |= relationship::INTERFACE_IMPLEMENTERS;
    }
    if !section.build_outputs.is_empty() {
        flags |= relationship::BUILD_OUTPUTS;
    }
    flags
}
