//! Flutter component writer

use super::NodeWriter;
use crate::error::EncodeError;
use crate::format::{ComponentTag, PropertyTag};
use crate::strings::StringInterner;
use crate::writer::ByteSink;
use dartir_ir::{FlutterComponent, PropertyValue};

impl<W: ByteSink, S: StringInterner> NodeWriter<'_, W, S> {
    /// Write an extracted widget component
    pub fn write_component(&mut self, component: &FlutterComponent) -> Result<(), EncodeError> {
        match component {
            FlutterComponent::Widget(widget) => {
                self.out.emit_u8(ComponentTag::Widget.to_u8());
                self.text(&widget.widget_name)?;
                self.opt_text(widget.constructor_name.as_deref())?;
                self.flag(widget.is_const);
                self.list(&widget.properties, "widget properties", |w, property| {
                    w.text(&property.name)?;
                    w.write_property_value(&property.value)
                })
            }
            FlutterComponent::Conditional {
                condition,
                then_component,
                else_component,
            } => {
                self.out.emit_u8(ComponentTag::Conditional.to_u8());
                self.text(condition)?;
                self.write_component(then_component)?;
                self.optional(else_component.as_deref(), Self::write_component)
            }
            FlutterComponent::Loop {
                iterable,
                item_name,
                body,
            } => {
                self.out.emit_u8(ComponentTag::Loop.to_u8());
                self.text(iterable)?;
                self.text(item_name)?;
                self.write_component(body)
            }
            FlutterComponent::Builder {
                builder_name,
                parameters,
                body,
            } => {
                self.out.emit_u8(ComponentTag::Builder.to_u8());
                self.text(builder_name)?;
                self.texts(parameters, "builder parameters")?;
                self.write_component(body)
            }
            FlutterComponent::Unsupported { source, reason } => {
                self.out.emit_u8(ComponentTag::Unsupported.to_u8());
                self.text(source)?;
                self.text(reason)
            }
        }
    }

    fn write_property_value(&mut self, value: &PropertyValue) -> Result<(), EncodeError> {
        match value {
            PropertyValue::Literal { source } => {
                self.out.emit_u8(PropertyTag::Literal.to_u8());
                self.text(source)
            }
            PropertyValue::Expression { source } => {
                self.out.emit_u8(PropertyTag::Expression.to_u8());
                self.text(source)
            }
            PropertyValue::Component { component } => {
                self.out.emit_u8(PropertyTag::Component.to_u8());
                self.write_component(component)
            }
            PropertyValue::Components { components } => {
                self.out.emit_u8(PropertyTag::Components.to_u8());
                self.list(components, "property components", Self::write_component)
            }
        }
    }
}
