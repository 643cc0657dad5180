//! Flutter widget-extraction results
//!
//! An external analysis walks `build` bodies and describes the widget tree
//! they produce. Its output is attached to [`FunctionDecl::components`]
//! and carried through the encoder unchanged.
//!
//! [`FunctionDecl::components`]: crate::decl::FunctionDecl::components

use serde::{Deserialize, Serialize};

/// Node of an extracted widget tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum FlutterComponent {
    /// Widget construction: `Text('hi')`
    Widget(WidgetComponent),

    /// Conditional widget: `loading ? Spinner() : Body()`
    Conditional {
        /// Condition source text
        condition: String,
        /// Widget when true
        then_component: Box<FlutterComponent>,
        /// Widget when false
        #[serde(default)]
        else_component: Option<Box<FlutterComponent>>,
    },

    /// Widget produced per element: `for (final x in xs) Tile(x)`
    Loop {
        /// Iterated expression source text
        iterable: String,
        /// Loop variable name
        item_name: String,
        /// Widget built per element
        body: Box<FlutterComponent>,
    },

    /// Builder callback: `LayoutBuilder(builder: (ctx, c) => ...)`
    Builder {
        /// Builder parameter name (`builder`, `itemBuilder`)
        builder_name: String,
        /// Callback parameter names
        #[serde(default)]
        parameters: Vec<String>,
        /// Widget returned by the callback
        body: Box<FlutterComponent>,
    },

    /// Code the analysis could not describe
    Unsupported {
        /// Source text
        source: String,
        /// Why it was not understood
        reason: String,
    },
}

impl FlutterComponent {
    /// Name of the first widget in depth-first order
    pub fn first_widget_name(&self) -> Option<&str> {
        match self {
            FlutterComponent::Widget(widget) => Some(&widget.widget_name),
            FlutterComponent::Conditional {
                then_component,
                else_component,
                ..
            } => then_component
                .first_widget_name()
                .or_else(|| else_component.as_deref().and_then(|c| c.first_widget_name())),
            FlutterComponent::Loop { body, .. } | FlutterComponent::Builder { body, .. } => {
                body.first_widget_name()
            }
            FlutterComponent::Unsupported { .. } => None,
        }
    }
}

/// Widget construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetComponent {
    /// Widget class name
    pub widget_name: String,
    /// Named constructor
    #[serde(default)]
    pub constructor_name: Option<String>,
    /// `const` construction
    #[serde(default)]
    pub is_const: bool,
    /// Constructor arguments by name (`child`, `children`, `padding`)
    #[serde(default)]
    pub properties: Vec<ComponentProperty>,
}

/// Named argument of a widget construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProperty {
    /// Argument name
    pub name: String,
    /// Argument value
    pub value: PropertyValue,
}

/// Value of a widget argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "value_kind", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Literal source text: `'Hello'`, `16.0`
    Literal {
        /// Source text
        source: String,
    },
    /// Non-widget expression source text: `widget.title`
    Expression {
        /// Source text
        source: String,
    },
    /// Single child widget
    Component {
        /// Child
        component: Box<FlutterComponent>,
    },
    /// Widget list (`children:`)
    Components {
        /// Children in order
        components: Vec<FlutterComponent>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(name: &str) -> FlutterComponent {
        FlutterComponent::Widget(WidgetComponent {
            widget_name: name.to_string(),
            constructor_name: None,
            is_const: false,
            properties: Vec::new(),
        })
    }

    #[test]
    fn test_first_widget_through_conditional() {
        let component = FlutterComponent::Conditional {
            condition: "loading".to_string(),
            then_component: Box::new(FlutterComponent::Unsupported {
                source: "spinner()".to_string(),
                reason: "function call".to_string(),
            }),
            else_component: Some(Box::new(widget("Column"))),
        };
        assert_eq!(component.first_widget_name(), Some("Column"));
    }

    #[test]
    fn test_first_widget_in_builder() {
        let component = FlutterComponent::Builder {
            builder_name: "builder".to_string(),
            parameters: vec!["context".to_string()],
            body: Box::new(widget("Scaffold")),
        };
        assert_eq!(component.first_widget_name(), Some("Scaffold"));
    }
}
