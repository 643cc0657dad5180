//! Widget/state pairing strategies

use dartir_ir::ClassDecl;

/// Decides which classes are stateful widgets and finds their state class
pub trait StatePairing {
    /// Check if `class` is a stateful widget
    fn is_stateful_widget(&self, class: &ClassDecl) -> bool;

    /// Find the state class of `widget` among `classes`
    fn resolve_state<'a>(&self, widget: &ClassDecl, classes: &'a [ClassDecl])
        -> Option<&'a ClassDecl>;
}

/// Pairing by Flutter naming conventions.
///
/// A widget is a class that extends or implements `StatefulWidget` and
/// declares `createState`. Its state is the first class whose name ends with
/// `<Widget>State`, or failing that a class named `_<Widget>` whose
/// superclass mentions `State`. This is a best-effort match; frontends with
/// resolved `createState` return types should supply their own strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct NamingConventionPairing;

const STATEFUL_WIDGET: &str = "StatefulWidget";

impl StatePairing for NamingConventionPairing {
    fn is_stateful_widget(&self, class: &ClassDecl) -> bool {
        let extends_widget = class
            .superclass
            .iter()
            .chain(&class.interfaces)
            .any(|ty| ty.base_name() == STATEFUL_WIDGET);
        extends_widget && class.has_method("createState")
    }

    fn resolve_state<'a>(
        &self,
        widget: &ClassDecl,
        classes: &'a [ClassDecl],
    ) -> Option<&'a ClassDecl> {
        let suffix = format!("{}State", widget.name);
        let private_name = format!("_{}", widget.name);

        classes
            .iter()
            .find(|c| c.id != widget.id && c.name.ends_with(&suffix))
            .or_else(|| {
                classes.iter().find(|c| {
                    c.id != widget.id
                        && c.name == private_name
                        && c.superclass
                            .as_ref()
                            .is_some_and(|ty| ty.display_name().contains("State"))
                })
            })
    }
}
