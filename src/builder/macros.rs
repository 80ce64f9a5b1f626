//! Macros for ergonomic declarations.

/// Build a [`Declaration`](crate::builder::Declaration) from `name => member`
/// pairs.
///
/// Each member may be anything convertible into a
/// [`Member`](crate::builder::Member): a nested declaration, a factory, a
/// handler, a transition action, a JSON value, or an `Option` of any of
/// those.
///
/// # Example
///
/// ```
/// use statetree::builder::TreeBuilder;
/// use statetree::declaration;
/// use statetree::effects::make_transition_action;
/// use serde_json::json;
///
/// let tree = TreeBuilder::new().build(declaration! {
///     "idle" => declaration! {
///         "start" => make_transition_action("running"),
///     },
///     "running" => declaration! {
///         "stop" => make_transition_action("idle"),
///         "label" => json!("Running"),
///     },
/// });
///
/// assert!(tree.find("running").is_some());
/// ```
#[macro_export]
macro_rules! declaration {
    ( $( $name:expr => $member:expr ),* $(,)? ) => {{
        let declaration = $crate::builder::Declaration::new();
        $( let declaration = declaration.member($name, $member); )*
        declaration
    }};
}

#[cfg(test)]
mod tests {
    use crate::builder::{Member, TreeBuilder};
    use crate::core::resolve;
    use crate::effects::make_transition_action;
    use serde_json::json;

    #[test]
    fn declaration_macro_keeps_order() {
        let declaration = declaration! {
            "b" => declaration! {},
            "a" => json!(1),
        };

        let names: Vec<_> = declaration
            .members()
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(matches!(declaration.members()[0].1, Member::State(_)));
        assert!(matches!(declaration.members()[1].1, Member::Value(_)));
    }

    #[test]
    fn declaration_macro_builds_tree() {
        let tree = TreeBuilder::new().build(declaration! {
            "reset" => make_transition_action("idle"),
            "idle" => declaration! {},
            "busy" => declaration! {
                "done" => make_transition_action("idle"),
            },
        });

        let busy = tree.find("busy").unwrap();
        assert_eq!(resolve(&tree, busy, "done"), Some("idle"));
        assert_eq!(resolve(&tree, busy, "reset"), Some("idle"));
    }

    #[test]
    fn empty_declaration_macro() {
        let declaration = declaration! {};
        assert!(declaration.members().is_empty());
    }
}
