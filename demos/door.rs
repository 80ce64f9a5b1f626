//! Door State Tree
//!
//! This example declares a small hierarchical door and drives it from a
//! toy machine.
//!
//! Key concepts:
//! - Nested states addressed by dotted path
//! - Event transitions resolved upward through the hierarchy
//! - Transition actions forwarding UI contexts to the owning machine
//! - Enter handlers and listeners
//!
//! Run with: cargo run --example door

use serde_json::json;
use statetree::builder::{Declaration, TreeBuilder};
use statetree::core::{resolve, TypeKey};
use statetree::effects::{Machine, MachineError, TransitionRequest, TriggerArgs, UiEvent};

struct Door {
    current: String,
}

impl Machine for Door {
    fn transition_request(&mut self, request: TransitionRequest) -> Result<(), MachineError> {
        println!(
            "  {} -> {} (contexts: {:?})",
            self.current, request.target, request.contexts
        );
        self.current = request.target;
        Ok(())
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }
}

fn main() -> Result<(), MachineError> {
    println!("=== Door State Tree ===\n");

    let mut tree = TreeBuilder::new().build(
        Declaration::new()
            .transition("alarm", "open")
            .state(
                "closed",
                Declaration::new()
                    .transition("open", "open")
                    .state("unlocked", Declaration::new().transition("lock", "closed.locked"))
                    .state("locked", Declaration::new().transition("unlock", "closed.unlocked")),
            )
            .state(
                "open",
                Declaration::new()
                    .transition("close", "closed.unlocked")
                    .handler("enter", |node, _owner, _args| {
                        println!("  entered {}", node.path());
                        Ok(())
                    })
                    .value("label", json!("Wide open")),
            ),
    );

    let open = tree.find("open").unwrap();
    tree.on(open, "enter", |node, _owner, _args| {
        println!("  listener saw {}", node.path());
        Ok(())
    });

    println!("Tree paths:");
    for id in tree.descendants(tree.root()) {
        println!("  {}", tree.path(id).unwrap_or_default());
    }

    let mut door = Door {
        current: "closed.locked".to_string(),
    };

    println!("\nResolving events from 'closed.locked':");
    let locked = tree.find("closed.locked").unwrap();
    for event in ["unlock", "open", "alarm", "knock"] {
        println!("  {event:>6} => {:?}", resolve(&tree, locked, event));
    }

    println!("\nFiring 'unlock' then 'open' with a click carrying contexts:");
    tree.trigger(locked, "unlock", &mut door, &TriggerArgs::none())?;

    let unlocked = tree.find(&door.current).unwrap();
    let click = UiEvent::new("click").with_contexts(vec![json!({"by": "guest"})]);
    if let Some(source) = statetree::core::resolve_source(&tree, unlocked, "open") {
        tree.trigger(source.0, "open", &mut door, &click.into())?;
    }

    println!("\nEntering 'open':");
    tree.trigger(open, "enter", &mut door, &TriggerArgs::none())?;
    println!("  label: {}", tree.property(open, "label").unwrap_or(&json!(null)));

    println!("\n=== Example Complete ===");
    Ok(())
}
