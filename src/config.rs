//! Tree configuration.

use serde::{Deserialize, Serialize};

/// Separator placed between path segments by default.
pub const DEFAULT_SEPARATOR: char = '.';

/// Declaration member name that the builder never treats as a state,
/// handler or property.
pub const DEFAULT_RESERVED_KEY: &str = "constructor";

/// Settings shared by a [`StateTree`](crate::core::StateTree) and the
/// [`TreeBuilder`](crate::builder::TreeBuilder) that fills it.
///
/// Hosts usually embed this in their own configuration and deserialize it
/// alongside everything else.
///
/// # Example
///
/// ```rust
/// use statetree::TreeConfig;
///
/// let config: TreeConfig = serde_json::from_str(r#"{ "separator": "/" }"#).unwrap();
/// assert_eq!(config.separator, '/');
/// assert_eq!(config.reserved_key, "constructor");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Character joining parent and child names in a state path.
    pub separator: char,

    /// Member name skipped while building from a declaration.
    pub reserved_key: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            reserved_key: DEFAULT_RESERVED_KEY.to_string(),
        }
    }
}
