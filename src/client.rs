/*!

What the report needs from a Secret Service client.

Collections and items are addressed by their D-Bus object path; the
records below hold only what gets printed. Lock state is not part of the
records because it changes when an unlock succeeds and must be read
again.

*/

use std::collections::HashMap;

use crate::errors::Result;

/// What to set up when connecting to the service. Collections can
/// always be listed; only the session is optional.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Negotiate an encrypted session so secret values can be transferred.
    pub open_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub path: String,
    pub label: String,
    pub created: u64,
    pub modified: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub path: String,
    pub label: String,
    pub created: u64,
    pub modified: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretValue {
    pub content_type: String,
    pub value: Vec<u8>,
}

impl SecretValue {
    /// The value as text, if it is valid UTF-8 with no embedded NUL.
    pub fn text(&self) -> Option<&str> {
        if self.value.contains(&0) {
            return None;
        }
        std::str::from_utf8(&self.value).ok()
    }
}

/// Anything the service can lock or unlock.
pub trait Lockable {
    fn object_path(&self) -> &str;
    fn kind(&self) -> ObjectKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Collection,
    Item,
}

impl Lockable for Collection {
    fn object_path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Collection
    }
}

impl Lockable for Item {
    fn object_path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Item
    }
}

/// A connected Secret Service.
pub trait SecretClient {
    /// Object path of the service itself.
    fn service_path(&self) -> &str;

    /// Path of the collection an alias points to, `None` when unset.
    fn read_alias(&self, alias: &str) -> Result<Option<String>>;

    /// Collection paths, in the order the service reports them.
    fn collections(&self) -> Result<Vec<String>>;

    fn collection(&self, path: &str) -> Result<Collection>;

    /// Item paths of a collection, in the order the service reports them.
    fn items(&self, collection: &Collection) -> Result<Vec<String>>;

    fn item(&self, path: &str) -> Result<Item>;

    fn attributes(&self, item: &Item) -> Result<HashMap<String, String>>;

    fn is_locked(&self, object: &dyn Lockable) -> Result<bool>;

    /// Ask the service to unlock the given objects, prompting if it needs to.
    fn unlock(&self, objects: &[&dyn Lockable]) -> Result<()>;

    /// Fetch the secret of an item. Needs a session opened with
    /// [`Capabilities::open_session`].
    fn load_secret(&self, item: &Item) -> Result<Option<SecretValue>>;
}
