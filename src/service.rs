/*!

Secret Service access over the session bus.

The [`Service`] holds two connections. The `dbus-secret-service` client
owns the session used to transfer secrets and handles unlock prompts;
plain property reads (labels, timestamps, lock state, aliases) go
through a bare `dbus` connection because the client does not expose
all of them.

*/

#[cfg(not(any(feature = "crypto-rust", feature = "crypto-openssl")))]
compile_error!("You must enable one of the features crypto-rust or crypto-openssl");

use std::collections::HashMap;
use std::time::Duration;

use dbus::arg::Get;
use dbus::blocking::stdintf::org_freedesktop_dbus::Properties;
use dbus::blocking::{Connection, Proxy};
use dbus_secret_service::{EncryptionType, Item as SsItem, Path, SecretService};
use tracing::debug;

use crate::client::{
    Capabilities, Collection, Item, Lockable, ObjectKind, SecretClient, SecretValue,
};
use crate::errors::{Error, Result, decode_dbus_error, decode_error, unavailable};

const SS_DBUS_DEST: &str = "org.freedesktop.secrets";
const SS_DBUS_PATH: &str = "/org/freedesktop/secrets";
const SERVICE_INTERFACE: &str = "org.freedesktop.Secret.Service";
const COLLECTION_INTERFACE: &str = "org.freedesktop.Secret.Collection";
const ITEM_INTERFACE: &str = "org.freedesktop.Secret.Item";
/// Same as the libdbus default for method calls.
const TIMEOUT: Duration = Duration::from_secs(25);
/// What `ReadAlias` returns for an alias that is not set.
const NO_OBJECT: &str = "/";

pub struct Service {
    ss: SecretService,
    bus: Connection,
    capabilities: Capabilities,
}

impl Service {
    /// Connect to the service, negotiating an encrypted session only if
    /// secrets will be read. Every failure here is reported as
    /// [`Error::Unavailable`].
    pub fn connect(capabilities: Capabilities) -> Result<Self> {
        let encryption = if capabilities.open_session {
            EncryptionType::Dh
        } else {
            EncryptionType::Plain
        };
        debug!(?capabilities, "connecting to secret service");
        let ss = SecretService::connect(encryption).map_err(unavailable)?;
        let bus = Connection::new_session().map_err(|err| {
            Error::Unavailable(err.message().unwrap_or_default().to_string())
        })?;
        Ok(Self {
            ss,
            bus,
            capabilities,
        })
    }

    fn proxy(&self, path: &str) -> Result<Proxy<'static, &Connection>> {
        let path = object_path(path)?;
        Ok(self.bus.with_proxy(SS_DBUS_DEST, path, TIMEOUT))
    }

    fn property<T>(&self, path: &str, interface: &str, name: &str) -> Result<T>
    where
        T: for<'b> Get<'b> + 'static,
    {
        self.proxy(path)?
            .get(interface, name)
            .map_err(|err| decode_dbus_error(&err))
    }

    fn item_handle(&self, path: &str) -> Result<SsItem<'_>> {
        Ok(SsItem::new(&self.ss, object_path(path)?))
    }
}

impl SecretClient for Service {
    fn service_path(&self) -> &str {
        SS_DBUS_PATH
    }

    fn read_alias(&self, alias: &str) -> Result<Option<String>> {
        let (path,): (Path<'static>,) = self
            .proxy(SS_DBUS_PATH)?
            .method_call(SERVICE_INTERFACE, "ReadAlias", (alias,))
            .map_err(|err| decode_dbus_error(&err))?;
        if &*path == NO_OBJECT {
            debug!(alias, "alias is not set");
            return Ok(None);
        }
        Ok(Some(path.to_string()))
    }

    fn collections(&self) -> Result<Vec<String>> {
        let paths: Vec<Path<'static>> =
            self.property(SS_DBUS_PATH, SERVICE_INTERFACE, "Collections")?;
        Ok(paths.iter().map(|p| p.to_string()).collect())
    }

    fn collection(&self, path: &str) -> Result<Collection> {
        Ok(Collection {
            path: path.to_string(),
            label: self.property(path, COLLECTION_INTERFACE, "Label")?,
            created: self.property(path, COLLECTION_INTERFACE, "Created")?,
            modified: self.property(path, COLLECTION_INTERFACE, "Modified")?,
        })
    }

    fn items(&self, collection: &Collection) -> Result<Vec<String>> {
        let paths: Vec<Path<'static>> =
            self.property(&collection.path, COLLECTION_INTERFACE, "Items")?;
        Ok(paths.iter().map(|p| p.to_string()).collect())
    }

    fn item(&self, path: &str) -> Result<Item> {
        let label = self.item_handle(path)?.get_label().map_err(decode_error)?;
        Ok(Item {
            path: path.to_string(),
            label,
            created: self.property(path, ITEM_INTERFACE, "Created")?,
            modified: self.property(path, ITEM_INTERFACE, "Modified")?,
        })
    }

    fn attributes(&self, item: &Item) -> Result<HashMap<String, String>> {
        self.item_handle(&item.path)?
            .get_attributes()
            .map_err(decode_error)
    }

    fn is_locked(&self, object: &dyn Lockable) -> Result<bool> {
        let interface = match object.kind() {
            ObjectKind::Collection => COLLECTION_INTERFACE,
            ObjectKind::Item => ITEM_INTERFACE,
        };
        self.property(object.object_path(), interface, "Locked")
    }

    fn unlock(&self, objects: &[&dyn Lockable]) -> Result<()> {
        // Service.Unlock takes any object path, so an item handle serves
        // as the carrier for collections too.
        let handles = objects
            .iter()
            .map(|o| self.item_handle(o.object_path()))
            .collect::<Result<Vec<_>>>()?;
        let handle_refs: Vec<&SsItem> = handles.iter().collect();
        debug!(count = handle_refs.len(), "requesting unlock");
        self.ss
            .unlock_all(handle_refs.as_slice())
            .map_err(decode_error)
    }

    fn load_secret(&self, item: &Item) -> Result<Option<SecretValue>> {
        if !self.capabilities.open_session {
            return Err(Error::Other(
                "No secret session was opened with the service.".to_string(),
            ));
        }
        debug!(path = %item.path, "loading secret");
        let handle = self.item_handle(&item.path)?;
        let value = handle.get_secret().map_err(decode_error)?;
        let content_type = handle.get_secret_content_type().map_err(decode_error)?;
        Ok(Some(SecretValue {
            content_type,
            value,
        }))
    }
}

fn object_path(path: &str) -> Result<Path<'static>> {
    Path::new(path.to_string()).map_err(Error::Protocol)
}
