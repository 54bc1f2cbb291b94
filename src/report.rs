/*!

Walks the Secret Service and prints what it finds.

The walk goes service → collections → items → secrets and stops at the
depth given by the detail level. Errors met below the service are
printed in place and the walk moves on; only failing to reach the
service (or to write the report) aborts the run.

*/

use std::collections::BTreeMap;
use std::io::Write;

use tracing::{debug, warn};

use crate::client::{Capabilities, Collection, Item, Lockable, SecretClient, SecretValue};
use crate::errors::{Error, Result};
use crate::format::{format_attributes, format_bool, format_hex, format_timestamp};
use crate::options::Options;

/// Aliases looked up on every run, in lookup order.
pub const KNOWN_ALIASES: [&str; 3] = ["default", "login", "session"];

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

const COLLECTION_INDENT: &str = "    ";
const ITEM_INDENT: &str = "        ";

/// Connect with `connect`, print the report to `out`, and return the
/// process exit code. Fatal errors go to `err` as `Error: <message>`.
pub fn run<C, F, W, E>(options: &Options, connect: F, out: W, mut err: E) -> u8
where
    C: SecretClient,
    F: FnOnce(Capabilities) -> Result<C>,
    W: Write,
    E: Write,
{
    let result =
        connect(options.capabilities()).and_then(|client| Report::new(&client, options, out).print());
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            // nothing left to report to if stderr is gone
            let _ = writeln!(err, "Error: {e}");
            EXIT_FAILURE
        }
    }
}

/// Ask the service to unlock a single collection or item.
pub fn unlock<C: SecretClient + ?Sized>(client: &C, object: &dyn Lockable) -> Result<()> {
    client.unlock(&[object]).inspect_err(|err| {
        warn!(path = object.object_path(), %err, "unlock failed");
    })
}

pub struct Report<'a, C: ?Sized, W> {
    client: &'a C,
    level: u8,
    unlock: bool,
    out: W,
    aliases: BTreeMap<String, String>,
    /// Collection path to the aliases naming it, in lookup order.
    reverse_aliases: BTreeMap<String, Vec<String>>,
}

impl<'a, C: SecretClient + ?Sized, W: Write> Report<'a, C, W> {
    pub fn new(client: &'a C, options: &Options, out: W) -> Self {
        Self {
            client,
            level: options.level(),
            unlock: options.unlock,
            out,
            aliases: BTreeMap::new(),
            reverse_aliases: BTreeMap::new(),
        }
    }

    pub fn print(mut self) -> Result<()> {
        writeln!(self.out, "Service")?;
        writeln!(self.out, "  Path: {}", self.client.service_path())?;

        self.resolve_aliases();
        if !self.aliases.is_empty() {
            writeln!(self.out, "  Aliases:")?;
            for (alias, path) in &self.aliases {
                writeln!(self.out, "    {alias}: {path}")?;
            }
        }

        if self.level >= 1 {
            writeln!(self.out)?;
            let listed = self.client.collections();
            match listed {
                Ok(paths) => {
                    for path in &paths {
                        self.print_collection(path)?;
                    }
                }
                Err(err) => self.print_error("  ", Err(err))?,
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn resolve_aliases(&mut self) {
        for alias in KNOWN_ALIASES {
            match self.client.read_alias(alias) {
                Ok(Some(path)) => {
                    self.aliases.insert(alias.to_string(), path.clone());
                    self.reverse_aliases
                        .entry(path)
                        .or_default()
                        .push(alias.to_string());
                }
                Ok(None) => {}
                Err(err) => debug!(alias, %err, "cannot read alias"),
            }
        }
    }

    /// Print `Error: <message>` at `indent` for anything but an output failure.
    fn print_error(&mut self, indent: &str, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(Error::Io(err)) => Err(Error::Io(err)),
            Err(err) => {
                writeln!(self.out, "{indent}Error: {err}")?;
                Ok(())
            }
        }
    }

    fn print_timestamps(&mut self, fields: &str, created: u64, modified: u64) -> Result<()> {
        if let Some(created) = format_timestamp(created) {
            writeln!(self.out, "{fields}Created: {created}")?;
        }
        if let Some(modified) = format_timestamp(modified) {
            writeln!(self.out, "{fields}Modified: {modified}")?;
        }
        Ok(())
    }

    fn print_collection(&mut self, path: &str) -> Result<()> {
        let fields = format!("{COLLECTION_INDENT}  ");
        let result = self.try_print_collection(path, &fields);
        self.print_error(&fields, result)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn try_print_collection(&mut self, path: &str, fields: &str) -> Result<()> {
        let collection: Collection = self.client.collection(path)?;
        writeln!(self.out, "{COLLECTION_INDENT}Collection: \"{}\"", collection.label)?;
        writeln!(self.out, "{fields}Path: {}", collection.path)?;
        if let Some(names) = self.reverse_aliases.get(&collection.path) {
            for name in names {
                writeln!(self.out, "{fields}Alias: {name}")?;
            }
        }
        self.print_timestamps(fields, collection.created, collection.modified)?;

        if self.unlock && self.client.is_locked(&collection)? {
            let unlocked = unlock(self.client, &collection);
            self.print_error(fields, unlocked)?;
        }
        let locked = self.client.is_locked(&collection)?;
        writeln!(self.out, "{fields}Locked: {}", format_bool(locked))?;

        if self.level < 2 {
            return Ok(());
        }
        writeln!(self.out)?;

        for item in self.client.items(&collection)? {
            self.print_item(&item)?;
        }
        Ok(())
    }

    fn print_item(&mut self, path: &str) -> Result<()> {
        let fields = format!("{ITEM_INDENT}  ");
        let result = self.try_print_item(path, &fields);
        self.print_error(&fields, result)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn try_print_item(&mut self, path: &str, fields: &str) -> Result<()> {
        let item: Item = self.client.item(path)?;
        writeln!(self.out, "{ITEM_INDENT}Item: \"{}\"", item.label)?;
        writeln!(self.out, "{fields}Path: {}", item.path)?;
        self.print_timestamps(fields, item.created, item.modified)?;

        if self.level < 3 {
            return Ok(());
        }

        let attributes = self.client.attributes(&item)?;
        if !attributes.is_empty() {
            writeln!(self.out, "{fields}Attributes:")?;
            for (key, value) in format_attributes(&attributes) {
                writeln!(self.out, "{fields}    \"{key}\" = \"{value}\"")?;
            }
        }

        let unlocked = if self.unlock && self.client.is_locked(&item)? {
            unlock(self.client, &item)
        } else {
            Ok(())
        };
        let locked = self.client.is_locked(&item)?;
        writeln!(self.out, "{fields}Locked: {}", format_bool(locked))?;
        // a failed unlock ends the item here
        unlocked?;

        if self.level < 4 {
            return Ok(());
        }

        match self.client.load_secret(&item)? {
            Some(secret) => self.print_secret(fields, &secret),
            None => {
                writeln!(self.out, "{fields}Error: secret is null")?;
                Ok(())
            }
        }
    }

    fn print_secret(&mut self, fields: &str, secret: &SecretValue) -> Result<()> {
        writeln!(self.out, "{fields}Secret:")?;
        writeln!(self.out, "{fields}  Type: {}", secret.content_type)?;
        match secret.text() {
            Some(text) => writeln!(self.out, "{fields}  Value: \"{text}\"")?,
            None => writeln!(
                self.out,
                "{fields}  Value: {{ {} }} (hex)",
                format_hex(&secret.value)
            )?,
        }
        Ok(())
    }
}
