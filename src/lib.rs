/*!

# lssecrets: list the contents of the Secret Service

This crate walks the
[freedesktop Secret Service](https://specifications.freedesktop.org/secret-service-spec/latest/)
on the session bus and prints what it finds: the service itself and the
aliases it knows about, each collection, each item in a collection, the
item attributes, and finally the secret values. It talks to the service
through the [dbus-secret-service crate](https://crates.io/crates/dbus-secret-service).

## Detail levels

How far the walk goes is set by the detail level:

- `0`: the service and its aliases
- `1`: collections
- `2`: items (the default)
- `3`: item attributes
- `4`: secret values

Only level 4 negotiates an encrypted session with the service; lower
levels never read a secret.

## Locked collections and items

Collections and items are reported as locked or not. With `--unlock`,
each locked object is unlocked as it is reached, which may make the
keyring daemon show a password prompt. The lock state printed is the one
read after the attempt.

## Output

The report is plain indented text on standard output. Collections and
items appear in the order the service gives them; aliases and
attributes are sorted. Problems with an individual collection or item
are printed in place as `Error: <message>` and do not stop the walk.
Only failing to reach the service makes the program exit nonzero.

## Running without a desktop session

`--unlock` relies on the keyring daemon showing a password prompt, which
needs a graphical session. Over SSH or in a container there is usually
nobody to answer it, so the unlock attempt fails and the object stays
locked. One way around that with GNOME Keyring is to start the daemon
already unlocked, feeding it the password on standard input:

```shell
read -rsp "Keyring password: " pw
printf '%s' "$pw" | gnome-keyring-daemon --replace --unlock
unset pw
```

After that, `lssecrets -d 4` can read the login keyring without a prompt.

 */

pub mod client;
pub mod errors;
pub mod format;
pub mod options;
pub mod report;
mod service;

pub use client::SecretClient;
pub use errors::{Error, Result};
pub use options::Options;
pub use report::run;
pub use service::Service;
