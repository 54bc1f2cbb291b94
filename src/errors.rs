/*!

Errors reported while walking the Secret Service.

Every failure the client library can produce is folded into one of a
handful of categories, each rendered with a fixed prefix followed by the
underlying message.

*/

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Couldn't get secret service. {0}")]
    Unavailable(String),
    #[error("Received invalid data from secret service. {0}")]
    Protocol(String),
    #[error("Secret item or collection is locked. {0}")]
    Locked(String),
    #[error("Secret item or collection not found. {0}")]
    NotFound(String),
    #[error("Secret item or collection already exists. {0}")]
    AlreadyExists(String),
    #[error("{0}")]
    Other(String),
    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

const IS_LOCKED: &str = "org.freedesktop.Secret.Error.IsLocked";
const NO_SUCH_OBJECT: &str = "org.freedesktop.Secret.Error.NoSuchObject";
const ALREADY_EXISTS: &str = "org.freedesktop.Secret.Error.AlreadyExists";
const UNKNOWN_OBJECT: &str = "org.freedesktop.DBus.Error.UnknownObject";
const UNKNOWN_METHOD: &str = "org.freedesktop.DBus.Error.UnknownMethod";
const INVALID_ARGS: &str = "org.freedesktop.DBus.Error.InvalidArgs";
const INVALID_SIGNATURE: &str = "org.freedesktop.DBus.Error.InvalidSignature";

/// Map a D-Bus error by its error name.
pub(crate) fn decode_dbus_error(err: &dbus::Error) -> Error {
    let message = err.message().unwrap_or_default().to_string();
    categorize(err.name(), message)
}

/// Map an error from the secret-service client.
pub(crate) fn decode_error(err: dbus_secret_service::Error) -> Error {
    use dbus_secret_service::Error as SsError;

    let message = err.to_string();
    match err {
        SsError::Dbus(err) => decode_dbus_error(&err),
        SsError::Locked => Error::Locked(message),
        SsError::NoResult => Error::NotFound(message),
        SsError::Crypto(_) => Error::Protocol(message),
        _ => Error::Other(message),
    }
}

/// Any failure while connecting means the service itself is out of reach.
pub(crate) fn unavailable(err: dbus_secret_service::Error) -> Error {
    Error::Unavailable(err.to_string())
}

fn categorize(name: Option<&str>, message: String) -> Error {
    match name {
        Some(IS_LOCKED) => Error::Locked(message),
        Some(NO_SUCH_OBJECT | UNKNOWN_OBJECT | UNKNOWN_METHOD) => Error::NotFound(message),
        Some(ALREADY_EXISTS) => Error::AlreadyExists(message),
        Some(INVALID_ARGS | INVALID_SIGNATURE) => Error::Protocol(message),
        _ => Error::Other(message),
    }
}
