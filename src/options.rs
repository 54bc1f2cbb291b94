/*!

Command-line options.

*/

use clap::{ArgAction, Parser};

use crate::client::Capabilities;

/// Deepest level of the report: secret values.
pub const MAX_DETAIL: u8 = 4;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "lssecrets",
    version,
    about = "List the contents of the keyring through the Secret Service",
    disable_version_flag = true
)]
pub struct Options {
    /// How deep to go: 0 service, 1 collections, 2 items, 3 attributes, 4 secrets
    #[arg(short, long, value_name = "N", default_value_t = 2, value_parser = parse_detail)]
    pub detail: u64,

    /// Unlock locked collections and items as they are encountered
    #[arg(short, long)]
    pub unlock: bool,

    /// Show secret values (same as --detail 4)
    #[arg(short, long)]
    pub secrets: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: (),
}

impl Default for Options {
    fn default() -> Self {
        Self {
            detail: 2,
            unlock: false,
            secrets: false,
            version: (),
        }
    }
}

impl Options {
    pub fn with_detail(detail: u64) -> Self {
        Self {
            detail,
            ..Self::default()
        }
    }

    pub fn unlocking(mut self) -> Self {
        self.unlock = true;
        self
    }

    /// The detail level that drives traversal, clamped to [`MAX_DETAIL`].
    ///
    /// The parsed value in [`Options::detail`] is left as given.
    pub fn level(&self) -> u8 {
        if self.secrets {
            MAX_DETAIL
        } else {
            u8::try_from(self.detail)
                .map_or(MAX_DETAIL, |detail| detail.min(MAX_DETAIL))
        }
    }

    /// Only the deepest level needs a secret-exchange session.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            open_session: self.level() == MAX_DETAIL,
        }
    }
}

/// Any run of digits is a detail level; ones too large for `u64` saturate.
fn parse_detail(s: &str) -> Result<u64, String> {
    match s.parse::<u64>() {
        Ok(detail) => Ok(detail),
        Err(_) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => Ok(u64::MAX),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        Options::try_parse_from(std::iter::once("lssecrets").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults() {
        let options = parse(&[]);
        assert_eq!(options, Options::default());
        assert_eq!(options.level(), 2);
        assert!(!options.capabilities().open_session);
    }

    #[test]
    fn short_and_long_forms() {
        let options = parse(&["-d", "3", "-u"]);
        assert_eq!(options.detail, 3);
        assert!(options.unlock);
        let options = parse(&["--detail", "1", "--unlock"]);
        assert_eq!(options.detail, 1);
        assert!(options.unlock);
    }

    #[test]
    fn high_detail_is_clamped_but_kept() {
        let options = parse(&["--detail", "9"]);
        assert_eq!(options.detail, 9);
        assert_eq!(options.level(), MAX_DETAIL);
        assert!(options.capabilities().open_session);
    }

    #[test]
    fn detail_beyond_u8_is_accepted() {
        let options = parse(&["-d", "1000"]);
        assert_eq!(options.detail, 1000);
        assert_eq!(options.level(), MAX_DETAIL);
        let options = parse(&["--detail", "256"]);
        assert_eq!(options.level(), MAX_DETAIL);
        let options = parse(&["-d", "123456789012345678901234567890"]);
        assert_eq!(options.detail, u64::MAX);
        assert_eq!(options.level(), MAX_DETAIL);
        assert!(options.capabilities().open_session);
    }

    #[test]
    fn secrets_is_detail_four() {
        let options = parse(&["-s", "-d", "1"]);
        assert_eq!(options.level(), MAX_DETAIL);
        assert!(options.capabilities().open_session);
    }

    #[test]
    fn session_only_at_deepest_level() {
        for detail in 0..MAX_DETAIL {
            let capabilities = Options::with_detail(u64::from(detail)).capabilities();
            assert!(!capabilities.open_session);
        }
    }

    #[test]
    fn version_flag_short_circuits() {
        let err = Options::try_parse_from(["lssecrets", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        let err = Options::try_parse_from(["lssecrets", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        let rendered = err.to_string();
        assert_eq!(rendered.trim_end().lines().count(), 1);
        assert!(rendered.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn non_numeric_detail_is_rejected() {
        assert!(Options::try_parse_from(["lssecrets", "-d", "lots"]).is_err());
    }
}
