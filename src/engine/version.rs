use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// A GAMS release, e.g. `24.8.1`.
///
/// Releases order numerically, so `24.10.0` is newer than `24.8.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GamsVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GamsVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for GamsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for GamsVersion {
    type Err = ModelError;

    /// Accepts `major.minor` and `major.minor.patch`; a missing patch
    /// component is zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::VersionParse(s.to_string());
        let component = |part: Option<&str>| -> Result<u32, ModelError> {
            part.ok_or_else(invalid)?.parse().map_err(|_| invalid())
        };

        let mut parts = s.split('.');
        let major = component(parts.next())?;
        let minor = component(parts.next())?;
        let patch = match parts.next() {
            Some(part) => part.parse().map_err(|_| invalid())?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(major, minor, patch))
    }
}
