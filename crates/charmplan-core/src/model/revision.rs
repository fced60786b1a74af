// ── Charm revision ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// Requested charm revision.
///
/// `Latest` means the caller never pinned a revision and the remote
/// system picks one. It is distinct from every real revision number,
/// including zero. Serialized as an optional integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Revision {
    #[default]
    Latest,
    Pinned(u32),
}

impl Revision {
    pub fn pinned(self) -> Option<u32> {
        match self {
            Self::Latest => None,
            Self::Pinned(n) => Some(n),
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }
}

impl From<Option<u32>> for Revision {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Self::Latest, Self::Pinned)
    }
}

impl From<Revision> for Option<u32> {
    fn from(value: Revision) -> Self {
        value.pinned()
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Pinned(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_real_revision() {
        assert_ne!(Revision::Pinned(0), Revision::Latest);
        assert_eq!(Revision::from(Some(0)), Revision::Pinned(0));
    }

    #[test]
    fn display() {
        assert_eq!(Revision::Latest.to_string(), "latest");
        assert_eq!(Revision::Pinned(42).to_string(), "42");
    }
}
