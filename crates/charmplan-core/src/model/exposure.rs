// ── Exposure domain types ──
//
// Declared and remote views of which application endpoints are reachable
// from outside the model, and from where.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── ExposureRule ────────────────────────────────────────────────────

/// Who may reach an exposed endpoint.
///
/// Both lists arrive as comma-delimited strings from most callers and
/// are compared as unordered sets. Empty rules mean "anyone" on the
/// remote side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExposureRule {
    #[serde(default, deserialize_with = "deserialize_string_set")]
    pub spaces: BTreeSet<String>,
    #[serde(default, deserialize_with = "deserialize_string_set")]
    pub cidrs: BTreeSet<String>,
}

impl ExposureRule {
    /// Build a rule from comma-delimited space and CIDR lists.
    pub fn from_delimited(spaces: &str, cidrs: &str) -> Self {
        Self {
            spaces: split_delimited(spaces),
            cidrs: split_delimited(cidrs),
        }
    }

    /// Restrict to the given CIDRs only.
    pub fn cidrs<I, S>(cidrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            spaces: BTreeSet::new(),
            cidrs: cidrs.into_iter().map(Into::into).collect(),
        }
    }

    /// Restrict to the given spaces only.
    pub fn spaces<I, S>(spaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            spaces: spaces.into_iter().map(Into::into).collect(),
            cidrs: BTreeSet::new(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.spaces.is_empty() && self.cidrs.is_empty()
    }

    pub fn spaces_delimited(&self) -> String {
        join_delimited(&self.spaces)
    }

    pub fn cidrs_delimited(&self) -> String {
        join_delimited(&self.cidrs)
    }
}

impl fmt::Display for ExposureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.spaces.is_empty(), self.cidrs.is_empty()) {
            (true, true) => f.write_str("unrestricted"),
            (false, true) => write!(f, "spaces={}", self.spaces_delimited()),
            (true, false) => write!(f, "cidrs={}", self.cidrs_delimited()),
            (false, false) => write!(
                f,
                "spaces={} cidrs={}",
                self.spaces_delimited(),
                self.cidrs_delimited()
            ),
        }
    }
}

// ── DeclaredExposure ────────────────────────────────────────────────

/// The caller's desired exposure state.
///
/// `Absent` (no expose block at all) and `Present` with zero endpoints
/// are different declarations and reconcile differently: only `Absent`
/// withdraws exposure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeclaredExposure {
    #[default]
    Absent,
    Present(BTreeMap<String, ExposureRule>),
}

impl DeclaredExposure {
    /// Build a present block, normalizing missing rules to unrestricted ones.
    pub fn from_optional_rules<I>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<ExposureRule>)>,
    {
        Self::Present(
            endpoints
                .into_iter()
                .map(|(name, rule)| (name, rule.unwrap_or_default()))
                .collect(),
        )
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// Declared endpoints, or `None` when no block was declared.
    pub fn endpoints(&self) -> Option<&BTreeMap<String, ExposureRule>> {
        match self {
            Self::Absent => None,
            Self::Present(endpoints) => Some(endpoints),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, ExposureRule)> for DeclaredExposure {
    fn from_iter<T: IntoIterator<Item = (K, ExposureRule)>>(iter: T) -> Self {
        Self::Present(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for DeclaredExposure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Present(endpoints) => serializer.serialize_some(endpoints),
        }
    }
}

impl<'de> Deserialize<'de> for DeclaredExposure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Option<ExposureRule>>>::deserialize(deserializer)?;
        Ok(raw.map_or(Self::Absent, Self::from_optional_rules))
    }
}

// ── ApplicationExposure ─────────────────────────────────────────────

/// Exposure state as reported by the remote system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationExposure {
    pub endpoints: BTreeMap<String, ExposureRule>,
}

// ── Delimited string sets ───────────────────────────────────────────

fn split_delimited(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn join_delimited(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringSet {
    Delimited(String),
    List(Vec<String>),
}

fn deserialize_string_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringSet>::deserialize(deserializer)? {
        None => BTreeSet::new(),
        Some(StringSet::Delimited(raw)) => split_delimited(&raw),
        Some(StringSet::List(items)) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
    })
}
