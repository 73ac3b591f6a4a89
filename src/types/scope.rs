//! Scope Types
//!
//! The provider's permission strings and the set of scopes granted to a client.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A named permission granted to a client.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// `lucidchart.document.content`
    DocumentContent,
    /// `lucidchart.document.content:readonly`
    DocumentContentReadonly,
    /// `offline_access`
    OfflineAccess,
    /// `user.profile`
    UserProfile,
    /// `account.info`
    AccountInfo,
    /// `account.user`
    AccountUser,
    /// `account.user:readonly`
    AccountUserReadonly,
    /// `account.user.transfercontent`
    AccountUserTransferContent,
    /// Any scope string not known to this crate.
    Other(String),
}

impl Scope {
    pub fn as_str(&self) -> &str {
        match self {
            Self::DocumentContent => "lucidchart.document.content",
            Self::DocumentContentReadonly => "lucidchart.document.content:readonly",
            Self::OfflineAccess => "offline_access",
            Self::UserProfile => "user.profile",
            Self::AccountInfo => "account.info",
            Self::AccountUser => "account.user",
            Self::AccountUserReadonly => "account.user:readonly",
            Self::AccountUserTransferContent => "account.user.transfercontent",
            Self::Other(s) => s,
        }
    }

    /// Scopes that can only be granted through the account authorization URL.
    pub fn is_account_only(&self) -> bool {
        matches!(
            self,
            Self::AccountInfo
                | Self::AccountUser
                | Self::AccountUserReadonly
                | Self::AccountUserTransferContent
        )
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        match s {
            "lucidchart.document.content" => Self::DocumentContent,
            "lucidchart.document.content:readonly" => Self::DocumentContentReadonly,
            "offline_access" => Self::OfflineAccess,
            "user.profile" => Self::UserProfile,
            "account.info" => Self::AccountInfo,
            "account.user" => Self::AccountUser,
            "account.user:readonly" => Self::AccountUserReadonly,
            "account.user.transfercontent" => Self::AccountUserTransferContent,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for Scope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Set of scopes granted to a client. Ordering is irrelevant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeSet(BTreeSet<Scope>);

impl ScopeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scopes requested by a user client.
    pub fn user_defaults() -> Self {
        [
            Scope::DocumentContent,
            Scope::DocumentContentReadonly,
            Scope::OfflineAccess,
            Scope::UserProfile,
            Scope::AccountUserReadonly,
            Scope::AccountInfo,
        ]
        .into_iter()
        .collect()
    }

    /// Scopes requested by an account client.
    pub fn account_defaults() -> Self {
        [
            Scope::OfflineAccess,
            Scope::AccountUserReadonly,
            Scope::AccountInfo,
        ]
        .into_iter()
        .collect()
    }

    /// Parse a space-separated scope string.
    pub fn parse(value: &str) -> Self {
        value.split_whitespace().map(Scope::from).collect()
    }

    pub fn insert(&mut self, scope: Scope) -> bool {
        self.0.insert(scope)
    }

    pub fn contains(&self, scope: &Scope) -> bool {
        self.0.contains(scope)
    }

    /// True if any of `scopes` is granted.
    pub fn intersects(&self, scopes: &[Scope]) -> bool {
        scopes.iter().any(|s| self.0.contains(s))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.0.iter()
    }

    /// Space-joined form used in the authorization URL.
    pub fn to_space_separated(&self) -> String {
        self.0
            .iter()
            .map(Scope::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(Scope::from).collect())
    }
}
