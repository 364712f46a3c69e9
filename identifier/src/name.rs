// Copyright © 2021-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::{fmt, ops::Deref, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NameError {
    #[error("name must not be empty")]
    Empty,

    #[error("name must not contain a `/`")]
    ContainsSlash,

    #[error("name must not contain whitespace or control characters")]
    InvalidCharacter,
}

fn validate(s: &str) -> Result<(), NameError> {
    if s.is_empty() {
        return Err(NameError::Empty);
    }
    if s.contains('/') {
        return Err(NameError::ContainsSlash);
    }
    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(NameError::InvalidCharacter);
    }
    Ok(())
}

macro_rules! simple_name {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(into = "String", try_from = "String")]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = NameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                validate(s)?;
                Ok(Self(s.to_string()))
            }
        }

        impl std::convert::TryFrom<String> for $name {
            type Error = NameError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                validate(&s)?;
                Ok(Self(s))
            }
        }

        impl From<$name> for String {
            fn from(n: $name) -> Self {
                n.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

simple_name!(RepoName, "A repository's bare name, e.g. `repo1`.");
simple_name!(NamespaceName, "A user-namespace name, e.g. `namespace`.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert!(matches!("".parse::<RepoName>(), Err(NameError::Empty)));
    }

    #[test]
    fn rejects_slash() {
        assert!(matches!(
            "a/b".parse::<RepoName>(),
            Err(NameError::ContainsSlash)
        ));
    }

    #[test]
    fn accepts_simple_name() {
        assert_eq!("repo1".parse::<RepoName>().unwrap().as_str(), "repo1");
    }
}
