//! Types describing the like state of a tweet and the result of toggling it.

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// An error that can occur when parsing a [`TweetId`].
#[derive(Debug, Error)]
#[error("tweet id cannot be empty or only whitespace")]
pub struct EmptyTweetId;

/// Identifier of a tweet, as rendered into the `name` attribute of its like control.
///
/// The id is treated as opaque: it is sent back to the site exactly as it was read.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TweetId(String);

impl TweetId {
    /// Returns the id as it is sent over the wire.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TweetId {
    type Err = EmptyTweetId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(EmptyTweetId);
        }

        Ok(Self(s.to_owned()))
    }
}

impl From<u64> for TweetId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Display for TweetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a toggle did on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// A like was added.
    Create,
    /// A like was removed.
    Delete,
    /// Anything else the site answered with. Only the count is applied for these.
    Unknown(String),
}

impl Method {
    /// The state a like control should end up in, if the method dictates one.
    #[must_use]
    pub fn state(&self) -> Option<LikeState> {
        match self {
            Self::Create => Some(LikeState::Liked),
            Self::Delete => Some(LikeState::Unliked),
            Self::Unknown(_) => None,
        }
    }
}

impl From<&str> for Method {
    fn from(method: &str) -> Self {
        match method {
            "create" => Self::Create,
            "delete" => Self::Delete,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Delete => write!(f, "delete"),
            Self::Unknown(method) => write!(f, "{method}"),
        }
    }
}

/// Whether the current viewer likes a tweet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LikeState {
    /// Outline heart.
    #[default]
    Unliked,
    /// Filled red heart.
    Liked,
}

/// The authoritative answer of the site to a toggle.
///
/// The count is never computed locally; whatever the site reports here is what
/// gets displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResult {
    /// Echo of the tweet that was toggled.
    pub id: TweetId,
    /// The new like count of the tweet.
    pub like_count: u32,
    /// Whether the toggle added or removed a like.
    pub method: Method,
    /// Username of the account that toggled, when the site reports it.
    pub user: Option<String>,
}

impl ToggleResult {
    /// Creates a result without a reporting user.
    #[must_use]
    pub fn new(id: TweetId, like_count: u32, method: Method) -> Self {
        Self {
            id,
            like_count,
            method,
            user: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tweet_id_should_keep_name_as_read_and_reject_empty() {
        let id: TweetId = " 42 ".parse().unwrap();
        assert_eq!(" 42 ", id.as_str());
        assert_ne!(TweetId::from(42), id);

        assert!("".parse::<TweetId>().is_err());
        assert!("   ".parse::<TweetId>().is_err());
    }

    #[test]
    fn tweet_id_from_number_should_match_parsed() {
        assert_eq!(TweetId::from(42), "42".parse::<TweetId>().unwrap());
    }

    #[test]
    fn method_should_map_known_values() {
        assert_eq!(Method::Create, Method::from("create"));
        assert_eq!(Method::Delete, Method::from("delete"));
        assert_eq!(Method::Unknown("noop".to_owned()), Method::from("noop"));
        assert_eq!(Method::Unknown("Create".to_owned()), Method::from("Create"));
    }

    #[test]
    fn method_should_dictate_state() {
        assert_eq!(Some(LikeState::Liked), Method::Create.state());
        assert_eq!(Some(LikeState::Unliked), Method::Delete.state());
        assert_eq!(None, Method::from("noop").state());
    }

    #[test]
    fn method_should_display_as_sent() {
        assert_eq!("create", Method::Create.to_string());
        assert_eq!("noop", Method::from("noop").to_string());
    }
}
