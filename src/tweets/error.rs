//! Errors that can happen when toggling likes.
#![allow(missing_docs)]

use thiserror::Error;

pub use _inner::{ClientBuilderError, ClientError, Error, ToggleError, ViewError};

#[derive(Debug, Error)]
#[error(transparent)]
pub struct RequestError(#[from] pub(crate) reqwest::Error);

impl RequestError {
    /// Returns `true` if the request gave up after the configured timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.0.is_timeout()
    }
}

/// Represents a status code the like endpoint is not known to answer with.
///
/// The known ones (login redirect, `403`, `404`) have their own variants on
/// [`ToggleError`].
#[derive(Debug, Error)]
#[error("like endpoint answered with unexpected status `{0}`")]
pub struct UnexpectedStatus(u16);

impl UnexpectedStatus {
    pub(crate) fn new(status: u16) -> Self {
        Self(status)
    }

    /// The HTTP status code the endpoint answered with.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.0
    }
}

mod _inner {
    use crate::stdx::error::Assumption;
    use error_set::error_set;

    error_set! {
        Error := ToggleError || ClientBuilderError || ViewError

        ToggleError := {
            #[display("like control has no `name` to read a tweet id from")]
            MissingTarget,
            #[display("a toggle for this tweet is already in flight")]
            InFlight,
            #[display("session missing or expired (redirected to login)")]
            NotAuthenticated,
            #[display("csrf token rejected")]
            CsrfRejected,
            #[display("tweet not found")]
            TweetNotFound,
            UnexpectedStatus(super::UnexpectedStatus),
        } || Base || ClientError

        ViewError := Base

        ClientBuilderError := {
            BuildFailed,
            #[display("an endpoint must be provided")]
            MissingEndpoint,
            #[display("endpoint must be an `http` or `https` url")]
            UnsupportedScheme,
            InvalidEndpoint(url::ParseError),
        }

        ClientError := {
            RequestFailed(super::RequestError),
        }

        Base := {
            Internal(Assumption),
        }
    }
}
