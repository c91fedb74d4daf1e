//! Represents a client abstraction for the like endpoint of the tweet site.

mod api;

use crate::{
    stdx::{
        error::assumption,
        http::{CSRF_COOKIE, CSRF_FIELD, DEFAULT_USER_AGENT, SESSION_COOKIE, cookie_header},
    },
    tweets::{
        client::api::toggle::RawToggleResponse,
        error::{ClientBuilderError, RequestError, ToggleError, UnexpectedStatus},
        like::{ToggleResult, TweetId},
    },
};
use reqwest::header::{ACCEPT, COOKIE, REFERER};
use std::{fmt::Debug, sync::Arc, time::Duration};
use tracing::{debug, instrument, warn};
use url::Url;

/// A builder for configuring and creating instances of [`Client`].
///
/// The endpoint and the CSRF token are what the hosting page would otherwise
/// provide as globals; here they are handed over explicitly.
///
/// # Example
///
/// ```
/// # use tweetlike::tweets::ClientBuilder;
/// let client = ClientBuilder::new()
///     .endpoint("https://tweets.example.com/user/like/")
///     .csrf_token("csrf-token")
///     .with_session("session-id")
///     .build()?;
/// # Ok::<(), tweetlike::tweets::error::ClientBuilderError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    builder: reqwest::ClientBuilder,
    endpoint: Option<String>,
    csrf: CsrfToken,
    session: Session,
}

impl Default for ClientBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    ///
    /// This includes a default user agent (`$CARGO_PKG_NAME/$CARGO_PKG_VERSION`).
    /// Redirects are never followed, as the only redirect the like endpoint
    /// issues is to the login page.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .brotli(true);

        Self {
            builder,
            endpoint: None,
            csrf: CsrfToken::default(),
            session: Session::default(),
        }
    }

    /// Sets the URL that toggles are `POST`ed to.
    ///
    /// The URL is validated when [`build()`](ClientBuilder::build()) is called.
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_owned());
        self
    }

    /// Sets the anti-forgery token sent with every toggle.
    ///
    /// It is sent both as the `csrfmiddlewaretoken` form field and as the
    /// `csrftoken` cookie, as the site compares the two.
    #[inline]
    #[must_use]
    pub fn csrf_token(mut self, token: &str) -> Self {
        self.csrf = CsrfToken(Arc::from(token));
        self
    }

    /// Configures the `ClientBuilder` to send the given `sessionid` cookie.
    ///
    /// Liking requires a logged in account; without a session the site answers
    /// every toggle with a redirect to its login page.
    #[inline]
    #[must_use]
    pub fn with_session(mut self, session: &str) -> Self {
        self.session = Session::new(session);
        self
    }

    /// Sets a custom `User-Agent` header for the [`Client`].
    #[inline]
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        let builder = self.builder.user_agent(user_agent);
        Self { builder, ..self }
    }

    /// Sets a timeout for each toggle request.
    ///
    /// No timeout is set by default.
    #[inline]
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        let builder = self.builder.timeout(timeout);
        Self { builder, ..self }
    }

    /// Consumes the `ClientBuilder` and returns a fully-configured [`Client`].
    ///
    /// # Errors
    ///
    /// - [`ClientBuilderError::MissingEndpoint`] if no endpoint was set.
    /// - [`ClientBuilderError::InvalidEndpoint`] if the endpoint is not a URL.
    /// - [`ClientBuilderError::UnsupportedScheme`] if the endpoint is not `http` or `https`.
    /// - [`ClientBuilderError::BuildFailed`] if the underlying HTTP client could not be built.
    pub fn build(self) -> Result<Client, ClientBuilderError> {
        let endpoint = self.endpoint.ok_or(ClientBuilderError::MissingEndpoint)?;
        let endpoint = Url::parse(&endpoint)?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientBuilderError::UnsupportedScheme);
        }

        if self.csrf.is_empty() {
            warn!("no csrf token configured, toggles will be rejected by the site");
        }

        Ok(Client {
            http: self
                .builder
                .build()
                .map_err(|_err| ClientBuilderError::BuildFailed)?,
            endpoint,
            csrf: self.csrf,
            session: self.session,
        })
    }
}

/// A high-level, asynchronous client for the like endpoint.
///
/// Cloning is cheap and clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// # use tweetlike::tweets::{Client, TweetId, error::Error};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Error> {
/// let client = Client::builder()
///     .endpoint("https://tweets.example.com/user/like/")
///     .csrf_token("csrf-token")
///     .with_session("session-id")
///     .build()?;
///
/// let result = client.toggle_like(&TweetId::from(42)).await?;
/// println!("tweet {} now has {} likes", result.id, result.like_count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
    csrf: CsrfToken,
    session: Session,
}

impl Client {
    /// Returns a [`ClientBuilder`] to configure a `Client`.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The URL toggles are sent to.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns `true` if a session was provided when building the client.
    ///
    /// This does not say whether the session is still valid.
    #[inline]
    #[must_use]
    pub fn has_session(&self) -> bool {
        !self.session.is_empty()
    }

    /// Toggles the like of the current account on the given tweet.
    ///
    /// Sends exactly one request, and returns what the site reports: the new
    /// count, and whether the like was created or deleted.
    ///
    /// # Errors
    ///
    /// - [`ToggleError::NotAuthenticated`] if the site redirects to its login page.
    /// - [`ToggleError::CsrfRejected`] if the site rejects the CSRF token.
    /// - [`ToggleError::TweetNotFound`] if no such tweet exists.
    /// - [`ToggleError::UnexpectedStatus`] for any other non-success status.
    /// - [`ToggleError::RequestFailed`] if the request could not be sent.
    /// - [`ToggleError::Internal`] if the response body is not what the site is known to send.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn toggle_like(&self, id: &TweetId) -> Result<ToggleResult, ToggleError> {
        let mut cookies = vec![(CSRF_COOKIE, self.csrf.as_str())];

        if let Some(session) = self.session.as_str() {
            cookies.push((SESSION_COOKIE, session));
        }

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(COOKIE, cookie_header(cookies))
            .header(REFERER, self.referer())
            .header(ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&[("tweetid", id.as_str()), (CSRF_FIELD, self.csrf.as_str())])
            .send()
            .await
            .map_err(RequestError)?;

        let status = response.status();
        debug!(%status, "like endpoint responded");

        if status.is_redirection() {
            return Err(ToggleError::NotAuthenticated);
        }

        match status.as_u16() {
            403 => return Err(ToggleError::CsrfRejected),
            404 => return Err(ToggleError::TweetNotFound),
            _ if status.is_success() => {}
            other => return Err(UnexpectedStatus::new(other).into()),
        }

        let response = response.text().await.map_err(RequestError)?;

        let raw = match serde_json::from_str::<RawToggleResponse>(&response) {
            Ok(raw) => raw,
            Err(err) => assumption!(
                "failed to deserialize like endpoint response: {err}\n\n{response}"
            ),
        };

        let result = ToggleResult::try_from(raw)?;

        if result.id != *id {
            warn!(echoed = %result.id, "like endpoint echoed a different tweet id");
        }

        debug!(method = %result.method, like_count = result.like_count, "toggled like");

        Ok(result)
    }

    /// Django only accepts a same-origin `Referer` for CSRF protected `POST`s over https.
    fn referer(&self) -> String {
        format!("{}/", self.endpoint.origin().ascii_serialization())
    }
}

#[derive(Clone, Default)]
pub(crate) struct CsrfToken(Arc<str>);

impl CsrfToken {
    #[inline]
    fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for CsrfToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CsrfToken(..)")
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Session(Option<Arc<str>>);

impl Session {
    #[inline]
    fn new(session: &str) -> Self {
        Self(Some(Arc::from(session)))
    }

    #[inline]
    fn as_str(&self) -> Option<&str> {
        self.0.as_deref().filter(|session| !session.is_empty())
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.0.as_ref().is_none_or(|session| session.is_empty())
    }
}
