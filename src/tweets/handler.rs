//! Wiring between a click on a like control and the like endpoint.

use crate::tweets::{
    client::Client,
    error::{ClientBuilderError, ToggleError},
    like::{ToggleResult, TweetId},
    view::Views,
};
use parking_lot::Mutex;
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, instrument, warn};

/// A click on a like control.
///
/// Carries the control's `name` attribute, which is where the tweet id lives,
/// and whether the default navigation of the control has been suppressed.
#[derive(Debug, Clone)]
pub struct Click<'a> {
    name: Option<&'a str>,
    default_prevented: bool,
}

impl<'a> Click<'a> {
    /// A click on a control with the given `name`, or without one.
    #[must_use]
    pub fn new(name: Option<&'a str>) -> Self {
        Self {
            name,
            default_prevented: false,
        }
    }

    /// Suppresses the control's default navigation.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether [`prevent_default`](Click::prevent_default) was called.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    fn target(&self) -> Option<TweetId> {
        self.name.and_then(|name| name.parse().ok())
    }
}

/// Turns clicks on like controls into toggles and applies the answers to [`Views`].
///
/// Nothing changes locally until the site answers. While a toggle for a tweet
/// is in flight, further clicks on that tweet are rejected with
/// [`ToggleError::InFlight`] instead of being sent a second time.
///
/// # Example
///
/// ```no_run
/// # use tweetlike::tweets::{Click, LikeToggleHandler, LikeView, TweetId, error::Error};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Error> {
/// let handler = LikeToggleHandler::configure("https://tweets.example.com/user/like/", "csrf-token")?;
/// handler.views().insert(TweetId::from(42), LikeView::unliked(4));
///
/// let mut click = Click::new(Some("42"));
/// let result = handler.click(&mut click).await?;
///
/// assert!(click.is_default_prevented());
/// println!("tweet {} now has {} likes", result.id, result.like_count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LikeToggleHandler {
    client: Client,
    views: Views,
    in_flight: Arc<Mutex<HashSet<TweetId>>>,
}

impl LikeToggleHandler {
    /// Creates a handler posting to `endpoint` with the given anti-forgery token,
    /// over an empty set of views.
    ///
    /// Use [`LikeToggleHandler::new`] to pass a fully configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns a [`ClientBuilderError`] if the endpoint is invalid or the HTTP client cannot be built.
    pub fn configure(endpoint: &str, csrf_token: &str) -> Result<Self, ClientBuilderError> {
        let client = Client::builder()
            .endpoint(endpoint)
            .csrf_token(csrf_token)
            .build()?;

        Ok(Self::new(client, Views::new()))
    }

    /// Creates a handler from a client and the views it should update.
    #[must_use]
    pub fn new(client: Client, views: Views) -> Self {
        Self {
            client,
            views,
            in_flight: Arc::default(),
        }
    }

    /// The views updated by this handler.
    #[must_use]
    pub fn views(&self) -> &Views {
        &self.views
    }

    /// The client toggles are sent with.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns `true` if a toggle for `id` is waiting on the site.
    #[must_use]
    pub fn is_in_flight(&self, id: &TweetId) -> bool {
        self.in_flight.lock().contains(id)
    }

    /// Handles a click on a like control.
    ///
    /// Suppresses the default navigation, toggles the tweet named by the
    /// control, and applies the answer to the view of the tweet the site
    /// echoes back.
    ///
    /// # Errors
    ///
    /// - [`ToggleError::MissingTarget`] if the control has no usable `name`; nothing is sent.
    /// - [`ToggleError::InFlight`] if a toggle for the same tweet has not finished; nothing is sent.
    /// - Any error of [`Client::toggle_like`]; views are left untouched.
    #[instrument(skip(self, click), fields(name = ?click.name))]
    pub async fn click(&self, click: &mut Click<'_>) -> Result<ToggleResult, ToggleError> {
        click.prevent_default();

        let Some(id) = click.target() else {
            warn!("like control has no tweet id");
            return Err(ToggleError::MissingTarget);
        };

        let Some(_guard) = InFlight::acquire(&self.in_flight, &id) else {
            debug!(%id, "toggle already in flight, ignoring click");
            return Err(ToggleError::InFlight);
        };

        let result = self.client.toggle_like(&id).await?;

        self.apply(&result);

        Ok(result)
    }

    /// Applies a result to the view of the tweet it names.
    ///
    /// Returns `false` if no view is registered for that tweet.
    pub fn apply(&self, result: &ToggleResult) -> bool {
        self.views.apply(result)
    }
}

/// Marks a tweet as having a toggle in flight until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<TweetId>>,
    id: TweetId,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a Mutex<HashSet<TweetId>>, id: &TweetId) -> Option<Self> {
        if !set.lock().insert(id.clone()) {
            return None;
        }

        Some(Self {
            set,
            id: id.clone(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.id);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tweets::{like::Method, view::LikeView};

    #[test]
    fn click_target_should_need_a_name() {
        assert_eq!(None, Click::new(None).target());
        assert_eq!(None, Click::new(Some("")).target());
        assert_eq!(None, Click::new(Some("  ")).target());
        assert_eq!(Some(TweetId::from(42)), Click::new(Some("42")).target());

        let target = Click::new(Some(" 42 ")).target();
        assert_eq!(Some(" 42 "), target.as_ref().map(TweetId::as_str));
    }

    #[test]
    fn in_flight_should_reject_same_id_until_dropped() {
        let set = Mutex::new(HashSet::new());
        let id = TweetId::from(42);

        let guard = InFlight::acquire(&set, &id);
        assert!(guard.is_some());
        assert!(InFlight::acquire(&set, &id).is_none());
        assert!(InFlight::acquire(&set, &TweetId::from(7)).is_some());

        drop(guard);
        assert!(InFlight::acquire(&set, &id).is_some());
        assert!(set.lock().is_empty());
    }

    #[tokio::test]
    async fn click_without_name_should_not_send() {
        let handler =
            LikeToggleHandler::configure("http://127.0.0.1:9/user/like/", "token").unwrap();

        let mut click = Click::new(None);
        let err = handler.click(&mut click).await.unwrap_err();

        assert!(matches!(err, ToggleError::MissingTarget));
        assert!(click.is_default_prevented());
    }

    #[test]
    fn apply_should_update_registered_view() {
        let handler =
            LikeToggleHandler::configure("http://127.0.0.1:9/user/like/", "token").unwrap();
        handler.views().insert(TweetId::from(42), LikeView::unliked(4));

        assert!(handler.apply(&ToggleResult::new(TweetId::from(42), 5, Method::Create)));
        assert_eq!(
            Some(LikeView::liked(5)),
            handler.views().get(&TweetId::from(42))
        );
    }
}
