//! Local view state of the like controls on a page.
//!
//! Every like control is rendered as
//!
//! ```html
//! <a class="ajax-like" name="42" href="#"><i id="heart" class="far fa-heart myhrt"></i><span id="like-count">5</span></a>
//! ```
//!
//! The `name` carries the tweet id, `#heart` carries the icon style, and
//! `#like-count` the displayed count.

use crate::{
    stdx::error::{Assume, assumption},
    tweets::{
        error::ViewError,
        like::{LikeState, ToggleResult, TweetId},
    },
};
use parking_lot::RwLock;
use scraper::{ElementRef, Html, Selector};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, warn};

const ICON_OUTLINE: [&str; 2] = ["far", "myhrt"];
const ICON_FILLED: [&str; 2] = ["fas", "myhrt-red"];
const COUNT_EMPHASIS: &str = "red";

/// A set of CSS classes, kept in the order they were added for rendering.
///
/// Adding a present class or removing an absent one does nothing, which makes
/// applying the same [`ToggleResult`] twice the same as applying it once.
/// Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct ClassList(Vec<String>);

impl PartialEq for ClassList {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.iter().all(|class| other.contains(class))
    }
}

impl Eq for ClassList {}

impl ClassList {
    /// Returns `true` if `class` is in the list.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|it| it == class)
    }

    /// Iterates the classes in the order they are rendered.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns `true` if there are no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn add(&mut self, classes: &[&str]) {
        for class in classes {
            if !self.contains(class) {
                self.0.push((*class).to_owned());
            }
        }
    }

    fn remove(&mut self, classes: &[&str]) {
        self.0.retain(|it| !classes.contains(&it.as_str()));
    }
}

impl<'a> FromIterator<&'a str> for ClassList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = Self::default();
        for class in iter {
            list.add(&[class]);
        }
        list
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// The rendered state of one like control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeView {
    like_count: u32,
    icon: ClassList,
    count: ClassList,
}

impl LikeView {
    /// A control for a tweet the current viewer likes: filled red heart and red count.
    #[must_use]
    pub fn liked(like_count: u32) -> Self {
        Self {
            like_count,
            icon: ["fas", "fa-heart", "myhrt-red"].into_iter().collect(),
            count: [COUNT_EMPHASIS].into_iter().collect(),
        }
    }

    /// A control for a tweet the current viewer does not like: outline heart.
    #[must_use]
    pub fn unliked(like_count: u32) -> Self {
        Self {
            like_count,
            icon: ["far", "fa-heart", "myhrt"].into_iter().collect(),
            count: ClassList::default(),
        }
    }

    /// The displayed like count.
    #[must_use]
    pub fn like_count(&self) -> u32 {
        self.like_count
    }

    /// Classes of the `#heart` icon.
    #[must_use]
    pub fn icon_classes(&self) -> &ClassList {
        &self.icon
    }

    /// Classes of the `#like-count` element.
    #[must_use]
    pub fn count_classes(&self) -> &ClassList {
        &self.count
    }

    /// Whether the count is displayed with red emphasis.
    #[must_use]
    pub fn is_emphasized(&self) -> bool {
        self.count.contains(COUNT_EMPHASIS)
    }

    /// Derived from the icon style: liked only when the icon is filled.
    #[must_use]
    pub fn state(&self) -> LikeState {
        if ICON_FILLED.iter().all(|class| self.icon.contains(class)) {
            LikeState::Liked
        } else {
            LikeState::Unliked
        }
    }

    /// Applies what the site answered to a toggle.
    ///
    /// The count is always replaced. The icon and emphasis only change for a
    /// `create` or `delete`; any other method leaves them as they were.
    pub fn apply(&mut self, result: &ToggleResult) {
        self.like_count = result.like_count;

        match result.method.state() {
            Some(LikeState::Liked) => {
                self.icon.remove(&ICON_OUTLINE);
                self.icon.add(&ICON_FILLED);
                self.count.add(&[COUNT_EMPHASIS]);
            }
            Some(LikeState::Unliked) => {
                self.icon.remove(&ICON_FILLED);
                self.icon.add(&ICON_OUTLINE);
                self.count.remove(&[COUNT_EMPHASIS]);
            }
            None => debug!(method = %result.method, "unknown method, only updating count"),
        }
    }

    /// Renders the control as markup the page and [`Views::from_html`] agree on.
    #[must_use]
    pub fn to_html(&self, id: &TweetId) -> String {
        let name = html_escape::encode_double_quoted_attribute(id.as_str());
        let icon = html_escape::encode_double_quoted_attribute(&self.icon.to_string()).into_owned();

        let count = if self.count.is_empty() {
            String::from(r#"<span id="like-count">"#)
        } else {
            let classes = self.count.to_string();
            format!(
                r#"<span id="like-count" class="{}">"#,
                html_escape::encode_double_quoted_attribute(&classes)
            )
        };

        format!(
            r##"<a class="ajax-like" name="{name}" href="#"><i id="heart" class="{icon}"></i>{count}{}</span></a>"##,
            self.like_count
        )
    }
}

/// The like controls of a page, by tweet id.
///
/// Each id maps to exactly one view, so a result is applied to one control
/// instead of every element that happens to share a `name`. Clones share the
/// same views.
#[derive(Debug, Clone, Default)]
pub struct Views(Arc<RwLock<HashMap<TweetId, LikeView>>>);

impl Views {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from a rendered page.
    ///
    /// Every `.ajax-like` element with a `name` becomes a view. When several
    /// controls share a name only the first one is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Internal`] if a control does not have exactly one
    /// `#heart` and one `#like-count` child, or if the count is not a number.
    pub fn from_html(html: &str) -> Result<Self, ViewError> {
        let html = Html::parse_document(html);

        let selector =
            Selector::parse(".ajax-like[name]").expect("`.ajax-like[name]` should be a valid selector");

        let mut views = HashMap::new();

        for control in html.select(&selector) {
            let Some(Ok(id)) = control.value().attr("name").map(str::parse::<TweetId>) else {
                warn!("skipping like control with an empty `name`");
                continue;
            };

            if views.contains_key(&id) {
                warn!(%id, "duplicate like control, keeping the first one");
                continue;
            }

            let view = parse_control(&id, control)?;
            views.insert(id, view);
        }

        debug!(controls = views.len(), "parsed like controls");

        Ok(Self(Arc::new(RwLock::new(views))))
    }

    /// Registers the view for `id`, returning the one it replaced.
    pub fn insert(&self, id: TweetId, view: LikeView) -> Option<LikeView> {
        self.0.write().insert(id, view)
    }

    /// Returns a snapshot of the view for `id`.
    #[must_use]
    pub fn get(&self, id: &TweetId) -> Option<LikeView> {
        self.0.read().get(id).cloned()
    }

    /// Returns the like state shown for `id`.
    #[must_use]
    pub fn state(&self, id: &TweetId) -> Option<LikeState> {
        self.0.read().get(id).map(LikeView::state)
    }

    /// Applies `result` to the view of the tweet it names.
    ///
    /// Returns `false`, changing nothing, if no view is registered for that tweet.
    pub fn apply(&self, result: &ToggleResult) -> bool {
        let mut views = self.0.write();

        let Some(view) = views.get_mut(&result.id) else {
            debug!(id = %result.id, "no like control registered");
            return false;
        };

        view.apply(result);
        true
    }

    /// Renders the control for `id`.
    #[must_use]
    pub fn render(&self, id: &TweetId) -> Option<String> {
        self.0.read().get(id).map(|view| view.to_html(id))
    }

    /// Number of registered controls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Returns `true` if no controls are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}

fn parse_control(id: &TweetId, control: ElementRef<'_>) -> Result<LikeView, ViewError> {
    let mut icons = Vec::new();
    let mut counts = Vec::new();

    for child in control.children().filter_map(ElementRef::wrap) {
        match child.value().id() {
            Some("heart") => icons.push(child),
            Some("like-count") => counts.push(child),
            _ => {}
        }
    }

    assumption!(
        icons.len() < 2 && counts.len() < 2,
        "like control for tweet `{id}` should have one `#heart` and one `#like-count`, but had {} and {}",
        icons.len(),
        counts.len()
    );

    let icon = icons.first().assumption(format!(
        "like control for tweet `{id}` should have a `#heart` child"
    ))?;
    let count = counts.first().assumption(format!(
        "like control for tweet `{id}` should have a `#like-count` child"
    ))?;

    let text = count.text().collect::<String>();

    let like_count = match text.trim().parse::<u32>() {
        Ok(like_count) => like_count,
        Err(err) => assumption!(
            "`#like-count` of tweet `{id}` should be a non-negative number, but was `{text}`: {err}"
        ),
    };

    Ok(LikeView {
        like_count,
        icon: icon.value().classes().collect(),
        count: count.value().classes().collect(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tweets::like::Method;
    use pretty_assertions::assert_eq;

    fn id() -> TweetId {
        TweetId::from(42)
    }

    #[test]
    fn create_should_fill_icon_and_emphasize_count() {
        let mut view = LikeView::unliked(4);

        view.apply(&ToggleResult::new(id(), 5, Method::Create));

        assert_eq!(5, view.like_count());
        assert_eq!(LikeState::Liked, view.state());
        assert_eq!("fa-heart fas myhrt-red", view.icon_classes().to_string());
        assert!(view.is_emphasized());
    }

    #[test]
    fn delete_should_restore_outline_and_drop_emphasis() {
        let mut view = LikeView::liked(5);

        view.apply(&ToggleResult::new(id(), 4, Method::Delete));

        assert_eq!(4, view.like_count());
        assert_eq!(LikeState::Unliked, view.state());
        assert_eq!("fa-heart far myhrt", view.icon_classes().to_string());
        assert!(!view.is_emphasized());
    }

    #[test]
    fn unknown_method_should_only_update_count() {
        let mut view = LikeView::liked(5);
        let before = view.clone();

        view.apply(&ToggleResult::new(id(), 9, Method::from("noop")));

        assert_eq!(9, view.like_count());
        assert_eq!(before.icon_classes(), view.icon_classes());
        assert_eq!(before.count_classes(), view.count_classes());
        assert_eq!(LikeState::Liked, view.state());
    }

    #[test]
    fn applying_twice_should_equal_applying_once() {
        for method in [Method::Create, Method::Delete, Method::from("noop")] {
            for start in [LikeView::liked(3), LikeView::unliked(3)] {
                let result = ToggleResult::new(id(), 7, method.clone());

                let mut once = start.clone();
                once.apply(&result);

                let mut twice = start;
                twice.apply(&result);
                twice.apply(&result);

                assert_eq!(once, twice, "method `{method}`");
            }
        }
    }

    #[test]
    fn class_list_equality_should_ignore_order() {
        let a: ClassList = ["fas", "fa-heart", "myhrt-red"].into_iter().collect();
        let b: ClassList = ["myhrt-red", "fas", "fa-heart", "fas"].into_iter().collect();
        let c: ClassList = ["fas", "fa-heart"].into_iter().collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn should_parse_controls_from_page() {
        let page = r##"
            <html><body>
              <div class="tweet">
                <a class="ajax-like" name="42" href="#"><i id="heart" class="fas fa-heart myhrt-red"></i><span id="like-count" class="red">5</span></a>
              </div>
              <div class="tweet">
                <a class="ajax-like" name="7" href="#"><i id="heart" class="far fa-heart myhrt"></i><span id="like-count"> 0 </span></a>
              </div>
            </body></html>
        "##;

        let views = Views::from_html(page).unwrap();

        assert_eq!(2, views.len());
        assert_eq!(Some(LikeView::liked(5)), views.get(&id()));
        assert_eq!(Some(LikeView::unliked(0)), views.get(&TweetId::from(7)));
    }

    #[test]
    fn should_keep_first_of_duplicate_controls() {
        let page = r##"
            <a class="ajax-like" name="42" href="#"><i id="heart" class="far myhrt"></i><span id="like-count">1</span></a>
            <a class="ajax-like" name="42" href="#"><i id="heart" class="fas myhrt-red"></i><span id="like-count">9</span></a>
        "##;

        let views = Views::from_html(page).unwrap();

        assert_eq!(1, views.len());
        assert_eq!(Some(1), views.get(&id()).map(|view| view.like_count()));
        assert_eq!(Some(LikeState::Unliked), views.state(&id()));
    }

    #[test]
    fn should_fail_on_control_without_count() {
        let page = r##"<a class="ajax-like" name="42" href="#"><i id="heart" class="far myhrt"></i></a>"##;
        assert!(matches!(Views::from_html(page), Err(ViewError::Internal(_))));
    }

    #[test]
    fn should_fail_on_control_with_two_hearts() {
        let page = r##"<a class="ajax-like" name="42" href="#"><i id="heart" class="far myhrt"></i><i id="heart" class="fas myhrt-red"></i><span id="like-count">1</span></a>"##;

        let Err(ViewError::Internal(err)) = Views::from_html(page) else {
            panic!("two `#heart` children should be rejected");
        };

        assert!(err.to_string().contains("had 2 and 1"), "{err}");
    }

    #[test]
    fn should_fail_on_non_numeric_count() {
        let page = r##"<a class="ajax-like" name="42" href="#"><i id="heart" class="far myhrt"></i><span id="like-count">many</span></a>"##;
        assert!(matches!(Views::from_html(page), Err(ViewError::Internal(_))));
    }

    #[test]
    fn rendered_view_should_parse_back_to_itself() {
        let views = Views::new();
        views.insert(id(), LikeView::liked(12));
        views.insert(TweetId::from(7), LikeView::unliked(0));

        let page = format!(
            "{}{}",
            views.render(&id()).unwrap(),
            views.render(&TweetId::from(7)).unwrap()
        );

        let parsed = Views::from_html(&page).unwrap();

        assert_eq!(views.get(&id()), parsed.get(&id()));
        assert_eq!(views.get(&TweetId::from(7)), parsed.get(&TweetId::from(7)));
    }

    #[test]
    fn render_should_escape_id() {
        let id: TweetId = r#"4"2"#.parse().unwrap();
        let html = LikeView::unliked(1).to_html(&id);
        assert!(html.contains(r#"name="4&quot;2""#), "{html}");
    }

    #[test]
    fn apply_should_skip_unregistered_tweet() {
        let views = Views::new();
        views.insert(id(), LikeView::unliked(1));

        let applied = views.apply(&ToggleResult::new(TweetId::from(7), 3, Method::Create));

        assert!(!applied);
        assert_eq!(Some(LikeView::unliked(1)), views.get(&id()));
    }
}
