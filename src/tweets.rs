//! An abstraction for the like button of a Django tweet site.

pub mod client;
pub mod error;
pub mod handler;
pub mod like;
pub mod view;

pub use client::{Client, ClientBuilder};

pub use handler::{Click, LikeToggleHandler};

pub use like::{LikeState, Method, ToggleResult, TweetId};

pub use view::{LikeView, Views};
