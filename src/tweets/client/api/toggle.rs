use serde::Deserialize;

use crate::{
    stdx::{
        error::{Assume, Assumption},
        serde::{string_from_number, u32_from_string},
    },
    tweets::like::{Method, ToggleResult, TweetId},
};

#[derive(Debug, Deserialize)]
pub struct RawToggleResponse {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(deserialize_with = "string_from_number")]
    pub tweetid: String,
    pub method: String,
    #[serde(deserialize_with = "u32_from_string")]
    pub like_count: u32,
}

impl TryFrom<RawToggleResponse> for ToggleResult {
    type Error = Assumption;

    fn try_from(raw: RawToggleResponse) -> Result<Self, Self::Error> {
        let id = raw.tweetid.parse::<TweetId>().assumption(
            "like endpoint should echo back the posted `tweetid`, but it was empty",
        )?;

        Ok(Self {
            id,
            like_count: raw.like_count,
            method: Method::from(raw.method.as_str()),
            user: raw.user,
        })
    }
}
