//! Record extractors: parse one raw line into the typed key(s) one analysis
//! needs. Pure functions, no shared state. Extra JSON fields are ignored.

use crate::error::RecordError;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

/// Minimal line-level tweet schema. Only the fields the three analyses touch;
/// all optional so requiredness is decided per extractor.
#[derive(Debug, Deserialize)]
pub struct Tweet {
    pub date: Option<String>,
    pub user: Option<TweetUser>,
    pub content: Option<String>,
    #[serde(rename = "mentionedUsers")]
    pub mentioned_users: Option<Vec<Mention>>,
}

#[derive(Debug, Deserialize)]
pub struct TweetUser {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Mention {
    pub username: Option<String>,
}

#[inline]
pub fn parse_tweet(line: &str) -> Result<Tweet, RecordError> {
    Ok(serde_json::from_str(line)?)
}

/// Calendar day (from the offset-aware RFC 3339 `date`) and author username.
/// Both fields are required; an empty username counts as missing.
pub fn day_and_author(line: &str) -> Result<(Date, String), RecordError> {
    let tweet = parse_tweet(line)?;
    let raw = tweet.date.ok_or(RecordError::MissingField("date"))?;
    let day = OffsetDateTime::parse(&raw, &Rfc3339)
        .map_err(|_| RecordError::BadDate(raw.clone()))?
        .date();
    let username = tweet
        .user
        .and_then(|u| u.username)
        .filter(|u| !u.is_empty())
        .ok_or(RecordError::MissingField("user.username"))?;
    Ok((day, username))
}

/// The tweet body, required for the emoji analysis.
pub fn content(line: &str) -> Result<String, RecordError> {
    parse_tweet(line)?
        .content
        .ok_or(RecordError::MissingField("content"))
}

/// Usernames mentioned by the tweet. A missing, `null`, or empty
/// `mentionedUsers` list uniformly means zero mentions, never an error;
/// entries with a missing or empty `username` are skipped.
pub fn mentioned_usernames(line: &str) -> Result<Vec<String>, RecordError> {
    let tweet = parse_tweet(line)?;
    Ok(tweet
        .mentioned_users
        .unwrap_or_default()
        .into_iter()
        .filter_map(|m| m.username)
        .filter(|u| !u.is_empty())
        .collect())
}
