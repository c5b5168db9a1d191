#[path = "common/mod.rs"]
mod common;

use common::*;
use time::macros::date;
use tweetop::{Strategy, TweetTop};

fn t(date: &str, user: &str) -> String {
    tweet(date, user, "hola", &[])
}

/// alice tweets 4 times and bob once on 2021-02-01; carol twice the day
/// after. The report ranks days by their winner's count, so alice's day
/// comes first and each row carries the winning count.
#[test]
fn most_active_author_per_day() {
    let path = archive(&[
        t("2021-02-01T08:00:00+00:00", "alice"),
        t("2021-02-01T09:00:00+00:00", "alice"),
        t("2021-02-01T10:00:00+00:00", "bob"),
        t("2021-02-01T11:00:00+00:00", "alice"),
        t("2021-02-01T12:00:00+00:00", "alice"),
        t("2021-02-02T08:00:00+00:00", "carol"),
        t("2021-02-02T09:00:00+00:00", "carol"),
    ]);

    let got = TweetTop::new()
        .progress(false)
        .workers(2)
        .lines_per_chunk(3)
        .daily_top_authors(&path)
        .unwrap();

    assert_eq!(got.len(), 2);
    assert_eq!(got[0].date, date!(2021 - 02 - 01));
    assert_eq!(got[0].username, "alice");
    assert_eq!(got[0].count, 4);
    assert_eq!(got[1].date, date!(2021 - 02 - 02));
    assert_eq!(got[1].username, "carol");
    assert_eq!(got[1].count, 2);
}

/// Two authors tied on the same day: the lexicographically smallest
/// username wins, whatever order the counts were merged in.
#[test]
fn tied_day_goes_to_smallest_username() {
    let path = archive(&[
        t("2021-03-05T08:00:00+00:00", "zoe"),
        t("2021-03-05T09:00:00+00:00", "amy"),
        t("2021-03-05T10:00:00+00:00", "zoe"),
        t("2021-03-05T11:00:00+00:00", "amy"),
    ]);

    let got = TweetTop::new().progress(false).daily_top_authors(&path).unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].username, "amy");
    assert_eq!(got[0].count, 2);
}

/// Days whose winners are tied on count are ordered by date ascending.
#[test]
fn tied_days_order_by_date_ascending() {
    let path = archive(&[
        t("2021-04-09T08:00:00+00:00", "u2"),
        t("2021-04-03T08:00:00+00:00", "u1"),
        t("2021-04-06T08:00:00+00:00", "u3"),
    ]);

    let got = TweetTop::new().progress(false).daily_top_authors(&path).unwrap();
    let days: Vec<_> = got.iter().map(|r| r.date).collect();
    assert_eq!(
        days,
        vec![date!(2021 - 04 - 03), date!(2021 - 04 - 06), date!(2021 - 04 - 09)]
    );
}

/// Twelve distinct days, K = 10: only the ten best rows come back.
#[test]
fn truncates_to_top_k_days() {
    let lines: Vec<String> = (1..=12)
        .map(|d| t(&format!("2021-05-{:02}T08:00:00+00:00", d), "u"))
        .collect();
    let path = archive(&lines);

    let got = TweetTop::new().progress(false).daily_top_authors(&path).unwrap();
    assert_eq!(got.len(), 10);
}

/// The streaming fold and the chunked run produce identical reports.
#[test]
fn streaming_matches_chunked() {
    let lines: Vec<String> = (0..40)
        .map(|i| {
            t(
                &format!("2021-06-{:02}T08:00:00+00:00", (i % 9) + 1),
                &format!("user{}", i % 4),
            )
        })
        .collect();
    let path = archive(&lines);

    let chunked = TweetTop::new()
        .progress(false)
        .workers(4)
        .lines_per_chunk(6)
        .daily_top_authors(&path)
        .unwrap();
    let streamed = TweetTop::new()
        .progress(false)
        .strategy(Strategy::Streaming)
        .daily_top_authors(&path)
        .unwrap();
    assert_eq!(chunked, streamed);
}
