use serde_json::json;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Build one JSONL tweet record with the fields the three reports read.
pub fn tweet(date: &str, username: &str, content: &str, mentions: &[&str]) -> String {
    json!({
        "date": date,
        "user": { "username": username, "displayname": username },
        "content": content,
        "mentionedUsers": mentions.iter().map(|m| json!({ "username": m })).collect::<Vec<_>>(),
    })
    .to_string()
}

/// Write lines to a plain text file, one record per line.
pub fn write_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write a compressed `.zst` file containing the provided JSONL lines.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Spill lines into a fresh temp dir and return the archive path.
/// The temp dir is leaked for the duration of the test run.
pub fn archive(lines: &[String]) -> PathBuf {
    let dir = tempfile::tempdir().unwrap().into_path();
    let path = dir.join("tweets.json");
    write_lines(&path, lines);
    path
}
