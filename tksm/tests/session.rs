//! Scripted sessions over definition sources on disk.

use tempfile::TempDir;
use tksm::{session, Console, ReaderSource, TksmConfig};

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let write = |name: &str, text: &str| std::fs::write(dir.path().join(name), text).unwrap();
    write(
        "pinyin.cin",
        "%chardef begin\nshi 是\nshi 事\nzhong 中\nguo 國\n%chardef end\n",
    );
    write("word1.txt", "是 shi2\n事 shi\n");
    write("word2.txt", "中國\n\"broken\n");
    let mut row = String::from("甲乙");
    row.extend(std::iter::repeat('﹏').take(24));
    write("tmp_tksm_words.txt", &format!("aa {row}\n"));
    write("notes.txt", "這 zhe\n");
    dir
}

fn run(dir: &TempDir, keys: &str) -> (Vec<String>, String) {
    let config = TksmConfig::discover(None, dir.path()).unwrap();
    let (tables, _) = tksm::load_tables(&config).unwrap();
    let mut engine = tksm::engine(tables, &config);
    let mut input = ReaderSource::new(keys.as_bytes());
    let mut console = Console::new(Vec::new(), &config);
    let commits = session::run(&mut engine, &mut input, &mut console).unwrap();
    (commits, String::from_utf8(console.into_inner()).unwrap())
}

#[test]
fn commits_are_rendered_and_returned() {
    let dir = data_dir();
    let (commits, out) = run(&dir, "shi2 aab zg ");
    assert_eq!(commits, vec!["是", "乙", "中國"]);
    assert!(out.contains("Output: 是"));
    assert!(out.ends_with("Exiting.\n"));
}

#[test]
fn only_prefixed_word_files_are_loaded() {
    let dir = data_dir();
    let config = TksmConfig::discover(None, dir.path()).unwrap();
    let (tables, report) = tksm::load_tables(&config).unwrap();
    assert!(!tables.phrases.contains_key("zhe"));
    assert_eq!(tables.phrases.phrase("zg", 1), Some("中國"));
    assert_eq!(report.issues().len(), 1);
    assert_eq!(report.issues()[0].line_number, 2);
}

#[test]
fn later_word_file_claims_numbered_slot() {
    let dir = data_dir();
    std::fs::write(dir.path().join("word3.txt"), "試 shi1\n").unwrap();
    let config = TksmConfig::discover(None, dir.path()).unwrap();
    let paths = config.source_paths().unwrap();
    assert!(paths.word_files.last().unwrap().ends_with("word3.txt"));
    let (tables, _) = tksm::load_tables(&config).unwrap();
    assert_eq!(tables.phrases.phrase("shi", 1), Some("試"));
    assert_eq!(tables.phrases.phrase("shi", 2), Some("是"));
}

#[test]
fn live_feedback_lists_options_and_cell_row() {
    let dir = data_dir();
    let (_, out) = run(&dir, "shi");
    assert!(out.contains("Options:\n1: 事\n2: 是\n"));

    let (_, out) = run(&dir, "aa");
    assert!(out.contains("aa 甲乙﹏"));
}

#[test]
fn termination_discards_pending_keys() {
    let dir = data_dir();
    let (commits, out) = run(&dir, "shi2\u{3}shi ");
    assert!(commits.is_empty());
    assert!(!out.contains("Output:"));
}

#[test]
fn phrase_search_lists_numbered_matches() {
    let dir = data_dir();
    let (commits, out) = run(&dir, "sh;2 ");
    assert!(out.contains("1: shi1 事\n2: shi2 是\n"));
    assert_eq!(commits, vec!["是"]);
}

#[test]
fn missing_romanization_source_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let config = TksmConfig::discover(None, dir.path()).unwrap();
    let err = tksm::load_tables(&config).unwrap_err();
    assert!(matches!(err, tksm_core::Error::MissingSource(_)));
}

#[test]
fn decode_commits_trailing_keys() {
    let dir = data_dir();
    let config = TksmConfig::discover(None, dir.path()).unwrap();
    let (tables, _) = tksm::load_tables(&config).unwrap();
    let mut engine = tksm::engine(tables, &config);
    assert_eq!(session::decode(&mut engine, "shi2 aab"), vec!["是", "乙"]);
}
