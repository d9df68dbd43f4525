//! Black-box tests that run the full pipeline end to end against small
//! in-memory dictionaries, covering the scenarios used to validate the
//! design.

use std::path::PathBuf;

use fivewords::{Config, PipelineError};

fn temp_path(tag: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!(
        "fivewords_pipeline_test_{tag}_{}.txt",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    p
}

fn write_dict(tag: &str, contents: &str) -> PathBuf {
    let path = temp_path(tag);
    std::fs::write(&path, contents).unwrap();
    path
}

fn run(dict_contents: &str, tag: &str, workers: usize) -> (usize, Vec<Vec<String>>) {
    let dict = write_dict(tag, dict_contents);
    let out = temp_path(&format!("{tag}_out"));
    let config = Config { dictionary: dict.clone(), workers, verbose: false };

    let report = fivewords::run_into(&config, &out).unwrap();
    let text = std::fs::read_to_string(&out).unwrap_or_default();
    let solutions: Vec<Vec<String>> = text
        .lines()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect();

    std::fs::remove_file(&dict).ok();
    std::fs::remove_file(&out).ok();

    (report.num_solutions, solutions)
}

fn normalized(words: &[String]) -> Vec<String> {
    let mut sorted = words.to_vec();
    sorted.sort();
    sorted
}

#[test]
fn five_pairwise_disjoint_words_produce_one_solution() {
    let (count, solutions) = run("abcde\nfghij\nklmno\npqrst\nvwxyz\n", "disjoint", 3);
    assert_eq!(count, 1);
    assert_eq!(solutions.len(), 1);
    assert_eq!(
        normalized(&solutions[0]),
        vec!["abcde", "fghij", "klmno", "pqrst", "vwxyz"]
    );
}

#[test]
fn a_single_word_repeated_finds_nothing() {
    let contents = "abcde\n".repeat(100);
    let (count, _) = run(&contents, "repeated", 2);
    assert_eq!(count, 0);
}

#[test]
fn anagrams_dedup_to_one_key_and_find_nothing() {
    let (count, _) = run("abcde\nabcde\nedcba\n", "anagrams", 2);
    assert_eq!(count, 0);
}

#[test]
fn conflicting_candidates_produce_exactly_one_solution() {
    let (count, solutions) = run(
        "abcde\nfghij\nklmno\npqrst\nuvwxy\nvwxyz\n",
        "conflicting",
        4,
    );
    assert_eq!(count, 1);
    assert!(solutions[0].iter().any(|w| w == "uvwxy"));
    assert!(!solutions[0].iter().any(|w| w == "vwxyz"));
}

#[test]
fn a_six_letter_token_is_ignored() {
    let (count, solutions) = run(
        "abcdef\nabcde\nfghij\nklmno\npqrst\nvwxyz\n",
        "six_letter",
        3,
    );
    assert_eq!(count, 1);
    assert!(!solutions[0].iter().any(|w| w == "abcdef"));
}

#[test]
fn an_uppercase_token_is_ignored() {
    let (count, _) = run("ABCDE\nfghij\nklmno\npqrst\nvwxyz\n", "uppercase", 2);
    assert_eq!(count, 0);
}

#[test]
fn fewer_than_five_accepted_words_yields_empty_output_and_success() {
    let (count, solutions) = run("abcde\nfghij\nklmno\n", "too_few", 2);
    assert_eq!(count, 0);
    assert!(solutions.is_empty());
}

#[test]
fn a_trailing_word_with_no_newline_is_still_accepted() {
    let (count, _) = run("abcde\nfghij\nklmno\npqrst\nvwxyz", "no_trailing_newline", 2);
    assert_eq!(count, 1);
}

#[test]
fn rerunning_on_the_same_input_yields_the_same_set_of_solutions() {
    let dict = write_dict(
        "idempotent",
        "abcde\nfghij\nklmno\npqrst\nvwxyz\nuvwxy\n",
    );
    let out = temp_path("idempotent_out");
    let config = Config { dictionary: dict.clone(), workers: 4, verbose: false };

    fivewords::run_into(&config, &out).unwrap();
    let first: std::collections::HashSet<String> = std::fs::read_to_string(&out)
        .unwrap()
        .lines()
        .map(|l| {
            let mut words: Vec<&str> = l.split('\t').collect();
            words.sort();
            words.join("\t")
        })
        .collect();

    fivewords::run_into(&config, &out).unwrap();
    let second: std::collections::HashSet<String> = std::fs::read_to_string(&out)
        .unwrap()
        .lines()
        .map(|l| {
            let mut words: Vec<&str> = l.split('\t').collect();
            words.sort();
            words.join("\t")
        })
        .collect();

    assert_eq!(first, second);

    std::fs::remove_file(&dict).ok();
    std::fs::remove_file(&out).ok();
}

#[test]
fn every_solution_record_is_exactly_thirty_bytes() {
    let dict = write_dict(
        "record_width",
        "abcde\nfghij\nklmno\npqrst\nvwxyz\n",
    );
    let out = temp_path("record_width_out");
    let config = Config { dictionary: dict.clone(), workers: 2, verbose: false };
    fivewords::run_into(&config, &out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(bytes.len() % 30, 0);
    assert!(!bytes.is_empty());

    std::fs::remove_file(&dict).ok();
    std::fs::remove_file(&out).ok();
}

#[test]
fn missing_dictionary_file_is_a_typed_io_error() {
    let config = Config {
        dictionary: PathBuf::from("/definitely-missing-for-fivewords-tests.txt"),
        workers: 1,
        verbose: false,
    };
    let out = temp_path("missing_io");
    let err = fivewords::run_into(&config, &out).unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
}

#[test]
fn worker_counts_from_one_to_several_agree_on_the_solution_set() {
    let contents = "abcde\nfghij\nklmno\npqrst\nvwxyz\nuvwxy\n";
    let (_, baseline) = run(contents, "workers_1", 1);
    let mut baseline_set: Vec<Vec<String>> = baseline.iter().map(|s| normalized(s)).collect();
    baseline_set.sort();

    for workers in [2, 4, 8] {
        let (_, solutions) = run(contents, &format!("workers_{workers}"), workers);
        let mut set: Vec<Vec<String>> = solutions.iter().map(|s| normalized(s)).collect();
        set.sort();
        assert_eq!(set, baseline_set, "worker count {workers} disagreed with 1 worker");
    }
}
