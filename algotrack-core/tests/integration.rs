//! Integration tests for the tracker over on-disk databases
//!
//! Each test gets its own temporary directory for the database file,
//! export files, and backups.

use algotrack_core::logging;
use algotrack_core::{Error, ExportFormat, Problem, ProblemFilter, Tag, Tracker};
use std::path::PathBuf;
use tempfile::TempDir;

fn open_tracker() -> (TempDir, Tracker) {
    logging::init_test();
    let dir = TempDir::new().expect("failed to create temp dir");
    let tracker = Tracker::open(&dir.path().join("problems.db")).expect("failed to open tracker");
    (dir, tracker)
}

fn names(problems: &[Problem]) -> Vec<&str> {
    problems.iter().map(|p| p.name.as_str()).collect()
}

// ============================================
// Problems and tags
// ============================================

#[test]
fn test_two_sum_scenario() {
    let (_dir, tracker) = open_tracker();

    let created = tracker
        .create_problem(
            &Problem::new("Two Sum", "LeetCode", "Easy").with_tags(["Hash Map", "Array"]),
        )
        .unwrap();
    assert!(created.id > 0);

    let fetched = tracker.get_problem(created.id).unwrap();
    assert_eq!(fetched.tag_names(), vec!["Array", "Hash Map"]);

    let easy = ProblemFilter::default().difficulty("Easy");
    assert_eq!(names(&tracker.list_problems(Some(&easy)).unwrap()), vec!["Two Sum"]);

    let hard = ProblemFilter::default().difficulty("Hard");
    assert!(tracker.list_problems(Some(&hard)).unwrap().is_empty());
}

#[test]
fn test_tag_filter_is_union_without_duplicates() {
    let (_dir, tracker) = open_tracker();

    tracker
        .create_problem(&Problem::new("Only A", "LeetCode", "Easy").with_tags(["A"]))
        .unwrap();
    tracker
        .create_problem(&Problem::new("Only B", "LeetCode", "Medium").with_tags(["B"]))
        .unwrap();
    tracker
        .create_problem(&Problem::new("Both", "LeetCode", "Hard").with_tags(["A", "B"]))
        .unwrap();
    tracker
        .create_problem(&Problem::new("Neither", "LeetCode", "Hard").with_tags(["C"]))
        .unwrap();

    let filter = ProblemFilter::default().tags(["A", "B"]);
    let mut found = names(&tracker.list_problems(Some(&filter)).unwrap())
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    found.sort();
    assert_eq!(found, vec!["Both", "Only A", "Only B"]);
}

#[test]
fn test_update_is_idempotent() {
    let (_dir, tracker) = open_tracker();
    let mut problem = tracker
        .create_problem(&Problem::new("Climbing Stairs", "LeetCode", "Easy").with_tags(["DP"]))
        .unwrap();

    problem.difficulty = "Medium".to_string();
    problem.solve_time = 15;
    problem.tags = vec![Tag::named("Math"), Tag::named("DP")];

    assert_eq!(tracker.update_problem(&problem).unwrap(), 1);
    let first = tracker.get_problem(problem.id).unwrap();
    assert_eq!(tracker.update_problem(&problem).unwrap(), 1);
    let second = tracker.get_problem(problem.id).unwrap();

    assert_eq!(first.difficulty, "Medium");
    assert_eq!(second.difficulty, first.difficulty);
    assert_eq!(second.solve_time, 15);
    assert_eq!(second.tag_names(), first.tag_names());
    assert_eq!(second.tag_names(), vec!["DP", "Math"]);
    assert_eq!(second.created_at, first.created_at);
}

#[test]
fn test_deleting_tag_keeps_problems() {
    let (_dir, tracker) = open_tracker();
    let input = Problem::new("Two Sum", "LeetCode", "Easy")
        .with_tags(["Array", "Hash Map"]);
    let problem = tracker.create_problem(&input).unwrap();

    let array = tracker.find_tag("Array").unwrap().unwrap();
    assert!(tracker.delete_tag(array.id).unwrap());

    let tag_names: Vec<String> = tracker
        .list_tags()
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(tag_names, vec!["Hash Map"]);
    assert_eq!(
        tracker.get_problem(problem.id).unwrap().tag_names(),
        vec!["Hash Map"]
    );
}

#[test]
fn test_deleting_problem_keeps_tags() {
    let (_dir, tracker) = open_tracker();
    let problem = tracker
        .create_problem(&Problem::new("Two Sum", "LeetCode", "Easy").with_tags(["Array"]))
        .unwrap();

    assert!(tracker.delete_problem(problem.id).unwrap());
    assert!(matches!(
        tracker.get_problem(problem.id),
        Err(Error::ProblemNotFound(_))
    ));
    assert_eq!(tracker.list_tags().unwrap().len(), 1);
    assert_eq!(tracker.statistics().unwrap().by_tag["Array"], 0);
}

#[test]
fn test_get_or_create_tag_is_stable() {
    let (_dir, tracker) = open_tracker();
    let first = tracker.get_or_create_tag("Graph").unwrap();
    let second = tracker.get_or_create_tag("Graph").unwrap();
    assert_eq!(first, second);
    assert_eq!(tracker.list_tags().unwrap().len(), 1);
}

// ============================================
// Statistics
// ============================================

#[test]
fn test_statistics_over_mixed_data() {
    let (_dir, tracker) = open_tracker();
    assert_eq!(tracker.statistics().unwrap().average_solve_time, 0.0);

    tracker
        .create_problem(
            &Problem::new("A", "LeetCode", "Easy")
                .with_solve_time(30)
                .with_tags(["Array"]),
        )
        .unwrap();
    tracker
        .create_problem(&Problem::new("B", "Codeforces", "Hard").with_tags(["Array", "Graph"]))
        .unwrap();
    tracker
        .create_problem(&Problem::new("C", "LeetCode", "Easy").with_solve_time(45))
        .unwrap();
    tracker.get_or_create_tag("Unused").unwrap();

    let stats = tracker.statistics().unwrap();
    assert_eq!(stats.total_problems, 3);
    assert_eq!(stats.by_difficulty["Easy"], 2);
    assert_eq!(stats.by_difficulty["Hard"], 1);
    assert_eq!(stats.by_platform["LeetCode"], 2);
    assert_eq!(stats.by_platform["Codeforces"], 1);
    assert_eq!(stats.by_tag["Array"], 2);
    assert_eq!(stats.by_tag["Graph"], 1);
    assert_eq!(stats.by_tag["Unused"], 0);
    assert_eq!(stats.average_solve_time, 37.5);
}

// ============================================
// Interchange
// ============================================

#[test]
fn test_export_import_round_trip() {
    let (dir, tracker) = open_tracker();
    tracker
        .create_problem(
            &Problem::new("Two Sum", "LeetCode", "Easy")
                .with_link("https://leetcode.com/problems/two-sum/")
                .with_solve_time(12)
                .with_notes("hash the complement")
                .with_code_snippet("fn two_sum() {}")
                .with_tags(["Array", "Hash Map"]),
        )
        .unwrap();
    tracker
        .create_problem(&Problem::new("Dijkstra", "Codeforces", "Hard").with_tags(["Graph"]))
        .unwrap();

    let export_path = dir.path().join("export/problems.json");
    std::fs::create_dir_all(export_path.parent().unwrap()).unwrap();
    assert_eq!(tracker.export(ExportFormat::Json, &export_path).unwrap(), 2);

    let other_dir = TempDir::new().unwrap();
    let other = Tracker::open(&other_dir.path().join("copy.db")).unwrap();
    let summary = other.import(ExportFormat::Json, &export_path).unwrap();
    assert_eq!(summary.imported, 2);

    let mut before = tracker.list_problems(None).unwrap();
    let mut after = other.list_problems(None).unwrap();
    before.sort_by(|a, b| a.name.cmp(&b.name));
    after.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.link, b.link);
        assert_eq!(a.platform, b.platform);
        assert_eq!(a.difficulty, b.difficulty);
        assert_eq!(a.solve_time, b.solve_time);
        assert_eq!(a.notes, b.notes);
        assert_eq!(a.code_snippet, b.code_snippet);
        assert_eq!(a.tag_names(), b.tag_names());
        assert_eq!(a.created_at, b.created_at);
    }
}

#[test]
fn test_csv_export_file() {
    let (dir, tracker) = open_tracker();
    tracker
        .create_problem(
            &Problem::new("Two Sum", "LeetCode", "Easy")
                .with_solve_time(12)
                .with_tags(["Array", "Hash Map"]),
        )
        .unwrap();

    let path = dir.path().join("problems.csv");
    tracker.export(ExportFormat::Csv, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[6], "Tags");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "Two Sum");
    assert_eq!(&rows[0][5], "12");
    assert_eq!(&rows[0][6], "Array; Hash Map");
}

// ============================================
// Backup / restore and persistence
// ============================================

#[test]
fn test_backup_then_restore_discards_later_writes() {
    let (dir, mut tracker) = open_tracker();
    tracker
        .create_problem(&Problem::new("Kept", "LeetCode", "Easy"))
        .unwrap();

    let backup_path: PathBuf = dir.path().join("backups/problems.bak");
    assert!(tracker.backup(&backup_path).unwrap() > 0);

    tracker
        .create_problem(&Problem::new("Lost", "LeetCode", "Hard"))
        .unwrap();
    assert_eq!(tracker.list_problems(None).unwrap().len(), 2);

    tracker.restore(&backup_path).unwrap();
    assert_eq!(names(&tracker.list_problems(None).unwrap()), vec!["Kept"]);

    // The restored tracker is fully writable
    tracker
        .create_problem(&Problem::new("After", "LeetCode", "Medium"))
        .unwrap();
    assert_eq!(tracker.list_problems(None).unwrap().len(), 2);
}

#[test]
fn test_data_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/problems.db");

    let tracker = Tracker::open(&path).unwrap();
    let id = tracker
        .create_problem(&Problem::new("Two Sum", "LeetCode", "Easy").with_tags(["Array"]))
        .unwrap()
        .id;
    tracker.close().unwrap();

    let reopened = Tracker::open(&path).unwrap();
    let problem = reopened.get_problem(id).unwrap();
    assert_eq!(problem.name, "Two Sum");
    assert_eq!(problem.tag_names(), vec!["Array"]);
}
