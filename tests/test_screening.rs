mod common;
use common::{entry_names, read_text, write_file};

use std::fs;

use namefix::{rename_screening_batch, Outcome, ScreeningConfig};

const ADAM: &str = "adam_sandler_snl_001_id002040_1000001100000000000000110000.jpg";
const AYERS: &str = "ayers_rock_text2_001_id004158_0100000000000010100000000010.jpg";
const SPHINX: &str = "sphinx-egypt_001_id001905_0100000000000011000000000000 2.jpg";

#[test]
fn gallery_batch_produces_canonical_names_in_sorted_order() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("screening");
    // Created out of order on purpose; the batch must sort before numbering.
    write_file(&input, SPHINX, "sphinx");
    write_file(&input, ADAM, "adam");
    write_file(&input, AYERS, "ayers");
    let output = tmp.path().join("out").join("images");

    let log = rename_screening_batch(&input, &output, &ScreeningConfig::default()).unwrap();

    assert_eq!(
        entry_names(&output),
        vec![
            "adam-sandler-snl_id000000_10010.jpg",
            "ayers-rock_text_id000001_00000.jpg",
            "sphinx-egypt_id000002_00100.jpg"
        ]
    );
    assert_eq!(
        read_text(&output.join("adam-sandler-snl_id000000_10010.jpg")),
        "adam"
    );
    assert_eq!(
        read_text(&output.join("ayers-rock_text_id000001_00000.jpg")),
        "ayers"
    );
    assert_eq!(
        read_text(&output.join("sphinx-egypt_id000002_00100.jpg")),
        "sphinx"
    );

    // Records come back in sorted-input order even though the copies run on
    // a thread pool.
    let sources: Vec<_> = log
        .records()
        .iter()
        .map(|r| r.source.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(sources, vec![ADAM, AYERS, SPHINX]);

    let s = log.summary();
    assert_eq!(s.renamed, 3);
    assert_eq!(s.anomaly_count(), 0);
}

#[test]
fn unmatched_file_is_logged_and_still_consumes_an_index() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("screening");
    write_file(&input, "IMG_1234.jpg", "raw camera dump");
    write_file(&input, ADAM, "adam");
    let output = tmp.path().join("renamed");

    let log = rename_screening_batch(&input, &output, &ScreeningConfig::default()).unwrap();

    // "IMG_1234.jpg" sorts first, takes index 0, and produces no output;
    // the valid file is numbered 1.
    assert_eq!(entry_names(&output), vec!["adam-sandler-snl_id000001_10010.jpg"]);

    let s = log.summary();
    assert_eq!(s.unmatched, 1);
    assert_eq!(s.renamed, 1);

    let unmatched: Vec<_> = log
        .anomalies()
        .filter(|r| r.outcome == Outcome::Unmatched)
        .collect();
    assert_eq!(unmatched.len(), 1);
    assert!(unmatched[0].source.ends_with("IMG_1234.jpg"));
    assert!(unmatched[0].dest.is_none());
}

#[test]
fn purge_clears_stale_outputs_and_numbers_from_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("screening");
    write_file(&input, ADAM, "adam");
    let output = tmp.path().join("renamed");
    write_file(&output, "stale_id000009_10010.jpg", "old run");

    let log = rename_screening_batch(&input, &output, &ScreeningConfig::default()).unwrap();

    assert_eq!(entry_names(&output), vec!["adam-sandler-snl_id000000_10010.jpg"]);
    assert_eq!(log.summary().renamed, 1);
}

#[test]
fn resume_numbers_after_the_existing_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("screening");
    write_file(&input, ADAM, "adam");
    let output = tmp.path().join("renamed");
    write_file(&output, "previous_batch_a.jpg", "a");
    write_file(&output, "previous_batch_b.jpg", "b");

    let cfg = ScreeningConfig {
        delete_existing: false,
        ..ScreeningConfig::default()
    };
    let log = rename_screening_batch(&input, &output, &cfg).unwrap();

    assert_eq!(
        entry_names(&output),
        vec![
            "adam-sandler-snl_id000002_10010.jpg",
            "previous_batch_a.jpg",
            "previous_batch_b.jpg"
        ]
    );
    assert_eq!(read_text(&output.join("previous_batch_a.jpg")), "a");
    assert_eq!(log.summary().renamed, 1);
}

#[test]
fn existing_canonical_name_is_not_clobbered() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("screening");
    write_file(&input, ADAM, "new capture");
    let output = tmp.path().join("renamed");
    // One existing entry makes the batch start at index 1, which lands the
    // incoming file exactly on the seeded name.
    write_file(&output, "adam-sandler-snl_id000001_10010.jpg", "first capture");

    let cfg = ScreeningConfig {
        delete_existing: false,
        ..ScreeningConfig::default()
    };
    let log = rename_screening_batch(&input, &output, &cfg).unwrap();

    assert_eq!(
        read_text(&output.join("adam-sandler-snl_id000001_10010.jpg")),
        "first capture"
    );
    let s = log.summary();
    assert_eq!(s.skipped, 1);
    assert_eq!(s.anomaly_count(), 0, "a skip is a nominal outcome");
}

#[test]
fn rerun_with_purge_is_deterministic() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("screening");
    write_file(&input, ADAM, "adam");
    write_file(&input, AYERS, "ayers");
    let output = tmp.path().join("renamed");

    let cfg = ScreeningConfig::default();
    rename_screening_batch(&input, &output, &cfg).unwrap();
    let first = entry_names(&output);
    rename_screening_batch(&input, &output, &cfg).unwrap();

    assert_eq!(entry_names(&output), first);
}

#[test]
fn copy_failure_is_logged_and_the_batch_continues() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("screening");
    write_file(&input, ADAM, "adam");
    write_file(&input, AYERS, "ayers");
    let output = tmp.path().join("renamed");
    // A directory squatting on the index-0 canonical name makes that copy
    // fail; the purge removes plain files only, so it survives.
    fs::create_dir_all(output.join("adam-sandler-snl_id000000_10010.jpg")).unwrap();

    let cfg = ScreeningConfig {
        skip_existing: false,
        ..ScreeningConfig::default()
    };
    let log = rename_screening_batch(&input, &output, &cfg).unwrap();

    assert_eq!(
        read_text(&output.join("ayers-rock_text_id000001_00000.jpg")),
        "ayers"
    );

    let s = log.summary();
    assert_eq!(s.failed, 1);
    assert_eq!(s.renamed, 1);

    let failed: Vec<_> = log
        .anomalies()
        .filter(|r| r.outcome == Outcome::CopyFailed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].source.ends_with(ADAM));
    assert!(!failed[0].detail.is_empty(), "the OS cause must be recorded");
}

#[test]
fn non_image_entries_are_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("screening");
    write_file(&input, ADAM, "adam");
    write_file(&input, "notes.txt", "session notes");
    write_file(&input, "thumbs/cache.jpg", "nested, not listed");
    let output = tmp.path().join("renamed");

    let log = rename_screening_batch(&input, &output, &ScreeningConfig::default()).unwrap();

    assert_eq!(entry_names(&output), vec!["adam-sandler-snl_id000000_10010.jpg"]);
    assert_eq!(log.len(), 1);
}
