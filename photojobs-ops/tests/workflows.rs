//! End-to-end workflow runs against temp directories with fake collaborators.

use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

use photojobs_core::{BatchId, BatchSuffixes, GroupBy, Table};
use photojobs_ops::workflow::{csvgen, keywords, rename, scale, teams, verify};
use photojobs_ops::{ItemOutcome, MetadataTagger, OpsError, Preconfigured, Resampler};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Stores keywords inside the file itself so they survive copies.
struct InlineTagger;

const MARKER: &str = "\n#kw:";

impl MetadataTagger for InlineTagger {
    fn apply_keywords(&self, path: &Path, keywords: &[String]) -> Result<(), OpsError> {
        let body = fs::read_to_string(path).unwrap();
        let body = body.split(MARKER).next().unwrap().to_string();
        fs::write(path, format!("{body}{MARKER}{}", keywords.join("|"))).unwrap();
        Ok(())
    }

    fn read_keywords(&self, path: &Path) -> Result<Vec<String>, OpsError> {
        let body = fs::read_to_string(path).unwrap();
        Ok(body
            .split(MARKER)
            .nth(1)
            .map(|kw| kw.split('|').map(str::to_string).collect())
            .unwrap_or_default())
    }
}

/// Accepts the write but loses the keywords.
struct ForgetfulTagger;

impl MetadataTagger for ForgetfulTagger {
    fn apply_keywords(&self, _: &Path, _: &[String]) -> Result<(), OpsError> {
        Ok(())
    }

    fn read_keywords(&self, _: &Path) -> Result<Vec<String>, OpsError> {
        Ok(Vec::new())
    }
}

struct CopyResampler;

impl Resampler for CopyResampler {
    fn resize(&self, source: &Path, destination: &Path, target: u32) -> Result<(u32, u32), OpsError> {
        fs::copy(source, destination).unwrap();
        Ok((target, target / 2))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const ROSTER: &str = "\u{feff}Last Name,First Name,Team,School,Check-In Date,Photo Filenames\n\
Allen,Brielle,Falcons,PHS,2025-09-01,\"JS106537.jpg, JS106538.jpg\"\n\
Baker,Cody,,PHS,2025-09-01,JS206540.jpg\n\
Cole,Dana,Hawks,PHS,2025-09-01,\n";

/// Write `contents` at `rel` under `temp`, creating parents.
fn put(temp: &TempDir, rel: &str, contents: &str) {
    let path = temp.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn shoot(temp: &TempDir, files: &[&str]) -> PathBuf {
    let root = temp.child("shoot");
    root.create_dir_all().unwrap();
    for rel in files {
        put(temp, &format!("shoot/{rel}"), &format!("image {rel}"));
    }
    root.path().to_path_buf()
}

fn csvgen_into(temp: &TempDir) -> csvgen::CsvgenReport {
    let roster = temp.child("roster.csv");
    roster.write_str(ROSTER).unwrap();
    csvgen::run(&csvgen::CsvgenOptions {
        csv: roster.path().to_path_buf(),
        job_name: "job".into(),
        team_field: "Team".into(),
        out_dir: Some(temp.child("tables").path().to_path_buf()),
        batch_suffixes: BatchSuffixes::new(),
    })
    .unwrap()
}

// ---------------------------------------------------------------------------
// csvgen
// ---------------------------------------------------------------------------

#[test]
fn csvgen_writes_three_tables_and_a_plan() {
    let temp = TempDir::new().unwrap();
    let report = csvgen_into(&temp);

    assert_eq!(report.rows, 3);
    assert_eq!(report.records, 6);
    // Dana Cole has no photos.
    assert_eq!(report.summary.errored, 1);
    for name in csvgen::output_names("job") {
        temp.child("tables").child(name).assert(predicate::path::is_file());
    }

    let all = Table::read(temp.child("tables/job DATA-ALL.csv").path()).unwrap();
    assert_eq!(all.rows.len(), 6);
    assert_eq!(all.headers[0], "SPA");
    assert!(all.headers.contains(&"School".to_string()));
    assert!(!all.headers.contains(&"Check-In Date".to_string()));
    let spas: Vec<&str> = all.rows.iter().map(|r| r[0].as_str()).collect();
    let mut sorted = spas.clone();
    sorted.sort();
    assert_eq!(spas, sorted);

    temp.child("tables/job DATA-RENAME.txt").assert(
        "JS106537.jpg\tAllen_Brielle_Falcons_6537\n\
         JS106538.jpg\tAllen_Brielle_Falcons_6538\n\
         JS206540.jpg\tBaker_Cody_6540\n",
    );
}

#[test]
fn csvgen_applies_batch_suffixes() {
    let temp = TempDir::new().unwrap();
    let roster = temp.child("roster.csv");
    roster.write_str(ROSTER).unwrap();
    let mut suffixes = BatchSuffixes::new();
    suffixes.insert(BatchId::from("JS20"), "_ind".into());

    csvgen::run(&csvgen::CsvgenOptions {
        csv: roster.path().to_path_buf(),
        job_name: "job".into(),
        team_field: "Team".into(),
        out_dir: None,
        batch_suffixes: suffixes,
    })
    .unwrap();

    temp.child("job DATA-JPG.csv")
        .assert(predicate::str::contains("Baker_Cody_6540_ind.jpg"));
}

#[test]
fn csvgen_requires_photo_column() {
    let temp = TempDir::new().unwrap();
    let roster = temp.child("roster.csv");
    roster.write_str("Last Name,First Name\nAllen,Brielle\n").unwrap();
    let err = csvgen::run(&csvgen::CsvgenOptions {
        csv: roster.path().to_path_buf(),
        job_name: "job".into(),
        team_field: "Team".into(),
        out_dir: None,
        batch_suffixes: BatchSuffixes::new(),
    })
    .unwrap_err();
    assert!(err.to_string().contains("Photo Filenames"));
}

// ---------------------------------------------------------------------------
// rename
// ---------------------------------------------------------------------------

#[test]
fn rename_takes_extension_from_resolved_file() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["JS106537.png", "sub/JS106538_2.jpg"]);
    let plan = temp.child("plan.txt");
    plan.write_str(
        "JS106537.jpg\tAllen_Brielle_6537\n\
         JS106537.jpg\tAllen_Brielle_6537_copy\n\
         JS106538.jpg\tAllen_Brielle_6538\n\
         JS999999.jpg\tNobody_9999\n",
    )
    .unwrap();

    let report = rename::run(&rename::RenameOptions {
        root: root.clone(),
        plan: plan.path().to_path_buf(),
        mode: rename::TransferMode::Copy,
        out_dir: None,
    })
    .unwrap();

    let out = temp.child("shoot_renamed");
    out.child("Allen_Brielle_6537.png").assert("image JS106537.png");
    out.child("Allen_Brielle_6537_copy.png").assert(predicate::path::is_file());
    out.child("Allen_Brielle_6538.jpg").assert(predicate::path::is_file());
    assert_eq!(report.sources, 3);
    assert_eq!(report.summary.succeeded, 3);
    assert_eq!(report.summary.missing, 1);
    // Copy mode leaves the sources in place.
    assert!(root.join("JS106537.png").is_file());
}

#[test]
fn rename_move_mode_moves_only_the_last_destination() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["JS106537.jpg"]);
    let plan = temp.child("plan.csv");
    plan.write_str(
        "PHOTO,NEWFILENAME\n\
         JS106537.jpg,A_6537.jpg\n\
         JS106537.jpg,B_6537.jpg\n",
    )
    .unwrap();

    let report = rename::run(&rename::RenameOptions {
        root: root.clone(),
        plan: plan.path().to_path_buf(),
        mode: rename::TransferMode::Move,
        out_dir: None,
    })
    .unwrap();

    assert_eq!(report.summary.succeeded, 2);
    let out = temp.child("shoot_renamed");
    out.child("A_6537.jpg").assert(predicate::path::is_file());
    out.child("B_6537.jpg").assert("image JS106537.jpg");
    assert!(!root.join("JS106537.jpg").exists());
}

#[test]
fn rename_missing_root_is_structural() {
    let temp = TempDir::new().unwrap();
    let plan = temp.child("plan.txt");
    plan.write_str("a.jpg\tb\n").unwrap();
    let result = rename::run(&rename::RenameOptions {
        root: temp.child("nope").path().to_path_buf(),
        plan: plan.path().to_path_buf(),
        mode: rename::TransferMode::Copy,
        out_dir: None,
    });
    assert!(result.is_err());
    temp.child("nope_renamed").assert(predicate::path::missing());
}

// ---------------------------------------------------------------------------
// teams
// ---------------------------------------------------------------------------

fn teams_opts(temp: &TempDir, root: &Path) -> teams::TeamsOptions {
    teams::TeamsOptions {
        csv: temp.child("tables/job DATA-ALL.csv").path().to_path_buf(),
        root: root.to_path_buf(),
        team_field: "TEAMNAME".into(),
        out_dir: None,
        group_by: GroupBy::Person,
    }
}

#[test]
fn teams_copies_first_photo_per_person_into_team_folders() {
    let temp = TempDir::new().unwrap();
    csvgen_into(&temp);
    let root = shoot(&temp, &["JS106538.jpg", "JS106537.jpg", "JS206540.jpg"]);

    let mut answers = Preconfigured {
        batches: Some(vec![BatchId::from("all")]),
        default_team: Some("Unassigned".into()),
    };
    let report = teams::run(&teams_opts(&temp, &root), &mut answers).unwrap();

    let out = temp.child("shoot_TeamIndSorted");
    out.child("Falcons/JS106537.jpg").assert(predicate::path::is_file());
    out.child("Falcons/JS106538.jpg").assert(predicate::path::missing());
    out.child("Unassigned/JS206540.jpg").assert(predicate::path::is_file());
    assert_eq!(report.defaulted, vec!["Cody Baker".to_string()]);
    assert_eq!(report.team_counts.get("Falcons"), Some(&1));
    assert_eq!(report.batches_kept.as_ref().map(Vec::len), Some(2));
    assert!(report.summary.is_clean());
}

#[test]
fn teams_batch_selection_filters_people() {
    let temp = TempDir::new().unwrap();
    csvgen_into(&temp);
    let root = shoot(&temp, &["JS106537.jpg", "JS206540.jpg"]);

    let mut answers = Preconfigured {
        batches: Some(vec![BatchId::from("JS10")]),
        default_team: None,
    };
    let report = teams::run(&teams_opts(&temp, &root), &mut answers).unwrap();

    assert_eq!(report.summary.succeeded, 1);
    assert!(report.defaulted.is_empty());
    temp.child("shoot_TeamIndSorted/Falcons/JS106537.jpg")
        .assert(predicate::path::is_file());
}

#[test]
fn teams_without_default_team_answer_fails_before_copying() {
    let temp = TempDir::new().unwrap();
    csvgen_into(&temp);
    let root = shoot(&temp, &["JS106537.jpg", "JS206540.jpg"]);

    let mut answers = Preconfigured {
        batches: Some(vec![BatchId::from("all")]),
        default_team: None,
    };
    let err = teams::run(&teams_opts(&temp, &root), &mut answers).unwrap_err();

    assert!(matches!(err, OpsError::Unanswered { .. }));
    temp.child("shoot_TeamIndSorted").assert(predicate::path::missing());
}

#[test]
fn teams_reports_people_without_photos() {
    let temp = TempDir::new().unwrap();
    csvgen_into(&temp);
    let root = shoot(&temp, &["JS106537.jpg"]);

    let mut answers = Preconfigured {
        batches: Some(vec![BatchId::from("all")]),
        default_team: Some("Unassigned".into()),
    };
    let report = teams::run(&teams_opts(&temp, &root), &mut answers).unwrap();

    assert_eq!(report.without_photos, vec!["Cody Baker".to_string()]);
    assert_eq!(report.summary.missing, 1);
}

#[test]
fn teams_same_file_name_from_two_folders_keeps_both_copies() {
    let temp = TempDir::new().unwrap();
    let root = temp.child("shoot");
    put(&temp, "shoot/a/IMG_1111.jpg", "allen-img");
    put(&temp, "shoot/b/IMG_1111.jpg", "baker-img");
    let table = temp.child("derived.csv");
    table
        .write_str(
            "SPA,LASTNAME,FIRSTNAME,TEAMNAME,FILENUMBER,PHOTO\n\
             Allen_Brielle_1111.jpg,Allen,Brielle,Falcons,1111,a/IMG_1111.jpg\n\
             Baker_Cody_1111.jpg,Baker,Cody,Falcons,1111,b/IMG_1111.jpg\n",
        )
        .unwrap();

    let mut opts = teams_opts(&temp, root.path());
    opts.csv = table.path().to_path_buf();
    let report = teams::run(&opts, &mut Preconfigured::default()).unwrap();

    let falcons = temp.child("shoot_TeamIndSorted/Falcons");
    falcons.child("IMG_1111.jpg").assert("allen-img");
    falcons.child("Baker_Cody_1111.jpg").assert("baker-img");
    assert_eq!(report.summary.succeeded, 2);
    assert_eq!(report.team_counts.get("Falcons"), Some(&2));
}

#[test]
fn teams_dot_team_name_never_leaves_the_output_folder() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["JS106537.jpg"]);
    let table = temp.child("derived.csv");
    table
        .write_str(
            "SPA,LASTNAME,FIRSTNAME,TEAMNAME,FILENUMBER,PHOTO\n\
             Allen_Brielle_6537.jpg,Allen,Brielle,..,6537,JS106537.jpg\n",
        )
        .unwrap();

    let mut opts = teams_opts(&temp, &root);
    opts.csv = table.path().to_path_buf();
    let report = teams::run(&opts, &mut Preconfigured::default()).unwrap();

    assert_eq!(report.summary.errored, 1);
    assert!(report.summary.failures[0].contains("not a usable folder name"));
    temp.child("JS106537.jpg").assert(predicate::path::missing());
    temp.child("shoot_TeamIndSorted/JS106537.jpg")
        .assert(predicate::path::missing());
}

// ---------------------------------------------------------------------------
// keywords + verify
// ---------------------------------------------------------------------------

fn keyword_opts(temp: &TempDir, root: &Path, csv: &Path) -> keywords::KeywordOptions {
    keywords::KeywordOptions {
        csv: csv.to_path_buf(),
        root: root.to_path_buf(),
        manual: Some("Senior Night".into()),
        out_dir: None,
        temp_dir: Some(temp.child("scratch").path().to_path_buf()),
    }
}

#[test]
fn keywords_tag_mirror_and_log() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["day1/JS106537.jpg", "Allen_Brielle_6538_1.jpg"]);
    let roster = temp.child("roster.csv");
    roster.write_str(ROSTER).unwrap();

    let report = keywords::run(&keyword_opts(&temp, &root, roster.path()), &InlineTagger).unwrap();

    let out = temp.child("shoot_keywords");
    out.child("day1/JS106537.jpg")
        .assert(predicate::str::contains("Brielle Allen|Senior Night"));
    out.child("Allen_Brielle_6538_1.jpg")
        .assert(predicate::path::is_file());
    assert_eq!(report.files_updated, 2);
    assert_eq!(report.rows_with_success, 1);
    // Cody's photo is absent; Dana has no references.
    assert_eq!(report.summary.missing, 1);
    assert_eq!(report.summary.errored, 1);
    out.child(keywords::FAILURES_LOG)
        .assert(predicate::str::contains("JS206540.jpg"));
}

#[test]
fn keywords_that_do_not_stick_are_failures() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["JS106537.jpg"]);
    let csv = temp.child("legacy.csv");
    csv.write_str("SPA,FIRSTNMAE,LASTNAME\nJS106537.jpg,Brielle,Allen\n")
        .unwrap();

    let report = keywords::run(&keyword_opts(&temp, &root, csv.path()), &ForgetfulTagger).unwrap();

    assert_eq!(report.summary.errored, 1);
    assert!(report.summary.failures[0].contains("not present after write"));
    temp.child("shoot_keywords/JS106537.jpg")
        .assert(predicate::path::missing());
}

#[test]
fn keywords_unparseable_photo_list_fails_the_row() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["JS106537.jpg"]);
    let csv = temp.child("mixed.csv");
    csv.write_str(
        "SPA,First Name,Last Name,Photo Filenames\n\
         JS106537.jpg,Brielle,Allen,\", ;\"\n",
    )
    .unwrap();

    let report = keywords::run(&keyword_opts(&temp, &root, csv.path()), &InlineTagger).unwrap();

    assert_eq!(report.summary.errored, 1);
    assert!(report.summary.failures[0].starts_with("failed: row 2:"));
    assert!(report.summary.failures[0].contains("empty after parsing"));
    temp.child("shoot_keywords/JS106537.jpg")
        .assert(predicate::path::missing());
}

#[test]
fn keywords_needs_a_reference_column() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["JS106537.jpg"]);
    let csv = temp.child("bad.csv");
    csv.write_str("Name\nBrielle Allen\n").unwrap();
    assert!(keywords::run(&keyword_opts(&temp, &root, csv.path()), &InlineTagger).is_err());
}

#[test]
fn verify_flags_missing_and_untagged_outputs() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["JS106537.jpg", "JS106538.jpg", "JS106539.jpg"]);
    put(&temp, "shoot_keywords/JS106537.jpg", &format!("x{MARKER}Brielle Allen"));
    put(&temp, "shoot_keywords/JS106538.jpg", "x");

    let report = verify::run(
        &verify::VerifyOptions {
            root,
            out_dir: None,
        },
        &InlineTagger,
    )
    .unwrap();

    assert_eq!(report.checked, 3);
    assert_eq!(report.summary.succeeded, 1);
    assert_eq!(report.summary.errored, 1);
    assert_eq!(report.summary.missing, 1);
    assert!(matches!(report.items[0], ItemOutcome::Verified { .. }));
}

// ---------------------------------------------------------------------------
// scale
// ---------------------------------------------------------------------------

#[test]
fn scale_processes_images_and_skips_existing_outputs() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["a.JPG", "b.png", "c.jpeg", "notes.txt", "sub/d.jpg"]);
    put(&temp, "shoot_2000/b.png", "old");

    let report = scale::run(
        &scale::ScaleOptions {
            root,
            size: 2000,
            out_dir: None,
        },
        &CopyResampler,
    )
    .unwrap();

    assert_eq!(report.images, 3);
    assert_eq!(report.summary.succeeded, 2);
    assert_eq!(report.summary.skipped, 1);
    temp.child("shoot_2000/b.png").assert("old");
    temp.child("shoot_2000/a.JPG").assert(predicate::path::is_file());
    temp.child("shoot_2000/d.jpg").assert(predicate::path::missing());
}

#[test]
fn scale_rejects_zero_size() {
    let temp = TempDir::new().unwrap();
    let root = shoot(&temp, &["a.jpg"]);
    let result = scale::run(
        &scale::ScaleOptions {
            root,
            size: 0,
            out_dir: None,
        },
        &CopyResampler,
    );
    assert!(matches!(result, Err(OpsError::InvalidArgument(_))));
}
