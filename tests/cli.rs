use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use common::command::{bitlet_commit, run_bitlet_command};
use common::repository_dir;
use fake::Fake;
use fake::faker::lorem::en::{Word, Words};
use predicates::prelude::predicate;
use rstest::{fixture, rstest};

mod common;

#[fixture]
fn initialized_dir(repository_dir: TempDir) -> TempDir {
    run_bitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

#[rstest]
fn init_creates_the_metadata_directory(repository_dir: TempDir) {
    run_bitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    assert!(repository_dir.path().join(".bitlet").is_dir());
    assert!(repository_dir.path().join(".bitlet/HEAD").is_file());
    assert!(repository_dir.path().join(".bitlet/refs/heads/master").is_file());
}

#[rstest]
fn init_twice_reports_the_existing_repository(initialized_dir: TempDir) {
    run_bitlet_command(initialized_dir.path(), &["init"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "A bitlet version-control system already exists in the current directory.",
        ));
}

#[rstest]
fn commands_outside_a_repository_fail(repository_dir: TempDir) {
    run_bitlet_command(repository_dir.path(), &["status"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Not in an initialized bitlet directory."));
}

#[rstest]
fn add_commit_and_log(initialized_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = format!("{}.txt", Word().fake::<String>());
    let file_content = Words(5..10).fake::<Vec<String>>().join(" ");
    initialized_dir.child(&file_name).write_str(&file_content)?;
    let message = Words(2..4).fake::<Vec<String>>().join(" ");

    run_bitlet_command(initialized_dir.path(), &["add", &file_name])
        .assert()
        .success();
    bitlet_commit(initialized_dir.path(), &message)
        .assert()
        .success()
        .stdout(predicate::str::is_match(format!(r"^\[master [0-9a-f]{{7}}\] {}\n$", message))?);

    run_bitlet_command(initialized_dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Date: Sun Jan 1 12:00:00 2023 +0000\n{}\n", message)))
        .stdout(predicate::str::contains("initial commit"));

    Ok(())
}

#[rstest]
fn commit_without_a_message_fails(initialized_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    initialized_dir.child("f.txt").write_str("content")?;
    run_bitlet_command(initialized_dir.path(), &["add", "f.txt"])
        .assert()
        .success();

    run_bitlet_command(initialized_dir.path(), &["commit"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Please enter a commit message."));

    Ok(())
}

#[rstest]
fn rm_of_an_unknown_file_explains_itself(initialized_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    initialized_dir.child("loose.txt").write_str("content")?;

    run_bitlet_command(initialized_dir.path(), &["rm", "loose.txt"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No reason to remove the file."));

    Ok(())
}

#[rstest]
fn status_lists_branches_and_untracked_files(initialized_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    initialized_dir.child("loose.txt").write_str("content")?;
    run_bitlet_command(initialized_dir.path(), &["branch", "side"])
        .assert()
        .success();

    run_bitlet_command(initialized_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("=== Branches ===\n*master\nside\n\n"))
        .stdout(predicate::str::contains("=== Untracked Files ===\nloose.txt\n"));

    Ok(())
}

#[rstest]
fn checkout_forms(initialized_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = initialized_dir.path();
    initialized_dir.child("f.txt").write_str("first")?;
    run_bitlet_command(dir, &["add", "f.txt"]).assert().success();
    bitlet_commit(dir, "first").assert().success();
    initialized_dir.child("f.txt").write_str("second")?;
    run_bitlet_command(dir, &["add", "f.txt"]).assert().success();
    bitlet_commit(dir, "second").assert().success();

    let found = run_bitlet_command(dir, &["find", "first"]).output()?;
    let first_id = String::from_utf8(found.stdout)?.trim().to_string();

    initialized_dir.child("f.txt").write_str("scribbles")?;
    run_bitlet_command(dir, &["checkout", "--", "f.txt"]).assert().success();
    assert_eq!(std::fs::read_to_string(dir.join("f.txt"))?, "second");

    run_bitlet_command(dir, &["checkout", &first_id[..8], "--", "f.txt"])
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(dir.join("f.txt"))?, "first");

    run_bitlet_command(dir, &["checkout", "nowhere"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("A branch with that name does not exist."));

    Ok(())
}

#[rstest]
fn merge_reports_conflicts(initialized_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = initialized_dir.path();
    initialized_dir.child("f.txt").write_str("base\n")?;
    run_bitlet_command(dir, &["add", "f.txt"]).assert().success();
    bitlet_commit(dir, "base").assert().success();
    run_bitlet_command(dir, &["branch", "side"]).assert().success();

    initialized_dir.child("f.txt").write_str("m\n")?;
    run_bitlet_command(dir, &["add", "f.txt"]).assert().success();
    bitlet_commit(dir, "master edit").assert().success();

    run_bitlet_command(dir, &["checkout", "side"]).assert().success();
    initialized_dir.child("f.txt").write_str("s\n")?;
    run_bitlet_command(dir, &["add", "f.txt"]).assert().success();
    bitlet_commit(dir, "side edit").assert().success();
    run_bitlet_command(dir, &["checkout", "master"]).assert().success();

    run_bitlet_command(dir, &["merge", "side"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");
    assert_eq!(
        std::fs::read_to_string(dir.join("f.txt"))?,
        "<<<<<<< HEAD\nm\n=======\ns\n>>>>>>>\n"
    );

    run_bitlet_command(dir, &["merge", "master"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Cannot merge a branch with itself."));

    run_bitlet_command(dir, &["global-log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged side into master"))
        .stdout(predicate::str::is_match(r"Merge: [0-9a-f]{7} [0-9a-f]{7}\n")?);

    Ok(())
}
