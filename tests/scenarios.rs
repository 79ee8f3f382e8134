use bitlet::commands::porcelain::merge::MergeOutcome;
use bitlet::errors::RepositoryError;
use common::{TestRepository, kind_of, repository};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::PathBuf;

mod common;

#[rstest]
fn reset_restores_an_earlier_version_of_a_file(repository: TestRepository) {
    let c1 = repository.commit_file("f", "x", "c1");
    repository.commit_file("f", "y", "c2");
    assert_eq!(repository.read("f"), "y");

    repository.repository.reset(c1.as_ref()).unwrap();

    assert_eq!(repository.read("f"), "x");
    assert_eq!(repository.repository.refs().read_head().unwrap(), c1);
}

#[rstest]
fn merging_a_descendant_fast_forwards(repository: TestRepository) {
    let repo = &repository.repository;
    repository.commit_file("f", "x", "c1");
    repo.branch("side").unwrap();
    repo.checkout_branch("side").unwrap();
    let side_tip = repository.commit_file("f", "z", "on side");
    repo.checkout_branch("master").unwrap();
    assert_eq!(repository.read("f"), "x");
    let commits_before = repo.history().commits().unwrap().len();
    repository.output.clear();

    let outcome = repo.merge("side").unwrap();

    assert_eq!(outcome, MergeOutcome::FastForward(side_tip.clone()));
    assert_eq!(repo.refs().read_head().unwrap(), side_tip);
    assert_eq!(repository.read("f"), "z");
    assert_eq!(repo.history().commits().unwrap().len(), commits_before);
    assert_eq!(repository.output.contents(), "Current branch fast-forwarded.\n");
}

#[rstest]
fn diverging_edits_of_one_file_conflict(repository: TestRepository) {
    let repo = &repository.repository;
    repository.commit_file("f", "base\n", "base");
    repo.branch("side").unwrap();
    let master_tip = repository.commit_file("f", "m\n", "master edit");
    repo.checkout_branch("side").unwrap();
    let side_tip = repository.commit_file("f", "s\n", "side edit");
    repo.checkout_branch("master").unwrap();
    repository.output.clear();

    let outcome = repo.merge("side").unwrap();

    let MergeOutcome::Merged { commit, conflicted } = outcome else {
        panic!("expected a merge commit, got {:?}", outcome);
    };
    assert!(conflicted);
    assert_eq!(repository.read("f"), "<<<<<<< HEAD\nm\n=======\ns\n>>>>>>>\n");

    let merge_commit = repo.database().parse_object_as_commit(&commit).unwrap();
    assert_eq!(merge_commit.parents(), vec![&master_tip, &side_tip]);
    assert_eq!(merge_commit.message(), "Merged side into master");
    assert_eq!(repository.output.contents(), "Encountered a merge conflict.\n");
}

#[rstest]
fn removing_an_unknown_file_fails(repository: TestRepository) {
    repository.write("stranger.txt", "hello");

    let error = repository.repository.rm("stranger.txt").unwrap_err();

    assert_eq!(
        kind_of(&error),
        Some(&RepositoryError::NothingToRemove(PathBuf::from("stranger.txt")))
    );
    assert!(repository.exists("stranger.txt"));
}

#[rstest]
fn checkout_never_overwrites_an_untracked_file(repository: TestRepository) {
    let repo = &repository.repository;
    repository.commit_file("a.txt", "a", "add a");
    repo.branch("side").unwrap();
    repo.checkout_branch("side").unwrap();
    repository.commit_file("g.txt", "theirs", "add g");
    repo.checkout_branch("master").unwrap();
    assert!(!repository.exists("g.txt"));

    repository.write("g.txt", "mine");
    let error = repo.checkout_branch("side").unwrap_err();

    assert_eq!(
        kind_of(&error),
        Some(&RepositoryError::UntrackedObstruction(PathBuf::from("g.txt")))
    );
    assert_eq!(repository.read("g.txt"), "mine");
    assert_eq!(repository.read("a.txt"), "a");
    assert_eq!(repo.refs().current_branch().unwrap().to_string(), "master");
}
