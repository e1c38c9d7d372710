use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Build a command with config and transcripts confined to a temp dir.
fn saver(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("transcript-saver").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path())
        .arg("--transcripts-dir")
        .arg(tmp.path().join("Transcripts"));
    cmd
}

#[test]
fn test_exit_choice_terminates_with_success() {
    let tmp = TempDir::new().unwrap();

    saver(&tmp)
        .write_stdin("4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Main Menu"))
        .stdout(predicate::str::contains("Thank you for using"));
}

#[test]
fn test_invalid_menu_choice_reprompts() {
    let tmp = TempDir::new().unwrap();

    saver(&tmp)
        .write_stdin("9\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid choice! Please try again."));
}

#[test]
fn test_view_with_no_saved_transcripts() {
    let tmp = TempDir::new().unwrap();

    saver(&tmp)
        .write_stdin("2\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved transcripts found!"));
}

#[test]
fn test_view_lists_and_displays_saved_transcript() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("Transcripts");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("My Video_en.txt"), "THE TRANSCRIPT BODY").unwrap();

    saver(&tmp)
        .write_stdin("2\n1\n\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("My Video_en"))
        .stdout(predicate::str::contains("THE TRANSCRIPT BODY"));
}

#[test]
fn test_save_flow_rejects_invalid_url() {
    let tmp = TempDir::new().unwrap();

    saver(&tmp)
        .write_stdin("1\nhttps://example.com/watch?v=dQw4w9WgXcQ\n\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid YouTube URL"));
}

#[test]
fn test_about_screen() {
    let tmp = TempDir::new().unwrap();

    saver(&tmp)
        .write_stdin("3\n\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("About"))
        .stdout(predicate::str::contains("Extract video transcripts"));
}
