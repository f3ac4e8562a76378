//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A scratch directory with a config pointing at an unreachable API, so
/// every quiz falls back to local questions.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("test-config.toml"),
            r#"
api_base_url = "http://127.0.0.1:9"
request_timeout_secs = 1
resolution_delay_ms = 0
"#,
        )
        .unwrap();
        Self { dir }
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn trivia(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("trivia").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env_remove("TRIVIA_API_URL")
            .env_remove("TRIVIA_DATA_DIR")
            .arg("--config")
            .arg(self.dir.path().join("test-config.toml"))
            .arg("--data-dir")
            .arg(self.data_dir());
        cmd
    }
}

#[test]
fn categories_lists_known_ids() {
    Sandbox::new()
        .trivia()
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Science: Computers"))
        .stdout(predicate::str::contains("32"));
}

#[test]
fn stats_on_empty_store() {
    Sandbox::new()
        .trivia()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quizzes played:     0"))
        .stdout(predicate::str::contains("Favorite category:  None"));
}

#[test]
fn init_with_samples_seeds_history() {
    let sandbox = Sandbox::new();

    sandbox
        .trivia()
        .arg("init")
        .arg("--with-samples")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created trivia.toml"))
        .stdout(predicate::str::contains("Added 3 sample quiz results"));
    assert!(sandbox.dir.path().join("trivia.toml").exists());

    sandbox
        .trivia()
        .arg("init")
        .arg("--with-samples")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("History is not empty"));

    sandbox
        .trivia()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Geography"))
        .stdout(predicate::str::contains("5/5"));

    sandbox
        .trivia()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quizzes played:     3"))
        .stdout(predicate::str::contains("Average accuracy:   80%"));
}

#[test]
fn play_falls_back_offline_and_records_result() {
    let sandbox = Sandbox::new();

    sandbox
        .trivia()
        .arg("play")
        .arg("--amount")
        .arg("1")
        .write_stdin("s\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/1"))
        .stdout(predicate::str::contains("Skipped! Answer:"))
        .stdout(predicate::str::contains("Quiz Complete!"));

    sandbox
        .trivia()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("0/1"))
        .stdout(predicate::str::contains("Mixed"));
}

#[test]
fn play_quit_saves_nothing() {
    let sandbox = Sandbox::new();

    sandbox
        .trivia()
        .arg("play")
        .arg("--amount")
        .arg("2")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz abandoned"));

    sandbox
        .trivia()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No quizzes played yet"));
}

#[test]
fn play_rejects_unknown_category() {
    Sandbox::new()
        .trivia()
        .arg("play")
        .arg("--category")
        .arg("99")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}

#[test]
fn custom_question_lifecycle() {
    let sandbox = Sandbox::new();

    sandbox
        .trivia()
        .args(["questions", "add", "--question", "What is 6 x 7?"])
        .args(["--correct", "42", "--wrong", "36", "--wrong", "48", "--wrong", "49"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added custom question"));

    sandbox
        .trivia()
        .args(["questions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("What is 6 x 7?"))
        .stdout(predicate::str::contains("Custom"));

    let export_path = sandbox.dir.path().join("export.json");
    sandbox
        .trivia()
        .arg("export")
        .arg("--output")
        .arg(&export_path)
        .assert()
        .success();
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    let id = exported["CUSTOM_QUESTIONS"][0]["id"].as_str().unwrap().to_string();

    sandbox
        .trivia()
        .args(["questions", "delete", &id])
        .assert()
        .success();

    sandbox
        .trivia()
        .args(["questions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No custom questions"));
}

#[test]
fn add_question_requires_three_wrong_answers() {
    Sandbox::new()
        .trivia()
        .args(["questions", "add", "--question", "Q?", "--correct", "A"])
        .args(["--wrong", "B"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly 3"));
}

#[test]
fn profile_update_and_show() {
    let sandbox = Sandbox::new();

    sandbox
        .trivia()
        .args(["profile", "--name", "Ada", "--default-category", "18"])
        .args(["--default-difficulty", "hard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile updated"))
        .stdout(predicate::str::contains("Ada"))
        .stdout(predicate::str::contains("Science: Computers"));

    sandbox
        .trivia()
        .arg("profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("🧠 Ada"))
        .stdout(predicate::str::contains("hard"));
}

#[test]
fn export_import_between_data_dirs() {
    let source = Sandbox::new();
    source.trivia().args(["init", "--with-samples"]).assert().success();
    source
        .trivia()
        .args(["profile", "--name", "Grace"])
        .assert()
        .success();

    let export_path = source.dir.path().join("backup.json");
    source
        .trivia()
        .arg("export")
        .arg("--output")
        .arg(&export_path)
        .assert()
        .success();

    let target = Sandbox::new();
    target
        .trivia()
        .arg("import")
        .arg("--input")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 of 6 entries"));

    target
        .trivia()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Science"));
    target
        .trivia()
        .arg("profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("Grace"));
}

#[test]
fn import_rejects_malformed_file() {
    let sandbox = Sandbox::new();
    let path = sandbox.dir.path().join("bad.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    sandbox
        .trivia()
        .arg("import")
        .arg("--input")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a trivia export"));
}

#[test]
fn clear_requires_confirmation() {
    let sandbox = Sandbox::new();
    sandbox.trivia().args(["init", "--with-samples"]).assert().success();

    sandbox
        .trivia()
        .arg("clear")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    sandbox
        .trivia()
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All data cleared"));

    sandbox
        .trivia()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No quizzes played yet"));
}

#[test]
fn help_output() {
    Sandbox::new()
        .trivia()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Terminal trivia quiz"));
}
