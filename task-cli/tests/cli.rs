use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Runs the binary inside the temp dir with a clean environment.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("task-cli").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("TASK_CLI_FILE")
            .env_remove("TASK_CLI_LOG");
        cmd
    }

    fn tasks_json(&self) -> serde_json::Value {
        let contents = std::fs::read_to_string(self.dir.child("tasks.json").path()).unwrap();
        serde_json::from_str(&contents).unwrap()
    }
}

#[test]
fn test_end_to_end_scenario() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["add", "Buy milk"])
        .assert()
        .success()
        .stdout("Task 'Buy milk' added successfully (ID: 1).\n");
    ctx.cmd()
        .args(["update", "1", "--status", "in-progress"])
        .assert()
        .success()
        .stdout("Task '1' updated successfully.\n");
    ctx.cmd()
        .args(["add", "Pay bills"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(ID: 2)"));
    ctx.cmd().args(["delete", "1"]).assert().success();
    ctx.cmd()
        .args(["add", "Clean house"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(ID: 3)"));

    let tasks = ctx.tasks_json();
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["id"], 2);
    assert_eq!(tasks[0]["description"], "Pay bills");
    assert_eq!(tasks[1]["id"], 3);
    assert_eq!(tasks[1]["description"], "Clean house");
    assert_eq!(tasks[1]["status"], "todo");
}

#[test]
fn test_update_keeps_description() {
    let ctx = TestContext::new();
    ctx.cmd().args(["add", "Buy milk"]).assert().success();

    ctx.cmd()
        .args(["update", "1", "--status", "in-progress"])
        .assert()
        .success();

    ctx.cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[1] Buy milk - in-progress"));
}

#[test]
fn test_list_on_fresh_directory() {
    let ctx = TestContext::new();

    ctx.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout("No tasks to display.\n");
    ctx.dir
        .child("tasks.json")
        .assert(predicate::path::missing());
}

#[test]
fn test_list_status_filter() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["add", "Buy milk", "Pay bills", "Clean house"])
        .assert()
        .success();
    ctx.cmd()
        .args(["update", "2", "--status", "done"])
        .assert()
        .success();

    ctx.cmd()
        .args(["list", "--status", "done"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[2] Pay bills - done")
                .and(predicate::str::contains("Buy milk").not())
                .and(predicate::str::contains("Clean house").not()),
        );
}

#[test]
fn test_delete_missing_task_exit_code() {
    let ctx = TestContext::new();
    ctx.cmd().args(["add", "Buy milk"]).assert().success();

    ctx.cmd()
        .args(["delete", "7"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Task with ID 7 not found"));

    assert_eq!(ctx.tasks_json().as_array().unwrap().len(), 1);
}

#[test]
fn test_blank_description_exit_code() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["add", "   "])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("description must not be empty"));
}

#[test]
fn test_update_without_fields_is_usage_error() {
    let ctx = TestContext::new();
    ctx.cmd().args(["add", "Buy milk"]).assert().success();

    ctx.cmd().args(["update", "1"]).assert().failure().code(2);
}

#[test]
fn test_corrupt_file_exit_code() {
    let ctx = TestContext::new();
    ctx.dir.child("tasks.json").write_str("not json").unwrap();

    ctx.cmd()
        .arg("list")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("corrupt"));

    ctx.dir.child("tasks.json").assert("not json");
}

#[test]
fn test_non_utf8_file_exit_code() {
    let ctx = TestContext::new();
    ctx.dir
        .child("tasks.json")
        .write_binary(&[0xff, 0xfe, b'['])
        .unwrap();

    ctx.cmd()
        .arg("list")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("corrupt"));
}

#[test]
fn test_max_id_file_exit_code() {
    let ctx = TestContext::new();
    ctx.dir
        .child("tasks.json")
        .write_str(&format!(
            r#"[{{"id": {}, "description": "Last one", "status": "todo",
                "createdAt": "2024-05-01T12:00:00Z", "updatedAt": "2024-05-01T12:00:00Z"}}]"#,
            u32::MAX
        ))
        .unwrap();

    ctx.cmd()
        .args(["add", "One too many"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("No task IDs left"));

    assert_eq!(ctx.tasks_json().as_array().unwrap().len(), 1);
}

#[test]
fn test_invalid_log_filter_is_reported() {
    let ctx = TestContext::new();

    ctx.cmd()
        .env("TASK_CLI_LOG", "task_cli=loud")
        .arg("list")
        .assert()
        .success()
        .stdout("No tasks to display.\n")
        .stderr(predicate::str::contains(
            "Ignoring invalid log filter 'task_cli=loud'",
        ));
}

#[test]
fn test_unwritable_file_exit_code() {
    let ctx = TestContext::new();
    ctx.dir.child("tasks.json").create_dir_all().unwrap();

    ctx.cmd().args(["add", "Buy milk"]).assert().code(5);
}

#[test]
fn test_file_flag_and_environment() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["add", "From flag", "--file", "flag.json"])
        .assert()
        .success();
    ctx.cmd()
        .env("TASK_CLI_FILE", "env.json")
        .args(["add", "From env"])
        .assert()
        .success();

    ctx.dir
        .child("flag.json")
        .assert(predicate::str::contains("From flag"));
    ctx.dir
        .child("env.json")
        .assert(predicate::str::contains("From env"));
    ctx.dir
        .child("tasks.json")
        .assert(predicate::path::missing());
}

#[test]
fn test_config_file_in_working_directory() {
    let ctx = TestContext::new();
    ctx.dir
        .child("task-cli.toml")
        .write_str("file = \"configured.json\"\n")
        .unwrap();

    ctx.cmd().args(["add", "Buy milk"]).assert().success();

    ctx.dir
        .child("configured.json")
        .assert(predicate::str::contains("Buy milk"));
}

#[test]
fn test_reads_legacy_file() {
    let ctx = TestContext::new();
    ctx.dir
        .child("tasks.json")
        .write_str(
            r#"[
    {
        "id": 3,
        "description": "Water plants",
        "status": "in-progress",
        "createdAt": "2024-05-01T12:34:56.123456",
        "updatedAt": "2024-05-01T12:34:56.123456"
    }
]"#,
        )
        .unwrap();

    ctx.cmd()
        .args(["add", "Buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(ID: 4)"));
    ctx.cmd()
        .args(["list", "--status", "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[3] Water plants - in-progress"));
}
