//! Integration tests for the wf CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCRIPT: &str = r#"{
    "start": "Bedroom",
    "intro": {"output": "Bedroom<br>The room is a mess.<br>&gt;"},
    "rooms": {
        "Bedroom": {"text": "Bedroom\nThe room is a mess.\n>"},
        "Front Porch": {"text": "Front Porch\n>"}
    },
    "responses": {
        "south": {"output": {"text": "Front Porch\nA bulldozer approaches.\n>"}, "go": "Front Porch"},
        "hint": {"output": {"message": "[Hints are available.]"}}
    },
    "hints": [
        {"question": "How do I get up?", "answers": ["Try standing.", "Type STAND."], "section": "Bedroom"}
    ]
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("story.json"), SCRIPT).unwrap();
        Self { dir }
    }

    fn script(&self) -> PathBuf {
        self.dir.path().join("story.json")
    }

    fn store(&self) -> PathBuf {
        self.dir.path().join("saves").join("slots.json")
    }

    fn play(&self, stdin: &str) -> assert_cmd::assert::Assert {
        wf().arg("play")
            .arg(self.script())
            .arg("--store")
            .arg(self.store())
            .write_stdin(stdin)
            .assert()
    }

    fn slots(&self) -> Command {
        let mut cmd = wf();
        cmd.arg("slots").arg("--store").arg(self.store());
        cmd
    }
}

fn wf() -> Command {
    let mut cmd = Command::cargo_bin("wf").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_shows_intro_and_turn_output() {
    let fx = Fixture::new();
    fx.play("south\n:quit\n")
        .success()
        .stdout(predicate::str::contains("The room is a mess."))
        .stdout(predicate::str::contains("> south"))
        .stdout(predicate::str::contains("A bulldozer approaches."));
}

#[test]
fn play_never_prints_bare_prompt_lines() {
    let fx = Fixture::new();
    let output = fx.play("south\n").success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    for line in stdout.lines() {
        // Story output follows the CLI's own "> " input prompts on the same line.
        let content = line.trim_start_matches("> ").trim();
        assert_ne!(content, ">", "bare prompt in {line:?}");
        assert_ne!(content, "&gt;", "bare prompt in {line:?}");
    }
}

#[test]
fn play_reports_nothing_to_undo() {
    let fx = Fixture::new();
    fx.play(":undo\n")
        .success()
        .stdout(predicate::str::contains("[Nothing to undo]"));
}

#[test]
fn play_undo_after_move() {
    let fx = Fixture::new();
    fx.play("south\n:undo\n:redo\n")
        .success()
        .stdout(predicate::str::contains("[UNDO]"))
        .stdout(predicate::str::contains("[REDO]"));
}

#[test]
fn play_save_then_load() {
    let fx = Fixture::new();
    fx.play("south\n:save porch\n:load porch\n")
        .success()
        .stdout(predicate::str::contains("[Game saved to slot: porch]"))
        .stdout(predicate::str::contains("[Game loaded from slot: porch]"));
    assert!(fx.store().exists());
}

#[test]
fn play_load_missing_slot_fails_softly() {
    let fx = Fixture::new();
    fx.play(":load nowhere\n")
        .success()
        .stdout(predicate::str::contains("[Load failed]"));
}

#[test]
fn play_hint_lists_and_reveals() {
    let fx = Fixture::new();
    fx.play("hint\n:hint 1\n")
        .success()
        .stdout(predicate::str::contains("[Hints are available.]"))
        .stdout(predicate::str::contains("1. How do I get up?"))
        .stdout(predicate::str::contains("1/2: Try standing."))
        .stdout(predicate::str::contains("Next hint in 5s"));
}

#[test]
fn play_hint_requires_open_list() {
    let fx = Fixture::new();
    fx.play(":hint 1\n")
        .success()
        .stdout(predicate::str::contains("Open the hint list with :hints first."));
}

#[test]
fn play_hint_selection_waits_for_back() {
    let fx = Fixture::new();
    fx.play(":hints\n:hint 1\n:hint 1\n:back\n:hint 1\n")
        .success()
        .stdout(predicate::str::contains("Go back to the list with :back first."))
        .stdout(predicate::str::contains("1/2: Try standing.").count(2));
}

#[test]
fn play_unknown_meta_command() {
    let fx = Fixture::new();
    fx.play(":dance\n")
        .success()
        .stdout(predicate::str::contains("unknown command ':dance'"));
}

#[test]
fn play_missing_script_fails() {
    let dir = TempDir::new().unwrap();
    wf().arg("play")
        .arg(dir.path().join("missing.json"))
        .arg("--store")
        .arg(dir.path().join("slots.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to start engine"));
}

#[test]
fn play_malformed_script_fails() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("broken.json");
    fs::write(&script, "{ not json").unwrap();
    wf().arg("play")
        .arg(&script)
        .arg("--store")
        .arg(dir.path().join("slots.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to start engine"));
}

#[test]
fn play_rejects_zero_history_capacity() {
    let fx = Fixture::new();
    wf().arg("play")
        .arg(fx.script())
        .arg("--store")
        .arg(fx.store())
        .arg("--history-capacity")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("history capacity"));
}

#[test]
fn play_accepts_huge_history_capacity() {
    let fx = Fixture::new();
    wf().arg("play")
        .arg(fx.script())
        .arg("--store")
        .arg(fx.store())
        .arg("--history-capacity")
        .arg(usize::MAX.to_string())
        .write_stdin("south\n:history\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1  south"));
}

#[test]
fn play_sets_aside_unreadable_store() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.store().parent().unwrap()).unwrap();
    fs::write(fx.store(), "{ not json").unwrap();
    fx.play(":save fresh\n")
        .success()
        .stdout(predicate::str::contains("[Save file unreadable, moved to"))
        .stdout(predicate::str::contains("[Game saved to slot: fresh]"));

    let aside = fx.store().with_file_name("slots.json.corrupt");
    assert_eq!(fs::read_to_string(aside).unwrap(), "{ not json");
    fx.slots()
        .assert()
        .success()
        .stdout(predicate::str::contains("fresh"));
}

// ---------------------------------------------------------------------------
// slots
// ---------------------------------------------------------------------------

#[test]
fn slots_empty() {
    let fx = Fixture::new();
    fx.slots()
        .assert()
        .success()
        .stdout(predicate::str::contains("No save slots."));
}

#[test]
fn slots_lists_saved_games() {
    let fx = Fixture::new();
    fx.play(":save beta\n:save alpha\n").success();
    fx.slots()
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("beta"))
        .stdout(predicate::str::contains("2 slots"));
}

#[test]
fn slots_delete() {
    let fx = Fixture::new();
    fx.play(":save one\n").success();
    fx.slots()
        .args(["--delete", "one"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));
    fx.slots()
        .assert()
        .success()
        .stdout(predicate::str::contains("No save slots."));
}

#[test]
fn slots_delete_missing_fails() {
    let fx = Fixture::new();
    fx.slots()
        .args(["--delete", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no save slot named 'ghost'"));
}

#[test]
fn slots_respect_namespace() {
    let fx = Fixture::new();
    fx.play(":save shared\n").success();
    fx.slots()
        .args(["--namespace", "other_save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No save slots."));
}

// ---------------------------------------------------------------------------
// last-command
// ---------------------------------------------------------------------------

#[test]
fn last_command_is_persisted() {
    let fx = Fixture::new();
    fx.play("south\n  look  \n").success();
    wf().arg("last-command")
        .arg("--store")
        .arg(fx.store())
        .assert()
        .success()
        .stdout(predicate::str::diff("look\n"));
}

#[test]
fn last_command_empty_store() {
    let fx = Fixture::new();
    wf().arg("last-command")
        .arg("--store")
        .arg(fx.store())
        .assert()
        .success()
        .stdout(predicate::str::contains("No command recorded."));
}
