//! Drives the interpreter loop with canned input and checks what it prints
//! and records.

use std::time::{Duration, Instant};

use bangsh::repl::{Input, Script};
use bangsh::{Config, Shell};

fn run_script(lines: &[&str]) -> (Shell<Script, Vec<u8>>, String) {
    let mut shell = Shell::new(Config::default(), Script::new(lines.iter().copied()), Vec::new());
    shell.run().expect("interpreter failed");
    let out = String::from_utf8(shell.output().clone()).expect("output is utf-8");
    (shell, out)
}

fn history_texts(shell: &Shell<Script, Vec<u8>>) -> Vec<(u64, String)> {
    shell
        .history()
        .iter()
        .map(|e| (e.ordinal(), e.text().to_string()))
        .collect()
}

#[test]
fn bang_bang_reruns_and_records_a_new_entry() {
    let (shell, out) = run_script(&["echo hi", "!!", "history"]);
    assert_eq!(out, "echo hi\n1\techo hi\n2\techo hi\n3\thistory\n\n");
    assert_eq!(
        history_texts(&shell),
        vec![
            (1, "echo hi".to_string()),
            (2, "echo hi".to_string()),
            (3, "history".to_string()),
        ]
    );
}

#[test]
fn recall_by_ordinal() {
    let (shell, out) = run_script(&["true", "false", "!1"]);
    assert_eq!(out, "true\n\n");
    assert_eq!(shell.history().last().map(|e| (e.ordinal(), e.text())), Some((3, "true")));
}

#[test]
fn recall_outside_retained_range_is_a_miss() {
    let mut lines = vec!["true"; 17];
    lines.push("!5");
    let (shell, out) = run_script(&lines);
    assert_eq!(out, "!5: No such command in history.\n\n");
    assert_eq!(shell.history().total_recorded(), 17);
    assert_eq!(shell.history().iter().next().map(|e| e.ordinal()), Some(8));
}

#[test]
fn bang_bang_with_empty_history_is_reported() {
    let (shell, out) = run_script(&["!!"]);
    assert_eq!(out, "!!: No commands in history.\n\n");
    assert!(shell.history().is_empty());
}

#[test]
fn malformed_recall_is_reported_and_not_recorded() {
    let (shell, out) = run_script(&["true", "!abc", "! 2 3", "!0"]);
    assert_eq!(
        out,
        "Invalid history reference.\nInvalid history reference.\nInvalid history reference.\n\n"
    );
    assert_eq!(history_texts(&shell), vec![(1, "true".to_string())]);
}

#[test]
fn blank_lines_are_ignored() {
    let (_, out) = run_script(&["", "   ", "\t\n", "history"]);
    assert_eq!(out, "1\thistory\n\n");
}

#[test]
fn unknown_program_does_not_stop_the_interpreter() {
    let (shell, out) = run_script(&["doesnotexist123 --flag", "history"]);
    assert_eq!(out, "1\tdoesnotexist123 --flag\n2\thistory\n\n");
    assert_eq!(shell.source().prompts().len(), 3);
}

#[test]
fn exit_stops_before_later_lines() {
    let (shell, out) = run_script(&["exit now", "history"]);
    assert_eq!(out, "");
    assert_eq!(shell.source().prompts().len(), 1);
    assert_eq!(history_texts(&shell), vec![(1, "exit now".to_string())]);
}

#[test]
fn background_job_returns_to_the_prompt_immediately() {
    let started = Instant::now();
    let (shell, _) = run_script(&["sleep 2 &", "exit"]);
    assert!(started.elapsed() < Duration::from_millis(1500), "blocked on a background job");
    assert_eq!(shell.source().prompts().len(), 2);
    assert_eq!(history_texts(&shell)[0], (1, "sleep 2".to_string()));
    assert_eq!(shell.dispatcher().background_jobs().len(), 1);
}

#[test]
fn foreground_job_is_waited_for() {
    let started = Instant::now();
    run_script(&["sleep 1", "exit"]);
    assert!(started.elapsed() >= Duration::from_millis(900));
}

#[test]
fn recall_keeps_or_adds_background_marker() {
    let (shell, out) = run_script(&["true &", "!1 &"]);
    assert_eq!(out, "true &\n\n");
    assert_eq!(
        history_texts(&shell),
        vec![(1, "true".to_string()), (2, "true".to_string())]
    );
}

#[test]
fn interrupt_prints_history_and_keeps_going() {
    let script = Script::from_inputs([
        Input::Line("true".to_string()),
        Input::Interrupted,
        Input::Line("history".to_string()),
    ]);
    let mut shell = Shell::new(Config::default(), script, Vec::new());
    shell.run().unwrap();
    let out = String::from_utf8(shell.output().clone()).unwrap();
    assert_eq!(out, "\n1\ttrue\n1\ttrue\n2\thistory\n\n");
    assert_eq!(shell.source().prompts().len(), 4);
}

#[test]
fn cd_failure_leaves_directory_unchanged() {
    let original = std::env::current_dir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().canonicalize().unwrap();
    let cd = format!("cd {}", target.display());

    let (shell, out) = run_script(&[cd.as_str(), "pwd", "cd /no/such/bangsh/dir", "pwd", "cd"]);
    let shown = target.display().to_string();
    assert_eq!(
        out,
        format!("{shown}\ncd: /no/such/bangsh/dir: Invalid directory.\n{shown}\ncd: Invalid directory.\n\n")
    );
    assert_eq!(shell.source().prompts()[1], format!("{shown}> "));
    assert_eq!(shell.source().prompts()[4], format!("{shown}> "));

    std::env::set_current_dir(original).unwrap();
}
