use std::fs;
use std::path::Path;
use std::process::Command;

fn run_agent(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_theatre");
    Command::new(bin)
        .arg("agent")
        .args(args)
        .env("THEATRE_LOG", "off")
        .output()
        .expect("agent command should run")
}

fn parse_state_out(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("STATE_OUT:").map(|v| v.to_string()))
        .filter(|value| value != "NONE")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("path should be utf-8")
}

fn choose(state_in: &Path, choice: usize, state_out: &Path) -> String {
    let choice = choice.to_string();
    let output = run_agent(&[
        "choose",
        "--state-in",
        path_str(state_in),
        "--choice",
        &choice,
        "--state-out",
        path_str(state_out),
    ]);
    assert!(output.status.success(), "choose failed");
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn bundled_story_agent_flow_reaches_ending() {
    let root = tempfile::tempdir().expect("tempdir");
    let state_1 = root.path().join("state-1.json");
    let state_2 = root.path().join("state-2.json");
    let state_3 = root.path().join("state-3.json");
    let state_4 = root.path().join("state-4.json");

    let start = run_agent(&["start", "--state-out", path_str(&state_1)]);
    assert!(start.status.success(), "start failed");
    let start_stdout = String::from_utf8_lossy(&start.stdout);
    assert!(start_stdout.contains("RESULT:OK"));
    assert!(start_stdout.contains("EVENT:CHOICES"));
    assert!(start_stdout.contains("SCENE:opening"));
    assert_eq!(
        start_stdout
            .lines()
            .filter(|line| line.starts_with("CHOICE:"))
            .count(),
        3
    );
    assert_eq!(
        parse_state_out(&start_stdout).as_deref(),
        Some(path_str(&state_1))
    );

    let run_away = choose(&state_1, 2, &state_2);
    assert!(run_away.contains("SCENE:run_away"));
    assert!(run_away.contains("EVENT:CHOICES"));

    let meeting = choose(&state_2, 0, &state_3);
    assert!(meeting.contains("SCENE:castellano_meeting"));

    let ending = choose(&state_3, 1, &state_4);
    assert!(ending.contains("EVENT:ENDING"));
    assert!(ending.contains("SCENE:ending_shootout"));
    assert!(ending.contains("STATE_OUT:NONE"));
    assert!(!state_4.exists());

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&state_3).expect("state file"))
            .expect("state json");
    assert_eq!(saved["storyRef"], "bundled:the_last_case");
    assert_eq!(saved["snapshot"]["current_scene"], "castellano_meeting");
    assert_eq!(
        saved["snapshot"]["choice_history"]
            .as_array()
            .expect("history array")
            .len(),
        2
    );
}

#[test]
fn choose_reports_protocol_errors() {
    let root = tempfile::tempdir().expect("tempdir");
    let state_1 = root.path().join("state-1.json");
    let start = run_agent(&["start", "--state-out", path_str(&state_1)]);
    assert!(start.status.success(), "start failed");

    let out_of_range = run_agent(&[
        "choose",
        "--state-in",
        path_str(&state_1),
        "--choice",
        "9",
        "--state-out",
        path_str(&root.path().join("state-2.json")),
    ]);
    assert_eq!(out_of_range.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out_of_range.stdout);
    assert!(stdout.contains("RESULT:ERROR"));
    assert!(stdout.contains("ERROR_CODE:ENGINE_CHOICE_INDEX"));
    assert!(stdout.contains("ERROR_MSG_JSON:"));

    let missing = run_agent(&[
        "choose",
        "--state-in",
        path_str(&root.path().join("missing.json")),
        "--choice",
        "0",
        "--state-out",
        path_str(&root.path().join("state-3.json")),
    ]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&missing.stdout).contains("ERROR_CODE:CLI_STATE_NOT_FOUND"));
}

#[test]
fn story_override_must_match_state() {
    let root = tempfile::tempdir().expect("tempdir");
    let story_path = root.path().join("tiny.story.json");
    fs::write(
        &story_path,
        r#"{"id": "tiny", "title": "Tiny", "scenes": [
            {"id": "a", "description": "A.", "choices": [{"text": "On", "nextScene": "b"}]},
            {"id": "b", "description": "B.", "isEnding": true}
        ]}"#,
    )
    .expect("story file");
    let state_1 = root.path().join("state-1.json");

    let start = run_agent(&["start", "--state-out", path_str(&state_1)]);
    assert!(start.status.success(), "start failed");

    let mismatch = run_agent(&[
        "choose",
        "--state-in",
        path_str(&state_1),
        "--choice",
        "0",
        "--state-out",
        path_str(&root.path().join("state-2.json")),
        "--story",
        path_str(&story_path),
    ]);
    assert_eq!(mismatch.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&mismatch.stdout).contains("ERROR_CODE:STATE_STORY_MISMATCH"));

    let tiny_state = root.path().join("tiny-1.json");
    let tiny = run_agent(&[
        "start",
        "--story",
        path_str(&story_path),
        "--state-out",
        path_str(&tiny_state),
    ]);
    assert!(tiny.status.success(), "tiny start failed");
    let done = choose(&tiny_state, 0, &root.path().join("tiny-2.json"));
    assert!(done.contains("EVENT:ENDING"));
    assert!(done.contains("TEXT_JSON:\"B.\""));
}
