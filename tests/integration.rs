use std::{fs, path::PathBuf, process::Command};

const CONFIG_CONTENTS: &str = r#"
[model]
ai_adoption_rate = 0.05

[init]
num_agents = 120
seed = 7

[output]
n_steps = 60
steps_per_log = 20
"#;

fn run_bin(args: &[&str]) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_aidopt"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str =
        std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
}

fn setup_sim_dir(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    fs::write(test_dir.join("config.toml"), CONFIG_CONTENTS).expect("failed to write config file");

    test_dir
}

#[test]
fn basic_workflow() {
    let test_dir = setup_sim_dir("basic_workflow");
    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    run_bin(&["--sim-dir", test_dir_str, "create"]);
    run_bin(&["--sim-dir", test_dir_str, "create"]);

    run_bin(&["--sim-dir", test_dir_str, "analyze"]);

    for run_idx in 0..2 {
        let run_dir = test_dir.join(format!("run-{run_idx:04}"));
        assert!(run_dir.join("history.msgpack").is_file());
        assert!(run_dir.join("results.json").is_file());
    }

    run_bin(&["--sim-dir", test_dir_str, "clean"]);
    assert!(!test_dir.join("run-0000").exists());
    assert!(test_dir.join("config.toml").is_file());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn seeded_runs_reproduce_history() {
    let dir_a = setup_sim_dir("seeded_runs_a");
    let dir_b = setup_sim_dir("seeded_runs_b");

    run_bin(&["--sim-dir", dir_a.to_str().unwrap(), "create"]);
    run_bin(&["--sim-dir", dir_b.to_str().unwrap(), "create"]);

    let history_a =
        fs::read(dir_a.join("run-0000").join("history.msgpack")).expect("failed to read history");
    let history_b =
        fs::read(dir_b.join("run-0000").join("history.msgpack")).expect("failed to read history");

    assert_eq!(history_a, history_b);

    fs::remove_dir_all(&dir_a).ok();
    fs::remove_dir_all(&dir_b).ok();
}
