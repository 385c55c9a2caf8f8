//! Binary behavior that needs no network

mod common;

use std::process::Command;

fn imu_sync(env: &common::TestEnvironment) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_imu-sync"));
    cmd.current_dir(env.path())
        .env_remove("SFTP_HOST")
        .env_remove("SFTP_USER")
        .env_remove("SFTP_RSA_PRIVATE_KEY")
        .env_remove("IMU_SYNC_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_download_without_credentials_exits_one() {
    let env = common::TestEnvironment::new();

    let output = imu_sync(&env).arg("download").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SFTP_HOST"), "{stderr}");
    assert!(stderr.contains("SFTP_RSA_PRIVATE_KEY"), "{stderr}");
    assert_eq!(stderr.lines().count(), 1, "{stderr}");
    assert!(stderr.starts_with("imu-sync: "), "{stderr}");
    assert!(!env.path().join("sftp_key.pem").exists());
}

#[test]
fn test_partial_credentials_name_the_missing_one() {
    let env = common::TestEnvironment::new();

    let output = imu_sync(&env)
        .arg("sync")
        .env("SFTP_HOST", "sftp.example.com")
        .env("SFTP_USER", "svc")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SFTP_RSA_PRIVATE_KEY"), "{stderr}");
    assert!(!stderr.contains("SFTP_USER"), "{stderr}");
}

#[test]
fn test_transform_runs_offline() {
    let env = common::TestEnvironment::new();
    let person = env.stage(
        "person.csv",
        "FirstName,LastName,Person_Code,Active\nJane,Doe,42,Y\n",
    );
    env.stage("people.csv", "*username,person_code\n");

    let output = imu_sync(&env).arg("transform").output().unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        env.read(&person),
        "*Username,First_Name,Last_Name,Person_Code,Active\nJANE.DOE,Jane,Doe,42,Y\n"
    );
}

#[test]
fn test_move_expenses_with_nothing_staged_succeeds() {
    let env = common::TestEnvironment::new();

    let output = imu_sync(&env)
        .args(["move-expenses", "--source", "expenses.csv"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!env.path().join("data").exists());
}

#[test]
fn test_failure_is_recorded_in_log_file() {
    let env = common::TestEnvironment::new();
    let logs = env.path().join("logs");
    std::fs::create_dir_all(&logs).unwrap();

    let output = imu_sync(&env)
        .arg("--log-dir")
        .arg(&logs)
        .arg("download")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stderr).lines().count(), 1);

    let logged: String = std::fs::read_dir(&logs)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| std::fs::read_to_string(e.path()).unwrap())
        .collect();
    assert!(logged.contains("Missing required SFTP credentials"), "{logged}");
}

#[test]
fn test_unreadable_config_exits_one() {
    let env = common::TestEnvironment::new();

    let output = imu_sync(&env)
        .args(["--config", "missing.toml", "transform"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}
