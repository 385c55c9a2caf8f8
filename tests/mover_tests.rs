//! Expenses relocation into the import directory

mod common;

use imu_sync::config::ExpensesPaths;
use imu_sync::mover::{MoveJob, MoveOutcome, move_file};

#[test]
fn test_expenses_move_into_import_dir() {
    let env = common::TestEnvironment::new();
    let work = env.path().join("work");
    std::fs::create_dir_all(&work).unwrap();
    std::fs::write(env.path().join("expenses.csv"), "Expense_Id,Amount\n1,9.99\n").unwrap();

    let job = MoveJob::from_settings(&ExpensesPaths::default(), &work);
    let outcome = move_file(&job).unwrap();

    assert!(matches!(outcome, MoveOutcome::Moved { .. }));
    assert!(!env.path().join("expenses.csv").exists());
    assert_eq!(
        env.read(&work.join("data").join("import.csv")),
        "Expense_Id,Amount\n1,9.99\n"
    );
}

#[test]
fn test_nothing_to_move_is_success() {
    let env = common::TestEnvironment::new();
    let work = env.path().join("work");
    std::fs::create_dir_all(&work).unwrap();

    let job = MoveJob::from_settings(&ExpensesPaths::default(), &work);

    assert_eq!(move_file(&job).unwrap(), MoveOutcome::NothingToMove);
    assert!(!work.join("data").exists());
}
