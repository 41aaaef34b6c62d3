//! End-to-end exerciser runs against a real sheet.
//!
//! **Pass criterion:** every run terminates, the report accounts for every
//! submitted task, and the sheet grew by exactly the number of inserts.

use tessera_bench::{
    contention_profile, reference_profile, seeded_sheet, ExerciseReport, Exerciser,
    ExerciserConfig, Operation,
};
use tessera_core::Shape;
use tessera_engine::Sheet;

fn run(sheet: &Sheet, users: usize, tasks: usize, seed: u64) -> ExerciseReport {
    Exerciser::new(ExerciserConfig {
        users: Some(users),
        tasks,
        seed,
    })
    .run(sheet)
    .unwrap()
}

fn grown(initial: Shape, report: &ExerciseReport) -> Shape {
    Shape::new(
        initial.rows + report.count(Operation::InsertRowAfter) as usize,
        initial.cols + report.count(Operation::InsertColAfter) as usize,
    )
}

#[test]
fn shape_grows_by_insert_count() {
    for seed in 0..8 {
        let sheet = Sheet::new(contention_profile()).unwrap();
        let initial = sheet.shape();
        let report = run(&sheet, 8, 500, seed);
        assert_eq!(report.total(), 500);
        assert_eq!(sheet.shape(), grown(initial, &report), "seed {seed}");
    }
}

#[test]
fn reference_profile_under_many_users() {
    let sheet = seeded_sheet(reference_profile(), 0.05, 1);
    let initial = sheet.shape();
    let report = run(&sheet, 50, 1_000, 42);
    assert_eq!(report.total(), 1_000);
    assert_eq!(sheet.shape(), grown(initial, &report));
    assert!(Operation::ALL.iter().all(|&op| report.count(op) > 0));
}

#[test]
fn zero_tasks_leaves_sheet_alone() {
    let sheet = seeded_sheet(contention_profile(), 0.3, 5);
    let before = sheet.to_rows();
    let report = run(&sheet, 3, 0, 9);
    assert_eq!(report.total(), 0);
    assert_eq!(sheet.to_rows(), before);
}

#[test]
fn exercised_sheet_saves_and_reloads() {
    let sheet = Sheet::new(contention_profile()).unwrap();
    run(&sheet, 4, 400, 77);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exercised.snapshot");
    tessera_snapshot::save(&sheet, &path).unwrap();

    let restored = Sheet::with_shape(1, 1).unwrap();
    assert_eq!(tessera_snapshot::load(&restored, &path).unwrap(), sheet.shape());
    assert_eq!(restored.to_rows(), sheet.to_rows());
}
