//! Driver behaviour with deliberately broken scenarios and hooks

use copycheck_config::{ExecutorConfig, HarnessConfig};
use copycheck_harness::{
    DestPolicy, Driver, HarnessError, Mismatch, Outcome, Plan, PlanError, Registry, ScenarioResult,
    Shape, SourceKind,
};
use copycheck_runtime::{arraycopy, ViolationKind};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::cell::Cell;
use std::rc::Rc;

fn config() -> ExecutorConfig {
    HarnessConfig::for_testing().executor
}

/// Copies one element too few, starting on the given iteration
fn registry_with_late_fault(fault_from: u32, calls: Rc<Cell<u32>>) -> Registry {
    Registry::builder()
        .scenario(
            "faulty_copy",
            "copy that goes wrong after a while",
            Shape::ints(SourceKind::Small).with_dest(DestPolicy::New),
            move |_, args| {
                let call = calls.get();
                calls.set(call + 1);
                let len = if call >= fault_from { 4 } else { 5 };
                arraycopy(args.source_ints()?, 0, args.dest_ints()?, 0, len)?;
                Ok(Outcome::Unit)
            },
        )
        .scenario(
            "healthy_copy",
            "",
            Shape::ints(SourceKind::Small).with_dest(DestPolicy::New),
            |_, args| {
                arraycopy(args.source_ints()?, 0, args.dest_ints()?, 0, 5)?;
                Ok(Outcome::Unit)
            },
        )
        .build()
        .unwrap()
}

#[rstest]
#[case(0)]
#[case(7)]
fn test_failure_stops_scenario_but_not_run(#[case] fault_from: u32) {
    let calls = Rc::new(Cell::new(0));
    let registry = registry_with_late_fault(fault_from, Rc::clone(&calls));
    let plan = Plan::new().run("faulty_copy").run("healthy_copy");

    let report = Driver::new(config(), registry, plan).unwrap().run().unwrap();

    assert!(!report.passed());
    assert_eq!(calls.get(), fault_from + 1);
    assert_eq!(report.runs.len(), 2);
    assert_eq!(
        report.runs[0].result,
        ScenarioResult::Fail {
            iteration: fault_from,
            mismatches: vec![Mismatch::Element {
                dest_index: 4,
                source_index: 4,
                expected: "4".to_string(),
                actual: "0".to_string(),
            }],
            duration: report.runs[0].result.duration(),
        }
    );
    assert_eq!(
        report.runs[0].diagnostics(),
        vec!["Test faulty_copy failed for 4 src[4]=4, dest[4]=0".to_string()]
    );
    assert!(report.runs[1].result.is_pass());
}

#[test]
fn test_fixture_corruption_fails_and_does_not_leak() {
    let registry = Registry::builder()
        .scenario("corrupting_clone", "", Shape::ints(SourceKind::Small), |f, _| {
            f.small_ints().set(0, 99)?;
            Ok(f.small_ints().clone_array().into())
        })
        .scenario("clean_clone", "", Shape::ints(SourceKind::Small), |f, _| {
            Ok(f.small_ints().clone_array().into())
        })
        .build()
        .unwrap();
    let plan = Plan::new().run("corrupting_clone").run("clean_clone");
    let driver = Driver::new(config(), registry, plan).unwrap();
    let pristine = driver.fixture().snapshot();

    let report = driver.run().unwrap();

    assert!(!report.passed());
    assert_eq!(
        report.runs[0].result.mismatches(),
        &[Mismatch::FixtureModified {
            buffer: "small_ints"
        }]
    );
    assert!(report.runs[1].result.is_pass());
    assert_eq!(driver.fixture().snapshot(), pristine);
}

#[test]
fn test_clone_returning_its_source_fails() {
    let registry = Registry::builder()
        .scenario("aliasing_clone", "", Shape::ints(SourceKind::Small), |f, _| {
            Ok(f.small_ints().clone().into())
        })
        .build()
        .unwrap();
    let plan = Plan::new().run("aliasing_clone");

    let report = Driver::new(config(), registry, plan).unwrap().run().unwrap();

    assert!(!report.passed());
    assert_eq!(report.runs[0].result.mismatches(), &[Mismatch::Aliased]);
}

#[test]
fn test_unexpected_violation_aborts_run() {
    let registry = Registry::builder()
        .scenario(
            "out_of_range",
            "",
            Shape::ints(SourceKind::Small).with_dest(DestPolicy::New),
            |_, args| {
                arraycopy(args.source_ints()?, 1, args.dest_ints()?, 0, 5)?;
                Ok(Outcome::Unit)
            },
        )
        .build()
        .unwrap();
    let driver = Driver::new(config(), registry, Plan::new().run("out_of_range")).unwrap();

    let err = driver.run().unwrap_err();
    match err {
        HarnessError::UnexpectedViolation {
            scenario,
            context,
            source,
        } => {
            assert_eq!(scenario, "out_of_range");
            assert_eq!(context, "iteration 0");
            assert_eq!(source.kind(), ViolationKind::IndexOutOfBounds);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unobserved_violation_is_a_hook_failure() {
    let attempts = Rc::new(Cell::new(0));
    let counter = Rc::clone(&attempts);
    let registry = registry_with_late_fault(u32::MAX, Rc::new(Cell::new(0)));
    let plan = Plan::new()
        .expect_violation(
            "faulty_copy",
            "store that is allowed",
            ViolationKind::ArrayStore,
            None,
            move |_| {
                counter.set(counter.get() + 1);
                Ok(())
            },
        )
        .run("faulty_copy")
        .run("healthy_copy");

    let report = Driver::new(config(), registry, plan).unwrap().run().unwrap();

    assert_eq!(attempts.get(), config().violation_attempts);
    assert!(report.runs.iter().all(|r| r.result.is_pass()));
    assert!(!report.passed());
    assert_eq!(report.hook_failures.len(), 1);
    assert_eq!(report.hook_failures[0].owner, "faulty_copy");
    assert_eq!(report.hook_failures[0].attempts, 3);
}

#[test]
fn test_violation_of_wrong_kind_is_fatal() {
    let registry = registry_with_late_fault(u32::MAX, Rc::new(Cell::new(0)));
    let plan = Plan::new()
        .expect_violation(
            "faulty_copy",
            "bounds instead of store",
            ViolationKind::ArrayStore,
            Some(1),
            |f| arraycopy(f.small_ints(), 5, f.small_ints(), 0, 1),
        )
        .run("faulty_copy")
        .run("healthy_copy");

    let err = Driver::new(config(), registry, plan).unwrap().run().unwrap_err();
    assert!(matches!(err, HarnessError::UnexpectedViolation { .. }));
}

#[test]
fn test_warm_steps_run_configured_times() {
    let seen = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&seen);
    let registry = registry_with_late_fault(u32::MAX, Rc::new(Cell::new(0)));
    let plan = Plan::new()
        .warm("healthy_copy", "count", move |_, i| {
            assert_eq!(i, counter.get());
            counter.set(i + 1);
            Ok(())
        })
        .run("healthy_copy")
        .run("faulty_copy");

    Driver::new(config(), registry, plan).unwrap().run().unwrap();
    assert_eq!(seen.get(), config().warmup_iterations);
}

#[test]
fn test_incomplete_plan_is_rejected() {
    let registry = registry_with_late_fault(0, Rc::new(Cell::new(0)));
    let err = Driver::new(config(), registry, Plan::new().run("healthy_copy")).unwrap_err();
    assert_eq!(err, PlanError::NotScheduled("faulty_copy".to_string()));
}
