use rcut::*;

fn machine_with_pass_depth(pass_depth_mm: f64) -> MachineConfig {
    MachineConfig {
        safe_z: Measurement::mm(5.0),
        top_z: Measurement::mm(0.0),
        rapid_rate: Measurement::mm(1000.0),
        plunge_rate: Measurement::mm(100.0),
        cut_rate: Measurement::mm(300.0),
        pass_depth: Measurement::mm(pass_depth_mm),
    }
}

fn path() -> Toolpath {
    Toolpath::from_xy(&[(0.0, 0.0), (500.0, 0.0), (500.0, 500.0)], false)
}

fn ready(cut_depth_mm: f64) -> Operation {
    Operation::new(CamOp::Inside, Measurement::mm(cut_depth_mm)).with_toolpaths(vec![path()])
}

/// Publish one good program so failures can be checked against it.
fn emitter_with_program() -> (GcodeEmitter, ProgramHandle, String) {
    let emitter = GcodeEmitter::new();
    let handle = emitter
        .generate(&[ready(2.0)], &machine_with_pass_depth(1.0), UnitSystem::Metric)
        .expect("baseline generation");
    let text = handle.program().expect("live").text().to_string();
    (emitter, handle, text)
}

fn assert_prior_program_intact(emitter: &GcodeEmitter, handle: &ProgramHandle, text: &str) {
    assert!(handle.is_live(), "prior handle should stay valid");
    assert_eq!(
        emitter.current_handle().map(|h| h.id()),
        Some(handle.id()),
        "no new program should be published"
    );
    assert_eq!(
        emitter.current().map(|p| p.text().to_string()).as_deref(),
        Some(text)
    );
}

#[test]
fn test_no_operations() {
    let (emitter, handle, text) = emitter_with_program();

    let result = emitter.generate(&[], &machine_with_pass_depth(1.0), UnitSystem::Metric);
    assert_eq!(result.unwrap_err(), ValidationError::NoOperations);
    assert_eq!(emitter.state(), EmitterState::Aborted);
    assert_prior_program_intact(&emitter, &handle, &text);
}

#[test]
fn test_missing_toolpaths() {
    let (emitter, handle, text) = emitter_with_program();

    let ops = vec![
        ready(1.0),
        Operation::new(CamOp::Pocket, Measurement::mm(1.0)).with_toolpaths(Vec::new()),
    ];
    let result = emitter.generate(&ops, &machine_with_pass_depth(1.0), UnitSystem::Metric);
    assert_eq!(
        result.unwrap_err(),
        ValidationError::MissingToolpaths { index: 1 }
    );
    assert_prior_program_intact(&emitter, &handle, &text);
}

#[test]
fn test_absent_toolpaths() {
    let emitter = GcodeEmitter::new();
    let ops = vec![Operation::new(CamOp::Engrave, Measurement::mm(1.0))];
    let result = emitter.generate(&ops, &machine_with_pass_depth(1.0), UnitSystem::Metric);
    assert_eq!(
        result.unwrap_err(),
        ValidationError::MissingToolpaths { index: 0 }
    );
    assert!(emitter.current().is_none());
}

#[test]
fn test_no_visible_operations() {
    let (emitter, handle, text) = emitter_with_program();

    let ops = vec![ready(1.0).with_enabled(false), ready(2.0).with_enabled(false)];
    let result = emitter.generate(&ops, &machine_with_pass_depth(1.0), UnitSystem::Metric);
    assert_eq!(result.unwrap_err(), ValidationError::NoVisibleOperations);
    assert_prior_program_intact(&emitter, &handle, &text);
}

#[test]
fn test_invalid_pass_depth() {
    let (emitter, handle, text) = emitter_with_program();

    for pass_depth in [0.0, -0.5] {
        let result = emitter.generate(
            &[ready(1.0)],
            &machine_with_pass_depth(pass_depth),
            UnitSystem::Metric,
        );
        assert_eq!(
            result.unwrap_err(),
            ValidationError::InvalidPassDepth { pass_depth }
        );
        assert_eq!(emitter.state(), EmitterState::Aborted);
    }
    assert_prior_program_intact(&emitter, &handle, &text);
}

#[test]
fn test_invalid_pass_depth_checked_before_cut_depth() {
    let emitter = GcodeEmitter::new();
    let result = emitter.generate(
        &[ready(-1.0)],
        &machine_with_pass_depth(0.0),
        UnitSystem::Metric,
    );
    assert!(matches!(
        result,
        Err(ValidationError::InvalidPassDepth { .. })
    ));
}

#[test]
fn test_invalid_cut_depth_discards_partial_program() {
    let (emitter, handle, text) = emitter_with_program();

    // The first two operations emit fine before the third is rejected.
    let ops = vec![
        ready(1.0),
        ready(3.0).with_enabled(false),
        ready(2.0),
        ready(0.0),
    ];
    let result = emitter.generate(&ops, &machine_with_pass_depth(1.0), UnitSystem::Metric);
    assert_eq!(
        result.unwrap_err(),
        ValidationError::InvalidCutDepth {
            index: 2,
            cut_depth: 0.0
        }
    );
    assert_eq!(emitter.state(), EmitterState::Failed);
    assert_prior_program_intact(&emitter, &handle, &text);
}

#[test]
fn test_render_reports_negative_cut_depth() {
    let ops = vec![ready(-0.25)];
    let result = render_program(
        &ops,
        &machine_with_pass_depth(1.0),
        UnitSystem::Metric,
        &MultiPassCodec,
    );
    assert_eq!(
        result.unwrap_err(),
        ValidationError::InvalidCutDepth {
            index: 0,
            cut_depth: -0.25
        }
    );
}

#[test]
fn test_failure_without_prior_program_publishes_nothing() {
    let emitter = GcodeEmitter::new();
    assert!(emitter.current().is_none());

    let result = emitter.generate(
        &[ready(0.0)],
        &machine_with_pass_depth(1.0),
        UnitSystem::Metric,
    );
    assert!(result.is_err());
    assert!(emitter.current().is_none());
    assert!(emitter.current_handle().is_none());
}

#[test]
fn test_error_messages_are_blocking() {
    let err = ValidationError::MissingToolpaths { index: 4 };
    assert_eq!(err.severity(), Severity::Blocking);
    assert!(err.to_string().contains("operation 4"));

    let err = ValidationError::InvalidCutDepth {
        index: 1,
        cut_depth: -2.0,
    };
    assert!(err.to_string().contains("-2"));
}
