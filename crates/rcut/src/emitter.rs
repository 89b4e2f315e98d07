//! Program assembly and publishing.
//!
//! [`render_program`] is the pure pipeline: validate, resolve units, emit the
//! header, then one comment block plus codec output per operation.
//! [`GcodeEmitter`] wraps it, tracks the state of the last call and owns the
//! single live program.

use crate::codec::{CodecParams, MultiPassCodec, ToolpathCodec};
use crate::machine::MachineConfig;
use crate::program::{GcodeProgram, ProgramHandle, PublishedProgram};
use crate::types::{Operation, UnitSystem};
use crate::units::{scale_factor, UnitConverter};
use crate::validation::{validate_operations, ValidationError};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Digits after the decimal point for codec coordinates.
pub const COORDINATE_DECIMALS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitterState {
    #[default]
    Idle,
    Validating,
    /// Validation rejected the request.
    Aborted,
    Emitting,
    /// An operation was rejected part way through emission.
    Failed,
    Completed,
}

/// Machine parameters converted into the output unit system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMachine {
    pub safe_z: f64,
    pub top_z: f64,
    pub rapid_rate: f64,
    pub plunge_rate: f64,
    pub cut_rate: f64,
    pub pass_depth: f64,
}

impl ResolvedMachine {
    pub fn resolve(machine: &MachineConfig, converter: &UnitConverter) -> Self {
        Self {
            safe_z: converter.resolve(machine.safe_z),
            top_z: converter.resolve(machine.top_z),
            rapid_rate: converter.resolve(machine.rapid_rate),
            plunge_rate: converter.resolve(machine.plunge_rate),
            cut_rate: converter.resolve(machine.cut_rate),
            pass_depth: converter.resolve(machine.pass_depth),
        }
    }
}

/// Validate and emit a complete program without publishing it.
pub fn render_program<C: ToolpathCodec + ?Sized>(
    operations: &[Operation],
    machine: &MachineConfig,
    units: UnitSystem,
    codec: &C,
) -> Result<GcodeProgram, ValidationError> {
    let converter = UnitConverter::new(units);
    let resolved = ResolvedMachine::resolve(machine, &converter);
    let selected = validate_operations(operations, resolved.pass_depth)?;
    emit_program(&selected, &resolved, &converter, codec)
}

fn emit_program<C: ToolpathCodec + ?Sized>(
    operations: &[&Operation],
    machine: &ResolvedMachine,
    converter: &UnitConverter,
    codec: &C,
) -> Result<GcodeProgram, ValidationError> {
    let units = converter.units();
    let scale = scale_factor(units);

    let mut gcode = String::new();
    match units {
        UnitSystem::Imperial => gcode.push_str("G20         ; Set units to inches\r\n"),
        UnitSystem::Metric => gcode.push_str("G21         ; Set units to mm\r\n"),
    }
    gcode.push_str("G90         ; Absolute positioning\r\n");
    gcode.push_str(&format!(
        "G1 Z{} F{}      ; Move to clearance level\r\n",
        machine.safe_z, machine.rapid_rate
    ));

    for (index, op) in operations.iter().enumerate() {
        let cut_depth = converter.resolve(op.cut_depth);
        // Checked here rather than during validation; earlier blocks are dropped with `gcode`.
        if !(cut_depth > 0.0) {
            return Err(ValidationError::InvalidCutDepth { index, cut_depth });
        }

        debug!(
            index,
            cam_op = %op.cam_op,
            paths = op.toolpath_count(),
            cut_depth,
            "emitting operation"
        );

        gcode.push_str(&operation_comment(index, op, cut_depth, machine));

        let params = CodecParams {
            scale,
            decimal: COORDINATE_DECIMALS,
            top_z: machine.top_z,
            bot_z: machine.top_z - cut_depth,
            safe_z: machine.safe_z,
            pass_depth: machine.pass_depth,
            plunge_feed: machine.plunge_rate,
            retract_feed: machine.rapid_rate,
            cut_feed: machine.cut_rate,
            rapid_feed: machine.rapid_rate,
        };
        gcode.push_str(&codec.encode(op.toolpaths(), &params));
    }

    Ok(GcodeProgram::new(gcode))
}

fn operation_comment(
    index: usize,
    op: &Operation,
    cut_depth: f64,
    machine: &ResolvedMachine,
) -> String {
    format!(
        "\r\n;\
         \r\n; Operation:    {index}\
         \r\n; Type:         {cam_op}\
         \r\n; Paths:        {paths}\
         \r\n; Cut Depth:    {cut_depth}\
         \r\n; Pass Depth:   {pass_depth}\
         \r\n; Plunge rate:  {plunge_rate}\
         \r\n; Cut rate:     {cut_rate}\
         \r\n;\r\n",
        cam_op = op.cam_op,
        paths = op.toolpath_count(),
        pass_depth = machine.pass_depth,
        plunge_rate = machine.plunge_rate,
        cut_rate = machine.cut_rate,
    )
}

#[derive(Debug, Default)]
struct EmitterInner {
    state: EmitterState,
    current: Option<PublishedProgram>,
}

/// Generates programs and owns the one that is currently published.
///
/// Calls to [`GcodeEmitter::generate`] are serialized; a second caller waits
/// until the first has published or aborted.
#[derive(Debug, Default)]
pub struct GcodeEmitter<C = MultiPassCodec> {
    codec: C,
    inner: Mutex<EmitterInner>,
}

impl GcodeEmitter<MultiPassCodec> {
    pub fn new() -> Self {
        Self::with_codec(MultiPassCodec)
    }
}

impl<C: ToolpathCodec> GcodeEmitter<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            inner: Mutex::new(EmitterInner::default()),
        }
    }

    /// State the most recent call ended in.
    pub fn state(&self) -> EmitterState {
        self.inner.lock().state
    }

    /// The currently published program, if any.
    pub fn current(&self) -> Option<Arc<GcodeProgram>> {
        self.inner
            .lock()
            .current
            .as_ref()
            .map(|published| Arc::clone(published.program()))
    }

    pub fn current_handle(&self) -> Option<ProgramHandle> {
        self.inner.lock().current.as_ref().map(PublishedProgram::handle)
    }

    /// Generate a program and publish it, replacing the previous one.
    ///
    /// On error nothing is published and the previous program stays live.
    pub fn generate(
        &self,
        operations: &[Operation],
        machine: &MachineConfig,
        units: UnitSystem,
    ) -> Result<ProgramHandle, ValidationError> {
        let mut inner = self.inner.lock();

        inner.state = EmitterState::Validating;
        debug!(operations = operations.len(), %units, "validating operations");

        let converter = UnitConverter::new(units);
        let resolved = ResolvedMachine::resolve(machine, &converter);
        let selected = match validate_operations(operations, resolved.pass_depth) {
            Ok(selected) => selected,
            Err(err) => {
                inner.state = EmitterState::Aborted;
                warn!(error = %err, "gcode generation aborted");
                return Err(err);
            }
        };

        inner.state = EmitterState::Emitting;
        let program = match emit_program(&selected, &resolved, &converter, &self.codec) {
            Ok(program) => program,
            Err(err) => {
                inner.state = EmitterState::Failed;
                warn!(error = %err, "gcode generation failed");
                return Err(err);
            }
        };

        let line_count = program.line_count();
        let next = PublishedProgram::new(program);
        let handle = next.handle();
        if let Some(previous) = inner.current.replace(next) {
            debug!(id = %previous.id(), "released previous program");
        }
        inner.state = EmitterState::Completed;

        info!(
            id = %handle.id(),
            operations = selected.len(),
            lines = line_count,
            "published gcode program"
        );
        Ok(handle)
    }
}
