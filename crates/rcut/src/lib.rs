mod codec;
mod emitter;
mod job;
mod machine;
mod program;
mod types;
mod units;
mod validation;

pub use codec::{CodecParams, MultiPassCodec, ToolpathCodec};
pub use emitter::{render_program, EmitterState, GcodeEmitter, ResolvedMachine, COORDINATE_DECIMALS};
pub use job::Job;
pub use machine::MachineConfig;
pub use program::{GcodeProgram, ProgramHandle, LINE_ENDING};
pub use types::*;
pub use units::{scale_factor, UnitConverter, CLIPPER_SCALE, MM_PER_INCH, PX_PER_INCH};
pub use validation::{validate_operations, Severity, ValidationError};

/// Install the stderr log subscriber.
///
/// `RUST_LOG` is honored; otherwise the level is `info`, or `debug` when
/// `debug` is set.
pub fn init_logging(debug: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| anyhow::anyhow!("install log subscriber: {err}"))
}
