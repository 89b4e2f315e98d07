use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Weak};
use ulid::Ulid;

pub const LINE_ENDING: &str = "\r\n";

/// Complete program text from one successful generation. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcodeProgram {
    text: String,
}

impl GcodeProgram {
    pub(crate) fn new(text: String) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines without their terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .strip_suffix(LINE_ENDING)
            .unwrap_or(&self.text)
            .split(LINE_ENDING)
    }

    pub fn line_count(&self) -> usize {
        self.text.matches(LINE_ENDING).count()
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Write the program verbatim, creating the parent directory if needed.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output directory {}", parent.display()))?;
        }
        fs::write(path, self.text.as_bytes())
            .with_context(|| format!("write gcode {}", path.display()))
    }
}

/// Caller-side reference to a published program.
///
/// The handle stops resolving once a newer program replaces the one it
/// points to.
#[derive(Debug, Clone)]
pub struct ProgramHandle {
    id: Ulid,
    program: Weak<GcodeProgram>,
}

impl ProgramHandle {
    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn program(&self) -> Option<Arc<GcodeProgram>> {
        self.program.upgrade()
    }

    pub fn is_live(&self) -> bool {
        self.program.strong_count() > 0
    }
}

/// The emitter-owned side of a handle.
#[derive(Debug)]
pub(crate) struct PublishedProgram {
    id: Ulid,
    program: Arc<GcodeProgram>,
}

impl PublishedProgram {
    pub(crate) fn new(program: GcodeProgram) -> Self {
        Self {
            id: Ulid::new(),
            program: Arc::new(program),
        }
    }

    pub(crate) fn id(&self) -> Ulid {
        self.id
    }

    pub(crate) fn program(&self) -> &Arc<GcodeProgram> {
        &self.program
    }

    pub(crate) fn handle(&self) -> ProgramHandle {
        ProgramHandle {
            id: self.id,
            program: Arc::downgrade(&self.program),
        }
    }
}
