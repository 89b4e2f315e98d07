use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Output unit system of a generated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// Millimeters, emitted as `G21`.
    #[default]
    #[serde(rename = "mm", alias = "metric")]
    Metric,
    /// Inches, emitted as `G20`.
    #[serde(rename = "inch", alias = "imperial", alias = "in")]
    Imperial,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "mm"),
            Self::Imperial => write!(f, "inch"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "metric" => Ok(Self::Metric),
            "inch" | "in" | "imperial" => Ok(Self::Imperial),
            other => Err(format!("unknown unit system: {other}")),
        }
    }
}

/// Unit a stored value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// SVG user units, the coordinate space toolpaths are drawn in.
    Px,
    Mm,
    Inch,
}

/// A length (or a length per minute, for feed rates) tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: Unit,
}

impl Measurement {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn mm(value: f64) -> Self {
        Self::new(value, Unit::Mm)
    }

    pub fn inch(value: f64) -> Self {
        Self::new(value, Unit::Inch)
    }

    pub fn px(value: f64) -> Self {
        Self::new(value, Unit::Px)
    }
}

/// Machining strategy an operation's toolpaths were planned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CamOp {
    Pocket,
    Inside,
    Outside,
    Engrave,
    #[serde(rename = "V Pocket", alias = "VPocket")]
    VPocket,
}

impl fmt::Display for CamOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pocket => "Pocket",
            Self::Inside => "Inside",
            Self::Outside => "Outside",
            Self::Engrave => "Engrave",
            Self::VPocket => "V Pocket",
        };
        f.write_str(label)
    }
}

/// One continuous cutter path, already offset and clipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toolpath {
    /// Points in internal path coordinates (SVG px times `CLIPPER_SCALE`, Y down).
    pub points: Vec<Point>,
    /// The cutter may travel from the last point back to the first without retracting.
    #[serde(default)]
    pub safe_to_close: bool,
}

impl Toolpath {
    pub fn new(points: Vec<Point>, safe_to_close: bool) -> Self {
        Self {
            points,
            safe_to_close,
        }
    }

    /// Build a path from `(x, y)` pairs.
    pub fn from_xy(points: &[(f64, f64)], safe_to_close: bool) -> Self {
        Self::new(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            safe_to_close,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A single machining step together with its precomputed toolpaths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default = "Ulid::new")]
    pub id: Ulid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub cam_op: CamOp,
    /// `None` until toolpaths have been generated for this operation.
    #[serde(default)]
    pub tool_paths: Option<Vec<Toolpath>>,
    pub cut_depth: Measurement,
}

impl Operation {
    /// Create an enabled operation without toolpaths.
    pub fn new(cam_op: CamOp, cut_depth: Measurement) -> Self {
        Self {
            id: Ulid::new(),
            name: None,
            enabled: true,
            cam_op,
            tool_paths: None,
            cut_depth,
        }
    }

    pub fn with_toolpaths(mut self, tool_paths: Vec<Toolpath>) -> Self {
        self.tool_paths = Some(tool_paths);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Toolpaths exist and at least one is present.
    pub fn has_toolpaths(&self) -> bool {
        self.tool_paths.as_ref().is_some_and(|paths| !paths.is_empty())
    }

    pub fn toolpath_count(&self) -> usize {
        self.tool_paths.as_ref().map_or(0, Vec::len)
    }

    pub fn toolpaths(&self) -> &[Toolpath] {
        self.tool_paths.as_deref().unwrap_or(&[])
    }
}

fn default_true() -> bool {
    true
}
