use crate::types::Toolpath;

/// Cutting parameters handed to a codec, already in output units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecParams {
    /// Multiplier from internal path coordinates to output units.
    pub scale: f64,
    /// Digits after the decimal point for coordinates.
    pub decimal: usize,
    pub top_z: f64,
    pub bot_z: f64,
    pub safe_z: f64,
    pub pass_depth: f64,
    pub plunge_feed: f64,
    pub retract_feed: f64,
    pub cut_feed: f64,
    pub rapid_feed: f64,
}

/// Turns the toolpaths of one operation into motion lines.
///
/// Implementations must be deterministic and terminate every line with CRLF.
pub trait ToolpathCodec {
    fn encode(&self, paths: &[Toolpath], params: &CodecParams) -> String;
}

impl<F> ToolpathCodec for F
where
    F: Fn(&[Toolpath], &CodecParams) -> String,
{
    fn encode(&self, paths: &[Toolpath], params: &CodecParams) -> String {
        self(paths, params)
    }
}

/// Cuts each path in depth passes from `top_z` down to `bot_z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiPassCodec;

impl ToolpathCodec for MultiPassCodec {
    fn encode(&self, paths: &[Toolpath], params: &CodecParams) -> String {
        let p = params;
        let z = |value: f64| fixed(value, p.decimal);
        let xy = |point: kurbo::Point| {
            format!(
                " X{} Y{}",
                fixed(point.x * p.scale, p.decimal),
                fixed(-point.y * p.scale, p.decimal)
            )
        };
        let retract = format!("; Retract\r\nG1 Z{} F{}\r\n", z(p.safe_z), p.retract_feed);

        let mut gcode = String::new();
        for (path_index, path) in paths.iter().enumerate() {
            let Some(&start) = path.points.first() else {
                continue;
            };

            gcode.push_str(&format!("\r\n; Path {path_index}\r\n"));

            let mut at_safe_z = true;
            let mut finished_z = p.top_z;
            while finished_z > p.bot_z {
                let next_z = (finished_z - p.pass_depth).max(p.bot_z);

                // A closed path ends where it started, so deeper passes can plunge in place.
                if !at_safe_z && !path.safe_to_close {
                    gcode.push_str(&retract);
                    at_safe_z = true;
                }
                if at_safe_z {
                    gcode.push_str("; Rapid to initial position\r\n");
                    gcode.push_str(&format!("G1{} F{}\r\n", xy(start), p.rapid_feed));
                }

                gcode.push_str("; plunge\r\n");
                gcode.push_str(&format!("G1 Z{} F{}\r\n", z(next_z), p.plunge_feed));
                at_safe_z = false;

                gcode.push_str("; cut\r\n");
                let mut cut_points = path.points.iter().skip(1).copied().collect::<Vec<_>>();
                if path.safe_to_close && path.points.len() > 1 {
                    cut_points.push(start);
                }
                for (i, point) in cut_points.into_iter().enumerate() {
                    if i == 0 {
                        gcode.push_str(&format!("G1{} F{}\r\n", xy(point), p.cut_feed));
                    } else {
                        gcode.push_str(&format!("G1{}\r\n", xy(point)));
                    }
                }

                finished_z = next_z;
            }

            gcode.push_str(&retract);
        }

        gcode
    }
}

/// Fixed-point rendering that never prints a negative zero.
fn fixed(value: f64, decimal: usize) -> String {
    let text = format!("{value:.decimal$}");
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}
