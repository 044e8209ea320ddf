//! Enhanced-path translation to SVG path data.
//!
//! ODF's `draw:enhanced-path` is a compact command string ("M 0 0 L ?f1 $0
//! X 21600 10800 Z") whose operands may reference solved equations and
//! modifiers. Translation runs in two passes: tokenize-and-resolve against
//! the shape's [`VariableEnv`], then interpret the resolved tokens into
//! absolute [`PathCommand`]s, honoring the mini-language's implicit command
//! repetition (a bare coordinate tuple repeats the last drawing command).
//!
//! A malformed token or unknown command letter degrades locally; the rest of
//! the path still renders.

use super::env::VariableEnv;
use std::fmt::Write;

/// One absolute SVG-ready path command.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    /// Absolute move, resets the subpath start
    Move { x: f64, y: f64 },
    /// Absolute line
    Line { x: f64, y: f64 },
    /// Absolute cubic Bézier
    Curve {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// Close the subpath back to its start point
    Close,
    /// End the subpath without closing; emits nothing by itself
    EndSubpath,
    /// Elliptical arc to an absolute target. Quarter-ellipse corners (`X`/`Y`)
    /// and the decomposed pieces of an angle arc (`U`) both land here.
    Arc {
        rx: f64,
        ry: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Command(String),
    Value(f64),
}

/// What the last executed drawing command was, for implicit repetition.
/// `Z`, `N` and `U` do not repeat.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LastCommand {
    None,
    Move,
    Line,
    Curve,
    ArcTarget,
}

/// Pass 1: split the raw path and resolve every operand to a number.
fn tokenize(path: &str, env: &VariableEnv) -> Vec<Token> {
    let mut tokens = Vec::new();
    for raw in path.split_whitespace() {
        if raw.chars().all(|c| c.is_ascii_alphabetic()) {
            tokens.push(Token::Command(raw.to_ascii_uppercase()));
        } else if let Some(name) = raw.strip_prefix('?') {
            let value = env.get(name).unwrap_or_else(|| {
                log::warn!("path references undefined variable '?{}', using 0", name);
                0.0
            });
            tokens.push(Token::Value(value));
        } else if raw.starts_with('$') {
            let value = env.get(raw).unwrap_or_else(|| {
                log::warn!("path references undefined modifier '{}', using 0", raw);
                0.0
            });
            tokens.push(Token::Value(value));
        } else {
            let value = raw.parse().unwrap_or_else(|_| {
                log::warn!("unparseable path operand '{}', using 0", raw);
                0.0
            });
            tokens.push(Token::Value(value));
        }
    }
    tokens
}

struct Interpreter {
    commands: Vec<PathCommand>,
    x: f64,
    y: f64,
    start_x: f64,
    start_y: f64,
    /// True before the first drawing command and after `N`; the next drawing
    /// command gets an implicit move instead of continuing the old subpath.
    at_subpath_start: bool,
    last: LastCommand,
}

impl Interpreter {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
            x: 0.0,
            y: 0.0,
            start_x: 0.0,
            start_y: 0.0,
            at_subpath_start: true,
            last: LastCommand::None,
        }
    }

    fn implicit_move(&mut self) {
        if self.at_subpath_start {
            self.commands.push(PathCommand::Move {
                x: self.x,
                y: self.y,
            });
            self.start_x = self.x;
            self.start_y = self.y;
            self.at_subpath_start = false;
        }
    }

    fn run(mut self, tokens: &[Token]) -> Vec<PathCommand> {
        let mut i = 0;
        while i < tokens.len() {
            let command = match &tokens[i] {
                Token::Command(c) => {
                    i += 1;
                    c.clone()
                },
                Token::Value(_) => match self.last {
                    // A bare tuple after M continues as lines
                    LastCommand::Move | LastCommand::Line => "L".to_string(),
                    LastCommand::Curve => "C".to_string(),
                    LastCommand::ArcTarget => "X".to_string(),
                    LastCommand::None => {
                        log::warn!("stray path operand with no repeatable command, skipping");
                        i += 1;
                        continue;
                    },
                },
            };

            match command.as_str() {
                "M" => {
                    let Some([x, y]) = take(tokens, i) else { break };
                    i += 2;
                    self.commands.push(PathCommand::Move { x, y });
                    (self.x, self.y) = (x, y);
                    (self.start_x, self.start_y) = (x, y);
                    self.at_subpath_start = false;
                    self.last = LastCommand::Move;
                },
                "L" => {
                    let Some([x, y]) = take(tokens, i) else { break };
                    i += 2;
                    self.implicit_move();
                    self.commands.push(PathCommand::Line { x, y });
                    (self.x, self.y) = (x, y);
                    self.last = LastCommand::Line;
                },
                "C" => {
                    let Some([x1, y1, x2, y2, x, y]) = take(tokens, i) else {
                        break;
                    };
                    i += 6;
                    self.implicit_move();
                    self.commands.push(PathCommand::Curve {
                        x1,
                        y1,
                        x2,
                        y2,
                        x,
                        y,
                    });
                    (self.x, self.y) = (x, y);
                    self.last = LastCommand::Curve;
                },
                "Z" => {
                    self.commands.push(PathCommand::Close);
                    (self.x, self.y) = (self.start_x, self.start_y);
                    self.last = LastCommand::None;
                },
                "N" => {
                    self.commands.push(PathCommand::EndSubpath);
                    self.at_subpath_start = true;
                    self.last = LastCommand::None;
                },
                // Quarter-ellipse corner: radii derive from the distance to
                // the target, sweep fixed counter-clockwise
                "X" | "Y" => {
                    let Some([x, y]) = take(tokens, i) else { break };
                    i += 2;
                    self.implicit_move();
                    self.commands.push(PathCommand::Arc {
                        rx: (x - self.x).abs(),
                        ry: (y - self.y).abs(),
                        large_arc: false,
                        sweep: false,
                        x,
                        y,
                    });
                    (self.x, self.y) = (x, y);
                    self.last = LastCommand::ArcTarget;
                },
                "U" => {
                    let Some([cx, cy, rx, ry, start_deg, end_deg]) = take(tokens, i) else {
                        break;
                    };
                    i += 6;
                    self.angle_ellipse(cx, cy, rx, ry, start_deg, end_deg);
                    self.last = LastCommand::None;
                },
                other => {
                    log::warn!("unknown path command '{}', skipping", other);
                    self.last = LastCommand::None;
                },
            }
        }
        self.commands
    }

    /// `U cx cy rx ry startDeg endDeg`: join onto the arc's start point,
    /// then sweep to the end angle. A full revolution cannot be expressed
    /// as a single SVG arc, so spans of 360° or more split at the antipodal
    /// point into two arcs.
    fn angle_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, start_deg: f64, end_deg: f64) {
        let start = start_deg.to_radians();
        let end = end_deg.to_radians();

        let sx = cx + rx * start.cos();
        let sy = cy + ry * start.sin();
        if self.at_subpath_start {
            self.commands.push(PathCommand::Move { x: sx, y: sy });
            (self.start_x, self.start_y) = (sx, sy);
            self.at_subpath_start = false;
        } else {
            self.commands.push(PathCommand::Line { x: sx, y: sy });
        }

        let ex = cx + rx * end.cos();
        let ey = cy + ry * end.sin();

        if (end_deg - start_deg).abs() >= 360.0 {
            let mid = start + std::f64::consts::PI;
            self.commands.push(PathCommand::Arc {
                rx,
                ry,
                large_arc: true,
                sweep: true,
                x: cx + rx * mid.cos(),
                y: cy + ry * mid.sin(),
            });
            self.commands.push(PathCommand::Arc {
                rx,
                ry,
                large_arc: true,
                sweep: true,
                x: ex,
                y: ey,
            });
        } else {
            self.commands.push(PathCommand::Arc {
                rx,
                ry,
                large_arc: (end_deg - start_deg).abs() > 180.0,
                // Clockwise in the Y-down coordinate space, matching
                // LibreOffice output
                sweep: true,
                x: ex,
                y: ey,
            });
        }

        (self.x, self.y) = (ex, ey);
    }
}

/// Read `N` numeric operands at position `i`, or `None` if the path is
/// truncated or a command letter sits in operand position.
fn take<const N: usize>(tokens: &[Token], i: usize) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    for (k, slot) in out.iter_mut().enumerate() {
        match tokens.get(i + k) {
            Some(Token::Value(v)) => *slot = *v,
            _ => {
                log::warn!("truncated path command operands, dropping remainder");
                return None;
            },
        }
    }
    Some(out)
}

/// Translate a raw enhanced-path string into absolute path commands.
pub fn translate(path: &str, env: &VariableEnv) -> Vec<PathCommand> {
    let tokens = tokenize(path, env);
    Interpreter::new().run(&tokens)
}

/// Format a coordinate with two decimals, trailing zeros stripped.
pub(crate) fn fmt_num(value: f64) -> String {
    let mut s = format!("{:.2}", value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/// Render a command sequence as an SVG path `d` attribute.
pub fn to_svg_path(commands: &[PathCommand]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(commands.len());
    for command in commands {
        let mut s = String::new();
        match command {
            PathCommand::Move { x, y } => {
                write!(s, "M {} {}", fmt_num(*x), fmt_num(*y)).unwrap();
            },
            PathCommand::Line { x, y } => {
                write!(s, "L {} {}", fmt_num(*x), fmt_num(*y)).unwrap();
            },
            PathCommand::Curve {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                write!(
                    s,
                    "C {} {} {} {} {} {}",
                    fmt_num(*x1),
                    fmt_num(*y1),
                    fmt_num(*x2),
                    fmt_num(*y2),
                    fmt_num(*x),
                    fmt_num(*y)
                )
                .unwrap();
            },
            PathCommand::Close => s.push('Z'),
            PathCommand::EndSubpath => continue,
            PathCommand::Arc {
                rx,
                ry,
                large_arc,
                sweep,
                x,
                y,
            } => {
                write!(
                    s,
                    "A {} {} 0 {} {} {} {}",
                    fmt_num(*rx),
                    fmt_num(*ry),
                    u8::from(*large_arc),
                    u8::from(*sweep),
                    fmt_num(*x),
                    fmt_num(*y)
                )
                .unwrap();
            },
        }
        parts.push(s);
    }
    parts.join(" ")
}

/// Translate and render in one step.
pub fn convert_path(path: &str, env: &VariableEnv) -> String {
    to_svg_path(&translate(path, env))
}
