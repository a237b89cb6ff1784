use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Point;
use crate::foundation::error::{CutoutError, CutoutResult};
use crate::session::editor::EditorSession;
use crate::stroke::brush::EditMode;

/// Pointer id used for scripted drags.
const SCRIPT_POINTER_ID: u64 = 1;

/// Recorded host interactions, replayable against an [`EditorSession`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditScript {
    pub ops: Vec<EditOp>,
}

/// One host interaction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Mode {
        mode: EditMode,
    },
    Brush {
        radius: i64,
    },
    Zoom {
        factor: f64,
    },
    /// A pointer drag in surface coordinates. The first point is the pointer-down.
    Stroke {
        points: Vec<[f64; 2]>,
        /// End with a pointer-cancel instead of a pointer-up.
        #[serde(default)]
        cancel: bool,
    },
    Undo,
    Redo,
    FillAll,
    Clear,
    Reset,
}

/// Outcome counters of [`EditScript::apply`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScriptReport {
    pub ops: usize,
    pub strokes: usize,
    pub undone: usize,
    pub redone: usize,
    /// History underflows (undo/redo with an empty stack).
    pub ignored: usize,
    pub frames_rendered: usize,
}

impl EditScript {
    pub fn from_json_str(s: &str) -> CutoutResult<Self> {
        let script: Self = serde_json::from_str(s)
            .context("parse edit script json")
            .map_err(|e| CutoutError::validation(format!("{e:#}")))?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_path(path: &Path) -> CutoutResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read edit script '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> CutoutResult<()> {
        for (idx, op) in self.ops.iter().enumerate() {
            match op {
                EditOp::Stroke { points, .. } => {
                    if points.is_empty() {
                        return Err(CutoutError::validation(format!(
                            "op {idx}: stroke needs at least one point"
                        )));
                    }
                    if points.iter().flatten().any(|v| !v.is_finite()) {
                        return Err(CutoutError::validation(format!(
                            "op {idx}: stroke points must be finite"
                        )));
                    }
                }
                EditOp::Zoom { factor } if !factor.is_finite() => {
                    return Err(CutoutError::validation(format!(
                        "op {idx}: zoom factor must be finite"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Replay every op against `session`, pumping one preview frame after each.
    #[tracing::instrument(skip(self, session), fields(ops = self.ops.len()))]
    pub fn apply(&self, session: &mut EditorSession) -> CutoutResult<ScriptReport> {
        self.validate()?;
        if !session.is_open() {
            return Err(CutoutError::validation("edit script needs an open source image"));
        }

        let mut report = ScriptReport::default();
        for op in &self.ops {
            match op {
                EditOp::Mode { mode } => session.set_mode(*mode),
                EditOp::Brush { radius } => {
                    session.set_brush_radius(*radius);
                }
                EditOp::Zoom { factor } => {
                    session.set_zoom(*factor);
                }
                EditOp::Stroke { points, cancel } => {
                    let mut pts = points.iter().map(|&[x, y]| Point::new(x, y));
                    if let Some(first) = pts.next() {
                        session.pointer_down(SCRIPT_POINTER_ID, first);
                        for p in pts {
                            session.pointer_move(SCRIPT_POINTER_ID, p);
                        }
                        if *cancel {
                            session.pointer_cancel();
                        } else {
                            session.pointer_up();
                        }
                        report.strokes += 1;
                    }
                }
                EditOp::Undo => {
                    if session.undo() {
                        report.undone += 1;
                    } else {
                        report.ignored += 1;
                    }
                }
                EditOp::Redo => {
                    if session.redo() {
                        report.redone += 1;
                    } else {
                        report.ignored += 1;
                    }
                }
                EditOp::FillAll => {
                    session.fill_all();
                }
                EditOp::Clear => {
                    session.clear();
                }
                EditOp::Reset => {
                    session.reset();
                }
            }
            report.ops += 1;
            if session.pump_frame() {
                report.frames_rendered += 1;
            }
        }
        tracing::debug!(?report, "edit script applied");
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/edit.rs"]
mod tests;
