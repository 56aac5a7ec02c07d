//! Replay trace and outcome

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

/// Replay state after one step
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub step: &'static str,
    pub time_ms: f64,
    pub left: f32,
    pub top: f32,
    /// Index of the focused item
    pub focused: Option<usize>,
    pub animating: bool,
    /// Event response flags, for input steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevent_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub scenario: Option<String>,
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub message: Option<String>,
    pub steps: Vec<StepRecord>,
}

impl ReplayReport {
    pub fn is_failed(&self) -> bool {
        self.status == ReportStatus::Failed
    }

    pub fn write_json<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// One line per step, then the verdict
    pub fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        if let Some(name) = &self.scenario {
            writeln!(writer, "scenario: {name}")?;
        }
        for record in &self.steps {
            let focused = record
                .focused
                .map_or_else(|| "-".to_string(), |i| i.to_string());
            write!(
                writer,
                "{:>3} {:<12} t={:>7.1} left={:>7.1} top={:>7.1} focus={:<3}{}",
                record.index,
                record.step,
                record.time_ms,
                record.left,
                record.top,
                focused,
                if record.animating { " animating" } else { "" },
            )?;
            if record.prevent_default == Some(true) {
                write!(writer, " prevented")?;
            }
            if let Some(note) = &record.note {
                write!(writer, " ({note})")?;
            }
            writeln!(writer)?;
        }

        match (self.status, &self.message) {
            (ReportStatus::Passed, _) => writeln!(writer, "passed")?,
            (ReportStatus::Failed, Some(message)) => writeln!(
                writer,
                "FAILED at step {}: {message}",
                self.failed_step_index.unwrap_or_default()
            )?,
            (ReportStatus::Failed, None) => writeln!(writer, "FAILED")?,
        }
        Ok(())
    }
}
