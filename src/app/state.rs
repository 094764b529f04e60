use crate::pipeline::RunPhase;

/// Single tagged application phase. Keeping this one value instead of
/// separate processing/report/error flags makes the illegal combinations
/// (e.g. a report while still running) unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppPhase {
    Idle,
    Running(RunPhase),
    Succeeded { report: String },
    Failed { error: String },
}

impl Default for AppPhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl AppPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, AppPhase::Running(_))
    }

    pub fn progress(&self) -> f32 {
        match self {
            AppPhase::Running(RunPhase::ExtractingText { current, total }) => {
                if *total == 0 {
                    0.0
                } else {
                    (*current as f32) / (*total as f32)
                }
            }
            AppPhase::Running(RunPhase::Structuring) => 1.0,
            AppPhase::Succeeded { .. } => 1.0,
            _ => 0.0,
        }
    }

    pub fn status_text(&self) -> String {
        match self {
            AppPhase::Running(phase) => phase.label(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_idle() {
        assert_eq!(AppPhase::default(), AppPhase::Idle);
        assert!(!AppPhase::default().is_running());
    }

    #[test]
    fn extraction_progress_tracks_file_position() {
        let phase = AppPhase::Running(RunPhase::ExtractingText {
            current: 1,
            total: 4,
        });
        assert!(phase.is_running());
        assert_eq!(phase.progress(), 0.25);
        assert_eq!(phase.status_text(), "Extracting text (1/4)");
    }

    #[test]
    fn structuring_fills_the_bar() {
        let phase = AppPhase::Running(RunPhase::Structuring);
        assert_eq!(phase.progress(), 1.0);
        assert_eq!(phase.status_text(), "Generating report");
    }

    #[test]
    fn terminal_phases_are_not_running() {
        assert!(!AppPhase::Succeeded {
            report: "r".to_string()
        }
        .is_running());
        assert!(!AppPhase::Failed {
            error: "e".to_string()
        }
        .is_running());
    }
}
