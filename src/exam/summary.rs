use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTrigger {
    Manual,
    TimeExpired,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub total: usize,
    pub answered_count: usize,
    pub unanswered_count: usize,
    pub marked_count: usize,
    pub elapsed_secs: u32,
    pub remaining_secs: u32,
    pub trigger: SubmitTrigger,
}

impl ExamSummary {
    pub fn completion_percent(&self) -> f64 {
        percent(self.answered_count, self.total)
    }
}

pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// How answering keeps up with the clock, shown next to the progress bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pace {
    Ahead,
    OnTrack,
    Behind,
}

/// Allowed gap between answered share and elapsed share before the pace changes.
const PACE_TOLERANCE: f64 = 0.1;

impl Pace {
    pub fn assess(answered: usize, total: usize, elapsed_secs: u32, duration_secs: u32) -> Self {
        if total == 0 || duration_secs == 0 {
            return Pace::OnTrack;
        }
        let answered_share = answered as f64 / total as f64;
        let time_share = elapsed_secs as f64 / duration_secs as f64;
        let gap = answered_share - time_share;
        if gap > PACE_TOLERANCE {
            Pace::Ahead
        } else if gap < -PACE_TOLERANCE {
            Pace::Behind
        } else {
            Pace::OnTrack
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Pace::Ahead => "pace.ahead",
            Pace::OnTrack => "pace.on_track",
            Pace::Behind => "pace.behind",
        }
    }
}

/// `mm:ss`, minutes zero-padded and allowed past 59.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
