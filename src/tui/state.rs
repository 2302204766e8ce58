use crate::livestock::HerdSummary;
use crate::production::{ChartPoint, MonthlyOverview};
use std::collections::VecDeque;
use std::time::Instant;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Herd,
    Production,
    Animals,
    Logs,
}

impl View {
    pub const ALL: [View; 4] = [View::Herd, View::Production, View::Animals, View::Logs];

    pub fn title(self) -> &'static str {
        match self {
            View::Herd => "Herd",
            View::Production => "Production",
            View::Animals => "Animals",
            View::Logs => "Logs",
        }
    }

    fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimalRow {
    pub tag: String,
    pub name: String,
    pub bucket: String,
    pub age_months: Option<i64>,
    pub pregnant: bool,
    pub sick: bool,
    pub status: String,
    pub dry_period: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub farm_id: Option<i64>,
    pub farm_name: Option<String>,
    pub herd: HerdSummary,
    pub overview: MonthlyOverview,
    pub milk_chart: Vec<ChartPoint>,
    pub animals: Vec<AnimalRow>,
    pub logs: VecDeque<LogEntry>,
    pub last_error: Option<String>,
    pub last_refresh: Option<String>,
    pub loading: bool,
    pub start_time: Instant,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            farm_id: None,
            farm_name: None,
            herd: HerdSummary::default(),
            overview: MonthlyOverview::default(),
            milk_chart: Vec::new(),
            animals: Vec::new(),
            logs: VecDeque::with_capacity(MAX_LOGS),
            last_error: None,
            last_refresh: None,
            loading: false,
            start_time: Instant::now(),
        }
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_cycles() {
        assert_eq!(View::Herd.next(), View::Production);
        assert_eq!(View::Logs.next(), View::Herd);
        assert_eq!(View::Herd.prev(), View::Logs);
    }

    #[test]
    fn test_log_ring_buffer_caps() {
        let mut state = DashboardState::new();
        for i in 0..(MAX_LOGS + 5) {
            state.push_log("INFO", format!("line {}", i));
        }
        assert_eq!(state.logs.len(), MAX_LOGS);
        assert_eq!(state.logs.front().unwrap().message, "line 5");
    }
}
