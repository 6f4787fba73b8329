//! Scored attempts and the session's measurement table

use chrono::{DateTime, Local};

use crate::params::Params;
use crate::tolerance::Tolerance;

/// One scored answer attempt, frozen at creation
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    timestamp: DateTime<Local>,
    params: Params,
    computed_value: f64,
    user_answer: f64,
    is_correct: bool,
}

impl Measurement {
    /// Score `user_answer` against `computed_value`, which must be the lab formula
    /// evaluated on exactly `params`.
    pub fn new(
        params: Params,
        computed_value: f64,
        user_answer: f64,
        tolerance: Tolerance,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            is_correct: tolerance.accepts(computed_value, user_answer),
            params,
            computed_value,
            user_answer,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn computed_value(&self) -> f64 {
        self.computed_value
    }

    pub fn user_answer(&self) -> f64 {
        self.user_answer
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    /// Table projection of this attempt
    pub fn row(&self) -> TableRow {
        TableRow {
            time: self.timestamp.format("%H:%M:%S").to_string(),
            params: self.params.summary(),
            answer: format!("{}", self.user_answer),
            computed: format!("{:.2}", self.computed_value),
            verdict: if self.is_correct { "✓" } else { "✗" },
        }
    }
}

/// Display row for the measurement table
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub time: String,
    pub params: String,
    pub answer: String,
    pub computed: String,
    pub verdict: &'static str,
}

/// Aggregate over the current log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub attempts: usize,
    pub correct: usize,
}

impl SessionStats {
    /// Fraction of correct attempts, `None` before the first attempt
    pub fn accuracy(&self) -> Option<f64> {
        (self.attempts > 0).then(|| self.correct as f64 / self.attempts as f64)
    }
}

/// Append-only ordered record of attempts
#[derive(Debug, Clone, Default)]
pub struct MeasurementLog {
    entries: Vec<Measurement>,
}

impl MeasurementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, measurement: Measurement) {
        self.entries.push(measurement);
    }

    /// Drop every entry at once.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Measurement> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.entries.iter()
    }

    pub fn rows(&self) -> Vec<TableRow> {
        self.entries.iter().map(Measurement::row).collect()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            attempts: self.entries.len(),
            correct: self.entries.iter().filter(|m| m.is_correct()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixing_params() -> Params {
        Params::new()
            .with("m1", 120.0)
            .with("t1", 80.0)
            .with("m2", 90.0)
            .with("t2", 20.0)
    }

    #[test]
    fn test_correctness_is_decided_at_creation() {
        let hit = Measurement::new(mixing_params(), 54.29, 54.0, Tolerance::Absolute(0.5));
        let miss = Measurement::new(mixing_params(), 54.29, 56.0, Tolerance::Absolute(0.5));
        assert!(hit.is_correct());
        assert!(!miss.is_correct());
    }

    #[test]
    fn test_row_formatting() {
        let m = Measurement::new(mixing_params(), 54.285714, 54.3, Tolerance::Standard);
        let row = m.row();
        assert_eq!(row.params, "m1=120.0, t1=80.0, m2=90.0, t2=20.0");
        assert_eq!(row.answer, "54.3");
        assert_eq!(row.computed, "54.29");
        assert_eq!(row.verdict, "✓");
        assert_eq!(row.time.len(), 8);
    }

    #[test]
    fn test_log_keeps_order_and_clears_fully() {
        let mut log = MeasurementLog::new();
        for answer in [1.0, 2.0, 3.0] {
            log.push(Measurement::new(Params::new(), 2.0, answer, Tolerance::Standard));
        }
        let answers: Vec<_> = log.iter().map(Measurement::user_answer).collect();
        assert_eq!(answers, [1.0, 2.0, 3.0]);
        assert_eq!(log.stats(), SessionStats { attempts: 3, correct: 1 });

        log.clear();
        assert!(log.is_empty());
        assert!(log.rows().is_empty());
        assert_eq!(log.stats().accuracy(), None);
    }
}
