//! Engine configuration: board size, palette, retry caps and session timing.

use crate::tile::Base;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    /// Number of base kinds in play (taken from the front of [`Base::ALL`]).
    pub kinds: usize,
    /// Retries when generating a match-free starting board.
    pub fill_attempt_cap: u32,
    /// Retries when reshuffling a deadlocked board.
    pub shuffle_attempt_cap: u32,
    pub session_secs: u32,
    /// Idle time before a hint becomes due.
    pub hint_delay_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            kinds: Base::ALL.len(),
            fill_attempt_cap: 100,
            shuffle_attempt_cap: 50,
            session_secs: 60,
            hint_delay_secs: 5,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must be at least 3x3, got {rows}x{cols}")]
    BoardTooSmall { rows: usize, cols: usize },
    #[error("need between 2 and {max} base kinds, got {got}")]
    Kinds { got: usize, max: usize },
    #[error("{0} must be at least 1")]
    ZeroCap(&'static str),
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < 3 || self.cols < 3 {
            return Err(ConfigError::BoardTooSmall {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let max = Base::ALL.len();
        if !(2..=max).contains(&self.kinds) {
            return Err(ConfigError::Kinds {
                got: self.kinds,
                max,
            });
        }
        if self.fill_attempt_cap == 0 {
            return Err(ConfigError::ZeroCap("fill_attempt_cap"));
        }
        if self.shuffle_attempt_cap == 0 {
            return Err(ConfigError::ZeroCap("shuffle_attempt_cap"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_eight_by_eight() {
        let c = EngineConfig::default();
        assert_eq!((c.rows, c.cols, c.kinds), (8, 8, 6));
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn rejects_unusable_settings() {
        let small = EngineConfig {
            rows: 2,
            ..EngineConfig::default()
        };
        assert_eq!(
            small.validate(),
            Err(ConfigError::BoardTooSmall { rows: 2, cols: 8 })
        );
        let kinds = EngineConfig {
            kinds: 7,
            ..EngineConfig::default()
        };
        assert!(matches!(kinds.validate(), Err(ConfigError::Kinds { got: 7, .. })));
        let cap = EngineConfig {
            shuffle_attempt_cap: 0,
            ..EngineConfig::default()
        };
        assert_eq!(
            cap.validate(),
            Err(ConfigError::ZeroCap("shuffle_attempt_cap"))
        );
    }
}
