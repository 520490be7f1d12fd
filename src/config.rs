use crate::error::EngineError;

pub const DEFAULT_MAX_PROTOTYPE_CHAIN_DEPTH: usize = 10_000;

/// Interpreter-wide limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on `[[Prototype]]` links followed by a single lookup or
    /// `isPrototypeOf` walk before a RangeError is thrown.
    pub max_prototype_chain_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_prototype_chain_depth: DEFAULT_MAX_PROTOTYPE_CHAIN_DEPTH,
        }
    }
}

impl Config {
    pub fn with_max_prototype_chain_depth(mut self, depth: usize) -> Self {
        self.max_prototype_chain_depth = depth;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_prototype_chain_depth == 0 {
            return Err(EngineError::Config(
                "max_prototype_chain_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
