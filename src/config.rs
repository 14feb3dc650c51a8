#[derive(Debug, Clone, Copy)]
pub struct CenterStarConfig {
    /// Evaluate center candidates on the rayon pool
    pub parallel: bool,
}

impl Default for CenterStarConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl CenterStarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
