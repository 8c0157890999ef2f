/// Engine options fixed at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Seed for the CXNN random source. `None` seeds from OS entropy on every
    /// reset.
    pub seed: Option<u64>,
    /// Treat unknown opcodes as a fault instead of reporting them and moving on.
    pub strict_opcodes: bool,
}

impl Config {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
