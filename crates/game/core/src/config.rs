/// Tunable limits of the turn engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Rule firings allowed in one group per turn before the group is cut
    /// short. Only badly authored, oscillating rule sets ever reach it.
    pub max_rewrites_per_group: usize,
}

impl EngineConfig {
    pub const DEFAULT_MAX_REWRITES_PER_GROUP: usize = 10_000;

    pub fn new() -> Self {
        Self {
            max_rewrites_per_group: Self::DEFAULT_MAX_REWRITES_PER_GROUP,
        }
    }

    pub fn with_max_rewrites_per_group(max_rewrites_per_group: usize) -> Self {
        Self {
            max_rewrites_per_group: max_rewrites_per_group.max(1),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
