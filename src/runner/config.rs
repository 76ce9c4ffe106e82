//! Engine configuration.

/// Configuration for the resolution engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Rewrite class-private names (`__x`) to class-scoped keys at registration.
    pub mangle_private_names: bool,
    /// Maximum number of classes the engine accepts. None means unlimited.
    pub max_classes: Option<usize>,
}

impl EngineConfig {
    /// Mangling on, no class limit.
    pub fn unlimited() -> Self {
        EngineConfig {
            mangle_private_names: true,
            max_classes: None,
        }
    }

    /// Mangling on, at most `max_classes` registrations.
    pub fn with_class_limit(max_classes: usize) -> Self {
        EngineConfig {
            mangle_private_names: true,
            max_classes: Some(max_classes),
        }
    }

    pub fn without_mangling(mut self) -> Self {
        self.mangle_private_names = false;
        self
    }

    /// Would registering one more class on top of `registered` be allowed?
    pub fn can_register(&self, registered: usize) -> bool {
        match self.max_classes {
            Some(max) => registered < max,
            None => true,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}
