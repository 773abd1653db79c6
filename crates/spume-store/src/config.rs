//! Container configuration, validation, and builder.
//!
//! [`ContainerConfig`] is the builder-input for constructing a
//! [`ParticlesContainer`](crate::ParticlesContainer). All values are fixed
//! for the container's lifetime: there is no resizing of `block_size` and
//! no schema mutation after construction.

use spume_core::StoreError;

/// What to do when an attribute name is registered twice for the same kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the first occurrence and its slot; later duplicates are dropped
    /// with a warning.
    #[default]
    FirstWins,
    /// Fail construction with [`StoreError::DuplicateAttribute`].
    Reject,
}

/// Configuration for a particle container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Number of particles one block can hold. Must be at least 1.
    pub block_size: u32,
    /// Scalar attribute names, in slot order.
    pub float_attributes: Vec<String>,
    /// Vector attribute names, in slot order.
    pub vec3_attributes: Vec<String>,
    /// How duplicate names are handled. Default: [`DuplicatePolicy::FirstWins`].
    pub duplicate_policy: DuplicatePolicy,
    /// Upper bound on simultaneously live blocks. `None` = unbounded.
    pub max_blocks: Option<u32>,
}

impl ContainerConfig {
    /// Default block capacity in particles.
    pub const DEFAULT_BLOCK_SIZE: u32 = 1000;

    /// Create a config with the given block size and no attributes.
    pub fn new(block_size: u32) -> Self {
        Self {
            block_size,
            float_attributes: Vec::new(),
            vec3_attributes: Vec::new(),
            duplicate_policy: DuplicatePolicy::default(),
            max_blocks: None,
        }
    }

    /// Start a builder for the given block size.
    pub fn builder(block_size: u32) -> ContainerConfigBuilder {
        ContainerConfigBuilder {
            config: Self::new(block_size),
        }
    }

    /// Validate all structural invariants.
    ///
    /// Duplicate names are not checked here; the schema applies
    /// [`DuplicatePolicy`] when the container is built.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.block_size == 0 {
            return Err(StoreError::InvalidConfig {
                reason: "block_size must be at least 1".to_string(),
            });
        }
        if self.max_blocks == Some(0) {
            return Err(StoreError::InvalidConfig {
                reason: "max_blocks must be at least 1 when set".to_string(),
            });
        }
        if let Some(name) = self
            .float_attributes
            .iter()
            .chain(&self.vec3_attributes)
            .find(|name| name.is_empty())
        {
            return Err(StoreError::InvalidConfig {
                reason: format!("attribute names must be non-empty, got '{name}'"),
            });
        }
        // Each kind is one contiguous allocation of `block_size * count` elements.
        let size = self.block_size as usize;
        for (count, label) in [
            (self.float_attributes.len(), "float"),
            (self.vec3_attributes.len(), "vec3"),
        ] {
            if size.checked_mul(count).is_none() {
                return Err(StoreError::InvalidConfig {
                    reason: format!(
                        "block_size ({size}) * {label} attribute count ({count}) overflows usize"
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLOCK_SIZE)
    }
}

/// Builder for [`ContainerConfig`].
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    /// Register a scalar attribute.
    pub fn float_attribute(mut self, name: impl Into<String>) -> Self {
        self.config.float_attributes.push(name.into());
        self
    }

    /// Register a vector attribute.
    pub fn vec3_attribute(mut self, name: impl Into<String>) -> Self {
        self.config.vec3_attributes.push(name.into());
        self
    }

    /// Set the duplicate-name policy (default: first wins).
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    /// Cap the number of simultaneously live blocks.
    pub fn max_blocks(mut self, max_blocks: u32) -> Self {
        self.config.max_blocks = Some(max_blocks);
        self
    }

    /// Validate and return the config.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if [`ContainerConfig::validate`]
    /// fails.
    pub fn build(self) -> Result<ContainerConfig, StoreError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
