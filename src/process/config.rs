/*!
 * PCB Subsystem Configuration
 *
 * Runtime sizing of the process table and free pool
 */

use crate::core::errors::{PcbError, PcbResult};
use crate::core::limits::{DEFAULT_POOL_CAPACITY, MAX_PROCS, PID_FIRST_USER, PRIO_MAX};
use crate::core::types::{Pid, Priority};
use serde::{Deserialize, Serialize};

/// PCB subsystem configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PcbConfig {
    /// Slots in the active-process table
    pub max_procs: usize,
    /// Released blocks kept for reuse
    pub pool_capacity: usize,
    /// Seed for the next-PID counter
    pub first_user_pid: Pid,
    /// Largest valid priority value
    pub max_priority: Priority,
}

impl Default for PcbConfig {
    fn default() -> Self {
        Self {
            max_procs: MAX_PROCS,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            first_user_pid: PID_FIRST_USER,
            max_priority: PRIO_MAX,
        }
    }
}

impl PcbConfig {
    /// Small footprint: four table slots
    pub const fn compact() -> Self {
        Self {
            max_procs: 4,
            pool_capacity: 8,
            first_user_pid: PID_FIRST_USER,
            max_priority: PRIO_MAX,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_max_procs(mut self, max_procs: usize) -> Self {
        self.max_procs = max_procs;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_pool_capacity(mut self, pool_capacity: usize) -> Self {
        self.pool_capacity = pool_capacity;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_first_user_pid(mut self, pid: Pid) -> Self {
        self.first_user_pid = pid;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_priority(mut self, prio: Priority) -> Self {
        self.max_priority = prio;
        self
    }

    #[inline]
    pub fn is_valid_priority(&self, prio: Priority) -> bool {
        prio <= self.max_priority
    }

    pub fn validate(&self) -> PcbResult<()> {
        if self.max_procs == 0 {
            return Err(PcbError::InvalidConfig("max_procs must be non-zero".to_string()));
        }
        if self.max_procs > u32::MAX as usize {
            return Err(PcbError::InvalidConfig(format!(
                "max_procs {} exceeds the PCB id range",
                self.max_procs
            )));
        }
        if self.pool_capacity == 0 {
            return Err(PcbError::InvalidConfig(
                "pool_capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Defaults overridden by `KERNEL_MAX_PROCS`, `KERNEL_PCB_POOL`,
    /// `KERNEL_FIRST_PID` and `KERNEL_MAX_PRIO`
    ///
    /// With the `custom_limits` feature the compile-time limits are used as-is.
    pub fn from_env() -> Self {
        let config = Self::default();
        if cfg!(feature = "custom_limits") {
            return config;
        }

        Self {
            max_procs: env_or("KERNEL_MAX_PROCS", config.max_procs),
            pool_capacity: env_or("KERNEL_PCB_POOL", config.pool_capacity),
            first_user_pid: env_or("KERNEL_FIRST_PID", config.first_user_pid),
            max_priority: env_or("KERNEL_MAX_PRIO", config.max_priority),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable configuration value");
            default
        }),
        Err(_) => default,
    }
}
