//! CV programming configuration
//!
//! Ranges, defaults, step sizes and tick thresholds for a programming
//! session.  Two target profiles exist: constrained handhelds limit direct
//! CV programming to CV 1..255, larger targets allow 1..1024.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::events::ProgrammingMode;
use crate::numeric::FieldRange;

/// Hardware profile selecting the direct-mode CV range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetProfile {
    /// Small controller, direct CV programming limited to CV 1..255.
    Constrained,
    /// Full range, CV 1..1024 in both modes.
    Extended,
}

impl TargetProfile {
    /// Highest CV number reachable in direct (programming track) mode.
    pub const fn direct_cv_max(self) -> u16 {
        match self {
            Self::Constrained => 255,
            Self::Extended => 1024,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvConfig {
    // --- Ranges ---
    /// Direct-mode CV range profile
    pub profile: TargetProfile,
    /// First CV number, also the default after start or reset
    pub cv_number_min: u16,
    /// Highest CV number in POM mode
    pub pom_cv_max: u16,
    /// Default (and lowest) CV value
    pub cv_value_min: u8,
    /// Highest CV value
    pub cv_value_max: u8,
    /// Default (and lowest) POM locomotive address
    pub pom_address_min: u16,
    /// Highest POM locomotive address
    pub pom_address_max: u16,

    // --- Entry ---
    /// Step applied by a push-turn of the rotary encoder
    pub coarse_step: u16,

    // --- Timing ---
    /// Interval between `update` ticks from the driver (milliseconds)
    pub update_interval_ms: u32,
    /// Ticks to wait for a read result before giving up
    pub read_timeout_ticks: u16,
    /// Ticks to wait for a direct write result before offering a retry
    pub write_timeout_ticks: u16,
}

impl Default for CvConfig {
    fn default() -> Self {
        Self::for_profile(TargetProfile::Extended)
    }
}

impl CvConfig {
    /// Stock configuration for a target profile.
    pub fn for_profile(profile: TargetProfile) -> Self {
        Self {
            profile,
            cv_number_min: 1,
            pom_cv_max: 1024,
            cv_value_min: 0,
            cv_value_max: 255,
            pom_address_min: 1,
            pom_address_max: 9999,

            coarse_step: 10,

            update_interval_ms: 500, // 2 Hz
            read_timeout_ticks: 40,  // 20 s
            write_timeout_ticks: 20, // 10 s
        }
    }

    /// CV number range for the given session mode.
    pub fn cv_number_range(&self, mode: ProgrammingMode) -> FieldRange {
        let max = match mode {
            ProgrammingMode::CvDirect => self.profile.direct_cv_max(),
            ProgrammingMode::ProgramOnMain => self.pom_cv_max,
        };
        FieldRange::new(self.cv_number_min, max)
    }

    pub fn cv_value_range(&self) -> FieldRange {
        FieldRange::new(u16::from(self.cv_value_min), u16::from(self.cv_value_max))
    }

    pub fn pom_address_range(&self) -> FieldRange {
        FieldRange::new(self.pom_address_min, self.pom_address_max)
    }

    /// Read timeout in seconds, for log output.
    pub fn read_timeout_secs(&self) -> f32 {
        self.ticks_to_secs(self.read_timeout_ticks)
    }

    /// Write timeout in seconds, for log output.
    pub fn write_timeout_secs(&self) -> f32 {
        self.ticks_to_secs(self.write_timeout_ticks)
    }

    fn ticks_to_secs(&self, ticks: u16) -> f32 {
        f32::from(ticks) * self.update_interval_ms as f32 / 1000.0
    }

    /// Reject values that would break the range invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cv_number_min == 0 {
            return Err(ConfigError::ValidationFailed("cv_number_min must be >= 1"));
        }
        if self.cv_number_min >= self.profile.direct_cv_max() {
            return Err(ConfigError::ValidationFailed(
                "cv_number_min must be below the profile CV maximum",
            ));
        }
        if self.pom_cv_max <= self.cv_number_min {
            return Err(ConfigError::ValidationFailed("pom_cv_max must exceed cv_number_min"));
        }
        if self.cv_value_max <= self.cv_value_min {
            return Err(ConfigError::ValidationFailed("cv_value_max must exceed cv_value_min"));
        }
        if self.pom_address_min == 0 || self.pom_address_max <= self.pom_address_min {
            return Err(ConfigError::ValidationFailed(
                "pom address range must be non-empty and start at >= 1",
            ));
        }
        if self.coarse_step < 2 {
            return Err(ConfigError::ValidationFailed("coarse_step must be >= 2"));
        }
        if self.update_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("update_interval_ms must be > 0"));
        }
        if self.read_timeout_ticks == 0 || self.write_timeout_ticks == 0 {
            return Err(ConfigError::ValidationFailed("timeouts must be > 0 ticks"));
        }
        Ok(())
    }
}
