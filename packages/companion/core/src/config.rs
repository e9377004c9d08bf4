use crate::error::{CompanionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Simulated thinking time before the welcome message.
    pub greeting_delay_ms: u64,
    /// Simulated thinking time before each assistant reply.
    pub reply_delay_ms: u64,
    /// Ignore new input while an assistant reply is pending.
    pub reject_while_busy: bool,
    pub wizard: WizardPolicy,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            greeting_delay_ms: 1000,
            reply_delay_ms: 1000,
            reject_while_busy: true,
            wizard: WizardPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardPolicy {
    /// Start from step 1 with blank fields every time the dialog opens.
    pub reset_on_open: bool,
    /// Block Next/Submit while a required field of the current step is blank.
    pub validate_required: bool,
}

impl Default for WizardPolicy {
    fn default() -> Self {
        Self {
            reset_on_open: true,
            validate_required: false,
        }
    }
}

/// Timing and input policy for one conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub greeting_delay: Duration,
    pub reply_delay: Duration,
    pub reject_while_busy: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        CompanionConfig::default().session_settings()
    }
}

impl CompanionConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded companion config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        const MAX_DELAY_MS: u64 = 60_000;
        if self.greeting_delay_ms > MAX_DELAY_MS || self.reply_delay_ms > MAX_DELAY_MS {
            return Err(CompanionError::Config(format!(
                "delays must not exceed {MAX_DELAY_MS}ms"
            )));
        }
        Ok(())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            greeting_delay: Duration::from_millis(self.greeting_delay_ms),
            reply_delay: Duration::from_millis(self.reply_delay_ms),
            reject_while_busy: self.reject_while_busy,
        }
    }
}
