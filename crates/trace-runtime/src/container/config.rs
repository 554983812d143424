//! # Runtime Configuration
//!
//! Limits and timeouts for the running core. Every value has a default and
//! can be overridden from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `WT_COLLABORATOR_TIMEOUT_MS` | `2000` |
//! | `WT_MAX_REPORT_REASON_LEN` | `2000` |
//! | `WT_TOKEN_TTL_SECS` | `3600` |
//! | `WT_EVENT_BUS_CAPACITY` | `1000` |
//! | `WT_WITHHELD_CODES` | empty (comma separated) |

use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::UnitCode;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use wt_02_report_triage::DEFAULT_MAX_REASON_LEN;
use wt_03_command_dispatch::DispatchConfig;
use wt_04_verification::VerificationConfig;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable could not be parsed.
    #[error("{var}: cannot parse {value:?}")]
    Unparseable {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// A limit that must be positive was zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    /// A withheld code is not a valid unit code.
    #[error("withheld code {code:?} is invalid: {reason}")]
    InvalidCode {
        /// Raw code
        code: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Bound on every store, ledger and credential call.
    pub collaborator_timeout: Duration,
    /// Maximum report reason length, in characters.
    pub max_report_reason_len: usize,
    /// Lifetime of issued capability tokens.
    pub token_ttl: Duration,
    /// Per-subscriber buffer on the event bus.
    pub event_bus_capacity: usize,
    /// Codes public verification must answer `NotFound` for.
    pub withheld_codes: Vec<UnitCode>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            collaborator_timeout: Duration::from_millis(2000),
            max_report_reason_len: DEFAULT_MAX_REASON_LEN,
            token_ttl: Duration::from_secs(3600),
            event_bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            withheld_codes: Vec::new(),
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Unparseable {
            var,
            value: raw.clone(),
        }),
    }
}

impl RuntimeConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read overrides through `lookup`, then validate.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout_ms = parse(
            &lookup,
            "WT_COLLABORATOR_TIMEOUT_MS",
            defaults.collaborator_timeout.as_millis() as u64,
        )?;
        let ttl_secs = parse(&lookup, "WT_TOKEN_TTL_SECS", defaults.token_ttl.as_secs())?;

        let withheld_codes = lookup("WT_WITHHELD_CODES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(|c| {
                        UnitCode::parse(c).map_err(|e| ConfigError::InvalidCode {
                            code: c.to_string(),
                            reason: e.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let config = Self {
            collaborator_timeout: Duration::from_millis(timeout_ms),
            max_report_reason_len: parse(
                &lookup,
                "WT_MAX_REPORT_REASON_LEN",
                defaults.max_report_reason_len,
            )?,
            token_ttl: Duration::from_secs(ttl_secs),
            event_bus_capacity: parse(
                &lookup,
                "WT_EVENT_BUS_CAPACITY",
                defaults.event_bus_capacity,
            )?,
            withheld_codes,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject zero timeouts, lengths and capacities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collaborator_timeout.is_zero() {
            return Err(ConfigError::Zero("WT_COLLABORATOR_TIMEOUT_MS"));
        }
        if self.max_report_reason_len == 0 {
            return Err(ConfigError::Zero("WT_MAX_REPORT_REASON_LEN"));
        }
        if self.token_ttl.is_zero() {
            return Err(ConfigError::Zero("WT_TOKEN_TTL_SECS"));
        }
        if self.event_bus_capacity == 0 {
            return Err(ConfigError::Zero("WT_EVENT_BUS_CAPACITY"));
        }
        Ok(())
    }

    /// Settings for the command dispatcher.
    pub fn dispatch(&self) -> DispatchConfig {
        DispatchConfig {
            collaborator_timeout: self.collaborator_timeout,
            max_reason_len: self.max_report_reason_len,
        }
    }

    /// Settings for the verification service.
    pub fn verification(&self) -> VerificationConfig {
        VerificationConfig {
            lookup_timeout: self.collaborator_timeout,
        }
    }
}
