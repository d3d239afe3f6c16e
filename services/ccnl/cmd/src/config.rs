//! Configuration handling for the ccnl utility.
//!
//! This module reads configuration from the shared config file and
//! environment variables, providing a unified configuration interface.

use anyhow::{bail, Result};
use ccnl_wire::{Suite, SuiteSet, MAX_NAME_COMPONENTS, MAX_PACKET_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// ccnl configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CcnlConfig {
    /// Suites this node speaks
    pub enabled_suites: Vec<Suite>,
    /// Suite used when none is given on the command line
    pub default_suite: Suite,
    /// Upper bound for encoded packets in bytes
    pub max_packet_size: usize,
    /// Component capacity of names built from URIs
    pub max_name_components: usize,
}

impl Default for CcnlConfig {
    fn default() -> Self {
        Self {
            enabled_suites: Suite::ALL.to_vec(),
            default_suite: Suite::NdnTlv,
            max_packet_size: MAX_PACKET_SIZE,
            max_name_components: MAX_NAME_COMPONENTS,
        }
    }
}

/// Root configuration structure (matches the YAML structure)
#[derive(Debug, Deserialize)]
struct RootConfig {
    services: Option<ServicesConfig>,
}

#[derive(Debug, Deserialize)]
struct ServicesConfig {
    ccnl: Option<ServiceConfig>,
}

#[derive(Debug, Deserialize)]
struct ServiceConfig {
    args: Option<Vec<String>>,
    config: Option<HashMap<String, String>>,
}

/// Parse a suite name, including the nameless local RPC suite
pub(crate) fn parse_suite(name: &str) -> Option<Suite> {
    match name.trim() {
        "localrpc" => Some(Suite::LocalRpc),
        other => other.parse().ok(),
    }
}

/// Parse a comma separated suite list, skipping unknown names
fn parse_suite_list(value: &str) -> Vec<Suite> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| {
            let suite = parse_suite(s);
            if suite.is_none() {
                warn!("Ignoring unknown suite {:?}", s.trim());
            }
            suite
        })
        .collect()
}

impl CcnlConfig {
    /// Load configuration from file and environment variables
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config = Self::default();

        // Try to read the config file
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(root_config) = serde_yaml::from_str::<RootConfig>(&content) {
                config.apply_root_config(root_config);
                info!("Loaded configuration from {:?}", config_path.as_ref());
            } else {
                warn!("Failed to parse config file {:?}, using defaults", config_path.as_ref());
            }
        } else {
            info!("Config file {:?} not found, using defaults", config_path.as_ref());
        }

        // Override with environment variables
        config.apply_environment_overrides();
        config.validate()?;

        info!(
            "Final ccnl configuration: default_suite={}, enabled={:?}, max_packet_size={}, max_name_components={}",
            config.default_suite, config.enabled_suites, config.max_packet_size, config.max_name_components
        );

        Ok(config)
    }

    /// Enabled suites as a capability set
    pub fn suite_set(&self) -> SuiteSet {
        self.enabled_suites.iter().copied().collect()
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if !self.suite_set().enables(self.default_suite) {
            bail!("default suite {:?} is not enabled", self.default_suite);
        }
        if self.max_packet_size == 0 {
            bail!("max_packet_size must be positive");
        }
        if self.max_name_components < 2 {
            bail!("max_name_components must be at least 2");
        }
        Ok(())
    }

    /// Apply configuration from the root config structure
    fn apply_root_config(&mut self, root_config: RootConfig) {
        if let Some(service) = root_config.services.and_then(|s| s.ccnl) {
            self.apply_service_config(service);
        }
    }

    /// Apply ccnl service specific configuration
    fn apply_service_config(&mut self, service_config: ServiceConfig) {
        if let Some(args) = service_config.args {
            for arg in args {
                if let Some(name) = arg.strip_prefix("--suite=") {
                    match parse_suite(name) {
                        Some(suite) => self.default_suite = suite,
                        None => warn!("Ignoring unknown suite argument {:?}", name),
                    }
                } else if let Some(size) = arg.strip_prefix("--max-packet-size=") {
                    if let Ok(size) = size.parse::<usize>() {
                        self.max_packet_size = size;
                    }
                }
            }
        }

        if let Some(config_map) = service_config.config {
            for (key, value) in config_map {
                match key.as_str() {
                    "services.ccnl.default_suite" => match parse_suite(&value) {
                        Some(suite) => self.default_suite = suite,
                        None => warn!("Ignoring unknown default suite {:?}", value),
                    },
                    "services.ccnl.enabled_suites" => {
                        self.enabled_suites = parse_suite_list(&value);
                    }
                    "services.ccnl.max_packet_size" => {
                        if let Ok(size) = value.parse::<usize>() {
                            self.max_packet_size = size;
                        }
                    }
                    "services.ccnl.max_name_components" => {
                        if let Ok(count) = value.parse::<usize>() {
                            self.max_name_components = count;
                        }
                    }
                    _ => {
                        // Ignore unknown configuration keys
                    }
                }
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_environment_overrides(&mut self) {
        if let Ok(name) = std::env::var("CCNL_SUITE") {
            if let Some(suite) = parse_suite(&name) {
                self.default_suite = suite;
                info!("Default suite overridden by environment: {}", name);
            }
        }

        if let Ok(list) = std::env::var("CCNL_ENABLED_SUITES") {
            self.enabled_suites = parse_suite_list(&list);
            info!("Enabled suites overridden by environment: {:?}", self.enabled_suites);
        }

        if let Ok(size) = std::env::var("CCNL_MAX_PACKET_SIZE") {
            if let Ok(size) = size.parse::<usize>() {
                self.max_packet_size = size;
                info!("Max packet size overridden by environment: {}", size);
            }
        }
    }
}
