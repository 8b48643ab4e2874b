use std::collections::HashSet;

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::config::{RetailerConfig, TrackerConfig};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub tracker: TrackerConfig,
    pub retailers: Vec<RetailerConfig>,
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PRICEINTEL"))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let app: AppConfig = config
            .try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        app.validate()?;
        Ok(app)
    }

    /// Startup-time checks. An empty retailer set is fatal: there is nothing
    /// meaningful to collect.
    pub fn validate(&self) -> Result<()> {
        if self.retailers.is_empty() {
            return Err(Error::EmptyConfiguration);
        }

        let mut seen = HashSet::new();
        for retailer in &self.retailers {
            if !seen.insert(retailer.name.as_str()) {
                return Err(Error::DuplicateRetailer(retailer.name.clone()));
            }
            if retailer.fallback_price <= 0.0 {
                return Err(Error::ConfigError(format!(
                    "fallback price for {} must be positive, got {}",
                    retailer.name, retailer.fallback_price
                )));
            }
        }

        if self.tracker.poll_interval.is_zero() {
            return Err(Error::ConfigError("poll_interval must be non-zero".into()));
        }
        if self.tracker.retention_max_readings == 0 {
            return Err(Error::ConfigError(
                "retention_max_readings must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retailer(name: &str, fallback: f64) -> RetailerConfig {
        RetailerConfig {
            name: name.to_string(),
            locator: format!("https://example.test/{}", name),
            fallback_price: fallback,
        }
    }

    #[test]
    fn empty_retailer_set_is_fatal() {
        let app = AppConfig {
            tracker: TrackerConfig::default(),
            retailers: vec![],
        };
        assert!(matches!(app.validate(), Err(Error::EmptyConfiguration)));
    }

    #[test]
    fn duplicate_retailer_names_are_rejected() {
        let app = AppConfig {
            tracker: TrackerConfig::default(),
            retailers: vec![retailer("Amazon.de", 1299.0), retailer("Amazon.de", 1300.0)],
        };
        assert!(matches!(app.validate(), Err(Error::DuplicateRetailer(_))));
    }

    #[test]
    fn non_positive_fallback_price_is_rejected() {
        let app = AppConfig {
            tracker: TrackerConfig::default(),
            retailers: vec![retailer("Zalando", 0.0)],
        };
        assert!(matches!(app.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn well_formed_config_passes() {
        let app = AppConfig {
            tracker: TrackerConfig::default(),
            retailers: vec![retailer("Amazon.de", 1299.0), retailer("Zalando", 1249.0)],
        };
        assert!(app.validate().is_ok());
    }
}
