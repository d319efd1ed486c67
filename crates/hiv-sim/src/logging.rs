use std::error::Error;
use std::str::FromStr;

use tracing::Level;

use crate::config::LoggingConfig;

/// Level implied by repeated `-v` flags, falling back to the config.
pub fn resolve_level(verbosity: u8, config: &LoggingConfig) -> Result<Level, Box<dyn Error>> {
    match verbosity {
        0 => Level::from_str(config.level.trim())
            .map_err(|err| format!("invalid logging.level `{}`: {err}", config.level).into()),
        1 => Ok(Level::DEBUG),
        _ => Ok(Level::TRACE),
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays
/// machine readable.
pub fn init(level: Level, json: bool) -> Result<(), Box<dyn Error>> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder
            .json()
            .try_init()
            .map_err(|err| err as Box<dyn Error>)?;
    } else {
        builder.try_init().map_err(|err| err as Box<dyn Error>)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_config() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_level(0, &config).expect("level"), Level::INFO);
        assert_eq!(resolve_level(1, &config).expect("level"), Level::DEBUG);
        assert_eq!(resolve_level(4, &config).expect("level"), Level::TRACE);
    }

    #[test]
    fn bad_level_is_reported() {
        let config = LoggingConfig {
            level: "loud".into(),
            json: false,
        };
        assert!(resolve_level(0, &config).is_err());
    }
}
