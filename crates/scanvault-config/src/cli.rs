//! Command-line argument declarations and validation.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{AppConfig, DEFAULT_POLL_INTERVAL};

/// Command-line flags accepted by the scanvault binary.
#[derive(Debug, Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    name = "scanvault",
    about = "Appends scanned input lines to rotating CSV logs and mirrors them onto a removable volume"
)]
pub struct Cli {
    /// Mount the removable volume automatically when it is attached.
    #[arg(long, env = "SCANVAULT_AUTOMOUNT")]
    pub automount: bool,

    /// Include the current date in the log file name (e.g., scans_1970-01-01.csv).
    #[arg(
        long,
        env = "SCANVAULT_DATED_FILE",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub dated_file: bool,

    /// List attached removable volumes, then exit.
    #[arg(long)]
    pub detect_removable_disks: bool,

    /// Directory to write CSV files to.
    #[arg(long, env = "SCANVAULT_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// UUID of the removable volume used to back up scan files.
    ///
    /// Attach the volume and run with --detect-removable-disks to obtain it.
    #[arg(long, env = "SCANVAULT_UUID")]
    pub uuid: Option<String>,

    /// Seconds between backup poll ticks.
    #[arg(
        long,
        env = "SCANVAULT_POLL_INTERVAL_SECS",
        default_value_t = DEFAULT_POLL_INTERVAL.as_secs()
    )]
    pub poll_interval_secs: u64,

    /// Attempt power-off even when the preceding unmount failed.
    #[arg(long)]
    pub power_off_after_failed_unmount: bool,
}

impl Cli {
    /// Parse the process arguments into a [`Cli`] value.
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Validate the parsed flags and freeze them into an [`AppConfig`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a flag value fails validation.
    pub fn into_config(self) -> ConfigResult<AppConfig> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "poll_interval_secs",
                "zero",
                Some(self.poll_interval_secs.to_string()),
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("output_dir", "empty", None));
        }

        let volume_uuid = match self.uuid {
            Some(raw) => {
                let trimmed = raw.trim().to_string();
                if trimmed.is_empty() {
                    return Err(ConfigError::invalid("uuid", "empty", Some(raw)));
                }
                Some(trimmed)
            }
            None => None,
        };

        Ok(AppConfig {
            auto_mount: self.automount,
            dated_file: self.dated_file,
            output_dir: self.output_dir,
            volume_uuid,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            power_off_after_failed_unmount: self.power_off_after_failed_unmount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scanvault").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn defaults_match_reference_flags() {
        let config = parse(&[]).into_config().expect("valid defaults");
        assert!(!config.auto_mount);
        assert!(config.dated_file);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.volume_uuid.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert!(!config.power_off_after_failed_unmount);
    }

    #[test]
    fn dated_file_takes_explicit_value() {
        let config = parse(&["--dated-file", "false"])
            .into_config()
            .expect("valid flags");
        assert!(!config.dated_file);
    }

    #[test]
    fn uuid_is_trimmed() {
        let config = parse(&["--uuid", " 0000-TEST "])
            .into_config()
            .expect("valid flags");
        assert_eq!(config.volume_uuid.as_deref(), Some("0000-TEST"));
    }

    #[test]
    fn blank_uuid_is_rejected() {
        let err = parse(&["--uuid", "  "])
            .into_config()
            .expect_err("blank uuid should fail");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "uuid",
                reason: "empty",
                ..
            }
        ));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let err = parse(&["--poll-interval-secs", "0"])
            .into_config()
            .expect_err("zero interval should fail");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "poll_interval_secs",
                ..
            }
        ));
    }

    #[test]
    fn detect_flag_is_parsed() {
        let cli = parse(&["--detect-removable-disks"]);
        assert!(cli.detect_removable_disks);
    }

    #[test]
    fn detect_flag_is_readable_without_validating_service_flags() {
        // One-shot detection must be reachable even when a service-only flag
        // would fail validation.
        let cli = parse(&["--detect-removable-disks", "--poll-interval-secs", "0"]);
        assert!(cli.detect_removable_disks);
        assert!(cli.into_config().is_err());
    }
}
