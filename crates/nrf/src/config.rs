use std::ffi::OsStr;
use std::time::Duration;

use nrf_core::DEFAULT_DOWNTIME;

/// Downtime per bounce, in whole seconds.
pub const DOWNTIME_ENV: &str = "NRF_BOUNCE_SEC";

/// Read the bounce downtime from `NRF_BOUNCE_SEC`.
///
/// Unset means 20 s. A value that is not a non-negative integer (`"abc"`,
/// `"-5"`, `" 5"`) silently becomes zero.
pub fn downtime_from_env() -> Duration {
    downtime_from(std::env::var_os(DOWNTIME_ENV).as_deref())
}

fn downtime_from(value: Option<&OsStr>) -> Duration {
    match value {
        None => DEFAULT_DOWNTIME,
        Some(raw) => {
            let secs = raw.to_str().and_then(|s| s.parse().ok()).unwrap_or(0);
            Duration::from_secs(secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::ffi::OsStrExt;

    use super::*;

    fn downtime(value: &str) -> Duration {
        downtime_from(Some(OsStr::new(value)))
    }

    #[test]
    fn numeric_value_is_seconds() {
        assert_eq!(downtime("5"), Duration::from_secs(5));
        assert_eq!(downtime("0"), Duration::ZERO);
        assert_eq!(downtime("3600"), Duration::from_secs(3600));
    }

    #[test]
    fn unset_uses_default() {
        assert_eq!(downtime_from(None), Duration::from_secs(20));
    }

    #[test]
    fn non_numeric_becomes_zero() {
        // Latent gap: a typo disables the downtime instead of falling back to 20 s.
        assert_eq!(downtime("abc"), Duration::ZERO);
    }

    #[test]
    fn malformed_numbers_become_zero() {
        for value in ["-5", " 5", "5s", "1.5", ""] {
            assert_eq!(downtime(value), Duration::ZERO, "value: {value:?}");
        }
    }

    #[test]
    fn non_utf8_becomes_zero() {
        assert_eq!(
            downtime_from(Some(OsStr::from_bytes(&[0x35, 0xff]))),
            Duration::ZERO
        );
    }
}
