//! Ready-made cast functions for attribute aliases

use std::convert::Infallible;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;
use time::OffsetDateTime;

/// Cast signature accepted by [`AttrAlias`](crate::AttrAlias)
pub type Cast<T, E> = fn(&str) -> Result<T, E>;

/// Identity cast
pub fn text(raw: &str) -> Result<String, Infallible> {
    Ok(raw.to_string())
}

/// Cast through [`FromStr`]
pub fn parsed<T: FromStr>(raw: &str) -> Result<T, T::Err> {
    raw.parse()
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TimestampError {
    #[error("invalid unix timestamp '{raw}': {source}")]
    Parse { raw: String, source: ParseIntError },
    #[error("unix timestamp out of range: {0}")]
    Range(i64),
}

/// Seconds since the epoch (as nmap writes `starttime`/`endtime`) to a UTC datetime
pub fn unix_timestamp(raw: &str) -> Result<OffsetDateTime, TimestampError> {
    let seconds: i64 = raw.trim().parse().map_err(|source| TimestampError::Parse {
        raw: raw.to_string(),
        source,
    })?;
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| TimestampError::Range(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parsed() {
        assert_eq!(parsed::<u16>("22"), Ok(22));
        assert!(parsed::<u16>("ssh").is_err());
    }

    #[test]
    fn test_unix_timestamp() {
        assert_eq!(
            unix_timestamp("1700000000"),
            Ok(datetime!(2023-11-14 22:13:20 UTC))
        );
    }

    #[test]
    fn test_unix_timestamp_errors() {
        assert!(matches!(
            unix_timestamp("soon"),
            Err(TimestampError::Parse { .. })
        ));
        assert_eq!(
            unix_timestamp("9223372036854775807"),
            Err(TimestampError::Range(i64::MAX))
        );
    }
}
