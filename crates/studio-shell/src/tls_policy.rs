//! Process-wide minimum TLS version handed to database drivers.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TlsVersion {
    #[serde(rename = "TLSv1")]
    Tls1_0,
    #[serde(rename = "TLSv1.1")]
    Tls1_1,
    #[serde(rename = "TLSv1.2")]
    Tls1_2,
    #[serde(rename = "TLSv1.3")]
    Tls1_3,
}

impl TlsVersion {
    fn to_raw(self) -> u8 {
        match self {
            TlsVersion::Tls1_0 => 0,
            TlsVersion::Tls1_1 => 1,
            TlsVersion::Tls1_2 => 2,
            TlsVersion::Tls1_3 => 3,
        }
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => TlsVersion::Tls1_0,
            1 => TlsVersion::Tls1_1,
            3 => TlsVersion::Tls1_3,
            _ => TlsVersion::Tls1_2,
        }
    }
}

/// Drivers default to TLS 1.2 until startup lowers the floor.
static MIN_TLS_VERSION: AtomicU8 = AtomicU8::new(2);

pub fn set_min_tls_version(version: TlsVersion) {
    MIN_TLS_VERSION.store(version.to_raw(), Ordering::Release);
}

pub fn min_tls_version() -> TlsVersion {
    TlsVersion::from_raw(MIN_TLS_VERSION.load(Ordering::Acquire))
}
