use std::fmt;
use std::ops::RangeInclusive;

use crate::error::ScanError;

/// An inclusive, validated TCP port range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub const WELL_KNOWN: PortRange = PortRange { start: 1, end: 1024 };
    pub const REGISTERED: PortRange = PortRange { start: 1025, end: 49151 };
    pub const PRIVATE: PortRange = PortRange { start: 49152, end: 65535 };
    pub const ALL: PortRange = PortRange { start: 1, end: 65535 };

    /// Rejects port 0, values above 65535 and `start > end`.
    pub fn new(start: u32, end: u32) -> Result<Self, ScanError> {
        let valid = (1..=u32::from(u16::MAX)).contains(&start)
            && (1..=u32::from(u16::MAX)).contains(&end)
            && start <= end;

        if !valid {
            return Err(ScanError::InvalidPortRange { start, end });
        }

        Ok(Self {
            start: start as u16,
            end: end as u16,
        })
    }

    /// Maps the command line range codes: 0 well-known, 1 registered,
    /// 2 private, 3 all.
    pub fn from_code(code: u8) -> Result<Self, ScanError> {
        match code {
            0 => Ok(Self::WELL_KNOWN),
            1 => Ok(Self::REGISTERED),
            2 => Ok(Self::PRIVATE),
            3 => Ok(Self::ALL),
            other => Err(ScanError::InvalidRangeCode(other)),
        }
    }

    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.start..=self.end).contains(&port)
    }

    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Self::WELL_KNOWN => "Well-known ports",
            Self::REGISTERED => "Registered ports",
            Self::PRIVATE => "Private ports",
            Self::ALL => "All ports",
            _ => "Custom range",
        }
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self::WELL_KNOWN
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl IntoIterator for PortRange {
    type Item = u16;
    type IntoIter = RangeInclusive<u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
