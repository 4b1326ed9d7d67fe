use std::fmt;

/// A strongly-typed byte size.
///
/// Base-2 (KiB, MiB) since it is used to budget resident memory.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSize(u64);

impl ByteSize {
    pub const ZERO: Self = Self(0);
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    pub const fn from_mib(mib: u64) -> Self {
        Self(mib.saturating_mul(Self::MIB))
    }

    /// Footprint of a decoded RGBA8 bitmap.
    pub const fn rgba(width: u32, height: u32) -> Self {
        Self((width as u64).saturating_mul(height as u64).saturating_mul(4))
    }

    pub const fn as_bytes(self) -> u64 {
        self.0
    }

    pub fn as_mib(self) -> f64 {
        self.0 as f64 / Self::MIB as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// 90% of `self`, the level eviction drains down to.
    pub fn low_water_mark(self) -> Self {
        Self(self.0.saturating_sub(self.0 / 10))
    }
}

impl fmt::Debug for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= Self::MIB {
            write!(f, "{:.1} MiB", self.as_mib())
        } else if self.0 >= Self::KIB {
            write!(f, "{:.1} KiB", self.0 as f64 / Self::KIB as f64)
        } else {
            write!(f, "{} B", self.0)
        }
    }
}
