// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Newtype generators for ids and counts.

/// Declares a typed id over an unsigned integer, so sensor ids, actuator ids
/// and layers cannot be mixed up.
///
/// # Example
/// ```
/// use hapnav_structures::define_index;
///
/// define_index!(ProbeId, u32, "Position of a probe on its ring");
///
/// let id = ProbeId::from(3);
/// assert_eq!(*id, 3);
/// assert_eq!(id.as_index(), 3usize);
/// assert_eq!(u32::from(id), 3);
/// ```
#[macro_export]
macro_rules! define_index {
    ($name:ident, $inner:ty, $doc:expr) => {
        #[doc = $doc]
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name($inner);

        impl $name {
            pub const fn from(raw: $inner) -> Self {
                Self(raw)
            }

            pub const fn get(&self) -> $inner {
                self.0
            }

            /// For indexing slices laid out by id
            pub const fn as_index(&self) -> usize {
                self.0 as usize
            }
        }

        impl std::ops::Deref for $name {
            type Target = $inner;

            fn deref(&self) -> &$inner {
                &self.0
            }
        }

        impl From<$inner> for $name {
            fn from(raw: $inner) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> $inner {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// Declares a count that is checked to be at least one when built.
///
/// # Example
/// ```
/// use hapnav_structures::define_nonzero_count;
///
/// define_nonzero_count!(RayCount, u32, "Rays per cone");
///
/// let rays = RayCount::new(5).unwrap();
/// assert_eq!(*rays, 5);
/// assert_eq!(rays.ids().count(), 5);
/// assert!(RayCount::try_from(0).is_err());
/// ```
#[macro_export]
macro_rules! define_nonzero_count {
    ($name:ident, $base:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name($base);

        impl $name {
            /// # Errors
            /// `BadParameters` for zero.
            pub fn new(count: $base) -> Result<Self, $crate::NavDataError> {
                if count == 0 {
                    return Err($crate::NavDataError::BadParameters(format!(
                        "{} must be at least 1",
                        stringify!($name)
                    )));
                }
                Ok(Self(count))
            }

            /// `0..count`
            pub fn ids(&self) -> std::ops::Range<$base> {
                0..self.0
            }
        }

        impl TryFrom<$base> for $name {
            type Error = $crate::NavDataError;

            fn try_from(count: $base) -> Result<Self, Self::Error> {
                Self::new(count)
            }
        }

        impl From<$name> for $base {
            fn from(count: $name) -> $base {
                count.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = $base;

            fn deref(&self) -> &$base {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::define_index!(TestId, u8, "test id");
    crate::define_nonzero_count!(TestCount, u16, "test count");

    #[test]
    fn test_index_conversions() {
        let id = TestId::from(7);
        assert_eq!(id.get(), 7);
        assert_eq!(id.as_index(), 7);
        assert_eq!(id.to_string(), "7");
        assert!(TestId::from(1) < TestId::from(2));
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = TestCount::new(0).unwrap_err();
        assert!(err.to_string().contains("TestCount must be at least 1"));
        assert_eq!(u16::from(TestCount::new(3).unwrap()), 3);
        assert_eq!(TestCount::new(3).unwrap().ids().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
