//! Projection functors: map an element or key to a slot in the sparse buffer.

/// Maps a value to a small unsigned integer used as a direct index into a
/// sparse buffer.
///
/// The projection must be injective over the live set of a container.
/// Colliding projections are not detected: the second value is treated as
/// already present and silently dropped by `add`.
pub trait Project<T: ?Sized> {
    fn project(&self, value: &T) -> usize;
}

impl<T, F> Project<T> for F
where
    T: ?Sized,
    F: Fn(&T) -> usize,
{
    #[inline]
    fn project(&self, value: &T) -> usize {
        self(value)
    }
}

/// Projects unsigned integers onto themselves. Panics if the value does
/// not fit in `usize`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Identity;

macro_rules! impl_identity {
    ( $( $int:ty ),* ) => {
        $(
            impl Project<$int> for Identity {
                #[inline]
                fn project(&self, value: &$int) -> usize {
                    usize::try_from(*value).expect("projection does not fit in usize")
                }
            }
        )*
    };
}

impl_identity!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_projects_onto_itself() {
        assert_eq!(Identity.project(&7u8), 7);
        assert_eq!(Identity.project(&300u16), 300);
        assert_eq!(Identity.project(&70_000u32), 70_000);
        assert_eq!(Identity.project(&5u64), 5);
        assert_eq!(Identity.project(&0usize), 0);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn identity_u64_max_fits_on_64_bit() {
        assert_eq!(Identity.project(&u64::MAX), usize::MAX);
    }

    #[cfg(not(target_pointer_width = "64"))]
    #[test]
    #[should_panic(expected = "projection does not fit in usize")]
    fn identity_u64_overflow_panics() {
        let _ = Identity.project(&u64::MAX);
    }

    #[test]
    fn closures_are_projections() {
        let halve = |x: &u32| (*x / 2) as usize;
        assert_eq!(Project::<u32>::project(&halve, &10u32), 5);

        let len = |s: &str| s.len();
        assert_eq!(Project::<str>::project(&len, "abc"), 3);
    }
}
