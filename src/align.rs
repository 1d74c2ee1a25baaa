/// Returns true when `value` has exactly one bit set.
#[inline]
pub const fn is_power_of_two(value: usize) -> bool {
    value != 0 && (value & (value - 1)) == 0
}

/// Rounds `address` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two. Because of that the remainder can be
/// taken with a mask instead of a modulus. The result is never smaller than
/// `address` and skips fewer than `alignment` bytes.
///
/// This is the unchecked primitive: a non power of two is not detected here.
/// The allocators check alignments according to their
/// [`ValidationMode`](crate::config::ValidationMode) and bump with
/// [`checked_align_up`].
///
/// # Panics
///
/// If `alignment` is zero or the result would overflow, in every build.
#[inline]
pub const fn align_up(address: usize, alignment: usize) -> usize {
    match checked_align_up(address, alignment) {
        Some(aligned) => aligned,
        None => panic!("align_up: zero alignment or address overflow"),
    }
}

/// Like [`align_up`] but returns `None` instead of overflowing.
///
/// A zero alignment yields `None` rather than underflowing the mask.
#[inline]
pub const fn checked_align_up(address: usize, alignment: usize) -> Option<usize> {
    if alignment == 0 {
        return None;
    }
    let modulo = address & (alignment - 1);
    if modulo == 0 {
        Some(address)
    } else {
        address.checked_add(alignment - modulo)
    }
}
