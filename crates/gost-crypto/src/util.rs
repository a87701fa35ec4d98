/// XORs `src` into `dst`.
///
/// Only the common prefix of the two slices is touched.
pub(crate) fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Increments `block` as one big-endian integer, wrapping around
/// on overflow.
pub(crate) fn inc_be(block: &mut [u8]) {
    for b in block.iter_mut().rev() {
        *b = b.wrapping_add(1);
        if *b != 0 {
            break;
        }
    }
}
