//! The byte mixer applied to the tail of the config block of a Cenfis
//! airspace file.
//!
//! The transform is a position-keyed XOR, so applying it twice gives
//! the original bytes back. The exact key schedule is pinned by a
//! golden-byte test; a device that expects a different schedule only
//! needs this one function swapped out.

const KEY: [u8; 8] = [0x65, 0xd2, 0x3a, 0x81, 0x4c, 0xf7, 0x29, 0xb8];

/// Mix `buffer` in place.
pub fn cenfis_encrypt(buffer: &mut [u8]) {
    for (i, b) in buffer.iter_mut().enumerate() {
        *b ^= KEY[i % KEY.len()].rotate_left((i % 7) as u32);
    }
}

/// The inverse of [`cenfis_encrypt`]. XOR with the same keystream is
/// an involution.
pub fn cenfis_decrypt(buffer: &mut [u8]) {
    cenfis_encrypt(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_bytes() {
        let mut buffer = [0x00, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01];
        cenfis_encrypt(&mut buffer);
        assert_eq!(
            buffer,
            [0x65, 0xa4, 0xe9, 0x0d, 0xc5, 0xff, 0x4b, 0xb9]
        );
    }

    #[test]
    fn roundtrip() {
        let original: Vec<u8> = (0..0xe2).map(|i| i as u8).collect();
        let mut buffer = original.clone();
        cenfis_encrypt(&mut buffer);
        assert_ne!(buffer, original);
        cenfis_decrypt(&mut buffer);
        assert_eq!(buffer, original);
    }
}
