use std::fmt;

/// Per-round left-rotation amounts from RFC 1321.
#[rustfmt::skip]
pub(crate) const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22,
    5,  9, 14, 20, 5,  9, 14, 20, 5,  9, 14, 20, 5,  9, 14, 20,
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23,
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Per-round additive constants from RFC 1321.
#[rustfmt::skip]
pub(crate) const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// MD5 chaining state.
///
/// [`Default`] yields the RFC 1321 initial value; the digest of a message is
/// the state left after absorbing all of its padded blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            a: 0x67452301,
            b: 0xefcdab89,
            c: 0x98badcfe,
            d: 0x10325476,
        }
    }
}

impl State {
    /// Absorb one 512-bit block: a single RFC 1321 compression.
    #[must_use]
    pub fn update(self, m: &[u32; 16]) -> Self {
        let Self {
            mut a,
            mut b,
            mut c,
            mut d,
        } = self;

        let round = |a: u32, b: u32, f: u32, g: usize, i: usize| {
            let t = f
                .wrapping_add(a)
                .wrapping_add(K[i])
                .wrapping_add(m[g])
                .rotate_left(S[i]);
            b.wrapping_add(t)
        };

        for i in 0..16 {
            let f = (b & c) | (!b & d);
            (a, b, c, d) = (d, round(a, b, f, i, i), b, c);
        }
        for i in 16..32 {
            let f = (d & b) | (!d & c);
            (a, b, c, d) = (d, round(a, b, f, (5 * i + 1) % 16, i), b, c);
        }
        for i in 32..48 {
            let f = b ^ c ^ d;
            (a, b, c, d) = (d, round(a, b, f, (3 * i + 5) % 16, i), b, c);
        }
        for i in 48..64 {
            let f = c ^ (b | !d);
            (a, b, c, d) = (d, round(a, b, f, (7 * i) % 16, i), b, c);
        }

        Self {
            a: self.a.wrapping_add(a),
            b: self.b.wrapping_add(b),
            c: self.c.wrapping_add(c),
            d: self.d.wrapping_add(d),
        }
    }

    /// The 16 digest bytes: words A..D serialized little-endian.
    #[must_use]
    pub fn digest(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        for (chunk, word) in out.chunks_exact_mut(4).zip([self.a, self.b, self.c, self.d]) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }
}

/// Standard MD5 hex: each word printed byte-reversed, 8 lowercase digits.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in [self.a, self.b, self.c, self.d] {
            write!(f, "{:08x}", word.swap_bytes())?;
        }
        Ok(())
    }
}

/// MD5 of a whole byte sequence, padding included.
///
/// The search itself only ever compresses single pre-framed blocks; this is
/// for reporting the final digest and for checking framed output against
/// reference implementations.
///
/// ```
/// assert_eq!(md5rush::kernel::md5(b"abc").to_string(), "900150983cd24fb0d6963f7d28e17f72");
/// ```
pub fn md5(data: &[u8]) -> State {
    let mut state = State::default();
    let mut blocks = data.chunks_exact(64);
    for block in blocks.by_ref() {
        state = state.update(&block_words(block));
    }

    let tail = blocks.remainder();
    let mut buf = [0u8; 128];
    buf[..tail.len()].copy_from_slice(tail);
    buf[tail.len()] = 0x80;
    let nbits = (data.len() as u64).wrapping_mul(8);
    // One trailing block unless the marker and length no longer fit.
    let end = if tail.len() < 56 { 64 } else { 128 };
    buf[end - 8..end].copy_from_slice(&nbits.to_le_bytes());

    state = state.update(&block_words(&buf[..64]));
    if end == 128 {
        state = state.update(&block_words(&buf[64..]));
    }
    state
}

fn block_words(block: &[u8]) -> [u32; 16] {
    let mut words = [0u32; 16];
    for (word, bytes) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes(bytes.try_into().unwrap());
    }
    words
}
