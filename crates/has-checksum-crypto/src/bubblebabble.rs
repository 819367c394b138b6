//! Bubble Babble binary-to-words encoding.
//!
//! Encodes arbitrary bytes as pronounceable five-letter groups separated by
//! dashes and delimited by `x`, e.g. `xesef-disof-gytuf-katof-movif-baxux`.
//! The output matches the `bubblebabble` encoding offered by OpenSSH.
//!
//! ## Usage
//!
//! ```
//! use has_checksum_crypto::bubblebabble;
//!
//! assert_eq!(bubblebabble::encode(b""), "xexax");
//! assert_eq!(bubblebabble::encode(b"1234567890"), "xesef-disof-gytuf-katof-movif-baxux");
//! ```

const VOWELS: &[u8; 6] = b"aeiouy";
const CONSONANTS: &[u8; 17] = b"bcdfghklmnprstvzx";

/// Encodes `data` as Bubble Babble words.
pub fn encode(data: &[u8]) -> String {
    let rounds = data.len() / 2 + 1;
    let mut out = String::with_capacity(rounds * 6 + 2);
    let mut seed: usize = 1;

    out.push('x');

    let mut pairs = data.chunks(2);
    for _ in 0..rounds {
        match pairs.next() {
            Some(&[first, second]) => {
                push_tuple(&mut out, first, seed);
                out.push(consonant(usize::from(second >> 4) & 15));
                out.push('-');
                out.push(consonant(usize::from(second) & 15));
                seed = (seed * 5 + usize::from(first) * 7 + usize::from(second)) % 36;
            }
            Some(&[last]) => push_tuple(&mut out, last, seed),
            _ => {
                // Even-length input ends with a seed-only tuple.
                out.push(vowel(seed % 6));
                out.push(consonant(16));
                out.push(vowel(seed / 6));
            }
        }
    }

    out.push('x');
    out
}

fn push_tuple(out: &mut String, byte: u8, seed: usize) {
    let byte = usize::from(byte);
    out.push(vowel((((byte >> 6) & 3) + seed) % 6));
    out.push(consonant((byte >> 2) & 15));
    out.push(vowel(((byte & 3) + seed / 6) % 6));
}

fn vowel(index: usize) -> char {
    char::from(VOWELS[index])
}

fn consonant(index: usize) -> char {
    char::from(CONSONANTS[index])
}
