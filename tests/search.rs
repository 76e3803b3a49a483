//! End-to-end hunts through the public API.

use md5::{Digest, Md5};
use md5rush::frame::{bytes_to_words, hunt, words_to_bytes};
use md5rush::{Engine, LeadingZeros};

fn leading_zero_nibbles(digest: &[u8; 16]) -> usize {
    let mut count = 0;
    for &byte in digest {
        if byte >> 4 != 0 {
            return count;
        }
        count += 1;
        if byte & 0x0f != 0 {
            return count;
        }
        count += 1;
    }
    count
}

#[test]
fn zero_target_accepts_the_first_candidate() {
    let engine = Engine::new(1);
    let mut prefix = Vec::new();
    let count = hunt(
        &mut prefix,
        &engine,
        LeadingZeros::new(0).unwrap(),
        &mut |_| {},
    )
    .unwrap();
    assert_eq!(count, 1);
    // One extension word, properly framed: four bytes of output.
    assert_eq!(words_to_bytes(&prefix).len(), 4);
}

#[test]
fn empty_prefix_finds_leading_zero_nibbles() {
    let engine = Engine::new(2);
    let mut prefix = Vec::new();
    hunt(
        &mut prefix,
        &engine,
        LeadingZeros::new(4).unwrap(),
        &mut |_| {},
    )
    .unwrap();

    let digest: [u8; 16] = Md5::digest(words_to_bytes(&prefix)).into();
    assert!(leading_zero_nibbles(&digest) >= 4);
    assert!(hex::encode(digest).starts_with('0'));
}

#[test]
fn thread_counts_both_find_valid_treasure() {
    for workers in [1, 4] {
        let engine = Engine::new(workers);
        let mut prefix = bytes_to_words(b"B04902114");
        hunt(
            &mut prefix,
            &engine,
            LeadingZeros::new(3).unwrap(),
            &mut |_| {},
        )
        .unwrap();

        let digest: [u8; 16] = Md5::digest(words_to_bytes(&prefix)).into();
        assert!(
            leading_zero_nibbles(&digest) >= 3,
            "{workers} workers produced {}",
            hex::encode(digest)
        );
    }
}

#[test]
fn reported_hash_matches_an_external_rehash() {
    let engine = Engine::new(2);
    let file: Vec<u8> = (0u8..70).collect();
    let mut prefix = bytes_to_words(&file);
    assert_eq!(prefix.len(), 18);

    hunt(
        &mut prefix,
        &engine,
        LeadingZeros::new(3).unwrap(),
        &mut |_| {},
    )
    .unwrap();

    // What would be written with -o, re-hashed externally, matches the
    // digest the engine reports.
    let output = words_to_bytes(&prefix);
    assert_eq!(&output[..70], &file[..]);
    let reference: [u8; 16] = Md5::digest(&output).into();
    assert_eq!(md5rush::kernel::md5(&output).digest(), reference);
    assert!(leading_zero_nibbles(&reference) >= 3);
}

#[test]
fn progress_reports_sum_to_the_returned_count() {
    let engine = Engine::new(3);
    let mut prefix = bytes_to_words(b"ticker");
    let mut reported = 0u64;
    let count = hunt(
        &mut prefix,
        &engine,
        LeadingZeros::new(3).unwrap(),
        &mut |n| reported += n,
    )
    .unwrap();
    assert_eq!(reported, count);
    assert!(count >= 1);
}
