//! Tests for generated asset names.

use std::collections::HashSet;
use std::sync::Arc;
use stowage_core::{AssetName, Extension, NameGenerator, OwnerId, Upload};

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[test]
fn test_avatar_name_matches_expected_pattern() {
    let upload = Upload::parse("42", "image/png", 1_000_000, "png").unwrap();
    let names = NameGenerator::new("avatar").unwrap();
    let name = names.generate(upload.owner(), upload.extension()).to_string();

    let stem = name.strip_suffix(".png").expect("keeps extension");
    let parts: Vec<&str> = stem.split('-').collect();
    assert_eq!(parts.len(), 4, "{name}");
    assert_eq!(parts[0], "avatar");
    assert_eq!(parts[1], "42");
    assert!(is_digits(parts[2]), "{name}");
    assert!(is_digits(parts[3]), "{name}");
}

#[test]
fn test_same_owner_same_millisecond_still_differs_by_nonce() {
    let names = NameGenerator::new("avatar").unwrap();
    let owner = OwnerId::from(42);
    let ext = Extension::new("png").unwrap();
    let a = names.generate_with(&owner, &ext, 1_700_000_000_000, 1);
    let b = names.generate_with(&owner, &ext, 1_700_000_000_000, 2);
    assert_ne!(a.to_string(), b.to_string());
}

#[test]
fn test_concurrent_generation_produces_distinct_names() {
    let names = Arc::new(NameGenerator::new("avatar").unwrap());
    let handles: Vec<_> = (0..8u64)
        .map(|thread| {
            let names = Arc::clone(&names);
            std::thread::spawn(move || {
                // Four threads per owner, so same-owner names race.
                let owner = OwnerId::from(thread % 2);
                let ext = Extension::new("jpg").unwrap();
                (0..200)
                    .map(|_| names.generate(&owner, &ext).to_string())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for name in handle.join().unwrap() {
            assert!(seen.insert(name.clone()), "duplicate name {name}");
        }
    }
    assert_eq!(seen.len(), 8 * 200);
}

#[test]
fn test_generated_names_round_trip_through_parse() {
    let names = NameGenerator::new("banner").unwrap();
    let owner = OwnerId::new("507f1f77bcf86cd799439011").unwrap();
    let name = names.generate(&owner, &Extension::from_filename("holiday.JPEG").unwrap());
    let parsed = AssetName::parse(&name.to_string()).unwrap();
    assert_eq!(parsed.prefix(), "banner");
    assert_eq!(parsed.owner(), &owner);
    assert_eq!(parsed.extension().as_str(), "JPEG");
    assert_eq!(parsed, name);
}
