use std::collections::HashSet;

use intervue::intervue_storage::generate_storage_name;
use rayon::prelude::*;

#[test]
fn test_ten_thousand_names_are_distinct() {
    let names: Vec<String> = (0..10_000)
        .into_par_iter()
        .map(|_| generate_storage_name("wav"))
        .collect();

    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
}

#[test]
fn test_names_share_only_the_extension() {
    let names: Vec<String> = (0..100)
        .into_par_iter()
        .map(|_| generate_storage_name("mp3"))
        .collect();

    for name in &names {
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "mp3");
        let (millis, token) = stem.split_once('-').unwrap();
        assert!(millis.parse::<u64>().is_ok());
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
