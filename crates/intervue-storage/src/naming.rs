use chrono::Utc;
use rand::{RngCore, rngs::OsRng};

/// Random bytes per name; hex-encoded to 32 characters.
pub const TOKEN_BYTES: usize = 16;

/// Builds `<unix-millis>-<32 hex chars>.<extension>`.
///
/// `extension` must already be whitelisted; nothing else from the client is
/// used.
pub fn generate_storage_name(extension: &str) -> String {
    let mut token = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut token);

    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        hex::encode(token),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_name_format() {
        let name = generate_storage_name("wav");

        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "wav");

        let (millis, token) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_names_are_distinct() {
        let names: HashSet<String> = (0..1_000).map(|_| generate_storage_name("mp3")).collect();
        assert_eq!(names.len(), 1_000);
    }
}
