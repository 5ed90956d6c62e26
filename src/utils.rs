use std::{collections::HashSet, hash::Hash, sync::LazyLock};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use sha2::{Digest, Sha256};

// letters and numbers only; combining marks (Mn, Mc) and symbols such as
// circled letters are replaced
static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_\-. ]").expect("filename pattern is valid"));

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Turns a playlist name into a string usable as a file name.
///
/// Each character outside the kept set is replaced by one `_`, then
/// surrounding spaces are trimmed.
///
/// # Kept Characters
///
/// - Unicode letters (`\p{L}`) and numbers (`\p{N}`)
/// - `_`, `-`, `.` and the ASCII space
///
/// Combining marks are not letters, so `"हिंदी"` becomes `"ह__द_"`.
///
/// # Guarantees
///
/// The result never contains `/` or `\`, and sanitising it again changes
/// nothing. The exporter and the importer both derive record file names
/// from this function, so a playlist always maps to the same file.
///
/// # Example
///
/// ```
/// assert_eq!(sanitize_filename("Best Hits: 2022"), "Best Hits_ 2022");
/// assert_eq!(sanitize_filename("AC/DC"), "AC_DC");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_FILENAME_CHARS
        .replace_all(name, "_")
        .trim_matches(' ')
        .to_string()
}

/// Removes repeated items, keeping the first occurrence of each in place.
pub fn dedup_preserving_order<T>(items: Vec<T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
