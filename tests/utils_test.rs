use playport::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    assert!(!challenge.is_empty());

    // Deterministic
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // URL-safe base64, no padding
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_code_challenge_matches_rfc7636_vector() {
    assert_eq!(
        generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGrSstw-cM"
    );
}

#[test]
fn test_sanitize_filename_replaces_path_separators() {
    assert_eq!(sanitize_filename("AC/DC Best"), "AC_DC Best");
    assert_eq!(sanitize_filename("a\\b/c"), "a_b_c");
}

#[test]
fn test_sanitize_filename_examples() {
    assert_eq!(sanitize_filename("Best Hits: 2022"), "Best Hits_ 2022");
    assert_eq!(sanitize_filename("Classic_Hits-Vol.1"), "Classic_Hits-Vol.1");
    assert_eq!(sanitize_filename("  Chill Vibes  "), "Chill Vibes");
    assert_eq!(sanitize_filename("Rock & Roll!"), "Rock _ Roll_");
    assert_eq!(sanitize_filename("Café Ñandú"), "Café Ñandú");
    assert_eq!(sanitize_filename(""), "");
}

#[test]
fn test_sanitize_filename_replaces_combining_marks_and_symbols() {
    // Vowel signs and the anusvara are marks, not letters
    assert_eq!(sanitize_filename("हिंदी"), "ह__द_");
    // Circled letters are alphabetic but not letters
    assert_eq!(sanitize_filename("Ⓐ Side"), "_ Side");
    assert_eq!(sanitize_filename("Mix ²"), "Mix ²");
    assert_eq!(sanitize_filename("日本 ロック"), "日本 ロック");
}

#[test]
fn test_sanitize_filename_is_idempotent_and_never_contains_slash() {
    let names = [
        "AC/DC",
        "  leading and trailing  ",
        "tabs\tand\nnewlines",
        "../../etc/passwd",
        "emoji 🎵 mix",
        "Best Hits: 2022",
        "////",
        " / ",
    ];

    for name in names {
        let once = sanitize_filename(name);
        assert_eq!(sanitize_filename(&once), once, "not idempotent for {name:?}");
        assert!(!once.contains('/'), "slash left in {once:?}");
        assert!(!once.contains('\\'), "backslash left in {once:?}");
    }
}

#[test]
fn test_dedup_preserving_order_keeps_first_occurrence() {
    let ids = vec!["b", "a", "b", "c", "a"];
    assert_eq!(dedup_preserving_order(ids), vec!["b", "a", "c"]);
}

#[test]
fn test_dedup_preserving_order_handles_empty_and_unique() {
    assert!(dedup_preserving_order(Vec::<String>::new()).is_empty());
    assert_eq!(dedup_preserving_order(vec![3, 1, 2]), vec![3, 1, 2]);
}
