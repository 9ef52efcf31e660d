use form_pilot::text::{
    normalize::{normalize, normalize_opt, tokenize},
    similarity::{breakdown, contains_ratio, jaccard, lcs_ratio, similarity, word_overlap},
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =========================================================================
// normalize
// =========================================================================

#[test]
fn normalize_lowercases_and_strips_punctuation() {
    assert_eq!(normalize("  Hello,   World! "), "hello world");
    assert_eq!(normalize("E-mail (work)"), "e mail work");
    assert_eq!(normalize("Price: $100"), "price 100");
    assert_eq!(normalize("What's your name?"), "what s your name");
}

#[test]
fn normalize_applies_compatibility_forms() {
    assert_eq!(normalize("ＡＢＣ　１２３"), "abc 123", "Full-width letters, digits and space");
    assert_eq!(normalize("ﬁle"), "file", "Ligature");
    assert_eq!(normalize("a\u{00a0}b"), "a b", "No-break space");
    assert_eq!(normalize("\u{feff}name"), "name", "Byte order mark");
}

#[test]
fn normalize_keeps_non_latin_letters() {
    assert_eq!(normalize("電子郵件：地址"), "電子郵件 地址");
    assert_eq!(normalize("Dirección"), "dirección");
}

#[test]
fn normalize_empty_and_absent() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize(" ,.;!? "), "");
    assert_eq!(normalize_opt(None), "");
    assert_eq!(normalize_opt(Some("Hi!")), "hi");
}

#[test]
fn normalize_is_idempotent() {
    let samples = [
        "  Hello,   World! ",
        "ＡＢＣ　１２３",
        "ℌello — “quoted” text…",
        "Straße №5",
        "\t tabs\nand\r\nlines ",
        "",
    ];
    for s in samples {
        let once = normalize(s);
        assert_eq!(normalize(&once), once, "normalize twice differs for {:?}", s);
    }
}

#[test]
fn tokenize_yields_unique_tokens() {
    let tokens = tokenize("Name, name and NAME!");
    assert_eq!(tokens.len(), 2);
    assert!(tokens.contains("name"));
    assert!(tokens.contains("and"));
    assert!(tokenize("  ").is_empty());
}

// =========================================================================
// similarity
// =========================================================================

#[test]
fn identical_text_scores_one() {
    assert!(close(similarity("Email", "email"), 1.0));
    assert!(close(similarity("Your full name", "your  FULL name!"), 1.0));
}

#[test]
fn empty_input_scores_zero() {
    assert_eq!(similarity("", ""), 0.0);
    assert_eq!(similarity("name", ""), 0.0);
    assert_eq!(jaccard("", ""), 0.0);
    assert_eq!(lcs_ratio("", "abc"), 0.0);
    assert_eq!(contains_ratio("abc", ""), 0.0);
    assert_eq!(word_overlap("", "phone"), 0.0);
}

#[test]
fn similarity_stays_in_unit_interval() {
    let pairs = [
        ("Email address", "Your Email"),
        ("Phone", "Telephone number"),
        ("a", "b"),
        ("什麼是你的名字", "你的名字"),
        ("Favorite colors", "Favourite colour"),
    ];
    for (a, b) in pairs {
        let s = similarity(a, b);
        assert!((0.0..=1.0).contains(&s), "{} vs {} = {}", a, b, s);
    }
}

#[test]
fn jaccard_is_symmetric() {
    let pairs = [("first name", "name first last"), ("email", "e mail"), ("a b c", "c d")];
    for (a, b) in pairs {
        assert!(close(jaccard(a, b), jaccard(b, a)));
    }
    assert!(close(jaccard("a b c", "c d"), 0.25));
}

#[test]
fn lcs_ratio_is_a_subsequence_not_a_substring() {
    // abcbdab / bdcaba share "bcba"
    assert!(close(lcs_ratio("abcbdab", "bdcaba"), 4.0 / 7.0));
    assert!(close(lcs_ratio("bdcaba", "abcbdab"), 4.0 / 7.0));
}

#[test]
fn lcs_ratio_handles_long_titles() {
    let heading = "question ".repeat(300);
    let label = format!("{}extra", "question ".repeat(200));

    // the 200 shared words and their spaces, then "e" and "t" of "extra"
    assert!(close(lcs_ratio(&heading, &label), 1802.0 / 2699.0));
}

#[test]
fn lcs_ratio_uses_longer_length() {
    assert!(close(lcs_ratio("apple pie", "apple"), 5.0 / 9.0));
    assert!(close(lcs_ratio("apple", "apple pie"), 5.0 / 9.0));
}

#[test]
fn contains_ratio_requires_literal_substring() {
    assert!(close(contains_ratio("quick brown fox", "brown"), 5.0 / 15.0));
    assert!(close(contains_ratio("brown", "quick brown fox"), 5.0 / 15.0));
    assert_eq!(contains_ratio("quick brown fox", "brwn"), 0.0);
}

#[test]
fn breakdown_of_email_titles() {
    let parts = breakdown("Email address", "Your Email");
    assert!(close(parts.jaccard, 1.0 / 3.0));
    assert!(close(parts.lcs_ratio, 5.0 / 13.0));
    assert_eq!(parts.contains_ratio, 0.0);
    assert!(close(parts.score, 0.5 / 3.0 + 0.3 * 5.0 / 13.0));
    assert!(parts.score > 0.28 && parts.score < 0.29);
}

#[test]
fn word_overlap_matches_partial_tokens() {
    // "telephone" contains "phone"; short tokens are ignored.
    assert!(close(word_overlap("Preferred contact telephone", "Phone"), 1.0 / 3.0));
    assert!(close(word_overlap("Phone no", "telephone"), 1.0));
    assert_eq!(word_overlap("a b c", "a b c"), 0.0);
}
