//! Language tag handling and reply text shaping.

/// Language used when none was detected or given.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Display form of a detected language code. Mandarin in simplified script is reported as
/// `cmn-Hans-CN` by recognizers and shown as `zh-cn`; every other code is kept.
pub fn normalize_language_code(code: &str) -> String {
    let code = code.trim();
    if code.eq_ignore_ascii_case("cmn-hans-cn") {
        "zh-cn".to_string()
    } else {
        code.to_string()
    }
}

/// Primary subtag of a language tag: `en-US` → `en`. Empty input gives [`DEFAULT_LANGUAGE`].
pub fn primary_subtag(tag: &str) -> String {
    match tag.trim().split('-').next() {
        Some(primary) if !primary.is_empty() => primary.to_string(),
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}

/// Shapes model output for synthesis: each `.` becomes a line break so the voice pauses,
/// surrounding whitespace is trimmed.
pub fn prepare_for_voice(response: &str) -> String {
    response.replace('.', "\n").trim().to_string()
}
