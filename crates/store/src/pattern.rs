//! Glob-to-LIKE pattern translation.
//!
//! User-facing patterns use `*`/`?` wildcards with backslash escapes and
//! optional `^`/`$` anchors; the store matches them with a case-insensitive
//! `LIKE ... ESCAPE '\'` predicate.

/// Sentinels hide `\\`, `\*` and `\?` from the generic `*`/`?` substitution.
/// The substitutions below depend on being applied in this exact order.
const HIDDEN_BACKSLASH: char = '\u{1}';
const HIDDEN_STAR: char = '\u{2}';
const HIDDEN_QMARK: char = '\u{3}';

/// Convert a glob pattern to an SQL LIKE pattern.
///
/// `*` becomes `%`, `?` becomes `_`, a literal `%` is escaped, and escaped
/// wildcards (`\*`, `\?`, `\\`) pass through untouched. Unless the pattern
/// is anchored with a leading `^` or trailing `$`, a `%` is added on the
/// corresponding side.
pub fn glob_to_like(pattern: &str) -> String {
    let hidden_backslash = HIDDEN_BACKSLASH.to_string();
    let hidden_star = HIDDEN_STAR.to_string();
    let hidden_qmark = HIDDEN_QMARK.to_string();
    let out = pattern
        .replace(r"\\", &hidden_backslash)
        .replace(r"\*", &hidden_star)
        .replace(r"\?", &hidden_qmark)
        .replace('%', r"\%")
        .replace('?', "_")
        .replace('*', "%")
        .replace(HIDDEN_BACKSLASH, r"\\")
        .replace(HIDDEN_STAR, r"\*")
        .replace(HIDDEN_QMARK, r"\?");

    let out = match out.strip_prefix('^') {
        Some(rest) => rest.to_string(),
        None => format!("%{out}"),
    };
    match out.strip_suffix('$') {
        Some(rest) => rest.to_string(),
        None => format!("{out}%"),
    }
}

#[cfg(test)]
mod tests {
    use super::glob_to_like;
    use pretty_assertions::assert_eq;

    #[test]
    fn star_becomes_percent() {
        assert_eq!(glob_to_like("Selenium*"), "%Selenium%%");
    }

    #[test]
    fn question_mark_becomes_underscore() {
        assert_eq!(glob_to_like("?lick"), "%_lick%");
    }

    #[test]
    fn unanchored_pattern_is_wrapped() {
        assert_eq!(glob_to_like("click"), "%click%");
    }

    #[test]
    fn anchors_suppress_wrapping() {
        assert_eq!(glob_to_like("^Exact$"), "Exact");
        assert_eq!(glob_to_like("^Open"), "Open%");
        assert_eq!(glob_to_like("Window$"), "%Window");
    }

    #[test]
    fn literal_percent_is_escaped() {
        assert_eq!(glob_to_like("50% off"), r"%50\% off%");
    }

    #[test]
    fn escaped_wildcards_survive() {
        assert_eq!(glob_to_like(r"a\*b"), r"%a\*b%");
        assert_eq!(glob_to_like(r"a\?b"), r"%a\?b%");
        assert_eq!(glob_to_like(r"a\\b"), r"%a\\b%");
    }

    #[test]
    fn escaped_star_is_not_rewritten_by_star_rule() {
        // The sentinel pass must hide \* before * -> % runs.
        assert_eq!(glob_to_like(r"\**"), r"%\*%%");
    }
}
