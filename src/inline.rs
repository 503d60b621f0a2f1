use regex::Regex;
use std::sync::LazyLock;

static RE_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap());
static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap());
static RE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static RE_STRIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").unwrap());
static RE_BOLD_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static RE_BOLD_UNDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());
static RE_STRAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_`~]").unwrap());

fn strip_once(text: &str) -> String {
    // Images first: the link pattern would otherwise leave the `!` behind.
    let text = RE_IMAGE.replace_all(text, "$1");
    let text = RE_LINK.replace_all(&text, "$1");
    let text = RE_CODE.replace_all(&text, "$1");
    let text = RE_STRIKE.replace_all(&text, "$1");
    let text = RE_BOLD_STAR.replace_all(&text, "$1");
    let text = RE_BOLD_UNDER.replace_all(&text, "$1");
    let text = RE_STRAY.replace_all(&text, "");
    text.trim().to_string()
}

/// Removes inline emphasis, link and code syntax, leaving plain text.
///
/// Substitution repeats until nothing changes, so the result is a fixpoint
/// and `strip_inline(strip_inline(s)) == strip_inline(s)`.
pub fn strip_inline(text: &str) -> String {
    let mut current = strip_once(text);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
