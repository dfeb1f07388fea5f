use regex::Regex;

/// Lowercases `text` and reduces it to letters, digits, hyphens, inner dots
/// and single spaces.
///
/// A dot directly between two letters or digits is kept (`"Node.js"` becomes
/// `"node.js"`); the matcher decides whether it joins one name or separates
/// two words. Any other dot, and any character outside `[a-z0-9-]`, turns into
/// a space, which keeps `"react/redux"` from fusing into one word. Apostrophes
/// are dropped. Total: never fails, and empty input yields empty output.
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            'a'..='z' | '0'..='9' | '-' => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
            '.' if !pending_space
                && out.ends_with(|p: char| p.is_ascii_alphanumeric())
                && chars
                    .get(i + 1)
                    .is_some_and(|n| n.is_ascii_alphanumeric()) =>
            {
                out.push('.');
            }
            '\'' => {}
            _ => pending_space = true,
        }
    }

    out
}

/// Best-effort removal of `/* */` and `//` comments, then whitespace collapse.
///
/// An unterminated block comment swallows the rest of the input. A `//`
/// inside a string literal or URL is treated as a comment as well.
pub fn strip_code_noise(text: &str) -> String {
    let block_re = Regex::new(r"(?s)/\*.*?(?:\*/|\z)").expect("valid regex");
    let line_re = Regex::new(r"//[^\n]*").expect("valid regex");

    let without_blocks = block_re.replace_all(text, " ");
    let without_lines = line_re.replace_all(&without_blocks, " ");

    without_lines.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `text` reads like source code rather than prose.
///
/// Counts lines that open with a comment or import marker or end in `;`,
/// `{` or `}`. Two or more such lines count as code.
pub fn looks_like_code(text: &str) -> bool {
    const LINE_PREFIXES: &[&str] = &["//", "/*", "* ", "#include", "import ", "use ", "def ", "fn "];
    const LINE_SUFFIXES: &[char] = &[';', '{', '}'];

    let signals = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            LINE_PREFIXES.iter().any(|p| line.starts_with(p)) || line.ends_with(LINE_SUFFIXES)
        })
        .take(2)
        .count();

    signals >= 2
}
