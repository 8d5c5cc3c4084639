use std::path::PathBuf;

/// Turn a path pasted or dragged into a terminal into a plain path.
/// Strips surrounding whitespace and quotes, and shell escapes such as `\ `.
pub fn clean_path_input(raw: &str) -> PathBuf {
    let mut s = raw.trim();

    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            s = &s[1..s.len() - 1];
            break;
        }
    }

    // Unescape `\x` to `x` outside Windows, where `\` is the separator.
    if cfg!(windows) {
        return PathBuf::from(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    PathBuf::from(out.trim_end_matches(|c| c == '\r' || c == '\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_quotes() {
        assert_eq!(
            clean_path_input("  '/home/me/Pictures/Trip'  "),
            PathBuf::from("/home/me/Pictures/Trip")
        );
        assert_eq!(
            clean_path_input("\"/tmp/My Album\""),
            PathBuf::from("/tmp/My Album")
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn test_unescapes_spaces() {
        assert_eq!(
            clean_path_input("/tmp/My\\ Album\\ 2019\n"),
            PathBuf::from("/tmp/My Album 2019")
        );
    }
}
