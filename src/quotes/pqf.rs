use crate::quotes::Quote;

/// Parse the plain-quote format: blank-line-separated blocks where lines
/// starting with `-- ` give the author and everything else is quote text.
/// Multi-line quote text is joined with spaces.
pub fn parse_pqf(data: &str) -> Vec<Quote> {
    let mut quotes = Vec::new();
    let mut text_lines: Vec<&str> = Vec::new();
    let mut author = String::new();

    let mut flush = |text_lines: &mut Vec<&str>, author: &mut String| {
        if !text_lines.is_empty() {
            quotes.push(Quote {
                text: text_lines.join(" "),
                author: std::mem::take(author),
            });
            text_lines.clear();
        } else {
            author.clear();
        }
    };

    for line in data.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            flush(&mut text_lines, &mut author);
        } else if let Some(rest) = line.strip_prefix("-- ") {
            author = rest.trim().to_string();
        } else {
            text_lines.push(line.trim());
        }
    }
    flush(&mut text_lines, &mut author);
    quotes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_quote_with_author() {
        let quotes = parse_pqf("Stay hungry, stay foolish.\n-- Stewart Brand\n");
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "Stay hungry, stay foolish.");
        assert_eq!(quotes[0].author, "Stewart Brand");
    }

    #[test]
    fn test_blocks_separated_by_blank_lines() {
        let quotes = parse_pqf("First quote.\n-- A\n\nSecond quote.\n-- B\n");
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].text, "Second quote.");
        assert_eq!(quotes[1].author, "B");
    }

    #[test]
    fn test_multiline_text_is_joined() {
        let quotes = parse_pqf("Line one\nline two\n-- C\n");
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "Line one line two");
    }

    #[test]
    fn test_missing_author_is_empty() {
        let quotes = parse_pqf("No attribution here.\n");
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].author, "");
    }

    #[test]
    fn test_trailing_block_without_blank_line() {
        let quotes = parse_pqf("A.\n-- X\n\nB.\n-- Y");
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].author, "Y");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_pqf("").is_empty());
        assert!(parse_pqf("\n\n\n").is_empty());
    }
}
