/// Score a candidate string against an already-lowercased query.
///
/// Exact matches score 1000. Substring matches score 500 plus a shortness
/// bonus. Otherwise every query character must appear in order; matches
/// earn per-character points with bonuses for consecutive runs and word
/// starts, minus a length-difference penalty. Zero means no match.
pub fn score(candidate: &str, query: &str) -> i64 {
    let candidate = candidate.to_lowercase();
    if candidate == query {
        return 1000;
    }
    if candidate.contains(query) {
        let len = candidate.chars().count() as i64;
        return 500 + (100 - len);
    }
    subsequence_score(&candidate, query)
}

fn subsequence_score(candidate: &str, query: &str) -> i64 {
    let chars: Vec<char> = candidate.chars().collect();
    let mut total: i64 = 0;
    let mut pos = 0usize;
    let mut last_match: Option<usize> = None;

    for qc in query.chars() {
        let mut found = None;
        for (i, &c) in chars.iter().enumerate().skip(pos) {
            if c == qc {
                found = Some(i);
                break;
            }
        }
        let Some(i) = found else {
            return 0;
        };
        total += 10;
        if last_match == Some(i.wrapping_sub(1)) && i > 0 {
            total += 5;
        }
        if i == 0 || chars[i - 1] == ' ' {
            total += 15;
        }
        last_match = Some(i);
        pos = i + 1;
    }

    let len_diff = (chars.len() as i64 - query.chars().count() as i64).abs();
    (total - len_diff).max(0)
}
