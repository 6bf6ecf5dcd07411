//! Name suggestions for not-found errors.

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let b_len = b.len();

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row = vec![0; b_len + 1];

    for (i, ca) in a.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Find names similar to the given target.
/// Uses prefix matching, suffix matching, and Levenshtein distance.
/// Returns up to 3 matches prioritized by match quality.
pub(crate) fn find_similar<'a, I>(target: &str, existing: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if target.trim().is_empty() {
        return Vec::new();
    }

    let target_lower = target.to_lowercase();
    let mut matches: Vec<(String, usize)> = Vec::new();

    for name in existing {
        let name_lower = name.to_lowercase();

        // Priority 0: target is a prefix of an existing name
        if name_lower.starts_with(&target_lower) && name_lower != target_lower {
            matches.push((name.to_string(), 0));
            continue;
        }

        // Priority 1: target is a suffix of an existing name
        if name_lower.ends_with(&target_lower) {
            matches.push((name.to_string(), 1));
            continue;
        }

        let dist = levenshtein(&target_lower, &name_lower);
        if dist <= 3 && dist > 0 {
            matches.push((name.to_string(), dist + 10));
        }
    }

    matches.sort_by_key(|(_, priority)| *priority);
    matches.into_iter().take(3).map(|(name, _)| name).collect()
}
