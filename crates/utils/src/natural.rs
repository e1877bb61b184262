use regex::Regex;
use std::cmp::Ordering;

#[allow(clippy::expect_used)]
static DIGIT_RUNS: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"[0-9]+").expect("Failed to compile DIGIT_RUNS regex"));

/// Alternating text and digit runs. Always starts and ends with a (possibly empty) text run.
fn chunks(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for m in DIGIT_RUNS.find_iter(s) {
        parts.push(&s[last..m.start()]);
        parts.push(m.as_str());
        last = m.end();
    }
    parts.push(&s[last..]);
    parts
}

fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Numeric-aware, case-insensitive ordering: `img9` sorts before `img10`.
///
/// Keys that compare equal (`img01` and `img1`, `A` and `a`) fall back to a plain
/// byte comparison so the result is a total order.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);

    for (idx, (l, r)) in left.iter().zip(right.iter()).enumerate() {
        let ord = if idx % 2 == 1 {
            cmp_numeric(l, r)
        } else {
            l.to_lowercase().cmp(&r.to_lowercase())
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

pub fn natural_sort<T: AsRef<str>>(items: &mut [T]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}
