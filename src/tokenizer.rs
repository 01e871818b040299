//! Splitting a cleaned address into tail-first tokens.

/// Tokens of an address in reverse order, plus the structural hint the
/// classifiers use to tell whether city and state were comma separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    /// Whitespace tokens, last token of the address first
    pub reversed: Vec<String>,
    /// Number of comma separated segments in the period-free address
    pub comma_segment_count: usize,
}

/// Strip periods, count comma segments, drop commas and split on whitespace,
/// returning the tokens tail first.
pub fn tokenize(address: &str) -> Tokens {
    let address = address.trim().replace('.', "");
    let comma_segment_count = address.split(',').count();
    let reversed = address
        .replace(',', "")
        .split_whitespace()
        .rev()
        .map(str::to_string)
        .collect();

    Tokens {
        reversed,
        comma_segment_count,
    }
}
