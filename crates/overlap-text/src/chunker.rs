use overlap_core::error::{Error, Result};

/// Split `text` on whitespace runs and return every window of `k`
/// consecutive words, rejoined with single spaces, in order of occurrence.
/// Fewer than `k` words yields no chunks.
pub fn chunk(text: &str, k: usize) -> Result<Vec<String>> {
    let words: Vec<&str> = text.split_whitespace().collect();
    chunk_words(&words, k)
}

pub fn chunk_words(words: &[&str], k: usize) -> Result<Vec<String>> {
    if k == 0 { return Err(Error::InvalidChunkSize(k)); }
    Ok(words.windows(k).map(|w| w.join(" ")).collect())
}
