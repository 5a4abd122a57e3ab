/// Window and overlap sizes, in words, for document chunking.
pub const CHUNK_SIZE_WORDS: usize = 800;
pub const CHUNK_OVERLAP_WORDS: usize = 100;

/// Split text into overlapping word windows. The last window may be
/// shorter; consecutive windows share `overlap` words.
pub fn split_into_chunks(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end == words.len() {
            break;
        }
        start += step;
    }

    chunks
}
