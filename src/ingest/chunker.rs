//! Overlapping character windows over report text

use super::error::IngestError;

/// Split `text` into windows of `size` characters, a new window starting
/// every `size - overlap` characters. The last window may be shorter.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<Vec<String>, IngestError> {
    if size == 0 || overlap >= size {
        return Err(IngestError::InvalidSettings(format!(
            "chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, size
        )));
    }

    // Byte offset of every char, plus the end of the string
    let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let char_count = offsets.len();
    offsets.push(text.len());

    let step = size - overlap;
    let chunks = (0..char_count)
        .step_by(step)
        .map(|start| {
            let end = (start + size).min(char_count);
            text[offsets[start]..offsets[end]].to_string()
        })
        .collect();

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_overlap() {
        let chunks = chunk_text("abcdefghij", 4, 1).unwrap();
        assert_eq!(chunks, vec!["abcd", "defg", "ghij", "j"]);
    }

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(chunk_text("abc", 2000, 300).unwrap(), vec!["abc"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunk_text("", 2000, 300).unwrap().is_empty());
    }

    #[test]
    fn test_multibyte_boundaries() {
        let chunks = chunk_text("₹₹₹₹₹", 2, 0).unwrap();
        assert_eq!(chunks, vec!["₹₹", "₹₹", "₹"]);
    }

    #[test]
    fn test_default_sizes_stride() {
        let text = "x".repeat(4000);
        let chunks = chunk_text(&text, 2000, 300).unwrap();
        // starts at 0, 1700, 3400
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 2000);
        assert_eq!(chunks[1].len(), 2000);
        assert_eq!(chunks[2].len(), 600);
    }

    #[test]
    fn test_invalid_overlap() {
        assert!(matches!(
            chunk_text("abc", 10, 10),
            Err(IngestError::InvalidSettings(_))
        ));
        assert!(chunk_text("abc", 0, 0).is_err());
    }
}
