//! Separator-first text splitting with overlap.

use std::collections::VecDeque;

use tracing::debug;

use crate::core::config::ChunkingConfig;
use crate::core::errors::ChatResult;

/// Split long text into an ordered sequence of chunks.
pub trait Splitter: Send + Sync {
    /// Split `text` into chunks. Identical input always yields identical output.
    fn split(&self, text: &str) -> Vec<String>;
}

/// Byte span of a non-empty piece between separators, with its length in characters.
#[derive(Clone, Copy, Debug)]
struct Piece {
    start: usize,
    end: usize,
    chars: usize,
}

/// Splits on a separator, then greedily merges pieces up to the chunk size.
///
/// Consecutive chunks keep up to `chunk_overlap` characters of trailing pieces.
/// A piece longer than the chunk size is cut into overlapping character windows.
/// Every chunk is a substring of the input.
#[derive(Clone, Debug)]
pub struct CharacterTextSplitter {
    separator: String,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl CharacterTextSplitter {
    /// Create a splitter from chunking settings.
    ///
    /// # Errors
    /// Returns an error if the size is zero or the overlap is not smaller than the size.
    pub fn new(config: &ChunkingConfig) -> ChatResult<Self> {
        config.validate()?;
        Ok(Self {
            separator: config.separator.clone(),
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })
    }

    fn pieces(&self, text: &str) -> Vec<Piece> {
        if self.separator.is_empty() {
            return text
                .char_indices()
                .map(|(start, c)| Piece {
                    start,
                    end: start + c.len_utf8(),
                    chars: 1,
                })
                .collect();
        }

        let mut pieces = Vec::new();
        let mut start = 0_usize;
        for (idx, _) in text.match_indices(self.separator.as_str()) {
            if idx > start {
                pieces.push(Piece {
                    start,
                    end: idx,
                    chars: text[start..idx].chars().count(),
                });
            }
            start = idx + self.separator.len();
        }
        if start < text.len() {
            pieces.push(Piece {
                start,
                end: text.len(),
                chars: text[start..].chars().count(),
            });
        }
        pieces
    }

    fn emit(text: &str, window: &VecDeque<Piece>, chunks: &mut Vec<String>) {
        if let (Some(first), Some(last)) = (window.front(), window.back()) {
            let chunk = text[first.start..last.end].trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
        }
    }

    fn split_by_chars(&self, piece: &str, chunks: &mut Vec<String>) {
        let bounds: Vec<usize> = piece
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(piece.len()))
            .collect();
        let char_count = bounds.len() - 1;
        let step = self.chunk_size - self.chunk_overlap;

        let mut start = 0_usize;
        while start < char_count {
            let end = (start + self.chunk_size).min(char_count);
            let window = &piece[bounds[start]..bounds[end]];
            if !window.trim().is_empty() {
                chunks.push(window.to_string());
            }
            if end >= char_count {
                break;
            }
            start += step;
        }
    }
}

impl Splitter for CharacterTextSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let separator_chars = self.separator.chars().count();
        let joiner = |window: &VecDeque<Piece>| {
            if window.is_empty() { 0 } else { separator_chars }
        };

        let mut chunks = Vec::new();
        let mut window: VecDeque<Piece> = VecDeque::new();
        let mut total = 0_usize;

        for piece in self.pieces(text) {
            if piece.chars > self.chunk_size {
                debug!(
                    "Piece of {} chars exceeds chunk size {}, splitting by characters",
                    piece.chars, self.chunk_size
                );
                Self::emit(text, &window, &mut chunks);
                window.clear();
                total = 0;
                self.split_by_chars(&text[piece.start..piece.end], &mut chunks);
                continue;
            }

            if total + piece.chars + joiner(&window) > self.chunk_size {
                Self::emit(text, &window, &mut chunks);
                while total > self.chunk_overlap
                    || (!window.is_empty()
                        && total + piece.chars + joiner(&window) > self.chunk_size)
                {
                    let Some(front) = window.pop_front() else {
                        break;
                    };
                    total = total.saturating_sub(front.chars + joiner(&window));
                }
            }

            total += piece.chars + joiner(&window);
            window.push_back(piece);
        }

        Self::emit(text, &window, &mut chunks);
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(separator: &str, chunk_size: usize, chunk_overlap: usize) -> CharacterTextSplitter {
        CharacterTextSplitter {
            separator: separator.to_string(),
            chunk_size,
            chunk_overlap,
        }
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let config = ChunkingConfig {
            separator: "\n\n".to_string(),
            chunk_size: 10,
            chunk_overlap: 10,
        };
        assert!(CharacterTextSplitter::new(&config).is_err());
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = splitter("\n\n", 200, 50).split("  Hello world  ");
        assert_eq!(chunks, vec!["Hello world"]);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(splitter("\n\n", 200, 50).split("").is_empty());
        assert!(splitter("\n\n", 200, 50).split("\n\n\n\n").is_empty());
    }

    #[test]
    fn test_merges_pieces_with_overlap() {
        let chunks = splitter("\n\n", 10, 4).split("aaaa\n\nbbbb\n\ncccc");
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "bbbb\n\ncccc"]);
    }

    #[test]
    fn test_no_separator_falls_back_to_character_windows() {
        let text: String = (0..900)
            .map(|i| char::from(b'a' + u8::try_from(i % 26).unwrap_or(0)))
            .collect();
        let chunks = splitter("\n\n", 200, 50).split(&text);

        assert_eq!(chunks.len(), 6);
        assert_eq!(chunks[0].chars().count(), 200);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().skip(pair[0].chars().count() - 50).collect();
            let head: String = pair[1].chars().take(50).collect();
            assert_eq!(tail, head);
        }

        let mut rebuilt = chunks[0].clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.chars().skip(50));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_deterministic_output() {
        let text = "First paragraph about rust.\n\nSecond paragraph about pdfs.\n\n".repeat(20);
        let s = splitter("\n\n", 80, 20);
        assert_eq!(s.split(&text), s.split(&text));
    }

    #[test]
    fn test_chunks_are_substrings_of_input() {
        let text = "Intro line.\n\n\n\nA much longer paragraph that keeps going for a while.\n\nÉtude finale — ünïcødé.\n\n"
            .repeat(5);
        for chunk in splitter("\n\n", 60, 15).split(&text) {
            assert!(text.contains(&chunk), "chunk not found in input: {chunk:?}");
        }
    }

    #[test]
    fn test_multibyte_windows_respect_char_boundaries() {
        let text = "é".repeat(25);
        let chunks = splitter("\n\n", 10, 3).split(&text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.len(), 4);
    }
}
