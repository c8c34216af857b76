use std::collections::VecDeque;

/// Paragraph, line, sentence, word, then character boundaries.
pub const DEFAULT_SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];
pub const DEFAULT_CHUNK_SIZE: usize = 2000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

pub trait TextSplitter {
    fn split_text(&self, text: &str) -> Vec<String>;
}

/// Greedy recursive splitter. Lengths are counted in chars; pieces keep their
/// leading separator so that joining pieces reproduces the source text.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    separators: Vec<&'static str>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.to_vec(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl RecursiveSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, String> {
        if chunk_size == 0 {
            return Err("Chunk size must be greater than zero".to_string());
        }
        if chunk_overlap >= chunk_size {
            return Err(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap, chunk_size
            ));
        }

        Ok(Self {
            separators: DEFAULT_SEPARATORS.to_vec(),
            chunk_size,
            chunk_overlap,
        })
    }

    fn recursive_split(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        let mut separator = separators.last().copied().unwrap_or("");
        let mut remaining: &[&'static str] = &[];

        for (index, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                remaining = &separators[index + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut fitting: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge_pieces(&fitting));
                fitting.clear();
            }

            if remaining.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.recursive_split(&piece, remaining));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge_pieces(&fitting));
        }

        chunks
    }

    /// Packs consecutive pieces into chunks, carrying a tail of at most
    /// `chunk_overlap` chars into the next chunk.
    fn merge_pieces(&self, pieces: &[String]) -> Vec<String> {
        let mut merged = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = join_trimmed(&window) {
                    merged.push(chunk);
                }

                while total > self.chunk_overlap || (total > 0 && total + len > self.chunk_size) {
                    match window.pop_front() {
                        Some((_, front_len)) => total -= front_len,
                        None => break,
                    }
                }
            }

            window.push_back((piece.as_str(), len));
            total += len;
        }

        if let Some(chunk) = join_trimmed(&window) {
            merged.push(chunk);
        }

        merged
    }
}

impl TextSplitter for RecursiveSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.recursive_split(text, &self.separators)
            .into_iter()
            .filter(|chunk| !chunk.trim().is_empty())
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (index, _) in text.match_indices(separator) {
        if index > start {
            pieces.push(text[start..index].to_string());
        }
        start = index;
    }
    if start < text.len() {
        pieces.push(text[start..].to_string());
    }

    pieces
}

fn join_trimmed(window: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(count: usize) -> String {
        (0..count)
            .map(|i| format!("word{:04}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_short_text() {
        let splitter = RecursiveSplitter::default();
        let chunks = splitter.split_text("  Short text\n");

        assert_eq!(chunks, vec!["Short text".to_string()]);
    }

    #[test]
    fn test_blank_text_yields_nothing() {
        let splitter = RecursiveSplitter::default();
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text(" \n\n \t ").is_empty());
    }

    #[test]
    fn test_paragraphs_preferred_over_words() {
        let splitter = RecursiveSplitter::new(30, 5).unwrap();
        let text = "This is a test.\n\nThis is another paragraph.\n\nAnd a third one.";
        let chunks = splitter.split_text(text);

        assert_eq!(
            chunks,
            vec![
                "This is a test.".to_string(),
                "This is another paragraph.".to_string(),
                "And a third one.".to_string(),
            ]
        );
    }

    #[test]
    fn test_chunks_respect_maximum_length() {
        let splitter = RecursiveSplitter::default();
        let mut text = String::new();
        for paragraph in 0..12 {
            text.push_str(&numbered_words(150 + paragraph * 20));
            text.push_str(". ");
            text.push_str(&"x".repeat(2600));
            text.push_str("\n\n");
        }

        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 12);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= DEFAULT_CHUNK_SIZE, "chunk too long");
        }
    }

    #[test]
    fn test_multibyte_text_is_measured_in_chars() {
        let splitter = RecursiveSplitter::new(10, 2).unwrap();
        let chunks = splitter.split_text(&"é".repeat(35));

        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.first().map(|c| c.chars().count()), Some(10));
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let splitter = RecursiveSplitter::default();
        let text = numbered_words(1200);
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let (earlier, later) = (&pair[0], &pair[1]);
            let first_word = later.split(' ').next().unwrap();
            let tail: String = {
                let chars: Vec<char> = earlier.chars().collect();
                let start = chars.len().saturating_sub(DEFAULT_CHUNK_OVERLAP + 1);
                chars[start..].iter().collect()
            };

            assert!(
                tail.contains(first_word),
                "{} not carried over from previous chunk",
                first_word
            );
        }
    }

    #[test]
    fn test_overlap_is_whole_pieces_only() {
        let splitter = RecursiveSplitter::default();
        let text = (0..60)
            .map(|i| format!("Sentence {:03} {}", i, "lorem ipsum ".repeat(12).trim_end()))
            .collect::<Vec<_>>()
            .join(". ");
        let sentence_numbers = |chunk: &str| -> Vec<usize> {
            chunk
                .split("Sentence ")
                .skip(1)
                .filter_map(|rest| rest.get(..3).and_then(|n| n.parse().ok()))
                .collect()
        };

        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let earlier = sentence_numbers(&pair[0]);
            let later = sentence_numbers(&pair[1]);

            // Every sentence is longer than the overlap, so nothing is carried over.
            assert_eq!(later.first().copied(), earlier.last().map(|n| n + 1));
        }
    }

    #[test]
    fn test_chunks_reassemble_in_order() {
        let splitter = RecursiveSplitter::new(50, 0).unwrap();
        let text = numbered_words(60);
        let chunks = splitter.split_text(&text);

        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_splitting_is_deterministic() {
        let splitter = RecursiveSplitter::default();
        let text = format!(
            "{}\n\n{}. {}\n{}",
            numbered_words(300),
            numbered_words(500),
            "y".repeat(4100),
            numbered_words(90)
        );

        let first = splitter.split_text(&text);
        let second = splitter.split_text(&text);

        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(RecursiveSplitter::new(0, 0).is_err());
        assert!(RecursiveSplitter::new(100, 100).is_err());
        assert!(RecursiveSplitter::new(100, 99).is_ok());
    }

    #[test]
    fn test_separator_stays_with_following_piece() {
        assert_eq!(
            split_keeping_separator("a. b. c", ". "),
            vec!["a".to_string(), ". b".to_string(), ". c".to_string()]
        );
        assert_eq!(
            split_keeping_separator("\n\nlead", "\n\n"),
            vec!["\n\nlead".to_string()]
        );
    }
}
