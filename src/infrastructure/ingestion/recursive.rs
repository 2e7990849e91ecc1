//! Recursive chunking strategy

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{Chunk, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

/// Chunking strategy that recursively splits text hierarchically
///
/// Splitting order: paragraphs -> sentences -> words. Adjacent parts are
/// merged back together as long as they fit the configured chunk size.
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker;

impl RecursiveChunker {
    pub fn new() -> Self {
        Self
    }

    fn split_by_paragraphs(text: &str) -> Vec<&str> {
        text.split("\n\n")
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect()
    }

    fn split_by_sentences(text: &str) -> Vec<&str> {
        text.unicode_sentences().collect()
    }

    fn recursive_chunk(text: &str, config: &ChunkingConfig, level: usize) -> Vec<String> {
        if text.len() <= config.chunk_size {
            return vec![text.to_string()];
        }

        let parts = match level {
            0 => Self::split_by_paragraphs(text),
            1 => Self::split_by_sentences(text),
            _ => return Self::split_by_size(text, config),
        };

        if parts.len() <= 1 {
            return Self::recursive_chunk(text, config, level + 1);
        }

        let separator = if level == 0 { "\n\n" } else { " " };
        let mut result = Vec::new();
        let mut current = String::new();

        for part in parts {
            if current.is_empty() {
                current = part.to_string();
            } else if current.len() + separator.len() + part.len() <= config.chunk_size {
                current.push_str(separator);
                current.push_str(part);
            } else {
                Self::flush(&mut result, current, config, level);
                current = part.to_string();
            }
        }

        if !current.is_empty() {
            Self::flush(&mut result, current, config, level);
        }

        result
    }

    fn flush(result: &mut Vec<String>, current: String, config: &ChunkingConfig, level: usize) {
        if current.len() > config.chunk_size {
            result.extend(Self::recursive_chunk(&current, config, level + 1));
        } else {
            result.push(current);
        }
    }

    /// Word-level sliding window with overlap, the last resort for text with
    /// no usable structure
    fn split_by_size(text: &str, config: &ChunkingConfig) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();

        if words.is_empty() {
            return Vec::new();
        }

        let mut result = Vec::new();
        let mut start = 0;

        while start < words.len() {
            let mut end = start;
            let mut length = 0;

            while end < words.len() {
                let addition = words[end].len() + usize::from(length > 0);
                if length + addition > config.chunk_size && length > 0 {
                    break;
                }
                length += addition;
                end += 1;
            }

            result.push(words[start..end].join(" "));

            if end >= words.len() {
                break;
            }

            // Step back far enough to overlap roughly chunk_overlap characters.
            let mut overlap = 0;
            let mut next_start = end;
            while next_start > start + 1 && overlap < config.chunk_overlap {
                next_start -= 1;
                overlap += words[next_start].len() + 1;
            }
            start = next_start;
        }

        result
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = Self::recursive_chunk(trimmed, config, 0)
            .into_iter()
            .filter(|chunk| !chunk.trim().is_empty())
            .enumerate()
            .map(|(index, content)| Chunk::new(content, index))
            .collect();

        Ok(chunks)
    }
}
