// src/extract/mod.rs
//! Text extraction for uploaded email files (.txt and .pdf) plus the light
//! normalization returned to clients as `preprocessed`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format '{0}', use .txt or .pdf")]
    UnsupportedFormat(String),
    #[error("PDF is password protected, provide an unencrypted version")]
    EncryptedPdf,
    #[error("failed to read file: {0}")]
    Unreadable(String),
}

/// Extract text from an uploaded file based on its extension.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let extension = filename
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && ext.len() < filename.len())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "txt" => Ok(extract_txt(bytes)),
        "pdf" => extract_pdf(bytes),
        _ => Err(ExtractError::UnsupportedFormat(extension)),
    }
}

/// Plain text with encoding detection: UTF-8 first, WINDOWS-1252 as the
/// fallback for legacy mail exports.
fn extract_txt(bytes: &[u8]) -> String {
    let (content, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if had_errors {
        let (content, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
        clean_text(&content)
    } else {
        clean_text(&content)
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // Encrypted PDFs produce garbage from text extraction, reject them first.
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| ExtractError::Unreadable(e.to_string()))?;
    if doc.is_encrypted() {
        return Err(ExtractError::EncryptedPdf);
    }

    let content = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::Unreadable(e.to_string()))?;

    Ok(clean_text(&content))
}

/// Normalize extracted text: drop control characters, trim lines, collapse
/// blank lines.
fn clean_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_control() && !c.is_whitespace() {
                ' '
            } else {
                c
            }
        })
        .collect();

    let lines: Vec<&str> = cleaned
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    lines.join("\n")
}

// Common English words that carry no classification signal.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "had", "has",
    "have", "he", "her", "his", "i", "if", "in", "is", "it", "its", "me", "my", "of", "on", "or",
    "our", "she", "so", "that", "the", "their", "them", "they", "this", "to", "was", "we", "were",
    "will", "with", "you", "your",
];

/// Light preprocessing mirrored back to clients: lowercase, strip
/// punctuation and digits, drop stopwords. Informational only, the
/// classifier works on the raw text.
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphabetic() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    stripped
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
