use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BASE_CONFIDENCE: f64 = 0.85;
const NO_MATCH_CONFIDENCE: f64 = 0.2;
const SHORT_TEXT_PENALTY: f64 = 0.10;
const COPY_PENALTY: f64 = 0.25;
const MIN_TEXT_CHARS: usize = 50;
const MIN_VALID_CONFIDENCE: f64 = 0.5;

const COPY_INDICATORS: [&str; 4] = ["cópia", "copia", "xerox", "copy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Cpf,
    Rg,
    Cnh,
    Passport,
}

impl DocumentType {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "cpf" => Some(DocumentType::Cpf),
            "rg" | "identidade" => Some(DocumentType::Rg),
            "cnh" => Some(DocumentType::Cnh),
            "passport" | "passaporte" => Some(DocumentType::Passport),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentType::Cpf => "CPF",
            DocumentType::Rg => "RG",
            DocumentType::Cnh => "CNH",
            DocumentType::Passport => "Passport",
        }
    }

    fn expected_format(self) -> &'static str {
        match self {
            DocumentType::Cpf => "000.000.000-00 or 11 digits",
            DocumentType::Rg => "00.000.000-0",
            DocumentType::Cnh => "11 digits",
            DocumentType::Passport => "two letters followed by 6 digits",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVerificationResult {
    pub is_valid: bool,
    pub confidence: f64,
    pub extracted_fields: BTreeMap<String, Option<String>>,
    pub warning: Option<String>,
}

/// Structural verification of OCR-extracted document text. Pure pattern
/// matching, no I/O; confidence is penalized for short extracts and for
/// copy-indicator substrings.
#[derive(Debug, Clone)]
pub struct DocumentChecker {
    cpf: Regex,
    bare_digits: Regex,
    rg: Regex,
    passport: Regex,
    issue_date: Regex,
}

impl DocumentChecker {
    pub fn new() -> Self {
        Self {
            cpf: Regex::new(r"\d{3}\.\d{3}\.\d{3}-\d{2}").expect("valid cpf regex"),
            bare_digits: Regex::new(r"\b\d{11}\b").expect("valid digits regex"),
            rg: Regex::new(r"\b\d{1,2}\.\d{3}\.\d{3}-?[0-9Xx]\b").expect("valid rg regex"),
            passport: Regex::new(r"\b[A-Z]{2}\d{6}\b").expect("valid passport regex"),
            issue_date: Regex::new(r"\b\d{2}/\d{2}/\d{4}\b").expect("valid date regex"),
        }
    }

    pub fn verify(&self, text: &str, doc_type: DocumentType) -> DocumentVerificationResult {
        let trimmed = text.trim();
        let document_number = self.find_number(trimmed, doc_type);

        let mut confidence = if document_number.is_some() {
            BASE_CONFIDENCE
        } else {
            NO_MATCH_CONFIDENCE
        };

        if trimmed.chars().count() < MIN_TEXT_CHARS {
            confidence -= SHORT_TEXT_PENALTY;
        }
        let lower = trimmed.to_lowercase();
        if COPY_INDICATORS.iter().any(|marker| lower.contains(marker)) {
            confidence -= COPY_PENALTY;
        }
        let confidence = confidence.clamp(0.0, 1.0);

        let mut extracted_fields = BTreeMap::new();
        let mut warning = None;

        match &document_number {
            Some(number) => {
                extracted_fields.insert("document_number".to_string(), Some(number.clone()));
                extracted_fields.insert(
                    "issue_date".to_string(),
                    self.issue_date
                        .find(trimmed)
                        .map(|m| m.as_str().to_string()),
                );
            }
            None => {
                warning = Some(format!(
                    "no {} pattern found in extracted text (expected {})",
                    doc_type.label(),
                    doc_type.expected_format()
                ));
            }
        }

        DocumentVerificationResult {
            is_valid: document_number.is_some() && confidence >= MIN_VALID_CONFIDENCE,
            confidence,
            extracted_fields,
            warning,
        }
    }

    fn find_number(&self, text: &str, doc_type: DocumentType) -> Option<String> {
        let matched = match doc_type {
            DocumentType::Cpf => self
                .cpf
                .find(text)
                .or_else(|| self.bare_digits.find(text)),
            DocumentType::Rg => self.rg.find(text),
            DocumentType::Cnh => self.bare_digits.find(text),
            DocumentType::Passport => self.passport.find(text),
        };
        matched.map(|m| m.as_str().to_string())
    }
}

impl Default for DocumentChecker {
    fn default() -> Self {
        Self::new()
    }
}
