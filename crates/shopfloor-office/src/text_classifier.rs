// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text categorization of flagged notes into production stages.
//!
//! The office core calls a [`TextClassifier`] but does not own the policy.
//! [`KeywordClassifier`] is the default: whole-word, case-insensitive matching
//! of the stage keywords used on the shop floor.

use shopfloor_core::Category;
use unicode_normalization::UnicodeNormalization;

/// Policy mapping free text to a production stage.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Category;
}

/// Stage keywords checked in order; the first match wins.
const KEYWORDS: &[(&str, Category)] = &[
    ("SÓNG", Category::Corrugation),
    ("IN", Category::Printing),
    ("THÀNH PHẨM", Category::FinishedGoods),
    ("KHO", Category::Warehouse),
    ("TCKT", Category::Accounting),
];

/// Keyword-table classifier.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<(Vec<String>, Category)>,
}

impl KeywordClassifier {
    /// Classifier with a custom keyword table, checked in order.
    pub fn with_keywords<'a>(table: impl IntoIterator<Item = (&'a str, Category)>) -> Self {
        Self {
            keywords: table
                .into_iter()
                .map(|(phrase, category)| (words(phrase), category))
                .filter(|(phrase, _)| !phrase.is_empty())
                .collect(),
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::with_keywords(KEYWORDS.iter().copied())
    }
}

impl TextClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Category {
        let tokens = words(text);
        self.keywords
            .iter()
            .find(|(phrase, _)| tokens.windows(phrase.len()).any(|w| w == phrase.as_slice()))
            .map_or(Category::General, |(_, category)| *category)
    }
}

/// Uppercased alphanumeric words of `text`, after NFC composition.
fn words(text: &str) -> Vec<String> {
    let composed: String = text.nfc().collect();
    composed
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Category {
        KeywordClassifier::default().classify(text)
    }

    #[test]
    fn recognises_each_stage() {
        assert_eq!(classify("Sóng bị cong vênh"), Category::Corrugation);
        assert_eq!(classify("lỗi IN lệch màu"), Category::Printing);
        assert_eq!(classify("thành phẩm thiếu 20 thùng"), Category::FinishedGoods);
        assert_eq!(classify("chuyển KHO B"), Category::Warehouse);
        assert_eq!(classify("tckt chưa duyệt giá"), Category::Accounting);
    }

    #[test]
    fn matches_whole_words_only() {
        assert_eq!(classify("INOX khay"), Category::General);
        assert_eq!(classify("thành công"), Category::General);
        assert_eq!(classify("khoá cửa"), Category::General);
    }

    #[test]
    fn punctuation_separates_words() {
        assert_eq!(classify("[IN] bản mẫu"), Category::Printing);
    }

    #[test]
    fn decomposed_diacritics_still_match() {
        assert_eq!(classify("SO\u{301}NG bị ướt"), Category::Corrugation);
        assert_eq!(classify("tha\u{300}nh pha\u{302}\u{309}m đủ"), Category::FinishedGoods);
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(classify(""), Category::General);
        assert_eq!(classify("giao hàng sáng mai"), Category::General);
    }

    #[test]
    fn table_order_breaks_ties() {
        assert_eq!(classify("kho báo sóng lỗi"), Category::Corrugation);
    }

    #[test]
    fn custom_table() {
        let c = KeywordClassifier::with_keywords([("QC", Category::FinishedGoods)]);
        assert_eq!(c.classify("qc pass"), Category::FinishedGoods);
        assert_eq!(c.classify("sóng"), Category::General);
    }
}
