// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in documents shown when the first load cannot reach storage.

use chrono::{NaiveDate, TimeZone, Utc};
use shopfloor_core::{ChatMessage, Document, DocumentStatus};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seed_message(id: &str, sender: &str, text: &str, hour: u32) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        sender: sender.to_string(),
        text: text.to_string(),
        image: None,
        sent_at: Utc
            .with_ymd_and_hms(2026, 1, 15, hour, 0, 0)
            .single()
            .unwrap_or_default(),
        from_self: false,
    }
}

/// Sample orders covering two product families and a single-version product.
pub fn seed_documents() -> Vec<Document> {
    let mut milk_v1 = Document::new(
        "seed-1",
        "Vinamilk",
        "Thùng carton 5 lớp 24 hộp",
        day(2026, 1, 5),
    );
    milk_v1.production_order = "LSX-2601-001".to_string();
    milk_v1.handler = "Phòng kế hoạch".to_string();
    milk_v1.status = DocumentStatus::Completed;
    milk_v1.specs.insert("kich_thuoc".to_string(), "420x280x210".to_string());
    milk_v1.specs.insert("song".to_string(), "BC".to_string());

    let mut milk_v2 = milk_v1.clone();
    milk_v2.id = "seed-2".into();
    milk_v2.production_order = "LSX-2601-014".to_string();
    milk_v2.date = day(2026, 1, 15);
    milk_v2.status = DocumentStatus::InProduction;
    milk_v2.messages = vec![
        seed_message("seed-2-m1", "Tổ in", "Đã lên khuôn in, chờ duyệt màu", 8),
        seed_message("seed-2-m2", "QC", "Màu đạt, cho chạy", 9),
    ];

    let mut beer = Document::new("seed-3", "Sabeco", "Hộp bia 330ml", day(2026, 1, 12));
    beer.production_order = "LSX-2601-009".to_string();
    beer.handler = "Phòng kế hoạch".to_string();
    beer.specs.insert("kich_thuoc".to_string(), "270x180x120".to_string());

    vec![milk_v1, milk_v2, beer]
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfloor_core::latest_version;

    #[test]
    fn seed_is_not_empty_and_ids_are_unique() {
        let docs = seed_documents();
        assert!(!docs.is_empty());
        let mut ids: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), docs.len());
    }

    #[test]
    fn seed_family_has_a_latest_version() {
        let docs = seed_documents();
        let latest = latest_version(&docs, &docs[0].family_key()).unwrap();
        assert_eq!(latest.id.0, "seed-2");
    }
}
