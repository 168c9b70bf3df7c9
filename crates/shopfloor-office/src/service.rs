// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document service: the collaborator-facing API of the office core.
//!
//! Writes attributed to a slot (document upserts, chat-log and defect-log
//! entries) go through the [`SlotAllocator`] so they are capacity-checked and
//! accounted. When no slot can take a document, it is still kept in the master
//! collection without a slot and the configuration banner is raised.
//!
//! The retained snapshot is compared and replaced under one lock, so two
//! loads never diff against a half-replaced collection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use shopfloor_capacity::{select_slot_for_new_document, SlotAllocator};
use shopfloor_core::{
    ApprovalItem, AuditCategory, ChangeEvent, ChatMessage, DatasetKey, DatasetKind, DefectEntry,
    Document, FamilyKey, PersistenceGateway, Record, ShopfloorError, SlotId,
};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::approvals::{self, FoldTarget, Folded};
use crate::audit::AuditLog;
use crate::diff::detect_changes;
use crate::seed::seed_documents;
use crate::text_classifier::TextClassifier;

/// Outcome of one document load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocuments {
    pub documents: Vec<Document>,
    /// Activity since the previous load. Always empty on an initial load.
    pub events: Vec<ChangeEvent>,
    /// The gateway could not be read and the built-in seed set was used.
    pub from_seed: bool,
}

#[derive(Serialize)]
struct ChatLogEntry<'a> {
    document_id: &'a str,
    #[serde(flatten)]
    message: &'a ChatMessage,
}

#[derive(Serialize)]
struct DefectLogEntry<'a> {
    document_id: &'a str,
    #[serde(flatten)]
    defect: &'a DefectEntry,
}

fn encode<T: Serialize>(id: &str, value: &T) -> Result<Record, ShopfloorError> {
    Record::encode(id, value).map_err(ShopfloorError::storage)
}

/// Document operations for one operator session.
pub struct DocumentService {
    gateway: Arc<dyn PersistenceGateway>,
    allocator: Arc<SlotAllocator>,
    audit: Arc<AuditLog>,
    classifier: Arc<dyn TextClassifier>,
    user_name: String,
    snapshot: Mutex<Vec<Document>>,
    banner: AtomicBool,
}

impl DocumentService {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        allocator: Arc<SlotAllocator>,
        audit: Arc<AuditLog>,
        classifier: Arc<dyn TextClassifier>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            allocator,
            audit,
            classifier,
            user_name: user_name.into(),
            snapshot: Mutex::new(Vec::new()),
            banner: AtomicBool::new(false),
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Whether the "no storage slot available" banner is up.
    pub fn banner_raised(&self) -> bool {
        self.banner.load(Ordering::SeqCst)
    }

    fn set_banner(&self, raised: bool) {
        let was = self.banner.swap(raised, Ordering::SeqCst);
        if raised && !was {
            error!("no storage slot available, new documents are kept without a slot");
        } else if !raised && was {
            info!("storage slot available again, banner cleared");
        }
    }

    /// The collection as of the last successful load.
    pub async fn snapshot(&self) -> Vec<Document> {
        self.snapshot.lock().await.clone()
    }

    /// Read the master collection. Records that fail to decode are skipped.
    pub async fn read_documents(&self) -> Result<Vec<Document>, ShopfloorError> {
        let records = self.gateway.read_dataset(&DatasetKey::Documents).await?;
        Ok(records
            .iter()
            .filter_map(|record| match record.decode::<Document>() {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(record_id = %record.id, error = %e, "skipping malformed document");
                    None
                }
            })
            .collect())
    }

    /// Fetch one document fresh from the gateway.
    pub async fn find_document(&self, document_id: &str) -> Result<Document, ShopfloorError> {
        self.read_documents()
            .await?
            .into_iter()
            .find(|d| d.id.0 == document_id)
            .ok_or_else(|| ShopfloorError::DocumentNotFound(document_id.to_string()))
    }

    /// Load the collection and diff it against the retained snapshot.
    ///
    /// On an initial load no events are produced, and a gateway failure falls
    /// back to the seed set. On later loads a failure keeps the snapshot and
    /// is returned to the caller.
    pub async fn load_documents(
        &self,
        is_initial: bool,
    ) -> Result<LoadedDocuments, ShopfloorError> {
        let mut snapshot = self.snapshot.lock().await;
        match self.read_documents().await {
            Ok(current) => {
                let events = if is_initial {
                    Vec::new()
                } else {
                    detect_changes(&snapshot, &current, &self.user_name)
                };
                *snapshot = current.clone();
                Ok(LoadedDocuments {
                    documents: current,
                    events,
                    from_seed: false,
                })
            }
            Err(e) if is_initial => {
                warn!(error = %e, "initial document load failed, showing built-in documents");
                let seed = seed_documents();
                *snapshot = seed.clone();
                Ok(LoadedDocuments {
                    documents: seed,
                    events: Vec::new(),
                    from_seed: true,
                })
            }
            Err(e) => {
                warn!(error = %e, "document load failed, keeping last snapshot");
                Err(e)
            }
        }
    }

    /// Slot for a new document; raises or clears the banner accordingly.
    pub async fn assign_slot_for_new_document(&self) -> Result<Option<SlotId>, ShopfloorError> {
        let slot = self.allocator.assign_slot_for_new_document().await?;
        self.set_banner(slot.is_none());
        Ok(slot)
    }

    /// Re-evaluate the banner without logging an allocation failure.
    pub async fn refresh_banner(&self) -> Result<bool, ShopfloorError> {
        let slots = self.allocator.registry().list_slots().await?;
        let raised = select_slot_for_new_document(&slots, self.allocator.policy()).is_none();
        self.set_banner(raised);
        Ok(raised)
    }

    /// Place a new document on a slot and persist it.
    ///
    /// With no eligible slot the document is kept without one and
    /// [`ShopfloorError::NoSlotAvailable`] is returned.
    pub async fn add_document(&self, mut doc: Document) -> Result<SlotId, ShopfloorError> {
        let slot = match doc.storage_slot_id {
            Some(slot_id) => Some(slot_id),
            None => self.assign_slot_for_new_document().await?,
        };
        let Some(slot_id) = slot else {
            self.persist_unrouted(&doc).await?;
            self.audit(AuditCategory::Document, "create", format!("{} (no slot)", doc.id))
                .await;
            return Err(ShopfloorError::NoSlotAvailable);
        };

        doc.storage_slot_id = Some(slot_id);
        let record = encode(&doc.id.0, &doc)?;
        self.allocator
            .write_to_slot(slot_id, &DatasetKey::Documents, record)
            .await?;
        info!(document_id = %doc.id, slot_id = %slot_id, "document created");
        self.audit(AuditCategory::Document, "create", doc.id.0.clone())
            .await;
        Ok(slot_id)
    }

    /// Persist a document on its own slot.
    ///
    /// A document that never got a slot is placed now if one is available.
    pub async fn update_document(&self, doc: &Document) -> Result<SlotId, ShopfloorError> {
        let Some(slot_id) = self.allocator.resolve_write_target(doc).await? else {
            self.set_banner(true);
            self.persist_unrouted(doc).await?;
            return Err(ShopfloorError::NoSlotAvailable);
        };
        let mut doc = doc.clone();
        doc.storage_slot_id = Some(slot_id);
        let record = encode(&doc.id.0, &doc)?;
        self.allocator
            .write_to_slot(slot_id, &DatasetKey::Documents, record)
            .await?;
        Ok(slot_id)
    }

    /// Delete every version of a product family. Returns how many were deleted.
    pub async fn delete_document_group(
        &self,
        sender: &str,
        title: &str,
    ) -> Result<usize, ShopfloorError> {
        let family = FamilyKey {
            sender: sender.to_string(),
            title: title.to_string(),
        };
        let mut deleted = 0;
        for doc in self.read_documents().await? {
            if doc.belongs_to(&family)
                && self
                    .gateway
                    .delete_record(&DatasetKey::Documents, &doc.id.0)
                    .await?
            {
                deleted += 1;
            }
        }
        info!(sender, title, deleted, "document family deleted");
        self.audit(
            AuditCategory::Document,
            "delete",
            format!("{sender} / {title} ({deleted} versions)"),
        )
        .await;
        Ok(deleted)
    }

    /// Append a chat message to a document and its slot's chat log.
    ///
    /// The document upsert and the log entry are one capacity-gated write,
    /// so the message lands in both places or in neither. A document with no
    /// slot available still gets the message, stored without a slot, and
    /// [`ShopfloorError::NoSlotAvailable`] is returned.
    pub async fn post_message(
        &self,
        document_id: &str,
        message: ChatMessage,
    ) -> Result<(), ShopfloorError> {
        let mut doc = self.find_document(document_id).await?;
        let Some(slot_id) = self.allocator.resolve_write_target(&doc).await? else {
            doc.messages.push(message);
            self.update_document(&doc).await?;
            return Ok(());
        };

        let entry = encode(
            &message.id,
            &ChatLogEntry {
                document_id,
                message: &message,
            },
        )?;
        doc.messages.push(message);
        self.write_with_log(
            &mut doc,
            slot_id,
            Some((DatasetKey::slot(slot_id, DatasetKind::ChatLog), entry)),
        )
        .await
    }

    /// Flag a chat message for approval.
    pub async fn flag_message(
        &self,
        document_id: &str,
        message_id: &str,
    ) -> Result<ApprovalItem, ShopfloorError> {
        let mut doc = self.find_document(document_id).await?;
        let item = approvals::flag_message(
            &mut doc,
            message_id,
            &self.user_name,
            self.classifier.as_ref(),
        )?;
        self.update_document(&doc).await?;
        Ok(item)
    }

    /// Enter an approval item directly.
    pub async fn add_approval_item(
        &self,
        document_id: &str,
        text: &str,
        image: Option<String>,
    ) -> Result<ApprovalItem, ShopfloorError> {
        let mut doc = self.find_document(document_id).await?;
        let item = approvals::add_approval_item(
            &mut doc,
            text,
            image,
            &self.user_name,
            self.classifier.as_ref(),
        );
        self.update_document(&doc).await?;
        Ok(item)
    }

    /// Fold a pending item into the defect or spec-check log.
    ///
    /// Defects are also appended to the slot's defect log when the document
    /// has a slot. That entry and the document upsert are written together,
    /// so a rejected write leaves the item pending and the log untouched.
    pub async fn resolve_approval(
        &self,
        document_id: &str,
        item_id: &str,
        target: FoldTarget,
    ) -> Result<Folded, ShopfloorError> {
        let mut doc = self.find_document(document_id).await?;
        let slot = self.allocator.resolve_write_target(&doc).await?;
        let folded = approvals::fold_approval(&mut doc, item_id, target, &self.user_name)?;
        match slot {
            Some(slot_id) => {
                let log = match &folded {
                    Folded::Defect(defect) => Some((
                        DatasetKey::slot(slot_id, DatasetKind::DefectLog),
                        encode(
                            &defect.id,
                            &DefectLogEntry {
                                document_id,
                                defect,
                            },
                        )?,
                    )),
                    Folded::SpecLog(_) => None,
                };
                self.write_with_log(&mut doc, slot_id, log).await?;
            }
            None => {
                self.update_document(&doc).await?;
            }
        }
        self.audit(
            AuditCategory::Document,
            "resolve_approval",
            format!("{document_id}/{item_id}"),
        )
        .await;
        Ok(folded)
    }

    /// Upsert `doc` on `slot_id`, followed by an optional slot-log entry.
    async fn write_with_log(
        &self,
        doc: &mut Document,
        slot_id: SlotId,
        log: Option<(DatasetKey, Record)>,
    ) -> Result<(), ShopfloorError> {
        doc.storage_slot_id = Some(slot_id);
        let mut writes = vec![(DatasetKey::Documents, encode(&doc.id.0, &*doc)?)];
        writes.extend(log);
        self.allocator.write_group_to_slot(slot_id, writes).await?;
        Ok(())
    }

    /// Keep a document in the master collection without slot accounting.
    async fn persist_unrouted(&self, doc: &Document) -> Result<(), ShopfloorError> {
        let record = encode(&doc.id.0, doc)?;
        self.gateway
            .append_or_upsert(&DatasetKey::Documents, record)
            .await?;
        warn!(document_id = %doc.id, "document stored without a slot");
        Ok(())
    }

    async fn audit(&self, category: AuditCategory, action: &str, detail: String) {
        if let Err(e) = self
            .audit
            .record(category, &self.user_name, action, detail)
            .await
        {
            warn!(action, error = %e, "failed to record audit entry");
        }
    }
}
