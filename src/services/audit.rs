//! Field-level change tracking for audited updates. Values are compared in
//! their display-string form (absent values render as the empty string), so
//! a client resending an unchanged field produces no history row. Every
//! recorded change becomes one history row, written in the same transaction
//! as the update itself.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};

use super::ParentType;
use crate::entities::history;

/// Conversion to the display string used both for diffing and for the
/// history message.
pub trait AuditValue {
    fn display(&self) -> String;
}

impl AuditValue for i32 {
    fn display(&self) -> String {
        self.to_string()
    }
}

impl AuditValue for String {
    fn display(&self) -> String {
        self.clone()
    }
}

impl AuditValue for str {
    fn display(&self) -> String {
        self.to_owned()
    }
}

impl AuditValue for NaiveDate {
    fn display(&self) -> String {
        self.to_string()
    }
}

impl<T: AuditValue> AuditValue for Option<T> {
    fn display(&self) -> String {
        self.as_ref().map(AuditValue::display).unwrap_or_default()
    }
}

/// One changed field of one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub label: &'static str,
    pub old: String,
    pub new: String,
}

impl FieldChange {
    pub fn message(&self) -> String {
        format!("'{}' changed ({} -> {})", self.label, self.old, self.new)
    }
}

/// Accumulates the changes of a single update call.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: Vec<FieldChange>,
}

impl ChangeSet {
    /// Compare the stored and incoming value under the given display label;
    /// record a change when their display strings differ. Returns whether a
    /// change was recorded.
    pub fn compare<O, N>(&mut self, label: &'static str, stored: &O, incoming: &N) -> bool
    where
        O: AuditValue + ?Sized,
        N: AuditValue + ?Sized,
    {
        let old = stored.display();
        let new = incoming.display();
        if old == new {
            return false;
        }
        self.changes.push(FieldChange { label, old, new });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    /// Append one history row per recorded change. Runs on the caller's
    /// transaction so the rows commit or roll back with the update.
    pub async fn write_history<C>(
        &self,
        conn: &C,
        user_id: i32,
        parent: ParentType,
        parent_id: i32,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        for change in &self.changes {
            history::ActiveModel {
                user_id: Set(user_id),
                parent_type: Set(parent.as_str().to_owned()),
                parent_id: Set(parent_id),
                action: Set(change.message()),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_format() {
        let change = FieldChange {
            label: "Progress",
            old: "0".to_string(),
            new: "50".to_string(),
        };
        assert_eq!(change.message(), "'Progress' changed (0 -> 50)");
    }

    #[test]
    fn equal_values_produce_no_change() {
        let mut set = ChangeSet::default();
        assert!(!set.compare("Defective Quantity", &5, &5));
        assert!(set.is_empty());
    }

    #[test]
    fn differing_values_are_recorded_once() {
        let mut set = ChangeSet::default();
        assert!(set.compare("Defective Quantity", &5, &7));
        assert_eq!(set.changes().len(), 1);
        assert_eq!(
            set.changes()[0].message(),
            "'Defective Quantity' changed (5 -> 7)"
        );
    }

    #[test]
    fn none_and_empty_string_are_equivalent() {
        let mut set = ChangeSet::default();
        let stored: Option<String> = None;
        assert!(!set.compare("Defect Reason", &stored, ""));
        assert!(set.is_empty());
    }

    #[test]
    fn clearing_a_value_is_a_change() {
        let mut set = ChangeSet::default();
        let stored = Some("scratch".to_string());
        assert!(set.compare("Defect Reason", &stored, ""));
        assert_eq!(
            set.changes()[0].message(),
            "'Defect Reason' changed (scratch -> )"
        );
    }

    #[test]
    fn dates_use_iso_display() {
        let mut set = ChangeSet::default();
        let stored: Option<NaiveDate> = None;
        let incoming = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();
        assert!(set.compare("Target Date", &stored, &incoming));
        assert_eq!(
            set.changes()[0].message(),
            "'Target Date' changed ( -> 2025-09-30)"
        );
    }
}
