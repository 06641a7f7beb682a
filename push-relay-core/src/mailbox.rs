//! Per-token mailbox queue

use chrono::Utc;
use serde::Serialize;

use crate::error::Error;
use crate::models::Notification;
use crate::store::MailboxStore;
use crate::Result;

/// Parse an optional timestamp field.
///
/// An absent or empty field means "use the receipt time".
pub fn parse_timestamp(raw: Option<&str>) -> Result<Option<u64>> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    let timestamp: i64 = raw.parse().map_err(|e| {
        tracing::debug!(value = %raw, error = %e, "Failed to parse timestamp");
        Error::Parse("Failed to parse timestamp".to_string())
    })?;

    if timestamp < 0 {
        return Err(Error::Validation(
            "Timestamp can't be less than 0".to_string(),
        ));
    }

    Ok(Some(timestamp as u64))
}

/// Concatenate serialized records, failing on the first record that cannot be serialized
pub fn render<T: Serialize>(records: &[T]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
    }
    Ok(out)
}

/// Append-only notification queues keyed by raw token strings
pub struct Mailbox<M> {
    store: M,
}

impl<M: MailboxStore> Mailbox<M> {
    pub fn new(store: M) -> Self {
        Self { store }
    }

    /// Append a notification. The token is not checked against issued sessions.
    pub fn enqueue(
        &self,
        token: &str,
        title: &str,
        body: &str,
        timestamp: Option<u64>,
    ) -> Result<Notification> {
        let notification = Notification {
            token: token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            timestamp: timestamp.unwrap_or_else(|| Utc::now().timestamp().max(0) as u64),
        };
        self.store.append(notification.clone())?;
        Ok(notification)
    }

    /// Read every notification for a token in insertion order, without removing any
    pub fn drain(&self, token: &str) -> Result<Vec<Notification>> {
        self.store.list(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryMailboxStore;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp(None).unwrap(), None);
        assert_eq!(parse_timestamp(Some("")).unwrap(), None);
        assert_eq!(parse_timestamp(Some("0")).unwrap(), Some(0));
        assert_eq!(parse_timestamp(Some("1700000000")).unwrap(), Some(1_700_000_000));

        assert!(matches!(parse_timestamp(Some("-1")), Err(Error::Validation(_))));
        assert!(matches!(parse_timestamp(Some("abc")), Err(Error::Parse(_))));
        assert!(matches!(parse_timestamp(Some("1.5")), Err(Error::Parse(_))));
        assert!(matches!(
            parse_timestamp(Some("99999999999999999999")),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_enqueue_assigns_receipt_time() {
        let mailbox = Mailbox::new(InMemoryMailboxStore::new());
        let before = Utc::now().timestamp() as u64;

        let notification = mailbox.enqueue("t", "hi", "world", None).unwrap();
        assert!(notification.timestamp >= before);
        assert!(notification.timestamp <= Utc::now().timestamp() as u64);

        let explicit = mailbox.enqueue("t", "hi", "world", Some(7)).unwrap();
        assert_eq!(explicit.timestamp, 7);
    }

    #[test]
    fn test_drain_is_ordered_and_non_destructive() {
        let mailbox = Mailbox::new(InMemoryMailboxStore::new());
        mailbox.enqueue("t", "one", "", Some(2)).unwrap();
        mailbox.enqueue("t", "two", "", Some(1)).unwrap();

        let first = mailbox.drain("t").unwrap();
        let titles: Vec<_> = first.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["one", "two"]);

        assert_eq!(mailbox.drain("t").unwrap(), first);
        assert!(mailbox.drain("unseen").unwrap().is_empty());
    }

    #[test]
    fn test_render_concatenates_records() {
        let records = vec![
            Notification {
                token: "t".into(),
                title: "a".into(),
                body: "b".into(),
                timestamp: 1,
            },
            Notification {
                token: "t".into(),
                title: "".into(),
                body: "".into(),
                timestamp: 2,
            },
        ];

        let rendered = render(&records).unwrap();
        assert_eq!(
            rendered,
            r#"{"title":"a","body":"b","timestamp":1}{"title":"","body":"","timestamp":2}"#
        );
        assert_eq!(render::<Notification>(&[]).unwrap(), "");
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("broken record"))
        }
    }

    #[test]
    fn test_render_fails_fast() {
        let result = render(&[Unserializable]);
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
