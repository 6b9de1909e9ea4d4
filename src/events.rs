use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::processor::ProcessError;

/// S3 event notification as delivered to the function.
///
/// Records are kept raw and decoded one at a time with
/// [`S3EventRecord::from_raw`], so a malformed record only fails once the
/// records before it have been handled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<Value>,
}

impl S3Event {
    /// Convert a raw Lambda payload into an event.
    ///
    /// A missing `Records` field yields an empty event. A non-object payload
    /// or a `Records` value that is not a list is an invalid event.
    pub fn from_value(value: Value) -> Result<Self, ProcessError> {
        serde_json::from_value(value).map_err(ProcessError::InvalidEvent)
    }
}

/// One notification record.
///
/// Every nested level is optional on the wire so that a missing value can be
/// reported with its full path instead of a generic deserialization error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Entity>,
}

impl S3EventRecord {
    /// Decode the raw record at `index`. Values of the wrong type (a `null`
    /// record, a non-object `s3`, a numeric key) fail with the record index.
    pub fn from_raw(index: usize, raw: &Value) -> Result<Self, ProcessError> {
        Self::deserialize(raw).map_err(|source| ProcessError::InvalidRecord { index, source })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct S3Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<S3Bucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<S3Object>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct S3Bucket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct S3Object {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Location of one uploaded object, validated out of an [`S3EventRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadNotice<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
}

impl<'a> UploadNotice<'a> {
    /// Look up `s3.bucket.name` and `s3.object.key` on the record at `index`.
    pub fn from_record(index: usize, record: &'a S3EventRecord) -> Result<Self, ProcessError> {
        let missing = |path: &'static str| ProcessError::MissingField { index, path };

        let s3 = record.s3.as_ref().ok_or_else(|| missing("s3"))?;
        let bucket = s3
            .bucket
            .as_ref()
            .ok_or_else(|| missing("s3.bucket"))?
            .name
            .as_deref()
            .ok_or_else(|| missing("s3.bucket.name"))?;
        let key = s3
            .object
            .as_ref()
            .ok_or_else(|| missing("s3.object"))?
            .key
            .as_deref()
            .ok_or_else(|| missing("s3.object.key"))?;

        Ok(Self { bucket, key })
    }

    pub fn message(&self) -> String {
        format!(
            "A new file is uploaded to S3: bucket={}, key={}",
            self.bucket, self.key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_records_is_empty() {
        let event = S3Event::from_value(json!({})).unwrap();
        assert!(event.records.is_empty());
    }

    #[test]
    fn test_null_records_is_invalid() {
        let result = S3Event::from_value(json!({ "Records": null }));
        assert!(matches!(result, Err(ProcessError::InvalidEvent(_))));
    }

    #[test]
    fn test_non_object_payload_is_invalid() {
        let result = S3Event::from_value(json!("hello"));
        assert!(matches!(result, Err(ProcessError::InvalidEvent(_))));

        let result = S3Event::from_value(json!({ "Records": { "s3": {} } }));
        assert!(matches!(result, Err(ProcessError::InvalidEvent(_))));
    }

    #[test]
    fn test_full_notification_record() {
        let event = S3Event::from_value(json!({
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "us-east-1",
                "eventTime": "2024-01-01T00:00:00.000Z",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "bucket": { "name": "my-bucket", "arn": "arn:aws:s3:::my-bucket" },
                    "object": { "key": "logs/a.txt", "size": 1024, "eTag": "abc" }
                }
            }]
        }))
        .unwrap();

        let record = S3EventRecord::from_raw(0, &event.records[0]).unwrap();
        assert_eq!(record.event_name.as_deref(), Some("ObjectCreated:Put"));
        assert_eq!(record.aws_region.as_deref(), Some("us-east-1"));

        let notice = UploadNotice::from_record(0, &record).unwrap();
        assert_eq!(notice.bucket, "my-bucket");
        assert_eq!(notice.key, "logs/a.txt");
        assert_eq!(
            notice.message(),
            "A new file is uploaded to S3: bucket=my-bucket, key=logs/a.txt"
        );
    }

    #[test]
    fn test_wrongly_typed_record_reports_index() {
        let cases = [
            json!(null),
            json!({ "s3": "x" }),
            json!({ "s3": { "bucket": { "name": "b1" }, "object": { "key": 7 } } }),
        ];

        for raw in cases {
            match S3EventRecord::from_raw(2, &raw) {
                Err(ProcessError::InvalidRecord { index, .. }) => assert_eq!(index, 2),
                other => panic!("expected invalid record for {}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_malformed_record_does_not_fail_event() {
        let event = S3Event::from_value(json!({ "Records": [null, { "s3": "x" }] })).unwrap();
        assert_eq!(event.records.len(), 2);
    }

    #[test]
    fn test_missing_paths() {
        let cases = [
            (json!({}), "s3"),
            (json!({ "s3": {} }), "s3.bucket"),
            (json!({ "s3": { "bucket": {} } }), "s3.bucket.name"),
            (json!({ "s3": { "bucket": { "name": "b1" } } }), "s3.object"),
            (
                json!({ "s3": { "bucket": { "name": "b1" }, "object": {} } }),
                "s3.object.key",
            ),
        ];

        for (raw, expected) in cases {
            let record: S3EventRecord = serde_json::from_value(raw).unwrap();
            match UploadNotice::from_record(3, &record) {
                Err(ProcessError::MissingField { index, path }) => {
                    assert_eq!(index, 3);
                    assert_eq!(path, expected);
                }
                other => panic!("expected missing {}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_key_is_not_decoded() {
        let record: S3EventRecord = serde_json::from_value(json!({
            "s3": { "bucket": { "name": "b" }, "object": { "key": "my+file%281%29.txt" } }
        }))
        .unwrap();

        let notice = UploadNotice::from_record(0, &record).unwrap();
        assert_eq!(notice.key, "my+file%281%29.txt");
    }
}
