//! Snapshot fingerprinting
//!
//! Digests the inputs an aggregate depends on with SHA-256. Every value is
//! written with a type tag and a length prefix, so equal records, rules and
//! sort keys always produce the same digest and different ones practically
//! never do.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::filter::FilterRule;
use crate::record::Record;
use crate::sort::SortKey;
use crate::stats::Fingerprint;

/// Fingerprint of (records, rules, sort keys); rule ids are left out
pub fn snapshot_fingerprint(
    records: &[Record],
    rules: &[FilterRule],
    keys: &[SortKey],
) -> Fingerprint {
    let mut hasher = Sha256::new();

    write_len(&mut hasher, records.len());
    for record in records {
        write_record(&mut hasher, record);
    }

    write_len(&mut hasher, rules.len());
    for rule in rules {
        write_bytes(&mut hasher, rule.field.as_bytes());
        write_bytes(&mut hasher, rule.operator.as_str().as_bytes());
        write_len(&mut hasher, rule.values.len());
        for value in &rule.values {
            write_value(&mut hasher, value);
        }
    }

    write_len(&mut hasher, keys.len());
    for key in keys {
        write_bytes(&mut hasher, key.field.as_bytes());
        write_bytes(&mut hasher, key.direction.as_str().as_bytes());
    }

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    Fingerprint::from_bytes(digest)
}

fn write_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_le_bytes());
}

fn write_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    write_len(hasher, bytes.len());
    hasher.update(bytes);
}

fn write_record(hasher: &mut Sha256, record: &Record) {
    write_len(hasher, record.len());
    for (key, value) in record {
        write_bytes(hasher, key.as_bytes());
        write_value(hasher, value);
    }
}

fn write_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update([0u8]),
        Value::Bool(b) => hasher.update([1u8, u8::from(*b)]),
        Value::Number(n) => {
            hasher.update([2u8]);
            write_bytes(hasher, n.to_string().as_bytes());
        }
        Value::String(s) => {
            hasher.update([3u8]);
            write_bytes(hasher, s.as_bytes());
        }
        Value::Array(items) => {
            hasher.update([4u8]);
            write_len(hasher, items.len());
            for item in items {
                write_value(hasher, item);
            }
        }
        Value::Object(map) => {
            hasher.update([5u8]);
            write_record(hasher, map);
        }
    }
}
