//! Key escaping for MongoDB compatibility.
//!
//! Document data is open, so clients can send keys MongoDB refuses to store: keys
//! containing dots, dollar signs or NUL bytes. Keys are percent-escaped on the way
//! in and unescaped on the way out. Values are never touched.

use bson::{Bson, Document};


pub(crate) struct KeySanitizer;

impl KeySanitizer {
    /// Applied in order when escaping, in reverse order when restoring. `%` comes
    /// first so escapes already present in a key survive the round trip.
    const REPLACEMENTS: [(&'static str, &'static str); 4] = [
        ("%", "%25"),
        (".", "%2E"),
        ("$", "%24"),
        ("\0", "%00"),
    ];

    /// Recursively escapes every key of nested documents, including documents inside arrays.
    pub(crate) fn sanitize_value(value: &Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(arr.iter().map(Self::sanitize_value).collect()),
            Bson::Document(doc) => Bson::Document(Self::sanitize_document(doc)),
            _ => value.clone(),
        }
    }

    pub(crate) fn sanitize_document(doc: &Document) -> Document {
        doc.iter()
            .map(|(k, v)| (Self::sanitize_key(k), Self::sanitize_value(v)))
            .collect()
    }

    pub(crate) fn sanitize_key(input: &str) -> String {
        let mut sanitized = input.to_string();
        for (target, replacement) in Self::REPLACEMENTS.iter() {
            sanitized = sanitized.replace(*target, *replacement);
        }
        sanitized
    }

    /// Inverse of [`KeySanitizer::sanitize_value`].
    pub(crate) fn restore_value(value: &Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(arr.iter().map(Self::restore_value).collect()),
            Bson::Document(doc) => Bson::Document(Self::restore_document(doc)),
            _ => value.clone(),
        }
    }

    pub(crate) fn restore_document(doc: &Document) -> Document {
        doc.iter()
            .map(|(k, v)| (Self::restore_key(k), Self::restore_value(v)))
            .collect()
    }

    pub(crate) fn restore_key(input: &str) -> String {
        let mut restored = input.to_string();
        for (target, replacement) in Self::REPLACEMENTS.iter().rev() {
            restored = restored.replace(*replacement, *target);
        }
        restored
    }
}
