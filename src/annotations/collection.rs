//! Ordered annotation set for a single document

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::{Annotation, AnnotationId};
use crate::error::{AnnotatorError, Result};

/// All annotations of one document, in insertion order.
///
/// Serializes as a plain JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationCollection {
    items: Vec<Annotation>,
}

impl AnnotationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.items
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.get(id).is_some()
    }

    /// Append an annotation
    pub fn push(&mut self, annotation: Annotation) {
        self.items.push(annotation);
    }

    /// Replace the comment of an annotation. Returns false if the id is unknown.
    pub fn set_comment(&mut self, id: AnnotationId, comment: impl Into<String>) -> bool {
        match self.items.iter_mut().find(|a| a.id == id) {
            Some(annotation) => {
                annotation.comment = comment.into();
                true
            }
            None => false,
        }
    }

    /// Remove an annotation, preserving the order of the rest
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let pos = self.items.iter().position(|a| a.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Annotations anchored on a page, in insertion order
    pub fn on_page(&self, page_index: u32) -> impl Iterator<Item = &Annotation> {
        self.items.iter().filter(move |a| a.page_index == page_index)
    }

    /// Serialize to the persisted payload
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a persisted payload.
    ///
    /// Any structural or semantic violation yields
    /// [`AnnotatorError::StorageReadCorrupt`].
    pub fn from_json(payload: &str) -> Result<Self> {
        let collection: AnnotationCollection = serde_json::from_str(payload)
            .map_err(|e| AnnotatorError::StorageReadCorrupt(e.to_string()))?;
        collection.validate()?;
        Ok(collection)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.items.len());

        for annotation in &self.items {
            if annotation.page_index == 0 {
                return Err(AnnotatorError::StorageReadCorrupt(format!(
                    "annotation {} has page index 0",
                    annotation.id
                )));
            }
            if !annotation.anchor.is_valid() {
                return Err(AnnotatorError::StorageReadCorrupt(format!(
                    "annotation {} has an invalid anchor",
                    annotation.id
                )));
            }
            if !seen.insert(annotation.id) {
                return Err(AnnotatorError::StorageReadCorrupt(format!(
                    "duplicate annotation id {}",
                    annotation.id
                )));
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a AnnotationCollection {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Annotation> for AnnotationCollection {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{Anchor, AnchorRect};
    use crate::annotations::HighlightColor;

    fn highlight(text: &str, page_index: u32) -> Annotation {
        Annotation::new(
            text,
            HighlightColor::Yellow,
            Anchor {
                page_index,
                rect: AnchorRect::new(10.0, 20.0, 30.0, 8.0),
            },
        )
    }

    #[test]
    fn test_insertion_order_and_removal() {
        let mut c = AnnotationCollection::new();
        let a = highlight("a", 1);
        let b = highlight("b", 2);
        let d = highlight("d", 1);
        let (ia, ib, id) = (a.id, b.id, d.id);
        c.push(a);
        c.push(b);
        c.push(d);

        assert_eq!(c.remove(ib).map(|x| x.text), Some("b".to_string()));
        let order: Vec<_> = c.iter().map(|x| x.id).collect();
        assert_eq!(order, vec![ia, id]);
        assert!(c.remove(ib).is_none());
    }

    #[test]
    fn test_on_page_filters() {
        let c: AnnotationCollection = vec![highlight("a", 1), highlight("b", 2), highlight("c", 1)]
            .into_iter()
            .collect();
        let texts: Vec<_> = c.on_page(1).map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert_eq!(c.on_page(3).count(), 0);
    }

    #[test]
    fn test_set_comment() {
        let mut c = AnnotationCollection::new();
        let a = highlight("a", 1);
        let id = a.id;
        c.push(a);

        assert!(c.set_comment(id, "note"));
        assert_eq!(c.get(id).unwrap().comment, "note");
        assert!(!c.set_comment(AnnotationId::new(), "ignored"));
    }

    #[test]
    fn test_payload_round_trip() {
        let mut c = AnnotationCollection::new();
        let mut a = highlight("first", 1);
        a.comment = "why".to_string();
        c.push(a);
        c.push(highlight("second", 4));

        let json = c.to_json().unwrap();
        assert!(json.starts_with('['));
        assert_eq!(AnnotationCollection::from_json(&json).unwrap(), c);
    }

    #[test]
    fn test_legacy_record_without_timestamp() {
        let json = r##"[{"id":"6f1c2b1e-8d7a-4c4b-9a57-0d5f2a3f4e10","text":"x","color":"#FFD93D",
            "pageIndex":2,"comment":"","anchor":{"top":1.0,"left":2.0,"width":3.0,"height":4.0}}]"##;
        let c = AnnotationCollection::from_json(json).unwrap();
        assert_eq!(c.len(), 1);
        assert!(c.iter().next().unwrap().created_at.is_none());
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        let cases = [
            "not json",
            "{\"id\":1}",
            // truncated
            r##"[{"id":"6f1c2b1e-8d7a-4c4b-9a57-0d5f2a3f4e10","text":"x""##,
            // color outside palette
            r##"[{"id":"6f1c2b1e-8d7a-4c4b-9a57-0d5f2a3f4e10","text":"x","color":"#000000",
                "pageIndex":1,"anchor":{"top":1.0,"left":2.0,"width":3.0,"height":4.0}}]"##,
            // page zero
            r##"[{"id":"6f1c2b1e-8d7a-4c4b-9a57-0d5f2a3f4e10","text":"x","color":"#FFD93D",
                "pageIndex":0,"anchor":{"top":1.0,"left":2.0,"width":3.0,"height":4.0}}]"##,
            // zero-width anchor
            r##"[{"id":"6f1c2b1e-8d7a-4c4b-9a57-0d5f2a3f4e10","text":"x","color":"#FFD93D",
                "pageIndex":1,"anchor":{"top":1.0,"left":2.0,"width":0.0,"height":4.0}}]"##,
        ];

        for payload in cases {
            assert!(
                matches!(
                    AnnotationCollection::from_json(payload),
                    Err(AnnotatorError::StorageReadCorrupt(_))
                ),
                "accepted {payload}"
            );
        }
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let a = highlight("a", 1);
        let c: AnnotationCollection = vec![a.clone(), a].into_iter().collect();
        let json = serde_json::to_string(&c).unwrap();
        assert!(matches!(
            AnnotationCollection::from_json(&json),
            Err(AnnotatorError::StorageReadCorrupt(_))
        ));
    }
}
