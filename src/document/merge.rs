//! Target-priority merging of property trees.
//!
//! `TreeMerge` folds a source tree into a target tree:
//!
//! - keys missing from the target (or holding `null`) take the source value
//! - two mappings under the same key are merged recursively
//! - a target sequence is extended with the source (all elements of a source
//!   sequence, or the single source value otherwise)
//! - any other existing target value is kept as is
//!
//! Existing scalars are never overwritten, which makes repeated enrichment
//! passes safe for already populated fields while list-valued facts keep
//! accumulating.

use super::node::{PropertyMap, PropertyValue};

/// Stateless merge algorithm; cheap to share between enrichers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeMerge;

impl TreeMerge {
    pub fn new() -> Self {
        TreeMerge
    }

    /// Merges `source` into `target`, consuming the source tree.
    ///
    /// # Example
    ///
    /// ```
    /// use docs_enricher::document::merge::TreeMerge;
    /// use docs_enricher::document::node::{PropertyMap, PropertyValue};
    ///
    /// let mut target = PropertyMap::new();
    /// target.insert("name".to_string(), PropertyValue::from("original"));
    ///
    /// let mut source = PropertyMap::new();
    /// source.insert("name".to_string(), PropertyValue::from("replacement"));
    /// source.insert("added".to_string(), PropertyValue::from(true));
    ///
    /// TreeMerge::new().merge_into(source, &mut target);
    /// assert_eq!(target["name"], PropertyValue::from("original"));
    /// assert_eq!(target["added"], PropertyValue::from(true));
    /// ```
    pub fn merge_into(&self, source: PropertyMap, target: &mut PropertyMap) {
        for (key, source_value) in source {
            match target.get_mut(&key) {
                None => {
                    target.insert(key, source_value);
                }
                Some(target_value) => merge_value(&key, source_value, target_value),
            }
        }
    }
}

fn merge_value(key: &str, source_value: PropertyValue, target_value: &mut PropertyValue) {
    match (source_value, target_value) {
        (source_value, target_value @ PropertyValue::Null) => {
            *target_value = source_value;
        }
        (PropertyValue::Object(source_map), PropertyValue::Object(target_map)) => {
            TreeMerge.merge_into(source_map, target_map);
        }
        (PropertyValue::Array(source_items), PropertyValue::Array(target_items)) => {
            target_items.extend(source_items);
        }
        (source_value, PropertyValue::Array(target_items)) => {
            target_items.push(source_value);
        }
        (source_value, target_value) => {
            tracing::trace!(
                key,
                source_kind = ?source_value.kind(),
                target_kind = ?target_value.kind(),
                "keeping existing value, source value dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, PropertyValue)>) -> PropertyMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_missing_keys_are_inserted_in_source_order() {
        let mut target = map(vec![("id", "12".into())]);
        let source = map(vec![("b", 1.into()), ("a", 2.into())]);

        TreeMerge::new().merge_into(source, &mut target);

        let keys: Vec<&str> = target.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "b", "a"]);
    }

    #[test]
    fn test_existing_scalar_is_never_overwritten() {
        let mut target = map(vec![("name", "John".into())]);
        let source = map(vec![("name", "Peter".into())]);

        TreeMerge::new().merge_into(source, &mut target);

        assert_eq!(target["name"], PropertyValue::from("John"));
    }

    #[test]
    fn test_null_target_is_replaced() {
        let mut target = map(vec![("name", PropertyValue::Null)]);
        let source = map(vec![("name", "Peter".into())]);

        TreeMerge::new().merge_into(source, &mut target);

        assert_eq!(target["name"], PropertyValue::from("Peter"));
    }

    #[test]
    fn test_nested_maps_merge_recursively() {
        let mut target = map(vec![("a", map(vec![("y", 2.into())]).into())]);
        let source = map(vec![("a", map(vec![("x", 1.into())]).into())]);

        TreeMerge::new().merge_into(source, &mut target);

        assert_eq!(
            target["a"],
            PropertyValue::Object(map(vec![("y", 2.into()), ("x", 1.into())]))
        );
    }

    #[test]
    fn test_sequences_are_additive() {
        let mut target = map(vec![("authors", PropertyValue::Array(vec!["A".into()]))]);
        let source = map(vec![("authors", PropertyValue::Array(vec!["A".into()]))]);

        TreeMerge::new().merge_into(source, &mut target);

        assert_eq!(target["authors"], PropertyValue::Array(vec!["A".into(), "A".into()]));
    }

    #[test]
    fn test_scalar_appended_to_target_sequence() {
        let mut target = map(vec![("versions", PropertyValue::Array(vec![10.into()]))]);
        let source = map(vec![("versions", 22.into())]);

        TreeMerge::new().merge_into(source, &mut target);

        assert_eq!(target["versions"], PropertyValue::Array(vec![10.into(), 22.into()]));
    }

    #[test]
    fn test_type_conflict_silently_drops_source() {
        // scalar target, mapping source: the source mapping is lost
        let mut target = map(vec![
            ("id", "12".into()),
            ("meta", map(vec![("k", 1.into())]).into()),
        ]);
        let source = map(vec![
            ("id", map(vec![("nested", true.into())]).into()),
            ("meta", PropertyValue::Array(vec![1.into()])),
        ]);
        let expected = target.clone();

        TreeMerge::new().merge_into(source, &mut target);

        assert_eq!(target, expected);
    }

    #[test]
    fn test_empty_source_is_noop() {
        let mut target = map(vec![("id", "12".into())]);
        let expected = target.clone();

        TreeMerge::new().merge_into(PropertyMap::new(), &mut target);

        assert_eq!(target, expected);
    }
}
