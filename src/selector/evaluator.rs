use super::ast::{Segment, Selector};
use crate::document::node::{PropertyMap, PropertyValue, ValueKind};

/// A value reached by a selector, with the concrete path that reached it.
///
/// The path never contains a wildcard: each `[*]` is replaced by the index
/// of the element this branch went through.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a> {
    pub path: Selector,
    pub value: &'a PropertyValue,
}

pub struct Evaluator<'a> {
    root: &'a PropertyMap,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a PropertyMap) -> Self {
        Evaluator { root }
    }

    /// Evaluates a selector, fanning out over wildcard steps.
    ///
    /// Branches that hit a missing key, an out-of-range index or a value of
    /// the wrong shape are dropped. Results are in ascending index order for
    /// every wildcard.
    pub fn evaluate_paths(&self, segments: &[Segment]) -> Vec<(Vec<Segment>, &'a PropertyValue)> {
        let Some((Segment::Field(first), rest)) = segments.split_first() else {
            return vec![];
        };
        let Some(start) = self.root.get(first) else {
            return vec![];
        };

        let mut current = vec![(vec![Segment::Field(first.clone())], start)];

        for segment in rest {
            let mut next = Vec::new();
            for (path, value) in &current {
                next.extend(self.evaluate_segment_with_path(*value, segment, path));
            }
            current = next;
        }

        current
    }

    fn evaluate_segment_with_path(
        &self,
        value: &'a PropertyValue,
        segment: &Segment,
        current_path: &[Segment],
    ) -> Vec<(Vec<Segment>, &'a PropertyValue)> {
        let step = |segment: Segment, child: &'a PropertyValue| {
            let mut new_path = current_path.to_vec();
            new_path.push(segment);
            (new_path, child)
        };

        match (segment, value) {
            (Segment::Field(name), PropertyValue::Object(props)) => props
                .get(name)
                .map(|child| vec![step(Segment::Field(name.clone()), child)])
                .unwrap_or_default(),
            (Segment::Index(idx), PropertyValue::Array(items)) => items
                .get(*idx)
                .map(|child| vec![step(Segment::Index(*idx), child)])
                .unwrap_or_default(),
            (Segment::Wildcard, PropertyValue::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(idx, child)| step(Segment::Index(idx), child))
                .collect(),
            _ => vec![],
        }
    }

    /// Resolves every concrete path a selector reaches.
    pub fn resolve(&self, selector: &Selector) -> Vec<Resolved<'a>> {
        self.evaluate_paths(selector.segments())
            .into_iter()
            .map(|(path, value)| Resolved {
                path: Selector::from_segments(path),
                value,
            })
            .collect()
    }

    /// Walks a wildcard-free selector to a single value.
    pub fn evaluate(&self, segments: &[Segment]) -> Option<&'a PropertyValue> {
        let (first, rest) = segments.split_first()?;
        let Segment::Field(name) = first else {
            return None;
        };

        let mut current = self.root.get(name)?;
        for segment in rest {
            current = match (segment, current) {
                (Segment::Field(name), PropertyValue::Object(props)) => props.get(name)?,
                (Segment::Index(idx), PropertyValue::Array(items)) => items.get(*idx)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

fn evaluate_mut<'a>(root: &'a mut PropertyMap, segments: &[Segment]) -> Option<&'a mut PropertyValue> {
    let (first, rest) = segments.split_first()?;
    let Segment::Field(name) = first else {
        return None;
    };

    let mut current = root.get_mut(name)?;
    for segment in rest {
        current = match (segment, current) {
            (Segment::Field(name), PropertyValue::Object(props)) => props.get_mut(name)?,
            (Segment::Index(idx), PropertyValue::Array(items)) => items.get_mut(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

impl Selector {
    /// Selects the single value addressed by this selector.
    ///
    /// Missing paths select nothing. A selector containing `[*]` addresses
    /// many values and also selects nothing here; use `select_all_values`.
    ///
    /// # Example
    ///
    /// ```
    /// use docs_enricher::document::node::{PropertyMap, PropertyValue};
    /// use docs_enricher::selector::Selector;
    ///
    /// let properties: PropertyMap =
    ///     serde_json::from_str(r#"{"authors": [{"id": "2"}, {"id": "5"}]}"#).unwrap();
    ///
    /// let selector = Selector::parse("authors[1].id").unwrap();
    /// assert_eq!(selector.select_value(&properties), Some(&PropertyValue::from("5")));
    ///
    /// let missing = Selector::parse("missing.field[3]").unwrap();
    /// assert_eq!(missing.select_value(&properties), None);
    /// ```
    pub fn select_value<'a>(&self, root: &'a PropertyMap) -> Option<&'a PropertyValue> {
        if self.has_wildcard() {
            return None;
        }
        Evaluator::new(root).evaluate(self.segments())
    }

    /// Like `select_value`, but only when the selected value has the given shape.
    pub fn select_value_of_kind<'a>(
        &self,
        kind: ValueKind,
        root: &'a PropertyMap,
    ) -> Option<&'a PropertyValue> {
        self.select_value(root).filter(|value| value.kind() == kind)
    }

    /// Mutable counterpart of `select_value`.
    pub fn select_value_mut<'a>(&self, root: &'a mut PropertyMap) -> Option<&'a mut PropertyValue> {
        if self.has_wildcard() {
            return None;
        }
        evaluate_mut(root, self.segments())
    }

    /// Selects every value reached by this selector, fanning out over `[*]`.
    ///
    /// With a `kind` filter, values of any other shape are skipped.
    pub fn select_all_values<'a>(
        &self,
        kind: Option<ValueKind>,
        root: &'a PropertyMap,
    ) -> Vec<&'a PropertyValue> {
        Evaluator::new(root)
            .evaluate_paths(self.segments())
            .into_iter()
            .map(|(_, value)| value)
            .filter(|value| kind.map_or(true, |kind| value.kind() == kind))
            .collect()
    }

    /// Resolves the concrete paths this selector reaches.
    pub fn resolve<'a>(&self, root: &'a PropertyMap) -> Vec<Resolved<'a>> {
        Evaluator::new(root).resolve(self)
    }

    /// Builds a map from each concrete path to the value found there.
    ///
    /// # Example
    ///
    /// ```
    /// use docs_enricher::document::node::PropertyMap;
    /// use docs_enricher::selector::Selector;
    ///
    /// let properties: PropertyMap =
    ///     serde_json::from_str(r#"{"authors": [{"id": "2"}, {"id": "5"}]}"#).unwrap();
    ///
    /// let keys = Selector::parse("authors[*]").unwrap().select_all(&properties);
    /// let names: Vec<&str> = keys.keys().map(String::as_str).collect();
    /// assert_eq!(names, vec!["authors[0]", "authors[1]"]);
    /// ```
    pub fn select_all(&self, root: &PropertyMap) -> PropertyMap {
        let mut selected = PropertyMap::new();
        self.select_all_into(root, &mut selected);
        selected
    }

    pub(crate) fn select_all_into(&self, root: &PropertyMap, selected: &mut PropertyMap) {
        for resolved in self.resolve(root) {
            selected.insert(resolved.path.to_string(), resolved.value.clone());
        }
    }
}

/// Applies several selectors in order and collects every concrete path and
/// value into one map.
///
/// When two selectors reach the same concrete path, the later one's entry
/// replaces the earlier value in place.
pub fn select_all<'s, I>(selectors: I, root: &PropertyMap) -> PropertyMap
where
    I: IntoIterator<Item = &'s Selector>,
{
    let mut selected = PropertyMap::new();
    for selector in selectors {
        selector.select_all_into(root, &mut selected);
    }
    selected
}
