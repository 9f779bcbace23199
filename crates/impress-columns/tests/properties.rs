//! Property-based tests for selection order and de-duplication

use impress_columns::{resolve, ColumnIndex, Dtype, Label, Rest, Selector};
use proptest::prelude::*;
use std::collections::HashSet;

fn index_of(names: &[String]) -> ColumnIndex {
    ColumnIndex::flat(names.iter().map(|n| (n.clone(), Dtype::Integer)))
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-e]{1,2}", 0..12).prop_map(|set| {
        let mut names: Vec<String> = set.into_iter().collect();
        names.sort();
        names
    })
}

fn requests() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-f]{1,2}", 0..8)
}

fn labels_of(selector: &Selector, index: &ColumnIndex) -> Vec<Label> {
    resolve(selector, index).unwrap().into_labels()
}

proptest! {
    #[test]
    fn test_by_label_keeps_request_order(names in names(), wanted in requests()) {
        let index = index_of(&names);
        let mut seen = HashSet::new();
        let expected: Vec<Label> = wanted
            .iter()
            .filter(|w| names.contains(w))
            .filter(|w| seen.insert(w.to_string()))
            .map(|w| Label::from(w.as_str()))
            .collect();

        prop_assert_eq!(labels_of(&Selector::by_label(wanted), &index), expected);
    }

    #[test]
    fn test_or_first_operand_wins(names in names(), a in requests(), b in requests(), c in requests()) {
        let index = index_of(&names);
        let (a, b, c) = (Selector::by_label(a), Selector::by_label(b), Selector::by_label(c));

        let left = labels_of(&((a.clone() | b.clone()) | c.clone()), &index);
        let right = labels_of(&(a.clone() | (b.clone() | c.clone())), &index);
        prop_assert_eq!(&left, &right);

        let first = labels_of(&a, &index);
        prop_assert_eq!(&left[..first.len()], first.as_slice());
    }

    #[test]
    fn test_rest_completes_the_index(names in names(), wanted in requests()) {
        let index = index_of(&names);
        let selected = labels_of(&Selector::by_label(wanted.clone()), &index);
        let all = labels_of(&(Selector::by_label(wanted) | Rest), &index);

        prop_assert_eq!(all.len(), names.len());
        prop_assert_eq!(&all[..selected.len()], selected.as_slice());

        let unique: HashSet<&Label> = all.iter().collect();
        prop_assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_not_is_the_index_ordered_complement(names in names(), wanted in requests()) {
        let index = index_of(&names);
        let selected: HashSet<Label> =
            labels_of(&Selector::by_label(wanted.clone()), &index).into_iter().collect();
        let expected: Vec<Label> = names
            .iter()
            .map(|n| Label::from(n.as_str()))
            .filter(|l| !selected.contains(l))
            .collect();

        prop_assert_eq!(labels_of(&!Selector::by_label(wanted), &index), expected);
    }
}
