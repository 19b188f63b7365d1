//! Property tests for list sizing and path lenses

use contractform_document::{resize, Lens, ListSizer, Path, Segment, Value};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn nonzero(x: &u8) -> bool {
    *x != 0
}

fn bounds() -> impl Strategy<Value = (usize, usize)> {
    (0_usize..12, 0_usize..12).prop_map(|(a, b)| (a.min(b), a.max(b)))
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn resize_is_idempotent(
        items in prop::collection::vec(prop_oneof![3 => Just(0_u8), 1 => 1_u8..5], 0..20),
        (min, max) in bounds(),
    ) {
        let once = resize(items, min, max, nonzero, || 0);
        let twice = resize(once.clone(), min, max, nonzero, || 0);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn resize_respects_bounds(
        items in prop::collection::vec(0_u8..3, 0..20),
        (min, max) in bounds(),
    ) {
        let len = resize(items, min, max, nonzero, || 0).len();
        prop_assert!(min <= len && len <= max);
    }

    #[test]
    fn resize_keeps_prefix_and_single_blank_tail(
        items in prop::collection::vec(0_u8..3, 0..20),
    ) {
        let sizer = ListSizer::new(0, 100);
        let out = sizer.resize(items.clone(), nonzero, || 0);

        // the kept part is an untouched prefix of the input (or the input plus blanks)
        let shared = out.len().min(items.len());
        prop_assert_eq!(&out[..shared], &items[..shared]);

        // exactly one blank after the last non-empty element
        prop_assert_eq!(out.last().copied(), Some(0));
        let last_filled = out.iter().rposition(nonzero);
        prop_assert_eq!(last_filled.map_or(0, |i| i + 1), out.len() - 1);
    }

    #[test]
    fn path_lens_set_get(key in "[a-z]{1,6}", idx in 0_usize..4, text in "[ -~]{0,12}") {
        let path = Path::from(vec![Segment::field(key), Segment::Index(idx)]);
        let next = path.set(&Value::Null, Value::from(text.as_str()));
        let read = path.get(&next);
        prop_assert_eq!(read.as_str(), Some(text.as_str()));
    }

    #[test]
    fn path_lens_get_set(text in "[a-z]{0,8}") {
        let body = Value::record([("a", Value::record([("b", Value::from(text.as_str()))]))]);
        let path = Path::parse("a.b").unwrap();
        let same = path.set(&body, path.get(&body));
        prop_assert_eq!(same, body);
    }
}
