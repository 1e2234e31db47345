use eclint_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_join_then_strip_prefix(base in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", rel in "[a-z]{1,8}(/[a-z.]{1,8}){0,3}") {
        let base = NormalizedPath::new(format!("/{}", base));
        let joined = base.join(&rel);
        let stripped = joined.strip_prefix(&base).unwrap();
        prop_assert_eq!(stripped, NormalizedPath::new(&rel));
    }
}
