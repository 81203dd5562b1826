use pkgsync_fs::NormalizedPath;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_. -]{1,12}".prop_filter("not a dot segment", |s| s != "." && s != "..")
}

proptest! {
    #[test]
    fn test_normalized_path_has_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }

    #[test]
    fn test_dir_and_file_name_rebuild_relative_path(
        segments in prop::collection::vec(segment(), 1..5),
    ) {
        let rel = NormalizedPath::new(segments.join("/"));

        let rebuilt = NormalizedPath::new(rel.dir()).join(rel.file_name().unwrap());

        prop_assert_eq!(rebuilt, rel);
    }

    #[test]
    fn test_relative_inverts_to_native_under(
        segments in prop::collection::vec(segment(), 1..5),
    ) {
        let root = std::path::Path::new("/sync/root");
        let rel = NormalizedPath::new(segments.join("/"));

        let absolute = rel.to_native_under(root);

        prop_assert_eq!(NormalizedPath::relative(&absolute, root), Some(rel));
    }
}
