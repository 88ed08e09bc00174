// Property checks for string passthrough.
use image_loader::{ImageContent, ImageLoader, LoaderConfig};
use proptest::prelude::*;

proptest! {
    #[test]
    fn non_empty_strings_pass_through_unchanged(src in ".{1,64}") {
        let loader = ImageLoader::new(LoaderConfig::default()).expect("loader init failed");
        let loaded = loader.load_string(&src).expect("non-empty src should load");

        prop_assert_eq!(loaded.content(), &ImageContent::FromString { src: src.clone() });
        prop_assert!(!loaded.has_release());
    }

    #[test]
    fn repeated_loads_are_structurally_equal(src in "[a-z0-9/._-]{1,32}") {
        let loader = ImageLoader::new(LoaderConfig::default()).expect("loader init failed");

        let first = loader.load_string(&src).expect("first load").release();
        let second = loader.load_string(&src).expect("second load").release();

        prop_assert_eq!(first, second);
    }
}
