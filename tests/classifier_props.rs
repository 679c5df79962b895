// Property tests for classification invariants
use std::collections::HashSet;

use clipboard_toolbox::classifier::{ClassificationRequest, ContentClassifier};
use clipboard_toolbox::registry::ToolRegistry;
use clipboard_toolbox::tools::{ClipboardContentType, ToolId};
use proptest::prelude::*;

fn media_type() -> impl Strategy<Value = ClipboardContentType> {
    prop_oneof![
        Just(ClipboardContentType::Photo),
        Just(ClipboardContentType::Video),
    ]
}

proptest! {
    #[test]
    fn media_results_ignore_content(content_type in media_type(), content in proptest::option::of(".*")) {
        let registry = ToolRegistry::with_builtin_tools();
        let classifier = ContentClassifier::new(&registry);

        let bare = classifier
            .classify(Some(&ClassificationRequest::of_type(content_type)))
            .unwrap();
        let with_content = classifier
            .classify(Some(&ClassificationRequest { content_type, content }))
            .unwrap();
        prop_assert_eq!(bare, with_content);
    }

    #[test]
    fn text_classification_is_idempotent(content in ".*") {
        let registry = ToolRegistry::with_builtin_tools();
        let classifier = ContentClassifier::new(&registry);
        let request = ClassificationRequest::text(content);

        let first = classifier.classify(Some(&request)).unwrap();
        let second = classifier.classify(Some(&request)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn text_results_only_contain_string_tools(content in ".+") {
        let registry = ToolRegistry::with_builtin_tools();
        let result = ContentClassifier::new(&registry)
            .classify(Some(&ClassificationRequest::text(content)))
            .unwrap();

        for id in result.iter() {
            let registration = registry.get(id).unwrap();
            prop_assert!(registration.supports(ClipboardContentType::String));
        }
    }

    #[test]
    fn text_results_have_no_duplicates_before_fallback(content in ".+") {
        let registry = ToolRegistry::with_builtin_tools();
        let result = ContentClassifier::new(&registry)
            .classify(Some(&ClassificationRequest::text(content)))
            .unwrap();

        let tools = result.tools();
        prop_assert_eq!(tools.last(), Some(&ToolId::DEFAULT_FALLBACK));
        let head = &tools[..tools.len() - 1];
        let unique: HashSet<&ToolId> = head.iter().collect();
        prop_assert_eq!(unique.len(), head.len());
    }

    #[test]
    fn base64_shaped_text_is_detected(bytes in proptest::collection::vec(0u8..64, 2..20)) {
        const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
        let mut text: String = bytes.iter().map(|b| ALPHABET[*b as usize] as char).collect();
        while text.len() % 4 != 0 || text.len() < 8 {
            text.push('=');
        }

        let registry = ToolRegistry::with_builtin_tools();
        let result = ContentClassifier::new(&registry)
            .classify(Some(&ClassificationRequest::text(text)))
            .unwrap();
        prop_assert!(result.contains(&ToolId::BASE64_CODEC));
    }
}
