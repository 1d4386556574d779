//! Integration tests for Kiln request normalization

mod normalize_tests {
    use kiln::api::{attr, cache_type, CacheOptionsEntry, SolveRequest};
    use kiln::control;
    use tracing_subscriber::EnvFilter;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("kiln=debug"))
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn legacy_only_request_gains_structured_lists() {
        init_logging();
        let mut req = SolveRequest::from_json(
            r#"{
                "id": "build-1",
                "frontend": "dockerfile.v0",
                "cache": {
                    "export_ref_deprecated": "example.com/cache:latest",
                    "import_refs_deprecated": ["example.com/cache:v1", "example.com/cache:v2"]
                }
            }"#,
        )
        .unwrap();

        control::prepare_solve_request(&mut req).unwrap();

        assert_eq!(req.cache.exports.len(), 1);
        assert_eq!(req.cache.exports[0].kind, cache_type::REGISTRY);
        assert_eq!(
            req.cache.exports[0].attrs.get(attr::REF).map(String::as_str),
            Some("example.com/cache:latest")
        );
        assert_eq!(req.cache.imports.len(), 2);

        // deprecated fields survive for telemetry
        assert_eq!(req.cache.legacy_export_ref, "example.com/cache:latest");
        assert_eq!(req.cache.legacy_import_refs.len(), 2);
    }

    #[test]
    fn mixed_generation_request_stays_duplicate_free() {
        init_logging();
        let mut req = SolveRequest::from_json(
            r#"{
                "id": "build-2",
                "cache": {
                    "exports": [
                        {"type": "registry", "attrs": {"ref": "example.com/cache:latest"}}
                    ],
                    "imports": [
                        {"type": "registry", "attrs": {"ref": "example.com/cache:v1"}}
                    ],
                    "export_ref_deprecated": "example.com/cache:latest",
                    "import_refs_deprecated": ["example.com/cache:v1", "example.com/cache:v1"]
                }
            }"#,
        )
        .unwrap();

        control::prepare_solve_request(&mut req).unwrap();

        assert_eq!(req.cache.exports.len(), 1);
        assert_eq!(req.cache.imports.len(), 1);
    }

    #[test]
    fn preparation_is_idempotent() {
        init_logging();
        let mut req = SolveRequest::default();
        req.cache.legacy_export_ref = "example.com/cache:v2".to_string();
        req.cache
            .exports
            .push(CacheOptionsEntry::registry("example.com/cache:v1"));

        control::prepare_solve_request(&mut req).unwrap();
        let once = req.clone();
        control::prepare_solve_request(&mut req).unwrap();

        assert_eq!(req, once);
        assert_eq!(req.cache.exports.len(), 2);
    }

    #[test]
    fn normalized_request_round_trips_through_json() {
        init_logging();
        let mut req = SolveRequest::default();
        req.id = "build-3".to_string();
        req.cache.legacy_import_refs = vec!["example.com/cache:v1".to_string()];

        control::prepare_solve_request(&mut req).unwrap();

        let json = req.to_json().unwrap();
        assert!(json.contains(r#""type":"registry""#));
        assert!(json.contains("import_refs_deprecated"));

        let back = SolveRequest::from_json(&json).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn export_ignore_error_read_from_attrs() {
        init_logging();
        let mut tolerant = CacheOptionsEntry::registry("example.com/cache:v1");
        tolerant
            .attrs
            .insert(attr::IGNORE_ERROR.to_string(), "True".to_string());
        assert!(control::export_ignore_error(&tolerant));

        let mut strict = CacheOptionsEntry::registry("example.com/cache:v1");
        strict
            .attrs
            .insert(attr::IGNORE_ERROR.to_string(), "nope".to_string());
        assert!(!control::export_ignore_error(&strict));
    }
}
