//! Macro-generated test suite for `DataProvider` contract validation.
//!
//! The `data_provider_tests!` macro generates a test module that validates
//! any provider serving the sample export against the full contract:
//! paging, every filter key per record kind, detail lookups and the
//! operations a read-only source rejects.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod provider_harness;
//!
//! use provider_harness::*;
//!
//! data_provider_tests!(snapshot_fixture());
//! ```
//!
//! # Generated Tests
//!
//! ## Paging
//! - `test_first_page_envelope` / `test_pages_concatenate` / `test_page_beyond_last`
//! - `test_zero_page_size_returns_everything`
//!
//! ## Filters
//! - beans, observers, events and invocation trees, one test per record kind
//!
//! ## Lookups
//! - bean / observer / event / invocation / context detail, unknown ids
//!
//! ## Read-only source
//! - clearing histories, bean instances and available beans are unsupported

/// Generate a full `DataProvider` conformance test suite.
///
/// `$factory` must be an expression evaluating to a future that resolves to
/// a [`ProviderFixture`] over the sample export. It is re-evaluated for each
/// test.
#[macro_export]
macro_rules! data_provider_tests {
    ($factory:expr) => {
        mod data_provider_contract_tests {
            use super::*;
            use probe::core::ProbeError;
            use serde_json::json;

            async fn beans_page(
                fixture: &ProviderFixture,
                page: usize,
                page_size: usize,
                filters: &str,
            ) -> serde_json::Value {
                parse(
                    &fixture
                        .provider
                        .receive_beans(page, page_size, filters, None)
                        .await
                        .unwrap(),
                )
            }

            async fn bean_ids(fixture: &ProviderFixture, filters: &str) -> Vec<String> {
                page_ids(&beans_page(fixture, 0, 0, filters).await)
            }

            // ==================================================================
            // Deployment
            // ==================================================================

            #[tokio::test]
            async fn test_deployment() {
                let fixture = $factory.await;
                let deployment = parse(&fixture.provider.receive_deployment().await.unwrap());
                assert_eq!(deployment, provider_harness::deployment());
            }

            // ==================================================================
            // Paging
            // ==================================================================

            #[tokio::test]
            async fn test_first_page_envelope() {
                let fixture = $factory.await;
                let page = beans_page(&fixture, 0, 2, "").await;
                assert_eq!(page["page"], 0);
                assert_eq!(page["lastPage"], 2);
                assert_eq!(page["total"], 5);
                assert_eq!(page_ids(&page), vec!["b1", "b2"]);
            }

            #[tokio::test]
            async fn test_pages_concatenate() {
                let fixture = $factory.await;
                for page_size in 1..=6 {
                    let first = beans_page(&fixture, 0, page_size, "").await;
                    let last_page = first["lastPage"].as_u64().unwrap() as usize;
                    let mut ids = Vec::new();
                    for page in 0..=last_page {
                        ids.extend(page_ids(&beans_page(&fixture, page, page_size, "").await));
                    }
                    assert_eq!(ids, vec!["b1", "b2", "b3", "b4", "b5"], "page size {}", page_size);
                }
            }

            #[tokio::test]
            async fn test_page_beyond_last() {
                let fixture = $factory.await;
                let page = beans_page(&fixture, 10, 2, "").await;
                assert_eq!(page["page"], 10);
                assert_eq!(page["lastPage"], 2);
                assert_eq!(page["total"], 5);
                assert_eq!(page["data"], json!([]));
            }

            #[tokio::test]
            async fn test_zero_page_size_returns_everything() {
                let fixture = $factory.await;
                let page = parse(&fixture.provider.receive_events(0, 0, "").await.unwrap());
                assert_eq!(page_ids(&page), vec!["e1", "e2", "e3"]);
                assert_eq!(page["lastPage"], 0);
            }

            // ==================================================================
            // Bean filters
            // ==================================================================

            #[tokio::test]
            async fn test_bean_kind_filter() {
                let fixture = $factory.await;
                let page = beans_page(&fixture, 0, 2, "kind:MANAGED").await;
                assert_eq!(page["page"], 0);
                assert_eq!(page["lastPage"], 0);
                assert_eq!(page["total"], 2);
                assert_eq!(page_ids(&page), vec!["b1", "b2"]);

                // Unknown kinds leave the filter unset
                assert_eq!(bean_ids(&fixture, "kind:WHATEVER").await.len(), 5);
            }

            #[tokio::test]
            async fn test_bean_text_filters() {
                let fixture = $factory.await;
                assert_eq!(bean_ids(&fixture, "beanClass:cart").await, vec!["b1"]);
                assert_eq!(bean_ids(&fixture, "scope:session").await, vec!["b1"]);
                assert_eq!(bean_ids(&fixture, "beanType:entitymanager").await, vec!["b4"]);
                assert_eq!(bean_ids(&fixture, "qualifier:default").await, vec!["b1", "b2"]);
                assert_eq!(bean_ids(&fixture, "stereotypes:model").await, vec!["b3"]);
                assert!(bean_ids(&fixture, "beanClass:nothing").await.is_empty());
            }

            #[tokio::test]
            async fn test_bean_quoted_filter_value() {
                let fixture = $factory.await;
                let ids = bean_ids(&fixture, r#"beanClass:"acme.Shopping" kind:MANAGED"#).await;
                assert_eq!(ids, vec!["b1"]);
            }

            #[tokio::test]
            async fn test_bean_flag_filters() {
                let fixture = $factory.await;
                assert_eq!(bean_ids(&fixture, "isAlternative:true").await, vec!["b2"]);
                assert_eq!(bean_ids(&fixture, "unused:true").await, vec!["b4"]);
                // unused:false alone does not filter anything
                assert_eq!(bean_ids(&fixture, "unused:false").await.len(), 5);
            }

            #[tokio::test]
            async fn test_bean_module_filters() {
                let fixture = $factory.await;
                assert_eq!(bean_ids(&fixture, "bda:bda-web").await, vec!["b1", "b2", "b3"]);
                assert_eq!(bean_ids(&fixture, "bda:bda-extra").await, vec!["b4"]);
                assert_eq!(
                    bean_ids(&fixture, "bda:probe-filterAdditionalBdas").await,
                    vec!["b1", "b2", "b3"]
                );
            }

            // ==================================================================
            // Bean detail
            // ==================================================================

            #[tokio::test]
            async fn test_bean_detail_strips_transitive_entries() {
                let fixture = $factory.await;
                let bean = parse(&fixture.provider.receive_bean("b1", false, false).await.unwrap());
                assert_eq!(bean["beanClass"], "com.acme.ShoppingCart");
                assert_eq!(bean["dependencies"][0]["id"], "b2");
                assert_eq!(bean["dependencies"][0]["beanClass"], "com.acme.PriceCalculator");
                assert!(bean["dependencies"][0].get("dependencies").is_none());
                assert!(bean["dependents"][0].get("dependents").is_none());

                let bean = parse(&fixture.provider.receive_bean("b1", true, true).await.unwrap());
                assert_eq!(bean["dependencies"][0]["dependencies"][0]["id"], "b3");
                assert_eq!(bean["dependents"][0]["dependents"][0]["id"], "b5");
            }

            #[tokio::test]
            async fn test_bean_not_found() {
                let fixture = $factory.await;
                let result = fixture.provider.receive_bean("unknown", false, false).await;
                assert!(matches!(result, Err(ProbeError::NotFound { .. })), "{:?}", result);
            }

            // ==================================================================
            // Observers
            // ==================================================================

            #[tokio::test]
            async fn test_observer_filters() {
                let fixture = $factory.await;
                let ids = |filters: &'static str| {
                    let provider = fixture.provider.clone();
                    async move {
                        page_ids(&parse(&provider.receive_observers(0, 0, filters).await.unwrap()))
                    }
                };
                assert_eq!(ids("").await, vec!["o1", "o2"]);
                assert_eq!(ids("kind:EXTENSION").await, vec!["o2"]);
                assert_eq!(ids("reception:ALWAYS").await, vec!["o1", "o2"]);
                assert_eq!(ids("txPhase:AFTER_SUCCESS bda:bda-web").await, vec!["o1"]);
                assert_eq!(ids("observedType:orderplaced").await, vec!["o1"]);
                assert_eq!(ids("qualifier:any").await, vec!["o1"]);
                assert_eq!(ids("beanClass:probeextension").await, vec!["o2"]);
                assert_eq!(ids("bda:probe-filterAdditionalBdas").await, vec!["o1"]);
            }

            #[tokio::test]
            async fn test_observer_detail() {
                let fixture = $factory.await;
                let observer = parse(&fixture.provider.receive_observer("o1").await.unwrap());
                assert_eq!(observer["observedType"], "com.acme.OrderPlaced");
                assert!(matches!(
                    fixture.provider.receive_observer("o9").await,
                    Err(ProbeError::NotFound { .. })
                ));
            }

            // ==================================================================
            // Contexts
            // ==================================================================

            #[tokio::test]
            async fn test_contexts() {
                let fixture = $factory.await;
                let contexts = parse(&fixture.provider.receive_contexts().await.unwrap());
                assert_eq!(contexts, provider_harness::contexts());

                let detail = parse(&fixture.provider.receive_context("request").await.unwrap());
                assert_eq!(detail, request_context());
            }

            #[tokio::test]
            async fn test_unknown_context_is_empty_object() {
                let fixture = $factory.await;
                let detail = parse(&fixture.provider.receive_context("unknown").await.unwrap());
                assert_eq!(detail, json!({}));
                // Listed context without a detail document
                let detail = parse(&fixture.provider.receive_context("application").await.unwrap());
                assert_eq!(detail, json!({}));
            }

            // ==================================================================
            // Events
            // ==================================================================

            #[tokio::test]
            async fn test_event_filters() {
                let fixture = $factory.await;
                let ids = |filters: &'static str| {
                    let provider = fixture.provider.clone();
                    async move {
                        page_ids(&parse(&provider.receive_events(0, 0, filters).await.unwrap()))
                    }
                };
                assert_eq!(ids("kind:application").await, vec!["e2", "e3"]);
                assert_eq!(ids("kind:CONTAINER").await, vec!["e1"]);
                assert_eq!(ids("type:Shipped").await, vec!["e3"]);
                assert_eq!(ids(r#"eventInfo:"order 42""#).await, vec!["e2", "e3"]);
                assert_eq!(ids("qualifiers:default").await, vec!["e2"]);
            }

            #[tokio::test]
            async fn test_event_detail() {
                let fixture = $factory.await;
                let event = parse(&fixture.provider.receive_event("e2").await.unwrap());
                assert_eq!(event["type"], "com.acme.OrderPlaced");
                assert!(matches!(
                    fixture.provider.receive_event("e9").await,
                    Err(ProbeError::NotFound { .. })
                ));
            }

            // ==================================================================
            // Invocations
            // ==================================================================

            #[tokio::test]
            async fn test_invocation_filters() {
                let fixture = $factory.await;
                let ids = |filters: &'static str| {
                    let provider = fixture.provider.clone();
                    async move {
                        page_ids(&parse(&provider.receive_invocations(0, 0, filters).await.unwrap()))
                    }
                };
                // Only the depth-3 leaf carries this method name
                assert_eq!(ids("search:deeplynested").await, vec!["i1"]);
                assert!(ids("methodName:flushDeeplyNested").await.is_empty());
                assert_eq!(ids("methodName:placeorder").await, vec!["i1"]);
                assert_eq!(ids("beanClass:orderresource").await, vec!["i1"]);
                assert_eq!(ids("description:orders").await, vec!["i1"]);
                assert!(ids("search:nowhere").await.is_empty());
            }

            #[tokio::test]
            async fn test_invocation_detail() {
                let fixture = $factory.await;
                let invocation = parse(&fixture.provider.receive_invocation("i1").await.unwrap());
                assert_eq!(
                    invocation["children"][0]["children"][0]["methodName"],
                    "flushDeeplyNested"
                );
                assert!(matches!(
                    fixture.provider.receive_invocation("i9").await,
                    Err(ProbeError::NotFound { .. })
                ));
            }

            // ==================================================================
            // Monitoring
            // ==================================================================

            #[tokio::test]
            async fn test_monitoring_stats() {
                let fixture = $factory.await;
                let stats = parse(&fixture.provider.receive_monitoring_stats().await.unwrap());
                assert_eq!(stats, json!({"firedEventCount": 3, "invocationCount": 1}));
            }

            // ==================================================================
            // Read-only source
            // ==================================================================

            #[tokio::test]
            async fn test_unsupported_operations() {
                let fixture = $factory.await;
                let provider = &fixture.provider;
                assert!(matches!(
                    provider.clear_events().await,
                    Err(ProbeError::Unsupported { .. })
                ));
                assert!(matches!(
                    provider.clear_invocations().await,
                    Err(ProbeError::Unsupported { .. })
                ));
                assert!(matches!(
                    provider.receive_bean_instance("b1").await,
                    Err(ProbeError::Unsupported { .. })
                ));
                assert!(matches!(
                    provider.receive_available_beans(0, 10, "", None).await,
                    Err(ProbeError::Unsupported { .. })
                ));

                // Nothing was cleared
                let stats = parse(&provider.receive_monitoring_stats().await.unwrap());
                assert_eq!(stats["firedEventCount"], 3);
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_reads() {
                let fixture = $factory.await;
                let mut handles = Vec::new();
                for i in 0..16 {
                    let provider = fixture.provider.clone();
                    handles.push(tokio::spawn(async move {
                        let filters = if i % 2 == 0 { "kind:MANAGED" } else { "" };
                        provider.receive_beans(0, 0, filters, None).await.unwrap()
                    }));
                }
                for (i, handle) in handles.into_iter().enumerate() {
                    let page = parse(&handle.await.unwrap());
                    assert_eq!(page["total"], if i % 2 == 0 { 2 } else { 5 });
                }
            }
        }
    };
}
