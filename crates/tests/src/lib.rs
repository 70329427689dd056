//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试（线上 JSON 格式）
//! - e2e 测试：原始订单 -> offers 处理 -> dispatcher -> pub/sub + HTTP ingest

#[cfg(test)]
mod contract_tests {
    use contracts::{CorrelationId, Order, RawRecord, UploadBatch};
    use serde_json::json;

    #[test]
    fn test_upload_batch_wire_format() {
        let raw = RawRecord::from_json(
            r#"{"Id":7,"ItemTypeId":"T4_BAG","LocationId":"","UnitPriceSilver":1200,"Amount":3,"Tier":4}"#,
        )
        .unwrap();
        let order = raw.into_order("3005".to_string()).unwrap();
        let batch = UploadBatch::new(vec![order], CorrelationId::new()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&batch.to_json().unwrap()).unwrap();
        let order = &value["Orders"][0];
        assert_eq!(order["Id"], json!(7));
        assert_eq!(order["ItemTypeId"], json!("T4_BAG"));
        assert_eq!(order["LocationId"], json!("3005"));
        assert_eq!(order["UnitPriceSilver"], json!(1200));
        // unknown fields survive
        assert_eq!(order["Tier"], json!(4));
        // correlation id is not part of the payload
        assert_eq!(value.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_batch_is_not_constructible() {
        assert!(UploadBatch::new(Vec::<Order>::new(), CorrelationId::new()).is_none());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::{Arc, Mutex};

    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use contracts::{
        ContractError, CorrelationId, MarketEvent, OffersResponse, Publisher, SessionState,
        UploadBatch,
    };
    use dispatcher::create_dispatcher;
    use ingestion::{handle_event, EventOutcome};
    use serde_json::Value;

    /// Publisher that records every publish call
    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<(String, Vec<String>, CorrelationId)>>,
    }

    impl Publisher for RecordingPublisher {
        async fn publish(
            &self,
            topic: &str,
            batch: &UploadBatch,
            correlation_id: &CorrelationId,
        ) -> Result<(), ContractError> {
            let locations = batch
                .orders()
                .iter()
                .map(|o| o.location_id.clone())
                .collect();
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), locations, *correlation_id));
            Ok(())
        }
    }

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn ingest(
        State((received, status)): State<(Received, StatusCode)>,
        body: Bytes,
    ) -> StatusCode {
        received
            .lock()
            .unwrap()
            .push(serde_json::from_slice(&body).unwrap_or(Value::Null));
        status
    }

    /// Spawn an ingest endpoint answering every POST with `status`
    async fn spawn_ingest(status: StatusCode) -> (String, Received) {
        let received: Received = Arc::default();
        let app = Router::new()
            .route("/ingest", post(ingest))
            .with_state((Arc::clone(&received), status));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/"), received)
    }

    fn config_toml(http_sinks: &[(&str, &str)]) -> String {
        let mut toml = String::from(
            "[session]\nlocation_id = \"3005\"\n\n[[sinks]]\nname = \"public\"\ntype = \"pub_sub\"\n",
        );
        for (name, url) in http_sinks {
            toml.push_str(&format!(
                "\n[[sinks]]\nname = \"{name}\"\ntype = \"http\"\nurl = \"{url}\"\ntimeout_secs = 2\n"
            ));
        }
        toml
    }

    fn response(records: &[&str]) -> MarketEvent {
        MarketEvent::OffersResponse(OffersResponse {
            market_orders: records.iter().map(|r| r.to_string()).collect(),
        })
    }

    /// End-to-end: raw records -> handler -> dispatcher -> pub/sub + HTTP
    ///
    /// 验证：
    /// 1. 带 `@` 的位置保持不变，空位置取会话位置
    /// 2. 一个批次、一个关联 ID，所有 sink 收到相同订单
    #[tokio::test]
    async fn test_e2e_example_scenario() {
        let (base, received) = spawn_ingest(StatusCode::OK).await;
        let config = config_loader::ConfigLoader::load_from_str(
            &config_toml(&[("private", &base)]),
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        let dispatcher = create_dispatcher(&config, RecordingPublisher::default()).unwrap();
        let mut session = SessionState::at(config.session.location_id.clone().unwrap());

        let event = response(&[
            r#"{"LocationId":"0007@1000","ItemTypeId":"T4_BAG"}"#,
            r#"{"LocationId":"","ItemTypeId":"T5_SWORD"}"#,
        ]);
        let batch = handle_event(&mut session, &event).into_batch().unwrap();
        assert_eq!(batch.len(), 2);

        let report = dispatcher.dispatch(&batch).await;
        assert!(report.all_delivered());
        assert_eq!(report.correlation_id, batch.correlation_id());

        let published = dispatcher.pub_sub().unwrap().publisher().published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let (topic, locations, correlation_id) = &published[0];
        assert_eq!(topic, "marketorders.ingest");
        assert_eq!(locations, &vec!["0007@1000".to_string(), "3005".to_string()]);
        assert_eq!(*correlation_id, batch.correlation_id());

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let orders = received[0]["Orders"].as_array().unwrap();
        assert_eq!(orders[0]["LocationId"], "0007@1000");
        assert_eq!(orders[1]["LocationId"], "3005");
        assert_eq!(orders[1]["ItemTypeId"], "T5_SWORD");
    }

    #[tokio::test]
    async fn test_e2e_zero_records_no_sink_calls() {
        let (base, received) = spawn_ingest(StatusCode::OK).await;
        let config = config_loader::ConfigLoader::load_from_str(
            &config_toml(&[("private", &base)]),
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        let dispatcher = create_dispatcher(&config, RecordingPublisher::default()).unwrap();
        let mut session = SessionState::at("3005");

        for event in [response(&[]), response(&["not json", "[1,2]"])] {
            let outcome = handle_event(&mut session, &event);
            assert!(matches!(outcome, EventOutcome::Empty { .. }));
            if let Some(batch) = outcome.into_batch() {
                dispatcher.dispatch(&batch).await;
            }
        }

        assert!(dispatcher.pub_sub().unwrap().publisher().published.lock().unwrap().is_empty());
        assert!(received.lock().unwrap().is_empty());
        assert!(dispatcher.metrics().iter().all(|(_, m)| m.delivered_count == 0));
    }

    #[tokio::test]
    async fn test_e2e_failing_http_sink_isolated() {
        let (good, good_received) = spawn_ingest(StatusCode::OK).await;
        let (bad, bad_received) = spawn_ingest(StatusCode::INTERNAL_SERVER_ERROR).await;
        let config = config_loader::ConfigLoader::load_from_str(
            &config_toml(&[("broken", &bad), ("private", &good)]),
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        let dispatcher = create_dispatcher(&config, RecordingPublisher::default()).unwrap();
        let mut session = SessionState::at("3005");

        let event = response(&[r#"{"Id":1,"ItemTypeId":"T4_BAG"}"#]);
        let batch = handle_event(&mut session, &event).into_batch().unwrap();
        let report = dispatcher.dispatch(&batch).await;

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcome("public").unwrap().is_delivered());
        assert!(report.outcome("private").unwrap().is_delivered());
        assert!(!report.outcome("broken").unwrap().is_delivered());

        // one attempt only, no retry
        assert_eq!(bad_received.lock().unwrap().len(), 1);
        assert_eq!(good_received.lock().unwrap().len(), 1);
        assert_eq!(
            dispatcher.pub_sub().unwrap().publisher().published.lock().unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_e2e_unknown_location_discards_response() {
        let config = config_loader::ConfigLoader::load_from_str(
            "[[sinks]]\nname = \"public\"\ntype = \"pub_sub\"\n",
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        let dispatcher = create_dispatcher(&config, RecordingPublisher::default()).unwrap();
        let mut session = SessionState::default();

        let event = response(&[r#"{"ItemTypeId":"T4_BAG"}"#]);
        assert!(matches!(
            handle_event(&mut session, &event),
            EventOutcome::InvalidLocation
        ));

        handle_event(
            &mut session,
            &MarketEvent::LocationChanged {
                location_id: "4002".to_string(),
            },
        );
        let batch = handle_event(&mut session, &event).into_batch().unwrap();
        dispatcher.dispatch(&batch).await;

        let published = dispatcher.pub_sub().unwrap().publisher().published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].1, vec!["4002".to_string()]);
    }

    #[tokio::test]
    async fn test_e2e_upload_metrics_aggregation() {
        let (bad, _) = spawn_ingest(StatusCode::SERVICE_UNAVAILABLE).await;
        let config = config_loader::ConfigLoader::load_from_str(
            &config_toml(&[("broken", &bad)]),
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        let dispatcher = create_dispatcher(&config, RecordingPublisher::default()).unwrap();
        let mut session = SessionState::at("3005");
        let mut aggregator = observability::UploadMetricsAggregator::new();

        for records in [&["{\"Id\":1}", "{\"Id\":2}"][..], &["{\"Id\":3}", "oops"][..]] {
            let outcome = handle_event(&mut session, &response(records));
            aggregator.record_rejected(outcome.rejected().len());
            if let Some(batch) = outcome.into_batch() {
                aggregator.record_batch(batch.len());
                for o in dispatcher.dispatch(&batch).await.outcomes {
                    aggregator.record_delivery(&o.sink, o.is_delivered());
                }
            }
        }

        let summary = aggregator.summary();
        assert_eq!(summary.total_batches, 2);
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.total_rejected, 1);
        assert_eq!(summary.sink_successes.get("public"), Some(&2));
        assert_eq!(summary.sink_failures.get("broken"), Some(&2));
        assert!((summary.delivery_failure_rate - 50.0).abs() < 1e-9);
    }
}
