//! # End-to-End Scenarios
//!
//! Units and reports driven through the surface exactly as the UI layer
//! would, checked against what public verification then reports.
//!
//! ## Flows Tested:
//!
//! 1. **Approval**: create → submit-for-inspection → approve, verified `SAFE`
//! 2. **Rejection**: reject(EXPIRED), verified `UNSAFE`, no way back
//! 3. **Report triage**: anonymous report investigated and resolved
//! 4. **Role before state**: wrong role wins over wrong state
//! 5. **Full pipeline**: sold unit, ledger chain and bus traffic

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::timeout;

    use shared_bus::{EventFilter, EventTopic, TraceEvent};
    use shared_types::{ErrorKind, RejectionReason, ReportStatus, UnitStatus, UnitType};
    use trace_runtime::{RuntimeConfig, ServiceContainer, TraceRuntime};
    use wt_01_unit_lifecycle::SafetyClassification;
    use wt_02_report_triage::{NewReport, ANONYMOUS_MARKER};

    use crate::fixtures::{TestTrace, START};

    // =============================================================================
    // UNIT SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_approval_scenario() {
        let trace = TestTrace::new();
        let created = trace
            .surface
            .create_unit(&trace.producer(), Some("WAT-1"), UnitType::Bag, 10)
            .await
            .unwrap();
        assert_eq!(created.state.status, UnitStatus::Created);
        assert_eq!(created.state.created_at, START);

        trace.tick();
        let submitted = trace
            .surface
            .submit_for_inspection(&trace.inspector(), "WAT-1")
            .await
            .unwrap();
        assert_eq!(submitted.state.status, UnitStatus::Inspector);

        trace.tick();
        let approved = trace
            .surface
            .approve(&trace.inspector(), "WAT-1")
            .await
            .unwrap();
        assert_eq!(approved.state.status, UnitStatus::Approved);

        let view = trace.surface.verify("WAT-1").await.unwrap();
        assert_eq!(view.status, UnitStatus::Approved);
        assert_eq!(view.classification, SafetyClassification::Safe);
        assert_eq!(view.unit_type, UnitType::Bag);
        assert_eq!(view.quantity, 10);
        assert_eq!(view.history.len(), 3);
        assert_eq!(view.rejection_reason, None);
    }

    #[tokio::test]
    async fn test_rejection_scenario() {
        let trace = TestTrace::new();
        trace.unit_in("WAT-2", UnitStatus::Inspector).await.unwrap();

        trace.tick();
        let rejected = trace
            .surface
            .reject(&trace.inspector(), "WAT-2", "EXPIRED")
            .await
            .unwrap();
        assert_eq!(rejected.state.status, UnitStatus::RejectedExpired);
        assert_eq!(rejected.state.rejection_reason, Some(RejectionReason::Expired));

        let view = trace.surface.verify("WAT-2").await.unwrap();
        assert_eq!(view.classification, SafetyClassification::Unsafe);
        assert_eq!(view.rejection_reason, Some(RejectionReason::Expired));

        let again = trace
            .surface
            .approve(&trace.inspector(), "WAT-2")
            .await
            .unwrap_err();
        assert_eq!(again.kind(), ErrorKind::IllegalTransition);
        assert_eq!(
            trace.surface.verify("WAT-2").await.unwrap().status,
            UnitStatus::RejectedExpired
        );
    }

    #[tokio::test]
    async fn test_unsubmitted_unit_is_unrecognisable() {
        let trace = TestTrace::new();
        trace.unit_in("WAT-NEW", UnitStatus::Created).await.unwrap();
        let view = trace.surface.verify("WAT-NEW").await.unwrap();
        assert_eq!(view.classification, SafetyClassification::Unrecognisable);
    }

    #[tokio::test]
    async fn test_contaminated_unit_is_unsafe() {
        let trace = TestTrace::new();
        trace
            .unit_in("WAT-C", UnitStatus::RejectedContaminated)
            .await
            .unwrap();
        let view = trace.surface.verify("WAT-C").await.unwrap();
        assert_eq!(view.status, UnitStatus::RejectedContaminated);
        assert_eq!(view.classification, SafetyClassification::Unsafe);
    }

    // =============================================================================
    // REPORT SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_report_triage_scenario() {
        let trace = TestTrace::new();
        let admin = trace.admin();

        let report = trace
            .surface
            .submit_report(NewReport::anonymous("smells odd"))
            .await
            .unwrap()
            .state;
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.subject_code, None);
        assert_eq!(report.reporter_name, ANONYMOUS_MARKER);
        assert_eq!(report.reporter_email, ANONYMOUS_MARKER);
        let id = report.id.to_string();

        trace.tick();
        let investigating = trace
            .surface
            .start_investigation(&admin, &id, None)
            .await
            .unwrap();
        assert_eq!(investigating.state.status, ReportStatus::Investigating);

        trace.tick();
        let resolved = trace
            .surface
            .resolve(&admin, &id, Some("retested, within spec".into()))
            .await
            .unwrap()
            .state;
        assert_eq!(resolved.status, ReportStatus::Resolved);
        assert_eq!(resolved.admin_notes.as_deref(), Some("retested, within spec"));
        assert_eq!(resolved.resolved_by.unwrap().as_str(), "admin-1");

        let dismissed = trace.surface.dismiss(&admin, &id, None).await.unwrap_err();
        assert_eq!(dismissed.kind(), ErrorKind::IllegalTransition);
        assert_eq!(
            trace.surface.report(&admin, &id).await.unwrap().status,
            ReportStatus::Resolved
        );
    }

    #[tokio::test]
    async fn test_report_with_subject_and_reporter() {
        let trace = TestTrace::new();
        let new = NewReport {
            subject_code: Some("WAT-9".into()),
            reason: "cloudy water".into(),
            reporter_name: Some("  Ama ".into()),
            reporter_email: Some("".into()),
        };
        let report = trace.surface.submit_report(new).await.unwrap().state;
        assert_eq!(report.subject_code.as_deref(), Some("WAT-9"));
        assert_eq!(report.reporter_name, "Ama");
        assert_eq!(report.reporter_email, ANONYMOUS_MARKER);
    }

    #[tokio::test]
    async fn test_blank_report_reason_rejected() {
        let trace = TestTrace::new();
        let err = trace
            .surface
            .submit_report(NewReport::anonymous("   "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);
    }

    // =============================================================================
    // ROLE BEFORE STATE
    // =============================================================================

    #[tokio::test]
    async fn test_distribute_on_created_unit() {
        let trace = TestTrace::new();
        trace.unit_in("WAT-D", UnitStatus::Created).await.unwrap();

        let wrong_role = trace
            .surface
            .distribute(&trace.inspector(), "WAT-D")
            .await
            .unwrap_err();
        assert_eq!(wrong_role.kind(), ErrorKind::Forbidden);

        let wrong_state = trace
            .surface
            .distribute(&trace.distributor(), "WAT-D")
            .await
            .unwrap_err();
        assert_eq!(wrong_state.kind(), ErrorKind::IllegalTransition);

        assert_eq!(
            trace.surface.verify("WAT-D").await.unwrap().status,
            UnitStatus::Created
        );
    }

    // =============================================================================
    // FULL PIPELINE
    // =============================================================================

    #[tokio::test]
    async fn test_full_pipeline_through_runtime() {
        let trace = TestTrace::new();
        let mut sub = trace
            .container
            .event_bus
            .subscribe(EventFilter::topics(vec![EventTopic::Units]));

        let sold = trace.unit_in("WAT-S", UnitStatus::Sold).await.unwrap();
        assert_eq!(sold.status, UnitStatus::Sold);
        assert_eq!(trace.container.ledger.len(), 5);
        assert!(trace.container.ledger.verify_chain().is_ok());

        let mut seen = Vec::new();
        while let Ok(Some(event)) = timeout(Duration::from_millis(100), sub.recv()).await {
            match event {
                TraceEvent::UnitCreated(t) | TraceEvent::UnitTransitioned(t) => seen.push(t.to),
                other => panic!("unexpected event on units topic: {:?}", other),
            }
            if seen.len() == 5 {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                UnitStatus::Created,
                UnitStatus::Inspector,
                UnitStatus::Approved,
                UnitStatus::Distributed,
                UnitStatus::Sold,
            ]
        );

        let view = trace.surface.verify("WAT-S").await.unwrap();
        assert_eq!(view.classification, SafetyClassification::Safe);
        let times: Vec<_> = view.history.iter().map(|h| h.at).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_runtime_start_and_shutdown() {
        let mut runtime = TraceRuntime::from_container(ServiceContainer::new(
            RuntimeConfig::default(),
        ));
        runtime.start();

        let surface = runtime.surface();
        let token = runtime
            .container()
            .credentials
            .issue(shared_types::Principal::new(
                "prod-1",
                shared_types::Role::Producer,
            ));
        surface
            .create_unit(&token, Some("WAT-RT"), UnitType::Pack, 24)
            .await
            .unwrap();
        assert_eq!(
            surface.verify("WAT-RT").await.unwrap().status,
            UnitStatus::Created
        );

        timeout(Duration::from_secs(5), runtime.shutdown())
            .await
            .expect("runtime did not shut down");
    }
}
