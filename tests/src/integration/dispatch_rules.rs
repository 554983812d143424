//! # Dispatch Rules
//!
//! The dispatcher's check order and the closed transition tables, exercised
//! over every `(status, command)` pair through the wired container.
//!
//! ```text
//! credential ──► role gate ──► read ──► state table ──► payload ──► commit ──► ledger
//! ```

#[cfg(test)]
mod tests {
    use shared_types::{
        CapabilityToken, ErrorKind, RejectionReason, ReportCommand, ReportStatus, Role, UnitCode,
        UnitCommand, UnitCommandKind, UnitStatus,
    };
    use wt_01_unit_lifecycle::{required_roles, UNIT_CAPABILITIES};
    use wt_02_report_triage::{NewReport, REPORT_CAPABILITIES};
    use wt_03_command_dispatch::CommandApi;

    use crate::fixtures::{TestTrace, START};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn command_for(kind: UnitCommandKind) -> UnitCommand {
        match kind {
            UnitCommandKind::SubmitForInspection => UnitCommand::SubmitForInspection,
            UnitCommandKind::Approve => UnitCommand::Approve,
            UnitCommandKind::Reject => UnitCommand::Reject {
                reason: RejectionReason::Contaminated,
            },
            UnitCommandKind::Distribute => UnitCommand::Distribute,
            UnitCommandKind::Sell => UnitCommand::Sell,
        }
    }

    fn in_table(status: UnitStatus, kind: UnitCommandKind) -> bool {
        UNIT_CAPABILITIES
            .iter()
            .any(|row| row.from == status && row.command == kind)
    }

    fn code(raw: &str) -> UnitCode {
        UnitCode::parse(raw).unwrap()
    }

    async fn report_in(trace: &TestTrace, status: ReportStatus) -> String {
        let admin = trace.admin();
        let id = trace
            .surface
            .submit_report(NewReport::anonymous("bottle cap broken"))
            .await
            .unwrap()
            .state
            .id
            .to_string();
        let path: &[ReportCommand] = match status {
            ReportStatus::Pending => &[],
            ReportStatus::Investigating => &[ReportCommand::StartInvestigation],
            ReportStatus::Resolved => &[ReportCommand::StartInvestigation, ReportCommand::Resolve],
            ReportStatus::Dismissed => &[ReportCommand::Dismiss],
        };
        for command in path {
            trace.tick();
            let id = id.parse().unwrap();
            trace
                .container
                .dispatcher
                .dispatch_report(&admin, id, *command, None)
                .await
                .unwrap();
        }
        id
    }

    // =============================================================================
    // UNIT TABLE
    // =============================================================================

    #[tokio::test]
    async fn test_every_unit_pair_outside_table_is_illegal() {
        let trace = TestTrace::new();

        for (i, status) in UnitStatus::ALL.iter().enumerate() {
            for kind in UnitCommandKind::ALL {
                let raw = format!("WAT-{}-{}", i, kind.as_str());
                trace.unit_in(&raw, *status).await.unwrap();
                let role = required_roles(kind)[0];
                let token = trace.token("actor", role);
                let ledger_before = trace.container.ledger.len();

                trace.tick();
                let result = trace
                    .container
                    .dispatcher
                    .dispatch_unit(&token, &code(&raw), command_for(kind))
                    .await;

                if in_table(*status, kind) {
                    assert!(result.is_ok(), "{} from {} should be legal", kind, status);
                    assert_eq!(trace.container.ledger.len(), ledger_before + 1);
                } else {
                    let err = result.unwrap_err();
                    assert_eq!(
                        err.kind(),
                        ErrorKind::IllegalTransition,
                        "{} from {}",
                        kind,
                        status
                    );
                    assert_eq!(trace.container.ledger.len(), ledger_before);
                    let view = trace.surface.verify(&raw).await.unwrap();
                    assert_eq!(view.status, *status);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_every_role_outside_row_is_forbidden() {
        let trace = TestTrace::new();

        for row in UNIT_CAPABILITIES {
            for role in Role::ALL {
                if row.permits(role) {
                    continue;
                }
                let raw = format!("WAT-F-{}-{}", row.command.as_str(), role.as_str());
                trace.unit_in(&raw, row.from).await.unwrap();

                let err = trace
                    .container
                    .dispatcher
                    .dispatch_unit(&trace.token("actor", role), &code(&raw), command_for(row.command))
                    .await
                    .unwrap_err();
                assert_eq!(err.kind(), ErrorKind::Forbidden, "{} by {}", row.command, role);
                assert_eq!(trace.surface.verify(&raw).await.unwrap().status, row.from);
            }
        }
    }

    #[tokio::test]
    async fn test_credential_checked_first() {
        let trace = TestTrace::new();
        let forged = CapabilityToken::new("not-issued");

        let missing_unit = trace
            .surface
            .approve(&forged, "WAT-NOWHERE")
            .await
            .unwrap_err();
        assert_eq!(missing_unit.kind(), ErrorKind::Unauthenticated);

        let inspector = trace.inspector();
        trace.unit_in("WAT-R", UnitStatus::Inspector).await.unwrap();
        assert!(trace.container.credentials.revoke(&inspector));
        let revoked = trace
            .surface
            .approve(&inspector, "WAT-R")
            .await
            .unwrap_err();
        assert_eq!(revoked.kind(), ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_unknown_code_reports_not_found_for_permitted_role() {
        let trace = TestTrace::new();
        let err = trace
            .surface
            .approve(&trace.inspector(), "WAT-NOWHERE")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let forbidden = trace
            .surface
            .approve(&trace.distributor(), "WAT-NOWHERE")
            .await
            .unwrap_err();
        assert_eq!(forbidden.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_bad_reject_reason_loses_to_earlier_checks() {
        let trace = TestTrace::new();
        trace.unit_in("WAT-NEW", UnitStatus::Created).await.unwrap();
        trace.unit_in("WAT-HELD", UnitStatus::Inspector).await.unwrap();
        let forged = CapabilityToken::new("not-issued");

        let cases = [
            (&forged, "WAT-HELD", ErrorKind::Unauthenticated),
            (&trace.producer(), "WAT-HELD", ErrorKind::Forbidden),
            (&trace.inspector(), "WAT-NEW", ErrorKind::IllegalTransition),
            (&trace.inspector(), "WAT-NOWHERE", ErrorKind::NotFound),
            (&trace.inspector(), "WAT-HELD", ErrorKind::InvalidPayload),
        ];
        for (token, raw, expected) in cases {
            let err = trace.surface.reject(token, raw, "bogus").await.unwrap_err();
            assert_eq!(err.kind(), expected, "reject {}", raw);
        }

        assert_eq!(
            trace.surface.verify("WAT-NEW").await.unwrap().status,
            UnitStatus::Created
        );
        assert_eq!(
            trace.surface.verify("WAT-HELD").await.unwrap().status,
            UnitStatus::Inspector
        );
    }

    #[tokio::test]
    async fn test_only_producers_create() {
        let trace = TestTrace::new();
        for token in [trace.inspector(), trace.distributor(), trace.admin()] {
            let err = trace
                .surface
                .create_unit(&token, Some("WAT-X"), shared_types::UnitType::Bag, 1)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Forbidden);
        }
        assert_eq!(trace.container.store.unit_count(), 0);
    }

    #[tokio::test]
    async fn test_immutable_fields_and_increasing_time() {
        let trace = TestTrace::new();
        let created = trace.unit_in("WAT-T", UnitStatus::Inspector).await.unwrap();

        // Clock goes backwards; the record time must not.
        trace.clock.set(START - 10_000);
        let approved = trace
            .surface
            .approve(&trace.inspector(), "WAT-T")
            .await
            .unwrap()
            .state;

        assert!(approved.last_modified_at > created.last_modified_at);
        assert_eq!(approved.created_at, created.created_at);
        assert_eq!(approved.code, created.code);
        assert_eq!(approved.quantity, created.quantity);
        assert_eq!(approved.unit_type, created.unit_type);
    }

    // =============================================================================
    // REPORT TABLE
    // =============================================================================

    #[tokio::test]
    async fn test_every_report_pair_outside_table_is_illegal() {
        let trace = TestTrace::new();
        let admin = trace.admin();

        for status in ReportStatus::ALL {
            for command in ReportCommand::ALL {
                let id = report_in(&trace, status).await;
                let legal = REPORT_CAPABILITIES
                    .iter()
                    .any(|row| row.from == status && row.command == command);

                trace.tick();
                let result = trace
                    .container
                    .dispatcher
                    .dispatch_report(&admin, id.parse().unwrap(), command, None)
                    .await;
                let stored = trace.surface.report(&admin, &id).await.unwrap();

                if legal {
                    assert!(result.is_ok(), "{} from {} should be legal", command, status);
                } else {
                    assert_eq!(
                        result.unwrap_err().kind(),
                        ErrorKind::IllegalTransition,
                        "{} from {}",
                        command,
                        status
                    );
                    assert_eq!(stored.status, status);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_triage_is_admin_only() {
        let trace = TestTrace::new();
        let id = report_in(&trace, ReportStatus::Pending).await;

        for token in [trace.producer(), trace.inspector(), trace.distributor()] {
            let err = trace
                .surface
                .start_investigation(&token, &id, None)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Forbidden);
            let read = trace.surface.report(&token, &id).await.unwrap_err();
            assert_eq!(read.kind(), ErrorKind::Forbidden);
        }
    }

    #[tokio::test]
    async fn test_annotate_works_on_resolved_report() {
        let trace = TestTrace::new();
        let admin = trace.admin();
        let id = report_in(&trace, ReportStatus::Resolved).await;
        let ledger_before = trace.container.ledger.len();

        trace.tick();
        let annotated = trace
            .surface
            .annotate(&admin, &id, "supplier notified".into())
            .await
            .unwrap();
        assert_eq!(annotated.status, ReportStatus::Resolved);
        assert_eq!(annotated.admin_notes.as_deref(), Some("supplier notified"));
        assert_eq!(trace.container.ledger.len(), ledger_before);
    }
}
