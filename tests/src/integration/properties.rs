//! # Property Tests
//!
//! Random legal walks through the unit table, checked against what public
//! verification reconstructs afterwards.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use shared_types::{
        ErrorKind, RejectionReason, Role, UnitCode, UnitCommand, UnitCommandKind, UnitStatus,
        UnitType,
    };
    use wt_01_unit_lifecycle::{SafetyClassification, UNIT_CAPABILITIES};
    use wt_03_command_dispatch::CommandApi;

    use crate::fixtures::TestTrace;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap()
    }

    fn command_for(kind: UnitCommandKind, pick: u8) -> UnitCommand {
        match kind {
            UnitCommandKind::SubmitForInspection => UnitCommand::SubmitForInspection,
            UnitCommandKind::Approve => UnitCommand::Approve,
            UnitCommandKind::Reject => UnitCommand::Reject {
                reason: if pick % 2 == 0 {
                    RejectionReason::Contaminated
                } else {
                    RejectionReason::Expired
                },
            },
            UnitCommandKind::Distribute => UnitCommand::Distribute,
            UnitCommandKind::Sell => UnitCommand::Sell,
        }
    }

    /// Walk `code` along `picks`, choosing among the legal rows at each step.
    /// Returns every accepted status, creation included.
    async fn walk(trace: &TestTrace, code: &str, picks: &[u8]) -> Vec<UnitStatus> {
        let unit = trace
            .surface
            .create_unit(&trace.producer(), Some(code), UnitType::Pack, 12)
            .await
            .unwrap()
            .state;
        let parsed = UnitCode::parse(code).unwrap();
        let mut accepted = vec![unit.status];

        for pick in picks {
            let current = *accepted.last().unwrap();
            let rows: Vec<_> = UNIT_CAPABILITIES
                .iter()
                .filter(|row| row.from == current)
                .collect();
            if rows.is_empty() {
                break;
            }
            let row = rows[*pick as usize % rows.len()];
            let role = row.roles[*pick as usize % row.roles.len()];

            trace.tick();
            let dispatched = trace
                .container
                .dispatcher
                .dispatch_unit(
                    &trace.token("walker", role),
                    &parsed,
                    command_for(row.command, *pick),
                )
                .await
                .unwrap();
            accepted.push(dispatched.state.status);
        }
        accepted
    }

    // =============================================================================
    // PROPERTIES
    // =============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_verify_reconstructs_last_accepted_status(
            picks in prop::collection::vec(any::<u8>(), 0..8)
        ) {
            let rt = runtime();
            let (accepted, view) = rt.block_on(async {
                let trace = TestTrace::new();
                let accepted = walk(&trace, "WAT-WALK", &picks).await;
                let view = trace.surface.verify("WAT-WALK").await.unwrap();
                (accepted, view)
            });

            let last = *accepted.last().unwrap();
            prop_assert_eq!(view.status, last);
            prop_assert_eq!(view.history.len(), accepted.len());
            let recorded: Vec<_> = view.history.iter().map(|h| h.to).collect();
            prop_assert_eq!(recorded, accepted.clone());
            prop_assert!(view.history.windows(2).all(|w| w[0].at < w[1].at));
            prop_assert_eq!(view.rejection_reason, last.rejection_reason());

            // Classification laws
            prop_assert_ne!(view.classification, SafetyClassification::Unknown);
            match last {
                UnitStatus::RejectedContaminated | UnitStatus::RejectedExpired => {
                    prop_assert_eq!(view.classification, SafetyClassification::Unsafe)
                }
                UnitStatus::Created | UnitStatus::Inspector => {
                    prop_assert_eq!(view.classification, SafetyClassification::Unrecognisable)
                }
                UnitStatus::Approved | UnitStatus::Distributed | UnitStatus::Sold => {
                    prop_assert_eq!(view.classification, SafetyClassification::Safe)
                }
            }
        }

        #[test]
        fn prop_concurrent_approvals_have_exactly_one_winner(callers in 2usize..6) {
            let rt = runtime();
            let results = rt.block_on(async {
                let trace = TestTrace::new();
                trace.unit_in("WAT-RACE", UnitStatus::Inspector).await.unwrap();
                let code = UnitCode::parse("WAT-RACE").unwrap();

                let mut handles = Vec::new();
                for i in 0..callers {
                    let dispatcher = Arc::clone(&trace.container.dispatcher);
                    let token = trace.token(&format!("insp-{}", i), Role::Inspector);
                    let code = code.clone();
                    handles.push(tokio::spawn(async move {
                        dispatcher
                            .dispatch_unit(&token, &code, UnitCommand::Approve)
                            .await
                            .map(|d| d.state.status)
                            .map_err(|e| e.kind())
                    }));
                }
                let mut results = Vec::new();
                for handle in handles {
                    results.push(handle.await.unwrap());
                }
                results
            });

            let winners = results.iter().filter(|r| **r == Ok(UnitStatus::Approved)).count();
            let losers = results
                .iter()
                .filter(|r| **r == Err(ErrorKind::IllegalTransition))
                .count();
            prop_assert_eq!(winners, 1);
            prop_assert_eq!(losers, callers - 1);
        }
    }
}
