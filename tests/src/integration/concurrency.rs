//! # Concurrency
//!
//! Racing commands against one unit. The store's compare-and-set admits
//! exactly one winner; every loser sees `IllegalTransition` once the winner's
//! state makes its command illegal.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::{ErrorKind, RejectionReason, UnitCode, UnitCommand, UnitStatus};
    use wt_03_command_dispatch::CommandApi;

    use crate::fixtures::TestTrace;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    async fn race(
        trace: &TestTrace,
        code: &str,
        commands: Vec<UnitCommand>,
    ) -> Vec<Result<UnitStatus, ErrorKind>> {
        let code = UnitCode::parse(code).unwrap();
        let mut handles = Vec::new();
        for (i, command) in commands.into_iter().enumerate() {
            let dispatcher = Arc::clone(&trace.container.dispatcher);
            let token = trace.token(&format!("insp-{}", i), shared_types::Role::Inspector);
            let code = code.clone();
            handles.push(tokio::spawn(async move {
                dispatcher
                    .dispatch_unit(&token, &code, command)
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
    }

    // =============================================================================
    // RACES
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_double_approve_has_one_winner() {
        let trace = TestTrace::new();

        for round in 0..20 {
            let code = format!("WAT-RACE-{}", round);
            trace.unit_in(&code, UnitStatus::Inspector).await.unwrap();

            let results = race(&trace, &code, vec![UnitCommand::Approve; 2]).await;
            let approved = results
                .iter()
                .filter(|r| **r == Ok(UnitStatus::Approved))
                .count();
            let illegal = results
                .iter()
                .filter(|r| **r == Err(ErrorKind::IllegalTransition))
                .count();
            assert_eq!((approved, illegal), (1, 1), "round {}: {:?}", round, results);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_approve_and_reject_race() {
        let trace = TestTrace::new();
        trace.unit_in("WAT-SPLIT", UnitStatus::Inspector).await.unwrap();

        let results = race(
            &trace,
            "WAT-SPLIT",
            vec![
                UnitCommand::Approve,
                UnitCommand::Reject {
                    reason: RejectionReason::Contaminated,
                },
                UnitCommand::Approve,
                UnitCommand::Reject {
                    reason: RejectionReason::Expired,
                },
            ],
        )
        .await;

        let winners: Vec<_> = results.iter().filter_map(|r| r.ok()).collect();
        assert_eq!(winners.len(), 1, "{:?}", results);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| *r == Err(ErrorKind::IllegalTransition)));

        let view = trace.surface.verify("WAT-SPLIT").await.unwrap();
        assert_eq!(view.status, winners[0]);
        // Creation, submission and the single winning outcome.
        assert_eq!(view.history.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_races_on_distinct_units_do_not_interfere() {
        let trace = TestTrace::new();
        for i in 0..8 {
            trace
                .unit_in(&format!("WAT-P-{}", i), UnitStatus::Inspector)
                .await
                .unwrap();
        }

        let mut handles = Vec::new();
        for i in 0..8 {
            let dispatcher = Arc::clone(&trace.container.dispatcher);
            let token = trace.inspector();
            let code = UnitCode::parse(&format!("WAT-P-{}", i)).unwrap();
            handles.push(tokio::spawn(async move {
                dispatcher
                    .dispatch_unit(&token, &code, UnitCommand::Approve)
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert!(trace.container.ledger.verify_chain().is_ok());
    }
}
