//! # Canonical Schema
//!
//! Enumerations serialize to their wire names, and optional fields keep the
//! difference between absent and present.

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use shared_types::{
        ReportStatus, Role, UnitCode, UnitCommand, UnitCommandKind, UnitStatus,
    };
    use wt_01_unit_lifecycle::SafetyClassification;
    use wt_02_report_triage::{NewReport, Report};
    use wt_04_verification::UnitView;

    use crate::fixtures::TestTrace;

    #[test]
    fn test_status_vocabularies_use_wire_names() {
        for status in UnitStatus::ALL {
            let encoded = serde_json::to_value(status).unwrap();
            assert_eq!(encoded, Value::String(status.as_str().into()));
            assert_eq!(serde_json::from_value::<UnitStatus>(encoded).unwrap(), status);
        }
        for status in ReportStatus::ALL {
            let encoded = serde_json::to_value(status).unwrap();
            assert_eq!(encoded, Value::String(status.as_str().into()));
            assert_eq!(serde_json::from_value::<ReportStatus>(encoded).unwrap(), status);
        }
        for role in Role::ALL {
            assert_eq!(
                serde_json::to_value(role).unwrap(),
                Value::String(role.as_str().into())
            );
        }
        for kind in UnitCommandKind::ALL {
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                Value::String(kind.as_str().into())
            );
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(serde_json::from_value::<UnitStatus>(json!("REJECTED_WARM")).is_err());
        assert!(serde_json::from_value::<ReportStatus>(json!("closed")).is_err());
    }

    #[test]
    fn test_reject_command_carries_reason() {
        let command: UnitCommand =
            serde_json::from_value(json!({"command": "reject", "reason": "EXPIRED"})).unwrap();
        assert_eq!(command.kind(), UnitCommandKind::Reject);
        assert!(serde_json::from_value::<UnitCommand>(json!({"command": "reject"})).is_err());
    }

    #[test]
    fn test_invalid_unit_code_rejected_on_decode() {
        assert!(serde_json::from_value::<UnitCode>(json!("")).is_err());
        assert!(serde_json::from_value::<UnitCode>(json!("WAT 1")).is_err());
        let code: UnitCode = serde_json::from_value(json!("WAT-1")).unwrap();
        assert_eq!(code.as_str(), "WAT-1");
    }

    #[tokio::test]
    async fn test_rejection_reason_presence_survives_round_trip() {
        let trace = TestTrace::new();
        trace.unit_in("WAT-OK", UnitStatus::Approved).await.unwrap();
        trace
            .unit_in("WAT-BAD", UnitStatus::RejectedExpired)
            .await
            .unwrap();

        let ok = trace.surface.verify("WAT-OK").await.unwrap();
        let ok_json = serde_json::to_value(&ok).unwrap();
        assert!(ok_json.get("rejectionReason").is_none());
        assert_eq!(ok_json["classification"], json!("SAFE"));
        assert_eq!(serde_json::from_value::<UnitView>(ok_json).unwrap(), ok);

        let bad = trace.surface.verify("WAT-BAD").await.unwrap();
        let bad_json = serde_json::to_value(&bad).unwrap();
        assert_eq!(bad_json["rejectionReason"], json!("EXPIRED"));
        assert_eq!(bad_json["status"], json!("REJECTED_EXPIRED"));
        assert_eq!(serde_json::from_value::<UnitView>(bad_json).unwrap(), bad);
    }

    #[tokio::test]
    async fn test_report_optional_fields_survive_round_trip() {
        let trace = TestTrace::new();
        let report = trace
            .surface
            .submit_report(NewReport::anonymous("smells odd"))
            .await
            .unwrap()
            .state;

        let encoded = serde_json::to_value(&report).unwrap();
        assert!(encoded.get("subjectCode").is_none());
        assert!(encoded.get("adminNotes").is_none());
        assert_eq!(encoded["status"], json!("PENDING"));
        assert_eq!(serde_json::from_value::<Report>(encoded).unwrap(), report);
    }

    #[test]
    fn test_classification_wire_names() {
        for (label, name) in [
            (SafetyClassification::Safe, "SAFE"),
            (SafetyClassification::Unsafe, "UNSAFE"),
            (SafetyClassification::Suspicious, "SUSPICIOUS"),
            (SafetyClassification::Unrecognisable, "UNRECOGNISABLE"),
            (SafetyClassification::Unknown, "UNKNOWN"),
        ] {
            assert_eq!(serde_json::to_value(label).unwrap(), json!(name));
        }
    }
}
