//! Structured logging helpers.
//!
//! Every log line carries the same core fields so audit queries can join
//! across subsystems:
//! - `subsystem`: emitting subsystem (unit-lifecycle, dispatch, verification, ...)
//! - `code`: unit code, for unit events
//! - `report_id`: report identifier, for report events
//! - `role`, `command`, `from`, `to`: for transitions
//!
//! Levels follow one rule: `debug` for reads, `info` for accepted
//! transitions, `warn` for rejected commands, `error` for alarms and
//! collaborator failures after commit.

/// Log with a subsystem field.
#[macro_export]
macro_rules! log_event {
    // Info level with subsystem
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Warn level with subsystem
    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Error level with subsystem
    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Debug level with subsystem
    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a unit-related event with standard fields.
#[macro_export]
macro_rules! log_unit_event {
    ($level:ident, $subsystem:expr, $msg:expr, $code:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            code = %$code,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a report-related event with standard fields.
#[macro_export]
macro_rules! log_report_event {
    ($level:ident, $subsystem:expr, $msg:expr, $report_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            report_id = %$report_id,
            $($($field)*,)?
            $msg
        )
    };
}
