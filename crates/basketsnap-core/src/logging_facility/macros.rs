//! Operation bracketing macros
//!
//! Every harness operation emits one `start` event and then exactly one
//! `end` or `end_error` event. All three carry the `run_id` of the harness
//! that issued them. The closing events take the `Instant` captured when
//! the operation started and derive `duration_ms` from it.
//!
//! Callers must depend on `tracing` and `basketsnap-core-types`.

/// Open an operation
///
/// ```
/// # use basketsnap_core::log_op_start;
/// # use basketsnap_core_types::RunId;
/// let run_id = RunId::new();
/// log_op_start!("capture", run_id);
/// log_op_start!("capture", run_id, label = "before");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr, $run_id:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = basketsnap_core_types::schema::EVENT_START,
            run_id = %$run_id,
        )
    };
    ($op:expr, $run_id:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = basketsnap_core_types::schema::EVENT_START,
            run_id = %$run_id,
            $($field)*
        )
    };
}

/// Close an operation that succeeded
///
/// ```
/// # use basketsnap_core::log_op_end;
/// # use basketsnap_core_types::RunId;
/// let run_id = RunId::new();
/// let started = std::time::Instant::now();
/// log_op_end!("capture", run_id, started, record_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, $run_id:expr, $started:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = basketsnap_core_types::schema::EVENT_END,
            run_id = %$run_id,
            duration_ms = $started.elapsed().as_millis() as u64,
        )
    };
    ($op:expr, $run_id:expr, $started:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = basketsnap_core_types::schema::EVENT_END,
            run_id = %$run_id,
            duration_ms = $started.elapsed().as_millis() as u64,
            $($field)*
        )
    };
}

/// Close an operation that failed
///
/// The error is converted into an `ExError` so the event carries the stable
/// `err.code` alongside `err.kind`.
///
/// ```
/// # use basketsnap_core::{log_op_error, errors::HarnessError};
/// # use basketsnap_core_types::RunId;
/// let run_id = RunId::new();
/// let started = std::time::Instant::now();
/// let err = HarnessError::NoSnapshot { which: "after".to_string() };
/// log_op_error!("diff", run_id, started, err);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $run_id:expr, $started:expr, $err:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = basketsnap_core_types::schema::EVENT_END_ERROR,
            run_id = %$run_id,
            duration_ms = $started.elapsed().as_millis() as u64,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
        );
    }};
    ($op:expr, $run_id:expr, $started:expr, $err:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = basketsnap_core_types::schema::EVENT_END_ERROR,
            run_id = %$run_id,
            duration_ms = $started.elapsed().as_millis() as u64,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($field)*
        );
    }};
}
