// Command boundary: every handler's failure becomes exactly one text line.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use crate::error::{PluginError, SYSTEM_EXCEPTION_MESSAGE};
use crate::metrics::COMMANDS_TOTAL;
use crate::plugin::Reply;

/// Drive a handler to completion. The error side holds the user-facing
/// message; the failure has already been logged and counted.
pub async fn settle<T, F>(name: &str, handler: F) -> Result<T, String>
where
    F: Future<Output = Result<T, PluginError>>,
{
    match AssertUnwindSafe(handler).catch_unwind().await {
        Ok(Ok(value)) => {
            COMMANDS_TOTAL.with_label_values(&[name, "ok"]).inc();
            Ok(value)
        }
        Ok(Err(e)) => {
            if e.is_fault() {
                tracing::error!(command = name, code = e.code(), "Command failed: {}", e);
            } else {
                tracing::warn!(command = name, code = e.code(), "Command rejected: {}", e);
            }
            COMMANDS_TOTAL.with_label_values(&[name, e.code()]).inc();
            Err(e.user_message())
        }
        Err(panic) => {
            tracing::error!(
                command = name,
                detail = panic_detail(panic.as_ref()),
                "Command panicked"
            );
            COMMANDS_TOTAL.with_label_values(&[name, "panic"]).inc();
            Err(SYSTEM_EXCEPTION_MESSAGE.to_string())
        }
    }
}

/// Chat commands: a failure is a single text reply.
pub async fn run_command<F>(name: &str, handler: F) -> Vec<Reply>
where
    F: Future<Output = Result<Vec<Reply>, PluginError>>,
{
    settle(name, handler)
        .await
        .unwrap_or_else(|text| vec![Reply::Text { text }])
}

/// LLM tools answer with plain text either way.
pub async fn run_tool<F>(name: &str, handler: F) -> String
where
    F: Future<Output = Result<String, PluginError>>,
{
    settle(name, handler).await.unwrap_or_else(|text| text)
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
