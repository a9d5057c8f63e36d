//! View execution.
//!
//! [`TemplateRenderer`] runs a located view against a prepared
//! [`ViewContext`] and captures what it writes. It does not locate views and
//! does not build contexts.

use std::sync::Arc;

use super::engine::View;
use crate::context::ViewContext;
use crate::error::Result;

/// The captured result of running a view.
///
/// `output` holds everything the view wrote, even when `outcome` is an error.
#[derive(Debug)]
pub struct Execution {
    pub output: String,
    pub outcome: Result<()>,
}

impl Execution {
    /// Returns the output on success, or the view's error.
    pub fn into_result(self) -> Result<String> {
        self.outcome.map(|_| self.output)
    }
}

/// Executes views into strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Runs `view` with `context` as its current view and captures the output
    /// buffer.
    ///
    /// The buffer is drained whether or not the view succeeds.
    pub async fn execute(&self, context: &mut ViewContext, view: Arc<dyn View>) -> Execution {
        context.view = Some(Arc::clone(&view));
        let outcome = view.render(context).await;
        Execution {
            output: context.output.take(),
            outcome,
        }
    }

    /// Runs `view` and returns the rendered markup.
    ///
    /// # Errors
    ///
    /// Propagates the view's error unchanged. Partial output is discarded.
    pub async fn render(&self, context: &mut ViewContext, view: Arc<dyn View>) -> Result<String> {
        let path = view.path().to_string();
        let execution = self.execute(context, view).await;
        if let Err(err) = &execution.outcome {
            tracing::warn!(
                view = %path,
                discarded = execution.output.len(),
                error = %err,
                "view execution failed"
            );
        }
        execution.into_result()
    }
}
