// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by gateway calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("legal_assistant_client.call", kind = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Emits a debug event inside the span.
	pub fn note(&self, message: &'static str) {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(|| tracing::debug!("{message}"));
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = message;
		}
	}

	/// Emits a warning inside the span, carrying the error that caused it.
	pub fn warn(&self, message: &'static str, error: &dyn Display) {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(|| tracing::warn!(%error, "{message}"));
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (message, error);
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn call_span_noop_without_tracing() {
		let span = CallSpan::new(CallKind::Request, "test");

		span.note("smoke");
		span.warn("smoke", &"detail");
		// Compile-time smoke test ensures the span exists even when tracing is disabled.
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(CallKind::Renewal, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
