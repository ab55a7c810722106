//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::ScriptcastError;
use crate::provider::Service;

/// Bound one call to `service` by `duration`.
pub async fn with_timeout<T>(
    service: Service,
    duration: Duration,
    future: impl Future<Output = Result<T, ScriptcastError>>,
) -> Result<T, ScriptcastError> {
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| {
            tracing::debug!(%service, ?duration, "Call timed out");
            ScriptcastError::Timeout {
                service,
                ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            }
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn elapsed_call_names_its_service() {
        let err = with_timeout(Service::Gemini, Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ScriptcastError::Timeout {
                service: Service::Gemini,
                ms: 20
            }
        ));
        assert_eq!(err.to_string(), "gemini request timed out after 20ms");
    }

    #[tokio::test]
    async fn inner_result_passes_through() {
        let value = with_timeout(Service::ElevenLabs, Duration::from_secs(1), async {
            Ok::<_, ScriptcastError>(7)
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
    }
}
