//! Sequential connection attempts over ordered candidates.

use crate::Endpoint;
use std::{fmt, future::Future};

/// A failed connection attempt against one candidate.
#[derive(Debug)]
pub struct Failure<E> {
    /// Candidate the attempt was made against.
    pub endpoint: Endpoint,
    /// Why the attempt failed.
    pub error: E,
}

/// Every failed attempt of a [`connect`] call, in the order they were made.
#[derive(Debug)]
pub struct Failures<E>(Vec<Failure<E>>);

impl<E> Failures<E> {
    /// Failed attempts, first attempt first.
    pub fn attempts(&self) -> &[Failure<E>] {
        &self.0
    }

    /// Consumes the collection, returning the failed attempts.
    pub fn into_inner(self) -> Vec<Failure<E>> {
        self.0
    }
}

impl<E> IntoIterator for Failures<E> {
    type Item = Failure<E>;
    type IntoIter = std::vec::IntoIter<Failure<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<E: fmt::Display> fmt::Display for Failures<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} SRV candidates failed", self.0.len())?;
        for (i, failure) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(
                f,
                "{sep}{} {}: {}",
                failure.endpoint.network(),
                failure.endpoint,
                failure.error
            )?;
        }
        Ok(())
    }
}

/// Errors produced by [`connect`].
#[derive(Debug, thiserror::Error)]
pub enum DialError<E: fmt::Debug + fmt::Display> {
    /// There were no candidates to attempt.
    #[error("no SRV candidates to connect to")]
    NoCandidates,
    /// Every candidate was attempted and failed.
    #[error("{0}")]
    AllCandidatesFailed(Failures<E>),
}

/// Attempts `candidates` in order, returning the first successful connection.
///
/// Remaining candidates are not attempted once one succeeds. Each failure is
/// recorded, and if no candidate succeeds they are all returned together in
/// [`DialError::AllCandidatesFailed`]. An empty candidate list fails with
/// [`DialError::NoCandidates`].
pub async fn connect<C, E, Fut>(
    candidates: impl IntoIterator<Item = Endpoint>,
    mut attempt: impl FnMut(Endpoint) -> Fut,
) -> Result<C, DialError<E>>
where
    E: fmt::Debug + fmt::Display,
    Fut: Future<Output = Result<C, E>>,
{
    let mut failures = Vec::new();

    for candidate in candidates {
        match attempt(candidate.clone()).await {
            Ok(conn) => {
                #[cfg(feature = "log")]
                tracing::info!(endpoint = %candidate, network = candidate.network(), "connection attempt succeeded");
                return Ok(conn);
            }
            Err(error) => {
                #[cfg(feature = "log")]
                tracing::info!(endpoint = %candidate, network = candidate.network(), %error, "connection attempt failed");
                failures.push(Failure {
                    endpoint: candidate,
                    error,
                });
            }
        }
    }

    if failures.is_empty() {
        Err(DialError::NoCandidates)
    } else {
        Err(DialError::AllCandidatesFailed(Failures(failures)))
    }
}
