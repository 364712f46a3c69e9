// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::{
    collections::HashMap,
    sync::Arc,
};

use futures::future::join_all;
use git_ext::Oid;
use identifier::RepoName;
use tokio::sync::Semaphore;

use crate::{
    provider::{verify_object, Provider},
    Error,
};

/// Concurrency limits for a single [`Requester::run`] (spec.md §4.6
/// "Ordering and fan-out").
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Overall in-flight send-phase requests.
    pub max_in_flight: usize,
    /// In-flight send-phase requests against any one provider.
    pub max_in_flight_per_provider: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_in_flight: 32, max_in_flight_per_provider: 4 }
    }
}

/// A single fetch query: a repo, the objects it needs, and the providers
/// known to exist when the query was created.
pub struct Query {
    pub repo_name: RepoName,
    pub object_hashes: Vec<Oid>,
    pub initial_providers: Vec<Arc<dyn Provider>>,
}

/// The result of a fully satisfied query: every requested object, keyed by
/// hash, alongside the kind `verify_object` already checked it against, so
/// a caller writing it to an object database never has to re-derive or
/// guess the type. Partial success is never returned (spec.md §4.6
/// "Failures").
#[derive(Default)]
pub struct PackResult {
    pub objects: HashMap<Oid, (crate::provider::ObjectKind, Vec<u8>)>,
}

/// Drives one [`Query`] through the want/send two-phase protocol.
pub struct Requester {
    query: Query,
    config: Config,
}

impl Requester {
    pub fn new(query: Query, config: Config) -> Self {
        Self { query, config }
    }

    #[tracing::instrument(skip(self), fields(repo = %self.query.repo_name, objects = self.query.object_hashes.len()))]
    pub async fn run(&self) -> Result<PackResult, Error> {
        let claimants = self.want_phase().await;

        for hash in &self.query.object_hashes {
            if !claimants.contains_key(hash) {
                tracing::warn!(%hash, "no provider claims object");
                return Err(Error::NoProvider(*hash));
            }
        }

        self.send_phase(claimants).await
    }

    /// Want phase: queried in parallel across providers, aggregated into a
    /// hash → claimants map.
    async fn want_phase(&self) -> HashMap<Oid, Vec<Arc<dyn Provider>>> {
        let replies = join_all(self.query.initial_providers.iter().map(|provider| {
            let provider = provider.clone();
            let hashes = self.query.object_hashes.clone();
            async move {
                let claimed = provider.want(&hashes).await.unwrap_or_default();
                (provider, claimed)
            }
        }))
        .await;

        let mut claimants: HashMap<Oid, Vec<Arc<dyn Provider>>> = HashMap::new();
        for (provider, claimed) in replies {
            for hash in claimed {
                claimants.entry(hash).or_default().push(provider.clone());
            }
        }
        claimants
    }

    /// Send phase: bounded overall and per-provider concurrency, lowest
    /// latency claimant tried first, falling through to the next claimant
    /// on a per-provider send failure. All-or-nothing: the first hash that
    /// exhausts its claimants fails the whole query.
    async fn send_phase(&self, claimants: HashMap<Oid, Vec<Arc<dyn Provider>>>) -> Result<PackResult, Error> {
        let overall = Arc::new(Semaphore::new(self.config.max_in_flight.max(1)));
        let mut per_provider: HashMap<String, Arc<Semaphore>> = HashMap::new();
        for providers in claimants.values() {
            for provider in providers {
                per_provider
                    .entry(provider.id().to_string())
                    .or_insert_with(|| Arc::new(Semaphore::new(self.config.max_in_flight_per_provider.max(1))));
            }
        }
        let per_provider = Arc::new(per_provider);

        let fetches = join_all(self.query.object_hashes.iter().map(|hash| {
            let hash = *hash;
            let mut candidates = claimants.get(&hash).cloned().unwrap_or_default();
            candidates.sort_by_key(|p| p.latency());
            let overall = overall.clone();
            let per_provider = per_provider.clone();

            async move {
                let _overall_permit = overall.acquire().await.expect("semaphore not closed");

                for provider in &candidates {
                    let provider_sem = per_provider.get(provider.id()).expect("provider registered in want phase");
                    let _provider_permit = provider_sem.acquire().await.expect("semaphore not closed");

                    match provider.send(hash).await {
                        Ok((kind, bytes)) => match verify_object(hash, kind, &bytes) {
                            Ok(()) => return Ok((hash, kind, bytes)),
                            Err(e) => {
                                tracing::warn!(%hash, provider = provider.id(), "object failed hash verification: {e}");
                                continue;
                            }
                        },
                        Err(e) => {
                            tracing::warn!(%hash, provider = provider.id(), "send phase failed: {e}");
                            continue;
                        }
                    }
                }
                Err(Error::AllProvidersFailed(hash))
            }
        }))
        .await;

        let mut objects = HashMap::with_capacity(fetches.len());
        for fetch in fetches {
            let (hash, kind, bytes) = fetch?;
            objects.insert(hash, (kind, bytes));
        }
        Ok(PackResult { objects })
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use super::*;

    struct FakeProvider {
        id: String,
        latency: Duration,
        has: Vec<Oid>,
        fail_send: bool,
        sends: Mutex<usize>,
    }

    #[async_trait::async_trait]
    impl Provider for FakeProvider {
        fn id(&self) -> &str {
            &self.id
        }

        fn latency(&self) -> Duration {
            self.latency
        }

        async fn want(&self, hashes: &[Oid]) -> Result<Vec<Oid>, crate::provider::ProviderError> {
            Ok(hashes.iter().filter(|h| self.has.contains(h)).copied().collect())
        }

        async fn send(&self, hash: Oid) -> Result<(crate::provider::ObjectKind, Vec<u8>), crate::provider::ProviderError> {
            *self.sends.lock().unwrap() += 1;
            if self.fail_send {
                return Err("send failed".into());
            }
            Ok((crate::provider::ObjectKind::Blob, b"".to_vec()))
        }
    }

    fn empty_blob_oid() -> Oid {
        "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap()
    }

    #[tokio::test]
    async fn no_claimant_is_no_provider_error() {
        let hash = empty_blob_oid();
        let provider = Arc::new(FakeProvider {
            id: "p1".into(),
            latency: Duration::from_millis(10),
            has: vec![],
            fail_send: false,
            sends: Mutex::new(0),
        });
        let query = Query {
            repo_name: "repo1".parse().unwrap(),
            object_hashes: vec![hash],
            initial_providers: vec![provider],
        };
        let requester = Requester::new(query, Config::default());
        let err = requester.run().await.unwrap_err();
        assert!(matches!(err, Error::NoProvider(h) if h == hash));
    }

    #[tokio::test]
    async fn happy_path_fetches_claimed_object() {
        let hash = empty_blob_oid();
        let provider = Arc::new(FakeProvider {
            id: "p1".into(),
            latency: Duration::from_millis(10),
            has: vec![hash],
            fail_send: false,
            sends: Mutex::new(0),
        });
        let query = Query {
            repo_name: "repo1".parse().unwrap(),
            object_hashes: vec![hash],
            initial_providers: vec![provider],
        };
        let requester = Requester::new(query, Config::default());
        let result = requester.run().await.unwrap();
        assert_eq!(result.objects.len(), 1);
        assert!(result.objects.contains_key(&hash));
    }

    #[tokio::test]
    async fn all_providers_failed_when_every_claimant_errors() {
        let hash = empty_blob_oid();
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(FakeProvider {
                id: "p1".into(),
                latency: Duration::from_millis(5),
                has: vec![hash],
                fail_send: true,
                sends: Mutex::new(0),
            }),
            Arc::new(FakeProvider {
                id: "p2".into(),
                latency: Duration::from_millis(50),
                has: vec![hash],
                fail_send: true,
                sends: Mutex::new(0),
            }),
        ];
        let query = Query {
            repo_name: "repo1".parse().unwrap(),
            object_hashes: vec![hash],
            initial_providers: providers,
        };
        let requester = Requester::new(query, Config::default());
        let err = requester.run().await.unwrap_err();
        assert!(matches!(err, Error::AllProvidersFailed(h) if h == hash));
    }

    #[tokio::test]
    async fn falls_through_to_next_claimant_on_send_failure() {
        let hash = empty_blob_oid();
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(FakeProvider {
                id: "fast-but-broken".into(),
                latency: Duration::from_millis(1),
                has: vec![hash],
                fail_send: true,
                sends: Mutex::new(0),
            }),
            Arc::new(FakeProvider {
                id: "slow-but-working".into(),
                latency: Duration::from_millis(100),
                has: vec![hash],
                fail_send: false,
                sends: Mutex::new(0),
            }),
        ];
        let query = Query {
            repo_name: "repo1".parse().unwrap(),
            object_hashes: vec![hash],
            initial_providers: providers,
        };
        let requester = Requester::new(query, Config::default());
        let result = requester.run().await.unwrap();
        assert!(result.objects.contains_key(&hash));
    }
}
