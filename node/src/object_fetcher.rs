// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::sync::Arc;

use fetch::{Provider, Query, Requester};
use git_ext::Oid;
use identifier::RepoName;
use refsync::ObjectFetcher;

/// Discovers the providers able to serve objects for a repo. Provider
/// discovery rides the DHT in a full deployment (spec.md §2's "Object
/// Fetcher / Requester" row); spec.md §1 lists the peer-to-peer transport
/// itself as a non-goal ("any libp2p-style stream protocol works"), so this
/// crate only depends on the capability trait, never a concrete DHT client.
pub trait ProviderDirectory: Send + Sync {
    fn providers_for(&self, repo: &RepoName) -> Vec<Arc<dyn Provider>>;
}

/// Bridges `fetch::Requester`'s want/send object transport (spec.md §4.6)
/// to the [`refsync::ObjectFetcher`] seam `zango-refsync` applies finalized
/// push notes through.
pub struct RequesterObjectFetcher<D> {
    directory: D,
    config: fetch::Config,
}

impl<D: ProviderDirectory> RequesterObjectFetcher<D> {
    pub fn new(directory: D, config: fetch::Config) -> Self {
        Self { directory, config }
    }
}

#[async_trait::async_trait]
impl<D: ProviderDirectory> ObjectFetcher for RequesterObjectFetcher<D> {
    async fn fetch_missing(
        &self,
        repo: &RepoName,
        hashes: &[Oid],
    ) -> Result<Vec<(fetch::ObjectKind, Vec<u8>)>, fetch::Error> {
        let query = Query {
            repo_name: repo.clone(),
            object_hashes: hashes.to_vec(),
            initial_providers: self.directory.providers_for(repo),
        };
        let result = Requester::new(query, self.config).run().await?;

        let mut objects = Vec::with_capacity(hashes.len());
        for hash in hashes {
            if let Some((kind, bytes)) = result.objects.get(hash) {
                objects.push((*kind, bytes.clone()));
            }
        }
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fetch::ObjectKind;

    use super::*;

    struct FakeProvider {
        has: Vec<Oid>,
    }

    #[async_trait::async_trait]
    impl Provider for FakeProvider {
        fn id(&self) -> &str {
            "fake"
        }

        fn latency(&self) -> Duration {
            Duration::from_millis(1)
        }

        async fn want(&self, hashes: &[Oid]) -> Result<Vec<Oid>, fetch::ProviderError> {
            Ok(hashes.iter().filter(|h| self.has.contains(h)).copied().collect())
        }

        async fn send(&self, _hash: Oid) -> Result<(ObjectKind, Vec<u8>), fetch::ProviderError> {
            Ok((ObjectKind::Blob, b"".to_vec()))
        }
    }

    struct FixedDirectory(Vec<Arc<dyn Provider>>);

    impl ProviderDirectory for FixedDirectory {
        fn providers_for(&self, _repo: &RepoName) -> Vec<Arc<dyn Provider>> {
            self.0.clone()
        }
    }

    fn empty_blob_oid() -> Oid {
        "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap()
    }

    #[tokio::test]
    async fn fetches_and_preserves_object_kind() {
        let hash = empty_blob_oid();
        let directory = FixedDirectory(vec![Arc::new(FakeProvider { has: vec![hash] })]);
        let fetcher = RequesterObjectFetcher::new(directory, fetch::Config::default());

        let fetched = fetcher.fetch_missing(&"repo1".parse().unwrap(), &[hash]).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].0, ObjectKind::Blob);
    }

    #[tokio::test]
    async fn no_provider_claiming_the_hash_fails_the_whole_query() {
        let hash = empty_blob_oid();
        let directory = FixedDirectory(vec![]);
        let fetcher = RequesterObjectFetcher::new(directory, fetch::Config::default());

        let err = fetcher.fetch_missing(&"repo1".parse().unwrap(), &[hash]).await.unwrap_err();
        assert!(matches!(err, fetch::Error::NoProvider(h) if h == hash));
    }
}
