// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! The client-side git-sign-hook flow: `init → repo-resolved →
//! push-key-unlocked → token-decoded-from-env → signed → emitted`.
//!
//! Per the design note on function-injected collaborators, repo resolution
//! and push-key unlocking are capability traits injected at the call site
//! rather than free functions reaching into global state; the one piece of
//! genuinely process-wide state git's invocation surface forces on us is the
//! environment variable carrying the prepared token, which is itself only
//! reached through the [`EnvSource`] capability so tests never touch the
//! real environment.

use std::error::Error as StdError;

use thiserror::Error;
use crypto::{BoxedSignError, BoxedSigner, Signer};
use identifier::{NamespaceName, RepoName};

use crate::{
    pem::{self, PemError, PEM_TAG},
    token::TokenError,
};

/// Resolves the repository (and optional namespace) the signing hook is
/// currently operating against.
pub trait RepoResolver {
    type Error: StdError + Send + Sync + 'static;

    fn resolve(&self) -> Result<(RepoName, Option<NamespaceName>), Self::Error>;
}

/// Unlocks the push key that will do the signing (e.g. reading a
/// passphrase-protected key store); returns a type-erased [`BoxedSigner`] so
/// callers don't need to know the concrete key-store implementation.
pub trait PushKeyUnlocker {
    type Error: StdError + Send + Sync + 'static;

    fn unlock(&self) -> Result<BoxedSigner, Self::Error>;
}

/// Reads environment variables. `std::env::var` in production; a `HashMap`
/// or fixture in tests.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignError {
    #[error("failed to resolve the current repository")]
    RepoResolution(#[source] Box<dyn StdError + Send + Sync + 'static>),

    #[error("failed to unlock the push key")]
    PushKeyUnlock(#[source] Box<dyn StdError + Send + Sync + 'static>),

    #[error("push request token not set")]
    PushTokenNotSet,

    #[error("failed to decode token: {0}")]
    MalformedToken(#[from] TokenError),

    #[error("failed to sign")]
    Signing(#[source] BoxedSignError),

    #[error(transparent)]
    Pem(#[from] PemError),
}

/// Returns the environment variable name that carries an externally
/// prepared push token for the given install-time `app` constant, e.g.
/// `"zango"` → `ZANGO_LAST_PUSH_TOKEN`.
pub fn last_push_token_var(app: &str) -> String {
    format!("{}_LAST_PUSH_TOKEN", app.to_uppercase())
}

/// Drives the signing state machine to completion, returning the emitted
/// PEM block git should use as the object's signature.
pub struct SigningSession<'a> {
    app: &'a str,
}

impl<'a> SigningSession<'a> {
    pub fn new(app: &'a str) -> Self {
        Self { app }
    }

    pub fn run(
        &self,
        repo_resolver: &impl RepoResolver,
        push_key_unlocker: &impl PushKeyUnlocker,
        env: &impl EnvSource,
        git_sig_payload: &[u8],
    ) -> Result<String, SignError> {
        // repo-resolved
        let (_repo, _namespace) = repo_resolver
            .resolve()
            .map_err(|e| SignError::RepoResolution(Box::new(e)))?;

        // push-key-unlocked
        let signer = push_key_unlocker
            .unlock()
            .map_err(|e| SignError::PushKeyUnlock(Box::new(e)))?;

        // token-decoded-from-env
        let token = env
            .get(&last_push_token_var(self.app))
            .ok_or(SignError::PushTokenNotSet)?;
        let detail = crate::token::decode(&token)?;

        // signed
        let mut payload = git_sig_payload.to_vec();
        payload.extend_from_slice(&detail.canonical_bytes());
        let signature = signer.sign(&payload).map_err(SignError::Signing)?;

        // emitted
        let headers = detail.to_pem_headers();
        Ok(pem::encode(PEM_TAG, &headers, &signature.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crypto::SecretKey;

    use super::*;
    use crate::detail::TxDetail;

    struct FixedRepo(RepoName, Option<NamespaceName>);

    impl RepoResolver for FixedRepo {
        type Error = std::convert::Infallible;

        fn resolve(&self) -> Result<(RepoName, Option<NamespaceName>), Self::Error> {
            Ok((self.0.clone(), self.1.clone()))
        }
    }

    struct FixedKey(SecretKey);

    impl PushKeyUnlocker for FixedKey {
        type Error = std::convert::Infallible;

        fn unlock(&self) -> Result<BoxedSigner, Self::Error> {
            Ok(BoxedSigner::from(self.0.clone()))
        }
    }

    struct MapEnv(HashMap<String, String>);

    impl EnvSource for MapEnv {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    #[test]
    fn happy_path_emits_expected_pem_headers() {
        let key = SecretKey::new();
        let detail = TxDetail {
            repo: "repo1".parse().unwrap(),
            namespace: Some("namespace".parse().unwrap()),
            reference: "refs/heads/master".parse().unwrap(),
            fee: "1.2".to_string(),
            value: "0".to_string(),
            nonce: 1,
            push_key_id: key.public().into(),
            merge_proposal_id: None,
        };
        let token = crate::token::encode(&key, &detail).unwrap();

        let mut vars = HashMap::new();
        vars.insert(last_push_token_var("zango"), token);

        let session = SigningSession::new("zango");
        let pem = session
            .run(
                &FixedRepo("repo1".parse().unwrap(), Some("namespace".parse().unwrap())),
                &FixedKey(key),
                &MapEnv(vars),
                b"git-sig-payload",
            )
            .unwrap();

        assert!(pem.starts_with("-----BEGIN PGP SIGNATURE-----\n"));
        assert!(pem.contains("fee: 1.2\n"));
        assert!(pem.contains("namespace: namespace\n"));
        assert!(pem.contains("nonce: 1\n"));
        assert!(pem.contains(&format!("pkID: {}\n", detail.push_key_id)));
        assert!(pem.contains("reference: refs/heads/master\n"));
        assert!(pem.contains("repo: repo1\n"));
        assert!(pem.trim_end().ends_with("-----END PGP SIGNATURE-----"));
    }

    #[test]
    fn missing_env_var_is_push_token_not_set() {
        let session = SigningSession::new("zango");
        let err = session
            .run(
                &FixedRepo("repo1".parse().unwrap(), None),
                &FixedKey(SecretKey::new()),
                &MapEnv(HashMap::new()),
                b"payload",
            )
            .unwrap_err();
        assert!(matches!(err, SignError::PushTokenNotSet));
    }

    #[test]
    fn malformed_env_token_is_malformed_token() {
        let mut vars = HashMap::new();
        vars.insert(last_push_token_var("zango"), "token".to_string());

        let session = SigningSession::new("zango");
        let err = session
            .run(
                &FixedRepo("repo1".parse().unwrap(), None),
                &FixedKey(SecretKey::new()),
                &MapEnv(vars),
                b"payload",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SignError::MalformedToken(TokenError::MalformedToken)
        ));
    }
}
