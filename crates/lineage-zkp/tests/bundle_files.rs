//! Proof bundles written to disk and read back.

use std::sync::Arc;

use lineage_core::{FieldElement, OriginClass, StateHash};
use lineage_crypto::Sha256FieldHasher;
use lineage_zkp::{
    BundleError, BundleGenesis, LineageChain, LineageSession, MockProof, MockProofSystem,
    ProofBundle,
};

fn sh(v: u64) -> StateHash {
    StateHash::new(FieldElement::from_u64(v))
}

fn prove(origins: &[OriginClass]) -> (LineageChain, MockProofSystem, ProofBundle<MockProof>) {
    let chain = LineageChain::new(Arc::new(Sha256FieldHasher::new()));
    let backend = MockProofSystem::new(chain.clone());
    let (pk, _) = MockProofSystem::setup("files");
    let root = chain.policy().canonical_root().unwrap();
    let mut session = LineageSession::new(chain.clone(), sh(0xaa));
    let mut bundle: ProofBundle<MockProof> = ProofBundle::new(BundleGenesis {
        state_hash: session.genesis().state_hash,
        lineage_commitment: session.genesis().commitment,
    });
    for (i, origin) in origins.iter().enumerate() {
        let step = session
            .prove_step(&backend, &pk, sh(0x200 + i as u64), *origin, 10 * i as u64, root)
            .unwrap();
        bundle.push(step);
    }
    (chain, backend, bundle)
}

#[test]
fn written_bundle_reads_back_and_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lineage.json");
    let (chain, backend, bundle) = prove(&[OriginClass::User, OriginClass::User, OriginClass::User]);
    bundle.write_to(&path).unwrap();

    let loaded: ProofBundle<MockProof> = ProofBundle::read_from(&path).unwrap();
    assert_eq!(loaded, bundle);
    let (_, vk) = MockProofSystem::setup("files");
    loaded.verify(&chain, &backend, &vk).unwrap();
}

#[test]
fn public_signals_are_decimal_pairs_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lineage.json");
    let (_, _, bundle) = prove(&[OriginClass::Bridge, OriginClass::User]);
    bundle.write_to(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let signals = raw["entries"][1]["public_signals"].as_array().unwrap();
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[1], "2");
    assert!(signals[0].as_str().unwrap().bytes().all(|b| b.is_ascii_digit()));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = ProofBundle::<MockProof>::read_from(&path).unwrap_err();
    assert!(matches!(err, BundleError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn wrong_verifying_key_rejects_bundle() {
    let (chain, backend, bundle) = prove(&[OriginClass::User]);
    let (_, other_vk) = MockProofSystem::setup("someone-else");
    assert!(matches!(
        bundle.verify(&chain, &backend, &other_vk),
        Err(BundleError::InvalidProof { index: 0 })
    ));
}

#[test]
fn independent_lineages_prove_in_parallel() {
    let chain = LineageChain::new(Arc::new(Sha256FieldHasher::new()));
    let backend = Arc::new(MockProofSystem::new(chain.clone()));
    let root = chain.policy().canonical_root().unwrap();

    let handles: Vec<_> = (0..4u64)
        .map(|lineage| {
            let chain = chain.clone();
            let backend = Arc::clone(&backend);
            std::thread::spawn(move || {
                let (pk, _) = MockProofSystem::setup("parallel");
                let mut session = LineageSession::new(chain, sh(0x1000 * (lineage + 1)));
                for step in 0..5u64 {
                    session
                        .prove_step(
                            backend.as_ref(),
                            &pk,
                            sh(0x1000 * (lineage + 1) + step + 1),
                            OriginClass::User,
                            step,
                            root,
                        )
                        .unwrap();
                }
                *session.head()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().depth, 5);
    }
    assert_eq!(backend.prove_calls(), 20);
}
