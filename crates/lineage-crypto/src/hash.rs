//! # SHA-256 Hash-to-Field
//!
//! `H(x_1, ..., x_n) = reduce_p(SHA256(tag || n || x_1 || ... || x_n))`
//! where every `x_i` is its canonical 32-byte big-endian encoding and `n`
//! is the input count as a big-endian u64. The count separates hashes of
//! different widths.
//!
//! The output is reduced into the BN254 scalar field so it can be fed back
//! as an input to the next hash in a chain.

use sha2::{Digest, Sha256};

use lineage_core::{FieldElement, FieldHasher};

const DOMAIN_TAG: &[u8] = b"lineage.field-hash.v1";

/// Domain-separated SHA-256 reduced into the BN254 scalar field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256FieldHasher;

impl Sha256FieldHasher {
    pub fn new() -> Self {
        Self
    }
}

impl FieldHasher for Sha256FieldHasher {
    fn hash(&self, inputs: &[FieldElement]) -> FieldElement {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_TAG);
        hasher.update((inputs.len() as u64).to_be_bytes());
        for input in inputs {
            hasher.update(input.as_bytes());
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        FieldElement::from_be_bytes_reduced(&bytes)
    }

    fn name(&self) -> &'static str {
        "sha256-bn254"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fe(v: u64) -> FieldElement {
        FieldElement::from_u64(v)
    }

    #[test]
    fn hash_is_deterministic() {
        let h = Sha256FieldHasher::new();
        assert_eq!(h.hash(&[fe(1), fe(2)]), h.hash(&[fe(1), fe(2)]));
    }

    #[test]
    fn order_matters() {
        let h = Sha256FieldHasher::new();
        assert_ne!(h.hash(&[fe(1), fe(2)]), h.hash(&[fe(2), fe(1)]));
    }

    #[test]
    fn arity_is_domain_separated() {
        let h = Sha256FieldHasher::new();
        assert_ne!(h.hash(&[fe(1), fe(2)]), h.hash(&[fe(1), fe(2), fe(0)]));
        assert_ne!(h.hash(&[]), h.hash(&[fe(0)]));
    }

    #[test]
    fn arity_is_full_width_prefix() {
        let inputs = vec![fe(0); 300];
        let mut reference = Sha256::new();
        reference.update(DOMAIN_TAG);
        reference.update(300u64.to_be_bytes());
        for input in &inputs {
            reference.update(input.as_bytes());
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&reference.finalize());
        assert_eq!(
            Sha256FieldHasher::new().hash(&inputs),
            FieldElement::from_be_bytes_reduced(&bytes)
        );
    }

    #[test]
    fn wide_inputs_stay_separated() {
        let h = Sha256FieldHasher::new();
        assert_ne!(h.hash(&vec![fe(0); 255]), h.hash(&vec![fe(0); 256]));
    }

    proptest! {
        #[test]
        fn output_is_canonical(a in any::<u64>(), b in any::<u64>()) {
            let out = Sha256FieldHasher::new().hash(&[fe(a), fe(b)]);
            prop_assert_eq!(FieldElement::from_decimal(&out.to_decimal()).unwrap(), out);
        }
    }
}
