use anyhow::{anyhow, Context, Result};

use crate::errors::SignatureInvalid;

/// Verify a minisign signature over `data` using an embedded/loaded
/// public key. `pubkey_b64` is the key line of a `.pub` file (without the
/// leading `untrusted comment:` line); `sig_text` is the full contents of
/// a `.minisig` file.
pub fn verify_minisign(pubkey_b64: &str, data: &[u8], sig_text: &str) -> Result<()> {
    let pk = minisign_verify::PublicKey::from_base64(pubkey_b64.trim())
        .context("parsing minisign public key")?;
    let sig = minisign_verify::Signature::decode(sig_text).context("parsing minisign signature")?;
    pk.verify(data, &sig, false)
        .map_err(|e| SignatureInvalid(format!("minisign verification failed: {e}")))?;
    Ok(())
}

/// Verify a raw Ed25519 signature (no envelope format) given a 64-char
/// hex-encoded public key and a signature file's raw or hex-encoded
/// bytes.
pub fn verify_ed25519_raw(pubkey_hex: &str, data: &[u8], sig_bytes: &[u8]) -> Result<()> {
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    let key_bytes = hex::decode(pubkey_hex.trim()).context("decoding hex public key")?;
    let key_bytes: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| anyhow!("public key must be 32 bytes (64 hex chars)"))?;
    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).context("parsing Ed25519 public key")?;

    let sig_bytes = decode_signature_bytes(sig_bytes)?;
    let sig_bytes: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| anyhow!("signature must be 64 bytes"))?;
    let signature = Signature::from_bytes(&sig_bytes);

    verifying_key
        .verify(data, &signature)
        .map_err(|e| SignatureInvalid(format!("Ed25519 verification failed: {e}")))?;
    Ok(())
}

/// `.sig` files may carry either raw binary or hex/base64 text; try raw
/// bytes first, then hex, matching how minimal Ed25519 signing tools emit
/// them.
fn decode_signature_bytes(raw: &[u8]) -> Result<Vec<u8>> {
    if raw.len() == 64 {
        return Ok(raw.to_vec());
    }
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if let Ok(bytes) = hex::decode(trimmed) {
        return Ok(bytes);
    }
    Ok(raw.to_vec())
}

/// Verify a detached OpenPGP signature over `data` using an armored or
/// binary public key / keyring.
pub fn verify_pgp(pubkey_bytes: &[u8], data: &[u8], sig_bytes: &[u8]) -> Result<()> {
    use sequoia_openpgp::cert::Cert;
    use sequoia_openpgp::parse::stream::{
        DetachedVerifierBuilder, MessageLayer, MessageStructure, VerificationHelper,
    };
    use sequoia_openpgp::parse::Parse;
    use sequoia_openpgp::policy::StandardPolicy;
    use sequoia_openpgp::KeyHandle;

    struct Helper {
        cert: Cert,
    }

    impl VerificationHelper for Helper {
        fn get_certs(&mut self, _ids: &[KeyHandle]) -> sequoia_openpgp::Result<Vec<Cert>> {
            Ok(vec![self.cert.clone()])
        }

        fn check(&mut self, structure: MessageStructure) -> sequoia_openpgp::Result<()> {
            let mut good = 0;
            for layer in structure.into_iter() {
                if let MessageLayer::SignatureGroup { results } = layer {
                    for result in results {
                        match result {
                            Ok(_) => good += 1,
                            Err(e) => return Err(anyhow::anyhow!(e.to_string())),
                        }
                    }
                }
            }
            if good == 0 {
                return Err(anyhow::anyhow!("no valid signature"));
            }
            Ok(())
        }
    }

    let cert = Cert::from_bytes(pubkey_bytes).context("parsing OpenPGP public key")?;
    let policy = StandardPolicy::new();
    let helper = Helper { cert };

    let mut verifier = DetachedVerifierBuilder::from_bytes(sig_bytes)
        .context("parsing OpenPGP signature")?
        .with_policy(&policy, None, helper)
        .map_err(|e| SignatureInvalid(format!("OpenPGP verification setup failed: {e}")))?;

    verifier
        .verify_bytes(data)
        .map_err(|e| SignatureInvalid(format!("OpenPGP verification failed: {e}")))?;

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/verify/signature.rs"]
mod tests;
