//! Local key material generation and private-key handoff.
//!
//! Keys are generated on the operator's machine and never sent to the
//! service except as the `key` field the operator chooses to submit. An RSA
//! private key leaves this module exactly once, through [`KeyMaterial::hand_off`].

use crate::error::{ClientError, ClientResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use rand::RngCore;
use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Random bytes in a symmetric key.
pub const SYMMETRIC_KEY_BYTES: usize = 32;

/// RSA modulus size.
pub const RSA_MODULUS_BITS: usize = 2048;

/// RSA public exponent (the `rsa` crate default, F4).
pub const RSA_PUBLIC_EXPONENT: u64 = 65_537;

/// Padding the generated pair is meant for: RSA-OAEP with SHA-256 for both
/// the MGF1 and label hash, matching the service.
pub const RSA_KEY_USAGE: &str = "RSA-OAEP/SHA-256 encrypt+decrypt";

/// Which kind of key the crypto form uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScheme {
    /// 32 random bytes, base64url encoded
    Symmetric,
    /// RSA key pair, PEM encoded
    Asymmetric,
}

/// Symmetric key text. Editable by the operator after generation.
#[derive(Clone)]
pub struct SymmetricKey(Zeroizing<String>);

impl SymmetricKey {
    /// The base64url key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SymmetricKey").field(&"[REDACTED]").finish()
    }
}

/// Freshly generated RSA key pair.
#[derive(Debug)]
pub struct AsymmetricKeyPair {
    public_pem: String,
    private_pem: SecretString,
}

impl AsymmetricKeyPair {
    /// SPKI public key in PEM armor.
    #[must_use]
    pub fn public_pem(&self) -> &str {
        &self.public_pem
    }
}

/// Generated key material.
#[derive(Debug)]
pub enum KeyMaterial {
    /// Symmetric key text
    Symmetric(SymmetricKey),
    /// RSA key pair
    Asymmetric(AsymmetricKeyPair),
}

/// Generate a symmetric key: 32 bytes from the OS RNG, URL-safe base64 with padding.
#[must_use]
pub fn generate_symmetric() -> SymmetricKey {
    let mut bytes = Zeroizing::new([0u8; SYMMETRIC_KEY_BYTES]);
    OsRng.fill_bytes(&mut *bytes);
    SymmetricKey(Zeroizing::new(URL_SAFE.encode(&*bytes)))
}

/// Generate a 2048-bit RSA pair and export it as SPKI and PKCS#8 PEM.
///
/// # Errors
///
/// Returns [`ClientError::KeyGeneration`] if generation or export fails.
pub fn generate_asymmetric() -> ClientResult<AsymmetricKeyPair> {
    let private = RsaPrivateKey::new(&mut OsRng, RSA_MODULUS_BITS)
        .map_err(|e| ClientError::key_generation(e.to_string()))?;
    let public = RsaPublicKey::from(&private);

    let private_pem = private
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| ClientError::key_generation(format!("PKCS#8 export: {e}")))?;
    let public_pem = public
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| ClientError::key_generation(format!("SPKI export: {e}")))?;

    info!(bits = RSA_MODULUS_BITS, usage = RSA_KEY_USAGE, "Generated RSA key pair");
    Ok(AsymmetricKeyPair {
        public_pem,
        private_pem: SecretString::from(private_pem.to_string()),
    })
}

/// Generate key material for a scheme.
///
/// # Errors
///
/// Returns an error if asymmetric generation fails.
pub fn generate(scheme: KeyScheme) -> ClientResult<KeyMaterial> {
    match scheme {
        KeyScheme::Symmetric => Ok(KeyMaterial::Symmetric(generate_symmetric())),
        KeyScheme::Asymmetric => generate_asymmetric().map(KeyMaterial::Asymmetric),
    }
}

/// Clipboard write failure.
#[derive(Error, Debug)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// Destination for the one-time private key handoff.
pub trait Clipboard {
    /// Place `text` on the operator's clipboard.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// How the private key reached the operator.
#[derive(Debug)]
pub enum PrivateKeyDisclosure {
    /// Written to the clipboard
    Clipboard,
    /// Clipboard failed; shown verbatim in an alert so it is not lost
    OnScreen(SecretString),
}

/// What the crypto form keeps after generation, plus how the private key
/// was delivered.
#[derive(Debug)]
pub struct KeyHandoff {
    /// Text for the form's key field: symmetric key or public PEM
    pub form_key: String,
    /// Present only for asymmetric material
    pub disclosure: Option<PrivateKeyDisclosure>,
}

impl KeyMaterial {
    /// Consume the material and hand any private key to the operator.
    ///
    /// The clipboard is tried first; only when it fails is the private key
    /// returned for on-screen disclosure. Nothing else keeps a copy.
    pub fn hand_off(self, clipboard: &dyn Clipboard) -> KeyHandoff {
        match self {
            Self::Symmetric(key) => KeyHandoff {
                form_key: key.as_str().to_string(),
                disclosure: None,
            },
            Self::Asymmetric(pair) => {
                let disclosure = match clipboard.write_text(pair.private_pem.expose_secret()) {
                    Ok(()) => {
                        info!("Private key copied to clipboard");
                        PrivateKeyDisclosure::Clipboard
                    }
                    Err(e) => {
                        warn!(error = %e, "Falling back to on-screen private key disclosure");
                        PrivateKeyDisclosure::OnScreen(pair.private_pem)
                    }
                };
                KeyHandoff {
                    form_key: pair.public_pem,
                    disclosure: Some(disclosure),
                }
            }
        }
    }
}
