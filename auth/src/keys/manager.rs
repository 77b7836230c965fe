use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use rand::rngs::OsRng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::pkcs8::EncodePrivateKey;
use rsa::pkcs8::EncodePublicKey;
use rsa::pkcs8::LineEnding;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use rsa::RsaPublicKey;

use super::errors::KeyError;

const RSA_BITS: usize = 2048;
const PRIVATE_KEY_MODE: u32 = 0o600;
const PUBLIC_KEY_MODE: u32 = 0o644;

/// Locations of the persisted signing keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

impl KeyPaths {
    pub fn new(private_key: impl Into<PathBuf>, public_key: impl Into<PathBuf>) -> Self {
        Self {
            private_key: private_key.into(),
            public_key: public_key.into(),
        }
    }

    /// `private.pem` and `public.pem` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("private.pem"), dir.join("public.pem"))
    }
}

impl Default for KeyPaths {
    fn default() -> Self {
        Self::new("private.pem", "public.pem")
    }
}

/// Owner of the service's RSA signing keypair.
///
/// Constructed once at startup and shared (behind an `Arc`) with every
/// component that signs or verifies tokens. The keypair is immutable for the
/// lifetime of the value, so concurrent readers need no locking.
pub struct KeyManager {
    public_key: RsaPublicKey,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl KeyManager {
    /// Load the keypair from `paths`, or generate and persist a new one.
    ///
    /// A new keypair is generated when either file is missing, cannot be
    /// parsed, is weaker than RSA-2048, or when the two halves do not belong
    /// together. Both files are then (re)written before returning, so the
    /// next start reuses the same keys.
    ///
    /// # Arguments
    /// * `paths` - Private and public key file locations
    ///
    /// # Returns
    /// Ready-to-use KeyManager
    ///
    /// # Errors
    /// * `LoadFailed` - A key file exists but could not be read
    /// * `GenerationFailed` - RSA key generation failed
    /// * `PersistFailed` - Writing a key file failed
    pub fn load_or_generate(paths: &KeyPaths) -> Result<Self, KeyError> {
        if let Some(manager) = Self::load(paths)? {
            tracing::info!(
                private_key = %paths.private_key.display(),
                public_key = %paths.public_key.display(),
                "Signing keys loaded"
            );
            return Ok(manager);
        }

        tracing::info!(bits = RSA_BITS, "Generating new RSA signing keys");

        let private_key = generate_private_key()?;
        persist(&private_key, paths)?;

        tracing::info!(
            private_key = %paths.private_key.display(),
            public_key = %paths.public_key.display(),
            "Signing keys generated and saved"
        );

        Self::from_private_key(&private_key)
    }

    /// Generate a keypair held only in memory.
    ///
    /// # Errors
    /// * `GenerationFailed` - RSA key generation failed
    pub fn generate() -> Result<Self, KeyError> {
        let private_key = generate_private_key()?;
        Self::from_private_key(&private_key)
    }

    /// Build a key manager from PEM-encoded key material.
    ///
    /// The private key may be PKCS#8 (`PRIVATE KEY`) or PKCS#1
    /// (`RSA PRIVATE KEY`); the public key must be SPKI (`PUBLIC KEY`).
    ///
    /// # Errors
    /// * `InvalidKey` - Either half fails to parse, is too small, or the halves do not match
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self, KeyError> {
        let private_key = parse_private_key(private_pem)?;
        let public_key = RsaPublicKey::from_public_key_pem(public_pem)
            .map_err(|e| KeyError::InvalidKey(format!("public key: {}", e)))?;

        if private_key.to_public_key() != public_key {
            return Err(KeyError::InvalidKey(
                "public key does not belong to private key".to_string(),
            ));
        }

        Self::from_private_key(&private_key)
    }

    /// Serialize the public key to PEM for distribution.
    ///
    /// # Errors
    /// * `ExportFailed` - Encoding the public key failed
    pub fn public_key_pem(&self) -> Result<String, KeyError> {
        self.public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeyError::ExportFailed(e.to_string()))
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    fn load(paths: &KeyPaths) -> Result<Option<Self>, KeyError> {
        let Some(private_pem) = read_key_file(&paths.private_key)? else {
            tracing::info!(path = %paths.private_key.display(), "Private key not found");
            return Ok(None);
        };
        let Some(public_pem) = read_key_file(&paths.public_key)? else {
            tracing::info!(path = %paths.public_key.display(), "Public key not found");
            return Ok(None);
        };

        match Self::from_pem(&private_pem, &public_pem) {
            Ok(manager) => Ok(Some(manager)),
            Err(e) => {
                tracing::warn!(error = %e, "Stored signing keys are unusable, regenerating");
                Ok(None)
            }
        }
    }

    fn from_private_key(private_key: &RsaPrivateKey) -> Result<Self, KeyError> {
        let public_key = private_key.to_public_key();
        if public_key.size() * 8 < RSA_BITS {
            return Err(KeyError::InvalidKey(format!(
                "RSA key is {} bits, minimum is {}",
                public_key.size() * 8,
                RSA_BITS
            )));
        }

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| KeyError::InvalidKey(format!("private key: {}", e)))?;
        let public_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeyError::InvalidKey(format!("public key: {}", e)))?;

        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| KeyError::InvalidKey(format!("private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| KeyError::InvalidKey(format!("public key: {}", e)))?;

        Ok(Self {
            public_key,
            encoding_key,
            decoding_key,
        })
    }
}

impl fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyManager")
            .field("bits", &(self.public_key.size() * 8))
            .finish_non_exhaustive()
    }
}

fn generate_private_key() -> Result<RsaPrivateKey, KeyError> {
    RsaPrivateKey::new(&mut OsRng, RSA_BITS).map_err(|e| KeyError::GenerationFailed(e.to_string()))
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, KeyError> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| KeyError::InvalidKey(format!("private key: {}", e)))
}

/// `Ok(None)` when the file does not exist. Non-UTF-8 content is passed on
/// lossily and fails to parse later, which triggers regeneration.
fn read_key_file(path: &Path) -> Result<Option<String>, KeyError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(KeyError::LoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn persist(private_key: &RsaPrivateKey, paths: &KeyPaths) -> Result<(), KeyError> {
    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| KeyError::GenerationFailed(format!("encoding private key: {}", e)))?;
    let public_pem = private_key
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| KeyError::GenerationFailed(format!("encoding public key: {}", e)))?;

    write_key_file(&paths.private_key, private_pem.as_bytes(), PRIVATE_KEY_MODE)?;
    write_key_file(&paths.public_key, public_pem.as_bytes(), PUBLIC_KEY_MODE)?;

    Ok(())
}

#[cfg_attr(not(unix), allow(unused_variables))]
fn write_key_file(path: &Path, contents: &[u8], mode: u32) -> Result<(), KeyError> {
    let persist_error = |e: io::Error| KeyError::PersistFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(persist_error)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(path).map_err(persist_error)?;

    // The mode above only applies to newly created files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(mode))
            .map_err(persist_error)?;
    }

    file.write_all(contents).map_err(persist_error)?;
    file.sync_all().map_err(persist_error)?;

    Ok(())
}
