use fieldguard_crypto::{CryptoError, EncryptionCodec, EncryptionKey, derive_key, KdfParams, Salt};

// ── Null handling ────────────────────────────────────────────────

#[test]
fn encrypt_none_is_identity() {
    let codec = EncryptionCodec::generate();
    assert_eq!(codec.encrypt_value(None).unwrap(), None);
}

#[test]
fn decrypt_none_is_identity() {
    let codec = EncryptionCodec::generate();
    assert_eq!(codec.decrypt_value(None).unwrap(), None);
}

// ── Round trips ──────────────────────────────────────────────────

#[test]
fn salary_roundtrip() {
    let codec = EncryptionCodec::generate();
    let token = codec.encrypt_value(Some("1000")).unwrap().unwrap();
    assert_ne!(token, "1000");
    assert_eq!(codec.decrypt_value(Some(&token)).unwrap().as_deref(), Some("1000"));
}

#[test]
fn configured_key_decrypts_across_codec_instances() {
    let key = EncryptionKey::generate();
    let encoded = key.to_base64();

    let writer = EncryptionCodec::new(key);
    let token = writer.encrypt_value(Some("2000")).unwrap();

    let reader = EncryptionCodec::new(EncryptionKey::from_base64(&encoded).unwrap());
    assert_eq!(reader.decrypt_value(token.as_deref()).unwrap().as_deref(), Some("2000"));
}

#[test]
fn passphrase_key_decrypts_across_codec_instances() {
    let salt = Salt::from_bytes([5; 16]);
    let params = KdfParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    };
    let writer = EncryptionCodec::new(derive_key("hunter22", &salt, &params).unwrap());
    let reader = EncryptionCodec::new(derive_key("hunter22", &salt, &params).unwrap());

    let token = writer.encrypt_value(Some("42 Main Street")).unwrap();
    assert_eq!(
        reader.decrypt_value(token.as_deref()).unwrap().as_deref(),
        Some("42 Main Street")
    );
}

// ── Failures ─────────────────────────────────────────────────────

#[test]
fn cross_instance_generated_keys_fail() {
    let first = EncryptionCodec::generate();
    let second = EncryptionCodec::generate();
    let token = first.encrypt_value(Some("1000")).unwrap();
    assert!(matches!(
        second.decrypt_value(token.as_deref()),
        Err(CryptoError::Decryption(_))
    ));
}

#[test]
fn malformed_token_fails() {
    let codec = EncryptionCodec::generate();
    assert!(matches!(
        codec.decrypt_value(Some("definitely not a token")),
        Err(CryptoError::Decryption(_))
    ));
}

// ── Key info ─────────────────────────────────────────────────────

#[test]
fn key_info_describes_without_exposing() {
    let key = EncryptionKey::from_bytes([1u8; 32]);
    let encoded = key.to_base64();
    let codec = EncryptionCodec::new(key);
    let info = codec.key_info();

    assert_eq!(info.algorithm, "ChaCha20-Poly1305");
    assert_eq!(info.key_bits, 256);
    assert_eq!(info.fingerprint, codec.key().fingerprint());
    assert!(!encoded.contains(&info.fingerprint));
}
