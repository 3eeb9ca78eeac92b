#![allow(missing_docs)]
use cipher_core::{
    CipherError, Script, StepStatus, alphabet_for, byte_otp, detect_script, poly_otp, rail_fence,
    rsa,
};

#[test]
fn test_xor_self_inverse_for_every_byte() {
    let plain: Vec<u8> = (0..=255).collect();
    let key = byte_otp::generate_key(plain.len()).unwrap();
    let once = byte_otp::encrypt_bytes(&plain, &key).unwrap();
    let twice = byte_otp::encrypt_bytes(&once, &key).unwrap();
    assert_eq!(twice, plain);
}

#[test]
fn test_poly_roundtrip_with_independent_detection() {
    let encrypted = poly_otp::encrypt("HELLO", "XMCKL").unwrap();
    assert_eq!(encrypted.text, "eQNVZ");
    assert_eq!(detect_script(&encrypted.text), encrypted.script);

    let decrypted = poly_otp::decrypt(&encrypted.text, "XMCKL").unwrap();
    assert_eq!(decrypted.text, "HELLO");
}

#[test]
fn test_ignored_symbol_passes_through() {
    let out = poly_otp::encrypt("A B", "KEY").unwrap();
    let step = out.trace.get(1).unwrap();
    assert_eq!(step.status, StepStatus::Ignored);
    assert_eq!(out.text.chars().nth(1), Some(' '));
}

#[test]
fn test_script_detection() {
    // five Arabic letters, one Latin letter
    assert_eq!(detect_script("كتابة a"), Script::Arabic);
    assert_eq!(detect_script("ab كت"), Script::Mixed);
    assert_eq!(detect_script("text"), Script::Latin);
}

#[test]
fn test_mixed_alphabet_is_deduplicated() {
    let mixed = alphabet_for(Script::Mixed);
    let latin = alphabet_for(Script::Latin);
    let arabic = alphabet_for(Script::Arabic);
    // the ten digits are shared
    assert_eq!(mixed.len(), latin.len() + arabic.len() - 10);
    assert_eq!(mixed.index_of('0'), latin.index_of('0'));
}

#[test]
fn test_rail_fence_reference_scenario() {
    assert_eq!(
        rail_fence::encrypt("WEAREDISCOVEREDFLEEATONCE", 3).unwrap(),
        "WECRLTEERDSOEEFEAOCAIVDEN"
    );
}

#[test]
fn test_rail_fence_boundaries() {
    let text = "zigzag";
    assert_eq!(rail_fence::encrypt(text, text.len()).unwrap(), text);
    for rails in [text.len() + 1, 1 << 32, usize::MAX] {
        assert_eq!(rail_fence::encrypt(text, rails).unwrap(), text);
        assert_eq!(rail_fence::decrypt(text, rails).unwrap(), text);
    }
    assert!(matches!(
        rail_fence::encrypt(text, 1),
        Err(CipherError::InvalidKey(_))
    ));
}

#[test]
fn test_rsa_default_key_consistency() {
    let keys = rsa::derive_keys(61, 53, None, None).unwrap();
    assert_eq!(keys.phi, 3120);
    // 65537 >= phi, 3 and 5 divide phi, 7 is the first odd coprime value
    assert_eq!(keys.e, 7);
    assert_eq!(rsa::mod_inverse(keys.e, keys.phi), Some(keys.d));

    let message = "Toy RSA: 1 char per block ~ OK";
    let (cipher, _) = rsa::encrypt_with_trace(message, keys.e, keys.n).unwrap();
    for (ch, &c) in message.chars().zip(cipher.iter()) {
        assert_eq!(rsa::mod_pow(c, keys.d, keys.n), u64::from(u32::from(ch)));
    }
}

#[test]
fn test_rsa_tolerant_parsing() {
    assert_eq!(rsa::parse_tokens("[11, 22,\n33]").unwrap(), vec![11, 22, 33]);
    assert_eq!(
        rsa::decrypt_with_trace("[ , ]", 7, 3233),
        Err(CipherError::NoTokensFound)
    );
}

#[test]
fn test_failures_do_not_affect_later_calls() {
    assert!(poly_otp::encrypt("long text", "k").is_err());
    let out = poly_otp::encrypt("ok", "ab").unwrap();
    assert_eq!(out.text, "EB");
}
