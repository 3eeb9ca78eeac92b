#![allow(missing_docs)]
use cipher_core::byte_otp::{self, DecodedText};
use cipher_core::{Direction, Script, StepStatus, poly_otp, rail_fence, rsa};

#[test]
fn test_byte_otp_roundtrip() {
    let plaintext = b"Hello, world!";
    let pad = (0..plaintext.len())
        .map(|i| ((i * 7) % 256) as u8)
        .collect::<Vec<u8>>();

    let ciphertext = byte_otp::encrypt_bytes(plaintext, &pad).unwrap();
    let decrypted_plaintext = byte_otp::decrypt_bytes(&ciphertext, &pad).unwrap();

    assert_eq!(plaintext, &decrypted_plaintext[..]);
}

#[test]
fn test_byte_otp_text_exchange_simulation() {
    // 1. Sender encrypts with a freshly generated key
    let original = "Meet at the usual place. موعدنا في المكان المعتاد.";
    let (cipher_b64, key_b64) = byte_otp::encrypt_text(original, None).unwrap();

    // 2. The trace covers every plaintext byte
    let steps = byte_otp::trace(original, &key_b64, Direction::Encrypt).unwrap();
    assert_eq!(steps.len(), original.len());

    // 3. Receiver decrypts with the shared key
    let decrypted = byte_otp::decrypt_text(&cipher_b64, &key_b64).unwrap();
    assert_eq!(decrypted, DecodedText::Utf8(original.to_string()));
}

#[test]
fn test_byte_otp_reused_key_supplied_by_caller() {
    let key = byte_otp::generate_key_b64(64).unwrap();
    let (cipher, returned_key) = byte_otp::encrypt_text("short", Some(&key)).unwrap();
    assert_eq!(returned_key, key);
    assert_eq!(
        byte_otp::decrypt_text(&cipher, &key).unwrap().as_str(),
        "short"
    );
}

#[test]
fn test_poly_otp_latin_roundtrip() {
    let text = "Attack at dawn, 0600!";
    let key = poly_otp::generate_key(Script::Latin, text.chars().count());

    let encrypted = poly_otp::encrypt(text, &key).unwrap();
    assert_eq!(encrypted.script, Script::Latin);
    assert_eq!(encrypted.trace.len(), text.chars().count());

    let decrypted = poly_otp::decrypt_as(&encrypted.text, &key, encrypted.script).unwrap();
    assert_eq!(decrypted.text, text);
}

#[test]
fn test_poly_otp_mixed_roundtrip() {
    let text = "Hi سل";
    assert_eq!(cipher_core::detect_script(text), Script::Mixed);
    let key = poly_otp::generate_key(Script::Mixed, 5);

    let encrypted = poly_otp::encrypt(text, &key).unwrap();
    let decrypted = poly_otp::decrypt_as(&encrypted.text, &key, Script::Mixed).unwrap();
    assert_eq!(decrypted.text, text);
    assert_eq!(decrypted.trace.get(2).unwrap().status, StepStatus::Ignored);
}

#[test]
fn test_rail_fence_roundtrip() {
    let text = "We are discovered. Flee at once!";
    for rails in (2..=text.len() + 3).chain([usize::MAX]) {
        let cipher = rail_fence::encrypt(text, rails).unwrap();
        assert_eq!(rail_fence::decrypt(&cipher, rails).unwrap(), text);
    }
}

#[test]
fn test_rsa_exported_cipher_reimport() {
    // 1. Interactive key setup
    let keys = rsa::derive_keys(61, 53, Some(17), None).unwrap();
    assert_eq!((keys.e, keys.n, keys.d), (17, 3233, 2753));

    // 2. Encrypt and export as free-form text
    let (cipher, _) = rsa::encrypt_with_trace("RSA demo", keys.e, keys.n).unwrap();
    let exported = format!("[{}]\n", rsa::format_cipher(&cipher).replace(", ", ",\n"));

    // 3. Re-import and decrypt
    let (plain, trace) = rsa::decrypt_with_trace(&exported, keys.d, keys.n).unwrap();
    assert_eq!(plain, "RSA demo");
    assert!(trace.iter().all(|s| s.status == StepStatus::Applied));
}
