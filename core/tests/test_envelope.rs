mod common;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use p256::SecretKey;
    use proptest::prelude::*;
    use rand::rngs::OsRng;

    use crate::common::VauPeer;
    use vau_client::crypto::{CryptoError, NonceSequence};
    use vau_client::envelope::{
        decode_request_envelope, EnvelopeError, VauEnvelopeCipher, VauVersion, REQUEST_HEADER_LEN,
        REQUEST_MIN_LEN, RESPONSE_MIN_LEN,
    };
    use vau_client::types::VauError;

    fn established(peer: &VauPeer) -> VauEnvelopeCipher {
        let mut cipher = VauEnvelopeCipher::new(VauVersion::V1, peer.public_key());
        cipher.establish().unwrap();
        cipher
    }

    #[test]
    fn establish_is_stable() {
        let peer = VauPeer::new();
        let mut cipher = VauEnvelopeCipher::new(VauVersion::V1, peer.public_key());
        assert!(!cipher.is_established());
        assert!(cipher.session_key().is_none());

        let first = cipher.establish().unwrap().clone();
        let second = cipher.establish().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.len(), 16);
        assert_eq!(cipher.session_key(), Some(&first));
    }

    #[test]
    fn peer_opens_request_and_sees_framing() {
        let peer = VauPeer::new();
        let mut cipher = established(&peer);

        let env = cipher.encrypt("IDP_Token", b"GET /Task HTTP/1.1\r\ncontent-length: 0\r\n\r\n").unwrap();
        assert_eq!(env.version(), VauVersion::V1);
        assert_eq!(env.as_bytes()[0], 0x01);
        assert!(env.len() >= REQUEST_MIN_LEN);

        let opened = peer.open_request(env.as_bytes()).unwrap();
        assert_eq!(opened.bearer, "IDP_Token");
        assert_eq!(opened.request_id_hex, env.request_id_hex());
        assert_eq!(opened.response_key_hex, cipher.session_key().unwrap().to_hex());
        assert_eq!(&opened.session_key, cipher.session_key().unwrap());
        assert_eq!(opened.inner_http, b"GET /Task HTTP/1.1\r\ncontent-length: 0\r\n\r\n");
    }

    #[test]
    fn ephemeral_key_is_carried_in_every_request() {
        let peer = VauPeer::new();
        let mut cipher = established(&peer);
        let a = cipher.encrypt("t", b"a").unwrap();
        let b = cipher.encrypt("t", b"b").unwrap();

        let pa = decode_request_envelope(a.as_bytes(), VauVersion::V1).unwrap();
        let pb = decode_request_envelope(b.as_bytes(), VauVersion::V1).unwrap();
        assert_eq!(pa.ephemeral_xy, pb.ephemeral_xy);
        assert_eq!(&pa.ephemeral_xy, cipher.ephemeral_public_xy().unwrap());
        assert_ne!(pa.nonce, pb.nonce);
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn response_roundtrip() {
        let peer = VauPeer::new();
        let mut cipher = established(&peer);
        let env = cipher.encrypt("t", b"ping").unwrap();
        let opened = peer.open_request(env.as_bytes()).unwrap();

        let sealed = peer.seal_response(&opened.session_key, &opened.request_id_hex, b"HTTP/1.1 200 OK\r\n\r\n");
        let plain = cipher.decrypt(&sealed).unwrap();
        let expected = format!("1 {} HTTP/1.1 200 OK\r\n\r\n", env.request_id_hex());
        assert_eq!(plain, expected.as_bytes());
    }

    #[test]
    fn tampered_response_fails_closed() {
        let peer = VauPeer::new();
        let mut cipher = established(&peer);
        let env = cipher.encrypt("t", b"ping").unwrap();
        let opened = peer.open_request(env.as_bytes()).unwrap();
        let sealed = peer.seal_response(&opened.session_key, &opened.request_id_hex, b"HTTP/1.1 200 OK\r\n\r\n");

        for i in [1, 12, sealed.len() - 1] {
            let mut bad = sealed.clone();
            bad[i] ^= 0x01;
            let err = cipher.decrypt(&bad).unwrap_err();
            assert!(matches!(err, VauError::Crypto(CryptoError::TagMismatch)), "byte {i}: {err:?}");
            assert!(err.is_vau_exception());
        }
    }

    #[test]
    fn foreign_version_and_truncation() {
        let peer = VauPeer::new();
        let cipher = established(&peer);

        let err = cipher.decrypt(&[0x02; RESPONSE_MIN_LEN]).unwrap_err();
        assert!(matches!(err, VauError::Envelope(EnvelopeError::UnknownVersion { raw: 0x02 })));

        let err = cipher.decrypt(&[0x01, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, VauError::Envelope(EnvelopeError::TooShort { have: 4, .. })));

        let err = cipher.decrypt(b"Internal Server Error").unwrap_err();
        assert!(err.is_vau_exception());
    }

    #[test]
    fn key_from_other_session_cannot_open() {
        let peer = VauPeer::new();
        let mut first = established(&peer);
        let second = established(&peer);
        let env = first.encrypt("t", b"ping").unwrap();
        let opened = peer.open_request(env.as_bytes()).unwrap();
        let sealed = peer.seal_response(&opened.session_key, &opened.request_id_hex, b"HTTP/1.1 200 OK\r\n\r\n");

        assert!(second.decrypt(&sealed).is_err());
        assert!(first.decrypt(&sealed).is_ok());
    }

    #[test]
    fn wrong_peer_cannot_open_request() {
        let peer = VauPeer::new();
        let other = VauPeer::from_secret(SecretKey::random(&mut OsRng));
        let mut cipher = established(&peer);
        let env = cipher.encrypt("t", b"ping").unwrap();
        assert!(other.open_request(env.as_bytes()).is_err());
    }

    #[test]
    fn tampered_header_breaks_request_aad() {
        let peer = VauPeer::new();
        let mut cipher = established(&peer);
        let mut bytes = cipher.encrypt("t", b"ping").unwrap().into_bytes();
        // last byte of the ephemeral point
        bytes[REQUEST_HEADER_LEN - 1] ^= 0x01;
        assert!(peer.open_request(&bytes).is_err());
    }

    #[test]
    fn not_established_is_rejected() {
        let peer = VauPeer::new();
        let mut cipher = VauEnvelopeCipher::new(VauVersion::V1, peer.public_key());
        let err = cipher.encrypt("t", b"x").unwrap_err();
        assert!(matches!(err, VauError::Crypto(CryptoError::NotEstablished)));
        assert!(matches!(cipher.decrypt(&[0x01; 64]), Err(VauError::Crypto(CryptoError::NotEstablished))));
    }

    #[test]
    fn bearer_must_be_one_token() {
        let peer = VauPeer::new();
        let mut cipher = established(&peer);
        assert!(matches!(cipher.encrypt("two tokens", b"x"), Err(VauError::Envelope(_))));
        assert!(matches!(cipher.encrypt("", b"x"), Err(VauError::Envelope(_))));
    }

    #[test]
    fn nonce_sequence_does_not_repeat() {
        let mut seq = NonceSequence::random();
        let seen: HashSet<[u8; 12]> = (0..1000).map(|_| seq.next_nonce().unwrap()).collect();
        assert_eq!(seen.len(), 1000);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_peer_recovers_any_payload(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let peer = VauPeer::new();
            let mut cipher = established(&peer);
            let env = cipher.encrypt("token", &payload).unwrap();
            let opened = peer.open_request(env.as_bytes()).unwrap();
            prop_assert_eq!(opened.inner_http, payload);
        }
    }
}
